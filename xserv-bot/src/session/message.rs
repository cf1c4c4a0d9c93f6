//! Server line parsing
//!
//! The session only cares about four kinds of line: the keepalive PING,
//! the welcome numeric that means registration succeeded, channel joins,
//! and PRIVMSGs. Everything else is ignored.

/// A parsed line from the chat server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Keepalive probe; must be answered with PONG carrying the token
    Ping { token: String },
    /// Numeric 001: registration accepted, safe to join
    Welcome,
    /// A user (possibly the bot itself) joined a channel
    Join { nick: String, channel: String },
    /// A message to a channel or directly to the bot
    Privmsg {
        nick: String,
        target: String,
        text: String,
    },
}

/// Parse one line. Returns `None` for anything the session ignores.
pub fn parse_line(line: &str) -> Option<ServerLine> {
    let line = line.trim_end_matches(['\r', '\n']);

    let (prefix, rest) = match line.strip_prefix(':') {
        Some(stripped) => {
            let (prefix, rest) = stripped.split_once(' ')?;
            (Some(prefix), rest)
        }
        None => (None, line),
    };

    let (command, params) = match rest.split_once(' ') {
        Some((command, params)) => (command, params),
        None => (rest, ""),
    };

    match command {
        "PING" => {
            let token = params.strip_prefix(':').unwrap_or(params);
            Some(ServerLine::Ping {
                token: token.to_string(),
            })
        }
        "001" => Some(ServerLine::Welcome),
        "JOIN" => {
            let nick = source_nick(prefix?).to_string();
            let channel = params.split_whitespace().next()?;
            let channel = channel.strip_prefix(':').unwrap_or(channel);
            Some(ServerLine::Join {
                nick,
                channel: channel.to_string(),
            })
        }
        "PRIVMSG" => {
            let nick = source_nick(prefix?).to_string();
            let (target, rest) = params.split_once(' ')?;
            let text = rest.strip_prefix(':').unwrap_or(rest);
            Some(ServerLine::Privmsg {
                nick,
                target: target.to_string(),
                text: text.to_string(),
            })
        }
        _ => None,
    }
}

/// The nick part of a `nick!user@host` source prefix
fn source_nick(prefix: &str) -> &str {
    prefix.split('!').next().unwrap_or(prefix)
}
