//! Chat command handlers and dispatch
//!
//! Every command the bot understands is registered explicitly in
//! [`CommandDispatcher::new`]. Handlers return reply lines; failures are
//! converted to a single `error: ...` line at the dispatch boundary and
//! never propagate further.

mod find;
mod get;
mod help;
mod ping;
mod regex;

pub use find::handle_find;
pub use get::handle_get;
pub use help::handle_help;
pub use ping::handle_ping;
pub use regex::handle_regex;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

use crate::files::SearchSummary;
use crate::transfers::TransferQueue;

/// Context passed to all command handlers
pub struct CommandContext<'a> {
    /// Service root all file operations are confined to
    pub root: &'a Path,
    /// Pending transfer queue (only `get` touches it)
    pub queue: &'a mut TransferQueue,
    /// Nickname of the requesting user
    pub nick: &'a str,
    /// The bot's own nickname, quoted in help text
    pub bot_nick: &'a str,
}

/// Handler failure, recovered to a reply line by the dispatcher
#[derive(Debug)]
pub enum CommandError {
    /// The supplied pattern does not compile
    InvalidPattern(::regex::Error),
    /// Filesystem access failed
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {}

type CommandHandler = fn(&str, &mut CommandContext) -> Result<Vec<String>, CommandError>;

/// Maps command words to their handlers
pub struct CommandDispatcher {
    handlers: HashMap<&'static str, CommandHandler>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    /// Build the dispatch table. Commands are registered here and nowhere
    /// else; an unregistered word is answered with `no such command`.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, CommandHandler> = HashMap::new();
        handlers.insert("ping", handle_ping);
        handlers.insert("help", handle_help);
        handlers.insert("find", handle_find);
        handlers.insert("regex", handle_regex);
        handlers.insert("get", handle_get);
        Self { handlers }
    }

    /// Run one command and return the reply lines
    pub fn dispatch(&self, word: &str, args: &str, ctx: &mut CommandContext) -> Vec<String> {
        match self.handlers.get(word) {
            Some(handler) => match handler(args, ctx) {
                Ok(lines) => lines,
                Err(e) => vec![format!("error: {e}")],
            },
            None => vec![format!("no such command: {word}")],
        }
    }
}

/// Format a search outcome the way every search command replies: the
/// total count, then the listed matches with their sizes.
pub(crate) fn match_lines(summary: &SearchSummary) -> Vec<String> {
    let mut lines = vec![format!("{} matches", summary.total)];
    for entry in &summary.entries {
        lines.push(format!("{} - size: {}B", entry.name, entry.size));
    }
    lines
}
