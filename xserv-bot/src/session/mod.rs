//! Chat session
//!
//! A thin IRC client: register, answer PINGs, join the service channel on
//! welcome, and shuttle traffic between the socket and the bot. All bot
//! work happens inline on this task; the select below is the only place
//! the process waits.
//!
//! There is no reconnect policy. A dropped server connection ends the
//! session with an error and the process exits with a diagnostic.

pub mod message;

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time;

use crate::bot::{ChatCommand, ServeBot};
use crate::constants::TICK_INTERVAL;
use crate::transfers::TransferEvent;
use message::{ServerLine, parse_line};

/// What one iteration of the event loop woke up for. Computed inside the
/// select so every mutable use of the bot happens after it resolves.
enum Step {
    Line(Option<String>),
    Tick,
    Transfer(TransferEvent),
    Outbound(Option<ChatCommand>),
}

/// Run the session until the server closes the connection or I/O fails
///
/// # Errors
///
/// Returns the underlying I/O error, or `UnexpectedEof` when the server
/// ends the connection.
pub async fn run<R, W>(
    reader: R,
    mut writer: W,
    channel: String,
    nick: String,
    debug: bool,
    mut bot: ServeBot,
    mut outbound: mpsc::UnboundedReceiver<ChatCommand>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut ticker = time::interval(TICK_INTERVAL);

    send_line(&mut writer, &format!("NICK {nick}")).await?;
    send_line(&mut writer, &format!("USER {nick} 0 * :{nick}")).await?;

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            _ = ticker.tick() => Step::Tick,
            event = bot.next_transfer_event() => Step::Transfer(event),
            command = outbound.recv() => Step::Outbound(command),
        };

        match step {
            Step::Line(None) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "server closed the connection",
                ));
            }
            Step::Line(Some(line)) => {
                if debug {
                    println!("<- {line}");
                }
                match parse_line(&line) {
                    Some(ServerLine::Ping { token }) => {
                        send_line(&mut writer, &format!("PONG :{token}")).await?;
                    }
                    Some(ServerLine::Welcome) => {
                        println!("registered, joining {channel}");
                        send_line(&mut writer, &format!("JOIN {channel}")).await?;
                    }
                    Some(ServerLine::Join {
                        nick: who,
                        channel: joined,
                    }) => {
                        if who == nick {
                            if joined == channel {
                                println!("joined {joined}");
                            } else {
                                eprintln!("joined unrequested channel {joined}");
                            }
                        }
                    }
                    Some(ServerLine::Privmsg {
                        nick: from,
                        target,
                        text,
                    }) => {
                        if target == channel {
                            bot.on_chat_message(&from, &text);
                        }
                    }
                    None => {}
                }
            }
            Step::Tick => bot.on_tick().await,
            Step::Transfer(event) => bot.on_transfer_event(&event),
            Step::Outbound(None) => return Ok(()),
            Step::Outbound(Some(command)) => match command {
                ChatCommand::Reply(text) => {
                    send_line(&mut writer, &format!("PRIVMSG {channel} :{text}")).await?;
                }
                ChatCommand::Ctcp {
                    nick: to,
                    payload,
                } => {
                    send_line(&mut writer, &format!("PRIVMSG {to} :\u{1}{payload}\u{1}")).await?;
                }
            },
        }
    }
}

async fn send_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await
}
