//! Bot core
//!
//! `ServeBot` owns the command dispatcher, the pending-request queue, and
//! the transfer engine. The surrounding chat session feeds it inbound
//! messages and clock ticks and forwards its outbound traffic; everything
//! runs on one task, so no state here needs locking.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use tokio::sync::mpsc;

use xserv_common::COMMAND_PREFIX;

use crate::commands::{CommandContext, CommandDispatcher};
use crate::transfers::{TransferEngine, TransferEvent, TransferQueue};

/// Outbound chat traffic, queued in order and written by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// A reply line for the service channel
    Reply(String),
    /// A CTCP payload for a specific user (the transfer offer)
    Ctcp { nick: String, payload: String },
}

pub struct ServeBot {
    root: PathBuf,
    nick: String,
    advertise: Ipv4Addr,
    debug: bool,
    dispatcher: CommandDispatcher,
    queue: TransferQueue,
    engine: TransferEngine,
    outbound: mpsc::UnboundedSender<ChatCommand>,
}

impl ServeBot {
    pub fn new(
        root: PathBuf,
        nick: String,
        advertise: Ipv4Addr,
        debug: bool,
        outbound: mpsc::UnboundedSender<ChatCommand>,
    ) -> Self {
        Self {
            root,
            nick,
            advertise,
            debug,
            dispatcher: CommandDispatcher::new(),
            queue: TransferQueue::new(),
            engine: TransferEngine::new(),
            outbound,
        }
    }

    /// Number of requests waiting behind the active transfer
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// True when no transfer is active or pending connection
    pub fn transfer_idle(&self) -> bool {
        self.engine.is_idle()
    }

    /// Handle one channel message. Non-command text is ignored; a command
    /// produces zero or more reply lines on the outbound channel.
    pub fn on_chat_message(&mut self, nick: &str, text: &str) {
        let Some(rest) = text.strip_prefix(COMMAND_PREFIX) else {
            return;
        };
        let (word, args) = match rest.split_once(' ') {
            Some((word, args)) => (word, args),
            None => (rest, ""),
        };
        if self.debug {
            println!("{nick} issued: {word} {args}");
        }

        let mut ctx = CommandContext {
            root: &self.root,
            queue: &mut self.queue,
            nick,
            bot_nick: &self.nick,
        };
        for line in self.dispatcher.dispatch(word, args, &mut ctx) {
            self.send(ChatCommand::Reply(line));
        }
    }

    /// Clock tick: start the next queued transfer if the engine is free.
    /// A request whose file can no longer be opened is dropped with a log
    /// line; the requester finds out when no offer arrives.
    pub async fn on_tick(&mut self) {
        if !self.engine.is_idle() {
            return;
        }
        let Some(request) = self.queue.pop() else {
            return;
        };

        let nick = request.nick.clone();
        match self.engine.begin(request, self.advertise).await {
            Ok(offer) => {
                println!("offering {} to {nick} ({} bytes)", offer.file_name, offer.size);
                self.send(ChatCommand::Ctcp {
                    nick,
                    payload: offer.to_ctcp(),
                });
            }
            Err(e) => eprintln!("dropping request from {nick}: {e}"),
        }
    }

    /// The future the session's event loop awaits alongside chat traffic.
    /// Pends forever while no transfer is active.
    pub async fn next_transfer_event(&mut self) -> TransferEvent {
        self.engine.next_event().await
    }

    /// React to a transfer event produced by [`Self::next_transfer_event`]
    pub fn on_transfer_event(&mut self, event: &TransferEvent) {
        match event {
            TransferEvent::PeerConnected { nick, file_name } => {
                self.on_peer_connect(nick, file_name);
            }
            TransferEvent::AckReceived { nick, acked } => self.on_ack_received(nick, *acked),
            TransferEvent::Completed { nick, file_name } => {
                println!("transfer of {file_name} to {nick} complete");
            }
            TransferEvent::PeerDisconnected { nick, file_name } => {
                self.on_peer_disconnect(nick, file_name);
            }
            TransferEvent::OfferExpired { nick, file_name } => {
                eprintln!("offer of {file_name} to {nick} expired, nobody connected");
            }
            TransferEvent::Stalled { nick, file_name } => {
                eprintln!("transfer of {file_name} to {nick} stalled, aborting");
            }
            TransferEvent::Failed {
                nick,
                file_name,
                error,
            } => {
                eprintln!("transfer of {file_name} to {nick} failed: {error}");
            }
        }
    }

    fn on_peer_connect(&self, nick: &str, file_name: &str) {
        if self.debug {
            println!("{nick} connected, streaming {file_name}");
        }
    }

    fn on_peer_disconnect(&self, nick: &str, file_name: &str) {
        eprintln!("{nick} disconnected during transfer of {file_name}");
    }

    fn on_ack_received(&self, nick: &str, acked: u32) {
        if self.debug {
            println!("{nick} acked {acked} bytes");
        }
    }

    fn send(&self, command: ChatCommand) {
        if self.outbound.send(command).is_err() {
            eprintln!("outbound chat channel closed, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::seed_files;
    use tempfile::TempDir;
    use xserv_common::offer::SendOffer;

    fn bot_with_outbound(root: &TempDir) -> (ServeBot, mpsc::UnboundedReceiver<ChatCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bot = ServeBot::new(
            root.path().to_path_buf(),
            "xservbot".to_string(),
            Ipv4Addr::LOCALHOST,
            false,
            tx,
        );
        (bot, rx)
    }

    #[test]
    fn test_non_command_text_ignored() {
        let root = TempDir::new().unwrap();
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "hello everyone");
        bot.on_chat_message("alice", "ping");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_command_replies_in_order() {
        let root = TempDir::new().unwrap();
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "\\help");
        assert_eq!(
            rx.try_recv().unwrap(),
            ChatCommand::Reply("use \\regex , \\find and \\get".to_string())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ChatCommand::Reply("make sure to /quote dccallow +xservbot".to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_get_queues_request() {
        let root = TempDir::new().unwrap();
        seed_files(root.path(), &[("movie.mkv", 100)]);
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "\\get movie.mkv");
        assert_eq!(
            rx.try_recv().unwrap(),
            ChatCommand::Reply("your request has been queued".to_string())
        );
        assert_eq!(bot.queued(), 1);
    }

    #[tokio::test]
    async fn test_tick_emits_ctcp_offer() {
        let root = TempDir::new().unwrap();
        seed_files(root.path(), &[("movie.mkv", 1500)]);
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "\\get movie.mkv");
        let _queued_reply = rx.try_recv().unwrap();

        bot.on_tick().await;
        assert_eq!(bot.queued(), 0);
        assert!(!bot.transfer_idle());

        match rx.try_recv().unwrap() {
            ChatCommand::Ctcp { nick, payload } => {
                assert_eq!(nick, "alice");
                let offer = SendOffer::parse(&payload).unwrap();
                assert_eq!(offer.file_name, "movie.mkv");
                assert_eq!(offer.size, 1500);
                assert_eq!(offer.addr, Ipv4Addr::LOCALHOST);
            }
            other => panic!("expected offer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_tick_with_empty_queue_is_noop() {
        let root = TempDir::new().unwrap();
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_tick().await;
        assert!(bot.transfer_idle());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unopenable_request_dropped() {
        let root = TempDir::new().unwrap();
        seed_files(root.path(), &[("gone.txt", 10)]);
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "\\get gone.txt");
        let _queued_reply = rx.try_recv().unwrap();
        std::fs::remove_file(root.path().join("gone.txt")).unwrap();

        bot.on_tick().await;
        assert!(bot.transfer_idle());
        assert_eq!(bot.queued(), 0);
        // No offer goes out for a request that failed to open
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lifo_service_order() {
        let root = TempDir::new().unwrap();
        seed_files(root.path(), &[("first.txt", 1), ("second.txt", 2)]);
        let (mut bot, mut rx) = bot_with_outbound(&root);

        bot.on_chat_message("alice", "\\get first.txt");
        bot.on_chat_message("bob", "\\get second.txt");
        let _ = rx.try_recv();
        let _ = rx.try_recv();

        bot.on_tick().await;
        match rx.try_recv().unwrap() {
            ChatCommand::Ctcp { nick, .. } => assert_eq!(nick, "bob"),
            other => panic!("expected offer, got {other:?}"),
        }
        assert_eq!(bot.queued(), 1);
    }
}
