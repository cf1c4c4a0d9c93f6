//! xserv Common Library
//!
//! Shared protocol pieces for the xserv file-serving bot: the out-of-band
//! `SEND` offer announcement, the cumulative acknowledgment codec used on
//! the transfer socket, and input validators shared between the serving
//! agent and receiving clients.

pub mod ack;
pub mod offer;
pub mod validators;

/// Size of one file data chunk on the transfer socket.
///
/// The sender writes at most this many bytes per send operation, then
/// waits for the receiver's cumulative acknowledgment before sending more.
pub const CHUNK_SIZE: usize = 1024;

/// Default port for the chat network connection
pub const DEFAULT_CHAT_PORT: u16 = 6667;

/// Prefix character marking a channel message as a command for the bot
pub const COMMAND_PREFIX: char = '\\';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size() {
        // The wire protocol pacing unit is fixed at 1024 bytes
        assert_eq!(CHUNK_SIZE, 1024);
    }

    #[test]
    fn test_default_chat_port() {
        assert_eq!(DEFAULT_CHAT_PORT, 6667);
    }
}
