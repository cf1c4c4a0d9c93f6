//! Cumulative acknowledgment codec for the transfer socket
//!
//! After each data chunk (or after accumulating several) the receiver
//! replies with a 4-byte big-endian unsigned integer: the cumulative
//! number of bytes it has received so far. The sender paces transmission
//! on these acknowledgments and treats an ack equal to the total file
//! size as completion.
//!
//! Acknowledgments may be split or batched arbitrarily by the transport,
//! so [`AckDecoder`] accumulates raw socket bytes and yields complete
//! counts as they become available.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Wire length of one acknowledgment message
pub const ACK_LENGTH: usize = 4;

/// Encode a cumulative byte count for the wire
pub fn encode_ack(count: u32) -> [u8; ACK_LENGTH] {
    count.to_be_bytes()
}

/// Decode a cumulative byte count from the wire
pub fn decode_ack(bytes: [u8; ACK_LENGTH]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Write one acknowledgment to the given writer
///
/// Used by receiving clients; the serving side only reads acks.
///
/// # Errors
///
/// Returns an error if an I/O error occurs.
pub async fn write_ack<W>(writer: &mut W, count: u32) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode_ack(count)).await?;
    writer.flush().await
}

/// Incremental decoder for a stream of acknowledgment messages
///
/// Push raw bytes as they arrive off the socket; pop complete counts with
/// [`next`](Self::next). Bytes left over from a partial message are kept
/// until the rest arrives.
#[derive(Debug, Default)]
pub struct AckDecoder {
    buf: Vec<u8>,
}

impl AckDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw socket bytes into the decoder
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete acknowledgment, if one is buffered
    pub fn next(&mut self) -> Option<u32> {
        if self.buf.len() < ACK_LENGTH {
            return None;
        }
        let mut raw = [0u8; ACK_LENGTH];
        raw.copy_from_slice(&self.buf[..ACK_LENGTH]);
        self.buf.drain(..ACK_LENGTH);
        Some(decode_ack(raw))
    }

    /// Number of buffered bytes not yet forming a complete message
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }
}
