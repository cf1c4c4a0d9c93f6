//! Chunked send engine
//!
//! Drives a single transfer at a time through `Idle -> Listening ->
//! Streaming` and back. The engine announces an offer, waits for the
//! requester to connect on an ephemeral port, then streams the file in
//! chunks of up to 1024 bytes. Flow control is ack-driven: each inbound
//! 4-byte cumulative count triggers the next chunk, and a count equal to
//! the total size completes the transfer.
//!
//! The event future is raced against chat traffic in a select loop, so it
//! can be dropped and re-created at any await point. All transfer
//! progress therefore lives in [`State`], never in the future itself: a
//! chunk waiting to go out sits in the `outbox` until the socket takes
//! it, and an ack that calls for the next chunk sets `need_chunk` before
//! anything is awaited. A fresh poll picks up exactly where the dropped
//! one stopped.
//!
//! The engine deliberately does not verify that acknowledgments advance
//! or line up with bytes sent. A wildly wrong ack is logged by the caller
//! and answered with the next chunk; only the exact total completes the
//! transfer. `bytes_acked` is tracked monotonically for observability.
//!
//! Both waiting states carry a deadline so a peer that never connects or
//! never acks cannot hold the queue hostage: the transfer expires and the
//! next queued request proceeds on a later tick.

use std::fmt;
use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{self, Duration, Instant};

use xserv_common::CHUNK_SIZE;
use xserv_common::ack::AckDecoder;
use xserv_common::offer::SendOffer;

use crate::constants::{OFFER_TIMEOUT, STALL_TIMEOUT};
use crate::transfers::queue::TransferRequest;

/// Transfer failure. Aborts the current transfer only, never the process.
#[derive(Debug)]
pub enum TransferError {
    /// The source file could not be opened
    Open { path: PathBuf, source: io::Error },
    /// No listening socket could be bound
    Bind(io::Error),
    /// Socket or file I/O failed mid-transfer
    Io(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
            Self::Bind(e) => write!(f, "cannot bind listener: {e}"),
            Self::Io(e) => write!(f, "transfer I/O error: {e}"),
        }
    }
}

impl std::error::Error for TransferError {}

/// Something happened on the active transfer's socket
#[derive(Debug)]
pub enum TransferEvent {
    /// The requester connected; streaming has begun
    PeerConnected { nick: String, file_name: String },
    /// An acknowledgment arrived (not the final one)
    AckReceived { nick: String, acked: u32 },
    /// The final acknowledgment arrived; the transfer is done
    Completed { nick: String, file_name: String },
    /// The peer closed the connection before the transfer finished
    PeerDisconnected { nick: String, file_name: String },
    /// Nobody connected within the offer window
    OfferExpired { nick: String, file_name: String },
    /// No acknowledgment arrived within the stall window
    Stalled { nick: String, file_name: String },
    /// I/O failed; the transfer was aborted
    Failed {
        nick: String,
        file_name: String,
        error: TransferError,
    },
}

enum State {
    Idle,
    Listening {
        listener: TcpListener,
        request: TransferRequest,
        file: File,
        size: u64,
        deadline: Instant,
    },
    Streaming {
        stream: TcpStream,
        request: TransferRequest,
        file: File,
        size: u64,
        sent: u64,
        acked: u64,
        decoder: AckDecoder,
        deadline: Instant,
        /// Chunk bytes read from the file but not yet written to the peer
        outbox: Vec<u8>,
        /// An ack asked for the next chunk and it has not been loaded yet
        need_chunk: bool,
    },
}

/// What a single poll of the active socket produced. Separated from the
/// state so the state can be replaced after the borrow ends. Every await
/// that produces one of these is cancel-safe; the follow-up mutation
/// happens synchronously in the same poll.
enum Polled {
    Accepted(TcpStream),
    Wrote(usize),
    Loaded(Vec<u8>),
    Ack(u32),
    MoreBytes,
    Closed,
    Expired,
    Stalled,
    Failed(TransferError),
}

/// Single-transfer send engine
pub struct TransferEngine {
    state: State,
    offer_timeout: Duration,
    stall_timeout: Duration,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferEngine {
    pub fn new() -> Self {
        Self::with_timeouts(OFFER_TIMEOUT, STALL_TIMEOUT)
    }

    pub fn with_timeouts(offer_timeout: Duration, stall_timeout: Duration) -> Self {
        Self {
            state: State::Idle,
            offer_timeout,
            stall_timeout,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Cumulative bytes acknowledged by the peer, clamped to the total size
    pub fn bytes_acked(&self) -> u64 {
        match &self.state {
            State::Streaming { acked, .. } => *acked,
            _ => 0,
        }
    }

    /// Start serving a request: open the file, bind an ephemeral listener,
    /// and return the offer to announce to the requester.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if the file cannot be opened or no listener
    /// can be bound. The engine stays idle and the request is dropped.
    pub async fn begin(
        &mut self,
        request: TransferRequest,
        advertise: Ipv4Addr,
    ) -> Result<SendOffer, TransferError> {
        let file = File::open(&request.path)
            .await
            .map_err(|source| TransferError::Open {
                path: request.path.clone(),
                source,
            })?;
        let size = file.metadata().await.map_err(TransferError::Io)?.len();

        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(TransferError::Bind)?;
        let port = listener.local_addr().map_err(TransferError::Bind)?.port();

        let offer = SendOffer {
            file_name: request.file_name.clone(),
            addr: advertise,
            port,
            size,
        };

        self.state = State::Listening {
            listener,
            request,
            file,
            size,
            deadline: Instant::now() + self.offer_timeout,
        };

        Ok(offer)
    }

    /// Wait for the next transfer event. Pends forever while idle, so this
    /// is safe to poll from a select loop alongside chat traffic, and safe
    /// to drop at any point: pending work is resumed on the next call.
    pub async fn next_event(&mut self) -> TransferEvent {
        loop {
            let polled = match &mut self.state {
                State::Idle => {
                    std::future::pending::<()>().await;
                    unreachable!("pending future resolved")
                }
                State::Listening {
                    listener, deadline, ..
                } => {
                    tokio::select! {
                        accepted = listener.accept() => match accepted {
                            Ok((stream, _)) => Polled::Accepted(stream),
                            Err(e) => Polled::Failed(TransferError::Io(e)),
                        },
                        _ = time::sleep_until(*deadline) => Polled::Expired,
                    }
                }
                State::Streaming {
                    stream,
                    file,
                    decoder,
                    deadline,
                    outbox,
                    need_chunk,
                    ..
                } => {
                    if !outbox.is_empty() {
                        // Drain the pending chunk before anything else. The
                        // stall deadline still applies: a peer that acked
                        // but stopped reading must not hold the queue.
                        tokio::select! {
                            wrote = stream.write(outbox.as_slice()) => match wrote {
                                Ok(0) => Polled::Failed(TransferError::Io(
                                    io::ErrorKind::WriteZero.into(),
                                )),
                                Ok(n) => Polled::Wrote(n),
                                Err(e) => Polled::Failed(TransferError::Io(e)),
                            },
                            _ = time::sleep_until(*deadline) => Polled::Stalled,
                        }
                    } else if *need_chunk {
                        let mut buf = [0u8; CHUNK_SIZE];
                        match file.read(&mut buf).await {
                            Ok(n) => Polled::Loaded(buf[..n].to_vec()),
                            Err(e) => Polled::Failed(TransferError::Io(e)),
                        }
                    } else if let Some(ack) = decoder.next() {
                        Polled::Ack(ack)
                    } else {
                        let mut buf = [0u8; 64];
                        tokio::select! {
                            read = stream.read(&mut buf) => match read {
                                Ok(0) => Polled::Closed,
                                Ok(n) => {
                                    decoder.push(&buf[..n]);
                                    Polled::MoreBytes
                                }
                                Err(e) => Polled::Failed(TransferError::Io(e)),
                            },
                            _ = time::sleep_until(*deadline) => Polled::Stalled,
                        }
                    }
                }
            };

            match polled {
                Polled::MoreBytes => continue,
                Polled::Accepted(stream) => return self.start_streaming(stream),
                Polled::Wrote(n) => {
                    if let State::Streaming { outbox, sent, .. } = &mut self.state {
                        outbox.drain(..n);
                        *sent += n as u64;
                    }
                    continue;
                }
                Polled::Loaded(bytes) => {
                    if let State::Streaming {
                        outbox, need_chunk, ..
                    } = &mut self.state
                    {
                        *need_chunk = false;
                        *outbox = bytes;
                    }
                    continue;
                }
                Polled::Ack(ack) => match self.apply_ack(ack) {
                    Some(event) => return event,
                    None => continue,
                },
                Polled::Closed => {
                    let request = self.abort();
                    return TransferEvent::PeerDisconnected {
                        nick: request.nick,
                        file_name: request.file_name,
                    };
                }
                Polled::Expired => {
                    let request = self.abort();
                    return TransferEvent::OfferExpired {
                        nick: request.nick,
                        file_name: request.file_name,
                    };
                }
                Polled::Stalled => {
                    let request = self.abort();
                    return TransferEvent::Stalled {
                        nick: request.nick,
                        file_name: request.file_name,
                    };
                }
                Polled::Failed(error) => {
                    let request = self.abort();
                    return TransferEvent::Failed {
                        nick: request.nick,
                        file_name: request.file_name,
                        error,
                    };
                }
            }
        }
    }

    /// The peer connected: move to Streaming with the first chunk marked
    /// for loading. A zero-byte file completes right here; nothing will
    /// ever be written, so no ack can arrive.
    fn start_streaming(&mut self, stream: TcpStream) -> TransferEvent {
        let State::Listening {
            request, file, size, ..
        } = std::mem::replace(&mut self.state, State::Idle)
        else {
            unreachable!("start_streaming outside Listening");
        };

        if size == 0 {
            return TransferEvent::Completed {
                nick: request.nick,
                file_name: request.file_name,
            };
        }

        let event = TransferEvent::PeerConnected {
            nick: request.nick.clone(),
            file_name: request.file_name.clone(),
        };

        self.state = State::Streaming {
            stream,
            request,
            file,
            size,
            sent: 0,
            acked: 0,
            decoder: AckDecoder::new(),
            deadline: Instant::now() + self.stall_timeout,
            outbox: Vec::new(),
            need_chunk: true,
        };

        event
    }

    /// Apply one acknowledgment. Synchronous: the chunk it calls for is
    /// loaded and written by later polls, off the `need_chunk` flag.
    fn apply_ack(&mut self, ack: u32) -> Option<TransferEvent> {
        let done = {
            let State::Streaming {
                size,
                acked,
                deadline,
                ..
            } = &mut self.state
            else {
                return None;
            };
            // Monotone, clamped. Tracked for observability only.
            *acked = (*acked).max(u64::from(ack)).min(*size);
            *deadline = Instant::now() + self.stall_timeout;
            u64::from(ack) == *size
        };

        if done {
            let request = self.abort();
            return Some(TransferEvent::Completed {
                nick: request.nick,
                file_name: request.file_name,
            });
        }

        let State::Streaming {
            need_chunk, request, ..
        } = &mut self.state
        else {
            return None;
        };
        *need_chunk = true;
        Some(TransferEvent::AckReceived {
            nick: request.nick.clone(),
            acked: ack,
        })
    }

    /// Drop the active transfer's socket and file and return to Idle
    fn abort(&mut self) -> TransferRequest {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Listening { request, .. } | State::Streaming { request, .. } => request,
            State::Idle => unreachable!("abort while idle"),
        }
    }
}
