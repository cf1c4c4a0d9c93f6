//! Out-of-band file transfers: the pending-request queue and the
//! single-transfer send engine

pub mod engine;
pub mod queue;

pub use engine::{TransferEngine, TransferError, TransferEvent};
pub use queue::{TransferQueue, TransferRequest};
