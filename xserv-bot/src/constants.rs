//! Shared constants

use std::time::Duration;

/// Interval between queue-draining ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long an offer stays open waiting for the requester to connect
pub const OFFER_TIMEOUT: Duration = Duration::from_secs(120);

/// How long to wait for the next acknowledgment while streaming
pub const STALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of size-annotated matches listed in a search reply
pub const MAX_LISTED_MATCHES: usize = 5;

/// Startup banner (version appended at runtime)
pub const MSG_BANNER: &str = "xserv file-serving bot v";
