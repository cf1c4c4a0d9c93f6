//! Out-of-band transfer offer announcement
//!
//! When the bot is ready to serve a queued request it announces the offer
//! to the requester over the chat connection's side channel (CTCP). The
//! announcement is textual:
//!
//! ```text
//! DCC SEND <file name> <address> <port> <size>
//! ```
//!
//! where `<address>` is the offering peer's IPv4 address encoded as a
//! 32-bit decimal number, `<port>` is the ephemeral listening port, and
//! `<size>` is the total file size in bytes. The receiver connects to the
//! advertised endpoint and the raw file bytes flow over that socket.

use std::fmt;
use std::net::Ipv4Addr;

/// Literal tag identifying a transfer offer inside a CTCP payload
pub const OFFER_TAG: &str = "SEND";

/// A transfer offer: everything the receiver needs to fetch the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOffer {
    /// Base name of the offered file (no directory components)
    pub file_name: String,
    /// IPv4 address the listener is reachable on
    pub addr: Ipv4Addr,
    /// Ephemeral port the listener was bound to
    pub port: u16,
    /// Total file size in bytes
    pub size: u64,
}

impl SendOffer {
    /// Render the offer as a CTCP payload
    pub fn to_ctcp(&self) -> String {
        format!(
            "DCC {} {} {} {} {}",
            OFFER_TAG,
            self.file_name,
            u32::from(self.addr),
            self.port,
            self.size
        )
    }

    /// Parse an offer from a CTCP payload
    ///
    /// File names containing spaces are tolerated on parse: everything
    /// between the tag and the trailing three numeric fields is taken as
    /// the name.
    ///
    /// # Errors
    ///
    /// Returns an `OfferParseError` describing the first malformed field.
    pub fn parse(payload: &str) -> Result<Self, OfferParseError> {
        let tokens: Vec<&str> = payload.split_whitespace().collect();
        if tokens.len() < 6 || tokens[0] != "DCC" || tokens[1] != OFFER_TAG {
            return Err(OfferParseError::MissingTag);
        }

        let name_end = tokens.len() - 3;
        let file_name = tokens[2..name_end].join(" ");
        if file_name.is_empty() {
            return Err(OfferParseError::MissingField);
        }

        let addr: u32 = tokens[name_end]
            .parse()
            .map_err(|_| OfferParseError::InvalidAddress)?;
        let port: u16 = tokens[name_end + 1]
            .parse()
            .map_err(|_| OfferParseError::InvalidPort)?;
        let size: u64 = tokens[name_end + 2]
            .parse()
            .map_err(|_| OfferParseError::InvalidSize)?;

        Ok(Self {
            file_name,
            addr: Ipv4Addr::from(addr),
            port,
            size,
        })
    }
}

impl fmt::Display for SendOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes) at {}:{}",
            self.file_name, self.size, self.addr, self.port
        )
    }
}

/// Parse error for offer announcements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferParseError {
    /// Payload does not begin with `DCC SEND` or is too short
    MissingTag,
    /// A required field is missing or empty
    MissingField,
    /// The address field is not a 32-bit decimal number
    InvalidAddress,
    /// The port field is not a valid port number
    InvalidPort,
    /// The size field is not a valid byte count
    InvalidSize,
}

impl fmt::Display for OfferParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingTag => "not a DCC SEND announcement",
            Self::MissingField => "missing field in announcement",
            Self::InvalidAddress => "invalid address field",
            Self::InvalidPort => "invalid port field",
            Self::InvalidSize => "invalid size field",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for OfferParseError {}
