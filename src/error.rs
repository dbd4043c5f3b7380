use std::io;
use std::net::AddrParseError;
use std::time::Duration;

use hickory_proto::error::ProtoError;

/// The error type for DNS client operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error while talking to an upstream server
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The DNS message could not be encoded or the response could not be decoded
    #[error("DNS protocol error: {0}")]
    Proto(#[from] ProtoError),

    /// No matching response arrived before the exchange timeout
    #[error("DNS exchange timed out after {0:?}")]
    Timeout(Duration),

    /// The name cannot be used as a DNS question
    #[error("Invalid domain name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Failed to parse an IP address for reverse lookup
    #[error("Address parse error: {0}")]
    AddrParse(#[from] AddrParseError),

    /// The lookup failed after some results were already collected
    #[error("Lookup incomplete after {} result(s): {source}", partial.len())]
    Incomplete {
        partial: Vec<String>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a failure together with the results gathered before it
    #[must_use]
    pub fn incomplete(partial: Vec<String>, source: Self) -> Self {
        Self::Incomplete {
            partial,
            source: Box::new(source),
        }
    }

    /// Returns true if the error came from a query exchange rather than from the input
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Io(_) | Self::Proto(_) | Self::Timeout(_) => true,
            Self::Incomplete { source, .. } => source.is_transport(),
            Self::InvalidName { .. } | Self::AddrParse(_) => false,
        }
    }

    /// Results collected before the failure, empty unless the error is `Incomplete`
    #[must_use]
    pub fn partial_results(&self) -> &[String] {
        match self {
            Self::Incomplete { partial, .. } => partial,
            _ => &[],
        }
    }
}

/// A specialized `Result` type for DNS client operations.
pub type Result<T> = std::result::Result<T, Error>;
