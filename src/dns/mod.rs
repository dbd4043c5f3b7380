pub mod client;
pub mod exchange;
pub mod reverse;

// Re-export main types
pub use client::{Client, ClientBuilder};
pub use exchange::{Exchange, UdpExchange};
pub use reverse::{reverse_name, ReverseZone};

use std::time::Duration;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Port appended to every configured server host
pub const DEFAULT_PORT: u16 = 53;

/// Endpoint used when no servers are configured
pub const DEFAULT_SERVER: &str = "127.0.0.1:53";

/// Per-exchange timeout used when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Join a host and port the way URLs do, bracketing IPv6 literals
#[must_use]
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ClientConfig {
    /// Upstream server hosts, without a port
    pub servers: Vec<String>,
    /// Attempts per query stage before giving up
    pub retries: u8,
    pub timeout: Duration,
    pub ipv6_reverse: ReverseZone,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            retries: 0,
            timeout: DEFAULT_TIMEOUT,
            ipv6_reverse: ReverseZone::default(),
        }
    }
}

impl std::fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DNS Client Configuration:")?;
        writeln!(f, "  Servers:")?;
        if self.servers.is_empty() {
            writeln!(f, "    {DEFAULT_SERVER} (default)")?;
        }
        for server in &self.servers {
            writeln!(f, "    {}", join_host_port(server, DEFAULT_PORT))?;
        }
        writeln!(f, "  Retries: {}", self.retries)?;
        writeln!(f, "  Timeout: {:?}", self.timeout)?;
        writeln!(f, "  IPv6 Reverse Zone: {}", self.ipv6_reverse)
    }
}
