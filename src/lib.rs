#![cfg_attr(docsrs, feature(doc_cfg))]

//! # dnsclient
//!
//! A small blocking DNS client that resolves host names and IP addresses
//! against a pool of upstream servers.
//!
//! - Forward lookups collect A and AAAA records, plus any CNAME targets
//! - Reverse lookups collect PTR (and CNAME) targets
//! - Every exchange goes to a randomly chosen upstream server
//! - Failed exchanges are retried a bounded number of times
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dnsclient::Client;
//! use std::time::Duration;
//!
//! let mut client = Client::new(["9.9.9.9", "149.112.112.112"]);
//! client.set_retries(3);
//! client.set_timeout(Duration::from_secs(2));
//!
//! let addresses = client.lookup_hostname("dns.quad9.net")?;
//! println!("Addresses: {addresses:?}");
//!
//! let names = client.lookup_addr("9.9.9.9")?;
//! println!("Names: {names:?}");
//! # Ok::<(), dnsclient::Error>(())
//! ```
//!
//! ## Features
//!
//! - `serde-support` - Enable serialization support for the configuration types

mod error;
mod types;

pub mod dns;

// Re-export core types
pub use error::{Error, Result};
pub use types::{Answer, Question, RecordType};

// Client and configuration
pub use dns::{Client, ClientBuilder, ClientConfig, ReverseZone};

// Transport
pub use dns::{Exchange, UdpExchange};
