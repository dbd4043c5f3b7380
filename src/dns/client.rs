use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::exchange::{Exchange, UdpExchange};
use super::reverse::{reverse_name, ReverseZone};
use super::{join_host_port, ClientConfig, DEFAULT_PORT, DEFAULT_SERVER, DEFAULT_TIMEOUT};
use crate::types::{Answer, Question, RecordType};
use crate::{Error, Result};

/// DNS client that spreads queries over a pool of upstream servers.
///
/// Every exchange, including each retry, goes to a server picked at random
/// from the pool. Lookups block the calling thread.
pub struct Client {
    servers: Vec<String>,
    retries: u8,
    timeout: Duration,
    ipv6_reverse: ReverseZone,
    rng: Mutex<StdRng>,
    exchange: Box<dyn Exchange>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("servers", &self.servers)
            .field("retries", &self.retries)
            .field("timeout", &self.timeout)
            .field("ipv6_reverse", &self.ipv6_reverse)
            .finish_non_exhaustive()
    }
}

fn normalize_servers<I, S>(servers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let servers: Vec<String> = servers
        .into_iter()
        .map(|host| join_host_port(host.as_ref(), DEFAULT_PORT))
        .collect();

    if servers.is_empty() {
        vec![DEFAULT_SERVER.to_string()]
    } else {
        servers
    }
}

impl Client {
    /// Create a client for the given server hosts.
    ///
    /// Each host is paired with port 53, in the order given. With no hosts
    /// the client queries `127.0.0.1:53`. Hosts are not validated here; a bad
    /// host surfaces as a transport error at query time.
    #[must_use]
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            servers: normalize_servers(servers),
            retries: 0,
            timeout: DEFAULT_TIMEOUT,
            ipv6_reverse: ReverseZone::default(),
            rng: Mutex::new(StdRng::from_entropy()),
            exchange: Box::new(UdpExchange::new()),
        }
    }

    /// Create a client from a configuration
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        let mut client = Self::new(config.servers);
        client.retries = config.retries;
        client.timeout = config.timeout;
        client.ipv6_reverse = config.ipv6_reverse;
        client
    }

    /// Create a builder for configuring the client
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The upstream endpoints, as `host:port`
    #[must_use]
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Maximum number of attempts per query stage
    #[must_use]
    pub const fn retries(&self) -> u8 {
        self.retries
    }

    pub fn set_retries(&mut self, retries: u8) {
        self.retries = retries;
    }

    /// Timeout applied to each exchange
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    #[must_use]
    pub const fn ipv6_reverse(&self) -> ReverseZone {
        self.ipv6_reverse
    }

    pub fn set_ipv6_reverse(&mut self, zone: ReverseZone) {
        self.ipv6_reverse = zone;
    }

    /// Pick an upstream server uniformly at random.
    ///
    /// With a single server it is returned without drawing from the
    /// random source.
    #[must_use]
    pub fn select_server(&self) -> &str {
        if self.servers.len() == 1 {
            return &self.servers[0];
        }

        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..self.servers.len());
        &self.servers[index]
    }

    /// Resolve the IPv4 and IPv6 addresses of `hostname`.
    ///
    /// A results come first, then AAAA results. CNAME targets are included
    /// in place, with their trailing dot. Record order is the server's order.
    /// A name without records yields an empty list.
    ///
    /// # Errors
    /// Returns the transport error if the A query exhausts its retries.
    /// If the AAAA query exhausts its retries, returns `Error::Incomplete`
    /// carrying the A results gathered so far.
    pub fn lookup_hostname(&self, hostname: &str) -> Result<Vec<String>> {
        let mut results = Vec::new();

        let question = Question::new(hostname, RecordType::A)?;
        for answer in self.query(&question)? {
            match answer {
                Answer::Cname(target) => results.push(target),
                Answer::A(ip) => results.push(ip.to_string()),
                other => log::trace!("ignoring {other:?} in answer to {question}"),
            }
        }

        let question = Question::new(hostname, RecordType::AAAA)?;
        let answers = match self.query(&question) {
            Ok(answers) => answers,
            Err(e) => return Err(Error::incomplete(results, e)),
        };
        for answer in answers {
            match answer {
                Answer::Cname(target) => results.push(target),
                Answer::Aaaa(ip) => results.push(ip.to_string()),
                other => log::trace!("ignoring {other:?} in answer to {question}"),
            }
        }

        Ok(results)
    }

    /// Reverse-resolve a textual IP address to host names.
    ///
    /// # Errors
    /// Returns `Error::AddrParse` if `address` is not an IP address, or the
    /// transport error once retries are exhausted
    pub fn lookup_addr(&self, address: &str) -> Result<Vec<String>> {
        let ip: IpAddr = address.parse()?;
        self.lookup_ip(ip)
    }

    /// Reverse-resolve an IP address to host names.
    ///
    /// PTR and CNAME targets are returned without their trailing dot.
    ///
    /// # Errors
    /// Returns the transport error once retries are exhausted
    pub fn lookup_ip(&self, ip: IpAddr) -> Result<Vec<String>> {
        let name = reverse_name(ip, self.ipv6_reverse);
        let question = Question::new(&name, RecordType::PTR)?;

        let mut results = Vec::new();
        for answer in self.query(&question)? {
            match answer {
                Answer::Ptr(target) | Answer::Cname(target) => {
                    results.push(target.trim_end_matches('.').to_string());
                }
                other => log::trace!("ignoring {other:?} in answer to {question}"),
            }
        }

        Ok(results)
    }

    /// Run one query stage: resend to a freshly picked server until an
    /// exchange succeeds or the attempt count reaches `retries`.
    ///
    /// At least one attempt is always made.
    fn query(&self, question: &Question) -> Result<Vec<Answer>> {
        let mut attempts: u16 = 0;

        loop {
            let server = self.select_server();
            log::debug!(
                "querying {server} for {question} (attempt {})",
                attempts + 1
            );

            match self.exchange.exchange(question, server, self.timeout) {
                Ok(answers) => return Ok(answers),
                Err(e) => {
                    attempts += 1;
                    if attempts >= u16::from(self.retries) {
                        log::warn!("giving up on {question} after {attempts} attempt(s): {e}");
                        return Err(e);
                    }
                    log::warn!("exchange with {server} for {question} failed: {e}");
                }
            }
        }
    }
}

/// Builder for configuring a DNS client
pub struct ClientBuilder {
    config: ClientConfig,
    seed: Option<u64>,
    exchange: Option<Box<dyn Exchange>>,
}

impl ClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            seed: None,
            exchange: None,
        }
    }

    /// Set the upstream server hosts, without ports
    #[must_use]
    pub fn servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.servers = servers
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        self
    }

    /// Set the number of attempts per query stage
    #[must_use]
    pub const fn retries(mut self, retries: u8) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the timeout for each exchange
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn ipv6_reverse(mut self, zone: ReverseZone) -> Self {
        self.config.ipv6_reverse = zone;
        self
    }

    /// Seed the server-selection random source
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the UDP transport
    #[must_use]
    pub fn exchange(mut self, exchange: impl Exchange + 'static) -> Self {
        self.exchange = Some(Box::new(exchange));
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// This function currently never returns an error but is marked as `Result` for API consistency
    pub fn build(self) -> Result<Client> {
        let mut client = Client::from_config(self.config);
        if let Some(seed) = self.seed {
            client.rng = Mutex::new(StdRng::seed_from_u64(seed));
        }
        if let Some(exchange) = self.exchange {
            client.exchange = exchange;
        }
        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
