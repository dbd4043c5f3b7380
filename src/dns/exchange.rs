use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use hickory_proto::op::{Message, MessageType, OpCode, Query};

use super::DEFAULT_TIMEOUT;
use crate::types::{Answer, Question};
use crate::{Error, Result};

/// Receive buffer size for UDP responses
const MAX_RESPONSE_SIZE: usize = 4096;

/// One query-and-response round trip against a single upstream server.
///
/// Implementations must honor `timeout` for the whole exchange. Every
/// error returned here is treated as a transport failure and may be
/// retried against another server.
#[cfg_attr(test, mockall::automock)]
pub trait Exchange: Send + Sync {
    /// Send `question` to `server` (`host:port`) and return the answer section
    ///
    /// # Errors
    /// Returns an error if the server cannot be reached, does not answer in
    /// time, or answers with a message that cannot be decoded
    fn exchange(&self, question: &Question, server: &str, timeout: Duration) -> Result<Vec<Answer>>;
}

/// Blocking exchange over UDP, one socket per exchange
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpExchange;

impl UdpExchange {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn build_query(question: &Question, id: u16) -> Result<Vec<u8>> {
        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .add_query(Query::query(
                question.name().clone(),
                question.record_type().into(),
            ));
        Ok(message.to_vec()?)
    }

    fn resolve_server(server: &str) -> Result<SocketAddr> {
        server.to_socket_addrs()?.next().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {server}"),
            ))
        })
    }

    fn bind_for(peer: SocketAddr) -> io::Result<UdpSocket> {
        if peer.is_ipv4() {
            UdpSocket::bind("0.0.0.0:0")
        } else {
            UdpSocket::bind("[::]:0")
        }
    }

    fn is_timeout(err: &io::Error) -> bool {
        matches!(
            err.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        )
    }
}

impl Exchange for UdpExchange {
    fn exchange(&self, question: &Question, server: &str, timeout: Duration) -> Result<Vec<Answer>> {
        let timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        let peer = Self::resolve_server(server)?;
        let id = rand::random::<u16>();
        let query = Self::build_query(question, id)?;

        let socket = Self::bind_for(peer)?;
        socket.connect(peer)?;
        socket.set_write_timeout(Some(timeout))?;
        socket.send(&query).map_err(|e| {
            if Self::is_timeout(&e) {
                Error::Timeout(timeout)
            } else {
                Error::Io(e)
            }
        })?;

        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; MAX_RESPONSE_SIZE];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout(timeout));
            }
            socket.set_read_timeout(Some(remaining))?;

            let len = match socket.recv(&mut buf) {
                Ok(len) => len,
                Err(e) if Self::is_timeout(&e) => return Err(Error::Timeout(timeout)),
                Err(e) => return Err(Error::Io(e)),
            };

            let response = match Message::from_vec(&buf[..len]) {
                Ok(response) => response,
                Err(e) => {
                    log::trace!("discarding undecodable datagram from {peer}: {e}");
                    continue;
                }
            };
            if response.id() != id || response.message_type() != MessageType::Response {
                log::trace!(
                    "discarding response with id {} while waiting for {id}",
                    response.id()
                );
                continue;
            }

            return Ok(response.answers().iter().map(Answer::from).collect());
        }
    }
}
