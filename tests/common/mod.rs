//! Shared helpers for the integration tests: a scripted UDP DNS server and
//! a transport that redirects every exchange to it.

#![allow(dead_code)]

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dnsclient::{Answer, Exchange, Question, Result, UdpExchange};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::Record;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What the fake server sends back for one query
pub struct Reply {
    pub code: ResponseCode,
    pub answers: Vec<Record>,
}

impl Reply {
    pub fn answers(answers: Vec<Record>) -> Self {
        Self {
            code: ResponseCode::NoError,
            answers,
        }
    }

    pub fn nx_domain() -> Self {
        Self {
            code: ResponseCode::NXDomain,
            answers: Vec::new(),
        }
    }
}

/// Spawn a loopback DNS server that answers with `handler` until it has
/// been idle for a few seconds
pub fn spawn_server<F>(handler: F) -> SocketAddr
where
    F: Fn(&Query) -> Reply + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind UDP socket");
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("Failed to set read timeout");
    let addr = socket.local_addr().unwrap();

    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        while let Ok((len, from)) = socket.recv_from(&mut buf) {
            let request = Message::from_vec(&buf[..len]).expect("Malformed query");
            let query = request.queries()[0].clone();
            let reply = handler(&query);

            let mut response = Message::new();
            response
                .set_id(request.id())
                .set_message_type(MessageType::Response)
                .set_op_code(OpCode::Query)
                .set_recursion_desired(request.recursion_desired())
                .set_recursion_available(true)
                .set_response_code(reply.code)
                .add_query(query)
                .add_answers(reply.answers);
            let bytes = response.to_vec().expect("Failed to encode response");
            socket.send_to(&bytes, from).unwrap();
        }
    });

    addr
}

/// A socket that is bound but never answers
pub fn silent_server() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind UDP socket");
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}

/// Sends every exchange to `target` while recording which configured
/// server the client picked
#[derive(Clone)]
pub struct Redirect {
    target: SocketAddr,
    attempts: Arc<AtomicUsize>,
    picked: Arc<Mutex<Vec<String>>>,
}

impl Redirect {
    pub fn to(target: SocketAddr) -> Self {
        Self {
            target,
            attempts: Arc::new(AtomicUsize::new(0)),
            picked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn picked(&self) -> Vec<String> {
        self.picked.lock().unwrap().clone()
    }
}

impl Exchange for Redirect {
    fn exchange(&self, question: &Question, server: &str, timeout: Duration) -> Result<Vec<Answer>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.picked.lock().unwrap().push(server.to_string());
        UdpExchange::new().exchange(question, &self.target.to_string(), timeout)
    }
}
