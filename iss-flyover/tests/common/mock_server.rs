//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers GET requests from a fixed route table (longest path prefix wins)
//! and records every request target it sees, so tests can assert which
//! stages were actually called.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub prefix: String,
    pub status: u16,
    pub body: String,
    /// Advertise more bytes than are sent, then hang up mid-body
    pub truncated: bool,
}

impl Route {
    pub fn ok(prefix: &str, body: &str) -> Self {
        Self { prefix: prefix.to_string(), status: 200, body: body.to_string(), truncated: false }
    }

    pub fn status(prefix: &str, status: u16, body: &str) -> Self {
        Self { prefix: prefix.to_string(), status, body: body.to_string(), truncated: false }
    }

    pub fn truncated(prefix: &str, status: u16, body: &str) -> Self {
        Self { truncated: true, ..Self::status(prefix, status, body) }
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<Route>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });

    MockServer { base_url: format!("http://127.0.0.1:{}", port), requests }
}

/// A loopback URL on which nothing is listening.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&head);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let route = routes
        .iter()
        .filter(|r| target.starts_with(r.prefix.as_str()))
        .max_by_key(|r| r.prefix.len());
    let (status, body, truncated) = match route {
        Some(r) => (r.status, r.body.as_str(), r.truncated),
        None => (404, "not found", false),
    };
    let declared = if truncated { body.len() + 64 } else { body.len() };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        declared,
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
