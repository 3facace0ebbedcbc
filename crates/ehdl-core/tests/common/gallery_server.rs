//! Minimal HTTP/1.1 server that plays a scripted gallery site for integration tests.
//!
//! Each route owns a queue of responses; the last one repeats once the queue
//! is down to a single entry. A request whose target is not routed falls back
//! to its path without the query string, then to 404. Every connection is
//! answered with `Connection: close`.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// If false, no `Content-Length` is sent and the body ends at close.
    pub send_length: bool,
}

impl Response {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/html; charset=utf-8",
            body: body.into().into_bytes(),
            send_length: true,
        }
    }

    pub fn image(body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            content_type: "image/jpeg",
            body: body.to_vec(),
            send_length: true,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: status.as_bytes().to_vec(),
            send_length: true,
        }
    }

    pub fn without_length(mut self) -> Self {
        self.send_length = false;
        self
    }
}

/// One request as received: target plus header lines.
#[derive(Debug, Clone)]
pub struct Request {
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Routes = HashMap<String, VecDeque<Response>>;

pub struct GalleryServer {
    base: String,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl GalleryServer {
    /// Binds to an ephemeral port and serves in background threads until the
    /// process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<Mutex<Routes>> = Arc::default();
        let requests: Arc<Mutex<Vec<Request>>> = Arc::default();
        let (r, q) = (Arc::clone(&routes), Arc::clone(&requests));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let (r, q) = (Arc::clone(&r), Arc::clone(&q));
                thread::spawn(move || handle(stream, &r, &q));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            routes,
            requests,
        }
    }

    /// Absolute URL for `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn route(&self, target: &str, response: Response) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self, target: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.target == target)
            .count()
    }
}

fn next_response(routes: &Mutex<Routes>, target: &str) -> Response {
    let mut routes = routes.lock().unwrap();
    let path = target.split('?').next().unwrap_or(target);
    let key = if routes.contains_key(target) { target } else { path };
    let queue = routes.get_mut(key);
    match queue {
        Some(q) if q.len() > 1 => q.pop_front().unwrap(),
        Some(q) => q.front().cloned().unwrap(),
        None => Response::status("404 Not Found"),
    }
}

fn handle(mut stream: TcpStream, routes: &Mutex<Routes>, requests: &Mutex<Vec<Request>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let text = String::from_utf8_lossy(&raw);
    let Some(request) = parse_request(&text) else {
        return;
    };
    let response = next_response(routes, &request.target);
    requests.lock().unwrap().push(request);

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nConnection: close\r\n",
        response.status, response.content_type
    );
    if response.send_length {
        head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
}

fn parse_request(text: &str) -> Option<Request> {
    let mut lines = text.split("\r\n");
    let target = lines.next()?.split_whitespace().nth(1)?.to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();
    Some(Request { target, headers })
}
