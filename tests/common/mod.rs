//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Status the mock backend answers with; flip it between requests.
#[derive(Clone)]
pub struct BackendStatus(Arc<AtomicU16>);

impl BackendStatus {
    pub fn set(&self, status: u16) {
        self.0.store(status, Ordering::SeqCst);
    }
}

/// Start a mock backend answering every request with the current status.
pub async fn start_switchable_backend(addr: SocketAddr, initial: u16) -> BackendStatus {
    let status = BackendStatus(Arc::new(AtomicU16::new(initial)));
    let listener = TcpListener::bind(addr).await.unwrap();

    let shared = status.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let code = shared.0.load(Ordering::SeqCst);
                    tokio::spawn(respond(socket, code));
                }
                Err(_) => break,
            }
        }
    });

    status
}

/// Start a backend that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
}

async fn respond(mut socket: TcpStream, status: u16) {
    // Consume the request head so closing does not reset the connection.
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let body = format!(r#"{{"status":"{}"}}"#, status);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// GET /health on a running instance and return the status code.
#[allow(dead_code)]
pub async fn health_status(port: u16) -> Option<u16> {
    client()
        .get(format!("http://127.0.0.1:{}/health", port))
        .header("accept", "application/json")
        .send()
        .await
        .ok()
        .map(|res| res.status().as_u16())
}

/// Poll /health until it reports `expected` or the deadline passes.
#[allow(dead_code)]
pub async fn wait_for_health(port: u16, expected: u16) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if health_status(port).await == Some(expected) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}
