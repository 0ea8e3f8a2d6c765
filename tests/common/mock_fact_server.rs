//! Mock numbers endpoint for testing the HTTP fact client.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl MockResponse {
    pub fn text(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            delay_ms: 0,
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            delay_ms: 0,
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: b"error".to_vec(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

#[derive(Default)]
struct ServerState {
    responses: HashMap<String, MockResponse>,
    requests: Vec<String>,
}

/// A fact server answering `GET /{number}` from a response table.
pub struct MockFactServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockFactServer {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(ServerState::default()));
        let app = Router::new()
            .route("/{number}", get(handle_fact))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("No local addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn respond(&self, number: &str, response: MockResponse) {
        self.state
            .lock()
            .await
            .responses
            .insert(number.to_string(), response);
    }

    /// Paths requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }
}

impl Drop for MockFactServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_fact(
    State(state): State<Arc<Mutex<ServerState>>>,
    Path(number): Path<String>,
) -> (StatusCode, Vec<u8>) {
    let response = {
        let mut state = state.lock().await;
        state.requests.push(format!("/{number}"));
        state.responses.get(&number).cloned()
    };

    let Some(response) = response else {
        return (StatusCode::NOT_FOUND, Vec::new());
    };
    if response.delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(response.delay_ms)).await;
    }
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, response.body)
}
