//! Fake HTTP endpoints for the outbound adapters.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /analyze` — text analysis; the answer is controlled by [`Reply`]
//! - `POST /alerts` — alert webhook; every body is kept
//!
//! Every analysis request body and `Authorization` header is kept so tests
//! can check what the enricher sent.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeHttpApi::start().await.unwrap();
//! api.reply(Reply::Status(500)).await;
//! let enricher = HttpEnricher::new(api.analyze_url(), "test-model", None, Duration::from_secs(1))?;
//! ```

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify};

/// What `/analyze` answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this JSON body.
    Json(serde_json::Value),
    /// Bare status code with an empty body.
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
    /// Wait, then answer with the inner reply.
    Delayed(Duration, Box<Reply>),
}

/// One analysis request as seen by the server.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub body: serde_json::Value,
    pub authorization: Option<String>,
}

struct ApiState {
    reply: Reply,
    seen: Vec<SeenRequest>,
    alerts: Vec<serde_json::Value>,
}

type Shared = (Arc<Mutex<ApiState>>, Arc<Notify>);

/// Handle to the running fake server.
pub struct FakeHttpApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
    alert_arrived: Arc<Notify>,
}

impl FakeHttpApi {
    /// Start on a random port. `/analyze` answers with a positive result
    /// until told otherwise.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState {
            reply: Reply::Json(serde_json::json!({
                "keywords": ["release", "party"],
                "sentiment": "positive",
            })),
            seen: Vec::new(),
            alerts: Vec::new(),
        }));
        let alert_arrived = Arc::new(Notify::new());

        let app = Router::new()
            .route("/analyze", post(analyze))
            .route("/alerts", post(alert))
            .with_state((state.clone(), alert_arrived.clone()));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            addr,
            state,
            alert_arrived,
        })
    }

    /// e.g. `http://127.0.0.1:PORT/analyze`
    pub fn analyze_url(&self) -> String {
        format!("http://{}/analyze", self.addr)
    }

    pub fn alerts_url(&self) -> String {
        format!("http://{}/alerts", self.addr)
    }

    pub async fn reply(&self, reply: Reply) {
        self.state.lock().await.reply = reply;
    }

    pub async fn seen(&self) -> Vec<SeenRequest> {
        self.state.lock().await.seen.clone()
    }

    /// Wait until at least `n` alerts have arrived, or `within` elapses.
    pub async fn alerts(&self, n: usize, within: Duration) -> Vec<serde_json::Value> {
        let wait = async {
            loop {
                let notified = self.alert_arrived.notified();
                {
                    let state = self.state.lock().await;
                    if state.alerts.len() >= n {
                        return;
                    }
                }
                notified.await;
            }
        };
        let _ = tokio::time::timeout(within, wait).await;
        self.state.lock().await.alerts.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn analyze(
    State((state, _)): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let reply = {
        let mut state = state.lock().await;
        state.seen.push(SeenRequest {
            body,
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
        state.reply.clone()
    };
    render(reply).await
}

async fn alert(
    State((state, arrived)): State<Shared>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    state.lock().await.alerts.push(body);
    arrived.notify_waiters();
    StatusCode::NO_CONTENT
}

async fn render(mut reply: Reply) -> Response {
    loop {
        match reply {
            Reply::Json(body) => return Json(body).into_response(),
            Reply::Status(code) => {
                return StatusCode::from_u16(code)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
            Reply::Garbage => return (StatusCode::OK, "<html>oops</html>").into_response(),
            Reply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
        }
    }
}
