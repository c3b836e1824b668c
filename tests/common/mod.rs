//! Shared fixtures for integration tests: a local HTTP server that
//! plays the roles of both the feed host and the chat webhook.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use feedrelay::Config;

struct FixtureState {
    feed_body: String,
    feed_available: bool,
    deliveries: Vec<Value>,
    reject_containing: Option<String>,
}

impl Default for FixtureState {
    fn default() -> Self {
        Self {
            feed_body: String::new(),
            feed_available: true,
            deliveries: Vec::new(),
            reject_containing: None,
        }
    }
}

type SharedState = Arc<Mutex<FixtureState>>;

/// Handle to a running fixture server.
pub struct Fixture {
    state: SharedState,
    base_url: String,
}

impl Fixture {
    pub fn feed_url(&self) -> String {
        format!("{}/feed.xml", self.base_url)
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/webhook?zapikey=test-token", self.base_url)
    }

    pub fn set_feed_body(&self, body: &str) {
        self.state.lock().unwrap().feed_body = body.to_string();
    }

    pub fn set_feed_available(&self, available: bool) {
        self.state.lock().unwrap().feed_available = available;
    }

    /// Make the webhook reject (HTTP 500) any payload whose text
    /// contains `marker`.
    pub fn reject_containing(&self, marker: &str) {
        self.state.lock().unwrap().reject_containing = Some(marker.to_string());
    }

    pub fn accept_all(&self) {
        self.state.lock().unwrap().reject_containing = None;
    }

    /// Payloads the webhook has accepted, in arrival order.
    pub fn deliveries(&self) -> Vec<Value> {
        self.state.lock().unwrap().deliveries.clone()
    }
}

/// Start a fixture server on an ephemeral loopback port.
pub async fn spawn_fixture() -> Fixture {
    let state: SharedState = Arc::new(Mutex::new(FixtureState::default()));

    let app = Router::new()
        .route("/feed.xml", get(serve_feed))
        .route("/webhook", post(receive_webhook))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    Fixture {
        state,
        base_url: format!("http://{}", addr),
    }
}

async fn serve_feed(State(state): State<SharedState>) -> Response {
    let state = state.lock().unwrap();

    if !state.feed_available {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    (
        [(header::CONTENT_TYPE, "application/rss+xml")],
        state.feed_body.clone(),
    )
        .into_response()
}

async fn receive_webhook(
    State(state): State<SharedState>,
    Json(payload): Json<Value>,
) -> StatusCode {
    let mut state = state.lock().unwrap();

    if let Some(marker) = &state.reject_containing {
        let text = payload
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default();
        if text.contains(marker.as_str()) {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    state.deliveries.push(payload);
    StatusCode::OK
}

/// Build an RSS document from `(guid, title, link, description)` items.
pub fn rss_feed(items: &[(&str, &str, &str, &str)]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\">\n\
           <channel>\n\
             <title>Test Feed</title>\n\
             <link>https://example.com</link>\n\
             <description>Fixture</description>\n",
    );

    for (guid, title, link, description) in items {
        body.push_str(&format!(
            "    <item>\n\
                   <guid>{guid}</guid>\n\
                   <title>{title}</title>\n\
                   <link>{link}</link>\n\
                   <description>{description}</description>\n\
                 </item>\n"
        ));
    }

    body.push_str("  </channel>\n</rss>\n");
    body
}

/// Configuration pointed at the fixture server, with test-friendly
/// timeouts.
pub fn test_config(fixture: &Fixture) -> Config {
    let mut config = Config::default();
    config.feed.url = fixture.feed_url();
    config.webhook.url = fixture.webhook_url();
    config.feed.connect_timeout_secs = 5;
    config.feed.total_timeout_secs = 10;
    config.webhook.timeout_secs = 5;
    config.relay.interval_secs = 1;
    config
}
