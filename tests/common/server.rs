//! Fake Spotify Web API lifecycle management
//!
//! Serves a tiny fixed catalog over HTTP so the remote resolver can be
//! exercised without network access. Every request is recorded.

use super::constants::*;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

#[derive(Default)]
struct ApiState {
    requests: Mutex<Vec<(String, Instant)>>,
}

impl ApiState {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push((request, Instant::now()));
    }
}

/// Fake API instance on a random port.
///
/// When dropped, the server shuts down.
pub struct FakeSpotifyApi {
    /// Base URL including the `/v1` prefix (e.g., "http://127.0.0.1:12345/v1")
    pub base_url: String,

    state: Arc<ApiState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn track_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "popularity": TRACK_POPULARITY,
        "artists": [{"id": ARTIST_1_ID, "name": ARTIST_1_NAME}]
    })
}

fn known_track(id: &str) -> Option<&'static str> {
    match id {
        TRACK_1_ID => Some(TRACK_1_NAME),
        TRACK_2_ID => Some(TRACK_2_NAME),
        TRACK_BROKEN_ID => Some(TRACK_BROKEN_NAME),
        _ => None,
    }
}

async fn search(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    state.record(format!("search:{}", q));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let items: Vec<Value> = [TRACK_1_ID, TRACK_2_ID, TRACK_BROKEN_ID]
        .into_iter()
        .filter_map(|id| known_track(id).map(|name| (id, name)))
        .filter(|(_, name)| q.contains(&format!("track:{}", name)))
        .map(|(id, name)| track_json(id, name))
        .collect();
    Json(json!({"tracks": {"items": items}})).into_response()
}

async fn track(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(format!("track:{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match known_track(&id) {
        Some(name) => Json(track_json(&id, name)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn audio_features(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(format!("features:{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == TRACK_BROKEN_ID {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if known_track(&id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "id": id,
        "danceability": 0.7,
        "energy": 0.65,
        "valence": 0.8,
        "speechiness": 0.04,
        "acousticness": 0.3,
        "instrumentalness": 0.9,
        "liveness": 0.1,
        "tempo": 96.5,
        "key": 5,
        "mode": 0,
        "loudness": -9.2,
        "time_signature": 4
    }))
    .into_response()
}

async fn artist(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(format!("artist:{}", id));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != ARTIST_1_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"id": id, "name": ARTIST_1_NAME, "genres": ARTIST_1_GENRES})).into_response()
}

impl FakeSpotifyApi {
    /// Spawns the fake API on a random port and waits until it answers.
    ///
    /// # Panics
    ///
    /// Panics if the port cannot be bound or the server does not become
    /// ready within [`SERVER_READY_TIMEOUT_MS`].
    pub async fn spawn() -> Self {
        let state = Arc::new(ApiState::default());

        let app = Router::new()
            .route("/v1/search", get(search))
            .route("/v1/tracks/{id}", get(track))
            .route("/v1/audio-features/{id}", get(audio_features))
            .route("/v1/artists/{id}", get(artist))
            .with_state(state.clone());

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}/v1", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;
        server.state.requests.lock().unwrap().clear();

        server
    }

    /// Requests received so far, as `kind:argument`, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// Arrival time of every request received so far.
    pub fn request_times(&self) -> Vec<Instant> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Fake API did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            let url = format!("{}/artists/{}", self.base_url, ARTIST_1_ID);
            match client.get(url).bearer_auth(TEST_TOKEN).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for FakeSpotifyApi {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
