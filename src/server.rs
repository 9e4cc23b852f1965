//! HTTP glue: axum server exposing the latest feed.
//!
//! The sheet export is pushed in by a privileged caller (`POST` with the
//! shared ingest token) and kept in memory; everyone else reads it with `GET`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::{ParserConfig, ServerConfig};
use crate::feed::{build_feed, ErrorEnvelope, FeedError, MatchFeed};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHECK_CONTEXT: &[u8] = b"matchfeed ingest token";

/// Error responses must never be served from a shared cache.
const NO_STORE: HeaderValue = HeaderValue::from_static("no-store");

/// Shared state accessible by all route handlers.
#[derive(Clone)]
pub struct FeedState {
    latest: Arc<RwLock<Option<MatchFeed>>>,
    ingest_token: Option<Arc<SecretString>>,
    parser: ParserConfig,
    cache_control: HeaderValue,
}

impl FeedState {
    pub fn new(
        parser: ParserConfig,
        server: &ServerConfig,
        ingest_token: Option<SecretString>,
    ) -> Self {
        let cache_control = HeaderValue::from_str(&format!(
            "public, max-age={}",
            server.cache_max_age_seconds
        ))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));

        Self {
            latest: Arc::new(RwLock::new(None)),
            ingest_token: ingest_token.map(Arc::new),
            parser,
            cache_control,
        }
    }

    pub async fn latest(&self) -> Option<MatchFeed> {
        self.latest.read().await.clone()
    }

    fn authorize(&self, provided: Option<&str>) -> Result<(), ApiError> {
        let Some(expected) = &self.ingest_token else {
            return Err(ApiError::IngestDisabled);
        };
        match provided {
            Some(token) if tokens_match(token, expected.expose_secret()) => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Compare two tokens in constant time.
///
/// Each token keys an HMAC over a fixed context, and the tags are compared
/// with `verify_slice`, so neither the position of the first differing byte
/// nor the length of the expected token shows up in the timing.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let tag = |key: &str| {
        HmacSha256::new_from_slice(key.as_bytes()).map(|mut mac| {
            mac.update(TOKEN_CHECK_CONTEXT);
            mac
        })
    };
    let (Ok(expected_mac), Ok(provided_mac)) = (tag(expected), tag(provided)) else {
        return false;
    };
    provided_mac
        .verify_slice(&expected_mac.finalize().into_bytes())
        .is_ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid or missing token")]
    Unauthorized,
    #[error("ingest is disabled: no token configured")]
    IngestDisabled,
    #[error("no feed has been ingested yet")]
    NotReady,
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::IngestDisabled => StatusCode::UNAUTHORIZED,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            Self::Feed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized | Self::IngestDisabled => "Unauthorized",
            Self::NotReady => "Feed not ready",
            Self::Feed(_) => "Failed to parse data",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope::new(self.kind(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct IngestParams {
    pub token: Option<String>,
}

pub fn router(state: FeedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/matches", get(latest_handler).post(ingest_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(state: FeedState, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind feed server on {addr}"))?;
    info!(addr, "Feed server listening");

    axum::serve(listener, router(state))
        .await
        .context("Feed server error")
}

// -- Route Handlers --

async fn health_handler(State(state): State<FeedState>) -> impl IntoResponse {
    let latest = state.latest.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "matches": latest.as_ref().map_or(0, |feed| feed.matches.len()),
        "last_update": latest.as_ref().map(|feed| feed.last_update.clone()),
    }))
}

async fn latest_handler(State(state): State<FeedState>) -> Response {
    match state.latest().await {
        Some(feed) => with_cache_headers(&state, Json(feed).into_response()),
        None => with_cache_headers(&state, ApiError::NotReady.into_response()),
    }
}

async fn ingest_handler(
    State(state): State<FeedState>,
    Query(params): Query<IngestParams>,
    body: String,
) -> Response {
    let response = match ingest(&state, params.token.as_deref(), &body).await {
        Ok(feed) => Json(feed).into_response(),
        Err(e) => {
            warn!(error = %e, "Ingest rejected");
            e.into_response()
        }
    };
    with_cache_headers(&state, response)
}

async fn ingest(state: &FeedState, token: Option<&str>, body: &str) -> Result<MatchFeed, ApiError> {
    state.authorize(token)?;

    let feed = build_feed(body, &state.parser, Utc::now())?;
    info!(
        matches = feed.matches.len(),
        last_update = %feed.last_update,
        "Feed replaced"
    );

    *state.latest.write().await = Some(feed.clone());
    Ok(feed)
}

fn with_cache_headers(state: &FeedState, mut response: Response) -> Response {
    let cache_control = if response.status().is_success() {
        state.cache_control.clone()
    } else {
        NO_STORE
    };
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}
