//! HTTP surface: shared state, router and handlers.

pub mod chat;
pub mod health;
pub mod payment;
pub mod sessions;
pub mod upload;

use axum::extract::{ConnectInfo, DefaultBodyLimit, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{async_trait, Json, Router};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::backend::BackendClient;
use crate::brain::{KnowledgeBase, ResponseResolver};
use crate::config::{AppConfig, ChatMode};
use crate::error::AppError;
use crate::history::ChatHistory;
use crate::payment::Payments;
use crate::rate_limiter::RateLimiter;
use crate::store::{MemoryStore, SqliteStore, Store};

const PRUNE_AFTER_CLIENTS: usize = 1024;

/// Everything the handlers share. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub resolver: ResponseResolver,
    pub store: Arc<dyn Store>,
    pub history: ChatHistory,
    pub payments: Payments,
    pub backend: Option<BackendClient>,
    pub limiter: Mutex<RateLimiter>,
    pub started_at: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Opens the configured store and builds the state on top of it.
    pub async fn connect(config: AppConfig) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = if config.uses_memory_store() {
            warn!("Using in-memory store; history and orders are lost on restart");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(SqliteStore::connect(&config.database_url).await?)
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, AppError> {
        config.check()?;

        let kb = match &config.knowledge_file {
            Some(path) => KnowledgeBase::from_file(path)?,
            None => KnowledgeBase::bundled(config.domain)?,
        };
        info!(
            "Knowledge base '{}' loaded: {} entries, {} categories",
            kb.domain,
            kb.entries.len(),
            kb.categories.len()
        );
        let resolver = ResponseResolver::new(Arc::new(kb), config.greeting_match)?;

        let backend = match (config.chat_mode, &config.backend_url) {
            (ChatMode::Proxy, Some(url)) => Some(BackendClient::new(url, config.backend_timeout())?),
            _ => None,
        };

        Ok(Self {
            resolver,
            history: ChatHistory::new(store.clone()),
            payments: Payments::new(store.clone(), config.payment_delay()),
            store,
            backend,
            limiter: Mutex::new(RateLimiter::new(
                config.chat_rate_limit,
                config.chat_rate_window(),
            )),
            started_at: Instant::now(),
            config,
        })
    }

    /// Counts a chat request against `client`'s window.
    pub fn check_rate(&self, client: &str) -> Result<(), AppError> {
        let mut limiter = self
            .limiter
            .lock()
            .map_err(|_| AppError::Internal("Rate limiter lock poisoned".to_string()))?;
        if limiter.tracked_clients() > PRUNE_AFTER_CLIENTS {
            limiter.prune();
        }
        if limiter.check(client) {
            Ok(())
        } else {
            warn!("Rate limit exceeded for {}", client);
            Err(AppError::RateLimited)
        }
    }
}

/// Rate-limit key: the peer IP, or the first `X-Forwarded-For` hop when
/// `TRUST_PROXY` is set. Falls back to `unknown`.
pub struct ClientAddr(pub String);

fn forwarded_for(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<SharedState> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.trust_proxy {
            if let Some(addr) = forwarded_for(parts) {
                return Ok(ClientAddr(addr));
            }
        }

        let peer = Option::<ConnectInfo<SocketAddr>>::from_request_parts(parts, state)
            .await
            .ok()
            .flatten()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        Ok(ClientAddr(peer.unwrap_or_else(|| "unknown".to_string())))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" })))
}

pub fn router(state: SharedState) -> Router {
    // Multipart framing needs headroom above the file limit; the handler
    // enforces the exact size.
    let upload_limit = (state.config.max_file_size_bytes() + 1024 * 1024) as usize;

    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/status", get(health::status))
        .route("/api/chat", post(chat::chat))
        .route(
            "/api/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/payment/process", post(payment::process))
        .route("/api/payment/orders", get(payment::orders))
        .route(
            "/api/sessions",
            get(sessions::list_sessions).delete(sessions::clear_sessions),
        )
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route(
            "/api/settings",
            get(sessions::get_settings).put(sessions::put_settings),
        )
        .fallback(not_found)
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
