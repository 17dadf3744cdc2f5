use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use super::SharedState;

/// `GET /api/health`: 503 when the store cannot be reached.
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let store = match state.store.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(e) => {
            error!("Store health check failed: {}", e);
            format!("error: {}", e)
        }
    };
    let healthy = store == "healthy";
    let overall = if healthy { "healthy" } else { "unhealthy" };
    let backend = if state.backend.is_some() { "configured" } else { "disabled" };

    let body = json!({
        "status": overall,
        "timestamp": Utc::now().to_rfc3339(),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
        "checks": {
            "store": store,
            "knowledgeBase": state.resolver.knowledge().entries.len(),
            "backend": backend,
        },
    });

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

pub async fn status(State(state): State<SharedState>) -> Json<Value> {
    let kb = state.resolver.knowledge();
    Json(json!({
        "mode": state.config.chat_mode.label(),
        "domain": kb.domain,
        "knowledgeEntries": kb.entries.len(),
        "categories": kb.categories.len(),
        "greetingMatch": state.config.greeting_match,
        "backendUrl": state.backend.as_ref().map(|b| b.endpoint().as_str()),
    }))
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "MineGPT API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat": ["/api/chat", "/api/sessions", "/api/settings"],
            "upload": ["/api/upload"],
            "payment": ["/api/payment/process", "/api/payment/orders"],
            "health": ["/api/health", "/api/status"],
        },
    }))
}
