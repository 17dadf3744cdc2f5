use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{ClientAddr, SharedState};
use crate::error::AppError;
use crate::history::chat_title;
use crate::models::ChatMessage;
use crate::validators::validate_question;

pub const BACKEND_APOLOGY: &str = "I'm having trouble connecting to my mining knowledge base. Please try again in a moment. The backend AI system might be starting up.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// `POST /api/chat`
///
/// The body is parsed by hand so a missing or non-string `message` is a 400
/// while a body that is not JSON at all stays a 500.
pub async fn chat(
    State(state): State<SharedState>,
    ClientAddr(client): ClientAddr,
    body: Bytes,
) -> Result<Response, AppError> {
    state.check_rate(&client)?;

    let body: Value = serde_json::from_slice(&body)?;
    let raw = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;
    let question = validate_question(raw, state.config.max_question_length)?;
    let session_id = body
        .get("sessionId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    let answer = match &state.backend {
        Some(backend) => match backend.ask(&question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Chat backend unavailable: {}", e);
                let fallback = json!({
                    "response": BACKEND_APOLOGY,
                    "success": false,
                    "error": "Backend unavailable",
                });
                return Ok(Json(fallback).into_response());
            }
        },
        None => state.resolver.resolve(&question),
    };

    let settings = state.history.settings().await?;
    let session_id = if settings.save_history {
        let messages = vec![
            ChatMessage::user(question.as_str()),
            ChatMessage::assistant(answer.as_str()),
        ];
        let session = state
            .history
            .record(session_id, chat_title(&question), messages)
            .await?;
        Some(session.id)
    } else {
        session_id.map(str::to_string)
    };

    info!(client = %client, chars = question.chars().count(), "Answered chat message");
    Ok(Json(ChatReply {
        response: answer,
        session_id,
    })
    .into_response())
}
