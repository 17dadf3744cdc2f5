use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::SharedState;
use crate::analysis::{self, effective_mime_type, UploadKind};
use crate::error::AppError;
use crate::history::upload_title;
use crate::models::{ChatMessage, UploadResult};
use crate::validators::{sanitize_filename, validate_file_size};

const FILE_FIELD: &str = "file";
const SESSION_FIELD: &str = "sessionId";

struct UploadedFile {
    name: String,
    content_type: String,
    data: Vec<u8>,
}

fn multipart_error(err: MultipartError, max_size_mb: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(format!("File too large (max {}MB)", max_size_mb))
    } else {
        AppError::Internal(format!("Multipart error: {}", err.body_text()))
    }
}

/// `POST /api/upload`: multipart `file` plus an optional `sessionId`.
pub async fn upload(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::Internal(format!("Not a multipart request: {}", e.body_text())))?;
    let max_mb = state.config.max_file_size_mb;
    let mut file = None;
    let mut session_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_mb))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(FILE_FIELD) => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(e, max_mb))?;
                file = Some(UploadedFile {
                    name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some(SESSION_FIELD) => {
                let value = field.text().await.map_err(|e| multipart_error(e, max_mb))?;
                session_id = Some(value).filter(|v| !v.trim().is_empty());
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    let size = file.data.len() as u64;
    validate_file_size(size, max_mb)?;

    // The response echoes the name as uploaded; analysis and history use the
    // sanitized one.
    let file_name = sanitize_filename(&file.name);
    let mime_type = effective_mime_type(&file.content_type, &file.data);
    let kind = UploadKind::detect(&file_name, &mime_type);
    let content = kind
        .reads_content()
        .then(|| String::from_utf8_lossy(&file.data).into_owned());

    let analysis = analysis::classify(&file_name, &mime_type, size, content.as_deref());
    info!("Analyzed upload {} ({:?}, {} bytes)", file_name, kind, size);

    let settings = state.history.settings().await?;
    let session_id = if settings.save_history {
        let messages = vec![
            ChatMessage::user(format!("📎 Uploaded file: {}", file_name)),
            ChatMessage::assistant(analysis.as_str()),
        ];
        let session = state
            .history
            .record(session_id.as_deref(), upload_title(&file_name), messages)
            .await?;
        Some(session.id)
    } else {
        session_id
    };

    Ok(Json(UploadResult {
        success: true,
        file_name: file.name,
        file_type: mime_type,
        file_size: size,
        analysis,
        session_id,
    }))
}
