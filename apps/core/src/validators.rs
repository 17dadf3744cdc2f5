//! Input validation and sanitization for request payloads.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

// NOTE: expect() is fine here, the patterns are constant
static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x1F\x7F-\x9F]").expect("Invalid regex: control characters")
});

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s.-]").expect("Invalid regex: unsafe filename characters")
});

const MAX_FILENAME_LEN: usize = 255;

/// Trim, strip control characters and enforce the length limit.
pub fn validate_question(question: &str, max_length: usize) -> Result<String, AppError> {
    let cleaned = CONTROL_CHARS.replace_all(question.trim(), "").trim().to_string();

    if cleaned.is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if cleaned.chars().count() > max_length {
        return Err(AppError::Validation(format!(
            "Message too long (max {} characters)",
            max_length
        )));
    }

    Ok(cleaned)
}

/// Replace path separators and other unsafe characters so the name can be
/// echoed and stored safely.
pub fn sanitize_filename(file_name: &str) -> String {
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(file_name, "_");
    let trimmed = replaced.trim_start_matches(['.', '/', '\\']);

    if trimmed.chars().count() <= MAX_FILENAME_LEN {
        return trimmed.to_string();
    }

    match trimmed.rsplit_once('.') {
        Some((name, ext)) => {
            let keep = MAX_FILENAME_LEN.saturating_sub(ext.chars().count() + 1);
            format!("{}.{}", name.chars().take(keep).collect::<String>(), ext)
        }
        None => trimmed.chars().take(MAX_FILENAME_LEN).collect(),
    }
}

pub fn validate_file_size(size: u64, max_size_mb: u64) -> Result<(), AppError> {
    if size > max_size_mb * 1024 * 1024 {
        return Err(AppError::Validation(format!(
            "File too large (max {}MB)",
            max_size_mb
        )));
    }
    Ok(())
}
