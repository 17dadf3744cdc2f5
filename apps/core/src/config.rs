//! Runtime configuration, read from the environment.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::brain::{Domain, MatchMode};
use crate::error::AppError;

pub const MEMORY_DATABASE: &str = "memory";

/// How `/api/chat` produces answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Answer from the bundled knowledge base.
    Local,
    /// Forward to the external backend at `BACKEND_URL`.
    Proxy,
}

impl ChatMode {
    pub fn label(&self) -> &'static str {
        match self {
            ChatMode::Local => "local",
            ChatMode::Proxy => "proxy",
        }
    }
}

impl FromStr for ChatMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ChatMode::Local),
            "proxy" => Ok(ChatMode::Proxy),
            other => Err(AppError::Config(format!(
                "Unknown chat mode '{}' (expected local or proxy)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}' (expected pretty or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub domain: Domain,
    /// Replaces the bundled domain when set.
    pub knowledge_file: Option<PathBuf>,
    pub greeting_match: MatchMode,
    pub chat_mode: ChatMode,
    #[validate(url)]
    pub backend_url: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub backend_timeout_secs: u64,
    /// A sqlx SQLite URL, or `memory`.
    #[validate(length(min = 1))]
    pub database_url: String,
    #[validate(range(min = 1))]
    pub max_question_length: usize,
    #[validate(range(min = 1, max = 1024))]
    pub max_file_size_mb: u64,
    /// Requests per window and client. Zero disables limiting.
    pub chat_rate_limit: usize,
    #[validate(range(min = 1))]
    pub chat_rate_window_secs: u64,
    /// Key the rate limit on `X-Forwarded-For` instead of the peer address.
    pub trust_proxy: bool,
    pub payment_delay_ms: u64,
    pub allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            domain: Domain::Coal,
            knowledge_file: None,
            greeting_match: MatchMode::Substring,
            chat_mode: ChatMode::Local,
            backend_url: None,
            backend_timeout_secs: 30,
            database_url: "sqlite://data/minegpt.sqlite".to_string(),
            max_question_length: 1000,
            max_file_size_mb: 10,
            chat_rate_limit: 10,
            chat_rate_window_secs: 60,
            trust_proxy: false,
            payment_delay_ms: 500,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            log_format: LogFormat::Pretty,
        }
    }
}

/// Reads `name`, falling back to `default` when unset or blank.
fn var_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
        _ => Ok(default),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Builds the configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let allowed_origins = match optional_var("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        let config = Self {
            host: var_or("HOST", defaults.host)?,
            port: var_or("PORT", defaults.port)?,
            domain: var_or("KNOWLEDGE_DOMAIN", defaults.domain)?,
            knowledge_file: optional_var("KNOWLEDGE_FILE").map(PathBuf::from),
            greeting_match: var_or("GREETING_MATCH", defaults.greeting_match)?,
            chat_mode: var_or("CHAT_MODE", defaults.chat_mode)?,
            backend_url: optional_var("BACKEND_URL"),
            backend_timeout_secs: var_or("BACKEND_TIMEOUT_SECS", defaults.backend_timeout_secs)?,
            database_url: var_or("DATABASE_URL", defaults.database_url)?,
            max_question_length: var_or("MAX_QUESTION_LENGTH", defaults.max_question_length)?,
            max_file_size_mb: var_or("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)?,
            chat_rate_limit: var_or("CHAT_RATE_LIMIT", defaults.chat_rate_limit)?,
            chat_rate_window_secs: var_or("CHAT_RATE_WINDOW_SECS", defaults.chat_rate_window_secs)?,
            trust_proxy: var_or("TRUST_PROXY", defaults.trust_proxy)?,
            payment_delay_ms: var_or("PAYMENT_DELAY_MS", defaults.payment_delay_ms)?,
            allowed_origins,
            log_format: var_or("LOG_FORMAT", defaults.log_format)?,
        };

        config.check()?;
        Ok(config)
    }

    /// Field ranges plus the cross-field rules `validator` cannot express.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.chat_mode == ChatMode::Proxy && self.backend_url.is_none() {
            return Err(AppError::Config(
                "CHAT_MODE=proxy requires BACKEND_URL".to_string(),
            ));
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn chat_rate_window(&self) -> Duration {
        Duration::from_secs(self.chat_rate_window_secs)
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.eq_ignore_ascii_case(MEMORY_DATABASE)
    }
}
