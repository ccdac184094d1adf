// Configuration loading and parsing (config/client.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::push::ReconnectPolicy;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// client.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire client.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ClientFile {
    api: ApiSection,
    push: PushSection,
    polling: PollingSection,
    queue: QueueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiSection {
    base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
struct PushSection {
    ws_url: String,
    max_reconnect_attempts: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct PollingSection {
    draft_status_secs: u64,
    queue_secs: u64,
    champion_page_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct QueueSection {
    guild_id: String,
    queue_type: String,
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

/// The public config assembled from client.toml sections.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the HTTP API, including the `/api` prefix.
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// WebSocket URL for the push channel.
    pub ws_url: String,
    pub reconnect: ReconnectPolicy,
    /// Fixed poll interval for the draft status endpoint while a draft
    /// view is open.
    pub status_poll: Duration,
    /// Slower poll interval for the queue/stats screen.
    pub queue_poll: Duration,
    pub champion_page_limit: u32,
    pub guild_id: String,
    pub queue_type: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/client.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("client.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;

    let file: ClientFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        api_base_url: file.api.base_url.trim_end_matches('/').to_string(),
        request_timeout: Duration::from_secs(file.api.request_timeout_secs),
        ws_url: file.push.ws_url,
        reconnect: ReconnectPolicy {
            max_attempts: file.push.max_reconnect_attempts,
            initial_backoff: Duration::from_millis(file.push.initial_backoff_ms),
            max_backoff: Duration::from_millis(file.push.max_backoff_ms),
        },
        status_poll: Duration::from_secs(file.polling.draft_status_secs),
        queue_poll: Duration::from_secs(file.polling.queue_secs),
        champion_page_limit: file.polling.champion_page_limit,
        guild_id: file.queue.guild_id,
        queue_type: file.queue.queue_type,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/client.toml` exists by copying it from `defaults/`
/// when missing. Returns true if the file was copied.
pub fn ensure_config_file(base_dir: &Path) -> Result<bool, ConfigError> {
    let target = base_dir.join("config").join("client.toml");
    if target.exists() {
        return Ok(false);
    }

    let source = base_dir.join("defaults").join("client.toml");
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} found; run from the project root",
                target.display(),
                source.display()
            ),
        });
    }

    let config_dir = target.parent().unwrap_or(base_dir);
    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;

    Ok(true)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying the default file first when needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.api_base_url.starts_with("http") {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must be an http(s) URL, got `{}`", config.api_base_url),
        });
    }

    if !config.ws_url.starts_with("ws") {
        return Err(ConfigError::ValidationError {
            field: "push.ws_url".into(),
            message: format!("must be a ws(s) URL, got `{}`", config.ws_url),
        });
    }

    if config.status_poll.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "polling.draft_status_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.queue_poll.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "polling.queue_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.champion_page_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "polling.champion_page_limit".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.reconnect.initial_backoff.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "push.initial_backoff_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.reconnect.max_backoff < config.reconnect.initial_backoff {
        return Err(ConfigError::ValidationError {
            field: "push.max_backoff_ms".into(),
            message: "must be >= initial_backoff_ms".into(),
        });
    }

    if config.guild_id.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "queue.guild_id".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
