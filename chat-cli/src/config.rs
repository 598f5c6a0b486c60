//! Configuration loading for revalue-chat.
//!
//! Configuration is loaded from a TOML file (default: `chat.toml` in the
//! platform config directory). Every section and key is optional.

use chat_client::{HttpBackendConfig, SynchronizerConfig};
use chat_core::MergePolicy;
use chat_types::{SenderId, Session, UserProfile};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for revalue-chat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatConfig {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendSection,
    /// Chat view configuration.
    #[serde(default)]
    pub chat: ChatSection,
    /// Logged-in session (optional).
    pub session: Option<SessionSection>,
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    /// Marketplace API base URL (default: http://localhost:8080).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Chat view configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSection {
    /// Poll interval in milliseconds (default: 3000).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Sender id used when no session is configured.
    pub sender_id: Option<String>,
    /// How fetched lists are merged with unsent messages (default: replace).
    #[serde(default)]
    pub merge: MergePolicy,
}

/// Logged-in session.
#[derive(Clone, Deserialize)]
pub struct SessionSection {
    /// Bearer token.
    pub token: String,
    /// User id, also used as the sender id.
    pub user_id: String,
    /// Display name.
    #[serde(default)]
    pub user_name: String,
    /// Email address.
    pub email: Option<String>,
}

impl std::fmt::Debug for SessionSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSection")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .finish()
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    3000
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            sender_id: None,
            merge: MergePolicy::default(),
        }
    }
}

impl ChatConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// HTTP backend settings.
    pub fn backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig::new(&self.backend.base_url)
            .with_timeout(Duration::from_secs(self.backend.timeout_secs))
    }

    /// Synchronizer settings.
    pub fn synchronizer_config(&self) -> SynchronizerConfig {
        SynchronizerConfig::default()
            .with_poll_interval(Duration::from_millis(self.chat.poll_interval_ms))
            .with_merge(self.chat.merge)
    }

    /// The configured session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.as_ref().map(|s| {
            Session::new(
                s.token.clone(),
                UserProfile {
                    id: s.user_id.clone(),
                    name: s.user_name.clone(),
                    email: s.email.clone(),
                },
            )
        })
    }

    /// Sender id for outgoing messages.
    ///
    /// The session's user id wins over `chat.sender_id`.
    pub fn sender_id(&self) -> Option<SenderId> {
        self.session()
            .map(|s| s.sender_id())
            .or_else(|| self.chat.sender_id.as_deref().map(SenderId::from))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
