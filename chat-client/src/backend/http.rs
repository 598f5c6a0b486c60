//! HTTP backend for the marketplace API.
//!
//! JSON over HTTP(S) via reqwest. An `Authorization: Bearer` header is
//! attached only while a [`Session`] is active.

use super::{Backend, BackendError};
use async_trait::async_trait;
use chat_types::{
    ConversationKey, CraftsmanReply, CraftsmanRequest, Item, Message, NewMessage, Session,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Per-request timeout when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

/// Configuration for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the marketplace API, without a trailing path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpBackendConfig {
    /// Create a configuration for the API at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Backend that talks to the marketplace API over HTTP.
#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    session: RwLock<Option<Session>>,
}

impl HttpBackend {
    /// Create a backend with no active session.
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            session: RwLock::new(None),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start attaching `session`'s bearer token to every request.
    pub fn begin_session(&self, session: Session) {
        tracing::info!(user = %session.user().id, "Session started");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the active session, if any.
    pub fn end_session(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            tracing::info!(user = %session.user().id, "Session ended");
        }
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session() {
            Some(session) => request.header(AUTHORIZATION, session.bearer()),
            None => request,
        }
    }
}

/// Map any non-2xx status to a failure.
fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status(status.as_u16()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_messages(&self, key: &ConversationKey) -> Result<Vec<Message>, BackendError> {
        let request = self
            .client
            .get(self.url("/messages"))
            .query(&[("item_id", key.as_str())]);
        let response = ensure_success(self.authorize(request).send().await?)?;
        let body = response.bytes().await?;

        Message::list_from_json(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn create_message(&self, message: &NewMessage) -> Result<(), BackendError> {
        let request = self.client.post(self.url("/messages")).json(message);
        ensure_success(self.authorize(request).send().await?)?;
        Ok(())
    }

    async fn ask_craftsman(
        &self,
        request: &CraftsmanRequest,
    ) -> Result<CraftsmanReply, BackendError> {
        let builder = self.client.post(self.url("/craftsman-chat")).json(request);
        let response = ensure_success(self.authorize(builder).send().await?)?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, BackendError> {
        let request = self.client.get(self.url("/items"));
        let response = ensure_success(self.authorize(request).send().await?)?;
        let body = response.bytes().await?;

        Item::list_from_json(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_types::UserProfile;

    #[test]
    fn config_strips_trailing_slash() {
        let config = HttpBackendConfig::new("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn config_builder_pattern() {
        let config =
            HttpBackendConfig::new("http://api").with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn session_lifecycle() {
        let backend = HttpBackend::new(HttpBackendConfig::new("http://api")).unwrap();
        assert!(backend.session().is_none());

        backend.begin_session(Session::new(
            "tok",
            UserProfile {
                id: "u1".into(),
                name: "Aoi".into(),
                email: None,
            },
        ));
        assert_eq!(backend.session().unwrap().token(), "tok");

        backend.end_session();
        assert!(backend.session().is_none());
    }

    #[test]
    fn url_joins_paths() {
        let backend = HttpBackend::new(HttpBackendConfig::new("http://api/")).unwrap();
        assert_eq!(backend.url("/messages"), "http://api/messages");
        assert_eq!(backend.base_url(), "http://api");
    }
}
