//! Backend abstraction for Re:Value chat.
//!
//! This module provides a pluggable backend layer that abstracts the
//! marketplace HTTP API (real HTTP, mock for testing).
//!
//! # Design
//!
//! The backend trait is async and request/response oriented:
//! - `list_messages()` fetches the full list for one conversation
//! - `create_message()` stores one message; the response body is unused
//! - `ask_craftsman()` sends one question to the support craftsman
//! - `list_items()` fetches the marketplace listings
//!
//! Every non-2xx status is a failure; no status gets special treatment.
//!
//! # Example
//!
//! ```ignore
//! let backend = MockBackend::new();
//! let key = ConversationKey::new("item-1")?;
//! let messages = backend.list_messages(&key).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpBackend, HttpBackendConfig, DEFAULT_REQUEST_TIMEOUT};
pub use mock::MockBackend;

use async_trait::async_trait;
use chat_types::{ConversationKey, CraftsmanReply, CraftsmanRequest, Item, Message, NewMessage};
use thiserror::Error;

/// Backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-2xx status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The response body did not decode.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request timed out.
    #[error("request timeout")]
    Timeout,
}

/// Backend trait for the chat endpoints of the marketplace API.
///
/// Implementations handle the underlying mechanism (HTTP, mock, etc).
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// `GET /messages?item_id={key}`: the whole list, oldest first.
    async fn list_messages(&self, key: &ConversationKey) -> Result<Vec<Message>, BackendError>;

    /// `POST /messages`: store one message.
    async fn create_message(&self, message: &NewMessage) -> Result<(), BackendError>;

    /// `POST /craftsman-chat`: ask the support craftsman a question.
    async fn ask_craftsman(
        &self,
        request: &CraftsmanRequest,
    ) -> Result<CraftsmanReply, BackendError>;

    /// `GET /items`: every listing.
    async fn list_items(&self) -> Result<Vec<Item>, BackendError>;
}
