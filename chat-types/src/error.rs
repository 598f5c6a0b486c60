//! Error types for Re:Value chat.

use thiserror::Error;

/// Errors raised while building or decoding chat types.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Conversation key was empty
    #[error("conversation key must not be empty")]
    EmptyKey,

    /// Message content was empty after trimming
    #[error("message content must not be empty")]
    EmptyContent,

    /// JSON body did not match the expected shape
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}
