//! Identity types for Re:Value chat.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ChatError;

/// Prefix carried by locally generated message ids.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// The item/listing identifier that scopes a message thread.
///
/// Opaque to the client; only required to be non-empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationKey(String);

impl ConversationKey {
    /// Create a key, rejecting empty or whitespace-only input.
    pub fn new(key: impl Into<String>) -> Result<Self, ChatError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ChatError::EmptyKey);
        }
        Ok(Self(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversationKey({})", self.0)
    }
}

/// Identifier of the user who authored a message.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    /// Create a sender id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SenderId({})", self.0)
    }
}

impl From<&str> for SenderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a single message.
///
/// Server-assigned ids are opaque strings. Optimistic entries get a
/// `temp-<uuid v4>` id that never collides with a server id.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a server-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh temporary id for an optimistic entry.
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMP_ID_PREFIX, uuid::Uuid::new_v4()))
    }

    /// Whether this id was generated locally.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_ID_PREFIX)
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_key_rejects_blank() {
        assert!(matches!(ConversationKey::new(""), Err(ChatError::EmptyKey)));
        assert!(matches!(
            ConversationKey::new("   "),
            Err(ChatError::EmptyKey)
        ));
    }

    #[test]
    fn conversation_key_keeps_raw_value() {
        let key = ConversationKey::new("item-42").unwrap();
        assert_eq!(key.as_str(), "item-42");
        assert_eq!(key.to_string(), "item-42");
    }

    #[test]
    fn temporary_ids_are_unique_and_marked() {
        let a = MessageId::temporary();
        let b = MessageId::temporary();
        assert_ne!(a, b);
        assert!(a.is_temporary());
        assert!(a.as_str().starts_with(TEMP_ID_PREFIX));
        // "temp-" + 36-char hyphenated uuid
        assert_eq!(a.as_str().len(), TEMP_ID_PREFIX.len() + 36);
    }

    #[test]
    fn server_ids_are_not_temporary() {
        assert!(!MessageId::new("msg-1").is_temporary());
        assert!(!MessageId::new("42").is_temporary());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&SenderId::new("u1")).unwrap();
        assert_eq!(json, "\"u1\"");
        let key: ConversationKey = serde_json::from_str("\"item-9\"").unwrap();
        assert_eq!(key.as_str(), "item-9");
    }
}
