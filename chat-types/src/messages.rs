//! Message bodies exchanged with the marketplace backend.
//!
//! All bodies are JSON. [`Message`] is one entry of the list returned by
//! `GET /messages`; [`NewMessage`] is the body of `POST /messages`.

use serde::{Deserialize, Serialize};

use crate::{ChatError, ConversationKey, MessageId, SenderId};

/// One entry in a conversation's message list.
///
/// Missing `content`, `sender_id` or `created_at` fields decode as empty
/// strings so a sparse server row still renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned id, or a `temp-` id for optimistic entries
    pub id: MessageId,
    /// Free-text body
    #[serde(default)]
    pub content: String,
    /// Author of the message
    #[serde(default)]
    pub sender_id: SenderId,
    /// Display-formatted creation time
    #[serde(default)]
    pub created_at: String,
}

impl Message {
    /// Build an optimistic entry with a fresh temporary id.
    pub fn optimistic(sender_id: SenderId, content: &str, created_at: String) -> Self {
        Self {
            id: MessageId::temporary(),
            content: content.to_string(),
            sender_id,
            created_at,
        }
    }

    /// Whether this entry was inserted locally and not yet seen from the server.
    pub fn is_optimistic(&self) -> bool {
        self.id.is_temporary()
    }

    /// Decode the JSON array returned by `GET /messages`.
    pub fn list_from_json(bytes: &[u8]) -> Result<Vec<Self>, ChatError> {
        serde_json::from_slice(bytes).map_err(ChatError::Deserialization)
    }
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Conversation the message belongs to
    pub item_id: ConversationKey,
    /// Author
    pub sender_id: SenderId,
    /// Body, sent exactly as typed
    pub content: String,
}

impl NewMessage {
    /// Build a send body.
    ///
    /// Content that is empty after trimming is rejected; otherwise it is
    /// kept untrimmed.
    pub fn new(
        item_id: ConversationKey,
        sender_id: SenderId,
        content: &str,
    ) -> Result<Self, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }
        Ok(Self {
            item_id,
            sender_id,
            content: content.to_string(),
        })
    }
}

/// Body of `POST /craftsman-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftsmanRequest {
    /// The user's question
    pub message: String,
}

/// Response of `POST /craftsman-chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftsmanReply {
    /// The craftsman's answer; absent when the backend had nothing to say
    #[serde(default)]
    pub reply: Option<String>,
}

impl CraftsmanReply {
    /// The reply text, if present and non-blank.
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> ConversationKey {
        ConversationKey::new(k).unwrap()
    }

    #[test]
    fn decodes_server_list_in_order() {
        let body = br#"[
            {"id": "1", "content": "hi", "sender_id": "u1", "created_at": "10:00"},
            {"id": "2", "content": "hello", "sender_id": "u2", "created_at": "10:01"}
        ]"#;
        let list = Message::list_from_json(body).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, MessageId::new("1"));
        assert_eq!(list[1].content, "hello");
        assert_eq!(list[1].sender_id, SenderId::new("u2"));
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let list = Message::list_from_json(br#"[{"id": "7"}]"#).unwrap();
        assert_eq!(list[0].content, "");
        assert_eq!(list[0].created_at, "");
        assert_eq!(list[0].sender_id.as_str(), "");
    }

    #[test]
    fn malformed_list_is_a_typed_error() {
        let result = Message::list_from_json(br#"{"error": "nope"}"#);
        assert!(matches!(result, Err(ChatError::Deserialization(_))));
    }

    #[test]
    fn optimistic_entry_has_temporary_id() {
        let msg = Message::optimistic(SenderId::new("u1"), "hello", "now".into());
        assert!(msg.is_optimistic());
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.sender_id.as_str(), "u1");
    }

    #[test]
    fn new_message_rejects_blank_content() {
        let result = NewMessage::new(key("item-1"), SenderId::new("u1"), " \t\n");
        assert!(matches!(result, Err(ChatError::EmptyContent)));
    }

    #[test]
    fn new_message_keeps_content_untrimmed() {
        let msg = NewMessage::new(key("item-1"), SenderId::new("u1"), "  hi  ").unwrap();
        assert_eq!(msg.content, "  hi  ");
    }

    #[test]
    fn new_message_wire_shape() {
        let msg = NewMessage::new(key("item-1"), SenderId::new("u1"), "hello").unwrap();
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"item_id": "item-1", "sender_id": "u1", "content": "hello"})
        );
    }

    #[test]
    fn craftsman_reply_text_ignores_blank() {
        let empty: CraftsmanReply = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let blank = CraftsmanReply {
            reply: Some("  ".into()),
        };
        assert_eq!(blank.text(), None);

        let real: CraftsmanReply = serde_json::from_str(r#"{"reply": "Use mink oil."}"#).unwrap();
        assert_eq!(real.text(), Some("Use mink oil."));
    }
}
