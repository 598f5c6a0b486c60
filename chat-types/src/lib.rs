//! # chat-types
//!
//! Wire format types for the Re:Value marketplace chat.
//!
//! This crate provides the foundational types used across all chat crates:
//! - [`ConversationKey`], [`SenderId`], [`MessageId`] - Identity types
//! - [`Message`], [`NewMessage`] - Message list entries and the send body
//! - [`CraftsmanRequest`], [`CraftsmanReply`] - Support panel bodies
//! - [`Item`] - Marketplace listings, whose ids key the chat threads
//! - [`Session`] - Authenticated session context
//! - [`ChatError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod items;
mod messages;
mod session;

pub use error::ChatError;
pub use ids::{ConversationKey, MessageId, SenderId, TEMP_ID_PREFIX};
pub use items::Item;
pub use messages::{CraftsmanReply, CraftsmanRequest, Message, NewMessage};
pub use session::{Session, UserProfile};
