//! CLI command implementations.

pub mod ask;
pub mod items;
pub mod list;
pub mod sections;
pub mod send;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};
use chat_client::{HttpBackend, MessageSynchronizer, Notifier};
use chat_types::{ConversationKey, Message};
use std::sync::Arc;

use crate::config::ChatConfig;

/// Notifier that prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

/// Build an HTTP backend, with the configured session attached.
pub fn connect(config: &ChatConfig) -> Result<HttpBackend> {
    let backend =
        HttpBackend::new(config.backend_config()).context("Failed to create HTTP client")?;
    if let Some(session) = config.session() {
        backend.begin_session(session);
    }
    Ok(backend)
}

/// Build a synchronizer with the view opened on `item`.
pub async fn open_conversation(
    config: &ChatConfig,
    item: &str,
) -> Result<(MessageSynchronizer<HttpBackend>, ConversationKey)> {
    let key = ConversationKey::new(item).context("Item id must not be empty")?;
    let sync = MessageSynchronizer::with_notifier(
        config.synchronizer_config(),
        connect(config)?,
        Arc::new(StderrNotifier),
    );
    sync.open(key.clone()).await;
    Ok((sync, key))
}

/// Format one message as a transcript line.
pub fn format_message(message: &Message) -> String {
    let marker = if message.is_optimistic() { " (sending)" } else { "" };
    format!(
        "[{}] {}: {}{}",
        message.created_at, message.sender_id, message.content, marker
    )
}
