//! Send a message to a conversation.

use anyhow::{Context, Result};
use chat_types::SenderId;

use super::{format_message, open_conversation};
use crate::config::ChatConfig;

/// Run the send command.
///
/// `sender` overrides the configured sender id.
pub async fn run(config: &ChatConfig, item: &str, sender: Option<&str>, text: &str) -> Result<()> {
    let sender_id = sender
        .map(SenderId::from)
        .or_else(|| config.sender_id())
        .context("No sender id. Pass --sender or set chat.sender_id or [session] in the config.")?;

    let (sync, key) = open_conversation(config, item).await?;

    let result = sync.send_message(&key, &sender_id, text).await;

    // The list reflects the read-back, whether or not the post went through
    for message in sync.messages().await {
        println!("{}", format_message(&message));
    }
    sync.close().await;

    let temp_id = result.with_context(|| format!("Failed to send message to {}", key))?;
    tracing::debug!(temp_id = %temp_id, "Send complete");
    Ok(())
}
