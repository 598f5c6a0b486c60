//! Print a conversation once.

use anyhow::{Context, Result};

use super::{format_message, open_conversation};
use crate::config::ChatConfig;

/// Run the list command.
pub async fn run(config: &ChatConfig, item: &str) -> Result<()> {
    let (sync, key) = open_conversation(config, item).await?;

    sync.fetch_messages(&key)
        .await
        .with_context(|| format!("Failed to fetch messages for {}", key))?;

    let messages = sync.messages().await;
    if messages.is_empty() {
        println!("No messages yet for {}.", key);
    }
    for message in &messages {
        println!("{}", format_message(message));
    }

    sync.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(server: &Server) -> ChatConfig {
        let mut config = ChatConfig::default();
        config.backend.base_url = server.url();
        config
    }

    #[tokio::test]
    async fn list_fetches_once() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/messages")
            .match_query(Matcher::UrlEncoded("item_id".into(), "item-1".into()))
            .with_status(200)
            .with_body(
                json!([{"id": "m1", "content": "hi", "sender_id": "u2", "created_at": "10:00"}])
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        run(&config_for(&server), "item-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_reports_backend_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/messages")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = run(&config_for(&server), "item-1").await.unwrap_err();
        assert!(err.to_string().contains("item-1"));
    }
}
