//! Follow a conversation until interrupted.

use anyhow::{Context, Result};
use chat_types::{Message, MessageId};
use std::collections::HashSet;
use std::future::Future;

use super::{format_message, open_conversation};
use crate::config::ChatConfig;

/// Run the watch command until Ctrl-C.
///
/// `interval_ms` overrides the configured poll interval.
pub async fn run(config: &ChatConfig, item: &str, interval_ms: Option<u64>) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    watch_until(config, item, interval_ms, shutdown).await
}

/// Poll `item` and print each message the first time it appears, until
/// `shutdown` completes.
pub async fn watch_until(
    config: &ChatConfig,
    item: &str,
    interval_ms: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(ms) = interval_ms {
        config.chat.poll_interval_ms = ms;
    }

    let (sync, key) = open_conversation(&config, item).await?;
    let mut updates = sync.subscribe();
    sync.start_polling(&key)
        .await
        .context("Failed to start polling")?;

    println!(
        "Watching {} every {}ms (Ctrl-C to stop)",
        key, config.chat.poll_interval_ms
    );

    let mut seen = HashSet::new();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let messages = updates.borrow_and_update().clone();
                for message in unseen(&messages, &mut seen) {
                    println!("{}", format_message(message));
                }
            }
        }
    }

    sync.stop_polling().await;
    sync.close().await;
    Ok(())
}

/// Confirmed messages not printed before. Optimistic entries are skipped;
/// their server copies print once confirmed.
fn unseen<'a>(messages: &'a [Message], seen: &mut HashSet<MessageId>) -> Vec<&'a Message> {
    messages
        .iter()
        .filter(|m| !m.is_optimistic())
        .filter(|m| seen.insert(m.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_types::SenderId;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn message(id: &str, content: &str) -> Message {
        Message {
            id: MessageId::new(id),
            content: content.into(),
            sender_id: SenderId::new("u2"),
            created_at: String::new(),
        }
    }

    #[test]
    fn unseen_prints_each_message_once() {
        let mut seen = HashSet::new();

        let first = vec![message("m1", "a"), message("m2", "b")];
        assert_eq!(unseen(&first, &mut seen).len(), 2);

        let second = vec![message("m1", "a"), message("m2", "b"), message("m3", "c")];
        let fresh = unseen(&second, &mut seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].content, "c");
    }

    #[test]
    fn unseen_skips_optimistic_entries() {
        let mut seen = HashSet::new();
        let list = vec![Message::optimistic(SenderId::new("u1"), "hi", "now".into())];
        assert!(unseen(&list, &mut seen).is_empty());
    }

    #[tokio::test]
    async fn watch_polls_until_shutdown() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/messages")
            .match_query(Matcher::UrlEncoded("item_id".into(), "item-1".into()))
            .with_status(200)
            .with_body("[]")
            .expect_at_least(2)
            .create_async()
            .await;

        let mut config = ChatConfig::default();
        config.backend.base_url = server.url();

        watch_until(
            &config,
            "item-1",
            Some(50),
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await
        .unwrap();

        mock.assert_async().await;
    }
}
