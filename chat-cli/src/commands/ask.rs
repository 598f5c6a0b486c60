//! Ask the resident craftsman a question.

use anyhow::Result;
use chat_client::CraftsmanChat;

use super::connect;
use crate::config::ChatConfig;

/// Run the ask command.
pub async fn run(config: &ChatConfig, question: &str) -> Result<()> {
    let chat = CraftsmanChat::new(connect(config)?);

    match chat.ask(question).await {
        Some(reply) => println!("{}", reply.text),
        None => anyhow::bail!("Question is empty"),
    }

    Ok(())
}
