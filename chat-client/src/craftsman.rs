//! Support chat with the resident craftsman.
//!
//! A single running transcript, seeded with a greeting. Only one question
//! may be in flight at a time; asks made while waiting are ignored. Failures
//! never reach the caller: they become an apology line in the transcript.

use chat_types::CraftsmanRequest;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::Backend;

/// First line of every transcript.
pub const GREETING: &str = "Hello. I'm Yamada, the Re:Value resident craftsman. \
Having trouble with a repair? Ask me anything, however small.";

/// Shown when the backend answers without reply text.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm a little hard of hearing... could you say that again?";

/// Shown when the request fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, the connection seems off. Give it a moment and talk to me again.";

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The local user.
    User,
    /// The craftsman.
    Craftsman,
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Position-independent id, increasing.
    pub id: u64,
    /// Who said it.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
}

#[derive(Debug)]
struct Transcript {
    entries: Vec<ChatEntry>,
    loading: bool,
    next_id: u64,
}

impl Transcript {
    fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> ChatEntry {
        let entry = ChatEntry {
            id: self.next_id,
            speaker,
            text: text.into(),
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        entry
    }
}

/// Clears the loading flag when an ask ends, including when the caller
/// drops the ask before the backend answers. An unanswered question gets
/// the apology line so the transcript never ends on the user.
struct PendingAnswer<'a> {
    transcript: &'a Mutex<Transcript>,
    answered: bool,
}

impl PendingAnswer<'_> {
    fn answer(&mut self, text: String) -> ChatEntry {
        self.answered = true;
        let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
        transcript.loading = false;
        transcript.push(Speaker::Craftsman, text)
    }
}

impl Drop for PendingAnswer<'_> {
    fn drop(&mut self) {
        if self.answered {
            return;
        }
        let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
        transcript.loading = false;
        tracing::debug!("Craftsman question abandoned before an answer arrived");
        transcript.push(Speaker::Craftsman, APOLOGY_REPLY);
    }
}

/// Question-and-answer chat with the craftsman.
pub struct CraftsmanChat<B: Backend> {
    backend: B,
    transcript: Mutex<Transcript>,
}

impl<B: Backend> CraftsmanChat<B> {
    /// Start a transcript holding only the greeting.
    pub fn new(backend: B) -> Self {
        let mut transcript = Transcript {
            entries: Vec::new(),
            loading: false,
            next_id: 1,
        };
        transcript.push(Speaker::Craftsman, GREETING);
        Self {
            backend,
            transcript: Mutex::new(transcript),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask the craftsman `text`.
    ///
    /// Returns the craftsman's entry, or `None` when the ask was ignored
    /// (blank text, or another question still waiting). Dropping the future
    /// before it completes is treated like a failed request.
    pub async fn ask(&self, text: &str) -> Option<ChatEntry> {
        if text.trim().is_empty() {
            return None;
        }
        let mut pending = {
            let mut transcript = self.lock();
            if transcript.loading {
                tracing::debug!("Craftsman is still answering, ignoring question");
                return None;
            }
            transcript.loading = true;
            transcript.push(Speaker::User, text);
            PendingAnswer {
                transcript: &self.transcript,
                answered: false,
            }
        };

        let request = CraftsmanRequest {
            message: text.to_string(),
        };
        let answer = match self.backend.ask_craftsman(&request).await {
            Ok(reply) => reply
                .text()
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Craftsman chat failed");
                APOLOGY_REPLY.to_string()
            }
        };

        Some(pending.answer(answer))
    }

    /// The whole transcript, oldest first.
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.lock().entries.clone()
    }

    /// Whether a question is waiting for an answer.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Get a reference to the underlying backend (for testing).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MockBackend};
    use std::sync::Arc;
    use std::time::Duration;

    fn texts(chat: &CraftsmanChat<MockBackend>) -> Vec<String> {
        chat.entries().into_iter().map(|e| e.text).collect()
    }

    #[test]
    fn starts_with_greeting() {
        let chat = CraftsmanChat::new(MockBackend::new());
        let entries = chat.entries();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].speaker, Speaker::Craftsman);
        assert_eq!(entries[0].text, GREETING);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn reply_is_appended_after_question() {
        let backend = MockBackend::new();
        backend.queue_craftsman_reply(Some("Try saddle soap first."));
        let chat = CraftsmanChat::new(backend.clone());

        let reply = chat.ask("How do I clean leather?").await.unwrap();

        assert_eq!(reply.speaker, Speaker::Craftsman);
        assert_eq!(reply.text, "Try saddle soap first.");
        assert_eq!(
            texts(&chat),
            vec![GREETING, "How do I clean leather?", "Try saddle soap first."]
        );
        assert_eq!(chat.entries()[1].speaker, Speaker::User);
        assert_eq!(
            backend.craftsman_requests()[0].message,
            "How do I clean leather?"
        );
    }

    #[tokio::test]
    async fn missing_or_empty_reply_uses_fallback() {
        let backend = MockBackend::new();
        backend.queue_craftsman_reply(None);
        backend.queue_craftsman_reply(Some(""));
        let chat = CraftsmanChat::new(backend);

        assert_eq!(chat.ask("one").await.unwrap().text, FALLBACK_REPLY);
        assert_eq!(chat.ask("two").await.unwrap().text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn failure_becomes_apology() {
        let backend = MockBackend::new();
        backend.fail_next_craftsman(BackendError::Status(502));
        let chat = CraftsmanChat::new(backend);

        let reply = chat.ask("hello?").await.unwrap();

        assert_eq!(reply.text, APOLOGY_REPLY);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn blank_question_is_ignored() {
        let backend = MockBackend::new();
        let chat = CraftsmanChat::new(backend.clone());

        assert!(chat.ask("  ").await.is_none());
        assert_eq!(chat.entries().len(), 1);
        assert!(backend.craftsman_requests().is_empty());
    }

    #[tokio::test]
    async fn question_while_loading_is_ignored() {
        let backend = MockBackend::new();
        backend.queue_craftsman_reply(Some("First answer."));
        let gate = backend.hold_craftsman();
        let chat = Arc::new(CraftsmanChat::new(backend.clone()));

        let first = {
            let chat = Arc::clone(&chat);
            tokio::spawn(async move { chat.ask("first").await })
        };
        while backend.craftsman_requests().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(chat.is_loading());

        assert!(chat.ask("second").await.is_none());

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap().text, "First answer.");
        assert_eq!(texts(&chat), vec![GREETING, "first", "First answer."]);
        assert_eq!(backend.craftsman_requests().len(), 1);
    }

    #[tokio::test]
    async fn abandoned_question_does_not_block_the_next() {
        let backend = MockBackend::new();
        backend.hold_craftsman();
        let chat = CraftsmanChat::new(backend.clone());

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), chat.ask("first")).await;
        assert!(abandoned.is_err());
        assert!(!chat.is_loading());
        assert_eq!(texts(&chat), vec![GREETING, "first", APOLOGY_REPLY]);

        backend.reset();
        backend.queue_craftsman_reply(Some("Second answer."));
        let reply = chat.ask("second").await.unwrap();

        assert_eq!(reply.text, "Second answer.");
        assert_eq!(chat.entries().len(), 5);
    }

    #[tokio::test]
    async fn entry_ids_increase() {
        let chat = CraftsmanChat::new(MockBackend::new());
        chat.ask("a").await;
        chat.ask("b").await;

        let ids: Vec<u64> = chat.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
