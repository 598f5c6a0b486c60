//! MessageSynchronizer - keeps one conversation view in step with the backend.
//!
//! This module provides [`MessageSynchronizer`], which polls a remote
//! message list on a fixed interval and shows the local sender's own
//! messages before the backend confirms them.
//!
//! # Architecture
//!
//! The synchronizer uses pure state (from chat-core) for the poll timer
//! lifecycle and the displayed list, and interprets the poll actions to
//! run the actual timer task and HTTP calls via the Backend trait.
//!
//! ```text
//! View → MessageSynchronizer → Backend → Network
//!               ↓
//!        chat-core (PollState, MessageLog)
//! ```
//!
//! Poll ticks and send-triggered fetches are not ordered against each
//! other; whichever response lands last is what the view shows. Both are
//! full-list replacements, so either outcome is a valid server snapshot.
//!
//! # Example
//!
//! ```ignore
//! use chat_client::{MessageSynchronizer, SynchronizerConfig, MockBackend};
//!
//! let sync = MessageSynchronizer::new(SynchronizerConfig::default(), MockBackend::new());
//! let key = ConversationKey::new("item-1")?;
//!
//! sync.open(key.clone()).await;
//! sync.start_polling(&key).await?;
//! sync.send_message(&key, &"u1".into(), "hello").await?;
//! sync.close().await;
//! ```

use chat_core::{MergePolicy, MessageLog, PollAction, PollEvent, PollState, DEFAULT_POLL_INTERVAL};
use chat_types::{ChatError, ConversationKey, Message, MessageId, NewMessage, SenderId};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::backend::{Backend, BackendError};
use crate::notify::{LogNotifier, Notifier};

/// Display format for client-side timestamps on optimistic entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend error.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Invalid input.
    #[error("invalid input: {0}")]
    Validation(#[from] ChatError),

    /// Message text was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,

    /// The conversation view has been closed.
    #[error("conversation view is closed")]
    Closed,

    /// The conversation is not the one currently open.
    #[error("conversation {0} is not open")]
    NotOpen(ConversationKey),
}

/// Configuration for MessageSynchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynchronizerConfig {
    /// Delay between poll ticks.
    pub poll_interval: Duration,
    /// How fetched lists are merged with optimistic entries.
    pub merge: MergePolicy,
}

impl Default for SynchronizerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            merge: MergePolicy::Replace,
        }
    }
}

impl SynchronizerConfig {
    /// Set the poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the merge policy.
    pub fn with_merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }
}

/// State shared between the synchronizer and its poll task.
struct Shared<B: Backend> {
    backend: B,
    notifier: Arc<dyn Notifier>,
    view: Mutex<View>,
    updates: watch::Sender<Vec<Message>>,
}

struct View {
    log: MessageLog,
    poll: PollState,
}

impl View {
    fn transition(&mut self, event: PollEvent) -> Vec<PollAction> {
        let (next, actions) = std::mem::take(&mut self.poll).on_event(event);
        self.poll = next;
        actions
    }
}

impl<B: Backend> Shared<B> {
    fn publish(&self, log: &MessageLog) {
        self.updates.send_replace(log.messages().to_vec());
    }

    async fn fetch(&self, key: &ConversationKey) -> Result<(), ClientError> {
        match self.backend.list_messages(key).await {
            Ok(messages) => {
                let count = messages.len();
                let mut view = self.view.lock().await;
                if view.log.apply_fetch(key, messages) {
                    tracing::debug!(key = %key, count, "Fetched messages");
                    self.publish(&view.log);
                } else {
                    tracing::debug!(key = %key, "Dropping fetch result for a view that moved on");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to fetch messages");
                Err(e.into())
            }
        }
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.view.lock().await.poll.is_current(generation)
    }
}

/// Keeps a conversation's displayed messages in step with the backend.
///
/// Dropping the synchronizer cancels its poll task.
pub struct MessageSynchronizer<B: Backend> {
    config: SynchronizerConfig,
    shared: Arc<Shared<B>>,
    timer: StdMutex<Option<JoinHandle<()>>>,
}

impl<B: Backend> MessageSynchronizer<B> {
    /// Create a synchronizer that logs user alerts.
    pub fn new(config: SynchronizerConfig, backend: B) -> Self {
        Self::with_notifier(config, backend, Arc::new(LogNotifier))
    }

    /// Create a synchronizer that shows user alerts through `notifier`.
    pub fn with_notifier(
        config: SynchronizerConfig,
        backend: B,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            config,
            shared: Arc::new(Shared {
                backend,
                notifier,
                view: Mutex::new(View {
                    log: MessageLog::new(config.merge),
                    poll: PollState::new(),
                }),
                updates,
            }),
            timer: StdMutex::new(None),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SynchronizerConfig {
        &self.config
    }

    /// Open the view for `key` with an empty list.
    ///
    /// Any previous view, including its poll timer, is torn down first.
    pub async fn open(&self, key: ConversationKey) {
        let mut view = self.shared.view.lock().await;
        let mut actions = view.transition(PollEvent::Closed);
        actions.extend(view.transition(PollEvent::Reopened));
        self.execute(actions);

        tracing::info!(key = %key, "Conversation opened");
        view.log.open(key);
        self.shared.publish(&view.log);
    }

    /// Tear the view down.
    ///
    /// Stops polling and discards the list. Responses still in flight are
    /// dropped when they arrive.
    pub async fn close(&self) {
        let mut view = self.shared.view.lock().await;
        let actions = view.transition(PollEvent::Closed);
        self.execute(actions);

        if let Some(key) = view.log.key() {
            tracing::info!(key = %key, "Conversation closed");
        }
        view.log.close();
        self.shared.publish(&view.log);
    }

    /// Fetch the full list for `key` once and replace the displayed list.
    ///
    /// On failure the displayed list is left as it was and the error is
    /// logged. Results for a key that is no longer open are discarded.
    pub async fn fetch_messages(&self, key: &ConversationKey) -> Result<(), ClientError> {
        self.shared.fetch(key).await
    }

    /// Send `text` as `sender_id` in conversation `key`.
    ///
    /// The message is shown immediately under a temporary id, then posted,
    /// then the list is fetched again whatever the post's outcome. A failed
    /// post alerts the user once and is returned as an error; the temporary
    /// entry is not rolled back. Returns the temporary id.
    pub async fn send_message(
        &self,
        key: &ConversationKey,
        sender_id: &SenderId,
        text: &str,
    ) -> Result<MessageId, ClientError> {
        let body = NewMessage::new(key.clone(), sender_id.clone(), text).map_err(|e| match e {
            ChatError::EmptyContent => ClientError::EmptyMessage,
            other => ClientError::Validation(other),
        })?;

        let created_at = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let optimistic = Message::optimistic(sender_id.clone(), text, created_at);
        let temp_id = optimistic.id.clone();
        {
            let mut view = self.shared.view.lock().await;
            if view.log.is_closed() {
                return Err(ClientError::Closed);
            }
            if !view.log.push_optimistic(key, optimistic) {
                return Err(ClientError::NotOpen(key.clone()));
            }
            self.shared.publish(&view.log);
        }

        let posted = self.shared.backend.create_message(&body).await;
        match &posted {
            Ok(()) => tracing::debug!(key = %key, temp_id = %temp_id, "Message posted"),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to post message");
                self.shared
                    .notifier
                    .alert(&format!("Could not send your message: {}", e));
            }
        }

        // Already logged inside fetch; the post result is what the caller needs
        let _ = self.shared.fetch(key).await;

        posted.map(|()| temp_id).map_err(ClientError::from)
    }

    /// Fetch `key` now and then every poll interval.
    ///
    /// Any running timer is cancelled first. If `key` is not the open
    /// conversation, the view switches to it with an empty list.
    pub async fn start_polling(&self, key: &ConversationKey) -> Result<(), ClientError> {
        let mut view = self.shared.view.lock().await;
        if view.log.is_closed() {
            return Err(ClientError::Closed);
        }
        if view.log.key() != Some(key) {
            view.log.open(key.clone());
            self.shared.publish(&view.log);
        }

        let actions = view.transition(PollEvent::Start {
            key: key.clone(),
            interval: self.config.poll_interval,
        });
        self.execute(actions);
        Ok(())
    }

    /// Cancel the poll timer, if one is running.
    pub async fn stop_polling(&self) {
        let mut view = self.shared.view.lock().await;
        let actions = view.transition(PollEvent::Stop);
        self.execute(actions);
    }

    /// Whether a poll timer is running.
    pub async fn is_polling(&self) -> bool {
        self.shared.view.lock().await.poll.is_active()
    }

    /// The conversation currently open, if any.
    pub async fn current_key(&self) -> Option<ConversationKey> {
        let view = self.shared.view.lock().await;
        if view.log.is_closed() {
            None
        } else {
            view.log.key().cloned()
        }
    }

    /// Snapshot of the displayed list.
    pub async fn messages(&self) -> Vec<Message> {
        self.shared.view.lock().await.log.messages().to_vec()
    }

    /// Watch every change to the displayed list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.shared.updates.subscribe()
    }

    /// Get a reference to the underlying backend (for testing).
    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// Run poll actions. Called with the view lock held so two concurrent
    /// starts cannot leave an orphaned timer behind.
    fn execute(&self, actions: Vec<PollAction>) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        for action in actions {
            match action {
                PollAction::CancelTimer => {
                    if let Some(handle) = timer.take() {
                        handle.abort();
                        tracing::info!("Polling stopped");
                    }
                }
                PollAction::StartTimer {
                    key,
                    interval,
                    generation,
                } => {
                    if let Some(stale) = timer.take() {
                        stale.abort();
                    }
                    *timer = Some(spawn_poll_task(
                        Arc::clone(&self.shared),
                        key,
                        interval,
                        generation,
                    ));
                }
            }
        }
    }
}

impl<B: Backend> Drop for MessageSynchronizer<B> {
    fn drop(&mut self) {
        let timer = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

/// Spawn the poll task for one timer generation.
///
/// Fetch failures are left for the next tick; there is no backoff.
fn spawn_poll_task<B: Backend>(
    shared: Arc<Shared<B>>,
    key: ConversationKey,
    period: Duration,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            key = %key,
            interval_ms = period.as_millis() as u64,
            "Polling started"
        );

        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;

            if !shared.is_current(generation).await {
                break;
            }
            if shared.fetch(&key).await.is_err() {
                tracing::debug!(key = %key, "Poll tick failed, retrying next tick");
            }
        }
    })
}
