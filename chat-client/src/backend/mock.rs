//! Mock backend for testing.
//!
//! Keeps per-conversation server lists in memory, records every request,
//! and can be told to fail or hold the next call.

use super::{Backend, BackendError};
use async_trait::async_trait;
use chat_types::{
    ConversationKey, CraftsmanReply, CraftsmanRequest, Item, Message, MessageId, NewMessage,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Mock backend for testing.
///
/// Created messages are stored and show up in later `list_messages()`
/// calls, the way the real backend persists them.
#[derive(Debug, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    lists: HashMap<ConversationKey, Vec<Message>>,
    next_id: u64,
    list_requests: Vec<ConversationKey>,
    create_requests: Vec<NewMessage>,
    craftsman_requests: Vec<CraftsmanRequest>,
    craftsman_replies: VecDeque<CraftsmanReply>,
    items: Vec<Item>,
    item_requests: usize,
    fail_next_list: Option<BackendError>,
    fail_next_create: Option<BackendError>,
    fail_next_craftsman: Option<BackendError>,
    fail_next_items: Option<BackendError>,
    create_gate: Option<Arc<Notify>>,
    craftsman_gate: Option<Arc<Notify>>,
}

impl MockBackend {
    /// Create a new mock backend with no stored messages.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a message as if another participant had sent it.
    pub fn seed_message(&self, key: &ConversationKey, sender_id: &str, content: &str) {
        let mut inner = self.lock();
        inner.next_id += 1;
        let message = Message {
            id: MessageId::new(format!("srv-{}", inner.next_id)),
            content: content.to_string(),
            sender_id: sender_id.into(),
            created_at: format!("2026-01-01 10:{:02}", inner.next_id % 60),
        };
        inner.lists.entry(key.clone()).or_default().push(message);
    }

    /// The server-side list for `key`.
    pub fn server_messages(&self, key: &ConversationKey) -> Vec<Message> {
        self.lock().lists.get(key).cloned().unwrap_or_default()
    }

    /// Every key passed to `list_messages()`, in call order.
    pub fn list_requests(&self) -> Vec<ConversationKey> {
        self.lock().list_requests.clone()
    }

    /// Every body passed to `create_message()`, in call order.
    pub fn create_requests(&self) -> Vec<NewMessage> {
        self.lock().create_requests.clone()
    }

    /// Every body passed to `ask_craftsman()`, in call order.
    pub fn craftsman_requests(&self) -> Vec<CraftsmanRequest> {
        self.lock().craftsman_requests.clone()
    }

    /// Queue a reply for the next `ask_craftsman()` call.
    ///
    /// With nothing queued the call returns a reply without text.
    pub fn queue_craftsman_reply(&self, reply: Option<&str>) {
        self.lock().craftsman_replies.push_back(CraftsmanReply {
            reply: reply.map(str::to_string),
        });
    }

    /// Add a listing returned by `list_items()`.
    pub fn seed_item(&self, item: Item) {
        self.lock().items.push(item);
    }

    /// Number of `list_items()` calls so far.
    pub fn item_requests(&self) -> usize {
        self.lock().item_requests
    }

    /// Cause the next `list_items()` to fail with the given error.
    pub fn fail_next_items(&self, error: BackendError) {
        self.lock().fail_next_items = Some(error);
    }

    /// Cause the next `list_messages()` to fail with the given error.
    pub fn fail_next_list(&self, error: BackendError) {
        self.lock().fail_next_list = Some(error);
    }

    /// Cause the next `create_message()` to fail with the given error.
    pub fn fail_next_create(&self, error: BackendError) {
        self.lock().fail_next_create = Some(error);
    }

    /// Cause the next `ask_craftsman()` to fail with the given error.
    pub fn fail_next_craftsman(&self, error: BackendError) {
        self.lock().fail_next_craftsman = Some(error);
    }

    /// Hold every `create_message()` until the returned gate is notified.
    ///
    /// The request is recorded before the call blocks.
    pub fn hold_creates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().create_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Hold every `ask_craftsman()` until the returned gate is notified.
    pub fn hold_craftsman(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().craftsman_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Clear all state (stored lists, recorded requests, failures).
    pub fn reset(&self) {
        *self.lock() = MockBackendInner::default();
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_messages(&self, key: &ConversationKey) -> Result<Vec<Message>, BackendError> {
        let mut inner = self.lock();
        inner.list_requests.push(key.clone());

        // Check for forced failure
        if let Some(error) = inner.fail_next_list.take() {
            return Err(error);
        }

        Ok(inner.lists.get(key).cloned().unwrap_or_default())
    }

    async fn create_message(&self, message: &NewMessage) -> Result<(), BackendError> {
        let gate = {
            let mut inner = self.lock();
            inner.create_requests.push(message.clone());
            inner.create_gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.lock();
        if let Some(error) = inner.fail_next_create.take() {
            return Err(error);
        }

        inner.next_id += 1;
        let stored = Message {
            id: MessageId::new(format!("srv-{}", inner.next_id)),
            content: message.content.clone(),
            sender_id: message.sender_id.clone(),
            created_at: format!("2026-01-01 10:{:02}", inner.next_id % 60),
        };
        inner
            .lists
            .entry(message.item_id.clone())
            .or_default()
            .push(stored);
        Ok(())
    }

    async fn ask_craftsman(
        &self,
        request: &CraftsmanRequest,
    ) -> Result<CraftsmanReply, BackendError> {
        let gate = {
            let mut inner = self.lock();
            inner.craftsman_requests.push(request.clone());
            inner.craftsman_gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.lock();
        if let Some(error) = inner.fail_next_craftsman.take() {
            return Err(error);
        }

        Ok(inner.craftsman_replies.pop_front().unwrap_or_default())
    }

    async fn list_items(&self) -> Result<Vec<Item>, BackendError> {
        let mut inner = self.lock();
        inner.item_requests += 1;

        if let Some(error) = inner.fail_next_items.take() {
            return Err(error);
        }

        Ok(inner.items.clone())
    }
}
