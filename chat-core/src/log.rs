//! Local message log for one conversation view.
//!
//! The log holds exactly what the view displays: the last accepted server
//! list followed by any optimistic entries still shown. It is pure data;
//! chat-client decides when to call it.
//!
//! Two merge policies are supported:
//! - [`MergePolicy::Replace`]: every accepted fetch replaces the whole
//!   list. Optimistic entries vanish on the next fetch whether or not the
//!   server has them yet, so a sent message can flash out or show twice.
//! - [`MergePolicy::Reconcile`]: each optimistic entry is kept after a
//!   fetch until the server list contains a matching entry (same sender and
//!   content) that was not already there when the entry was inserted.

use chat_types::{ConversationKey, Message};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a fetched server list is merged with optimistic entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Full replace, optimistic entries dropped on every fetch.
    #[default]
    Replace,
    /// Keep optimistic entries until the server echoes them.
    Reconcile,
}

/// An optimistic entry awaiting its server copy.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    message: Message,
    /// Matching server entries that do not confirm this one.
    baseline: usize,
}

/// The displayed message list for one conversation.
#[derive(Debug, Default)]
pub struct MessageLog {
    policy: MergePolicy,
    key: Option<ConversationKey>,
    closed: bool,
    server: Vec<Message>,
    pending: Vec<Pending>,
    visible: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log with no open conversation.
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The merge policy in use.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Open a conversation view, discarding anything shown before.
    pub fn open(&mut self, key: ConversationKey) {
        self.key = Some(key);
        self.closed = false;
        self.clear();
    }

    /// Tear the view down. Nothing is accepted until the next `open`.
    pub fn close(&mut self) {
        self.closed = true;
        self.clear();
    }

    /// The conversation currently shown.
    pub fn key(&self) -> Option<&ConversationKey> {
        self.key.as_ref()
    }

    /// Whether the view has been torn down.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether results for `key` may mutate this log.
    pub fn accepts(&self, key: &ConversationKey) -> bool {
        !self.closed && self.key.as_ref() == Some(key)
    }

    /// Merge a fetched server list.
    ///
    /// Returns `false` (and changes nothing) when the log does not accept
    /// `key`: the view was closed, or switched to another conversation
    /// while the request was in flight.
    pub fn apply_fetch(&mut self, key: &ConversationKey, server: Vec<Message>) -> bool {
        if !self.accepts(key) {
            return false;
        }

        match self.policy {
            MergePolicy::Replace => self.pending.clear(),
            MergePolicy::Reconcile => reconcile(&mut self.pending, &server),
        }
        self.server = server;
        self.rebuild();
        true
    }

    /// Append an optimistic entry.
    ///
    /// Returns `false` when the log does not accept `key`.
    pub fn push_optimistic(&mut self, key: &ConversationKey, message: Message) -> bool {
        if !self.accepts(key) {
            return false;
        }

        let baseline = count_matching(&self.server, &message);
        self.visible.push(message.clone());
        self.pending.push(Pending { message, baseline });
        true
    }

    /// Everything currently displayed, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.visible
    }

    /// Optimistic entries still displayed.
    pub fn pending(&self) -> impl Iterator<Item = &Message> {
        self.pending.iter().map(|p| &p.message)
    }

    /// Number of displayed entries.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    fn clear(&mut self) {
        self.server.clear();
        self.pending.clear();
        self.visible.clear();
    }

    fn rebuild(&mut self) {
        self.visible.clear();
        self.visible.extend(self.server.iter().cloned());
        self.visible
            .extend(self.pending.iter().map(|p| p.message.clone()));
    }
}

fn same_author_and_text(a: &Message, b: &Message) -> bool {
    a.sender_id == b.sender_id && a.content == b.content
}

fn count_matching(list: &[Message], message: &Message) -> usize {
    list.iter()
        .filter(|m| !m.is_optimistic() && same_author_and_text(m, message))
        .count()
}

/// Drop pending entries confirmed by `server`.
///
/// Identical pending entries are confirmed oldest first, one per server
/// copy beyond their baseline. Survivors have their baseline raised by the
/// number of identical entries confirmed ahead of them, so the server
/// copies consumed this round are not counted again on the next fetch.
fn reconcile(pending: &mut Vec<Pending>, server: &[Message]) {
    // (sender, content) -> (earlier identical entries this pass, confirmed so far)
    let mut seen: HashMap<(String, String), (usize, usize)> = HashMap::new();

    pending.retain_mut(|p| {
        let available = count_matching(server, &p.message);
        let slot = seen
            .entry((
                p.message.sender_id.as_str().to_string(),
                p.message.content.clone(),
            ))
            .or_insert((0, 0));
        let (rank, confirmed) = *slot;

        if available > p.baseline + rank {
            *slot = (rank + 1, confirmed + 1);
            false
        } else {
            p.baseline += confirmed;
            *slot = (rank + 1, confirmed);
            true
        }
    });
}
