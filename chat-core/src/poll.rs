//! Polling state machine for the message synchronizer.
//!
//! This module provides a pure, side-effect-free state machine for the
//! poll timer lifecycle. It takes events as input and produces a new state
//! plus a list of actions to execute.
//!
//! The actual timer (a spawned tokio task) is owned by chat-client, not by
//! this module. This enables instant unit testing without a runtime.

use chat_types::ConversationKey;
use std::time::Duration;

/// Default interval between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Poll timer state machine - NO I/O, just state transitions.
///
/// `generation` increases on every start so a tick from a cancelled timer
/// can be told apart from the live one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// No timer running.
    Inactive {
        /// Generation of the most recently started timer.
        generation: u64,
    },
    /// A timer is fetching `key` every interval.
    Active {
        /// Conversation being polled.
        key: ConversationKey,
        /// Generation of the running timer.
        generation: u64,
    },
    /// The conversation view was torn down.
    Closed {
        /// Generation of the last timer before teardown.
        generation: u64,
    },
}

impl PollState {
    /// Create a state machine with no timer running.
    pub fn new() -> Self {
        Self::Inactive { generation: 0 }
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (chat-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: PollEvent) -> (Self, Vec<PollAction>) {
        match (self, event) {
            (Self::Inactive { generation }, PollEvent::Start { key, interval }) => {
                let generation = generation.wrapping_add(1);
                (
                    Self::Active {
                        key: key.clone(),
                        generation,
                    },
                    vec![PollAction::StartTimer {
                        key,
                        interval,
                        generation,
                    }],
                )
            }
            // Switching keys (or restarting the same key) always drops the old timer first
            (Self::Active { generation, .. }, PollEvent::Start { key, interval }) => {
                let generation = generation.wrapping_add(1);
                (
                    Self::Active {
                        key: key.clone(),
                        generation,
                    },
                    vec![
                        PollAction::CancelTimer,
                        PollAction::StartTimer {
                            key,
                            interval,
                            generation,
                        },
                    ],
                )
            }

            (Self::Active { generation, .. }, PollEvent::Stop) => {
                (Self::Inactive { generation }, vec![PollAction::CancelTimer])
            }
            (Self::Active { generation, .. }, PollEvent::Closed) => {
                (Self::Closed { generation }, vec![PollAction::CancelTimer])
            }
            (Self::Inactive { generation }, PollEvent::Closed) => {
                (Self::Closed { generation }, vec![])
            }

            (Self::Closed { generation }, PollEvent::Reopened) => {
                (Self::Inactive { generation }, vec![])
            }

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a timer is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Check if the view has been torn down.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// The conversation currently being polled, if any.
    pub fn active_key(&self) -> Option<&ConversationKey> {
        match self {
            Self::Active { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether a tick from the timer with `generation` should still fetch.
    pub fn is_current(&self, generation: u64) -> bool {
        matches!(self, Self::Active { generation: g, .. } if *g == generation)
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that drive the poll timer lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// Begin polling `key` every `interval`.
    Start {
        /// Conversation to poll.
        key: ConversationKey,
        /// Delay between ticks.
        interval: Duration,
    },
    /// Stop polling.
    Stop,
    /// The conversation view closed.
    Closed,
    /// A new conversation view opened after a close.
    Reopened,
}

/// Actions to be executed by chat-client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    /// Abort the running timer task.
    CancelTimer,
    /// Spawn a timer task.
    StartTimer {
        /// Conversation to fetch on each tick.
        key: ConversationKey,
        /// Delay between ticks.
        interval: Duration,
        /// Generation the task must present on each tick.
        generation: u64,
    },
}
