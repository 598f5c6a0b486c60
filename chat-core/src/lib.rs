//! # chat-core
//!
//! Pure logic for Re:Value chat (no I/O, instant tests).
//!
//! This crate implements the state machines and list handling behind the
//! chat views without any network I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`poll`] decides when the poll timer starts and stops
//! - [`log`] holds the displayed list and merges fetched results into it
//! - [`description`] splits listing descriptions into display sections
//!
//! The actual I/O (HTTP, timers) is performed by `chat-client`, which
//! interprets the actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod description;
pub mod log;
pub mod poll;

pub use description::{parse_sections, Section, DEFAULT_DELIMITER};
pub use log::{MergePolicy, MessageLog};
pub use poll::{PollAction, PollEvent, PollState, DEFAULT_POLL_INTERVAL};
