//! # chat-client
//!
//! Client library for Re:Value marketplace chat.
//!
//! This is the library that chat views use to talk to the marketplace.
//!
//! ## Features
//!
//! - **Polling Sync**: Refreshes a conversation on a fixed interval
//! - **Optimistic Send**: The sender sees their message before the round trip
//! - **Listings**: Marketplace items, with built-in samples as a fallback
//! - **Backend Abstraction**: Pluggable backend layer (HTTP, mock)
//! - **Pure State Machine**: Uses chat-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use chat_client::{HttpBackend, HttpBackendConfig, MessageSynchronizer, SynchronizerConfig};
//!
//! let backend = HttpBackend::new(HttpBackendConfig::new("http://localhost:8080"))?;
//! let sync = MessageSynchronizer::new(SynchronizerConfig::default(), backend);
//!
//! sync.open(key.clone()).await;
//! sync.start_polling(&key).await?;
//! sync.send_message(&key, &sender, "Is this still available?").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod catalog;
pub mod craftsman;
pub mod notify;
pub mod synchronizer;

pub use backend::{
    Backend, BackendError, HttpBackend, HttpBackendConfig, MockBackend, DEFAULT_REQUEST_TIMEOUT,
};
pub use catalog::{load_catalog, Catalog, CatalogSource};
pub use craftsman::{ChatEntry, CraftsmanChat, Speaker};
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use synchronizer::{ClientError, MessageSynchronizer, SynchronizerConfig};
