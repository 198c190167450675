//! Snapshot persistence for ReRide conversations.
//!
//! The conversation service writes the whole collection on every change
//! rather than diffing, so the store contract is a pair of full-snapshot
//! operations. Two implementations are provided:
//!
//! - [`JsonSnapshotStore`] - a JSON file on disk
//! - [`MemoryStore`] - in-memory, for tests and examples
//!
//! # Example
//!
//! ```no_run
//! use chat_store::{JsonSnapshotStore, SnapshotStore};
//!
//! # async fn example() -> Result<(), chat_store::StoreError> {
//! let store = JsonSnapshotStore::new("conversations.json");
//! let conversations = store.load_conversations().await?;
//! store.save_conversations(&conversations).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod json;
mod memory;

pub use error::{Result, StoreError};
pub use json::JsonSnapshotStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chat_core::Conversation;

/// Full-snapshot persistence for the conversation collection.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the full conversation collection. Called once at startup to
    /// hydrate the registry; an absent snapshot loads as empty.
    async fn load_conversations(&self) -> Result<Vec<Conversation>>;

    /// Persist the full conversation collection, replacing the previous
    /// snapshot.
    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()>;
}
