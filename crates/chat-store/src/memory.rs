//! In-memory snapshot store for tests and examples.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chat_core::Conversation;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::SnapshotStore;

/// A snapshot store that keeps the collection in memory.
///
/// Tracks how many saves have happened so tests can assert that an
/// operation persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    conversations: RwLock<Vec<Conversation>>,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with conversations.
    pub fn seeded(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: RwLock::new(conversations),
            save_count: AtomicUsize::new(0),
        }
    }

    /// Number of snapshot saves since creation.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        Ok(self.conversations.read().await.clone())
    }

    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()> {
        let mut stored = self.conversations.write().await;
        *stored = conversations.to_vec();
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
