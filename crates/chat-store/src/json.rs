//! JSON-file-backed snapshot store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chat_core::Conversation;
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::SnapshotStore;

/// A snapshot store that keeps the whole conversation collection in one
/// JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store backed by the given file path. The file does not
    /// need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot file, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let conversations: Vec<Conversation> = serde_json::from_slice(&bytes)?;
        info!(
            path = %self.path.display(),
            count = conversations.len(),
            "Loaded conversation snapshot"
        );
        Ok(conversations)
    }

    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()> {
        let json = serde_json::to_vec_pretty(conversations)?;

        // Write to a sibling file and rename, so a crash mid-write leaves
        // the previous snapshot intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(
            path = %self.path.display(),
            count = conversations.len(),
            "Saved conversation snapshot"
        );
        Ok(())
    }
}
