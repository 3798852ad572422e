//! In-memory `ViewerDirectory` implementation.
//!
//! Stands in for the external identity collaborator: a fixed set of
//! resolvable principals, seeded at startup or by tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{ViewerDirectory, ViewerDirectoryError};
use crate::domain::viewer::{UserId, Viewer};

/// Lock-guarded in-memory directory of resolvable viewers.
#[derive(Default)]
pub struct MemoryViewerDirectory {
    viewers: RwLock<HashMap<UserId, Viewer>>,
}

impl MemoryViewerDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `viewers`.
    #[must_use]
    pub fn with_viewers(viewers: impl IntoIterator<Item = Viewer>) -> Self {
        let directory = Self::new();
        for viewer in viewers {
            directory.insert(viewer);
        }
        directory
    }

    /// Register or replace a resolvable viewer.
    pub fn insert(&self, viewer: Viewer) {
        if let Ok(mut guard) = self.viewers.write() {
            guard.insert(viewer.id.clone(), viewer);
        }
    }
}

#[async_trait]
impl ViewerDirectory for MemoryViewerDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Viewer>, ViewerDirectoryError> {
        let guard = self
            .viewers
            .read()
            .map_err(|_| ViewerDirectoryError::lookup("viewer directory lock poisoned"))?;
        Ok(guard.get(id).cloned())
    }
}
