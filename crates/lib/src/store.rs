//! # Index Store
//!
//! Owns the live [`VectorIndex`] for the whole process. Searches take a read
//! lock and run in parallel; add+persist holds the single write lock so no
//! reader ever observes an index that disagrees with the snapshot on disk.
//! A rebuild is prepared off to the side and swapped in atomically only
//! after its snapshot has been persisted.

use crate::index::{Chunk, IndexEntry, IndexError, VectorIndex};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

pub struct IndexStore {
    dir: PathBuf,
    index: RwLock<Arc<VectorIndex>>,
    loaded_from_snapshot: bool,
}

impl IndexStore {
    /// Opens the store at `dir`: loads the snapshot if one exists, otherwise
    /// starts empty. The snapshot payload is trusted as-is; a corrupt file
    /// surfaces as a deserialization error.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, IndexError> {
        let dir = dir.into();
        let (index, loaded) = if VectorIndex::snapshot_exists(&dir) {
            (VectorIndex::load(&dir)?, true)
        } else {
            info!(path = %dir.display(), "No index snapshot found, starting empty");
            (VectorIndex::new(), false)
        };
        Ok(Self {
            dir,
            index: RwLock::new(Arc::new(index)),
            loaded_from_snapshot: loaded,
        })
    }

    /// Whether `open` found a persisted snapshot.
    pub fn loaded_from_snapshot(&self) -> bool {
        self.loaded_from_snapshot
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.index.read().map(|idx| idx.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Searches the live index. Read-only; safe to call concurrently.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Chunk>, IndexError> {
        let index = self
            .index
            .read()
            .map_err(|_| IndexError::LockPoisoned)?
            .clone();
        index.search(query, k)
    }

    /// Appends entries and persists the snapshot under one write lock.
    pub fn append_and_persist(&self, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        let mut guard = self.index.write().map_err(|_| IndexError::LockPoisoned)?;
        let index = Arc::make_mut(&mut guard);
        index.push_entries(entries)?;
        index.save(&self.dir)?;
        Ok(index.len())
    }

    /// Persists the current index, overwriting any previous snapshot.
    pub fn persist(&self) -> Result<(), IndexError> {
        let guard = self.index.write().map_err(|_| IndexError::LockPoisoned)?;
        guard.save(&self.dir)
    }

    /// Replaces the live index with a freshly built one.
    ///
    /// The snapshot is written and the shared reference swapped under the
    /// same write lock `append_and_persist` uses, so an append can never
    /// interleave between the two and leave the live index disagreeing with
    /// the file on disk. Readers keep serving the old index until the new
    /// one is durable and complete.
    pub fn replace(&self, new_index: VectorIndex) -> Result<(), IndexError> {
        let mut guard = self.index.write().map_err(|_| IndexError::LockPoisoned)?;
        new_index.save(&self.dir)?;
        *guard = Arc::new(new_index);
        info!(entries = guard.len(), "Swapped in rebuilt index");
        Ok(())
    }
}
