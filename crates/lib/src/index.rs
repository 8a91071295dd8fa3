//! # Vector Index
//!
//! An in-memory collection of embedded chunks with brute-force cosine
//! similarity search and a durable JSON snapshot. The snapshot is the only
//! persisted form: writes go to a temp file first and are renamed into
//! place, so a concurrent reload never observes a half-written index.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// File name of the snapshot inside the configured index directory.
pub const SNAPSHOT_FILE: &str = "index.json";

/// Errors produced by index operations.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize the index snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Index lock was poisoned")]
    LockPoisoned,
}

/// The atomic unit stored in and retrieved from the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// The source label inherited from the parent document (its title).
    pub source: String,
}

/// A chunk together with its embedding vector. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub vector: Vec<f32>,
    pub chunk: Chunk,
}

/// An append-only vector index over [`IndexEntry`] values.
///
/// The embedding dimension is fixed by the first inserted entry and enforced
/// for every later insert and query. There is no delete operation: removing
/// entries means rebuilding from the canonical corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The embedding dimension, once the first entry has been inserted.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Appends entries, fixing the index dimension on the first insert.
    pub fn push_entries(&mut self, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        for entry in entries {
            let dim = entry.vector.len();
            match self.dimension {
                None => self.dimension = Some(dim),
                Some(expected) if expected != dim => {
                    return Err(IndexError::DimensionMismatch {
                        expected,
                        actual: dim,
                    });
                }
                Some(_) => {}
            }
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Returns the `k` chunks nearest to `query`, most similar first.
    ///
    /// When `k` exceeds the index size, all entries are returned.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Chunk>, IndexError> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query, &entry.vector), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| entry.chunk.clone())
            .collect())
    }

    /// Writes the complete index to `dir`, replacing any previous snapshot.
    pub fn save(&self, dir: &Path) -> Result<(), IndexError> {
        fs::create_dir_all(dir)?;
        let final_path = dir.join(SNAPSHOT_FILE);
        let tmp_path = dir.join(format!("{SNAPSHOT_FILE}.tmp"));

        let payload = serde_json::to_vec(self)?;
        fs::write(&tmp_path, payload)?;
        fs::rename(&tmp_path, &final_path)?;

        info!(entries = self.entries.len(), path = %final_path.display(), "Saved index snapshot");
        Ok(())
    }

    /// Loads a previously saved snapshot from `dir`.
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let path = dir.join(SNAPSHOT_FILE);
        let payload = fs::read(&path)?;
        let index: Self = serde_json::from_slice(&payload)?;
        info!(entries = index.entries.len(), path = %path.display(), "Loaded index snapshot");
        Ok(index)
    }

    /// Whether a snapshot exists at `dir`.
    pub fn snapshot_exists(dir: &Path) -> bool {
        dir.join(SNAPSHOT_FILE).exists()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(vector: Vec<f32>, text: &str) -> IndexEntry {
        IndexEntry {
            vector,
            chunk: Chunk {
                text: text.to_string(),
                source: "test".to_string(),
            },
        }
    }

    #[test]
    fn search_orders_by_similarity() {
        let mut index = VectorIndex::new();
        index
            .push_entries(vec![
                entry(vec![0.0, 1.0], "orthogonal"),
                entry(vec![1.0, 0.0], "aligned"),
                entry(vec![1.0, 1.0], "diagonal"),
            ])
            .unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].text, "aligned");
        assert_eq!(results[1].text, "diagonal");
    }

    #[test]
    fn search_with_k_beyond_size_returns_everything() {
        let mut index = VectorIndex::new();
        index
            .push_entries(vec![entry(vec![1.0, 0.0], "a"), entry(vec![0.0, 1.0], "b")])
            .unwrap();
        let results = index.search(&[1.0, 1.0], 50).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let mut index = VectorIndex::new();
        index.push_entries(vec![entry(vec![1.0, 0.0], "a")]).unwrap();
        let err = index
            .push_entries(vec![entry(vec![1.0, 0.0, 0.0], "b")])
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn zero_norm_vectors_do_not_panic() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
