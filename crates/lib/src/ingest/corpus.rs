//! # Ingestion Orchestrator
//!
//! Drives full-corpus builds and incremental adds. The canonical JSON corpus
//! is the source of truth; the vector index is a derived, disposable cache.
//! There is no delete on the index, so removing stale entries always means a
//! rebuild from the corpus file.

use crate::index::{IndexEntry, IndexError, VectorIndex};
use crate::ingest::chunk::{chunk_document, ChunkConfig};
use crate::ingest::normalize::normalize;
use crate::ingest::types::{content_hash, NormalizedDocument, SourceRecord};
use crate::providers::ai::Embedder;
use crate::store::IndexStore;
use crate::ModelError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Records are embedded in fixed-size batches to bound peak memory and the
/// size of a single embeddings request.
pub const BATCH_SIZE: usize = 5;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read or write a corpus file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse corpus JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Embedding failed after the reduced-chunk retry: {0}")]
    Embedding(#[from] ModelError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Summary of an incremental add.
#[derive(Debug, Clone, Default)]
pub struct AddOutcome {
    pub added_documents: usize,
    pub skipped_duplicates: usize,
    pub added_chunks: usize,
}

/// Coordinates normalize → chunk → embed → index for a whole corpus.
pub struct Ingestor {
    store: Arc<IndexStore>,
    embedder: Box<dyn Embedder>,
    corpus_path: PathBuf,
}

impl Ingestor {
    pub fn new(
        store: Arc<IndexStore>,
        embedder: Box<dyn Embedder>,
        corpus_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            embedder,
            corpus_path: corpus_path.into(),
        }
    }

    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }

    /// Startup path: do nothing if the store was loaded from a snapshot,
    /// otherwise build the index from the canonical corpus.
    pub async fn load_or_build(&self) -> Result<(), IngestError> {
        if self.store.loaded_from_snapshot() {
            return Ok(());
        }
        info!("No persisted index, building from the corpus");
        self.rebuild().await?;
        Ok(())
    }

    /// Discards the persisted index and rebuilds it from the canonical
    /// corpus. The live index keeps serving until the new one is persisted.
    pub async fn rebuild(&self) -> Result<usize, IngestError> {
        let records = read_records(&self.corpus_path)?;
        let index = self.build_index(&records).await?;
        let entries = index.len();
        self.store.replace(index)?;
        info!(documents = records.len(), entries, "Rebuilt index from corpus");
        Ok(entries)
    }

    /// Incremental add from a new JSON file of source records.
    pub async fn add_from_file(&self, path: &Path) -> Result<AddOutcome, IngestError> {
        let records = read_records(path)?;
        self.add_records(records).await
    }

    /// Incremental add of a single ad-hoc record.
    pub async fn add_record(
        &self,
        title: String,
        content: String,
        url: Option<String>,
    ) -> Result<AddOutcome, IngestError> {
        let record = SourceRecord {
            title,
            url: url.unwrap_or_default(),
            content,
            attachments: Vec::new(),
        };
        self.add_records(vec![record]).await
    }

    /// Deduplicates incoming records against the canonical corpus, then
    /// embeds and persists them batch by batch, committing each batch to the
    /// corpus file only once it is in the index.
    ///
    /// A batch that fails to embed is therefore not recorded in the corpus,
    /// so re-running the same add retries it instead of skipping it as a
    /// duplicate.
    pub async fn add_records(&self, records: Vec<SourceRecord>) -> Result<AddOutcome, IngestError> {
        let mut corpus = read_records_or_empty(&self.corpus_path)?;
        let mut seen: HashSet<String> = corpus.iter().map(content_hash).collect();

        let mut fresh = Vec::new();
        let mut skipped = 0;
        for record in records {
            let hash = content_hash(&record);
            if seen.contains(&hash) {
                skipped += 1;
                continue;
            }
            seen.insert(hash);
            fresh.push(record);
        }

        if fresh.is_empty() {
            info!(skipped, "All incoming records were already ingested");
            return Ok(AddOutcome {
                skipped_duplicates: skipped,
                ..Default::default()
            });
        }

        let mut added_documents = 0;
        let mut added_chunks = 0;
        for batch in fresh.chunks(BATCH_SIZE) {
            let docs: Vec<NormalizedDocument> = batch.iter().map(normalize).collect();
            let entries = self.embed_documents(&docs).await?;
            added_chunks += entries.len();
            self.store.append_and_persist(entries)?;

            corpus.extend(batch.iter().cloned());
            write_records(&self.corpus_path, &corpus)?;
            added_documents += batch.len();
        }

        info!(
            added = added_documents,
            skipped, added_chunks, "Incremental add complete"
        );
        Ok(AddOutcome {
            added_documents,
            skipped_duplicates: skipped,
            added_chunks,
        })
    }

    /// Builds a fresh index from `records` in batches of [`BATCH_SIZE`].
    ///
    /// A batch whose embedding call fails is retried once with much smaller
    /// chunks before the error is propagated; the run stops at the failing
    /// batch and entries already built stay with the caller.
    async fn build_index(&self, records: &[SourceRecord]) -> Result<VectorIndex, IngestError> {
        let mut index = VectorIndex::new();
        let total_batches = records.len().div_ceil(BATCH_SIZE);

        for (n, batch) in records.chunks(BATCH_SIZE).enumerate() {
            info!(
                batch = n + 1,
                total_batches,
                documents = batch.len(),
                "Embedding corpus batch"
            );
            let docs: Vec<NormalizedDocument> = batch.iter().map(normalize).collect();
            let entries = self.embed_documents(&docs).await?;
            index.push_entries(entries)?;
        }

        Ok(index)
    }

    /// Chunks and embeds a batch of documents, retrying once with the
    /// fallback chunk size when the embedding call fails.
    async fn embed_documents(
        &self,
        docs: &[NormalizedDocument],
    ) -> Result<Vec<IndexEntry>, ModelError> {
        match self.embed_with_config(docs, ChunkConfig::DEFAULT).await {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, "Batch embedding failed, retrying with smaller chunks");
                self.embed_with_config(docs, ChunkConfig::FALLBACK).await
            }
        }
    }

    async fn embed_with_config(
        &self,
        docs: &[NormalizedDocument],
        config: ChunkConfig,
    ) -> Result<Vec<IndexEntry>, ModelError> {
        let chunks: Vec<_> = docs
            .iter()
            .flat_map(|doc| chunk_document(doc, config))
            .collect();
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        Ok(vectors
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| IndexEntry { vector, chunk })
            .collect())
    }
}

fn read_records(path: &Path) -> Result<Vec<SourceRecord>, IngestError> {
    let payload = fs::read(path)?;
    Ok(serde_json::from_slice(&payload)?)
}

fn read_records_or_empty(path: &Path) -> Result<Vec<SourceRecord>, IngestError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_records(path)
}

fn write_records(path: &Path, records: &[SourceRecord]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
