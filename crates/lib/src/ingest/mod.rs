//! # Ingestion Logic
//!
//! Turns scraped board posts and their attachment extracts into index
//! entries: normalize each source record into one flat text block, split it
//! into overlapping chunks, embed the chunks, and add them to the index.

pub mod chunk;
pub mod corpus;
pub mod normalize;
pub mod types;

pub use chunk::{chunk_document, split_text, ChunkConfig};
pub use corpus::{AddOutcome, IngestError, Ingestor, BATCH_SIZE};
pub use normalize::normalize;
pub use types::{content_hash, Attachment, NormalizedDocument, SourceRecord};
