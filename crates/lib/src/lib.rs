//! # bokji
//!
//! Core of a Korean-language customer-support chatbot for elder-welfare
//! equipment (복지용구) inquiries. Scraped government board posts and their
//! attachment extracts are normalized, chunked, embedded into a vector
//! index, and queried through a retrieval-augmented generation chain with
//! guardrail validation.
//!
//! The web front end, admin pages, CSV logs, and the scraping/OCR pipeline
//! are external collaborators; this crate owns the ingestion pipeline, the
//! index, the guardrail, and the answer chain.

pub mod chat;
pub mod errors;
pub mod guardrail;
pub mod index;
pub mod ingest;
pub mod judge;
pub mod log;
pub mod prompts;
pub mod providers;
pub mod store;

pub use chat::{ChatEngine, ChatReply, CONTEXT_CAP, RETRIEVAL_K};
pub use errors::ModelError;
pub use guardrail::{FallbackKind, GuardrailDecision, Guardrails, QuestionCategory};
pub use index::{Chunk, IndexEntry, IndexError, VectorIndex};
pub use ingest::{AddOutcome, IngestError, Ingestor, SourceRecord};
pub use log::{ChatExchange, ExchangeSink, ExchangeStatus, TracingSink};
pub use providers::ai::{AiProvider, Embedder, RemoteEmbedder};
pub use store::IndexStore;
