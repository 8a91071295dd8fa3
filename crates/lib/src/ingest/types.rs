use serde::{Deserialize, Serialize};

/// One extracted attachment of a scraped board post.
///
/// Extraction failures arrive as sentinel strings in `text` (the upstream
/// extractor never throws), so this field may contain garbage and every
/// downstream stage must tolerate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    #[serde(default)]
    pub text: String,
}

/// A scraped board post with its attachment extracts.
///
/// This is the sole contract with the upstream scraping/extraction
/// collaborator: a JSON array of these records feeds the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A source record flattened into one labeled text block, ready to chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub content: String,
    pub source_label: String,
}

/// Stable digest used to detect duplicate posts across repeated crawler
/// runs: MD5 of `title|content|sorted attachment file names`. Recomputed
/// from the corpus JSON on each run, never persisted in the index.
pub fn content_hash(record: &SourceRecord) -> String {
    let mut names: Vec<&str> = record
        .attachments
        .iter()
        .map(|a| a.file_name.as_str())
        .collect();
    names.sort_unstable();
    let combined = format!("{}|{}|{}", record.title, record.content, names.join("|"));
    format!("{:x}", md5::compute(combined.as_bytes()))
}
