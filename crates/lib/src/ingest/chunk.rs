//! # Text Chunking
//!
//! Splits normalized document text into overlapping fixed-size windows
//! suitable for embedding. Chunking is a pure function: the same input
//! always yields the same chunk sequence, in document order.

use crate::index::Chunk;
use crate::ingest::types::NormalizedDocument;

/// Window size and overlap for chunking, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub size: usize,
    pub overlap: usize,
}

impl ChunkConfig {
    /// The canonical chunking used for every normal ingestion pass.
    pub const DEFAULT: Self = Self {
        size: 1000,
        overlap: 120,
    };

    /// Much smaller windows, used to retry a batch whose embedding call
    /// failed (typically an over-long request).
    pub const FALLBACK: Self = Self {
        size: 100,
        overlap: 20,
    };
}

/// Splits `text` into overlapping windows of at most `config.size` chars.
pub fn split_text(text: &str, config: ChunkConfig) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = std::cmp::min(start + config.size, chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }

        // Advance by size minus overlap; stop if the step would not move.
        let next_start = start + config.size.saturating_sub(config.overlap);
        if next_start <= start {
            break;
        }
        start = next_start;
    }

    chunks
}

/// Chunks a normalized document; every chunk inherits its source label.
pub fn chunk_document(doc: &NormalizedDocument, config: ChunkConfig) -> Vec<Chunk> {
    split_text(&doc.content, config)
        .into_iter()
        .map(|text| Chunk {
            text,
            source: doc.source_label.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("복지용구 신청 안내", ChunkConfig::DEFAULT);
        assert_eq!(chunks, vec!["복지용구 신청 안내".to_string()]);
    }

    #[test]
    fn windows_overlap_and_preserve_order() {
        let text: String = ('a'..='z').cycle().take(250).collect();
        let config = ChunkConfig {
            size: 100,
            overlap: 20,
        };
        let chunks = split_text(&text, config);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        // The next window starts 80 chars in, repeating the last 20.
        let tail: String = chunks[0].chars().skip(80).collect();
        let head: String = chunks[1].chars().take(20).collect();
        assert_eq!(tail, head);
        // Re-running yields the identical sequence.
        assert_eq!(chunks, split_text(&text, config));
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        assert!(split_text("  \n\n  ", ChunkConfig::DEFAULT).is_empty());
    }

    #[test]
    fn chunks_inherit_source_label() {
        let doc = NormalizedDocument {
            content: "가나다라".repeat(400),
            source_label: "공고문".to_string(),
        };
        let chunks = chunk_document(&doc, ChunkConfig::DEFAULT);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.source == "공고문"));
    }

    #[test]
    fn multibyte_boundaries_are_respected() {
        let text = "한글텍스트".repeat(300);
        for chunk in split_text(&text, ChunkConfig::FALLBACK) {
            assert!(chunk.chars().count() <= 100);
        }
    }
}
