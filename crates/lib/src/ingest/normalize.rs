//! # Document Normalizer
//!
//! Flattens a [`SourceRecord`] into one labeled text block: title, URL,
//! body, then one block per attachment. Nothing is dropped or truncated
//! here; extraction-failure sentinel strings pass through unchanged and end
//! up as harmless noise in the index instead of crashing ingestion.

use crate::ingest::types::{NormalizedDocument, SourceRecord};
use std::fmt::Write;

pub fn normalize(record: &SourceRecord) -> NormalizedDocument {
    let mut content = String::new();
    let _ = write!(content, "제목: {}\n\n", record.title);
    let _ = write!(content, "URL: {}\n\n", record.url);
    let _ = write!(content, "내용: {}\n\n", record.content);

    for attachment in &record.attachments {
        let _ = write!(content, "첨부파일: {}\n\n", attachment.file_name);
        let _ = write!(content, "파일내용: {}\n\n", attachment.text);
    }

    NormalizedDocument {
        content,
        source_label: record.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Attachment;

    #[test]
    fn sections_are_labeled_and_separated() {
        let record = SourceRecord {
            title: "복지용구 급여 안내".to_string(),
            url: "https://example.go.kr/board/1".to_string(),
            content: "본인부담률은 15%입니다.".to_string(),
            attachments: vec![Attachment {
                file_name: "안내문.pdf".to_string(),
                text: "첨부 본문".to_string(),
            }],
        };

        let doc = normalize(&record);
        assert_eq!(doc.source_label, "복지용구 급여 안내");
        assert!(doc.content.starts_with("제목: 복지용구 급여 안내\n\n"));
        assert!(doc.content.contains("URL: https://example.go.kr/board/1\n\n"));
        assert!(doc.content.contains("내용: 본인부담률은 15%입니다.\n\n"));
        assert!(doc.content.contains("첨부파일: 안내문.pdf\n\n"));
        assert!(doc.content.contains("파일내용: 첨부 본문\n\n"));
    }

    #[test]
    fn extraction_failure_sentinels_pass_through() {
        let record = SourceRecord {
            title: "공고".to_string(),
            url: String::new(),
            content: String::new(),
            attachments: vec![Attachment {
                file_name: "깨진파일.hwp".to_string(),
                text: "❌ HWP 오류: not an OLE file".to_string(),
            }],
        };

        let doc = normalize(&record);
        assert!(doc.content.contains("❌ HWP 오류: not an OLE file"));
    }
}
