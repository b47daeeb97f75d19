//! Document and section context for chunks.
//!
//! An enriched chunk carries its context twice: in the metadata, and as a
//! two-line header inside the text itself, so the embedding of every window
//! also encodes which document and section it came from.
//!
//! ```text
//! 문서: 자동차보험약관
//! 섹션: 3.2 - 보험금 지급 기준
//!
//! <window text>
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Chunk, HeaderLabels};

/// Metadata of an enriched chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    /// First page of the section (1-based).
    pub page_start: usize,
    /// Last page of the section (1-based).
    pub page_end: usize,
    /// Name of the source document.
    pub document_name: String,
    /// Every other metadata key carried over from the chunk.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A chunk with document context prepended to its text.
///
/// This is the record written to the chunk manifest and handed to indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedChunk {
    /// `<section_id>_<window_index>`.
    pub id: String,
    /// Section the window came from.
    pub section_id: String,
    /// Title of that section.
    pub section_title: String,
    /// Header lines, a blank line, then the window text.
    pub text: String,
    /// Page range, document name and extra metadata.
    pub metadata: EnrichedMetadata,
}

impl Chunk {
    /// Consume this chunk and return it enriched with `document_name`.
    ///
    /// An existing `document_name`, `page_start` or `page_end` key in the
    /// extra metadata is replaced, never repeated.
    ///
    /// ```rust
    /// use folio::{Chunk, ChunkMetadata, HeaderLabels};
    ///
    /// let chunk = Chunk {
    ///     id: "1_0".into(),
    ///     section_id: "1".into(),
    ///     section_title: "Scope".into(),
    ///     text: "Applies to all.".into(),
    ///     metadata: ChunkMetadata::new(3, 4),
    /// };
    /// let labels = HeaderLabels { document: "Document".into(), section: "Section".into() };
    /// let enriched = chunk.with_document("Manual", &labels);
    ///
    /// assert_eq!(enriched.text, "Document: Manual\nSection: 1 - Scope\n\nApplies to all.");
    /// assert_eq!(enriched.metadata.document_name, "Manual");
    /// ```
    #[must_use]
    pub fn with_document(self, document_name: &str, labels: &HeaderLabels) -> EnrichedChunk {
        let mut extra = self.metadata.extra;
        for key in ["document_name", "page_start", "page_end"] {
            extra.remove(key);
        }
        let text = format!(
            "{}: {document_name}\n{}: {} - {}\n\n{}",
            labels.document, labels.section, self.section_id, self.section_title, self.text
        );
        EnrichedChunk {
            id: self.id,
            section_id: self.section_id,
            section_title: self.section_title,
            text,
            metadata: EnrichedMetadata {
                page_start: self.metadata.page_start,
                page_end: self.metadata.page_end,
                document_name: document_name.to_string(),
                extra,
            },
        }
    }
}

/// Enrich every chunk with `document_name`.
pub fn enrich(chunks: Vec<Chunk>, document_name: &str, labels: &HeaderLabels) -> Vec<EnrichedChunk> {
    chunks
        .into_iter()
        .map(|chunk| chunk.with_document(document_name, labels))
        .collect()
}

/// Derive a document name from a file name.
///
/// Keeps only Hangul syllables, which is how Korean regulation manuals are
/// titled (`"2024_자동차보험약관_v3.pdf"` → `"자동차보험약관"`). Falls back to
/// the file stem when the name contains none.
///
/// ```rust
/// use folio::document_name_from_filename;
///
/// assert_eq!(document_name_from_filename("2024_자동차보험약관_v3.pdf"), "자동차보험약관");
/// assert_eq!(document_name_from_filename("dir/policy-manual.txt"), "policy-manual");
/// ```
pub fn document_name_from_filename(filename: &str) -> String {
    let path = Path::new(filename);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let hangul: String = name.chars().filter(|c| ('가'..='힣').contains(c)).collect();
    if !hangul.is_empty() {
        return hangul;
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkMetadata;

    fn chunk(id: &str, title: &str) -> Chunk {
        Chunk {
            id: format!("{id}_0"),
            section_id: id.to_string(),
            section_title: title.to_string(),
            text: "본문".to_string(),
            metadata: ChunkMetadata::new(2, 5),
        }
    }

    #[test]
    fn test_default_korean_header() {
        let enriched = chunk("3.2", "보험금 지급 기준").with_document("자동차보험약관", &HeaderLabels::default());
        assert_eq!(
            enriched.text,
            "문서: 자동차보험약관\n섹션: 3.2 - 보험금 지급 기준\n\n본문"
        );
    }

    #[test]
    fn test_keeps_ids_and_pages() {
        let enriched = enrich(vec![chunk("1", "A"), chunk("2", "B")], "Doc", &HeaderLabels::default());
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[1].id, "2_0");
        assert_eq!(enriched[1].section_title, "B");
        assert_eq!(enriched[1].metadata.page_start, 2);
        assert_eq!(enriched[1].metadata.page_end, 5);
    }

    #[test]
    fn test_extra_metadata_is_kept() {
        let mut c = chunk("1", "A");
        c.metadata = c.metadata.with_extra("source", "a.pdf").with_extra("lang", "ko");
        let enriched = c.with_document("Doc", &HeaderLabels::default());
        assert_eq!(enriched.metadata.extra.len(), 2);
        assert_eq!(enriched.metadata.extra["source"], "a.pdf");
    }

    #[test]
    fn test_existing_document_name_is_replaced() {
        let mut c = chunk("1", "A");
        c.metadata.extra.insert("document_name".into(), "old".into());
        c.metadata.extra.insert("page_end".into(), 99.into());
        let enriched = c.with_document("new", &HeaderLabels::default());

        assert_eq!(enriched.metadata.document_name, "new");
        assert!(enriched.metadata.extra.is_empty());
        let json = serde_json::to_string(&enriched).unwrap();
        assert_eq!(json.matches("\"document_name\"").count(), 1);
        assert_eq!(json.matches("\"page_end\"").count(), 1);
    }

    #[test]
    fn test_wire_format() {
        let enriched = chunk("1", "총칙").with_document("약관", &HeaderLabels::default());
        let json = serde_json::to_string(&enriched).unwrap();
        assert!(json.contains("\"document_name\":\"약관\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        for key in ["id", "section_id", "section_title", "text", "metadata"] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
        assert_eq!(value["metadata"]["page_start"], 2);
        assert_eq!(value["metadata"]["page_end"], 5);
    }

    #[test]
    fn test_document_name_strips_non_hangul() {
        assert_eq!(document_name_from_filename("약관 (2024).pdf"), "약관");
        assert_eq!(document_name_from_filename("/data/in/보험_약관.txt"), "보험약관");
    }

    #[test]
    fn test_document_name_fallback() {
        assert_eq!(document_name_from_filename("manual.txt"), "manual");
        assert_eq!(document_name_from_filename("README"), "README");
    }
}
