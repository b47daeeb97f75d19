//! Chunk manifest persistence.
//!
//! The manifest is a pretty-printed JSON array of [`EnrichedChunk`] records,
//! UTF-8 with non-ASCII text left unescaped:
//!
//! ```json
//! [
//!   {
//!     "id": "1_0",
//!     "section_id": "1",
//!     "section_title": "총칙",
//!     "text": "문서: 약관\n섹션: 1 - 총칙\n\n...",
//!     "metadata": {
//!       "page_start": 3,
//!       "page_end": 4,
//!       "document_name": "약관"
//!     }
//!   }
//! ]
//! ```

use std::path::Path;

use crate::{EnrichedChunk, Error, Result};

/// File name of the manifest inside a batch output directory.
pub const MANIFEST_FILE: &str = "chunks.json";

/// Write chunks to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_chunks(path: impl AsRef<Path>, chunks: &[EnrichedChunk]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(chunks)?;
    std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), chunks = chunks.len(), "saved chunk manifest");
    Ok(())
}

/// Read chunks written by [`save_chunks`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a chunk manifest.
pub fn load_chunks(path: impl AsRef<Path>) -> Result<Vec<EnrichedChunk>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Chunk, ChunkMetadata, HeaderLabels};

    fn sample() -> Vec<EnrichedChunk> {
        vec![Chunk {
            id: "1_0".into(),
            section_id: "1".into(),
            section_title: "총칙".into(),
            text: "본문".into(),
            metadata: ChunkMetadata::new(3, 4),
        }
        .with_document("약관", &HeaderLabels::default())]
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(MANIFEST_FILE);

        save_chunks(&path, &sample()).unwrap();
        assert_eq!(load_chunks(&path).unwrap(), sample());
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        save_chunks(&path, &sample()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"section_title\": \"총칙\""));
        assert!(raw.contains("\n  {\n    \"id\": \"1_0\""));
    }

    #[test]
    fn test_unknown_metadata_keys_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(
            &path,
            r#"[{"id":"2_0","section_id":"2","section_title":"보상","text":"t",
                "metadata":{"page_start":5,"page_end":6,"document_name":"약관","source":"a.pdf"}}]"#,
        )
        .unwrap();

        let chunks = load_chunks(&path).unwrap();
        assert_eq!(chunks[0].metadata.document_name, "약관");
        assert_eq!(chunks[0].metadata.extra["source"], "a.pdf");
        assert!(!chunks[0].metadata.extra.contains_key("document_name"));

        save_chunks(&path, &chunks).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"source\": \"a.pdf\""));
    }

    #[test]
    fn test_round_trip_with_stale_document_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let chunks = vec![Chunk {
            id: "1_0".into(),
            section_id: "1".into(),
            section_title: "총칙".into(),
            text: "본문".into(),
            metadata: ChunkMetadata::new(1, 2).with_extra("document_name", "old"),
        }
        .with_document("new", &HeaderLabels::default())];

        save_chunks(&path, &chunks).unwrap();
        let loaded = load_chunks(&path).unwrap();
        assert_eq!(loaded, chunks);
        assert_eq!(loaded[0].metadata.document_name, "new");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_chunks(dir.path().join("nope.json")),
            Err(Error::Io { .. })
        ));
    }
}
