//! Overlapping fixed-length windows over section text.
//!
//! ## How It Works
//!
//! ```text
//! max_length = 10, overlap = 3, step = 7
//!
//! Text: "abcdefghijklmnopqrstuvwxyz"
//!
//! Window 0: "abcdefghij"   [0..10]
//! Window 1: "hijklmnopq"   [7..17]   <- starts at 10 - 3 = 7
//! Window 2: "opqrstuvwx"   [14..24]
//! Window 3: "vwxyz"        [21..26]  <- final window may be shorter
//! ```
//!
//! Lengths and offsets are counted in characters (Unicode scalar values), so a
//! Hangul syllable counts once even though it is three bytes of UTF-8.
//!
//! Windowing stops after the first window that reaches the end of the text. A
//! text no longer than `max_length` is therefore always a single window, and
//! re-chunking an emitted window with the same settings gives it back.
//!
//! ## Chunk Ids
//!
//! [`create_rag_chunks`] windows every section separately and names each
//! window `<section_id>_<window_index>`:
//!
//! ```text
//! section 3.2, 2 windows  ->  "3.2_0", "3.2_1"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, PipelineConfig, Result, SectionText};

/// One window of text with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// The window text.
    pub text: String,
    /// Byte offset of the window start in the source.
    pub start: usize,
    /// Byte offset of the window end (exclusive) in the source.
    pub end: usize,
    /// Zero-based window index.
    pub index: usize,
}

impl Window {
    /// The byte span of this window in the source.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Fixed-length window chunker with overlap.
///
/// ## Example
///
/// ```rust
/// use folio::WindowChunker;
///
/// let chunker = WindowChunker::new(100, 20).unwrap();
/// let text = "가".repeat(250);
/// let windows = chunker.windows(&text);
///
/// // step = 80: windows start at 0, 80, 160
/// assert_eq!(windows.len(), 3);
/// assert_eq!(windows[0].text.chars().count(), 100);
/// assert_eq!(windows[2].text.chars().count(), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowChunker {
    max_length: usize,
    overlap: usize,
}

impl WindowChunker {
    /// Create a chunker.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] if `max_length == 0`
    /// - [`Error::OverlapExceedsSize`] if `overlap >= max_length`
    pub fn new(max_length: usize, overlap: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(Error::InvalidChunkSize(max_length));
        }
        if overlap >= max_length {
            return Err(Error::OverlapExceedsSize {
                size: max_length,
                overlap,
            });
        }
        Ok(Self {
            max_length,
            overlap,
        })
    }

    /// Create a chunker from the configured window settings.
    ///
    /// # Errors
    ///
    /// See [`WindowChunker::new`].
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.chunk_max_length, config.chunk_overlap)
    }

    /// Maximum characters per window.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Characters shared by consecutive windows.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between window starts.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.max_length - self.overlap
    }

    /// Number of windows for a text of `chars` characters.
    #[must_use]
    pub fn estimate_windows(&self, chars: usize) -> usize {
        if chars == 0 {
            return 0;
        }
        if chars <= self.max_length {
            return 1;
        }
        (chars - self.overlap).div_ceil(self.step())
    }

    /// Split text into windows.
    #[must_use]
    pub fn windows(&self, text: &str) -> Vec<Window> {
        // Byte offset of every character start, plus the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let chars = bounds.len() - 1;

        let mut windows = Vec::with_capacity(self.estimate_windows(chars));
        let mut start = 0;

        while start < chars {
            let end = (start + self.max_length).min(chars);
            let (byte_start, byte_end) = (bounds[start], bounds[end]);
            windows.push(Window {
                text: text[byte_start..byte_end].to_string(),
                start: byte_start,
                end: byte_end,
                index: windows.len(),
            });
            if end == chars {
                break;
            }
            start += self.step();
        }

        windows
    }

    /// Split text into window strings.
    #[must_use]
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        self.windows(text).into_iter().map(|w| w.text).collect()
    }
}

/// Split `text` into windows of at most `max_length` characters overlapping
/// by `overlap` characters.
///
/// Windowing stops once a window reaches the end of the text. A plain
/// `for start in (0..len).step_by(step)` loop would also emit trailing
/// windows that lie entirely inside the previous one; those are not produced
/// here, so window counts can be lower than such a loop's.
///
/// ```rust
/// let windows = folio::chunk_text("abcdefghij", 4, 1).unwrap();
/// assert_eq!(windows, ["abcd", "defg", "ghij"]);
/// ```
///
/// # Errors
///
/// See [`WindowChunker::new`].
pub fn chunk_text(text: &str, max_length: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(WindowChunker::new(max_length, overlap)?.chunk_text(text))
}

/// Page range and any additional metadata of a chunk.
///
/// Keys other than the page range are kept in `extra` and survive a manifest
/// round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// First page of the section (1-based).
    pub page_start: usize,
    /// Last page of the section (1-based).
    pub page_end: usize,
    /// Other metadata keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ChunkMetadata {
    /// Metadata with only a page range.
    #[must_use]
    pub fn new(page_start: usize, page_end: usize) -> Self {
        Self {
            page_start,
            page_end,
            extra: BTreeMap::new(),
        }
    }

    /// Add an extra key, returning the updated metadata.
    ///
    /// `page_start` and `page_end` name the page range itself and are ignored.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        if !matches!(key.as_str(), "page_start" | "page_end") {
            self.extra.insert(key, value.into());
        }
        self
    }
}

/// A window of one section's text, ready for enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `<section_id>_<window_index>`.
    pub id: String,
    /// Section the window came from.
    pub section_id: String,
    /// Title of that section.
    pub section_title: String,
    /// Window text.
    pub text: String,
    /// Page range and extra metadata.
    pub metadata: ChunkMetadata,
}

/// Window every section and attach ids and 1-based page ranges.
///
/// Sections with empty text produce no chunks.
pub fn create_rag_chunks(sections: &[SectionText], chunker: &WindowChunker) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for section in sections {
        let id = section.section.section_id();
        let title = section.section.section_title();
        let page_start = section.section.start_page + 1;
        let page_end = section.section.end_page + 1;

        chunks.extend(chunker.windows(&section.text).into_iter().map(|w| Chunk {
            id: format!("{id}_{}", w.index),
            section_id: id.to_string(),
            section_title: title.to_string(),
            text: w.text,
            metadata: ChunkMetadata::new(page_start, page_end),
        }));
    }
    chunks
}
