//! Pipeline configuration.
//!
//! Every stage takes its parameters from a [`PipelineConfig`] passed in
//! explicitly. There is no process-wide default instance: callers build one
//! (usually from [`PipelineConfig::default`]) and hand it down.
//!
//! ## Crop Band
//!
//! Regulation manuals print running headers and footers on every page. The
//! page text source is asked for a vertical band only:
//!
//! ```text
//!  0 ┌──────────────────────┐
//!    │  running header      │
//! 114├──────────────────────┤  crop_top
//!    │                      │
//!    │  body text           │
//!    │                      │
//! 779├──────────────────────┤  crop_bottom
//!    │  page footer         │
//!    └──────────────────────┘
//! ```
//!
//! ## Loading
//!
//! All fields have defaults, so a JSON file only needs to name what it
//! overrides:
//!
//! ```rust
//! use folio::PipelineConfig;
//!
//! let config: PipelineConfig =
//!     serde_json::from_str(r#"{ "chunk_max_length": 512, "chunk_overlap": 100 }"#).unwrap();
//! assert_eq!(config.chunk_max_length, 512);
//! assert_eq!(config.toc_marker, "목 차");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::page::Crop;
use crate::{Error, Result};

/// Labels used in the two-line header prepended to every enriched chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    /// Label of the document line.
    pub document: String,
    /// Label of the section line.
    pub section: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            document: "문서".to_string(),
            section: "섹션".to_string(),
        }
    }
}

/// Immutable configuration for a document pipeline run.
///
/// # Examples
///
/// ```rust
/// use folio::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_chunking(512, 100)
///     .with_toc_marker("Contents");
/// assert!(config.validate().is_ok());
///
/// let bad = PipelineConfig::default().with_chunking(100, 100);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Top of the body band, in page units (px).
    pub crop_top: f32,
    /// Bottom of the body band, in page units (px).
    pub crop_bottom: f32,
    /// Literal marker identifying the table-of-contents page.
    pub toc_marker: String,
    /// Maximum number of pages scanned for TOC lines, starting at the marker page.
    pub max_toc_pages: usize,
    /// Maximum characters per chunk window.
    pub chunk_max_length: usize,
    /// Characters shared by consecutive windows.
    pub chunk_overlap: usize,
    /// Header labels for enriched chunk text.
    pub header_labels: HeaderLabels,
    /// Batch worker threads; `0` lets rayon pick one per core.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crop_top: 114.0,
            crop_bottom: 779.0,
            toc_marker: "목 차".to_string(),
            max_toc_pages: 3,
            chunk_max_length: 1024,
            chunk_overlap: 150,
            header_labels: HeaderLabels::default(),
            workers: 0,
        }
    }
}

impl PipelineConfig {
    /// Read a (possibly partial) JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the vertical crop band.
    #[must_use]
    pub fn with_crop(self, top: f32, bottom: f32) -> Self {
        Self {
            crop_top: top,
            crop_bottom: bottom,
            ..self
        }
    }

    /// Set the table-of-contents marker.
    #[must_use]
    pub fn with_toc_marker(self, marker: impl Into<String>) -> Self {
        Self {
            toc_marker: marker.into(),
            ..self
        }
    }

    /// Set how many pages are scanned for TOC lines.
    #[must_use]
    pub fn with_max_toc_pages(self, pages: usize) -> Self {
        Self {
            max_toc_pages: pages,
            ..self
        }
    }

    /// Set chunk window length and overlap.
    #[must_use]
    pub fn with_chunking(self, max_length: usize, overlap: usize) -> Self {
        Self {
            chunk_max_length: max_length,
            chunk_overlap: overlap,
            ..self
        }
    }

    /// Set the enriched-chunk header labels.
    #[must_use]
    pub fn with_header_labels(self, labels: HeaderLabels) -> Self {
        Self {
            header_labels: labels,
            ..self
        }
    }

    /// Set the number of batch workers.
    #[must_use]
    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    /// The crop band handed to the page text source.
    #[must_use]
    pub fn crop(&self) -> Crop {
        Crop::new(self.crop_top, self.crop_bottom)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] if `chunk_max_length == 0`
    /// - [`Error::OverlapExceedsSize`] if `chunk_overlap >= chunk_max_length`
    /// - [`Error::InvalidConfig`] for an empty crop band, an empty marker, or
    ///   `max_toc_pages == 0`
    pub fn validate(&self) -> Result<()> {
        if self.chunk_max_length == 0 {
            return Err(Error::InvalidChunkSize(0));
        }
        if self.chunk_overlap >= self.chunk_max_length {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_max_length,
                overlap: self.chunk_overlap,
            });
        }
        if self.crop_bottom <= self.crop_top {
            return Err(Error::InvalidConfig(format!(
                "crop_bottom ({}) must be greater than crop_top ({})",
                self.crop_bottom, self.crop_top
            )));
        }
        if self.toc_marker.trim().is_empty() {
            return Err(Error::InvalidConfig("toc_marker must not be empty".into()));
        }
        if self.max_toc_pages == 0 {
            return Err(Error::InvalidConfig("max_toc_pages must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crop(), Crop::new(114.0, 779.0));
        assert_eq!(config.max_toc_pages, 3);
    }

    #[test]
    fn test_zero_chunk_size() {
        let config = PipelineConfig::default().with_chunking(0, 0);
        assert!(matches!(config.validate(), Err(Error::InvalidChunkSize(0))));
    }

    #[test]
    fn test_overlap_must_be_smaller() {
        let config = PipelineConfig::default().with_chunking(10, 10);
        assert!(matches!(
            config.validate(),
            Err(Error::OverlapExceedsSize { size: 10, overlap: 10 })
        ));
    }

    #[test]
    fn test_inverted_crop() {
        let config = PipelineConfig::default().with_crop(500.0, 100.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_marker() {
        let config = PipelineConfig::default().with_toc_marker("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "max_toc_pages": 5, "header_labels": { "document": "Doc" } }"#)
                .unwrap();
        assert_eq!(config.max_toc_pages, 5);
        assert_eq!(config.header_labels.document, "Doc");
        assert_eq!(config.header_labels.section, "섹션");
        assert_eq!(config.chunk_max_length, 1024);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "chunk_max_length": 10, "chunk_overlap": 20 }"#).unwrap();
        assert!(PipelineConfig::from_json_file(&path).is_err());

        std::fs::write(&path, r#"{ "chunk_max_length": 256 }"#).unwrap();
        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.chunk_max_length, 256);
        assert_eq!(config.chunk_overlap, 150);
    }
}
