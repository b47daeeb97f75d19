//! Page text sources.
//!
//! Layout extraction from document binaries lives outside this crate. The
//! pipeline only needs an ordered list of pages that can hand back the plain
//! text inside a vertical crop band. [`PageSource`] opens a document and
//! [`PageDocument`] serves its pages; the opened document is released when
//! it is dropped, so every exit path of a pipeline run closes it.
//!
//! Two sources ship with the crate:
//!
//! - [`PageText`]: pages already held in memory.
//! - [`FormFeedSource`]: UTF-8 text dumps with one form feed (`\x0c`)
//!   between pages, as written by `pdftotext` and similar tools.

use std::path::Path;

use crate::{Error, Result};

/// Vertical crop band applied to a page before text extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crop {
    /// Top edge of the band.
    pub top: f32,
    /// Bottom edge of the band.
    pub bottom: f32,
}

impl Crop {
    /// Create a crop band.
    #[must_use]
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }
}

/// An opened document whose pages can be read as text.
pub trait PageDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of page `index` (0-based) inside `crop`.
    ///
    /// Returns `None` for pages without extractable text and for indices past
    /// the end of the document.
    fn page_text(&self, index: usize, crop: Crop) -> Option<String>;
}

/// Opens documents for the pipeline.
///
/// Implementations must support independent, concurrent opens: a batch run
/// calls [`open`](Self::open) from several worker threads at once.
pub trait PageSource: Send + Sync {
    /// The opened document type. Dropping it releases the underlying handle.
    type Document: PageDocument;

    /// Open the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn open(&self, path: &Path) -> Result<Self::Document>;
}

/// An in-memory document: one optional text per page, in page order.
///
/// The crop band is assumed to be applied already.
///
/// ```rust
/// use folio::{Crop, PageDocument, PageText};
///
/// let doc = PageText::from_pages(["cover", "", "body"]);
/// assert_eq!(doc.page_count(), 3);
/// assert_eq!(doc.page_text(1, Crop::new(0.0, 1.0)), None);
/// assert_eq!(doc.page_text(2, Crop::new(0.0, 1.0)).as_deref(), Some("body"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pages: Vec<Option<String>>,
}

impl PageText {
    /// Create a document from optional page texts.
    pub fn new(pages: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    /// Create a document from page strings; empty strings become textless pages.
    pub fn from_pages<S: AsRef<str>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self::new(pages.into_iter().map(|p| {
            let p = p.as_ref();
            (!p.is_empty()).then(|| p.to_string())
        }))
    }

    /// Split a form-feed separated dump into pages.
    ///
    /// A trailing form feed does not open an extra page.
    #[must_use]
    pub fn from_form_feed(dump: &str) -> Self {
        let dump = dump.strip_suffix('\u{c}').unwrap_or(dump);
        if dump.is_empty() {
            return Self::default();
        }
        Self::from_pages(dump.split('\u{c}'))
    }
}

impl PageDocument for PageText {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize, _crop: Crop) -> Option<String> {
        self.pages.get(index).cloned().flatten()
    }
}

/// Reads form-feed separated text dumps from disk.
///
/// The crop band is the extraction tool's concern (e.g. `pdftotext -y/-H`);
/// pages are returned as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFeedSource;

impl PageSource for FormFeedSource {
    type Document = PageText;

    fn open(&self, path: &Path) -> Result<PageText> {
        let dump = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(PageText::from_form_feed(&dump))
    }
}
