//! Section page ranges.
//!
//! Printed TOC page numbers are turned into 0-based page ranges:
//!
//! ```text
//! TOC:    1 → p.3      2 → p.10      (20 pages total)
//!
//! index:  0 1 [2 3 4 5 6 7 8] [9 10 ... 19]
//!               section 1       section 2
//! ```
//!
//! Section `i` starts at `page(i) - 1` and ends on the page before section
//! `i + 1` starts. The last section absorbs every trailing page.
//!
//! When the next entry's printed page is not greater than the current one
//! (duplicate or out-of-order TOC numbers), the range collapses to its start
//! page and the section is flagged [`collapsed`](Section::collapsed). The
//! text extractor still anchors on the in-body header, but the flag means the
//! TOC data was degraded.
//!
//! Ends are clamped to the last page of the document, so a printed page
//! number far past the end (a year, an OCR glitch) cannot stretch a range.
//! A section that *starts* past the end keeps its start page as a
//! single-page range; it has no text.

use crate::TocEntry;

/// A TOC entry with its 0-based page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The TOC entry this section was built from.
    pub entry: TocEntry,
    /// First page of the section (0-based, inclusive).
    pub start_page: usize,
    /// Last page of the section (0-based, inclusive).
    pub end_page: usize,
    /// Whether the range was collapsed because the next TOC page number did
    /// not increase.
    pub collapsed: bool,
}

impl Section {
    /// Canonical section id.
    pub fn section_id(&self) -> &str {
        &self.entry.section_id
    }

    /// Section title.
    pub fn section_title(&self) -> &str {
        &self.entry.section_title
    }

    /// The inclusive page range.
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.start_page..=self.end_page
    }

    /// Number of pages spanned.
    pub fn page_span(&self) -> usize {
        self.end_page - self.start_page + 1
    }
}

/// Convert ordered TOC entries into sections with page ranges.
///
/// ```rust
/// use folio::{build_page_ranges, TocEntry};
///
/// let toc = vec![TocEntry::new("1", "Scope", 3), TocEntry::new("2", "Terms", 10)];
/// let sections = build_page_ranges(toc, 20);
///
/// assert_eq!((sections[0].start_page, sections[0].end_page), (2, 8));
/// assert_eq!((sections[1].start_page, sections[1].end_page), (9, 19));
/// ```
pub fn build_page_ranges(entries: Vec<TocEntry>, total_pages: usize) -> Vec<Section> {
    let last_page = total_pages.saturating_sub(1);
    let next_pages: Vec<Option<usize>> = entries
        .iter()
        .skip(1)
        .map(|e| Some(e.page))
        .chain(std::iter::once(None))
        .collect();

    entries
        .into_iter()
        .zip(next_pages)
        .map(|(entry, next_page)| {
            let start_page = entry.page.saturating_sub(1);
            let (end_page, collapsed) = match next_page {
                Some(next) if next > entry.page => {
                    (next.saturating_sub(2).min(last_page).max(start_page), false)
                }
                Some(next) => {
                    tracing::warn!(
                        section_id = %entry.section_id,
                        page = entry.page,
                        next_page = next,
                        "next TOC page does not increase; collapsing range"
                    );
                    (start_page, true)
                }
                None => (last_page.max(start_page), false),
            };
            Section {
                entry,
                start_page,
                end_page,
                collapsed,
            }
        })
        .collect()
}
