//! Table-of-contents location and parsing.
//!
//! ## Finding the TOC
//!
//! The first page whose cropped text contains the configured marker (`"목 차"`
//! by default) is the TOC page. First match wins.
//!
//! ## Parsing TOC Lines
//!
//! A TOC line carries a section number, a title, an optional dot leader, and
//! a printed page number:
//!
//! ```text
//! 1.1.  Purpose ........................ 12
//! ^^^^  ^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^ ^^
//! id    title   dot leader (dropped)     page
//! ```
//!
//! Manuals mix several numbering styles, so the section number is matched
//! against an ordered list of grammars, most specific first:
//!
//! | Priority | Grammar | Example | Id |
//! |----------|---------|---------|----|
//! | 1 | `1.1.` | `3.29. Fees` | `3.29` |
//! | 2 | `1.1 ` | `3.29 Fees` | `3.29` |
//! | 3 | `1. 1` | `3. 29 Fees` | `3.29` |
//! | 4 | `1.` | `3. Fees` | `3` |
//! | 5 | `1 ` | `3 Fees` | `3` |
//!
//! Reordering the list changes results: `"1.1. Purpose"` also matches the
//! single-level grammar `1.` and would be read as section `1`.
//!
//! Lines with no trailing page number or no recognised section number are
//! skipped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::page::PageDocument;
use crate::PipelineConfig;

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TocEntry {
    /// Canonical dot-joined section number, e.g. `"3.29"`.
    pub section_id: String,
    /// Section title with dot leaders and page number removed.
    pub section_title: String,
    /// Printed page number (1-based).
    pub page: usize,
}

impl TocEntry {
    /// Create a TOC entry.
    pub fn new(section_id: impl Into<String>, section_title: impl Into<String>, page: usize) -> Self {
        Self {
            section_id: section_id.into(),
            section_title: section_title.into(),
            page,
        }
    }
}

/// A section-numbering grammar.
#[derive(Debug)]
pub struct NumberingGrammar {
    /// Short name, e.g. `"1.1."`.
    pub name: &'static str,
    /// Anchored pattern; capture group 1 is the section number.
    pub pattern: Regex,
}

impl NumberingGrammar {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid numbering grammar"),
        }
    }

    /// Match the grammar at the start of `line`.
    ///
    /// Returns the canonical section id (internal whitespace removed) and the
    /// byte offset where the numbering token ends.
    pub fn match_id(&self, line: &str) -> Option<(String, usize)> {
        let caps = self.pattern.captures(line)?;
        let token = caps.get(1)?;
        let whole = caps.get(0)?;
        let id: String = token.as_str().split_whitespace().collect();
        Some((id, whole.end()))
    }
}

/// Numbering grammars in priority order. The first match wins.
pub static NUMBERING_GRAMMARS: LazyLock<[NumberingGrammar; 5]> = LazyLock::new(|| {
    [
        NumberingGrammar::new("1.1.", r"^(\d+(?:\.\d+)+)\."),
        NumberingGrammar::new("1.1", r"^(\d+(?:\.\d+)+)\s+"),
        NumberingGrammar::new("1. 1", r"^(\d+\.\s+\d+)"),
        NumberingGrammar::new("1.", r"^(\d+)\."),
        NumberingGrammar::new("1", r"^(\d+)\s+"),
    ]
});

static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*$").expect("valid page regex"));

static DOTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid dot leader regex"));

/// Index of the first page containing the TOC marker, if any.
///
/// ```rust
/// use folio::{find_toc_page, PageText, PipelineConfig};
///
/// let doc = PageText::from_pages(["Cover", "목 차\n1. 총칙 3", "본문"]);
/// assert_eq!(find_toc_page(&doc, &PipelineConfig::default()), Some(1));
/// ```
pub fn find_toc_page<D: PageDocument + ?Sized>(doc: &D, config: &PipelineConfig) -> Option<usize> {
    let crop = config.crop();
    let found = (0..doc.page_count()).find(|&index| {
        doc.page_text(index, crop)
            .is_some_and(|text| text.contains(config.toc_marker.as_str()))
    });
    match found {
        Some(index) => tracing::debug!(page = index, "found table of contents"),
        None => tracing::debug!(marker = %config.toc_marker, "no table of contents marker"),
    }
    found
}

/// Parse a single TOC line.
///
/// ```rust
/// use folio::parse_toc_line;
///
/// let entry = parse_toc_line("1.1.  Purpose ..... 12").unwrap();
/// assert_eq!(entry.section_id, "1.1");
/// assert_eq!(entry.section_title, "Purpose");
/// assert_eq!(entry.page, 12);
///
/// assert!(parse_toc_line("Appendix").is_none());
/// ```
pub fn parse_toc_line(line: &str) -> Option<TocEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let page: usize = PAGE_RE.captures(line)?.get(1)?.as_str().parse().ok()?;
    if page == 0 {
        return None;
    }

    let (section_id, id_end) = NUMBERING_GRAMMARS
        .iter()
        .find_map(|grammar| grammar.match_id(line))?;

    let rest = line[id_end..].trim();
    let rest = PAGE_RE.replace(rest, "");
    let rest = DOTS_RE.replace_all(rest.trim(), " ");
    let section_title = rest.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(TocEntry {
        section_id,
        section_title,
        page,
    })
}

/// Parse TOC entries from up to `max_toc_pages` pages starting at `toc_page`.
///
/// Entries keep document order. Duplicate ids are kept.
pub fn extract_toc<D: PageDocument + ?Sized>(
    doc: &D,
    toc_page: usize,
    config: &PipelineConfig,
) -> Vec<TocEntry> {
    let crop = config.crop();
    let end = toc_page
        .saturating_add(config.max_toc_pages)
        .min(doc.page_count());

    let mut entries = Vec::new();
    for index in toc_page..end {
        let Some(text) = doc.page_text(index, crop) else {
            continue;
        };
        for line in text.lines() {
            match parse_toc_line(line) {
                Some(entry) => entries.push(entry),
                None => tracing::trace!(page = index, line, "skipping non-TOC line"),
            }
        }
    }

    tracing::debug!(
        toc_page,
        pages = end.saturating_sub(toc_page),
        entries = entries.len(),
        "parsed table of contents"
    );
    entries
}
