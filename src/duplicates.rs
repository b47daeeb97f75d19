//! Duplicate section-title detection.
//!
//! Two sections with the same title but different ids usually mean the TOC
//! was parsed wrongly (a wrapped line, a misread number) or the manual reuses
//! a heading. Either way retrieval will mix them up, so the pipeline reports
//! them. The report is diagnostic only; chunks are never filtered.
//!
//! ```text
//! "총칙" -> {"1", "1"}        one distinct id, not a duplicate
//! "총칙" -> {"1", "5.1"}      duplicate
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Chunk, EnrichedChunk, TocEntry};

/// Anything that names a section by id and title.
pub trait SectionRecord {
    /// Canonical section id.
    fn section_id(&self) -> &str;
    /// Section title.
    fn section_title(&self) -> &str;
}

impl SectionRecord for TocEntry {
    fn section_id(&self) -> &str {
        &self.section_id
    }

    fn section_title(&self) -> &str {
        &self.section_title
    }
}

impl SectionRecord for Chunk {
    fn section_id(&self) -> &str {
        &self.section_id
    }

    fn section_title(&self) -> &str {
        &self.section_title
    }
}

impl SectionRecord for EnrichedChunk {
    fn section_id(&self) -> &str {
        &self.section_id
    }

    fn section_title(&self) -> &str {
        &self.section_title
    }
}

/// Titles mapped to more than one distinct section id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Duplicated title → its distinct section ids.
    pub duplicates: BTreeMap<String, BTreeSet<String>>,
    /// Whether any title is duplicated.
    pub has_duplicates: bool,
    /// Number of records inspected.
    pub total_chunks: usize,
    /// Number of distinct titles.
    pub unique_titles: usize,
}

/// Group records by title and report titles with several distinct ids.
///
/// ```rust
/// use folio::{check_duplicates, TocEntry};
///
/// let toc = [
///     TocEntry::new("1", "General", 3),
///     TocEntry::new("1", "General", 3),
///     TocEntry::new("4.1", "General", 20),
///     TocEntry::new("2", "Claims", 8),
/// ];
/// let report = check_duplicates(&toc);
///
/// assert!(report.has_duplicates);
/// assert_eq!(report.duplicates["General"].len(), 2);
/// assert_eq!(report.unique_titles, 2);
/// ```
pub fn check_duplicates<R: SectionRecord>(records: &[R]) -> DuplicateReport {
    let mut title_to_ids: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        title_to_ids
            .entry(record.section_title())
            .or_default()
            .insert(record.section_id());
    }

    let unique_titles = title_to_ids.len();
    let duplicates: BTreeMap<String, BTreeSet<String>> = title_to_ids
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(title, ids)| {
            (
                title.to_string(),
                ids.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

    DuplicateReport {
        has_duplicates: !duplicates.is_empty(),
        duplicates,
        total_chunks: records.len(),
        unique_titles,
    }
}
