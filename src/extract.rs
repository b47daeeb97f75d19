//! Section body extraction.
//!
//! ## Why Anchor?
//!
//! Printed TOC page numbers are only a hint. A section listed on page 12 may
//! start halfway down page 12, share that page with the tail of the previous
//! section, or carry a slightly different title in the body. So the pages of a
//! section's range are stitched into one buffer and the body is re-located
//! by searching for its header:
//!
//! ```text
//! buffer:  "...tail of 2.0\n2.1 Purpose\nThis manual ...\n2.2 Scope\n..."
//!                          └─ start anchor ─┘              └ end anchor
//!                           "2.1" ws "Purpose"            "\n" "2.2" [.\s]
//! body:    "This manual ..."
//! ```
//!
//! - Start: first occurrence of `<id>` + whitespace + `<title>`. Missing
//!   anchors fall back to the start of the buffer.
//! - End: first line break (plus optional whitespace) followed by the next
//!   section's id and a period or whitespace, searched from the body start.
//!   Missing anchors (and the last section) run to the end of the buffer.
//!
//! A section id that recurs verbatim at a line start inside its own body
//! ends the body early. Anchors are first-match only.

use regex::Regex;

use crate::page::{Crop, PageDocument};
use crate::Section;

/// A section with its extracted body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionText {
    /// The section and its page range.
    pub section: Section,
    /// Trimmed body text belonging to this section only.
    pub text: String,
}

/// Concatenate the text of every page in the section's range.
///
/// Pages without text are skipped; each page contributes its text followed by
/// a line break. Pages past the end of the document are never visited.
pub fn stitch_pages<D: PageDocument + ?Sized>(doc: &D, section: &Section, crop: Crop) -> String {
    let Some(last_page) = doc.page_count().checked_sub(1) else {
        return String::new();
    };
    let mut buffer = String::new();
    for index in section.start_page..=section.end_page.min(last_page) {
        if let Some(text) = doc.page_text(index, crop).filter(|t| !t.is_empty()) {
            buffer.push_str(&text);
            buffer.push('\n');
        }
    }
    buffer
}

/// Byte offset just past the `<id> <title>` header, if present.
pub fn find_body_start(buffer: &str, section_id: &str, section_title: &str) -> Option<usize> {
    let pattern = format!(
        r"{}\s+{}",
        regex::escape(section_id),
        regex::escape(section_title)
    );
    anchor_regex(&pattern)?.find(buffer).map(|m| m.end())
}

/// Byte offset of the next section's header, searched from `from`.
pub fn find_body_end(buffer: &str, from: usize, next_section_id: &str) -> Option<usize> {
    let pattern = format!(r"\n\s*{}[.\s]", regex::escape(next_section_id));
    let re = anchor_regex(&pattern)?;
    re.find(buffer.get(from..)?).map(|m| from + m.start())
}

/// Compile an anchor pattern. Ids and titles are escaped, so the only
/// expected failure is an oversized title hitting the regex size limit.
fn anchor_regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::warn!(error = %e, "anchor pattern failed to compile"))
        .ok()
}

/// Slice one section's body out of its stitched buffer.
///
/// ```rust
/// use folio::slice_section_body;
///
/// let buffer = "intro\n1 Scope\nApplies to all.\n2 Terms\nDefinitions.\n";
/// assert_eq!(slice_section_body(buffer, "1", "Scope", Some("2")), "Applies to all.");
/// assert_eq!(slice_section_body(buffer, "2", "Terms", None), "Definitions.");
/// ```
pub fn slice_section_body<'a>(
    buffer: &'a str,
    section_id: &str,
    section_title: &str,
    next_section_id: Option<&str>,
) -> &'a str {
    let start = find_body_start(buffer, section_id, section_title).unwrap_or_else(|| {
        tracing::debug!(section_id, "header anchor not found; slicing from buffer start");
        0
    });

    let end = next_section_id
        .and_then(|next| find_body_end(buffer, start, next))
        .unwrap_or(buffer.len());

    buffer[start..end].trim()
}

/// Extract the body text of every section.
///
/// Sections keep their order. A missed anchor never drops a section; its
/// body falls back to the stitched buffer boundaries.
pub fn extract_section_text<D: PageDocument + ?Sized>(
    doc: &D,
    sections: Vec<Section>,
    crop: Crop,
) -> Vec<SectionText> {
    let next_ids: Vec<Option<String>> = sections
        .iter()
        .skip(1)
        .map(|s| Some(s.entry.section_id.clone()))
        .chain(std::iter::once(None))
        .collect();

    sections
        .into_iter()
        .zip(next_ids)
        .map(|(section, next_id)| {
            let buffer = stitch_pages(doc, &section, crop);
            let text = slice_section_body(
                &buffer,
                section.section_id(),
                section.section_title(),
                next_id.as_deref(),
            )
            .to_string();
            tracing::trace!(
                section_id = section.section_id(),
                pages = section.page_span(),
                chars = text.chars().count(),
                "extracted section body"
            );
            SectionText { section, text }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_page_ranges, PageText, TocEntry};

    const CROP: Crop = Crop::new(0.0, 1.0);

    #[test]
    fn test_start_anchor_allows_any_whitespace() {
        let buffer = "header\n3.1\n  Fees\nbody";
        let start = find_body_start(buffer, "3.1", "Fees").unwrap();
        assert_eq!(&buffer[start..], "\nbody");
    }

    #[test]
    fn test_start_anchor_escapes_metacharacters() {
        let buffer = "1.2 Rates (annual)\nbody";
        assert!(find_body_start(buffer, "1.2", "Rates (annual)").is_some());
        assert!(find_body_start("1x2 Rates (annual)", "1.2", "Rates (annual)").is_none());
    }

    #[test]
    fn test_end_anchor_requires_line_start() {
        let buffer = "see section 2. for details\n2. Terms";
        let end = find_body_end(buffer, 0, "2").unwrap();
        assert_eq!(&buffer[end..], "\n2. Terms");
    }

    #[test]
    fn test_end_anchor_does_not_match_longer_id() {
        let buffer = "body\n2.10 Other\nmore\n2.1 Next";
        let end = find_body_end(buffer, 0, "2.1").unwrap();
        assert_eq!(&buffer[end..], "\n2.1 Next");
    }

    #[test]
    fn test_end_anchor_searched_after_start() {
        let buffer = "\n2. early\n1 Scope\nbody\n2. Terms";
        assert_eq!(slice_section_body(buffer, "1", "Scope", Some("2")), "body");
    }

    #[test]
    fn test_missing_start_anchor_falls_back_to_zero() {
        let buffer = "  untitled body\n2 Next";
        assert_eq!(
            slice_section_body(buffer, "1", "Missing", Some("2")),
            "untitled body"
        );
    }

    #[test]
    fn test_missing_end_anchor_runs_to_end() {
        let buffer = "1 Scope\nbody\nstill body\n";
        assert_eq!(
            slice_section_body(buffer, "1", "Scope", Some("9")),
            "body\nstill body"
        );
    }

    #[test]
    fn test_false_boundary_is_first_match() {
        let buffer = "1 Scope\nintro\n2 cases are listed\n2. Terms\n";
        assert_eq!(slice_section_body(buffer, "1", "Scope", Some("2")), "intro");
    }

    #[test]
    fn test_dotted_body_header_does_not_anchor() {
        let buffer = "1. Scope\nbody\n";
        assert!(find_body_start(buffer, "1", "Scope").is_none());
        assert_eq!(slice_section_body(buffer, "1", "Scope", None), "1. Scope\nbody");
    }

    #[test]
    fn test_uncompilable_anchor_is_none() {
        assert!(anchor_regex(r"(unclosed").is_none());
        assert!(anchor_regex(r"1\s+Scope").is_some());
    }

    #[test]
    fn test_stitch_stops_at_document_end() {
        let doc = PageText::from_pages(["toc", "only page"]);
        let section = Section {
            entry: TocEntry::new("1", "A", 2),
            start_page: 1,
            end_page: 1_000_000_000_000,
            collapsed: false,
        };
        assert_eq!(stitch_pages(&doc, &section, CROP), "only page\n");

        let past_end = Section {
            start_page: 5,
            end_page: 5,
            ..section
        };
        assert_eq!(stitch_pages(&doc, &past_end, CROP), "");
    }

    #[test]
    fn test_far_printed_page_extracts_quickly() {
        let doc = PageText::from_pages(["목 차\n1 A 2\n2 B 300000000", "1 A\nbody"]);
        let toc = vec![TocEntry::new("1", "A", 2), TocEntry::new("2", "B", 300_000_000)];
        let texts = extract_section_text(&doc, build_page_ranges(toc, 2), CROP);
        assert_eq!(texts[0].section.end_page, 1);
        assert_eq!(texts[0].text, "body");
        assert_eq!(texts[1].text, "");
    }

    #[test]
    fn test_stitch_skips_empty_pages() {
        let doc = PageText::from_pages(["a", "", "b", "c"]);
        let sections = build_page_ranges(vec![TocEntry::new("1", "A", 1)], 3);
        assert_eq!(stitch_pages(&doc, &sections[0], CROP), "a\nb\n");
    }

    #[test]
    fn test_extract_shared_page() {
        let doc = PageText::from_pages([
            "목 차",
            "1 Scope\nFirst body.\n2 Terms\nSecond body.",
            "more terms",
        ]);
        let toc = vec![TocEntry::new("1", "Scope", 2), TocEntry::new("2", "Terms", 2)];
        let sections = build_page_ranges(toc, 3);
        let texts = extract_section_text(&doc, sections, CROP);

        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].text, "First body.");
        assert_eq!(texts[1].text, "Second body.\nmore terms");
    }

    #[test]
    fn test_extract_empty_range_gives_empty_text() {
        let doc = PageText::from_pages(["toc", "", ""]);
        let sections = build_page_ranges(vec![TocEntry::new("1", "Scope", 2)], 3);
        let texts = extract_section_text(&doc, sections, CROP);
        assert_eq!(texts[0].text, "");
    }
}
