//! Per-document pipeline.
//!
//! ```text
//! pages ─▶ find_toc_page ─▶ extract_toc ─▶ build_page_ranges
//!                                               │
//!        check_duplicates ◀─ enrich ◀─ create_rag_chunks ◀─ extract_section_text
//! ```
//!
//! Each stage is a pure function of the previous stage's output. The only
//! failure is a missing table of contents; everything else degrades to fewer
//! or emptier sections.

use std::path::Path;

use crate::page::{PageDocument, PageSource};
use crate::{
    build_page_ranges, check_duplicates, create_rag_chunks, document_name_from_filename, enrich,
    extract_section_text, extract_toc, find_toc_page, DuplicateReport, EnrichedChunk, Error,
    PipelineConfig, Result, SectionText, WindowChunker,
};

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct DocumentOutput {
    /// Name stamped into every chunk.
    pub document_name: String,
    /// Sections with their extracted bodies.
    pub sections: Vec<SectionText>,
    /// Enriched chunks in section order.
    pub chunks: Vec<EnrichedChunk>,
    /// Duplicate-title diagnostics over `chunks`.
    pub duplicates: DuplicateReport,
}

/// Runs every stage for one document with a fixed configuration.
///
/// ```rust
/// use folio::{DocumentPipeline, PageText, PipelineConfig};
///
/// let doc = PageText::from_pages([
///     "Cover",
///     "목 차\n1 Scope ..... 3\n2 Terms ..... 4",
///     "1 Scope\nThis manual applies to all policies.",
///     "2 Terms\nA policy is a contract.",
/// ]);
/// let pipeline = DocumentPipeline::new(PipelineConfig::default()).unwrap();
/// let output = pipeline.process(&doc, "Manual").unwrap();
///
/// assert_eq!(output.sections.len(), 2);
/// assert_eq!(output.sections[1].text, "A policy is a contract.");
/// assert_eq!(output.chunks[0].id, "1_0");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    config: PipelineConfig,
    chunker: WindowChunker,
}

impl DocumentPipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let chunker = WindowChunker::from_config(&config)?;
        Ok(Self { config, chunker })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Locate the TOC, build page ranges and extract section bodies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructureNotFound`] if no page carries the TOC marker.
    pub fn sections<D: PageDocument + ?Sized>(&self, doc: &D) -> Result<Vec<SectionText>> {
        let toc_page = find_toc_page(doc, &self.config).ok_or_else(|| Error::StructureNotFound {
            marker: self.config.toc_marker.clone(),
        })?;
        let toc = extract_toc(doc, toc_page, &self.config);
        let sections = build_page_ranges(toc, doc.page_count());
        Ok(extract_section_text(doc, sections, self.config.crop()))
    }

    /// Run every stage on an opened document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructureNotFound`] if no page carries the TOC marker.
    pub fn process<D: PageDocument + ?Sized>(
        &self,
        doc: &D,
        document_name: &str,
    ) -> Result<DocumentOutput> {
        let sections = self.sections(doc)?;
        let chunks = create_rag_chunks(&sections, &self.chunker);
        let chunks = enrich(chunks, document_name, &self.config.header_labels);
        let duplicates = check_duplicates(&chunks);

        if chunks.is_empty() {
            tracing::warn!(document = document_name, "document produced no chunks");
        }
        if duplicates.has_duplicates {
            tracing::warn!(
                document = document_name,
                titles = duplicates.duplicates.len(),
                "duplicate section titles"
            );
        }
        tracing::info!(
            document = document_name,
            sections = sections.len(),
            chunks = chunks.len(),
            "processed document"
        );

        Ok(DocumentOutput {
            document_name: document_name.to_string(),
            sections,
            chunks,
            duplicates,
        })
    }

    /// Open `path` with `source`, run every stage, and release the document.
    ///
    /// The document name is derived from the file name.
    ///
    /// # Errors
    ///
    /// Returns the source's open error or [`Error::StructureNotFound`].
    pub fn process_path<S: PageSource + ?Sized>(
        &self,
        source: &S,
        path: &Path,
    ) -> Result<DocumentOutput> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let document_name = document_name_from_filename(&filename);

        let doc = source.open(path)?;
        self.process(&doc, &document_name)
    }
}
