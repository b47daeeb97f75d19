//! # folio
//!
//! Section recovery and chunking of regulation manuals for retrieval-augmented
//! generation (RAG) pipelines.
//!
//! ## The Problem
//!
//! Regulation manuals are long, numbered, and cross-referenced. Retrieval
//! works best when every chunk belongs to exactly one section and knows which
//! one. Blind fixed-size chunking over the whole document mixes the tail of
//! section 3.1 with the start of 3.2 and loses the section number entirely.
//!
//! The manual already says where its sections are: the table of contents.
//! But the TOC is only a hint:
//!
//! - Numbering styles vary inside one document (`1.1.`, `1.1`, `1. 1`, `1.`)
//! - Printed page numbers are off by a page, or repeated
//! - Sections start mid-page, so pages are shared between sections
//! - Dot leaders and page numbers have to be peeled off every title
//!
//! ## The Pipeline
//!
//! ```text
//! 1. find_toc_page        first page containing the TOC marker
//! 2. extract_toc          TOC lines -> (section_id, title, page)
//! 3. build_page_ranges    printed pages -> 0-based page ranges
//! 4. extract_section_text stitch pages, re-anchor on "<id> <title>", slice
//! 5. create_rag_chunks    overlapping fixed-length windows per section
//! 6. enrich               prepend document/section header, add document_name
//! 7. check_duplicates     titles mapped to several section ids
//! ```
//!
//! Every stage is a pure function over in-memory values. Page text comes
//! from a [`PageSource`]; layout extraction from document binaries happens
//! outside this crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::{DocumentPipeline, PageText, PipelineConfig};
//!
//! let doc = PageText::from_pages([
//!     "자동차보험 약관",
//!     "목 차\n1 총칙 .......... 3\n2 보상하는 손해 .......... 4",
//!     "1 총칙\n이 약관은 자동차보험 계약에 적용합니다.",
//!     "2 보상하는 손해\n회사는 사고로 인한 손해를 보상합니다.",
//! ]);
//!
//! let pipeline = DocumentPipeline::new(PipelineConfig::default()).unwrap();
//! let output = pipeline.process(&doc, "자동차보험약관").unwrap();
//!
//! assert_eq!(output.sections.len(), 2);
//! assert_eq!(output.chunks[0].id, "1_0");
//! assert!(output.chunks[0].text.starts_with("문서: 자동차보험약관\n섹션: 1 - 총칙"));
//! ```
//!
//! ## Batches
//!
//! [`BatchProcessor`] runs many documents on a bounded worker pool, records a
//! per-file outcome, and writes every chunk to a JSON manifest. A document
//! without a table of contents fails alone.

mod batch;
mod chunk;
mod config;
mod duplicates;
mod enrich;
mod error;
mod extract;
mod manifest;
mod page;
mod pipeline;
mod section;
mod toc;

pub use batch::{manifest_path, BatchProcessor, BatchReport, FileOutcome};
pub use chunk::{chunk_text, create_rag_chunks, Chunk, ChunkMetadata, Window, WindowChunker};
pub use config::{HeaderLabels, PipelineConfig};
pub use duplicates::{check_duplicates, DuplicateReport, SectionRecord};
pub use enrich::{document_name_from_filename, enrich, EnrichedChunk, EnrichedMetadata};
pub use error::{Error, Result};
pub use extract::{
    extract_section_text, find_body_end, find_body_start, slice_section_body, stitch_pages,
    SectionText,
};
pub use manifest::{load_chunks, save_chunks, MANIFEST_FILE};
pub use page::{Crop, FormFeedSource, PageDocument, PageSource, PageText};
pub use pipeline::{DocumentOutput, DocumentPipeline};
pub use section::{build_page_ranges, Section};
pub use toc::{
    extract_toc, find_toc_page, parse_toc_line, NumberingGrammar, TocEntry, NUMBERING_GRAMMARS,
};
