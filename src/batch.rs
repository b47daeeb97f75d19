//! Batch processing across documents.
//!
//! Documents are independent, so a batch runs them on a bounded rayon pool.
//! A failing document (unreadable file, no table of contents) is recorded
//! with its file name and message; its siblings carry on. Results keep the
//! order of the input paths.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::manifest::{save_chunks, MANIFEST_FILE};
use crate::page::PageSource;
use crate::{DocumentPipeline, EnrichedChunk, Error, Result};

/// Outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// The document was processed.
    Success {
        /// File name of the document.
        filename: String,
        /// Name stamped into its chunks.
        document_name: String,
        /// Number of sections recovered.
        num_sections: usize,
        /// Number of chunks produced.
        num_chunks: usize,
    },
    /// The document failed.
    Failed {
        /// File name of the document.
        filename: String,
        /// Error message.
        error: String,
    },
}

impl FileOutcome {
    /// File name of the document.
    pub fn filename(&self) -> &str {
        match self {
            Self::Success { filename, .. } | Self::Failed { filename, .. } => filename,
        }
    }

    /// Whether the document was processed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Aggregate result of a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of input files.
    pub total_files: usize,
    /// Files processed successfully.
    pub success_count: usize,
    /// Files that failed.
    pub failed_count: usize,
    /// Chunks from all successful files.
    pub total_chunks: usize,
    /// Every chunk, in input-file order.
    pub chunks: Vec<EnrichedChunk>,
    /// Per-file outcomes, in input order.
    pub results: Vec<FileOutcome>,
}

impl BatchReport {
    /// Outcomes of the files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// Runs a [`DocumentPipeline`] over many files.
#[derive(Debug)]
pub struct BatchProcessor<S> {
    pipeline: DocumentPipeline,
    source: S,
}

impl<S: PageSource> BatchProcessor<S> {
    /// Create a batch processor reading documents through `source`.
    pub fn new(pipeline: DocumentPipeline, source: S) -> Self {
        Self { pipeline, source }
    }

    /// The pipeline applied to each document.
    pub fn pipeline(&self) -> &DocumentPipeline {
        &self.pipeline
    }

    /// Process every path.
    ///
    /// # Errors
    ///
    /// Only fails if the worker pool cannot be built. Per-document failures
    /// are reported in [`BatchReport::results`].
    pub fn process_all<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Result<BatchReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.pipeline.config().workers)
            .build()?;

        tracing::info!(
            files = paths.len(),
            workers = pool.current_num_threads(),
            "starting batch"
        );

        let outcomes: Vec<(FileOutcome, Vec<EnrichedChunk>)> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.process_one(path.as_ref()))
                .collect()
        });

        let mut report = BatchReport {
            total_files: paths.len(),
            ..BatchReport::default()
        };
        for (outcome, chunks) in outcomes {
            if outcome.is_success() {
                report.success_count += 1;
            } else {
                report.failed_count += 1;
            }
            report.chunks.extend(chunks);
            report.results.push(outcome);
        }
        report.total_chunks = report.chunks.len();

        tracing::info!(
            total = report.total_files,
            success = report.success_count,
            failed = report.failed_count,
            chunks = report.total_chunks,
            "batch finished"
        );
        Ok(report)
    }

    /// Process every path and write the chunk manifest into `output_dir`.
    ///
    /// The manifest lands at `output_dir/chunks.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoChunksProduced`] if no document yielded a chunk, or
    /// an error if the manifest cannot be written.
    pub fn process_and_save<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchReport> {
        let report = self.process_all(paths)?;
        if report.total_chunks == 0 {
            return Err(Error::NoChunksProduced);
        }

        let manifest = manifest_path(output_dir);
        save_chunks(&manifest, &report.chunks)?;
        tracing::info!(path = %manifest.display(), "wrote chunk manifest");
        Ok(report)
    }

    fn process_one(&self, path: &Path) -> (FileOutcome, Vec<EnrichedChunk>) {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match self.pipeline.process_path(&self.source, path) {
            Ok(output) => (
                FileOutcome::Success {
                    filename,
                    document_name: output.document_name,
                    num_sections: output.sections.len(),
                    num_chunks: output.chunks.len(),
                },
                output.chunks,
            ),
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "document failed");
                (
                    FileOutcome::Failed {
                        filename,
                        error: e.to_string(),
                    },
                    Vec::new(),
                )
            }
        }
    }
}

/// Where [`BatchProcessor::process_and_save`] writes the manifest.
pub fn manifest_path(output_dir: impl AsRef<Path>) -> PathBuf {
    output_dir.as_ref().join(MANIFEST_FILE)
}
