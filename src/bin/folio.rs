//! Command-line front end for folio.
//!
//! ```bash
//! pdftotext -layout -y 114 -H 665 manual.pdf manual.txt
//! folio build manual.txt other.txt --output ./rag_output
//! folio inspect manual.txt
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio::{
    build_page_ranges, check_duplicates, extract_toc, find_toc_page, manifest_path,
    BatchProcessor, DocumentPipeline, FormFeedSource, PageDocument, PageSource, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "folio", about = "Section-aware chunking of regulation manuals")]
struct Cli {
    /// JSON config file (fields not given keep their defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk form-feed separated page dumps and write chunks.json
    Build {
        /// Page dumps to process
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output directory for the chunk manifest
        #[arg(short, long, default_value = "./rag_output")]
        output: PathBuf,
        /// Maximum characters per chunk
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Characters shared by consecutive chunks
        #[arg(long)]
        chunk_overlap: Option<usize>,
        /// Worker threads (default: one per core)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Print the recovered table of contents and page ranges of one dump
    Inspect {
        /// Page dump to inspect
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Build {
            files,
            output,
            chunk_size,
            chunk_overlap,
            workers,
        } => {
            let config = PipelineConfig {
                chunk_max_length: chunk_size.unwrap_or(config.chunk_max_length),
                chunk_overlap: chunk_overlap.unwrap_or(config.chunk_overlap),
                workers: workers.unwrap_or(config.workers),
                ..config
            };
            build(config, &files, &output)
        }
        Commands::Inspect { file } => inspect(&config, &file),
    }
}

fn build(config: PipelineConfig, files: &[PathBuf], output: &Path) -> anyhow::Result<()> {
    let t0 = Instant::now();
    let pipeline = DocumentPipeline::new(config).context("invalid configuration")?;
    let processor = BatchProcessor::new(pipeline, FormFeedSource);

    let report = processor
        .process_and_save(files, output)
        .context("batch failed")?;

    println!("Files:   {}", report.total_files);
    println!("Success: {}", report.success_count);
    println!("Failed:  {}", report.failed_count);
    println!("Chunks:  {}", report.total_chunks);
    for failure in report.failures() {
        if let folio::FileOutcome::Failed { filename, error } = failure {
            println!("  ✗ {filename}: {error}");
        }
    }
    println!(
        "\nWrote {} in {:.1}s",
        manifest_path(output).display(),
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

fn inspect(config: &PipelineConfig, file: &Path) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;
    let doc = FormFeedSource
        .open(file)
        .with_context(|| format!("failed to open {}", file.display()))?;

    let Some(toc_page) = find_toc_page(&doc, config) else {
        anyhow::bail!(
            "no page of {} contains {:?}",
            file.display(),
            config.toc_marker
        );
    };
    let toc = extract_toc(&doc, toc_page, config);
    let duplicates = check_duplicates(&toc);
    let sections = build_page_ranges(toc, doc.page_count());

    println!(
        "TOC on page {} of {} ({} entries)\n",
        toc_page + 1,
        doc.page_count(),
        sections.len()
    );
    println!("{:<10} | {:<40} | {:>5} | {:>11}", "Id", "Title", "Page", "Range");
    println!("{}", "-".repeat(76));
    for s in &sections {
        let range = format!("{}-{}", s.start_page + 1, s.end_page + 1);
        let flag = if s.collapsed { " !" } else { "" };
        println!(
            "{:<10} | {:<40} | {:>5} | {:>11}{flag}",
            s.section_id(),
            truncate(s.section_title(), 40),
            s.entry.page,
            range
        );
    }

    if duplicates.has_duplicates {
        println!("\n--- Duplicate titles ---");
        for (title, ids) in &duplicates.duplicates {
            let ids: Vec<_> = ids.iter().map(String::as_str).collect();
            println!("  {title}: {}", ids.join(", "));
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
