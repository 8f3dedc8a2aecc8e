//! Batch front end for the resolution pipeline.
//!
//! Reads entity names from a CSV column, runs the cached search plus
//! extraction batch, and writes the two result tables next to each other:
//! `raw_search_results.csv` (one row per hit) and `processed_results.csv`
//! (one row per entity).

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resolution::{
    write_processed_csv, write_raw_csv, GroqChat, Resolver, SearchCache, SerpApiClient,
};

#[derive(Parser)]
#[command(
    name = "lookup",
    about = "Search entities on the web and extract structured answers with an LLM"
)]
struct Args {
    /// CSV file holding the entities to process
    input: PathBuf,

    /// Name of the column holding the entity names
    #[arg(long, default_value = "entity")]
    column: String,

    /// Prompt template with a {company} placeholder
    #[arg(long, default_value = "Get me the email address of {company}")]
    template: String,

    /// Directory for cached search results
    #[arg(long, default_value = "data/search_cache")]
    cache_dir: PathBuf,

    /// Directory the output tables are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let entities = read_entities(&args.input, &args.column)?;
    if entities.is_empty() {
        bail!(
            "no entities found in column {:?} of {}",
            args.column,
            args.input.display()
        );
    }
    tracing::info!("processing {} entities", entities.len());

    let resolver = Resolver::new(
        SerpApiClient::from_env()?,
        GroqChat::from_env()?,
        SearchCache::new(&args.cache_dir),
    );

    let output = resolver.run(&entities, &args.template).await?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let raw_path = args.out_dir.join("raw_search_results.csv");
    write_raw_csv(&output.raw, File::create(&raw_path)?)
        .with_context(|| format!("writing {}", raw_path.display()))?;

    let processed_path = args.out_dir.join("processed_results.csv");
    write_processed_csv(&output.processed, File::create(&processed_path)?)
        .with_context(|| format!("writing {}", processed_path.display()))?;

    for record in &output.processed {
        println!(
            "{}: {} [{}] ({})",
            record.entity, record.extracted_info, record.confidence, record.source
        );
    }
    println!(
        "\nwrote {} raw rows to {} and {} records to {}",
        output.raw.len(),
        raw_path.display(),
        output.processed.len(),
        processed_path.display()
    );

    Ok(())
}

/// Read the entity column, trimming whitespace and skipping blanks.
fn read_entities(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("reading {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h == column)
        .with_context(|| format!("column {:?} not found in {}", column, path.display()))?;

    let mut entities = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(idx) {
            let value = value.trim();
            if !value.is_empty() {
                entities.push(value.to_string());
            }
        }
    }
    Ok(entities)
}
