use anyhow::Context;
use clap::Parser;
use rnagrid::{PyramidConfig, read_transcripts, write_transcripts};
use std::path::PathBuf;

/// Convert a transcript table into a multi-resolution tile pyramid archive.
#[derive(Parser, Debug)]
#[command(name = "rnagrid", version)]
struct Args {
    /// Path to the zarr.zip file to be created
    #[arg(short, long)]
    path: PathBuf,

    /// Path to the transcript table (CSV with a header row)
    #[arg(short, long)]
    data: PathBuf,

    /// Input column holding the x coordinate
    #[arg(long, default_value = "x")]
    x_column: String,

    /// Input column holding the y coordinate
    #[arg(long, default_value = "y")]
    y_column: String,

    /// Input column holding the gene label
    #[arg(long, default_value = "gene")]
    gene_column: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = PyramidConfig::default().with_columns(
        args.x_column,
        args.y_column,
        args.gene_column,
    );

    let records = read_transcripts(&args.data, &config)
        .with_context(|| format!("Failed to read transcript table {}", args.data.display()))?;

    let summary = write_transcripts(&args.path, &records, &config)
        .with_context(|| format!("Failed to write pyramid to {}", args.path.display()))?;

    println!(
        "Wrote {} transcripts across {} levels ({} genes) to {}",
        summary.number_rnas,
        summary.number_levels,
        summary.number_genes,
        args.path.display()
    );

    Ok(())
}
