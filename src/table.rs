//! Loading the transcript table from a delimited file.

use crate::config::PyramidConfig;
use crate::error::{Result, RnagridError};
use std::io::Read;
use std::path::Path;

/// One row of the source table: a 2D position and a gene label.
///
/// The source of truth for the whole run; immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub x: f64,
    pub y: f64,
    pub gene: String,
}

impl TranscriptRecord {
    pub fn new(x: f64, y: f64, gene: impl Into<String>) -> Self {
        Self {
            x,
            y,
            gene: gene.into(),
        }
    }
}

/// Read transcript records from a CSV file with a header row.
///
/// Column names come from the configuration (`x`, `y`, `gene` by default).
pub fn read_transcripts<P: AsRef<Path>>(
    path: P,
    config: &PyramidConfig,
) -> Result<Vec<TranscriptRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_transcripts_from(file, config)
}

/// Read transcript records from any CSV source with a header row.
pub fn read_transcripts_from<R: Read>(
    reader: R,
    config: &PyramidConfig,
) -> Result<Vec<TranscriptRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let x_idx = column_index(&headers, &config.x_column)?;
    let y_idx = column_index(&headers, &config.y_column)?;
    let gene_idx = column_index(&headers, &config.gene_column)?;

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let x = parse_coordinate(&record, x_idx, &config.x_column, row)?;
        let y = parse_coordinate(&record, y_idx, &config.y_column, row)?;
        let gene = record.get(gene_idx).unwrap_or("").to_string();

        records.push(TranscriptRecord { x, y, gene });
    }

    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| RnagridError::InvalidInput(format!("Missing column '{}' in input table", name)))
}

fn parse_coordinate(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> Result<f64> {
    let field = record.get(idx).ok_or_else(|| {
        RnagridError::InvalidInput(format!("Row {} is missing column '{}'", row, column))
    })?;

    field.parse::<f64>().map_err(|_| {
        RnagridError::InvalidInput(format!(
            "Row {} column '{}': cannot parse '{}' as a number",
            row, column, field
        ))
    })
}
