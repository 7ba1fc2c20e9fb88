//! Per-point attribute columns and input validation.
//!
//! The attribute bundle is the column-oriented form of the transcript table
//! that the pyramid loop narrows level by level. Columns that are constant
//! for every point (z, validity, status, quality score) are not stored here;
//! they are materialized at write time from the tile's row count.

use crate::catalog::GeneCatalog;
use crate::error::{Result, RnagridError};
use crate::table::TranscriptRecord;

/// The level-0 bounding box, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Tile counts along each axis for a given tile edge length.
    pub fn tile_counts(&self, tile_size: f64) -> (usize, usize) {
        let nx = (self.xmax / tile_size).ceil() as usize;
        let ny = (self.ymax / tile_size).ceil() as usize;
        (nx, ny)
    }
}

/// Parallel per-point attribute arrays, indexed 1:1 with the points.
///
/// `ids` carries the sequential index assigned once from the
/// full-resolution set; subsampled bundles keep the original values rather
/// than renumbering, so a point's id is stable across all levels it
/// survives into.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBundle {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub gene_codes: Vec<u16>,
    pub ids: Vec<u32>,
}

impl AttributeBundle {
    /// Number of points in the bundle.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Slice every parallel array by the given point indices.
    ///
    /// Used both for cutting a tile out of a level's working set and for
    /// deriving the next level's working set from a subsample.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: indices.iter().map(|&i| self.x[i]).collect(),
            y: indices.iter().map(|&i| self.y[i]).collect(),
            gene_codes: indices.iter().map(|&i| self.gene_codes[i]).collect(),
            ids: indices.iter().map(|&i| self.ids[i]).collect(),
        }
    }
}

/// Validate the input records and build the full-resolution bundle plus the
/// global bounding box.
///
/// Every coordinate must be finite and non-negative; the target coordinate
/// space cannot represent anything else. Gene labels are resolved against
/// the catalog, which must have been built from the same records.
pub fn prepare_attributes(
    records: &[TranscriptRecord],
    catalog: &GeneCatalog,
) -> Result<(AttributeBundle, BoundingBox)> {
    if records.len() > u32::MAX as usize {
        return Err(RnagridError::InvalidInput(format!(
            "Too many transcripts: {} (max {})",
            records.len(),
            u32::MAX
        )));
    }

    let mut x = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());
    let mut gene_codes = Vec::with_capacity(records.len());
    let mut ids = Vec::with_capacity(records.len());

    let mut xmax: f64 = 0.0;
    let mut ymax: f64 = 0.0;

    for (idx, record) in records.iter().enumerate() {
        validate_coordinate(record.x, "x", idx)?;
        validate_coordinate(record.y, "y", idx)?;

        let code = catalog.code_of(&record.gene).ok_or_else(|| {
            RnagridError::SchemaViolation(format!(
                "Gene '{}' at index {} is not in the catalog",
                record.gene, idx
            ))
        })?;

        xmax = xmax.max(record.x);
        ymax = ymax.max(record.y);

        x.push(record.x);
        y.push(record.y);
        gene_codes.push(code);
        ids.push(idx as u32);
    }

    Ok((
        AttributeBundle {
            x,
            y,
            gene_codes,
            ids,
        },
        BoundingBox { xmax, ymax },
    ))
}

fn validate_coordinate(value: f64, axis: &str, idx: usize) -> Result<()> {
    if !value.is_finite() {
        return Err(RnagridError::InvalidInput(format!(
            "Point at index {}: {} must be finite, got: {}",
            idx, axis, value
        )));
    }

    if value < 0.0 {
        return Err(RnagridError::InvalidInput(format!(
            "Point at index {}: {} must be non-negative, got: {}",
            idx, axis, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TranscriptRecord> {
        vec![
            TranscriptRecord::new(10.0, 10.0, "A"),
            TranscriptRecord::new(10.0, 10.0, "B"),
            TranscriptRecord::new(300.0, 10.0, "A"),
            TranscriptRecord::new(300.0, 300.0, "C"),
        ]
    }

    #[test]
    fn test_prepare_attributes() {
        let records = records();
        let catalog = GeneCatalog::from_labels(records.iter().map(|r| &r.gene)).unwrap();
        let (bundle, bbox) = prepare_attributes(&records, &catalog).unwrap();

        assert_eq!(bundle.len(), 4);
        assert_eq!(bundle.gene_codes, vec![0, 1, 0, 2]);
        assert_eq!(bundle.ids, vec![0, 1, 2, 3]);
        assert_eq!(bbox.xmax, 300.0);
        assert_eq!(bbox.ymax, 300.0);
    }

    #[test]
    fn test_negative_coordinate_rejected() {
        let records = vec![TranscriptRecord::new(-1.0, 5.0, "A")];
        let catalog = GeneCatalog::from_labels(["A"]).unwrap();
        let err = prepare_attributes(&records, &catalog).unwrap_err();
        assert!(matches!(err, RnagridError::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let records = vec![TranscriptRecord::new(1.0, f64::NAN, "A")];
        let catalog = GeneCatalog::from_labels(["A"]).unwrap();
        assert!(prepare_attributes(&records, &catalog).is_err());

        let records = vec![TranscriptRecord::new(f64::INFINITY, 1.0, "A")];
        assert!(prepare_attributes(&records, &catalog).is_err());
    }

    #[test]
    fn test_gene_outside_catalog_is_schema_violation() {
        let records = vec![TranscriptRecord::new(1.0, 1.0, "UNKNOWN")];
        let catalog = GeneCatalog::from_labels(["A"]).unwrap();
        let err = prepare_attributes(&records, &catalog).unwrap_err();
        assert!(matches!(err, RnagridError::SchemaViolation(_)));
    }

    #[test]
    fn test_select_slices_all_columns() {
        let records = records();
        let catalog = GeneCatalog::from_labels(records.iter().map(|r| &r.gene)).unwrap();
        let (bundle, _) = prepare_attributes(&records, &catalog).unwrap();

        let sliced = bundle.select(&[1, 3]);
        assert_eq!(sliced.len(), 2);
        assert_eq!(sliced.x, vec![10.0, 300.0]);
        assert_eq!(sliced.gene_codes, vec![1, 2]);
        // Original ids survive slicing; they are never renumbered.
        assert_eq!(sliced.ids, vec![1, 3]);
    }

    #[test]
    fn test_empty_input() {
        let catalog = GeneCatalog::from_labels(Vec::<String>::new()).unwrap();
        let (bundle, bbox) = prepare_attributes(&[], &catalog).unwrap();
        assert!(bundle.is_empty());
        assert_eq!(bbox.xmax, 0.0);
        assert_eq!(bbox.ymax, 0.0);
    }

    #[test]
    fn test_tile_counts() {
        let bbox = BoundingBox {
            xmax: 300.0,
            ymax: 300.0,
        };
        assert_eq!(bbox.tile_counts(250.0), (2, 2));
        assert_eq!(bbox.tile_counts(500.0), (1, 1));
    }
}
