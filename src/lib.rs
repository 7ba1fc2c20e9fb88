//! Multi-resolution tile pyramids for spatial transcriptomics point data.
//!
//! Converts a flat table of transcript detections (2D position + gene
//! label) into a pyramid of spatial tiles persisted as a zarr-v2-in-zip
//! archive, for viewers that render millions of points at varying zoom
//! levels without loading the full dataset.
//!
//! ```rust
//! use rnagrid::{PyramidConfig, TranscriptRecord, write_transcripts};
//!
//! let records = vec![
//!     TranscriptRecord::new(10.0, 10.0, "ACTB"),
//!     TranscriptRecord::new(300.0, 300.0, "GAPDH"),
//! ];
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("transcripts.zarr.zip");
//! let summary = write_transcripts(&path, &records, &PyramidConfig::default())?;
//! assert_eq!(summary.number_genes, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attributes;
pub mod catalog;
pub mod config;
pub mod container;
pub mod error;
pub mod metadata;
pub mod pyramid;
pub mod table;
pub mod tiler;
pub mod writer;
pub mod zarr;

pub use attributes::{AttributeBundle, BoundingBox, prepare_attributes};
pub use catalog::{GeneCatalog, IDENTITY_SENTINEL};
pub use config::PyramidConfig;
pub use container::{ArrayData, ContainerSink};
pub use error::{Result, RnagridError};
pub use metadata::{GridsAttrs, RootAttrs};
pub use pyramid::PyramidBuilder;
pub use table::{TranscriptRecord, read_transcripts, read_transcripts_from};
pub use tiler::{TileKey, assign_tiles};
pub use writer::{PyramidSummary, write_transcripts, write_transcripts_with_rng};
pub use zarr::ZarrZipStore;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{PyramidConfig, Result, RnagridError};

    pub use crate::{PyramidSummary, write_transcripts, write_transcripts_with_rng};

    pub use crate::{TranscriptRecord, read_transcripts};

    pub use crate::{GeneCatalog, TileKey};
}
