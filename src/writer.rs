//! Top-level entry point: records in, archive on disk out.

use crate::attributes::prepare_attributes;
use crate::catalog::GeneCatalog;
use crate::config::PyramidConfig;
use crate::container::ContainerSink;
use crate::error::Result;
use crate::metadata::RootAttrs;
use crate::pyramid::{GRIDS_GROUP, PyramidBuilder};
use crate::table::TranscriptRecord;
use crate::zarr::ZarrZipStore;
use log::info;
use rand::Rng;
use std::path::Path;
use uuid::Uuid;

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidSummary {
    pub number_rnas: usize,
    pub number_genes: usize,
    pub number_levels: usize,
}

/// Build the full pyramid archive at `path` from the given records.
///
/// Validation happens before the target file is touched; an existing file
/// at `path` is removed once writing begins. Subsampling uses an unseeded
/// random source; use [`write_transcripts_with_rng`] for reproducible runs.
pub fn write_transcripts<P: AsRef<Path>>(
    path: P,
    records: &[TranscriptRecord],
    config: &PyramidConfig,
) -> Result<PyramidSummary> {
    write_transcripts_with_rng(path, records, config, &mut rand::thread_rng())
}

/// [`write_transcripts`] with an injected random source for subsampling.
pub fn write_transcripts_with_rng<P: AsRef<Path>, R: Rng>(
    path: P,
    records: &[TranscriptRecord],
    config: &PyramidConfig,
    rng: &mut R,
) -> Result<PyramidSummary> {
    config.validate()?;

    // Everything that can reject the input runs before the target file is
    // replaced.
    let catalog = GeneCatalog::from_labels(records.iter().map(|r| r.gene.as_str()))?;
    let (bundle, bbox) = prepare_attributes(records, &catalog)?;

    let number_rnas = bundle.len();
    let dataset_uuid = Uuid::new_v4().to_string();

    info!(
        "Writing {} transcripts ({} genes) to {}",
        number_rnas,
        catalog.len(),
        path.as_ref().display()
    );

    let mut store = ZarrZipStore::open(path)?;
    store.create_group("")?;

    let root_attrs = RootAttrs::new(&catalog, number_rnas, dataset_uuid);
    store.set_attributes("", &serde_json::to_value(&root_attrs)?)?;

    store.create_group(GRIDS_GROUP)?;

    let grids_attrs = PyramidBuilder::new(config, bbox).build(bundle, &mut store, rng)?;
    store.set_attributes(GRIDS_GROUP, &serde_json::to_value(&grids_attrs)?)?;

    store.finish()?;

    info!("Wrote {} levels", grids_attrs.number_levels);

    Ok(PyramidSummary {
        number_rnas,
        number_genes: catalog.len(),
        number_levels: grids_attrs.number_levels,
    })
}
