//! The pyramid level loop: tile, persist, subsample, repeat.
//!
//! Each level doubles the tile edge length and quarters the point
//! population, which keeps per-tile point counts roughly stable across
//! levels. The loop stops at the first level whose single tile covers the
//! whole level-0 bounding box, or after `max_levels` levels.

use crate::attributes::{AttributeBundle, BoundingBox};
use crate::catalog::IDENTITY_SENTINEL;
use crate::config::PyramidConfig;
use crate::container::{ArrayData, ContainerSink};
use crate::error::Result;
use crate::metadata::GridsAttrs;
use crate::tiler::assign_tiles;
use log::{debug, info};
use rand::Rng;

/// Name of the group holding the pyramid levels.
pub const GRIDS_GROUP: &str = "grids";

/// Builds the level hierarchy under the `grids` group of a container.
#[derive(Debug)]
pub struct PyramidBuilder<'a> {
    config: &'a PyramidConfig,
    bbox: BoundingBox,
}

impl<'a> PyramidBuilder<'a> {
    pub fn new(config: &'a PyramidConfig, bbox: BoundingBox) -> Self {
        Self { config, bbox }
    }

    /// Run the level loop over the full-resolution bundle, writing every
    /// materialized tile into `sink` and returning the accumulated grid
    /// metadata.
    ///
    /// The caller is responsible for creating the `grids` group itself and
    /// attaching the returned attributes to it. Randomness for subsampling
    /// is injected so tests can seed it; each level's working set is an
    /// immutable snapshot and producing the next one is a pure selection.
    pub fn build<S, R>(
        &self,
        bundle: AttributeBundle,
        sink: &mut S,
        rng: &mut R,
    ) -> Result<GridsAttrs>
    where
        S: ContainerSink,
        R: Rng,
    {
        let mut attrs = GridsAttrs::new(self.config.base_grid_size);
        let mut working = bundle;
        let mut terminated = false;

        for level in 0..self.config.max_levels {
            let tile_size = self.config.base_grid_size * f64::powi(2.0, level as i32);
            let level_path = format!("{}/{}", GRIDS_GROUP, level);
            sink.create_group(&level_path)?;
            attrs.push_level();

            info!("Level {}: {} transcripts", level, working.len());

            let tiles = assign_tiles(&working.x, &working.y, tile_size, &self.bbox);
            let (n_tiles_x, n_tiles_y) = self.bbox.tile_counts(tile_size);

            for (key, indices) in &tiles {
                let tile = working.select(indices);
                let tile_path = format!("{}/{}", level_path, key);

                sink.create_group(&tile_path)?;
                self.write_tile(sink, &tile_path, &tile)?;
                attrs.record_tile(key.to_string(), tile.len());

                debug!("Level {} tile {}: {} transcripts", level, key, tile.len());
            }

            if n_tiles_x * n_tiles_y == 1 {
                attrs.number_levels = level + 1;
                terminated = true;
                break;
            }

            working = self.subsample(&working, rng);
        }

        if !terminated {
            // The box never collapsed into one tile; the pyramid is
            // truncated at max_levels.
            attrs.number_levels = self.config.max_levels;
        }

        Ok(attrs)
    }

    /// Select `floor(n / subsample_factor)` points uniformly at random
    /// without replacement. Indices are applied in ascending order so
    /// survivors keep their relative order.
    fn subsample<R: Rng>(&self, working: &AttributeBundle, rng: &mut R) -> AttributeBundle {
        let n = working.len();
        let amount = n / self.config.subsample_factor;

        let mut indices = rand::seq::index::sample(rng, n, amount).into_vec();
        indices.sort_unstable();

        working.select(&indices)
    }

    /// Write the eight per-point arrays of one tile.
    fn write_tile<S: ContainerSink>(
        &self,
        sink: &mut S,
        tile_path: &str,
        tile: &AttributeBundle,
    ) -> Result<()> {
        let n = tile.len();

        sink.create_array(
            tile_path,
            "valid",
            &ArrayData::U8 {
                cols: 1,
                data: vec![1; n],
            },
        )?;

        sink.create_array(
            tile_path,
            "status",
            &ArrayData::U8 {
                cols: 1,
                data: vec![0; n],
            },
        )?;

        let mut location = Vec::with_capacity(n * 3);
        for i in 0..n {
            location.push(tile.x[i] as f32);
            location.push(tile.y[i] as f32);
            location.push(0.0);
        }
        sink.create_array(tile_path, "location", &ArrayData::F32 { cols: 3, data: location })?;

        sink.create_array(
            tile_path,
            "gene_identity",
            &ArrayData::U16 {
                cols: 1,
                data: tile.gene_codes.clone(),
            },
        )?;

        sink.create_array(
            tile_path,
            "quality_score",
            &ArrayData::F32 {
                cols: 1,
                data: vec![self.config.quality_score; n],
            },
        )?;

        let mut codeword_identity = Vec::with_capacity(n * 2);
        for &code in &tile.gene_codes {
            codeword_identity.push(code);
            codeword_identity.push(IDENTITY_SENTINEL);
        }
        sink.create_array(
            tile_path,
            "codeword_identity",
            &ArrayData::U16 {
                cols: 2,
                data: codeword_identity,
            },
        )?;

        // "uuid" and "id" carry the same (sequential index, sentinel)
        // pair; the viewer reads them as distinct fields.
        let mut identity = Vec::with_capacity(n * 2);
        for &id in &tile.ids {
            identity.push(id);
            identity.push(IDENTITY_SENTINEL as u32);
        }
        sink.create_array(
            tile_path,
            "uuid",
            &ArrayData::U32 {
                cols: 2,
                data: identity.clone(),
            },
        )?;
        sink.create_array(tile_path, "id", &ArrayData::U32 { cols: 2, data: identity })?;

        Ok(())
    }
}
