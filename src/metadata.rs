//! Root and grid attribute maps of the output container.
//!
//! Field names and constants here are the schema the downstream viewer
//! reads; they are not negotiable.

use crate::catalog::GeneCatalog;
use serde::Serialize;
use std::collections::BTreeMap;

/// Attributes attached to the container root.
#[derive(Debug, Clone, Serialize)]
pub struct RootAttrs {
    pub codeword_count: usize,
    pub codeword_gene_mapping: Vec<usize>,
    pub codeword_gene_names: Vec<String>,
    pub gene_names: Vec<String>,
    pub gene_index_map: BTreeMap<String, u16>,
    pub number_genes: usize,
    pub spatial_units: &'static str,
    pub coordinate_space: &'static str,
    pub major_version: u32,
    pub minor_version: u32,
    pub name: &'static str,
    pub number_rnas: usize,
    pub dataset_uuid: String,
    pub data_format: u32,
}

impl RootAttrs {
    pub fn new(catalog: &GeneCatalog, number_rnas: usize, dataset_uuid: String) -> Self {
        let gene_names = catalog.names().to_vec();
        let number_genes = gene_names.len();

        // Codewords map 1:1 onto genes: codeword i decodes gene i.
        let codeword_gene_mapping: Vec<usize> = (0..number_genes).collect();
        let gene_index_map = gene_names
            .iter()
            .enumerate()
            .map(|(code, name)| (name.clone(), code as u16))
            .collect();

        Self {
            codeword_count: number_genes,
            codeword_gene_mapping,
            codeword_gene_names: gene_names.clone(),
            gene_names,
            gene_index_map,
            number_genes,
            spatial_units: "micron",
            coordinate_space: "refined-final_global_micron",
            major_version: 4,
            minor_version: 1,
            name: "RnaDataset",
            number_rnas,
            dataset_uuid,
            data_format: 0,
        }
    }
}

/// Attributes attached to the `grids` group, accumulated per level.
///
/// `grid_array_shapes` holds an empty-map placeholder per materialized
/// tile; the viewer tolerates it and nothing else fills it today.
#[derive(Debug, Clone, Serialize)]
pub struct GridsAttrs {
    pub grid_key_names: Vec<&'static str>,
    pub grid_zip: bool,
    pub grid_size: Vec<f64>,
    pub grid_array_shapes: Vec<Vec<serde_json::Map<String, serde_json::Value>>>,
    pub grid_number_objects: Vec<Vec<usize>>,
    pub grid_keys: Vec<Vec<String>>,
    pub number_levels: usize,
}

impl GridsAttrs {
    pub fn new(base_grid_size: f64) -> Self {
        Self {
            grid_key_names: vec!["grid_x_loc", "grid_y_loc"],
            grid_zip: false,
            grid_size: vec![base_grid_size],
            grid_array_shapes: Vec::new(),
            grid_number_objects: Vec::new(),
            grid_keys: Vec::new(),
            number_levels: 0,
        }
    }

    /// Open bookkeeping for a new level.
    pub fn push_level(&mut self) {
        self.grid_array_shapes.push(Vec::new());
        self.grid_number_objects.push(Vec::new());
        self.grid_keys.push(Vec::new());
    }

    /// Record one materialized tile at the current (last) level.
    pub fn record_tile(&mut self, key: String, number_objects: usize) {
        if let (Some(shapes), Some(objects), Some(keys)) = (
            self.grid_array_shapes.last_mut(),
            self.grid_number_objects.last_mut(),
            self.grid_keys.last_mut(),
        ) {
            shapes.push(serde_json::Map::new());
            objects.push(number_objects);
            keys.push(key);
        }
    }
}
