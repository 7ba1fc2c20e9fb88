//! Zarr v2 container written into a single zip archive.
//!
//! The layout matches what a zarr ZipStore produces: each group is a
//! `.zgroup` entry, attribute maps are `.zattrs` entries, and each array is
//! a `.zarray` metadata entry plus one raw little-endian chunk `0.0`
//! covering the full array (no sub-chunking, no compressor). Zip entries
//! are stored uncompressed.

use crate::container::{ArrayData, ContainerSink};
use crate::error::Result;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Write-once zarr-in-zip container.
///
/// Opening deletes any pre-existing file at the target path; there are no
/// merge or append semantics. A partially-written archive is only valid
/// once `finish` returns.
pub struct ZarrZipStore {
    writer: ZipWriter<File>,
    path: PathBuf,
}

impl ZarrZipStore {
    /// Open a new archive for writing, replacing any existing file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        let file = File::create(&path)?;
        Ok(Self {
            writer: ZipWriter::new(file),
            path,
        })
    }

    /// Path of the archive being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entry_options() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer.start_file(name, Self::entry_options())?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn write_json(&mut self, name: &str, value: &serde_json::Value) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.write_entry(name, &bytes)
    }
}

/// Join a group path and an entry name into a zip entry key.
fn entry_key(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", path, name)
    }
}

impl ContainerSink for ZarrZipStore {
    fn create_group(&mut self, path: &str) -> Result<()> {
        self.write_json(&entry_key(path, ".zgroup"), &json!({ "zarr_format": 2 }))
    }

    fn create_array(&mut self, path: &str, name: &str, data: &ArrayData) -> Result<()> {
        let (rows, cols) = data.shape();
        let array_path = entry_key(path, name);

        let metadata = json!({
            "chunks": [rows, cols],
            "compressor": null,
            "dtype": data.dtype(),
            "fill_value": 0,
            "filters": null,
            "order": "C",
            "shape": [rows, cols],
            "zarr_format": 2,
        });
        self.write_json(&entry_key(&array_path, ".zarray"), &metadata)?;

        if rows > 0 {
            self.write_entry(&entry_key(&array_path, "0.0"), &data.to_le_bytes())?;
        }

        Ok(())
    }

    fn set_attributes(&mut self, path: &str, attrs: &serde_json::Value) -> Result<()> {
        self.write_json(&entry_key(path, ".zattrs"), attrs)
    }

    fn finish(mut self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
        let mut entry = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_store_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zarr.zip");

        let mut store = ZarrZipStore::open(&path).unwrap();
        store.create_group("").unwrap();
        store
            .set_attributes("", &json!({ "name": "RnaDataset" }))
            .unwrap();
        store.create_group("grids").unwrap();
        store
            .create_array(
                "grids",
                "location",
                &ArrayData::F32 {
                    cols: 3,
                    data: vec![10.0, 20.0, 0.0],
                },
            )
            .unwrap();
        store.finish().unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();

        let zgroup: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, ".zgroup")).unwrap();
        assert_eq!(zgroup["zarr_format"], 2);

        let zattrs: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, ".zattrs")).unwrap();
        assert_eq!(zattrs["name"], "RnaDataset");

        let zarray: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, "grids/location/.zarray")).unwrap();
        assert_eq!(zarray["shape"], json!([1, 3]));
        assert_eq!(zarray["chunks"], json!([1, 3]));
        assert_eq!(zarray["dtype"], "<f4");
        assert!(zarray["compressor"].is_null());

        let chunk = read_entry(&mut archive, "grids/location/0.0");
        assert_eq!(chunk.len(), 12);
        assert_eq!(&chunk[0..4], &10.0f32.to_le_bytes());
    }

    #[test]
    fn test_open_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zarr.zip");
        std::fs::write(&path, b"stale").unwrap();

        let mut store = ZarrZipStore::open(&path).unwrap();
        store.create_group("").unwrap();
        store.finish().unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert!(archive.by_name(".zgroup").is_ok());
    }
}
