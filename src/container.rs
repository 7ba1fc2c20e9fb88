//! Persistence boundary for the pyramid.
//!
//! The pyramid builder only needs three operations from its container:
//! create a nested named group, store a named typed array under a group,
//! and attach a key-value attribute map to a group. The trait keeps the
//! builder independent of the on-disk format; `zarr::ZarrZipStore` is the
//! production implementation.

use crate::error::Result;
use bytes::{BufMut, Bytes, BytesMut};

/// A dense 2D array payload with its element type.
///
/// Rows map 1:1 to points; columns are fixed per attribute. Data is row
/// major ("C" order).
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    U8 { cols: usize, data: Vec<u8> },
    U16 { cols: usize, data: Vec<u16> },
    U32 { cols: usize, data: Vec<u32> },
    F32 { cols: usize, data: Vec<f32> },
}

impl ArrayData {
    /// Array shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        let (cols, len) = match self {
            ArrayData::U8 { cols, data } => (*cols, data.len()),
            ArrayData::U16 { cols, data } => (*cols, data.len()),
            ArrayData::U32 { cols, data } => (*cols, data.len()),
            ArrayData::F32 { cols, data } => (*cols, data.len()),
        };
        debug_assert!(cols > 0 && len % cols == 0);
        (len / cols, cols)
    }

    /// Numpy-style dtype string, little endian.
    pub fn dtype(&self) -> &'static str {
        match self {
            ArrayData::U8 { .. } => "|u1",
            ArrayData::U16 { .. } => "<u2",
            ArrayData::U32 { .. } => "<u4",
            ArrayData::F32 { .. } => "<f4",
        }
    }

    /// Serialize the elements to little-endian bytes in row-major order.
    pub fn to_le_bytes(&self) -> Bytes {
        match self {
            ArrayData::U8 { data, .. } => Bytes::copy_from_slice(data),
            ArrayData::U16 { data, .. } => {
                let mut buf = BytesMut::with_capacity(data.len() * 2);
                for &v in data {
                    buf.put_u16_le(v);
                }
                buf.freeze()
            }
            ArrayData::U32 { data, .. } => {
                let mut buf = BytesMut::with_capacity(data.len() * 4);
                for &v in data {
                    buf.put_u32_le(v);
                }
                buf.freeze()
            }
            ArrayData::F32 { data, .. } => {
                let mut buf = BytesMut::with_capacity(data.len() * 4);
                for &v in data {
                    buf.put_f32_le(v);
                }
                buf.freeze()
            }
        }
    }
}

/// Write-once sink for the hierarchical container.
///
/// Group paths are slash-separated, relative to the root (the root itself
/// is the empty path). The pyramid writes groups, arrays, and attributes
/// strictly once each, in level-then-tile order, and never reads back.
pub trait ContainerSink {
    /// Create a group at `path`. Parents must already exist.
    fn create_group(&mut self, path: &str) -> Result<()>;

    /// Store a named array under the group at `path`. The array is written
    /// as a single chunk covering its full shape.
    fn create_array(&mut self, path: &str, name: &str, data: &ArrayData) -> Result<()>;

    /// Attach a key-value attribute map to the group at `path`.
    fn set_attributes(&mut self, path: &str, attrs: &serde_json::Value) -> Result<()>;

    /// Flush and close the container. After this the output is complete.
    fn finish(self) -> Result<()>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_shape() {
        let array = ArrayData::F32 {
            cols: 3,
            data: vec![1.0, 2.0, 0.0, 4.0, 5.0, 0.0],
        };
        assert_eq!(array.shape(), (2, 3));
        assert_eq!(array.dtype(), "<f4");
    }

    #[test]
    fn test_little_endian_encoding() {
        let array = ArrayData::U16 {
            cols: 2,
            data: vec![1, 65535],
        };
        assert_eq!(array.to_le_bytes().as_ref(), &[1, 0, 255, 255]);

        let array = ArrayData::U32 {
            cols: 1,
            data: vec![0x0403_0201],
        };
        assert_eq!(array.to_le_bytes().as_ref(), &[1, 2, 3, 4]);

        let array = ArrayData::F32 {
            cols: 1,
            data: vec![1.0],
        };
        assert_eq!(array.to_le_bytes().as_ref(), &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_u8_passthrough() {
        let array = ArrayData::U8 {
            cols: 1,
            data: vec![1, 1, 0],
        };
        assert_eq!(array.shape(), (3, 1));
        assert_eq!(array.dtype(), "|u1");
        assert_eq!(array.to_le_bytes().as_ref(), &[1, 1, 0]);
    }
}
