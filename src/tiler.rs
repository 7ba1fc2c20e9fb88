//! Spatial bucketing of points into a fixed-size tile grid.

use crate::attributes::BoundingBox;
use std::collections::BTreeMap;
use std::fmt;

/// Integer tile coordinates at one pyramid level.
///
/// Ordering is ascending `tx`, then ascending `ty`, which fixes the tile
/// iteration order for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub tx: u32,
    pub ty: u32,
}

impl TileKey {
    pub fn new(tx: u32, ty: u32) -> Self {
        Self { tx, ty }
    }

    /// Tile containing a point at the given tile edge length. Coordinates
    /// are clamped to zero before flooring; validated input never needs the
    /// clamp.
    pub fn containing(x: f64, y: f64, tile_size: f64) -> Self {
        let tx = (x.max(0.0) / tile_size).floor() as u32;
        let ty = (y.max(0.0) / tile_size).floor() as u32;
        Self { tx, ty }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.tx, self.ty)
    }
}

/// Bucket every point into its tile for the given tile edge length.
///
/// Returns, for each non-empty tile, the indices of the points whose
/// floored `(x/tile_size, y/tile_size)` equals that tile's coordinates.
/// Only tiles inside `[0, n_tiles_x) x [0, n_tiles_y)` of the level-0
/// bounding box are enumerated; a point exactly on the far boundary of an
/// evenly-divided box falls outside that range and is dropped.
///
/// Pure function of its inputs: identical point sets and tile sizes yield
/// identical tile membership.
pub fn assign_tiles(
    x: &[f64],
    y: &[f64],
    tile_size: f64,
    bbox: &BoundingBox,
) -> BTreeMap<TileKey, Vec<usize>> {
    debug_assert!(tile_size > 0.0);
    debug_assert_eq!(x.len(), y.len());

    let (n_tiles_x, n_tiles_y) = bbox.tile_counts(tile_size);

    let mut tiles: BTreeMap<TileKey, Vec<usize>> = BTreeMap::new();
    for (idx, (&px, &py)) in x.iter().zip(y.iter()).enumerate() {
        let key = TileKey::containing(px, py, tile_size);
        if (key.tx as usize) < n_tiles_x && (key.ty as usize) < n_tiles_y {
            tiles.entry(key).or_default().push(idx);
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX: BoundingBox = BoundingBox {
        xmax: 300.0,
        ymax: 300.0,
    };

    #[test]
    fn test_tile_key_containing() {
        assert_eq!(TileKey::containing(10.0, 10.0, 250.0), TileKey::new(0, 0));
        assert_eq!(TileKey::containing(300.0, 10.0, 250.0), TileKey::new(1, 0));
        assert_eq!(TileKey::containing(249.999, 0.0, 250.0), TileKey::new(0, 0));
        assert_eq!(TileKey::containing(250.0, 0.0, 250.0), TileKey::new(1, 0));
    }

    #[test]
    fn test_tile_key_display() {
        assert_eq!(TileKey::new(3, 7).to_string(), "3,7");
    }

    #[test]
    fn test_assign_tiles_membership() {
        let x = [10.0, 10.0, 300.0, 300.0];
        let y = [10.0, 10.0, 10.0, 300.0];

        let tiles = assign_tiles(&x, &y, 250.0, &BBOX);

        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[&TileKey::new(0, 0)], vec![0, 1]);
        assert_eq!(tiles[&TileKey::new(1, 0)], vec![2]);
        assert_eq!(tiles[&TileKey::new(1, 1)], vec![3]);

        // Every assigned point floors back to its tile.
        for (key, indices) in &tiles {
            for &i in indices {
                assert_eq!((x[i].max(0.0) / 250.0).floor() as u32, key.tx);
                assert_eq!((y[i].max(0.0) / 250.0).floor() as u32, key.ty);
            }
        }
    }

    #[test]
    fn test_assign_tiles_iteration_order() {
        let x = [300.0, 10.0, 300.0];
        let y = [300.0, 10.0, 10.0];

        let tiles = assign_tiles(&x, &y, 250.0, &BBOX);
        let keys: Vec<String> = tiles.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["0,0", "1,0", "1,1"]);
    }

    #[test]
    fn test_assign_tiles_deterministic() {
        let x = [1.0, 100.0, 200.0, 299.0];
        let y = [299.0, 200.0, 100.0, 1.0];

        let a = assign_tiles(&x, &y, 250.0, &BBOX);
        let b = assign_tiles(&x, &y, 250.0, &BBOX);
        assert_eq!(a, b);
    }

    #[test]
    fn test_assign_tiles_skips_out_of_range_keys() {
        // Box divides evenly: a point exactly at xmax floors into tile 2,
        // which is outside [0, 2) and therefore not enumerated.
        let bbox = BoundingBox {
            xmax: 500.0,
            ymax: 500.0,
        };
        let x = [500.0, 10.0];
        let y = [10.0, 10.0];

        let tiles = assign_tiles(&x, &y, 250.0, &bbox);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[&TileKey::new(0, 0)], vec![1]);
    }

    #[test]
    fn test_assign_tiles_empty_input() {
        let tiles = assign_tiles(&[], &[], 250.0, &BBOX);
        assert!(tiles.is_empty());
    }
}
