//! Resolved per-tile height and imagery data.

use std::sync::Arc;

/// A decoded RGBA8 image shared between tiles.
///
/// Imagery is fetched at the texture-level-cap ancestor, so many tiles
/// typically hold the same `Arc<TileImage>`.
#[derive(Clone, Debug)]
pub struct TileImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl TileImage {
    /// A square single-color image. Handy for procedural providers and tests.
    #[must_use]
    pub fn solid(size: u32, color: [u8; 4]) -> Self {
        Self {
            width: size,
            height: size,
            rgba: color.repeat((size * size) as usize),
        }
    }
}

/// The result of resolving a [`TileAddress`](selene_cubesphere::TileAddress):
/// height samples at the tile's own level plus imagery captured at
/// `texture_level` (the tile's level or an ancestor's, whichever the
/// texture level cap selected).
#[derive(Clone, Debug)]
pub struct TileData {
    /// Vertices per tile axis. Always >= 2.
    pub resolution: u32,
    /// Height in meters for each vertex, row-major,
    /// `resolution * resolution` samples.
    pub heights: Vec<f32>,
    /// The level the imagery was generated at. Always <= the tile's level;
    /// needed to remap tile-local UVs into the ancestor's texture space.
    pub texture_level: u8,
    /// Pixels per axis of the imagery.
    pub texture_resolution: u32,
    /// Base color imagery.
    pub albedo: Arc<TileImage>,
    /// Object-space normal map imagery.
    pub normal: Arc<TileImage>,
}

impl TileData {
    /// Nearest height sample, clamped at the grid borders.
    #[must_use]
    pub fn height_at(&self, x: u32, y: u32) -> f32 {
        let max = self.resolution - 1;
        let x = x.min(max);
        let y = y.min(max);
        self.heights[(y * self.resolution + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_data(resolution: u32) -> TileData {
        let heights = (0..resolution * resolution).map(|i| i as f32).collect();
        let image = Arc::new(TileImage::solid(4, [128, 128, 128, 255]));
        TileData {
            resolution,
            heights,
            texture_level: 0,
            texture_resolution: 4,
            albedo: Arc::clone(&image),
            normal: image,
        }
    }

    #[test]
    fn test_height_lookup_is_row_major() {
        let data = ramp_data(3);
        assert_eq!(data.height_at(0, 0), 0.0);
        assert_eq!(data.height_at(2, 0), 2.0);
        assert_eq!(data.height_at(0, 1), 3.0);
        assert_eq!(data.height_at(2, 2), 8.0);
    }

    #[test]
    fn test_height_lookup_clamps_at_borders() {
        let data = ramp_data(3);
        assert_eq!(data.height_at(10, 0), data.height_at(2, 0));
        assert_eq!(data.height_at(0, 10), data.height_at(0, 2));
    }

    #[test]
    fn test_solid_image_dimensions() {
        let img = TileImage::solid(8, [1, 2, 3, 4]);
        assert_eq!(img.width, 8);
        assert_eq!(img.height, 8);
        assert_eq!(img.rgba.len(), 8 * 8 * 4);
        assert_eq!(&img.rgba[..4], &[1, 2, 3, 4]);
    }
}
