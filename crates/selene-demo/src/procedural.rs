//! Procedural tile provider for running without downloaded assets.
//!
//! Heights come from multi-octave simplex noise sampled on the unit
//! sphere, so neighboring tiles agree exactly along shared edges and no
//! UV seams appear at face boundaries.

use std::sync::Arc;

use glam::DVec2;
use noise::{NoiseFn, Simplex};
use selene_cubesphere::{TileAddress, tile_direction};
use selene_provider::{FetchError, TileData, TileImage, TileProvider};

/// Per-face albedo tints, so faces are distinguishable in level-color-less
/// captures.
const FACE_TINTS: [[u8; 4]; 6] = [
    [180, 170, 160, 255],
    [170, 160, 150, 255],
    [175, 175, 165, 255],
    [165, 165, 155, 255],
    [185, 175, 170, 255],
    [160, 155, 150, 255],
];

/// Flat object-space normal map color (+Z).
const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// Generates tile data from fractal Brownian motion over simplex noise.
pub struct ProceduralProvider {
    noise: Simplex,
    /// Vertices per tile axis.
    resolution: u32,
    /// Peak terrain amplitude in meters.
    amplitude: f64,
    octaves: u32,
    vertex_max_level: u8,
    texture_max_level: u8,
}

impl ProceduralProvider {
    /// Create a provider with the given seed and level caps.
    #[must_use]
    pub fn new(seed: u32, vertex_max_level: u8, texture_max_level: u8) -> Self {
        Self {
            noise: Simplex::new(seed),
            resolution: 17,
            amplitude: 8_000.0,
            octaves: 6,
            vertex_max_level,
            texture_max_level,
        }
    }

    /// Terrain height in meters at a point on the unit sphere.
    fn height_at(&self, point: glam::DVec3) -> f64 {
        let mut total = 0.0;
        let mut frequency = 2.0;
        let mut amplitude = self.amplitude;

        for _ in 0..self.octaves {
            let sample = self
                .noise
                .get([point.x * frequency, point.y * frequency, point.z * frequency]);
            total += sample * amplitude;

            frequency *= 2.0;
            amplitude *= 0.5;
        }

        total
    }
}

impl TileProvider for ProceduralProvider {
    fn fetch(&self, address: TileAddress) -> Result<TileData, FetchError> {
        if address.level > self.vertex_max_level {
            return Err(FetchError::LevelBeyondMax {
                address,
                max_level: self.vertex_max_level,
            });
        }

        let resolution = self.resolution;
        let step = 1.0 / f64::from(resolution - 1);
        let mut heights = Vec::with_capacity((resolution * resolution) as usize);
        for y in 0..resolution {
            for x in 0..resolution {
                let frac = DVec2::new(f64::from(x) * step, f64::from(y) * step);
                let direction = tile_direction(&address, frac);
                heights.push(self.height_at(direction) as f32);
            }
        }

        let texture_tile = address.ancestor_at(self.texture_max_level);
        let albedo = Arc::new(TileImage::solid(
            64,
            FACE_TINTS[texture_tile.face as usize],
        ));
        let normal = Arc::new(TileImage::solid(64, FLAT_NORMAL));

        Ok(TileData {
            resolution,
            heights,
            texture_level: texture_tile.level,
            texture_resolution: albedo.width,
            albedo,
            normal,
        })
    }
}
