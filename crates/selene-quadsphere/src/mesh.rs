//! Skirted tile mesh construction.
//!
//! A tile's grid of `resolution × resolution` height samples becomes an
//! unindexed triangle list of `(resolution − 1 + 2)²` cells: the interior
//! cells tessellate the samples, and an extra ring of border cells reuses
//! the clamped edge samples pulled slightly toward the planet center. That
//! ring forms a skirt hiding the cracks where neighboring tiles of
//! different levels meet.

use std::sync::Arc;

use glam::{DVec2, DVec3};
use selene_cubesphere::{TileAddress, tile_direction};
use selene_provider::{TileData, TileImage};

use crate::TileVertex;

/// Corner offsets of the two triangles of one grid cell.
const CELL_VERTICES: [(i64, i64); 6] = [
    // A
    (1, 1),
    (0, 1),
    (0, 0),
    // B
    (1, 0),
    (1, 1),
    (0, 0),
];

/// A tile's renderable geometry plus the imagery it samples.
pub struct TileMesh {
    /// Unindexed triangle list, positions relative to `center`.
    pub vertices: Vec<TileVertex>,
    /// Planet-local position of the tile midpoint on the displaced surface.
    /// Vertex positions are relative to this point.
    pub center: DVec3,
    /// Radius of the bounding sphere around `center`, in meters.
    pub bounding_radius: f64,
    /// Base color imagery, shared with sibling tiles under the same
    /// texture-level ancestor.
    pub albedo: Arc<TileImage>,
    /// Object-space normal map imagery.
    pub normal_map: Arc<TileImage>,
}

impl TileMesh {
    /// Number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Build the skirted mesh for `address` from its fetched data.
///
/// `radius` is the planet radius in meters; heights displace vertices
/// radially on top of it. UVs are texel-centered, remapped into the
/// ancestor texture identified by `data.texture_level`, and V-flipped for
/// image-space sampling.
#[must_use]
pub fn build_tile_mesh(address: &TileAddress, data: &TileData, radius: f64) -> TileMesh {
    let resolution = data.resolution;
    let max_sample = (resolution - 1) as i64;
    let face_resolution = resolution + 1;

    let position_at = |frac: DVec2, height: f64| -> DVec3 {
        tile_direction(address, frac) * (radius + height)
    };

    let center_height = f64::from(data.height_at(resolution / 2, resolution / 2));
    let center = position_at(DVec2::splat(0.5), center_height);

    let ancestor = address.ancestor_at(data.texture_level);
    let ancestor_uv = address.uv_in_ancestor(&ancestor);
    let pixel_fraction = 1.0 / f64::from(data.texture_resolution);

    // Skirt vertices sink below the surface by a fraction of a sample step
    // at this level, enough to cover cracks against a one-level-coarser
    // neighbor.
    let skirt_scale = 1.0 - 0.5f64.powi(i32::from(address.level)) / f64::from(resolution);

    let mut vertices =
        Vec::with_capacity((face_resolution * face_resolution) as usize * CELL_VERTICES.len());
    let mut bounding_radius: f64 = 0.0;

    for raw_y in 0..face_resolution {
        for raw_x in 0..face_resolution {
            for (dx, dy) in CELL_VERTICES {
                let grid_x = i64::from(raw_x) - 1 + dx;
                let grid_y = i64::from(raw_y) - 1 + dy;
                let x = grid_x.clamp(0, max_sample);
                let y = grid_y.clamp(0, max_sample);
                let is_skirt = grid_x != x || grid_y != y;

                let height = f64::from(data.height_at(x as u32, y as u32));
                let frac = DVec2::new(x as f64 / max_sample as f64, y as f64 / max_sample as f64);

                let mut position = position_at(frac, height);
                if is_skirt {
                    position *= skirt_scale;
                }
                let relative = position - center;
                bounding_radius = bounding_radius.max(relative.length());

                let normal = tile_direction(address, frac);

                // Sample at texel centers so bilinear filtering never bleeds
                // across the tile's slot in the shared ancestor texture.
                let u = frac.x * (1.0 - pixel_fraction) + pixel_fraction / 2.0;
                let v = frac.y * (1.0 - pixel_fraction) + pixel_fraction / 2.0;
                let (u, v) = ancestor_uv.remap(u, v);

                vertices.push(TileVertex {
                    position: relative.as_vec3().to_array(),
                    normal: TileVertex::pack_normal(normal),
                    uv: TileVertex::pack_uv(u, 1.0 - v),
                });
            }
        }
    }

    TileMesh {
        vertices,
        center,
        bounding_radius,
        albedo: Arc::clone(&data.albedo),
        normal_map: Arc::clone(&data.normal),
    }
}
