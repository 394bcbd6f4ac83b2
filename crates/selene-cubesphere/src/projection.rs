//! Cube-to-sphere projection.
//!
//! The quadsphere places every vertex by projecting a point on the
//! `[-1, 1]` cube radially onto the unit sphere. This module is the sole
//! source of geometric truth for vertex positions and normals.

use glam::{DVec2, DVec3};

use crate::{CubeFace, TileAddress};

/// A 2D coordinate on a cube face. `u` and `v` are in the range \[0, 1\].
///
/// `(u=0, v=0)` is the corner where both tile grid coordinates are zero;
/// `(u=1, v=1)` is the opposite corner. Usually produced by
/// [`TileAddress::face_coord`] rather than constructed directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCoord {
    /// Which cube face this coordinate lies on.
    pub face: CubeFace,
    /// Horizontal parameter in \[0, 1\].
    pub u: f64,
    /// Vertical parameter in \[0, 1\].
    pub v: f64,
}

impl FaceCoord {
    /// Construct a `FaceCoord`, clamping `u` and `v` to \[0, 1\].
    #[must_use]
    pub fn new(face: CubeFace, u: f64, v: f64) -> Self {
        Self {
            face,
            u: u.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    /// Construct without clamping. Caller guarantees `0 <= u, v <= 1`.
    #[must_use]
    pub fn new_unchecked(face: CubeFace, u: f64, v: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&u), "u out of range: {u}");
        debug_assert!((0.0..=1.0).contains(&v), "v out of range: {v}");
        Self { face, u, v }
    }

    /// The corresponding point on the surface of the `[-1, 1]` cube.
    ///
    /// The face center `(u=0.5, v=0.5)` maps to the face normal vector.
    #[inline]
    #[must_use]
    pub fn cube_point(&self) -> DVec3 {
        // Remap u, v from [0, 1] to [-1, 1]
        let s = 2.0 * self.u - 1.0;
        let t = 2.0 * self.v - 1.0;

        self.face.normal() + s * self.face.tangent() + t * self.face.bitangent()
    }

    /// Radial projection onto the unit sphere.
    ///
    /// Returns a unit-length direction, which doubles as the smoothed-sphere
    /// surface normal at that point.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> DVec3 {
        self.cube_point().normalize()
    }
}

/// Unit sphere direction for a fractional position within a tile.
///
/// `frac = (0, 0)` is the tile's low corner, `(1, 1)` its high corner,
/// `(0.5, 0.5)` its midpoint.
#[inline]
#[must_use]
pub fn tile_direction(address: &TileAddress, frac: DVec2) -> DVec3 {
    address.face_coord(frac).direction()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_constructor_clamps_to_the_face() {
        let fc = FaceCoord::new(CubeFace::PosX, -0.5, 1.5);
        assert_eq!((fc.u, fc.v), (0.0, 1.0));

        let inside = FaceCoord::new(CubeFace::NegZ, 0.25, 0.75);
        assert_eq!((inside.u, inside.v), (0.25, 0.75));
    }

    #[test]
    fn test_face_center_maps_to_normal() {
        for face in CubeFace::ALL {
            let fc = FaceCoord::new(face, 0.5, 0.5);
            assert!((fc.cube_point() - face.normal()).length() < EPSILON);
            let dir = fc.direction();
            assert!(
                (dir - face.normal()).length() < EPSILON,
                "face center of {face:?} did not map to its normal: {dir:?}"
            );
        }
    }

    #[test]
    fn test_directions_are_unit_length_across_faces() {
        for face in CubeFace::ALL {
            for u_step in 0..=10 {
                for v_step in 0..=10 {
                    let fc = FaceCoord::new(face, u_step as f64 / 10.0, v_step as f64 / 10.0);
                    let dir = fc.direction();
                    assert!(
                        (dir.length() - 1.0).abs() < EPSILON,
                        "direction not unit length for {face:?} at ({}, {}): {}",
                        fc.u,
                        fc.v,
                        dir.length()
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_coords_are_representable_unclamped() {
        for face in CubeFace::ALL {
            for &u in &[0.0, 1.0] {
                for &v in &[0.0, 1.0] {
                    let fc = FaceCoord::new_unchecked(face, u, v);
                    assert_eq!((fc.u, fc.v), (u, v));
                }
            }
        }
    }

    #[test]
    fn test_tile_directions_are_unit_length_at_depth() {
        let addr = TileAddress::new(CubeFace::NegY, 7, 100, 27);
        for u_step in 0..=4 {
            for v_step in 0..=4 {
                let frac = DVec2::new(u_step as f64 / 4.0, v_step as f64 / 4.0);
                let dir = tile_direction(&addr, frac);
                assert!((dir.length() - 1.0).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_tile_corners_match_face_grid() {
        // A deep tile's corner must project to the same direction as the
        // equivalent face coordinate computed directly.
        let addr = TileAddress::new(CubeFace::PosZ, 3, 5, 2);
        let via_tile = tile_direction(&addr, DVec2::ZERO);
        let via_face = FaceCoord::new(CubeFace::PosZ, 5.0 / 8.0, 2.0 / 8.0).direction();
        assert!((via_tile - via_face).length() < EPSILON);
    }

    #[test]
    fn test_shared_edge_projects_identically() {
        // The high-u edge of one tile is the low-u edge of its +x neighbor.
        let a = TileAddress::new(CubeFace::PosX, 4, 6, 9);
        let b = TileAddress::new(CubeFace::PosX, 4, 7, 9);
        for v_step in 0..=8 {
            let v = v_step as f64 / 8.0;
            let edge_a = tile_direction(&a, DVec2::new(1.0, v));
            let edge_b = tile_direction(&b, DVec2::new(0.0, v));
            assert!(
                (edge_a - edge_b).length() < EPSILON,
                "shared edge mismatch at v={v}"
            );
        }
    }
}
