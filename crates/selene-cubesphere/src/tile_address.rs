//! Tile addressing within the per-face quadtrees.

use glam::{DVec2, UVec2};

use crate::{CubeFace, FaceCoord};

/// Uniquely identifies one tile of the quadsphere.
///
/// - `face`: which of the 6 cube faces the tile lies on.
/// - `level`: subdivision depth. Level 0 is the root tile covering the whole
///   face; each level splits every tile into 4.
/// - `x`, `y`: grid coordinates within the face at this level, each in
///   `[0, 2^level)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    /// Which cube face this tile belongs to.
    pub face: CubeFace,
    /// Subdivision depth (0 = root, one tile per face).
    pub level: u8,
    /// Horizontal grid coordinate within the face at this level.
    pub x: u32,
    /// Vertical grid coordinate within the face at this level.
    pub y: u32,
}

impl TileAddress {
    /// Deepest representable level. `grid_size` must fit in a `u32`.
    pub const MAX_LEVEL: u8 = 31;

    /// Number of tiles along one axis of a face at the given level.
    ///
    /// # Panics
    ///
    /// Panics if `level` exceeds [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn grid_size(level: u8) -> u32 {
        assert!(
            level <= Self::MAX_LEVEL,
            "level {level} exceeds MAX_LEVEL {}",
            Self::MAX_LEVEL
        );
        1 << level
    }

    /// Construct a `TileAddress`, validating that `x` and `y` are within
    /// the grid bounds for the given level.
    ///
    /// # Panics
    ///
    /// Panics if `level` exceeds [`Self::MAX_LEVEL`] or if `x`/`y` are out
    /// of range.
    #[must_use]
    pub fn new(face: CubeFace, level: u8, x: u32, y: u32) -> Self {
        let size = Self::grid_size(level);
        assert!(x < size, "x={x} out of range for level {level} (max {size})");
        assert!(y < size, "y={y} out of range for level {level} (max {size})");
        Self { face, level, x, y }
    }

    /// The root tile of a face: level 0, offset (0, 0).
    #[must_use]
    pub fn root(face: CubeFace) -> Self {
        Self { face, level: 0, x: 0, y: 0 }
    }

    /// The four child tiles at the next finer level.
    ///
    /// Child order is `[(0,0), (0,1), (1,0), (1,1)]` in (Δx, Δy): the slot
    /// of a child is `Δx * 2 + Δy`.
    ///
    /// # Panics
    ///
    /// Panics if already at [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn children(&self) -> [TileAddress; 4] {
        let level = self.level + 1;
        let cx = self.x * 2;
        let cy = self.y * 2;
        [
            TileAddress::new(self.face, level, cx, cy),
            TileAddress::new(self.face, level, cx, cy + 1),
            TileAddress::new(self.face, level, cx + 1, cy),
            TileAddress::new(self.face, level, cx + 1, cy + 1),
        ]
    }

    /// The parent tile at the next coarser level, or `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<TileAddress> {
        if self.level == 0 {
            return None;
        }
        Some(TileAddress {
            face: self.face,
            level: self.level - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// The ancestor of this tile at `level`, or the tile itself if it is
    /// already at `level` or shallower.
    ///
    /// Used to find which ancestor supplies texture data for tiles deeper
    /// than the texture level cap.
    #[must_use]
    pub fn ancestor_at(&self, level: u8) -> TileAddress {
        if self.level <= level {
            return *self;
        }
        let shift = self.level - level;
        TileAddress {
            face: self.face,
            level,
            x: self.x >> shift,
            y: self.y >> shift,
        }
    }

    /// Position and scale of this tile within an ancestor's UV space.
    ///
    /// # Panics
    ///
    /// Panics if `ancestor` is on a different face or deeper than this tile.
    #[must_use]
    pub fn uv_in_ancestor(&self, ancestor: &TileAddress) -> AncestorUv {
        assert_eq!(self.face, ancestor.face, "ancestor must share the tile's face");
        assert!(
            ancestor.level <= self.level,
            "ancestor level {} deeper than tile level {}",
            ancestor.level,
            self.level
        );
        let scale = 1u32 << (self.level - ancestor.level);
        AncestorUv {
            scale,
            offset: UVec2::new(self.x - ancestor.x * scale, self.y - ancestor.y * scale),
        }
    }

    /// UV bounding box of this tile on its face, `(u_min, v_min, u_max, v_max)`,
    /// all in \[0, 1\].
    #[must_use]
    pub fn uv_bounds(&self) -> (f64, f64, f64, f64) {
        let size = Self::grid_size(self.level) as f64;
        (
            self.x as f64 / size,
            self.y as f64 / size,
            (self.x + 1) as f64 / size,
            (self.y + 1) as f64 / size,
        )
    }

    /// The [`FaceCoord`] at a fractional position within this tile.
    ///
    /// `frac = (0, 0)` is the tile's low corner, `(1, 1)` its high corner.
    #[must_use]
    pub fn face_coord(&self, frac: DVec2) -> FaceCoord {
        let size = Self::grid_size(self.level) as f64;
        FaceCoord::new_unchecked(
            self.face,
            (self.x as f64 + frac.x) / size,
            (self.y as f64 + frac.y) / size,
        )
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, level={}, x={}, y={})", self.face, self.level, self.x, self.y)
    }
}

/// Placement of a tile inside an ancestor tile's texture.
///
/// `scale` is `2^(tile.level − ancestor.level)`: the number of tiles per
/// ancestor-tile axis. `offset` components are in `[0, scale − 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AncestorUv {
    /// Tiles per ancestor axis at the tile's level.
    pub scale: u32,
    /// This tile's grid offset inside the ancestor.
    pub offset: UVec2,
}

impl AncestorUv {
    /// Remap a tile-local UV coordinate into the ancestor's UV space.
    #[must_use]
    pub fn remap(&self, u: f64, v: f64) -> (f64, f64) {
        let scale = self.scale as f64;
        (
            (self.offset.x as f64 + u) / scale,
            (self.offset.y as f64 + v) / scale,
        )
    }
}
