//! Asset path convention shared by providers and the serving layer.
//!
//! A tile's assets live under `{face}{level}/{x}-{y}` relative to the data
//! root: `Z+0/0-0.json` for height data, `Z+0/0-0-albedo.png` and
//! `Z+0/0-0-normal.png` for imagery.

use selene_cubesphere::TileAddress;

/// Suffix for height tile JSON assets.
pub const HEIGHT_SUFFIX: &str = ".json";

/// Which imagery asset of a tile is being addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// Base color.
    Albedo,
    /// Object-space normal map.
    Normal,
}

impl ImageKind {
    /// File suffix for this image kind.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ImageKind::Albedo => "-albedo.png",
            ImageKind::Normal => "-normal.png",
        }
    }
}

/// Base path (no suffix) for a tile's assets, relative to the data root.
#[must_use]
pub fn tile_path(address: &TileAddress) -> String {
    format!(
        "{}{}/{}-{}",
        address.face.name(),
        address.level,
        address.x,
        address.y
    )
}

/// Full relative path of one of a tile's images.
#[must_use]
pub fn image_path(address: &TileAddress, kind: ImageKind) -> String {
    format!("{}{}", tile_path(address), kind.suffix())
}
