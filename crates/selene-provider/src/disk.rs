//! Disk-backed tile data provider.
//!
//! Reads height tiles as JSON (`{ "s": resolution, "d": [heights...] }`)
//! and imagery as PNG files under the shared path convention, decoding
//! images through a de-duplicating [`ImageCache`].

use std::path::PathBuf;
use std::sync::Arc;

use selene_cubesphere::TileAddress;
use serde::Deserialize;

use crate::{
    FetchError, HEIGHT_SUFFIX, ImageCache, ImageKind, TileData, TileImage, TileProvider,
    image_path, tile_path,
};

/// Wire format of a height tile asset.
#[derive(Debug, Deserialize)]
struct HeightTile {
    /// Vertices per axis.
    s: u32,
    /// Row-major height samples, `s * s` of them.
    d: Vec<f32>,
}

/// Serves tile data from a directory tree laid out per the path convention.
///
/// Height data is read at the tile's own level and validated strictly;
/// imagery is read at the `texture_max_level` ancestor so the total image
/// count stays bounded, with concurrent identical requests collapsed by the
/// owned [`ImageCache`].
pub struct DiskTileProvider {
    root: PathBuf,
    cache: ImageCache,
    vertex_max_level: u8,
    texture_max_level: u8,
}

impl DiskTileProvider {
    /// Create a provider over `root` with the given level caps.
    pub fn new(root: impl Into<PathBuf>, vertex_max_level: u8, texture_max_level: u8) -> Self {
        Self {
            root: root.into(),
            cache: ImageCache::new(),
            vertex_max_level,
            texture_max_level,
        }
    }

    /// Number of distinct image paths requested so far.
    #[must_use]
    pub fn cached_image_count(&self) -> usize {
        self.cache.len()
    }

    fn load_height(&self, address: &TileAddress) -> Result<HeightTile, FetchError> {
        let rel = format!("{}{}", tile_path(address), HEIGHT_SUFFIX);
        let bytes = std::fs::read(self.root.join(&rel)).map_err(|source| FetchError::Io {
            path: rel.clone(),
            source,
        })?;
        let tile: HeightTile =
            serde_json::from_slice(&bytes).map_err(|source| FetchError::Json {
                path: rel,
                source,
            })?;

        if tile.s < 2 {
            return Err(FetchError::InvalidResolution {
                address: *address,
                resolution: tile.s,
            });
        }
        let expected = (tile.s * tile.s) as usize;
        if tile.d.len() != expected {
            return Err(FetchError::HeightCountMismatch {
                address: *address,
                resolution: tile.s,
                samples: tile.d.len(),
                expected,
            });
        }
        Ok(tile)
    }

    fn load_image(
        &self,
        address: &TileAddress,
        kind: ImageKind,
    ) -> Result<Arc<TileImage>, FetchError> {
        let rel = image_path(address, kind);
        let full = self.root.join(&rel);
        let path = rel.clone();
        self.cache.get_or_load(&rel, move || {
            let decoded = image::open(&full)
                .map_err(|source| FetchError::Image { path, source })?
                .to_rgba8();
            Ok(TileImage {
                width: decoded.width(),
                height: decoded.height(),
                rgba: decoded.into_raw(),
            })
        })
    }
}

impl TileProvider for DiskTileProvider {
    fn fetch(&self, address: TileAddress) -> Result<TileData, FetchError> {
        if address.level > self.vertex_max_level {
            return Err(FetchError::LevelBeyondMax {
                address,
                max_level: self.vertex_max_level,
            });
        }

        let height = self.load_height(&address)?;

        let texture_tile = address.ancestor_at(self.texture_max_level);
        let albedo = self.load_image(&texture_tile, ImageKind::Albedo)?;
        let normal = self.load_image(&texture_tile, ImageKind::Normal)?;

        Ok(TileData {
            resolution: height.s,
            heights: height.d,
            texture_level: texture_tile.level,
            texture_resolution: albedo.width,
            albedo,
            normal,
        })
    }
}
