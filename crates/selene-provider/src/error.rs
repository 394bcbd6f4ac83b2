//! Tile fetch error types.

use std::sync::Arc;

use selene_cubesphere::TileAddress;

/// Errors that can occur while resolving a tile's height and imagery data.
///
/// A fetch failure is terminal for the requesting tile: the quadsphere logs
/// it and freezes that branch of the quadtree, leaving siblings untouched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Failed to read a tile asset from the backing store.
    #[error("failed to read tile asset {path}: {source}")]
    Io {
        /// Asset path relative to the data root.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Height tile JSON was present but malformed.
    #[error("failed to parse height tile {path}: {source}")]
    Json {
        /// Asset path relative to the data root.
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Image asset could not be decoded.
    #[error("failed to decode image {path}: {source}")]
    Image {
        /// Asset path relative to the data root.
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Height sample count does not match the advertised resolution.
    /// Data-integrity failures are never silently truncated or padded.
    #[error(
        "height tile {address} has {samples} samples, expected {expected} ({resolution}x{resolution})"
    )]
    HeightCountMismatch {
        /// The requested tile.
        address: TileAddress,
        /// Advertised vertex resolution.
        resolution: u32,
        /// Samples actually present.
        samples: usize,
        /// `resolution * resolution`.
        expected: usize,
    },

    /// Height tile advertised a resolution too small to mesh.
    #[error("height tile {address} has invalid resolution {resolution} (minimum 2)")]
    InvalidResolution {
        /// The requested tile.
        address: TileAddress,
        /// Advertised vertex resolution.
        resolution: u32,
    },

    /// Vertex data was requested beyond the provider's configured maximum
    /// level. This is a caller precondition violation, reported loudly.
    #[error("tile {address} is beyond the vertex max level {max_level}")]
    LevelBeyondMax {
        /// The requested tile.
        address: TileAddress,
        /// The provider's configured cap.
        max_level: u8,
    },

    /// Replay of a failure already cached for the same asset path.
    #[error("cached fetch failure: {0}")]
    Shared(Arc<FetchError>),
}
