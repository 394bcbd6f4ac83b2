//! Tile data acquisition: the provider contract, asset path convention,
//! de-duplicating image cache, background fetch pipeline, and the
//! disk-backed provider implementation.

mod cache;
mod disk;
mod error;
mod fetcher;
mod path;
mod provider;
mod tile_data;

pub use cache::ImageCache;
pub use disk::DiskTileProvider;
pub use error::FetchError;
pub use fetcher::{FetchedTile, TileFetcher};
pub use path::{HEIGHT_SUFFIX, ImageKind, image_path, tile_path};
pub use provider::TileProvider;
pub use tile_data::{TileData, TileImage};
