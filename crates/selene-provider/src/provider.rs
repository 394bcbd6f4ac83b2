//! The tile data provider contract.

use selene_cubesphere::TileAddress;

use crate::{FetchError, TileData};

/// Supplies height and imagery data for tile addresses.
///
/// `fetch` is blocking and is always invoked on a
/// [`TileFetcher`](crate::TileFetcher) worker thread, never on the frame
/// thread. Implementations must:
///
/// - return height samples at the tile's own level, failing with
///   [`FetchError::HeightCountMismatch`] when the sample count does not
///   equal `resolution²`;
/// - fetch imagery at the texture-level-cap ancestor and report the level
///   actually used via [`TileData::texture_level`];
/// - reject vertex data requests beyond their configured maximum level;
/// - de-duplicate concurrent identical image requests (see
///   [`ImageCache`](crate::ImageCache)).
pub trait TileProvider: Send + Sync {
    /// Resolve a tile address into height and imagery data.
    fn fetch(&self, address: TileAddress) -> Result<TileData, FetchError>;
}
