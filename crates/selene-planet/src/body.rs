//! Body definitions.

use std::path::Path;
use std::sync::Arc;

use selene_provider::{DiskTileProvider, TileFetcher, TileProvider};
use selene_quadsphere::{LodSettings, Quadsphere, QuadsphereOptions};

/// Physical and data-budget parameters of one planetary body.
#[derive(Clone, Debug)]
pub struct BodyDef {
    /// Display name.
    pub name: String,
    /// Mean radius in meters.
    pub radius_m: f64,
    /// Deepest level with height data available.
    pub vertex_max_level: u8,
    /// Deepest level with imagery available. Deeper tiles sample their
    /// ancestor at this level.
    pub texture_max_level: u8,
}

impl BodyDef {
    /// The Moon: height data to level 8, imagery to level 4.
    #[must_use]
    pub fn moon() -> Self {
        Self {
            name: "Moon".to_string(),
            radius_m: 1_737.4 * 1_000.0,
            vertex_max_level: 8,
            texture_max_level: 4,
        }
    }

    /// Build a quadsphere for this body over an injected provider.
    ///
    /// The LOD depth cap is clamped to [`vertex_max_level`](Self::vertex_max_level)
    /// so the tree never requests tiles the body has no height data for.
    /// `threads` overrides the fetch worker count; `None` sizes the pool
    /// for the host.
    #[must_use]
    pub fn build(
        &self,
        provider: Arc<dyn TileProvider>,
        lod: LodSettings,
        threads: Option<usize>,
    ) -> Quadsphere {
        let fetcher = match threads {
            Some(count) => TileFetcher::new(provider, count),
            None => TileFetcher::with_default_threads(provider),
        };
        let lod = LodSettings {
            max_level: lod.max_level.min(self.vertex_max_level),
            ..lod
        };
        tracing::info!(
            body = %self.name,
            radius_m = self.radius_m,
            max_level = lod.max_level,
            "building quadsphere"
        );
        Quadsphere::new(
            QuadsphereOptions {
                radius: self.radius_m,
            },
            lod,
            fetcher,
        )
    }

    /// Build a quadsphere over tile assets stored under `data_dir`.
    #[must_use]
    pub fn build_from_disk(
        &self,
        data_dir: &Path,
        lod: LodSettings,
        threads: Option<usize>,
    ) -> Quadsphere {
        let provider = DiskTileProvider::new(
            data_dir,
            self.vertex_max_level,
            self.texture_max_level,
        );
        self.build(Arc::new(provider), lod, threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use selene_cubesphere::TileAddress;
    use selene_provider::{FetchError, TileData, TileImage};

    struct FlatProvider;

    impl TileProvider for FlatProvider {
        fn fetch(&self, address: TileAddress) -> Result<TileData, FetchError> {
            let image = Arc::new(TileImage::solid(4, [128, 128, 128, 255]));
            Ok(TileData {
                resolution: 5,
                heights: vec![0.0; 25],
                texture_level: address.level,
                texture_resolution: 4,
                albedo: Arc::clone(&image),
                normal: image,
            })
        }
    }

    #[test]
    fn test_moon_parameters() {
        let moon = BodyDef::moon();
        assert_eq!(moon.radius_m, 1_737_400.0);
        assert_eq!(moon.vertex_max_level, 8);
        assert_eq!(moon.texture_max_level, 4);
    }

    #[test]
    fn test_build_clamps_lod_to_the_body_data_depth() {
        let moon = BodyDef::moon();
        let sphere = moon.build(
            Arc::new(FlatProvider),
            LodSettings {
                subdivide_limit: 4,
                max_level: 12,
            },
            Some(1),
        );
        assert_eq!(sphere.max_level(), 8);
        assert_eq!(sphere.radius(), moon.radius_m);
    }

    #[test]
    fn test_build_keeps_a_shallower_lod_cap() {
        let moon = BodyDef::moon();
        let sphere = moon.build(
            Arc::new(FlatProvider),
            LodSettings {
                subdivide_limit: 4,
                max_level: 3,
            },
            Some(1),
        );
        assert_eq!(sphere.max_level(), 3);
    }
}
