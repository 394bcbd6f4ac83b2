//! The six-faced planet surface.

use glam::DVec3;
use selene_cubesphere::{CubeFace, TileAddress};
use selene_provider::TileFetcher;

use crate::{SubdivisionBudget, TileMesh, TileNode, UpdateContext};

/// Immutable per-body parameters.
#[derive(Clone, Copy, Debug)]
pub struct QuadsphereOptions {
    /// Planet radius in meters.
    pub radius: f64,
}

/// Runtime-adjustable level-of-detail knobs.
#[derive(Clone, Copy, Debug)]
pub struct LodSettings {
    /// Maximum tile subdivisions per frame.
    pub subdivide_limit: u32,
    /// Deepest tile level the tree may reach.
    pub max_level: u8,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            subdivide_limit: 4,
            max_level: 9,
        }
    }
}

/// Debug rendering switches, read by the render backend each frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderToggles {
    /// Draw tile meshes as wireframes.
    pub wireframe: bool,
    /// Tint each tile by its subdivision level.
    pub level_colors: bool,
}

/// Tint cycle for the level-color debug view.
pub const LEVEL_COLORS: [[u8; 4]; 6] = [
    [255, 170, 170, 255],
    [255, 255, 170, 255],
    [170, 255, 170, 255],
    [170, 255, 255, 255],
    [170, 170, 255, 255],
    [255, 170, 255, 255],
];

/// Debug tint for a tile at `level`.
#[must_use]
pub fn level_color(level: u8) -> [u8; 4] {
    LEVEL_COLORS[level as usize % LEVEL_COLORS.len()]
}

/// A tile currently showing its mesh.
pub struct RenderTile<'a> {
    /// Which tile this is.
    pub address: TileAddress,
    /// Its geometry and imagery.
    pub mesh: &'a TileMesh,
}

/// A planet surface built from six tile quadtrees, one per cube face.
///
/// Call [`update`](Self::update) once per frame with the viewer position in
/// planet-local coordinates, then draw whatever
/// [`visible_tiles`](Self::visible_tiles) returns. Nothing is visible until
/// all six root tiles have their data, so the sphere appears whole or not
/// at all.
pub struct Quadsphere {
    options: QuadsphereOptions,
    roots: [TileNode; 6],
    budget: SubdivisionBudget,
    max_level: u8,
    render: RenderToggles,
    fetcher: TileFetcher,
    visible: bool,
}

impl Quadsphere {
    /// Create a quadsphere and submit the six root fetches.
    #[must_use]
    pub fn new(options: QuadsphereOptions, lod: LodSettings, fetcher: TileFetcher) -> Self {
        let roots = CubeFace::ALL.map(|face| TileNode::new(TileAddress::root(face), &fetcher));
        Self {
            options,
            roots,
            budget: SubdivisionBudget::new(lod.subdivide_limit),
            max_level: lod.max_level,
            render: RenderToggles::default(),
            fetcher,
            visible: false,
        }
    }

    /// Advance the sphere one frame.
    ///
    /// Drains completed fetches into the trees, resets the subdivision
    /// budget, re-evaluates whole-sphere visibility, and walks each face
    /// tree top-down from the viewer's position.
    pub fn update(&mut self, viewer: DVec3) {
        for fetched in self.fetcher.drain_completed() {
            let face = fetched.address.face as usize;
            self.roots[face].route_fetched(fetched, self.options.radius);
        }

        self.budget.reset();

        let was_visible = self.visible;
        self.visible = self.roots.iter().all(TileNode::is_ready);
        if self.visible && !was_visible {
            tracing::info!(radius = self.options.radius, "all root tiles ready, surface visible");
        }

        // Roots that are already ready keep refining while the sphere is
        // hidden, so the tree is warm when the last root arrives.
        let Self {
            options,
            roots,
            budget,
            max_level,
            fetcher,
            ..
        } = self;
        let mut ctx = UpdateContext {
            viewer,
            radius: options.radius,
            max_level: *max_level,
            budget,
            fetcher,
        };
        for root in roots.iter_mut() {
            root.update(&mut ctx);
        }
    }

    /// Every tile currently showing its mesh, across all six faces.
    ///
    /// Empty until the whole sphere is visible.
    #[must_use]
    pub fn visible_tiles(&self) -> Vec<RenderTile<'_>> {
        let mut tiles = Vec::new();
        if !self.visible {
            return tiles;
        }
        for root in &self.roots {
            root.collect_visible(&mut tiles);
        }
        tiles
    }

    /// True once all six root tiles are ready.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Planet radius in meters.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.options.radius
    }

    /// Fetches queued or executing right now.
    #[must_use]
    pub fn fetches_in_flight(&self) -> u64 {
        self.fetcher.in_flight_count()
    }

    /// Change the per-frame subdivision limit.
    pub fn set_subdivide_limit(&mut self, limit: u32) {
        self.budget.set_limit(limit);
    }

    /// Change the deepest allowed tile level. Existing deeper tiles stay in
    /// the tree but stop being shown once the viewer moves.
    pub fn set_max_level(&mut self, max_level: u8) {
        self.max_level = max_level;
    }

    /// Deepest allowed tile level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Debug render switches.
    #[must_use]
    pub fn render_toggles(&self) -> RenderToggles {
        self.render
    }

    /// Mutable access to the debug render switches.
    pub fn render_toggles_mut(&mut self) -> &mut RenderToggles {
        &mut self.render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use selene_provider::{FetchError, TileData, TileImage, TileProvider};

    const RADIUS: f64 = 1000.0;

    struct FlatProvider {
        fetches: AtomicUsize,
        fail_at: Option<TileAddress>,
    }

    impl FlatProvider {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail_at: None,
            }
        }
    }

    impl TileProvider for FlatProvider {
        fn fetch(&self, address: TileAddress) -> Result<TileData, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(address) {
                return Err(FetchError::Io {
                    path: selene_provider::tile_path(&address),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
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

    fn sphere_over(provider: Arc<FlatProvider>, lod: LodSettings) -> Quadsphere {
        Quadsphere::new(
            QuadsphereOptions { radius: RADIUS },
            lod,
            TileFetcher::new(provider, 2),
        )
    }

    /// Keep updating with `viewer` until `done` holds or a deadline passes.
    fn update_until(
        sphere: &mut Quadsphere,
        viewer: DVec3,
        what: &str,
        mut done: impl FnMut(&Quadsphere) -> bool,
    ) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            sphere.update(viewer);
            if done(sphere) {
                return;
            }
            assert!(Instant::now() < deadline, "timed out waiting for {what}");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn max_visible_level(sphere: &Quadsphere) -> u8 {
        sphere
            .visible_tiles()
            .iter()
            .map(|tile| tile.address.level)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_surface_hidden_until_all_roots_ready() {
        let mut sphere = sphere_over(Arc::new(FlatProvider::new()), LodSettings::default());
        assert!(!sphere.is_visible());
        assert!(sphere.visible_tiles().is_empty());

        let far = DVec3::new(0.0, 0.0, 10.0 * RADIUS);
        update_until(&mut sphere, far, "all roots ready", Quadsphere::is_visible);

        let tiles = sphere.visible_tiles();
        assert_eq!(tiles.len(), 6, "one tile per face");
        assert!(tiles.iter().all(|tile| tile.address.level == 0));
    }

    #[test]
    fn test_far_viewer_keeps_the_coarsest_tiles() {
        let mut sphere = sphere_over(Arc::new(FlatProvider::new()), LodSettings::default());
        let far = DVec3::new(0.0, 0.0, 10.0 * RADIUS);
        update_until(&mut sphere, far, "all roots ready", Quadsphere::is_visible);

        for _ in 0..20 {
            sphere.update(far);
        }
        assert_eq!(sphere.visible_tiles().len(), 6);
        assert_eq!(max_visible_level(&sphere), 0);
    }

    #[test]
    fn test_near_viewer_refines_the_facing_side_only() {
        let mut sphere = sphere_over(Arc::new(FlatProvider::new()), LodSettings::default());
        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);
        update_until(&mut sphere, near, "refinement to level 2", |s| {
            s.is_visible() && max_visible_level(s) >= 2
        });

        // The far side of the planet must stay coarse.
        for tile in sphere.visible_tiles() {
            if tile.address.face == CubeFace::NegZ {
                assert_eq!(tile.address.level, 0, "far side refined unexpectedly");
            }
        }
    }

    #[test]
    fn test_no_tile_overlaps_an_ancestor() {
        let mut sphere = sphere_over(Arc::new(FlatProvider::new()), LodSettings::default());
        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);
        update_until(&mut sphere, near, "refinement to level 2", |s| {
            s.is_visible() && max_visible_level(s) >= 2
        });

        let tiles = sphere.visible_tiles();
        for a in &tiles {
            for b in &tiles {
                if a.address == b.address || a.address.face != b.address.face {
                    continue;
                }
                let (coarse, fine) = if a.address.level < b.address.level {
                    (a, b)
                } else {
                    (b, a)
                };
                assert_ne!(
                    fine.address.ancestor_at(coarse.address.level),
                    coarse.address,
                    "{} and {} overlap",
                    fine.address,
                    coarse.address
                );
            }
        }
    }

    #[test]
    fn test_budget_caps_subdivisions_per_frame() {
        let provider = Arc::new(FlatProvider::new());
        let mut sphere = sphere_over(
            Arc::clone(&provider),
            LodSettings {
                subdivide_limit: 1,
                max_level: 9,
            },
        );
        let far = DVec3::new(0.0, 0.0, 10.0 * RADIUS);
        update_until(&mut sphere, far, "all roots ready", Quadsphere::is_visible);
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 6);

        // One near frame may create exactly one set of four children.
        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);
        sphere.update(near);
        update_until(&mut sphere, far, "child fetches to finish", |s| {
            s.fetches_in_flight() == 0
        });
        sphere.update(far);
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_failed_tile_freezes_only_its_branch() {
        let provider = Arc::new(FlatProvider {
            fetches: AtomicUsize::new(0),
            fail_at: Some(TileAddress::new(CubeFace::PosZ, 1, 0, 0)),
        });
        let mut sphere = sphere_over(provider, LodSettings::default());
        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);

        update_until(&mut sphere, near, "other faces to refine", |s| {
            s.is_visible()
                && s.visible_tiles()
                    .iter()
                    .any(|t| t.address.face != CubeFace::PosZ && t.address.level >= 1)
        });

        // The face with the failed child keeps showing its root forever.
        for _ in 0..20 {
            sphere.update(near);
        }
        let posz: Vec<_> = sphere
            .visible_tiles()
            .into_iter()
            .filter(|t| t.address.face == CubeFace::PosZ)
            .map(|t| t.address)
            .collect();
        assert_eq!(posz, vec![TileAddress::root(CubeFace::PosZ)]);
    }

    #[test]
    fn test_max_level_is_never_exceeded() {
        let mut sphere = sphere_over(
            Arc::new(FlatProvider::new()),
            LodSettings {
                subdivide_limit: 8,
                max_level: 1,
            },
        );
        let near = DVec3::new(0.0, 0.0, 1.01 * RADIUS);
        update_until(&mut sphere, near, "refinement to the cap", |s| {
            s.is_visible() && max_visible_level(s) == 1
        });

        update_until(&mut sphere, near, "fetches to settle", |s| {
            s.fetches_in_flight() == 0
        });
        for _ in 0..50 {
            sphere.update(near);
            assert!(max_visible_level(&sphere) <= 1);
        }
    }

    #[test]
    fn test_zero_subdivide_limit_freezes_refinement() {
        let mut sphere = sphere_over(Arc::new(FlatProvider::new()), LodSettings::default());
        let far = DVec3::new(0.0, 0.0, 10.0 * RADIUS);
        update_until(&mut sphere, far, "all roots ready", Quadsphere::is_visible);

        sphere.set_subdivide_limit(0);
        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);
        for _ in 0..20 {
            sphere.update(near);
        }
        assert_eq!(max_visible_level(&sphere), 0);
    }

    #[test]
    fn test_hidden_sphere_still_warms_the_tree() {
        // One root never arrives, so the sphere stays hidden; the ready
        // roots near the viewer must still grow children in the meantime.
        let provider = Arc::new(FlatProvider {
            fetches: AtomicUsize::new(0),
            fail_at: Some(TileAddress::root(CubeFace::NegZ)),
        });
        let mut sphere = sphere_over(Arc::clone(&provider), LodSettings::default());

        let near = DVec3::new(0.0, 0.0, 1.2 * RADIUS);
        update_until(&mut sphere, near, "child fetches while hidden", |_| {
            provider.fetches.load(Ordering::SeqCst) > 6
        });

        assert!(!sphere.is_visible());
        assert!(sphere.visible_tiles().is_empty());
    }

    #[test]
    fn test_level_colors_cycle() {
        assert_eq!(level_color(0), LEVEL_COLORS[0]);
        assert_eq!(level_color(5), LEVEL_COLORS[5]);
        assert_eq!(level_color(6), LEVEL_COLORS[0]);
        assert_eq!(level_color(7), LEVEL_COLORS[1]);
    }
}
