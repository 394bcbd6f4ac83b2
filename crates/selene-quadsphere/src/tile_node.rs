//! One node of a per-face tile quadtree.

use glam::DVec3;
use selene_provider::{FetchedTile, TileFetcher};

use crate::{RenderTile, SubdivisionBudget, TileMesh, build_tile_mesh};
use selene_cubesphere::TileAddress;

/// Lifecycle of a tile's data.
pub enum TileState {
    /// Fetch submitted, result not yet drained.
    Pending,
    /// Data arrived and the mesh is built.
    Ready(TileMesh),
    /// The fetch failed. Terminal: the node never subdivides and its
    /// subtree is frozen, while siblings continue refining.
    Failed,
}

/// Per-frame inputs threaded through the tree walk.
///
/// Nodes hold no references back into the quadsphere; everything they need
/// arrives here.
pub struct UpdateContext<'a> {
    /// Viewer position in planet-local meters.
    pub viewer: DVec3,
    /// Planet radius in meters.
    pub radius: f64,
    /// Nodes at this level or deeper never subdivide.
    pub max_level: u8,
    /// Shared frame budget for child creation.
    pub budget: &'a mut SubdivisionBudget,
    /// Where newly created children submit their fetches.
    pub fetcher: &'a TileFetcher,
}

/// A quadtree node covering one tile of one cube face.
pub struct TileNode {
    /// The tile this node covers.
    pub address: TileAddress,
    state: TileState,
    children: Option<Box<[TileNode; 4]>>,
    show_mesh: bool,
}

impl TileNode {
    /// Create a node and submit its data fetch.
    #[must_use]
    pub fn new(address: TileAddress, fetcher: &TileFetcher) -> Self {
        fetcher.submit(address);
        Self {
            address,
            state: TileState::Pending,
            children: None,
            show_mesh: false,
        }
    }

    /// Current data state.
    #[must_use]
    pub fn state(&self) -> &TileState {
        &self.state
    }

    /// True once the node's mesh is built.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TileState::Ready(_))
    }

    /// Deliver a drained fetch result to the owning descendant.
    ///
    /// Walks the tree by the target's address bits. Results for nodes that
    /// no longer exist are dropped.
    pub fn route_fetched(&mut self, fetched: FetchedTile, radius: f64) {
        debug_assert_eq!(self.address.face, fetched.address.face);
        let target = fetched.address;

        let mut node: &mut TileNode = self;
        while node.address.level < target.level {
            let shift = target.level - node.address.level - 1;
            let dx = (target.x >> shift) & 1;
            let dy = (target.y >> shift) & 1;
            let Some(children) = node.children.as_deref_mut() else {
                tracing::trace!(tile = %target, "dropping result for a missing node");
                return;
            };
            node = &mut children[(dx * 2 + dy) as usize];
        }

        debug_assert_eq!(node.address, target);
        node.apply_fetch(fetched, radius);
    }

    fn apply_fetch(&mut self, fetched: FetchedTile, radius: f64) {
        match fetched.result {
            Ok(data) => {
                let mesh = build_tile_mesh(&self.address, &data, radius);
                tracing::debug!(
                    tile = %self.address,
                    us = fetched.fetch_time_us,
                    triangles = mesh.triangle_count(),
                    "tile ready"
                );
                self.state = TileState::Ready(mesh);
            }
            Err(error) => {
                tracing::warn!(tile = %self.address, %error, "tile fetch failed, freezing branch");
                self.state = TileState::Failed;
            }
        }
    }

    /// Whether the viewer is close enough to warrant showing this tile's
    /// children instead of its own mesh.
    ///
    /// The frame budget is not consulted here: it gates child creation in
    /// [`update`](Self::update), not visibility, so children that already
    /// exist and are ready keep showing on budget-exhausted frames.
    fn wants_subdivision(&self, viewer: DVec3, radius: f64, max_level: u8) -> bool {
        let TileState::Ready(mesh) = &self.state else {
            return false;
        };
        if self.address.level >= max_level {
            return false;
        }

        let level_extent = 0.5f64.powi(i32::from(self.address.level)) * radius;
        let distance = viewer.distance(mesh.center) - level_extent;
        distance < level_extent
    }

    /// Advance this node for the frame: create children when the viewer is
    /// close and the budget allows, decide whose meshes show, and recurse
    /// into visible children.
    ///
    /// Children become visible only once all four are ready, so a parent's
    /// mesh never disappears before its full replacement exists. Children
    /// are kept when the viewer retreats; only their visibility changes.
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if !self.is_ready() {
            return;
        }

        let mut children_visible = false;
        if self.wants_subdivision(ctx.viewer, ctx.radius, ctx.max_level) {
            if self.children.is_none() && ctx.budget.try_consume() {
                let children = self.address.children().map(|a| TileNode::new(a, ctx.fetcher));
                self.children = Some(Box::new(children));
            }
            children_visible = self.children.is_some();
        }

        if let Some(children) = &self.children {
            if children.iter().any(|child| !child.is_ready()) {
                children_visible = false;
            }
        }

        self.show_mesh = !children_visible;

        if children_visible {
            if let Some(children) = &mut self.children {
                for child in children.iter_mut() {
                    child.update(ctx);
                }
            }
        }
    }

    /// Append every tile in this subtree currently showing its mesh.
    pub fn collect_visible<'a>(&'a self, out: &mut Vec<RenderTile<'a>>) {
        if self.show_mesh {
            if let TileState::Ready(mesh) = &self.state {
                out.push(RenderTile {
                    address: self.address,
                    mesh,
                });
            }
            return;
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_visible(out);
            }
        }
    }
}
