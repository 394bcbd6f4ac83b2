//! Continuous level-of-detail quadsphere.
//!
//! Six per-face quadtrees of [`TileNode`]s subdivide toward the viewer,
//! fetch their data through a [`TileFetcher`](selene_provider::TileFetcher),
//! and expose ready tiles as skirted triangle meshes in the canonical
//! [`TileVertex`] format.

mod budget;
mod mesh;
mod quadsphere;
mod tile_node;
mod vertex_format;

pub use budget::SubdivisionBudget;
pub use mesh::{TileMesh, build_tile_mesh};
pub use quadsphere::{
    LEVEL_COLORS, LodSettings, Quadsphere, QuadsphereOptions, RenderTile, RenderToggles,
    level_color,
};
pub use tile_node::{TileNode, TileState, UpdateContext};
pub use vertex_format::{
    TILE_VERTEX_ATTRIBUTES, TILE_VERTEX_LAYOUT, TileVertex, tile_vertex_buffer_layout,
};
