//! Quadsphere geometry: cube faces, tile addressing, and cube-to-sphere projection.

mod cube_face;
mod projection;
mod tile_address;

pub use cube_face::CubeFace;
pub use projection::{FaceCoord, tile_direction};
pub use tile_address::{AncestorUv, TileAddress};
