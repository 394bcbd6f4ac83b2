//! Canonical `wgpu::VertexBufferLayout` for tile mesh rendering.
//!
//! Every tile render pipeline (surface, debug wireframe) references
//! [`TILE_VERTEX_LAYOUT`] to avoid layout drift bugs.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format    | Fields                                |
//! |----------|--------|-----------|---------------------------------------|
//! | 0        | 0      | Float32x3 | position, meters relative to tile center |
//! | 1        | 12     | Snorm8x4  | smoothed-sphere normal xyz + pad      |
//! | 2        | 16     | Unorm16x2 | uv in the ancestor texture, V flipped |

use std::mem;

use glam::DVec3;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A single tile mesh vertex, packed to 20 bytes.
///
/// Positions are relative to the tile's center so that `f32` keeps
/// sub-meter precision even at planetary radii.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileVertex {
    /// Position in meters, relative to the tile center.
    pub position: [f32; 3],
    /// Unit normal as snorm8, w unused (0).
    pub normal: [i8; 4],
    /// Texture coordinate as unorm16, already remapped into the supplying
    /// ancestor's texture and V-flipped for image-space sampling.
    pub uv: [u16; 2],
}

impl TileVertex {
    /// Pack a unit direction into the snorm8 normal attribute.
    #[must_use]
    pub fn pack_normal(direction: DVec3) -> [i8; 4] {
        let quantize = |c: f64| (c.clamp(-1.0, 1.0) * 127.0).round() as i8;
        [
            quantize(direction.x),
            quantize(direction.y),
            quantize(direction.z),
            0,
        ]
    }

    /// Pack a `[0, 1]` texture coordinate into the unorm16 uv attribute.
    #[must_use]
    pub fn pack_uv(u: f64, v: f64) -> [u16; 2] {
        let quantize = |c: f64| (c.clamp(0.0, 1.0) * 65535.0).round() as u16;
        [quantize(u), quantize(v)]
    }
}

/// Vertex attributes for the tile mesh format.
pub const TILE_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    // Attribute 0: position, 3× f32
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    // Attribute 1: normal + padding, 4× snorm i8
    VertexAttribute {
        format: VertexFormat::Snorm8x4,
        offset: 12,
        shader_location: 1,
    },
    // Attribute 2: uv, 2× unorm u16
    VertexAttribute {
        format: VertexFormat::Unorm16x2,
        offset: 16,
        shader_location: 2,
    },
];

/// The vertex buffer layout for all tile mesh render pipelines.
pub const TILE_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TileVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TILE_VERTEX_ATTRIBUTES,
};

/// Return the tile vertex buffer layout as an owned value.
pub fn tile_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    TILE_VERTEX_LAYOUT
}

// ---------------------------------------------------------------------------
// Compile-time validation
// ---------------------------------------------------------------------------

/// Stride must match `TileVertex` size.
const _: () = assert!(
    mem::size_of::<TileVertex>() == 20,
    "TileVertex size changed — update TILE_VERTEX_LAYOUT"
);

/// Attribute offsets must be correct.
const _: () = assert!(TILE_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(TILE_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(TILE_VERTEX_ATTRIBUTES[2].offset == 16);

/// Last attribute must fit within the stride.
const _: () = assert!(
    TILE_VERTEX_ATTRIBUTES[2].offset + 4 <= mem::size_of::<TileVertex>() as u64,
    "Last attribute exceeds vertex stride"
);
