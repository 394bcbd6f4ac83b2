//! Concrete planetary bodies.
//!
//! A [`BodyDef`] bundles the physical and data-budget parameters of one
//! body and wires a tile provider into a ready-to-update
//! [`Quadsphere`](selene_quadsphere::Quadsphere).

mod body;

pub use body::BodyDef;
