//! The compositor: the last pipeline stage before the rendering host.
//!
//! Takes an armature plus its render-space bones and emits an ordered list
//! of textured draw primitives. Everything GPU-facing ends here; hosts only
//! need to know how to draw a quad and an indexed triangle mesh.

pub mod primitive;

pub use primitive::{compose, Mesh, MeshPoint, Primitive, Quad};
