//! Shared armature fixtures for skelly crate tests.
//!
//! Builders here return fully valid armatures (they pass
//! `Armature::validate`) so tests exercise pipeline behavior, not fixture
//! plumbing.

pub mod fixtures;

pub use fixtures::{simple_bone, skellington, two_bone_chain};
