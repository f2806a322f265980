//! Inverse kinematics for skelly armature chains.
//!
//! Chains ("families") are solved with cyclic coordinate descent in 2D. One
//! call to [`solve_pass`] sweeps the chain once; the pose pipeline interleaves
//! passes with hierarchy re-resolution so each sweep works from honest world
//! positions. Results land in a per-bone rotation-correction map that the
//! resolver applies on top of the sampled pose.

pub mod family;
pub mod solver;

pub use family::{validate_family, FamilyError};
pub use solver::{solve_families, solve_pass};
