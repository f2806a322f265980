//! Animation math for skelly armatures.
//!
//! Keyframe sampling, hierarchical transform resolution (with per-bone
//! rotation corrections, which is how IK results are injected), and mesh
//! vertex skinning. Pose crossfading lives here too since it operates on the
//! same sampled-pose values.
//!
//! # Architecture
//!
//! ```text
//! Animation + frame ──► sample_into ──► LocalPose ──► resolve ──► WorldPose
//!                                          ▲
//!                                  LocalPose::lerp (crossfade)
//! ```
//!
//! A [`LocalPose`](pose::LocalPose) is the sampled, pre-hierarchy pose — the
//! value a caller retains between frames for blending. A
//! [`WorldPose`](pose::WorldPose) is fully resolved and owned by a single
//! frame's render pass.

pub mod hierarchy;
pub mod pose;
pub mod sample;

pub use hierarchy::resolve;
pub use pose::{LocalPose, LocalTransform, WorldPose, WorldTransform};
pub use sample::sample_into;
