//! Pose pipeline stages between sampling and compositing.
//!
//! [`Animator`] is the orchestrator: it owns the only state carried across
//! frames (the previous pose for crossfading) and turns animation layers
//! into a resolved, IK-corrected [`WorldPose`](skelly_anim::WorldPose).
//! [`construct`] then maps that pose from animation space (Y-up,
//! CCW-positive) into render space (Y-down, scaled, offset), which is the
//! last geometric step before draw-primitive emission.
//!
//! One [`Animator`] per animated character instance; nothing here is global.

pub mod animator;
pub mod construct;
pub mod error;

pub use animator::{Animator, Layer, IK_PASSES};
pub use construct::{construct, RenderBone, RenderOptions};
pub use error::PoseError;
