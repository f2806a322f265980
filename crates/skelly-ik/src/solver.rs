//! Cyclic coordinate descent, one sweep at a time.

use std::collections::HashMap;

use skelly_anim::WorldPose;
use skelly_core::types::{BendDirection, Bone, BoneId, IkFamily, Vec2};

use crate::family::validate_family;

/// Distance under which the effector counts as on target.
const REACH_EPSILON: f32 = 1e-4;

/// Run one CCD sweep of every solvable family.
///
/// Families that fail validation are skipped with a debug log; bad chain
/// data never fails the frame.
pub fn solve_families(
    families: &[IkFamily],
    bones: &[Bone],
    world: &WorldPose,
    corrections: &mut HashMap<BoneId, f32>,
) {
    for family in families {
        if let Err(reason) = validate_family(family, bones) {
            log::debug!("skipping IK family: {reason}");
            continue;
        }
        solve_pass(family, bones, world, corrections);
    }
}

/// Run one CCD sweep of `family` against the resolved `world` pose,
/// accumulating per-bone rotation corrections.
///
/// The effector is the last chain bone; the goal is the target bone's world
/// position. Joints sweep tip to root, each rotating to swing the effector
/// toward the goal. Non-root joints are clamped to the family's bend
/// direction, which disambiguates the two mirror solutions a 2D chain has.
///
/// Callers re-resolve the hierarchy between sweeps; within a sweep the
/// effector estimate is updated analytically after each joint.
///
/// The family must have been validated with
/// [`validate_family`](crate::family::validate_family) first; bone lookups
/// here assume it was.
pub fn solve_pass(
    family: &IkFamily,
    bones: &[Bone],
    world: &WorldPose,
    corrections: &mut HashMap<BoneId, f32>,
) {
    let index_of = |id: BoneId| bones.iter().position(|b| b.id == id);

    let Some(target_index) = index_of(family.target) else {
        return;
    };
    let Some(effector_index) = family.bones.last().copied().and_then(index_of) else {
        return;
    };

    let goal = world.transforms[target_index].pos;
    let mut effector = world.transforms[effector_index].pos;

    // Tip to root, skipping the effector itself: rotating the tip bone
    // cannot move its own origin.
    for (chain_pos, &joint_id) in family.bones.iter().enumerate().rev().skip(1) {
        if (goal - effector).norm() < REACH_EPSILON {
            break;
        }
        let Some(joint_index) = index_of(joint_id) else {
            continue;
        };
        let pivot = world.transforms[joint_index].pos;

        let to_effector = effector - pivot;
        let to_goal = goal - pivot;
        if to_effector.norm() < REACH_EPSILON || to_goal.norm() < REACH_EPSILON {
            continue;
        }

        let delta = signed_angle(to_effector, to_goal);
        let old = corrections.get(&joint_id).copied().unwrap_or(0.0);
        let mut new = old + delta;
        if chain_pos > 0 {
            new = clamp_bend(new, family.constraint);
        }
        corrections.insert(joint_id, new);

        // Swing the effector estimate by the correction actually applied.
        effector = pivot + rotate(to_effector, new - old);
    }
}

/// Restrict a non-root joint's accumulated correction to the allowed side.
fn clamp_bend(correction: f32, constraint: BendDirection) -> f32 {
    match constraint {
        BendDirection::Clockwise => correction.min(0.0),
        BendDirection::CounterClockwise => correction.max(0.0),
    }
}

/// Signed angle from `a` to `b`, CCW positive, in `(-PI, PI]`.
fn signed_angle(a: Vec2, b: Vec2) -> f32 {
    let cross = a.x * b.y - a.y * b.x;
    let dot = a.dot(&b);
    cross.atan2(dot)
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
