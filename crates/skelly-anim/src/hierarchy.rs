//! Hierarchy resolution: local pose to world pose, plus vertex skinning.

use std::collections::HashMap;

use skelly_core::types::{Bone, BoneId, Vec2};

use crate::pose::{LocalPose, WorldPose, WorldTransform};

/// Resolve a local pose into world space.
///
/// Bones compose front to back: armature validation guarantees parents come
/// before children, so a single forward pass suffices. A child's local
/// position is scaled by the parent's world scale, rotated by the parent's
/// world rotation, then offset; rotations add and scales multiply
/// componentwise.
///
/// `corrections` holds extra rotation per bone id, applied on top of the
/// sampled local rotation. This is the channel IK solvers use to bend joints
/// without touching the sampled pose.
///
/// Mesh bones additionally get their vertices skinned into world space.
pub fn resolve(
    bones: &[Bone],
    locals: &LocalPose,
    corrections: &HashMap<BoneId, f32>,
) -> WorldPose {
    let mut transforms: Vec<WorldTransform> = Vec::with_capacity(bones.len());
    for (i, bone) in bones.iter().enumerate() {
        let local = &locals.transforms[i];
        let rot = local.rot + corrections.get(&bone.id).copied().unwrap_or(0.0);
        let world = match bone.parent {
            Some(parent_id) => {
                // Validation guarantees the parent resolved earlier.
                let p = bones
                    .iter()
                    .position(|b| b.id == parent_id)
                    .map(|pi| transforms[pi])
                    .unwrap_or(IDENTITY);
                let offset = local.pos.component_mul(&p.scale);
                let (sin, cos) = p.rot.sin_cos();
                WorldTransform {
                    pos: Vec2::new(
                        p.pos.x + offset.x * cos - offset.y * sin,
                        p.pos.y + offset.x * sin + offset.y * cos,
                    ),
                    rot: p.rot + rot,
                    scale: local.scale.component_mul(&p.scale),
                }
            }
            None => WorldTransform {
                pos: local.pos,
                rot,
                scale: local.scale,
            },
        };
        transforms.push(world);
    }

    let vertices = skin_vertices(bones, &transforms);
    WorldPose {
        transforms,
        vertices,
    }
}

const IDENTITY: WorldTransform = WorldTransform {
    pos: Vec2::new(0.0, 0.0),
    rot: 0.0,
    scale: Vec2::new(1.0, 1.0),
};

/// Skin every mesh bone's vertices into world space.
///
/// A vertex with weights is the weight-blended sum of each influencing
/// bone's transform applied to the bind position; an unweighted vertex is
/// bound fully to its owning bone.
fn skin_vertices(bones: &[Bone], transforms: &[WorldTransform]) -> Vec<Vec<Vec2>> {
    let mut out: Vec<Vec<Vec2>> = Vec::with_capacity(bones.len());
    for (i, bone) in bones.iter().enumerate() {
        if !bone.is_mesh() {
            out.push(Vec::new());
            continue;
        }
        let skinned = bone
            .vertices
            .iter()
            .map(|v| {
                if v.weights.is_empty() {
                    transforms[i].apply(v.pos)
                } else {
                    let mut acc = Vec2::zeros();
                    for w in &v.weights {
                        let Some(bi) = bones.iter().position(|b| b.id == w.bone) else {
                            continue;
                        };
                        acc += transforms[bi].apply(v.pos) * w.weight;
                    }
                    acc
                }
            })
            .collect();
        out.push(skinned);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
