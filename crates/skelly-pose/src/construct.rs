//! Pose construction: animation space to render space.

use skelly_anim::WorldPose;
use skelly_core::types::{Armature, Vec2};

/// How a resolved pose is placed on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Signed per-axis render scale. A negative axis mirrors the character.
    pub scale: Vec2,
    /// Render-space offset in pixels.
    pub position: Vec2,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            position: Vec2::zeros(),
        }
    }
}

/// One bone's render-space placement. Parallel to the armature's bone list.
///
/// Rotation stays in the pose convention (radians, CCW-positive); the
/// compositor negates it for screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBone {
    pub pos: Vec2,
    pub rot: f32,
    pub scale: Vec2,
    /// Render-space mesh vertices; empty for quad bones.
    pub vertices: Vec<Vec2>,
}

/// Map a world pose into render space.
///
/// Per bone: positions flip from Y-up to Y-down, scale by the signed render
/// scale, and offset; scales multiply componentwise. Rotation is negated iff
/// exactly one render-scale axis is negative — a single mirror reverses
/// the direction of every angle, while a double mirror is a 180° turn that
/// leaves angular direction alone.
///
/// Pure: bone count and order are preserved and nothing is mutated.
pub fn construct(armature: &Armature, pose: &WorldPose, options: &RenderOptions) -> Vec<RenderBone> {
    let mirrored = (options.scale.x < 0.0) != (options.scale.y < 0.0);
    let place = |p: &Vec2| {
        Vec2::new(
            p.x * options.scale.x + options.position.x,
            -p.y * options.scale.y + options.position.y,
        )
    };

    armature
        .bones
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let w = &pose.transforms[i];
            RenderBone {
                pos: place(&w.pos),
                rot: if mirrored { -w.rot } else { w.rot },
                scale: w.scale.component_mul(&options.scale),
                vertices: pose.vertices[i].iter().map(|v| place(v)).collect(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skelly_anim::{resolve, LocalPose};
    use skelly_test_utils::skellington;
    use std::collections::HashMap;

    fn pose_of(armature: &Armature) -> WorldPose {
        let locals = LocalPose::from_template(&armature.bones);
        resolve(&armature.bones, &locals, &HashMap::new())
    }

    fn options(sx: f32, sy: f32) -> RenderOptions {
        RenderOptions {
            scale: Vec2::new(sx, sy),
            position: Vec2::zeros(),
        }
    }

    // ---- placement ----

    #[test]
    fn y_axis_flips() {
        let arm = skellington();
        let bones = construct(&arm, &pose_of(&arm), &options(1.0, 1.0));
        // Head is 2 units above the torso in animation space, so it lands
        // 2 pixels above (smaller y) on screen.
        assert_relative_eq!(bones[1].pos.y, -2.0);
    }

    #[test]
    fn scale_and_offset_apply() {
        let arm = skellington();
        let opts = RenderOptions {
            scale: Vec2::new(2.0, 2.0),
            position: Vec2::new(100.0, 50.0),
        };
        let bones = construct(&arm, &pose_of(&arm), &opts);
        assert_relative_eq!(bones[0].pos.x, 100.0);
        assert_relative_eq!(bones[0].pos.y, 50.0);
        assert_relative_eq!(bones[1].pos.y, 50.0 - 4.0);
        assert_relative_eq!(bones[1].scale.x, 2.0);
    }

    #[test]
    fn order_and_count_preserved() {
        let arm = skellington();
        let bones = construct(&arm, &pose_of(&arm), &options(1.0, 1.0));
        assert_eq!(bones.len(), arm.bones.len());
    }

    #[test]
    fn mesh_vertices_are_placed_too() {
        let arm = skellington();
        let opts = RenderOptions {
            scale: Vec2::new(2.0, 2.0),
            position: Vec2::new(10.0, 10.0),
        };
        let bones = construct(&arm, &pose_of(&arm), &opts);
        // cloth vertex 1 sits at (1, 0) bone-local = (1, 0) world.
        assert_relative_eq!(bones[3].vertices[1].x, 12.0);
        assert_relative_eq!(bones[3].vertices[1].y, 10.0);
        assert!(bones[0].vertices.is_empty());
    }

    // ---- mirror sign rule ----

    #[test]
    fn mirror_rule_sign_table() {
        let mut arm = skellington();
        arm.bones[0].rot = 0.5;
        let pose = pose_of(&arm);

        let cases = [
            (1.0, 1.0, 0.5),
            (-1.0, 1.0, -0.5),
            (1.0, -1.0, -0.5),
            (-1.0, -1.0, 0.5),
        ];
        for (sx, sy, expected) in cases {
            let bones = construct(&arm, &pose, &options(sx, sy));
            assert_relative_eq!(bones[0].rot, expected);
        }
    }

    #[test]
    fn zero_scale_axis_is_not_a_mirror() {
        let mut arm = skellington();
        arm.bones[0].rot = 0.5;
        let pose = pose_of(&arm);
        let bones = construct(&arm, &pose, &options(0.0, 1.0));
        assert_relative_eq!(bones[0].rot, 0.5);
        assert_relative_eq!(bones[0].pos.x, 0.0);
    }

    #[test]
    fn end_to_end_two_bone_scenario() {
        use crate::{Animator, Layer};
        use skelly_core::playback::frame_for_time;
        use skelly_core::types::{Animation, BoneId, Element, Keyframe};
        use skelly_test_utils::simple_bone;
        use std::f32::consts::FRAC_PI_2;
        use std::time::Duration;

        let mut child = simple_bone(1, Some(0));
        child.pos = Vec2::new(1.0, 0.0);
        let arm = Armature {
            bones: vec![simple_bone(0, None), child],
            animations: vec![Animation {
                name: "turn".into(),
                fps: 30,
                keyframes: vec![Keyframe {
                    frame: 0,
                    bone: BoneId(1),
                    element: Element::Rotation,
                    value: FRAC_PI_2,
                }],
            }],
            ..Default::default()
        };

        let frame = frame_for_time(&arm.animations[0], Duration::ZERO, false, true);
        assert_eq!(frame, 0);

        let mut animator = Animator::new(0);
        let pose = animator
            .animate(&arm, &[Layer { animation: 0, frame }], false)
            .unwrap();
        let bones = construct(&arm, &pose, &RenderOptions::default());

        // No mirror at scale (1, 1): the keyed rotation passes through, and
        // the child sits at the root plus its (unrotated-parent) offset.
        assert_relative_eq!(bones[1].rot, FRAC_PI_2);
        assert_relative_eq!(bones[1].pos.x, 1.0);
        assert_relative_eq!(bones[1].pos.y, 0.0);
    }

    #[test]
    fn construct_is_pure() {
        let arm = skellington();
        let pose = pose_of(&arm);
        let a = construct(&arm, &pose, &options(-1.0, 1.0));
        let b = construct(&arm, &pose, &options(-1.0, 1.0));
        assert_eq!(a, b);
        assert_eq!(pose, pose_of(&arm));
    }
}
