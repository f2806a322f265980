//! The pose orchestrator: layers, crossfade, IK, resolve.

use std::collections::HashMap;

use skelly_anim::{resolve, sample_into, LocalPose, WorldPose};
use skelly_core::types::{Armature, BoneId};
use skelly_ik::solve_families;

use crate::error::PoseError;

/// IK refinement passes per frame. A convergence budget, not a fixed point:
/// chains that need more simply get closer next frame.
pub const IK_PASSES: u32 = 10;

/// One animation layer: a clip (by index into the armature) at a frame.
///
/// Layers apply in slice order; later layers override the elements they key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    pub animation: usize,
    pub frame: u32,
}

/// Per-instance pose orchestrator.
///
/// Holds the only state the pipeline carries between frames: the previously
/// produced local pose (the crossfade source) and the blend countdown.
/// Everything else is recomputed from the armature template each call.
#[derive(Debug, Clone)]
pub struct Animator {
    blend_frames: u32,
    /// Steps taken into the active crossfade, `None` when not blending.
    blend_step: Option<u32>,
    previous: Option<LocalPose>,
    last_clips: Vec<usize>,
}

impl Animator {
    /// `blend_frames` is the crossfade length when the layer set changes;
    /// 0 disables blending entirely.
    pub fn new(blend_frames: u32) -> Self {
        Self {
            blend_frames,
            blend_step: None,
            previous: None,
            last_clips: Vec::new(),
        }
    }

    /// Produce the resolved world pose for one frame.
    ///
    /// Steps: validate layer indices, sample layers over the template pose,
    /// crossfade from the retained previous pose if a blend is active, run
    /// [`IK_PASSES`] CCD sweeps (re-resolving the hierarchy between sweeps)
    /// when `solve_ik` is set, and resolve once more so mesh vertices are
    /// skinned with the converged corrections.
    ///
    /// Returns [`PoseError::AnimationIndex`] before touching any state if a
    /// layer references a clip the armature does not have.
    pub fn animate(
        &mut self,
        armature: &Armature,
        layers: &[Layer],
        solve_ik: bool,
    ) -> Result<WorldPose, PoseError> {
        for layer in layers {
            if layer.animation >= armature.animations.len() {
                return Err(PoseError::AnimationIndex {
                    index: layer.animation,
                    count: armature.animations.len(),
                });
            }
        }

        let mut locals = LocalPose::from_template(&armature.bones);
        for layer in layers {
            sample_into(
                &mut locals,
                &armature.bones,
                &armature.animations[layer.animation],
                layer.frame,
            );
        }

        locals = self.crossfade(locals, layers);
        self.previous = Some(locals.clone());

        let mut corrections: HashMap<BoneId, f32> = HashMap::new();
        let mut world = resolve(&armature.bones, &locals, &corrections);
        if solve_ik {
            for _ in 0..IK_PASSES {
                solve_families(
                    &armature.ik_families,
                    &armature.bones,
                    &world,
                    &mut corrections,
                );
                world = resolve(&armature.bones, &locals, &corrections);
            }
        }
        Ok(world)
    }

    /// Blend the freshly sampled pose against the retained previous one.
    ///
    /// A blend starts when the set of layered clips changes. Step 0 returns
    /// the previous pose unchanged; step `blend_frames` lands on the sampled
    /// pose. Because the blended output becomes the next frame's source, the
    /// fade eases toward the new clip rather than crossing linearly.
    fn crossfade(&mut self, sampled: LocalPose, layers: &[Layer]) -> LocalPose {
        let clips: Vec<usize> = layers.iter().map(|l| l.animation).collect();
        let changed = clips != self.last_clips;
        self.last_clips = clips;

        let stale = self
            .previous
            .as_ref()
            .is_some_and(|p| p.len() != sampled.len());
        if stale {
            self.previous = None;
        }

        if changed && self.blend_frames > 0 && self.previous.is_some() {
            self.blend_step = Some(0);
        }

        let (Some(step), Some(prev)) = (self.blend_step, self.previous.as_ref()) else {
            self.blend_step = None;
            return sampled;
        };

        let t = step as f32 / self.blend_frames as f32;
        let blended = prev.lerp(&sampled, t.min(1.0));
        self.blend_step = if step < self.blend_frames {
            Some(step + 1)
        } else {
            None
        };
        blended
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use skelly_core::types::{Animation, Element, Keyframe, Vec2};
    use skelly_test_utils::{simple_bone, skellington, two_bone_chain};

    fn rot_clip(name: &str, bone: u32, value: f32) -> Animation {
        Animation {
            name: name.into(),
            fps: 30,
            keyframes: vec![Keyframe {
                frame: 0,
                bone: BoneId(bone),
                element: Element::Rotation,
                value,
            }],
        }
    }

    // ---- preconditions ----

    #[test]
    fn bad_animation_index_errors_before_sampling() {
        let arm = skellington();
        let mut animator = Animator::new(0);
        let err = animator
            .animate(
                &arm,
                &[Layer {
                    animation: 7,
                    frame: 0,
                }],
                false,
            )
            .unwrap_err();
        assert_eq!(
            err,
            PoseError::AnimationIndex {
                index: 7,
                count: 1
            }
        );
        // State untouched: a following valid call starts from the template.
        assert!(animator.previous.is_none());
    }

    // ---- layering ----

    #[test]
    fn no_layers_yields_template_pose() {
        let arm = skellington();
        let mut animator = Animator::new(0);
        let world = animator.animate(&arm, &[], false).unwrap();
        // Head sits at its template offset above the torso.
        assert_relative_eq!(world.transforms[1].pos.y, 2.0);
        assert_relative_eq!(world.transforms[1].rot, 0.0);
    }

    #[test]
    fn later_layers_override_keyed_elements() {
        let mut arm = skellington();
        arm.animations.push(rot_clip("override", 1, -2.0));
        let mut animator = Animator::new(0);
        let layers = [
            Layer {
                animation: 0,
                frame: 10,
            },
            Layer {
                animation: 1,
                frame: 0,
            },
        ];
        let world = animator.animate(&arm, &layers, false).unwrap();
        assert_relative_eq!(world.transforms[1].rot, -2.0);
    }

    // ---- crossfade ----

    #[test]
    fn blend_step_zero_is_previous_pose_exactly() {
        let mut arm = skellington();
        arm.animations.push(rot_clip("other", 1, 3.0));
        let mut animator = Animator::new(4);

        // Settle on clip 0 at its final keyed value.
        let a = animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 10,
                }],
                false,
            )
            .unwrap();
        assert_relative_eq!(a.transforms[1].rot, 1.0);

        // Switch: the first blended frame still shows the old pose.
        let b = animator
            .animate(
                &arm,
                &[Layer {
                    animation: 1,
                    frame: 0,
                }],
                false,
            )
            .unwrap();
        assert_relative_eq!(b.transforms[1].rot, 1.0);
    }

    #[test]
    fn blend_reaches_new_pose_at_final_step() {
        let mut arm = skellington();
        arm.animations.push(rot_clip("other", 1, 3.0));
        let n = 4;
        let mut animator = Animator::new(n);

        animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 10,
                }],
                false,
            )
            .unwrap();

        let mut last = 0.0;
        for _ in 0..=n {
            let world = animator
                .animate(
                    &arm,
                    &[Layer {
                        animation: 1,
                        frame: 0,
                    }],
                    false,
                )
                .unwrap();
            last = world.transforms[1].rot;
        }
        assert_relative_eq!(last, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn blend_progress_is_monotonic() {
        let mut arm = skellington();
        arm.animations.push(rot_clip("other", 1, 3.0));
        let mut animator = Animator::new(8);

        animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 10,
                }],
                false,
            )
            .unwrap();

        let mut prev_rot = 1.0;
        for _ in 0..=8 {
            let world = animator
                .animate(
                    &arm,
                    &[Layer {
                        animation: 1,
                        frame: 0,
                    }],
                    false,
                )
                .unwrap();
            let rot = world.transforms[1].rot;
            assert!(rot >= prev_rot - 1e-6, "blend regressed: {rot} < {prev_rot}");
            prev_rot = rot;
        }
    }

    #[test]
    fn zero_blend_frames_switches_hard() {
        let mut arm = skellington();
        arm.animations.push(rot_clip("other", 1, 3.0));
        let mut animator = Animator::new(0);

        animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 10,
                }],
                false,
            )
            .unwrap();
        let world = animator
            .animate(
                &arm,
                &[Layer {
                    animation: 1,
                    frame: 0,
                }],
                false,
            )
            .unwrap();
        assert_relative_eq!(world.transforms[1].rot, 3.0);
    }

    #[test]
    fn frame_advance_does_not_trigger_blend() {
        let arm = skellington();
        let mut animator = Animator::new(10);
        animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 0,
                }],
                false,
            )
            .unwrap();
        // Same clip, later frame: sampled value comes through unblended.
        let world = animator
            .animate(
                &arm,
                &[Layer {
                    animation: 0,
                    frame: 10,
                }],
                false,
            )
            .unwrap();
        assert_relative_eq!(world.transforms[1].rot, 1.0);
    }

    // ---- IK integration ----

    #[test]
    fn ik_pulls_chain_to_target() {
        let arm = two_bone_chain(Vec2::new(0.0, 2.0));
        let mut animator = Animator::new(0);
        let world = animator.animate(&arm, &[], true).unwrap();
        let tip = world.transforms[2].pos;
        assert_relative_eq!(tip.x, 0.0, epsilon = 1e-2);
        assert_relative_eq!(tip.y, 2.0, epsilon = 1e-2);
    }

    #[test]
    fn ik_disabled_leaves_pose_uncorrected() {
        let arm = two_bone_chain(Vec2::new(0.0, 2.0));
        let mut animator = Animator::new(0);
        let world = animator.animate(&arm, &[], false).unwrap();
        assert_relative_eq!(world.transforms[2].pos.x, 2.0);
        assert_relative_eq!(world.transforms[2].pos.y, 0.0);
    }

    #[test]
    fn template_bones_are_not_mutated() {
        let arm = two_bone_chain(Vec2::new(0.0, 2.0));
        let before = arm.clone();
        let mut animator = Animator::new(0);
        animator.animate(&arm, &[], true).unwrap();
        assert_eq!(arm, before);
    }

    #[test]
    fn armature_swap_drops_stale_previous_pose() {
        let arm = skellington();
        let mut animator = Animator::new(5);
        animator.animate(&arm, &[], false).unwrap();

        // A different, smaller armature must not panic the crossfade.
        let small = skelly_core::types::Armature {
            bones: vec![simple_bone(0, None)],
            ..Default::default()
        };
        let world = animator.animate(&small, &[], false).unwrap();
        assert_eq!(world.len(), 1);
    }
}
