//! Keyframe sampling: write a clip's value at a frame into a local pose.

use std::collections::HashMap;

use skelly_core::types::{Animation, Bone, BoneId, Element, Keyframe};

use crate::pose::LocalPose;

/// Sample `anim` at `frame` into `locals`, overwriting only keyed elements.
///
/// Elements a clip never keys keep whatever value `locals` already holds,
/// which is what makes ordered layering work: later clips stomp earlier ones
/// only where they actually animate. Keyframes for bone ids absent from
/// `bones` are ignored.
///
/// Sampling between two keyframes interpolates linearly by frame distance;
/// outside the keyed range the nearest keyframe's value holds.
pub fn sample_into(locals: &mut LocalPose, bones: &[Bone], anim: &Animation, frame: u32) {
    let mut tracks: HashMap<(BoneId, Element), Vec<&Keyframe>> = HashMap::new();
    for kf in &anim.keyframes {
        tracks.entry((kf.bone, kf.element)).or_default().push(kf);
    }

    for ((bone_id, element), mut track) in tracks {
        let Some(index) = bones.iter().position(|b| b.id == bone_id) else {
            continue;
        };
        track.sort_by_key(|kf| kf.frame);
        let value = sample_track(&track, frame);
        let xf = &mut locals.transforms[index];
        match element {
            Element::PositionX => xf.pos.x = value,
            Element::PositionY => xf.pos.y = value,
            Element::Rotation => xf.rot = value,
            Element::ScaleX => xf.scale.x = value,
            Element::ScaleY => xf.scale.y = value,
        }
    }
}

/// Value of one sorted, non-empty track at `frame`.
fn sample_track(track: &[&Keyframe], frame: u32) -> f32 {
    let first = track[0];
    let last = track[track.len() - 1];
    if frame <= first.frame {
        return first.value;
    }
    if frame >= last.frame {
        return last.value;
    }
    // frame is strictly inside the keyed range, so a bracketing pair exists.
    let after = track
        .iter()
        .position(|kf| kf.frame >= frame)
        .unwrap_or(track.len() - 1);
    let b = track[after];
    if b.frame == frame {
        return b.value;
    }
    let a = track[after - 1];
    let t = (frame - a.frame) as f32 / (b.frame - a.frame) as f32;
    a.value + (b.value - a.value) * t
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
