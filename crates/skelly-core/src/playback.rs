//! Playback timing: map wall-clock time to bounded clip frames.
//!
//! The host render loop owns the clock; this module only converts an elapsed
//! duration into a frame index, honoring loop (wrap) vs clamp-at-end and
//! optional reversal.

use std::time::Duration;

use crate::types::Animation;

/// Frame index for `elapsed` wall-clock time into `anim`.
///
/// The raw index is `elapsed * fps`, floored, then bounded by
/// [`bound_frame`]. A clip with `fps == 0` always plays frame 0.
pub fn frame_for_time(anim: &Animation, elapsed: Duration, reverse: bool, looped: bool) -> u32 {
    if anim.fps == 0 {
        return 0;
    }
    let raw = (elapsed.as_secs_f64() * f64::from(anim.fps)).floor() as i64;
    bound_frame(anim, raw, reverse, looped)
}

/// Bound a raw (possibly out-of-range) frame index to the clip.
///
/// Looping wraps modulo `last_frame + 1`; non-looping clamps to
/// `[0, last_frame]`. Reversal mirrors the bounded index so a reversed loop
/// starts at the last frame.
pub fn bound_frame(anim: &Animation, frame: i64, reverse: bool, looped: bool) -> u32 {
    let last = i64::from(anim.last_frame());
    if last == 0 {
        return 0;
    }
    let bounded = if looped {
        frame.rem_euclid(last + 1)
    } else {
        frame.clamp(0, last)
    };
    let bounded = if reverse { last - bounded } else { bounded };
    bounded as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
