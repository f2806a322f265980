//! Pose pipeline errors.

use thiserror::Error;

/// Precondition failures in the pose orchestrator.
///
/// These indicate caller bugs and fail the frame before any computation.
/// Bad asset data (invalid IK families, unbound texture slots) is handled
/// by skipping, not by erroring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseError {
    #[error("animation index {index} out of range, armature has {count} animations")]
    AnimationIndex { index: usize, count: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = PoseError::AnimationIndex { index: 5, count: 2 };
        assert_eq!(
            err.to_string(),
            "animation index 5 out of range, armature has 2 animations"
        );
    }
}
