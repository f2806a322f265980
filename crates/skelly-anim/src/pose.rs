//! Pose value types: sampled local poses and resolved world poses.

use skelly_core::types::{Bone, Vec2};

// ---------------------------------------------------------------------------
// LocalTransform / LocalPose
// ---------------------------------------------------------------------------

/// One bone's local (parent-relative) transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub pos: Vec2,
    pub rot: f32,
    pub scale: Vec2,
}

impl LocalTransform {
    pub fn from_bone(bone: &Bone) -> Self {
        Self {
            pos: bone.pos,
            rot: bone.rot,
            scale: bone.scale,
        }
    }

    /// Linear interpolation; rotation takes the shortest angular path.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pos: self.pos.lerp(&other.pos, t),
            rot: lerp_angle(self.rot, other.rot, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

/// A sampled pose: local transforms for every bone, in armature order.
///
/// This is the value retained across frames for crossfading — nothing else
/// carries over between pipeline invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPose {
    pub transforms: Vec<LocalTransform>,
}

impl LocalPose {
    /// The armature's bind pose: every bone at its template transform.
    pub fn from_template(bones: &[Bone]) -> Self {
        Self {
            transforms: bones.iter().map(LocalTransform::from_bone).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Interpolate two equally-sized poses. t=0 yields `self` exactly,
    /// t=1 yields `other`.
    ///
    /// # Panics
    ///
    /// Panics if the poses have different bone counts.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        assert_eq!(
            self.transforms.len(),
            other.transforms.len(),
            "pose bone counts must match"
        );
        Self {
            transforms: self
                .transforms
                .iter()
                .zip(other.transforms.iter())
                .map(|(a, b)| a.lerp(b, t))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorldTransform / WorldPose
// ---------------------------------------------------------------------------

/// One bone's resolved world-space transform (animation space, Y-up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub pos: Vec2,
    pub rot: f32,
    pub scale: Vec2,
}

impl WorldTransform {
    /// Apply this transform to a point: scale, rotate, translate.
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let scaled = p.component_mul(&self.scale);
        let (sin, cos) = self.rot.sin_cos();
        Vec2::new(
            self.pos.x + scaled.x * cos - scaled.y * sin,
            self.pos.y + scaled.x * sin + scaled.y * cos,
        )
    }
}

/// A fully resolved pose: world transforms for every bone plus, for mesh
/// bones, skinned vertex positions. Owned by one frame's render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPose {
    pub transforms: Vec<WorldTransform>,
    /// Parallel to `transforms`; empty for non-mesh bones.
    pub vertices: Vec<Vec<Vec2>>,
}

impl WorldPose {
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Shortest-path angular interpolation.
pub(crate) fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let diff = (b - a + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    a + diff * t
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
