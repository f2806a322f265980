//! Armature data model.
//!
//! An [`Armature`] is the full rig loaded from an `.skf` asset: an ordered
//! bone hierarchy, animation clips, IK families, and styles (skins). All of
//! it is template data — the per-frame pipeline derives transient copies and
//! never mutates these structs.

use serde::{Deserialize, Serialize};

use crate::error::ArmatureError;

/// 2D vector used throughout the runtime. Animation space is Y-up.
pub type Vec2 = nalgebra::Vector2<f32>;

// ---------------------------------------------------------------------------
// BoneId
// ---------------------------------------------------------------------------

/// Stable identifier of a bone within one armature.
///
/// Ids are assigned by the editor and survive reordering; slice positions
/// do not. Lookups that cross the id/index boundary go through
/// [`Armature::bone_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl std::fmt::Display for BoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Bone
// ---------------------------------------------------------------------------

/// A vertex of a deformable mesh part, in the owning bone's bind space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    /// Bind position relative to the owning bone.
    pub pos: Vec2,
    /// Normalized texture coordinate within the bone's atlas rectangle.
    pub uv: Vec2,
    /// Skinning influences. Empty means fully bound to the owning bone.
    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

/// One skinning influence on a mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexWeight {
    pub bone: BoneId,
    pub weight: f32,
}

/// A node in the rig: local transform, draw order, and an optional mesh.
///
/// Rotation is in radians, counter-clockwise positive, with Y pointing up
/// (the animation-space convention; the pose constructor flips to screen
/// space).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    /// Parent bone, `None` for roots. Must refer to an earlier bone.
    pub parent: Option<BoneId>,
    pub pos: Vec2,
    pub rot: f32,
    pub scale: Vec2,
    /// Draw order key; lower draws first.
    pub zindex: i32,
    /// Index into the active style's texture list. `None` = never textured.
    pub tex_slot: Option<usize>,
    /// Mesh vertices; empty for simple (quad) bones.
    #[serde(default)]
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`.
    #[serde(default)]
    pub indices: Vec<u32>,
}

impl Bone {
    /// Whether this bone is drawn as a deformable mesh rather than a quad.
    pub fn is_mesh(&self) -> bool {
        !self.vertices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// The animated scalar channel a keyframe applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    PositionX,
    PositionY,
    Rotation,
    ScaleX,
    ScaleY,
}

/// One keyframe row: at `frame`, `bone`'s `element` equals `value`.
///
/// Clips store keyframes as flat rows (the asset format is column-oriented);
/// the sampler groups them per bone/element on the fly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub bone: BoneId,
    pub element: Element,
    pub value: f32,
}

/// A named clip: playback rate plus a sparse keyframe set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    /// Playback rate in frames per second.
    pub fps: u32,
    pub keyframes: Vec<Keyframe>,
}

impl Animation {
    /// Highest keyed frame, or 0 for an empty clip.
    pub fn last_frame(&self) -> u32 {
        self.keyframes.iter().map(|kf| kf.frame).max().unwrap_or(0)
    }

    /// Clip duration in seconds at the clip's own frame rate.
    pub fn duration_secs(&self) -> f32 {
        if self.fps == 0 {
            return 0.0;
        }
        self.last_frame() as f32 / self.fps as f32
    }
}

// ---------------------------------------------------------------------------
// IkFamily
// ---------------------------------------------------------------------------

/// Which way a kinematic chain is allowed to bend.
///
/// Two-joint chains have two mirror solutions for most targets; the
/// constraint picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BendDirection {
    Clockwise,
    CounterClockwise,
}

/// A named kinematic chain solved toward a target bone's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkFamily {
    pub name: String,
    /// Chain bones ordered root → effector.
    pub bones: Vec<BoneId>,
    /// The bone whose world position is the reach goal.
    pub target: BoneId,
    pub constraint: BendDirection,
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// An atlas region: page index plus a pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtlasTexture {
    /// Which atlas page the rectangle lives on.
    pub atlas: usize,
    /// Top-left corner in pixels.
    pub offset: Vec2,
    /// Rectangle size in pixels.
    pub size: Vec2,
}

/// A named skin: texture slots → atlas regions.
///
/// Swapping styles changes which region each bone samples without touching
/// the rig topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub textures: Vec<AtlasTexture>,
}

// ---------------------------------------------------------------------------
// Armature
// ---------------------------------------------------------------------------

/// The full rig: bones, clips, IK families, and styles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    pub bones: Vec<Bone>,
    pub animations: Vec<Animation>,
    pub ik_families: Vec<IkFamily>,
    pub styles: Vec<Style>,
}

impl Armature {
    /// Check structural invariants: bone ids unique, every parent reference
    /// points at an *earlier* bone (which makes the hierarchy a forest and
    /// lets the resolver run in one forward pass).
    pub fn validate(&self) -> Result<(), ArmatureError> {
        let mut seen = std::collections::HashSet::new();
        for (i, bone) in self.bones.iter().enumerate() {
            if !seen.insert(bone.id) {
                return Err(ArmatureError::DuplicateBoneId { id: bone.id });
            }
            if let Some(parent) = bone.parent {
                match self.bone_index(parent) {
                    None => {
                        return Err(ArmatureError::UnknownParent {
                            bone: bone.id,
                            parent,
                        })
                    }
                    Some(p) if p >= i => {
                        return Err(ArmatureError::ForwardParent {
                            bone: bone.id,
                            parent,
                        })
                    }
                    Some(_) => {}
                }
            }
            let vertex_count = bone.vertices.len();
            if let Some(&bad) = bone
                .indices
                .iter()
                .find(|&&idx| idx as usize >= vertex_count)
            {
                return Err(ArmatureError::TriangleIndexOutOfRange {
                    bone: bone.id,
                    index: bad,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Slice position of a bone id, if present.
    pub fn bone_index(&self, id: BoneId) -> Option<usize> {
        self.bones.iter().position(|b| b.id == id)
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn animation_by_name(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }

    pub fn style_by_name(&self, name: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
