//! Draw-primitive types and emission.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use skelly_core::types::{Armature, Style, Vec2};
use skelly_pose::RenderBone;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// A textured rectangle.
///
/// `position` is the destination of the texture's top-left corner, already
/// pivot-corrected so the quad's center lands on the bone. `rotation` is in
/// screen convention: clockwise-positive radians, applied around the
/// top-left corner. Drawn at full opacity, untinted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    /// Atlas page index.
    pub atlas: usize,
    /// Source rectangle top-left within the atlas, pixels.
    pub src_offset: Vec2,
    /// Source rectangle size, pixels.
    pub src_size: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub position: Vec2,
}

impl Quad {
    /// The quad's destination transform as a 2D affine matrix
    /// (scale, then rotate, then translate) in homogeneous form.
    pub fn to_affine(&self) -> Matrix3<f32> {
        let (sin, cos) = self.rotation.sin_cos();
        Matrix3::new(
            cos * self.scale.x,
            -sin * self.scale.y,
            self.position.x,
            sin * self.scale.x,
            cos * self.scale.y,
            self.position.y,
            0.0,
            0.0,
            1.0,
        )
    }
}

/// One mesh vertex ready to draw: screen position plus pixel-space UV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub pos: Vec2,
    /// Texture coordinate in atlas pixels (offset already applied).
    pub uv: Vec2,
}

/// A deformed triangle mesh. Drawn at full opacity, untinted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Atlas page index.
    pub atlas: usize,
    pub vertices: Vec<MeshPoint>,
    pub indices: Vec<u32>,
}

/// One draw command. The emitted list is already in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Quad(Quad),
    Mesh(Mesh),
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Emit draw primitives for a constructed pose.
///
/// Bones draw in ascending `zindex`; the sort is stable, so equal z keeps
/// armature declaration order. A bone contributes nothing when it has no
/// texture slot, or when no active style binds its slot (logged at debug,
/// the rest of the frame is unaffected).
///
/// `styles` are the active styles in priority order; the first one whose
/// texture list covers a bone's slot wins.
///
/// `render` must parallel `armature.bones`, as produced by
/// [`skelly_pose::construct`].
pub fn compose(armature: &Armature, render: &[RenderBone], styles: &[&Style]) -> Vec<Primitive> {
    let mut order: Vec<usize> = (0..armature.bones.len()).collect();
    order.sort_by_key(|&i| armature.bones[i].zindex);

    let mut out = Vec::with_capacity(order.len());
    for i in order {
        let bone = &armature.bones[i];
        let Some(slot) = bone.tex_slot else {
            continue;
        };
        let Some(tex) = styles.iter().find_map(|s| s.textures.get(slot)) else {
            log::debug!(
                "no active style binds texture slot {slot}, skipping bone '{}'",
                bone.name
            );
            continue;
        };
        let rb = &render[i];

        if bone.is_mesh() {
            let vertices = bone
                .vertices
                .iter()
                .zip(&rb.vertices)
                .map(|(mv, &pos)| MeshPoint {
                    pos,
                    uv: tex.offset + mv.uv.component_mul(&tex.size),
                })
                .collect();
            out.push(Primitive::Mesh(Mesh {
                atlas: tex.atlas,
                vertices,
                indices: bone.indices.clone(),
            }));
        } else {
            // Pose rotation is CCW-positive with Y up; screen is CW-positive
            // with Y down. The pivot correction pulls the top-left corner
            // back by the rotated, scaled half-size so the texture centers
            // on the bone; its trig runs on the pose-space angle.
            let (sin, cos) = rb.rot.sin_cos();
            let sx = tex.size.x / 2.0 * rb.scale.x;
            let sy = tex.size.y / 2.0 * rb.scale.y;
            let position = Vec2::new(
                rb.pos.x - (sx * cos + sy * sin),
                rb.pos.y + (sx * sin - sy * cos),
            );
            out.push(Primitive::Quad(Quad {
                atlas: tex.atlas,
                src_offset: tex.offset,
                src_size: tex.size,
                scale: rb.scale,
                rotation: -rb.rot,
                position,
            }));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
