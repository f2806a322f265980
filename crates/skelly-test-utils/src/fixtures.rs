//! Armature builders.

use skelly_core::types::{
    Animation, Armature, AtlasTexture, BendDirection, Bone, BoneId, Element, IkFamily, Keyframe,
    MeshVertex, Style, Vec2, VertexWeight,
};

/// A plain quad bone with identity transform. Tests override what they need.
pub fn simple_bone(id: u32, parent: Option<u32>) -> Bone {
    Bone {
        id: BoneId(id),
        name: format!("bone{id}"),
        parent: parent.map(BoneId),
        pos: Vec2::zeros(),
        rot: 0.0,
        scale: Vec2::new(1.0, 1.0),
        zindex: 0,
        tex_slot: None,
        vertices: Vec::new(),
        indices: Vec::new(),
    }
}

/// A two-joint arm: root at the origin, elbow and hand one unit apart along
/// +X, plus a free-floating target bone. Comes with one IK family
/// ("arm", clockwise bend) targeting the free bone.
pub fn two_bone_chain(target_pos: Vec2) -> Armature {
    let mut elbow = simple_bone(1, Some(0));
    elbow.pos = Vec2::new(1.0, 0.0);
    let mut hand = simple_bone(2, Some(1));
    hand.pos = Vec2::new(1.0, 0.0);
    let mut target = simple_bone(3, None);
    target.name = "target".into();
    target.pos = target_pos;

    Armature {
        bones: vec![simple_bone(0, None), elbow, hand, target],
        animations: Vec::new(),
        ik_families: vec![IkFamily {
            name: "arm".into(),
            bones: vec![BoneId(0), BoneId(1), BoneId(2)],
            target: BoneId(3),
            constraint: BendDirection::Clockwise,
        }],
        styles: Vec::new(),
    }
}

/// The standard test character: three textured quad bones (torso, head,
/// cape with a distinct z-order), one mesh bone, a "wave" clip keying the
/// head, and two styles ("plain", "hat").
///
/// Layout (animation space, Y-up):
/// - torso: root at (0, 0), tex slot 0, zindex 0
/// - head: child of torso at (0, 2), tex slot 1, zindex 1
/// - cape: child of torso at (0, 1), tex slot 2, zindex -1 (draws behind)
/// - cloth: mesh child of torso, one triangle weighted torso/head
pub fn skellington() -> Armature {
    let mut torso = simple_bone(0, None);
    torso.name = "torso".into();
    torso.tex_slot = Some(0);

    let mut head = simple_bone(1, Some(0));
    head.name = "head".into();
    head.pos = Vec2::new(0.0, 2.0);
    head.tex_slot = Some(1);
    head.zindex = 1;

    let mut cape = simple_bone(2, Some(0));
    cape.name = "cape".into();
    cape.pos = Vec2::new(0.0, 1.0);
    cape.tex_slot = Some(2);
    cape.zindex = -1;

    let mut cloth = simple_bone(3, Some(0));
    cloth.name = "cloth".into();
    cloth.tex_slot = Some(3);
    cloth.vertices = vec![
        MeshVertex {
            pos: Vec2::new(0.0, 0.0),
            uv: Vec2::new(0.0, 0.0),
            weights: Vec::new(),
        },
        MeshVertex {
            pos: Vec2::new(1.0, 0.0),
            uv: Vec2::new(1.0, 0.0),
            weights: Vec::new(),
        },
        MeshVertex {
            pos: Vec2::new(0.0, 1.0),
            uv: Vec2::new(0.0, 1.0),
            weights: vec![
                VertexWeight {
                    bone: BoneId(0),
                    weight: 0.5,
                },
                VertexWeight {
                    bone: BoneId(1),
                    weight: 0.5,
                },
            ],
        },
    ];
    cloth.indices = vec![0, 1, 2];

    let wave = Animation {
        name: "wave".into(),
        fps: 30,
        keyframes: vec![
            Keyframe {
                frame: 0,
                bone: BoneId(1),
                element: Element::Rotation,
                value: 0.0,
            },
            Keyframe {
                frame: 10,
                bone: BoneId(1),
                element: Element::Rotation,
                value: 1.0,
            },
        ],
    };

    let tex = |x: f32| AtlasTexture {
        atlas: 0,
        offset: Vec2::new(x, 0.0),
        size: Vec2::new(16.0, 16.0),
    };
    let plain = Style {
        name: "plain".into(),
        textures: vec![tex(0.0), tex(16.0), tex(32.0), tex(48.0)],
    };
    let hat = Style {
        name: "hat".into(),
        textures: vec![tex(0.0), tex(64.0), tex(32.0), tex(48.0)],
    };

    Armature {
        bones: vec![torso, head, cape, cloth],
        animations: vec![wave],
        ik_families: Vec::new(),
        styles: vec![plain, hat],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
