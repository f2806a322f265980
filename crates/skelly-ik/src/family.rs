//! IK family validation.

use skelly_core::types::{Bone, BoneId, IkFamily};
use thiserror::Error;

/// Why an IK family cannot be solved against a given bone set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamilyError {
    #[error("IK family '{family}' needs at least two chain bones, has {count}")]
    ChainTooShort { family: String, count: usize },

    #[error("IK family '{family}' references unknown chain bone {bone}")]
    UnknownChainBone { family: String, bone: BoneId },

    #[error("IK family '{family}' references unknown target bone {target}")]
    UnknownTarget { family: String, target: BoneId },
}

/// Check that a family's chain and target all resolve to real bones.
///
/// A chain needs at least a root joint and an effector to be solvable. The
/// pipeline treats a failing family as data to skip, not a hard error, so
/// this returns the reason rather than panicking.
pub fn validate_family(family: &IkFamily, bones: &[Bone]) -> Result<(), FamilyError> {
    if family.bones.len() < 2 {
        return Err(FamilyError::ChainTooShort {
            family: family.name.clone(),
            count: family.bones.len(),
        });
    }
    for &id in &family.bones {
        if !bones.iter().any(|b| b.id == id) {
            return Err(FamilyError::UnknownChainBone {
                family: family.name.clone(),
                bone: id,
            });
        }
    }
    if !bones.iter().any(|b| b.id == family.target) {
        return Err(FamilyError::UnknownTarget {
            family: family.name.clone(),
            target: family.target,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skelly_core::types::{BendDirection, Vec2};

    fn bone(id: u32) -> Bone {
        Bone {
            id: BoneId(id),
            name: format!("bone{id}"),
            parent: None,
            pos: Vec2::zeros(),
            rot: 0.0,
            scale: Vec2::new(1.0, 1.0),
            zindex: 0,
            tex_slot: None,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn family(chain: &[u32], target: u32) -> IkFamily {
        IkFamily {
            name: "arm".into(),
            bones: chain.iter().map(|&i| BoneId(i)).collect(),
            target: BoneId(target),
            constraint: BendDirection::Clockwise,
        }
    }

    #[test]
    fn valid_family_passes() {
        let bones = vec![bone(0), bone(1), bone(2)];
        assert!(validate_family(&family(&[0, 1], 2), &bones).is_ok());
    }

    #[test]
    fn single_bone_chain_rejected() {
        let bones = vec![bone(0), bone(2)];
        let err = validate_family(&family(&[0], 2), &bones).unwrap_err();
        assert!(matches!(err, FamilyError::ChainTooShort { count: 1, .. }));
    }

    #[test]
    fn unknown_chain_bone_rejected() {
        let bones = vec![bone(0), bone(2)];
        let err = validate_family(&family(&[0, 7], 2), &bones).unwrap_err();
        assert!(matches!(
            err,
            FamilyError::UnknownChainBone {
                bone: BoneId(7),
                ..
            }
        ));
    }

    #[test]
    fn unknown_target_rejected() {
        let bones = vec![bone(0), bone(1)];
        let err = validate_family(&family(&[0, 1], 9), &bones).unwrap_err();
        assert!(matches!(
            err,
            FamilyError::UnknownTarget {
                target: BoneId(9),
                ..
            }
        ));
    }

    #[test]
    fn error_messages() {
        let err = FamilyError::ChainTooShort {
            family: "leg".into(),
            count: 0,
        };
        assert_eq!(
            err.to_string(),
            "IK family 'leg' needs at least two chain bones, has 0"
        );
        let err = FamilyError::UnknownTarget {
            family: "leg".into(),
            target: BoneId(3),
        };
        assert_eq!(
            err.to_string(),
            "IK family 'leg' references unknown target bone #3"
        );
    }
}
