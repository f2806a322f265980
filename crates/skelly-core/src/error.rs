use thiserror::Error;

use crate::types::BoneId;

/// Top-level error type for skelly-core.
#[derive(Debug, Error)]
pub enum SkellyError {
    #[error("Armature error: {0}")]
    Armature(#[from] ArmatureError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Structural problems in an armature's template data.
///
/// These indicate a broken asset, not a recoverable runtime condition; they
/// surface once, at load/validate time.
#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error("duplicate bone id {id}")]
    DuplicateBoneId { id: BoneId },

    #[error("bone {bone} references unknown parent {parent}")]
    UnknownParent { bone: BoneId, parent: BoneId },

    #[error("bone {bone} references parent {parent} that is not defined earlier")]
    ForwardParent { bone: BoneId, parent: BoneId },

    #[error("bone {bone}: triangle index {index} out of range ({vertex_count} vertices)")]
    TriangleIndexOutOfRange {
        bone: BoneId,
        index: u32,
        vertex_count: usize,
    },
}

/// Stage configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
