//! Loader/writer errors.

use skelly_core::error::ArmatureError;
use thiserror::Error;

/// Everything that can go wrong reading or writing a `.skf` file.
///
/// Truncated files surface as [`SkfError::Io`] with
/// `std::io::ErrorKind::UnexpectedEof`.
#[derive(Debug, Error)]
pub enum SkfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a .skf file (magic {0:02x?})")]
    BadMagic([u8; 4]),

    #[error("unsupported .skf version {0}")]
    UnsupportedVersion(u16),

    #[error("invalid UTF-8 in string field")]
    BadString(#[from] std::string::FromUtf8Error),

    #[error("unknown keyframe element tag {0}")]
    BadElement(u8),

    #[error("unknown bend-direction tag {0}")]
    BadConstraint(u8),

    #[error("atlas page {page}: {source}")]
    Image {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    #[error("armature failed validation: {0}")]
    InvalidArmature(#[from] ArmatureError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = SkfError::BadMagic(*b"PNG\0");
        assert_eq!(err.to_string(), "not a .skf file (magic [50, 4e, 47, 00])");
        assert_eq!(
            SkfError::UnsupportedVersion(9).to_string(),
            "unsupported .skf version 9"
        );
        assert_eq!(
            SkfError::BadElement(7).to_string(),
            "unknown keyframe element tag 7"
        );
    }
}
