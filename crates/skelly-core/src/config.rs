//! Stage configuration: how a host presents one armature.
//!
//! Loaded from TOML by host applications; the per-frame pipeline itself
//! never reads configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_scale() -> [f32; 2] {
    [1.0, 1.0]
}
const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// StageConfig
// ---------------------------------------------------------------------------

/// Presentation settings for one animated character instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Path to the `.skf` asset.
    pub armature: PathBuf,

    /// Render scale per axis. A negative axis mirrors the character.
    #[serde(default = "default_scale")]
    pub scale: [f32; 2],

    /// Render-space position offset in pixels.
    #[serde(default)]
    pub position: [f32; 2],

    /// Style (skin) to draw with; `None` = the armature's first style.
    #[serde(default)]
    pub style: Option<String>,

    /// Animation to play; `None` = the armature's first clip.
    #[serde(default)]
    pub animation: Option<String>,

    /// Wrap at the end of the clip instead of clamping.
    #[serde(default = "default_true")]
    pub looped: bool,

    /// Play the clip backwards.
    #[serde(default)]
    pub reverse: bool,

    /// Crossfade length in frames when switching clips. 0 disables blending.
    #[serde(default)]
    pub blend_frames: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            armature: PathBuf::new(),
            scale: default_scale(),
            position: [0.0, 0.0],
            style: None,
            animation: None,
            looped: true,
            reverse: false,
            blend_frames: 0,
        }
    }
}

impl StageConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.armature.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "armature".into(),
                message: "path must not be empty".into(),
            });
        }
        if self.scale.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "scale".into(),
                message: "axes must be finite".into(),
            });
        }
        if self.position.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "position".into(),
                message: "components must be finite".into(),
            });
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = StageConfig::default();
        assert_eq!(cfg.scale, [1.0, 1.0]);
        assert_eq!(cfg.position, [0.0, 0.0]);
        assert!(cfg.style.is_none());
        assert!(cfg.animation.is_none());
        assert!(cfg.looped);
        assert!(!cfg.reverse);
        assert_eq!(cfg.blend_frames, 0);
    }

    #[test]
    fn toml_deserialization() {
        let toml_str = r#"
            armature = "assets/skellington.skf"
            scale = [-0.125, 0.125]
            position = [640.0, 410.0]
            style = "hat"
            animation = "walk"
            looped = true
            blend_frames = 20
        "#;
        let cfg: StageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.armature, PathBuf::from("assets/skellington.skf"));
        assert!((cfg.scale[0] - (-0.125)).abs() < f32::EPSILON);
        assert!((cfg.position[0] - 640.0).abs() < f32::EPSILON);
        assert_eq!(cfg.style.as_deref(), Some("hat"));
        assert_eq!(cfg.animation.as_deref(), Some("walk"));
        assert_eq!(cfg.blend_frames, 20);
    }

    #[test]
    fn toml_defaults_applied() {
        let cfg: StageConfig = toml::from_str(r#"armature = "a.skf""#).unwrap();
        assert_eq!(cfg.scale, [1.0, 1.0]);
        assert!(cfg.looped);
        assert!(!cfg.reverse);
    }

    #[test]
    fn validate_ok() {
        let cfg: StageConfig = toml::from_str(r#"armature = "a.skf""#).unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_empty_armature_path() {
        let cfg = StageConfig::default();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "armature"));
    }

    #[test]
    fn validate_non_finite_scale() {
        let cfg = StageConfig {
            armature: PathBuf::from("a.skf"),
            scale: [f32::NAN, 1.0],
            ..StageConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "scale"));
    }

    #[test]
    fn validate_non_finite_position() {
        let cfg = StageConfig {
            armature: PathBuf::from("a.skf"),
            position: [0.0, f32::INFINITY],
            ..StageConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "position"));
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = std::env::temp_dir().join("skelly_test_stage_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stage.toml");
        std::fs::write(
            &path,
            r#"
            armature = "skellina.skf"
            scale = [0.125, 0.125]
            blend_frames = 20
        "#,
        )
        .unwrap();

        let cfg = StageConfig::from_file(&path).unwrap();
        assert_eq!(cfg.armature, PathBuf::from("skellina.skf"));
        assert_eq!(cfg.blend_frames, 20);

        // Cleanup
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn from_file_not_found() {
        let result = StageConfig::from_file("/nonexistent/stage.toml");
        assert!(result.is_err());
    }
}
