// skelly-core: Armature data model, errors, playback timing, stage config.

pub mod config;
pub mod error;
pub mod playback;
pub mod types;

pub mod prelude {
    pub use crate::config::StageConfig;
    pub use crate::error::{ArmatureError, ConfigError, SkellyError};
    pub use crate::playback::{bound_frame, frame_for_time};
    pub use crate::types::{
        Animation, Armature, AtlasTexture, BendDirection, Bone, BoneId, Element, IkFamily,
        Keyframe, MeshVertex, Style, Vec2, VertexWeight,
    };
}
