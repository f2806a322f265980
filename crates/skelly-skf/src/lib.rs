//! `.skf` asset I/O.
//!
//! A `.skf` file is a little-endian binary container holding one armature
//! (bones with optional mesh data, animation clips as flat keyframe rows,
//! IK families, styles) followed by PNG-encoded atlas pages. [`load`] hands
//! back the validated armature plus decoded RGBA pages; [`save`] writes the
//! same container so assets can be produced programmatically.

pub mod codec;
pub mod error;

pub use codec::{load, read, save, write};
pub use error::SkfError;
