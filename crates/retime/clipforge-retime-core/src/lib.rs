//! ClipForge Retime Core (engine-agnostic)
//!
//! Keyframe-curve re-timing for clips: bake a clip through an authored speed
//! curve (time-warp resampling), trim it to a sub-interval re-based at zero,
//! and preview the result through host-owned seams. The crate defines the
//! clip data model, curve evaluation, the two transforms with their shared
//! rotation-continuity pass, a preview transport, and the stored JSON
//! interchange schema. Persistence and actor posing stay on the host side of
//! the `ClipSink` / `PreviewRig` traits.

pub mod baking;
pub mod binding;
pub mod continuity;
pub mod data;
pub mod error;
pub mod persist;
pub mod preview;
pub mod sampling;
pub mod stored_clip;
pub mod trimming;

// Re-exports for consumers (adapters)
pub use baking::{bake, warp_schedule, BakeConfig, MIN_SPEED};
pub use binding::{CurveBinding, TargetKind};
pub use continuity::ensure_quaternion_continuity;
pub use data::{Channel, Clip, Curve, Keyframe};
pub use error::ClipError;
pub use persist::{save_clip, ClipSink};
pub use preview::{PlayMode, Pose, PoseSample, PreviewPlayer, PreviewRig, PreviewSettings};
pub use sampling::{auto_tangents, evaluate_curve};
pub use stored_clip::{clip_to_stored_json, parse_stored_clip_json};
pub use trimming::trim;
