//! Curve binding identity: which animatable property a curve drives.
//!
//! A binding is the (path, target kind, property name) triple the host rig
//! uses to route a curve's values. Bindings are plain data and unique per
//! clip; enumeration lives on `Clip` itself.

use serde::{Deserialize, Serialize};

/// Kind of animated target a binding addresses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    /// Node transform (translation/rotation/scale components).
    Transform,
    /// Mesh blend-shape weight.
    BlendShape,
    /// Freestanding float property (material parameter, component field).
    Float,
}

/// Identifies the animatable property a curve drives. Unique per clip.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CurveBinding {
    /// Slash-separated node path from the clip root (e.g. "root/spine/head").
    pub path: String,
    pub target: TargetKind,
    /// Property name on the target (e.g. "rotation.x", "translation.y").
    pub property: String,
}

impl CurveBinding {
    pub fn new(path: impl Into<String>, target: TargetKind, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target,
            property: property.into(),
        }
    }

    /// Shorthand for a transform-target binding.
    pub fn transform(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self::new(path, TargetKind::Transform, property)
    }

    /// Quaternion component index (x=0, y=1, z=2, w=3) when this binding
    /// drives one, used by the rotation-continuity pass.
    pub fn rotation_component(&self) -> Option<usize> {
        if self.target != TargetKind::Transform {
            return None;
        }
        match self.property.as_str() {
            "rotation.x" => Some(0),
            "rotation.y" => Some(1),
            "rotation.z" => Some(2),
            "rotation.w" => Some(3),
            _ => None,
        }
    }
}
