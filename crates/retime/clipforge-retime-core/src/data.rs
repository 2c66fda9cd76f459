//! Canonical clip data model.
//!
//! A `Clip` bundles per-property scalar curves keyed by `CurveBinding`, plus
//! the frame rate it was authored or baked at. Length is derived, not stored:
//! it is the latest keyframe time across all channels.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::binding::CurveBinding;

/// A single keyframe sample on a scalar curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds from the start of the clip.
    pub time: f32,
    pub value: f32,
    /// Incoming slope in value units per second. Infinite marks a step.
    #[serde(default)]
    pub in_tangent: f32,
    /// Outgoing slope in value units per second. Infinite marks a step.
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    /// Keyframe with flat (zero) tangents.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// An ordered run of keyframes, times strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(keys: Vec<Keyframe>) -> Self {
        Self { keys }
    }

    /// Straight segment from (t0, v0) to (t1, v1) with matching secant
    /// tangents on both keys.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let slope = if (t1 - t0).abs() > f32::EPSILON {
            (v1 - v0) / (t1 - t0)
        } else {
            0.0
        };
        Self {
            keys: vec![
                Keyframe::with_tangents(t0, v0, slope, slope),
                Keyframe::with_tangents(t1, v1, slope, slope),
            ],
        }
    }

    /// Constant value over [t0, t1].
    pub fn constant(t0: f32, t1: f32, value: f32) -> Self {
        Self::linear(t0, value, t1, value)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Time of the last keyframe, or 0.0 for an empty curve.
    pub fn end_time(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }
}

/// One bound curve inside a clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub binding: CurveBinding,
    pub curve: Curve,
}

/// A named bundle of bound curves with a sampling frame rate.
///
/// Channels keep their insertion order so repeated transforms over the same
/// source produce identical output, channel for channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Frames per second the clip was authored or baked at.
    pub frame_rate: f32,
    pub channels: Vec<Channel>,
}

impl Clip {
    pub fn new(name: impl Into<String>, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            frame_rate,
            channels: Vec::new(),
        }
    }

    /// Clip length in seconds: the latest keyframe time across all channels.
    pub fn length(&self) -> f32 {
        self.channels
            .iter()
            .map(|c| c.curve.end_time())
            .fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Read access to the curve bound to `binding`, if present.
    pub fn curve(&self, binding: &CurveBinding) -> Option<&Curve> {
        self.channels
            .iter()
            .find(|c| &c.binding == binding)
            .map(|c| &c.curve)
    }

    /// Insert or replace the curve for a binding.
    pub fn set_curve(&mut self, binding: CurveBinding, curve: Curve) {
        if let Some(existing) = self.channels.iter_mut().find(|c| c.binding == binding) {
            existing.curve = curve;
        } else {
            self.channels.push(Channel { binding, curve });
        }
    }

    /// Validate basic invariants: positive finite frame rate, unique bindings,
    /// strictly increasing key times, finite times/values, no NaN tangents.
    pub fn validate_basic(&self) -> Result<(), String> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(format!(
                "Clip.frame_rate must be finite and > 0, got {}",
                self.frame_rate
            ));
        }
        let mut seen: HashSet<&CurveBinding> = HashSet::with_capacity(self.channels.len());
        for channel in &self.channels {
            if !seen.insert(&channel.binding) {
                return Err(format!(
                    "Duplicate binding '{}' / '{}'",
                    channel.binding.path, channel.binding.property
                ));
            }
            let mut last = f32::NEG_INFINITY;
            for key in &channel.curve.keys {
                if !key.time.is_finite() || !key.value.is_finite() {
                    return Err(format!(
                        "Keyframe time/value must be finite for '{}' / '{}'",
                        channel.binding.path, channel.binding.property
                    ));
                }
                if key.time <= last {
                    return Err(format!(
                        "Keyframe times must be strictly increasing for '{}' / '{}'",
                        channel.binding.path, channel.binding.property
                    ));
                }
                if key.in_tangent.is_nan() || key.out_tangent.is_nan() {
                    return Err(format!(
                        "Keyframe tangents must not be NaN for '{}' / '{}'",
                        channel.binding.path, channel.binding.property
                    ));
                }
                last = key.time;
            }
        }
        Ok(())
    }
}
