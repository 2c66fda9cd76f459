//! Time-warp baking: resample a clip through a speed curve.
//!
//! The warp is a forward Euler integration of d(remapped)/dt = speed(t) at
//! the baked frame step. The schedule of (step time, remapped source time)
//! pairs is computed once and applied to every channel, so all tracks stay
//! time-synchronized in the result.

use serde::{Deserialize, Serialize};

use crate::continuity::ensure_quaternion_continuity;
use crate::data::{Clip, Curve, Keyframe};
use crate::error::ClipError;
use crate::sampling::{auto_tangents, evaluate_curve};

/// Floor applied to evaluated speed samples. Zero or negative authored speed
/// is a hold, not a fault, and the warp must still advance.
pub const MIN_SPEED: f32 = 1e-4;

/// Baking parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Target frame rate (Hz) for the baked keyframes.
    pub frame_rate: f32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self { frame_rate: 30.0 }
    }
}

/// Compute the warp schedule: one (step time, remapped source time) pair per
/// baked frame, stepping t = 0, dt, 2dt, ... through the clip duration
/// inclusive. The accumulator advances before the pair is recorded, and
/// remapped times past the source end are left to clamp at evaluation.
/// A non-finite or non-positive `frame_rate` yields an empty schedule.
pub fn warp_schedule(speed_curve: &Curve, duration: f32, frame_rate: f32) -> Vec<(f32, f32)> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Vec::new();
    }
    let dt = 1.0 / frame_rate;
    let steps = (duration * frame_rate).floor() as usize;
    let mut schedule = Vec::with_capacity(steps + 1);
    let mut remapped = 0.0f32;
    for frame in 0..=steps {
        let t = frame as f32 * dt;
        let speed = evaluate_curve(speed_curve, t).max(MIN_SPEED);
        remapped += dt * speed;
        schedule.push((t, remapped));
    }
    schedule
}

/// Bake `source` through `speed_curve`, producing a new clip whose playback
/// at constant speed reproduces the variable-speed playback of the original.
///
/// Baked keys get smooth auto tangents, not the source's; rotation channel
/// groups are sign-fixed afterwards. The source is never mutated.
pub fn bake(source: &Clip, speed_curve: &Curve, cfg: &BakeConfig) -> Result<Clip, ClipError> {
    if source.is_empty() {
        log::error!("bake: source clip '{}' has no curve bindings", source.name);
        return Err(ClipError::invalid_input("source clip has no curve bindings"));
    }
    if speed_curve.is_empty() {
        log::error!("bake: missing speed curve");
        return Err(ClipError::invalid_input("speed curve has no keyframes"));
    }
    if !cfg.frame_rate.is_finite() || cfg.frame_rate <= 0.0 {
        log::error!("bake: frame rate must be finite and > 0, got {}", cfg.frame_rate);
        return Err(ClipError::invalid_input("frame rate must be finite and > 0"));
    }

    let duration = source.length();
    let schedule = warp_schedule(speed_curve, duration, cfg.frame_rate);

    let mut baked = Clip::new(source.name.clone(), cfg.frame_rate);
    for channel in &source.channels {
        let mut keys = Vec::with_capacity(schedule.len());
        for &(t, remapped) in &schedule {
            keys.push(Keyframe::new(t, evaluate_curve(&channel.curve, remapped)));
        }
        auto_tangents(&mut keys);
        baked.set_curve(channel.binding.clone(), Curve::new(keys));
    }
    ensure_quaternion_continuity(&mut baked);

    log::debug!(
        "baked '{}': {} channels, {} keys each at {} fps",
        baked.name,
        baked.channels.len(),
        schedule.len(),
        cfg.frame_rate
    );
    Ok(baked)
}
