//! Interval trimming: cut a clip to a closed sub-range re-based at zero.

use crate::continuity::ensure_quaternion_continuity;
use crate::data::{Clip, Curve};
use crate::error::ClipError;

/// Trim `source` to the closed interval [start, end], shifting surviving
/// keyframes to start at time zero.
///
/// Only actual source keys survive; no boundary key is synthesized where the
/// curve merely has an interpolated value. Values and tangents are copied
/// unchanged (a pure time shift leaves slopes intact). Channels left with no
/// keys are dropped, and rotation groups are sign-fixed afterwards.
pub fn trim(source: &Clip, start: f32, end: f32) -> Result<Clip, ClipError> {
    let length = source.length();
    if !(start >= 0.0 && start < end && end <= length) {
        log::error!(
            "trim: invalid range [{start}, {end}] for clip '{}' of length {length}",
            source.name
        );
        return Err(ClipError::InvalidRange { start, end, length });
    }

    let mut trimmed = Clip::new(source.name.clone(), source.frame_rate);
    for channel in &source.channels {
        let keys: Vec<_> = channel
            .curve
            .keys
            .iter()
            .filter(|k| k.time >= start && k.time <= end)
            .map(|k| {
                let mut key = *k;
                key.time -= start;
                key
            })
            .collect();
        if keys.is_empty() {
            continue;
        }
        trimmed.set_curve(channel.binding.clone(), Curve::new(keys));
    }
    ensure_quaternion_continuity(&mut trimmed);

    log::debug!(
        "trimmed '{}' to [{start}, {end}]: {} of {} channels kept",
        trimmed.name,
        trimmed.channels.len(),
        source.channels.len()
    );
    Ok(trimmed)
}
