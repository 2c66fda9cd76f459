//! Curve evaluation.
//!
//! Model:
//! - A `Curve` holds ordered keyframes with per-key incoming/outgoing slopes.
//! - Each segment [Ki -> K(i+1)] interpolates with a cubic Hermite driven by
//!   Ki.out_tangent and K(i+1).in_tangent (slopes in value units per second).
//! - An infinite tangent on either side makes the segment a step that holds
//!   the left value until the right key.
//! - Evaluation outside the key range clamps to the end values.
//!
//! API:
//! - evaluate_curve(&Curve, t) with t in clip seconds.
//! - auto_tangents(&mut [Keyframe]) assigns smooth tangents to a baked run.

use crate::data::{Curve, Keyframe};

/// Find the segment [i, i+1] that contains time t.
/// Callers have already handled t at or outside the end keys, so t is
/// strictly inside (keys[0].time, keys[last].time).
fn find_segment(keys: &[Keyframe], t: f32) -> (usize, usize) {
    // Linear scan (could be optimized to binary search if needed)
    for i in 0..(keys.len() - 1) {
        if t >= keys[i].time && t < keys[i + 1].time {
            return (i, i + 1);
        }
    }
    (keys.len() - 2, keys.len() - 1)
}

fn hermite(k0: &Keyframe, k1: &Keyframe, t: f32) -> f32 {
    if !k0.out_tangent.is_finite() || !k1.in_tangent.is_finite() {
        // Step segment: hold the left value.
        return k0.value;
    }
    let d = k1.time - k0.time;
    let s = (t - k0.time) / d;
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    h00 * k0.value + h10 * d * k0.out_tangent + h01 * k1.value + h11 * d * k1.in_tangent
}

/// Evaluate a curve at an arbitrary time (seconds).
///
/// Edge cases:
/// - Empty curve returns a neutral 0.0 (fail-soft; transforms drop empty
///   curves before persisting).
/// - Single-key curve is constant.
/// - Before the first key returns the first value; past the last key returns
///   the last value.
pub fn evaluate_curve(curve: &Curve, t: f32) -> f32 {
    let keys = &curve.keys;
    match keys.len() {
        0 => 0.0,
        1 => keys[0].value,
        n => {
            if t <= keys[0].time {
                return keys[0].value;
            }
            if t >= keys[n - 1].time {
                return keys[n - 1].value;
            }
            let (i0, i1) = find_segment(keys, t);
            hermite(&keys[i0], &keys[i1], t)
        }
    }
}

fn secant(a: &Keyframe, b: &Keyframe) -> f32 {
    let dt = b.time - a.time;
    if dt > f32::EPSILON {
        (b.value - a.value) / dt
    } else {
        0.0
    }
}

/// Assign smooth tangents to an ordered keyframe run: interior keys get the
/// slope of the secant through their neighbours, end keys the one-sided
/// secant. Used for freshly baked keys, which carry no authored tangents.
pub fn auto_tangents(keys: &mut [Keyframe]) {
    let n = keys.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let slope = if i == 0 {
            secant(&keys[0], &keys[1])
        } else if i == n - 1 {
            secant(&keys[n - 2], &keys[n - 1])
        } else {
            secant(&keys[i - 1], &keys[i + 1])
        };
        keys[i].in_tangent = slope;
        keys[i].out_tangent = slope;
    }
}
