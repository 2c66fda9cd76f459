//! Stored clip JSON schema.
//!
//! Public API: parse_stored_clip_json / clip_to_stored_json over the
//! canonical interchange format:
//!
//! ```json
//! {
//!   "name": "walk",
//!   "frameRate": 30,
//!   "channels": [
//!     { "path": "root/hips", "target": "transform", "property": "rotation.x",
//!       "keys": [ { "time": 0.0, "value": 0.0,
//!                   "inTangent": 0.0, "outTangent": "Infinity" } ] }
//!   ]
//! }
//! ```
//!
//! Notes:
//! - Missing tangents default to 0.0.
//! - The strings "Infinity" / "-Infinity" encode step tangents, which JSON
//!   numbers cannot carry.
//! - Parsed clips are validated (strictly increasing key times, finite
//!   values, positive frame rate) before they are returned.

use serde::Deserialize;
use serde_json::json;

use crate::binding::{CurveBinding, TargetKind};
use crate::data::{Clip, Curve, Keyframe};
use crate::error::ClipError;

/// Parse stored-clip JSON into a validated `Clip`.
pub fn parse_stored_clip_json(s: &str) -> Result<Clip, ClipError> {
    let sc: StoredClip = serde_json::from_str(s)?;

    let mut clip = Clip::new(sc.name, sc.frame_rate as f32);
    for sch in sc.channels {
        let mut keys = Vec::with_capacity(sch.keys.len());
        for sk in sch.keys {
            keys.push(Keyframe::with_tangents(
                sk.time as f32,
                sk.value as f32,
                tangent_from_raw(sk.in_tangent).map_err(malformed)?,
                tangent_from_raw(sk.out_tangent).map_err(malformed)?,
            ));
        }
        clip.set_curve(
            CurveBinding::new(sch.path, sch.target, sch.property),
            Curve::new(keys),
        );
    }
    clip.validate_basic().map_err(malformed)?;
    Ok(clip)
}

/// Emit a clip in the stored schema.
pub fn clip_to_stored_json(clip: &Clip) -> serde_json::Value {
    let channels: Vec<serde_json::Value> = clip
        .channels
        .iter()
        .map(|channel| {
            let keys: Vec<serde_json::Value> = channel
                .curve
                .keys
                .iter()
                .map(|k| {
                    json!({
                        "time": k.time,
                        "value": k.value,
                        "inTangent": tangent_to_json(k.in_tangent),
                        "outTangent": tangent_to_json(k.out_tangent),
                    })
                })
                .collect();
            json!({
                "path": channel.binding.path,
                "target": channel.binding.target,
                "property": channel.binding.property,
                "keys": keys,
            })
        })
        .collect();
    json!({
        "name": clip.name,
        "frameRate": clip.frame_rate,
        "channels": channels,
    })
}

fn malformed(reason: String) -> ClipError {
    ClipError::MalformedClip { reason }
}

fn tangent_from_raw(raw: Option<RawTangent>) -> Result<f32, String> {
    match raw {
        None => Ok(0.0),
        Some(RawTangent::Number(n)) => Ok(n as f32),
        Some(RawTangent::Text(s)) => match s.as_str() {
            "Infinity" => Ok(f32::INFINITY),
            "-Infinity" => Ok(f32::NEG_INFINITY),
            _ => Err(format!("unrecognized tangent '{s}'")),
        },
    }
}

fn tangent_to_json(t: f32) -> serde_json::Value {
    if t == f32::INFINITY {
        json!("Infinity")
    } else if t == f32::NEG_INFINITY {
        json!("-Infinity")
    } else {
        json!(t)
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredClip {
    pub name: String,
    #[serde(rename = "frameRate")]
    pub frame_rate: f64,
    pub channels: Vec<ScChannel>,
}

#[derive(Debug, Deserialize)]
struct ScChannel {
    pub path: String,
    pub target: TargetKind,
    pub property: String,
    pub keys: Vec<ScKey>,
}

#[derive(Debug, Deserialize)]
struct ScKey {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    #[serde(rename = "inTangent")]
    pub in_tangent: Option<RawTangent>,
    #[serde(default)]
    #[serde(rename = "outTangent")]
    pub out_tangent: Option<RawTangent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTangent {
    Number(f64),
    Text(String),
}
