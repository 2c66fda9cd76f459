//! Quaternion sign continuity across keyframes.
//!
//! A quaternion q and -q describe the same rotation, but interpolating
//! between keys on opposite covers takes the long way round and visibly
//! flips. After a bake or trim rewrites rotation component curves, this pass
//! restores a consistent sign: walking keys in order, any key whose 4D dot
//! against the previous kept key is negative is negated (value and both
//! tangents) on all four component curves at once.

use hashbrown::HashMap;

use crate::data::Clip;

/// Channel indices of one path's rotation.{x,y,z,w} curves.
type RotationGroup = [Option<usize>; 4];

/// Fix quaternion sign flips on all rotation channel groups of a clip.
///
/// Groups whose component curves are missing or whose key timelines do not
/// line up are left untouched (logged at warn level); the dot test needs one
/// full quaternion per key index.
pub fn ensure_quaternion_continuity(clip: &mut Clip) {
    let mut groups: HashMap<String, RotationGroup> = HashMap::new();
    for (idx, channel) in clip.channels.iter().enumerate() {
        if let Some(component) = channel.binding.rotation_component() {
            let group = groups
                .entry(channel.binding.path.clone())
                .or_insert([None; 4]);
            group[component] = Some(idx);
        }
    }

    for (path, group) in groups {
        let indices = match group {
            [Some(x), Some(y), Some(z), Some(w)] => [x, y, z, w],
            _ => {
                log::warn!("rotation group '{path}' is missing components, skipping continuity");
                continue;
            }
        };
        if !timelines_aligned(clip, &indices) {
            log::warn!("rotation group '{path}' has misaligned key times, skipping continuity");
            continue;
        }
        fix_group(clip, &indices);
    }
}

/// The four component curves must agree in key count and key times.
fn timelines_aligned(clip: &Clip, indices: &[usize; 4]) -> bool {
    let first = &clip.channels[indices[0]].curve.keys;
    indices[1..].iter().all(|&idx| {
        let keys = &clip.channels[idx].curve.keys;
        keys.len() == first.len()
            && keys
                .iter()
                .zip(first.iter())
                .all(|(a, b)| a.time == b.time)
    })
}

fn fix_group(clip: &mut Clip, indices: &[usize; 4]) {
    let n = clip.channels[indices[0]].curve.keys.len();
    for k in 1..n {
        let mut dot = 0.0f32;
        for &idx in indices {
            let keys = &clip.channels[idx].curve.keys;
            // keys[k - 1] already carries any negation from earlier steps.
            dot += keys[k - 1].value * keys[k].value;
        }
        if dot < 0.0 {
            for &idx in indices {
                let key = &mut clip.channels[idx].curve.keys[k];
                key.value = -key.value;
                key.in_tangent = -key.in_tangent;
                key.out_tangent = -key.out_tangent;
            }
        }
    }
}
