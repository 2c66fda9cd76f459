use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use clipforge_retime_core::{
    clip_to_stored_json, parse_stored_clip_json, BakeConfig, Clip, ClipSink, Curve, Pose,
    PreviewPlayer, PreviewRig, PreviewSettings,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Convert stored-clip JSON (serde_json form) into a plain JS object.
fn json_to_js(value: &serde_json::Value) -> Result<JsValue, JsError> {
    JSON::parse(&value.to_string())
        .map_err(|e| JsError::new(&format!("clip encode error: {:?}", e)))
}

/// Rig callbacks provided from JS. All three are optional; missing ones are
/// no-ops, so a host can start with just `on_pose`.
#[derive(Default)]
struct JsRig {
    on_attach: Option<Function>,
    on_pose: Option<Function>,
    on_teardown: Option<Function>,
}

impl PreviewRig for JsRig {
    fn attach(&mut self, clip: &Clip) {
        if let Some(f) = &self.on_attach {
            let arg = swb::to_value(clip).unwrap_or(JsValue::NULL);
            let _ = f.call1(&JsValue::UNDEFINED, &arg);
        }
    }

    fn apply_pose(&mut self, pose: &Pose) {
        if let Some(f) = &self.on_pose {
            let arg = swb::to_value(pose).unwrap_or(JsValue::NULL);
            let _ = f.call1(&JsValue::UNDEFINED, &arg);
        }
    }

    fn teardown(&mut self) {
        if let Some(f) = &self.on_teardown {
            let _ = f.call0(&JsValue::UNDEFINED);
        }
    }
}

/// Sink callback provided from JS: `(name: string, storedClip: object) -> void`.
/// A thrown exception counts as a refusal.
struct JsSink {
    f: Function,
}

impl ClipSink for JsSink {
    fn save(&mut self, name: &str, clip: &Clip) -> Result<(), String> {
        let json = JSON::parse(&clip_to_stored_json(clip).to_string())
            .map_err(|e| format!("clip encode error: {:?}", e))?;
        self.f
            .call2(&JsValue::UNDEFINED, &JsValue::from_str(name), &json)
            .map(|_| ())
            .map_err(|e| format!("sink threw: {:?}", e))
    }
}

#[wasm_bindgen]
pub struct ClipforgeRetime {
    core: PreviewPlayer,
    rig: JsRig,
}

#[wasm_bindgen]
impl ClipforgeRetime {
    /// Create a preview player. Pass a settings object or undefined/null for
    /// defaults.
    /// Example:
    ///   new ClipforgeRetime({ min_speed: 0.001, trim_gap: 0.01 })
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<ClipforgeRetime, JsError> {
        console_error_panic_hook::set_once();

        let cfg: PreviewSettings = if jsvalue_is_undefined_or_null(&settings) {
            PreviewSettings::default()
        } else {
            swb::from_value(settings).map_err(|e| JsError::new(&format!("settings error: {e}")))?
        };

        Ok(ClipforgeRetime {
            core: PreviewPlayer::with_settings(cfg),
            rig: JsRig::default(),
        })
    }

    /// Register rig callbacks. `on_attach(storedClip)` fires on clip load,
    /// `on_pose(pose)` on every applied pose, `on_teardown()` on unload.
    /// Each may be null/undefined.
    #[wasm_bindgen(js_name = set_rig)]
    pub fn set_rig(
        &mut self,
        on_attach: Option<Function>,
        on_pose: Option<Function>,
        on_teardown: Option<Function>,
    ) {
        self.rig = JsRig {
            on_attach,
            on_pose,
            on_teardown,
        };
    }

    /// Load a stored-clip JSON object (the same schema `bake`/`trim_to_range`
    /// return) for preview. Resets time and the trim range.
    #[wasm_bindgen(js_name = load_clip)]
    pub fn load_clip(&mut self, clip_json: JsValue) -> Result<(), JsError> {
        if jsvalue_is_undefined_or_null(&clip_json) {
            return Err(JsError::new("load_clip: clip_json is null/undefined"));
        }
        // Stringify the JS object so we can reuse the core parser (expects &str)
        let s = JSON::stringify(&clip_json)
            .map_err(|e| JsError::new(&format!("load_clip stringify error: {:?}", e)))?
            .as_string()
            .ok_or_else(|| JsError::new("load_clip: stringify produced non-string"))?;
        let clip = parse_stored_clip_json(&s)
            .map_err(|e| JsError::new(&format!("load_clip parse error: {e}")))?;
        self.core
            .load_clip(clip, &mut self.rig)
            .map_err(|e| JsError::new(&format!("load_clip error: {e}")))
    }

    /// End the preview: tear down the rig and drop the loaded clip.
    #[wasm_bindgen]
    pub fn unload(&mut self) {
        self.core.unload(&mut self.rig);
    }

    /// Replace the speed curve used by `tick` and `bake`. Takes the direct
    /// curve shape `{ keys: [{ time, value, in_tangent?, out_tangent? }] }`;
    /// JS `Infinity` is accepted for step tangents here.
    #[wasm_bindgen(js_name = set_speed_curve)]
    pub fn set_speed_curve(&mut self, curve_json: JsValue) -> Result<(), JsError> {
        let curve: Curve = swb::from_value(curve_json)
            .map_err(|e| JsError::new(&format!("speed curve error: {e}")))?;
        self.core.set_speed_curve(curve);
        Ok(())
    }

    /// Start full-clip playback from the current time.
    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.core.play();
    }

    /// Start trim-range playback, pulling the current time into the range.
    #[wasm_bindgen(js_name = play_trim)]
    pub fn play_trim(&mut self) {
        self.core.play_trim();
    }

    /// Halt playback, keeping the current time.
    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.core.pause();
    }

    /// Halt playback, rewind to zero and apply the rest pose.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.core.stop(&mut self.rig);
    }

    /// Jump to a time (clamped to the clip) and apply that pose.
    #[wasm_bindgen]
    pub fn scrub(&mut self, time: f32) {
        self.core.scrub(time, &mut self.rig);
    }

    /// Move the trim handles. Handles keep their minimum separation and stay
    /// inside the clip.
    #[wasm_bindgen(js_name = set_trim_range)]
    pub fn set_trim_range(&mut self, start: f32, end: f32) {
        self.core.set_trim_range(start, end);
    }

    /// Advance playback by dt (seconds). Applies the resulting pose through
    /// the rig's `on_pose`.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt: f32) {
        self.core.tick(dt, &mut self.rig);
    }

    /// Current playback time in seconds.
    #[wasm_bindgen]
    pub fn time(&self) -> f32 {
        self.core.time()
    }

    /// Transport mode: "stopped" | "playing" | "trimPlaying".
    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        self.core.mode().name().to_string()
    }

    /// Current trim range as [start, end].
    #[wasm_bindgen(js_name = trim_range)]
    pub fn trim_range(&self) -> Vec<f32> {
        let (start, end) = self.core.trim_range();
        vec![start, end]
    }

    /// Length of the loaded clip in seconds, or undefined without one.
    #[wasm_bindgen(js_name = clip_length)]
    pub fn clip_length(&self) -> Option<f32> {
        self.core.clip().map(|c| c.length())
    }

    /// The loaded clip as a stored-clip JSON object, or null without one.
    #[wasm_bindgen(js_name = clip_json)]
    pub fn clip_json(&self) -> Result<JsValue, JsError> {
        match self.core.clip() {
            Some(clip) => json_to_js(&clip_to_stored_json(clip)),
            None => Ok(JsValue::NULL),
        }
    }

    /// Evaluate every channel at a time without moving the playhead. Returns
    /// `{ time, samples: [{ binding, value }] }`.
    #[wasm_bindgen(js_name = sample_pose)]
    pub fn sample_pose(&self, time: f32) -> Result<JsValue, JsError> {
        let pose = self.core.sample_pose(time);
        swb::to_value(&pose).map_err(|e| JsError::new(&format!("pose encode error: {e}")))
    }

    /// Bake the loaded clip through the current speed curve. `cfg` is optional
    /// JSON matching BakeConfig (`{ frame_rate }`). Returns a stored-clip JSON
    /// object.
    #[wasm_bindgen]
    pub fn bake(&self, cfg: JsValue) -> Result<JsValue, JsError> {
        let cfg_rs: BakeConfig = if jsvalue_is_undefined_or_null(&cfg) {
            BakeConfig::default()
        } else {
            swb::from_value(cfg).map_err(|e| JsError::new(&format!("bake cfg error: {e}")))?
        };
        let baked = self
            .core
            .bake_with_speed(&cfg_rs)
            .map_err(|e| JsError::new(&format!("bake error: {e}")))?;
        json_to_js(&clip_to_stored_json(&baked))
    }

    /// Trim the loaded clip to the current trim range. Returns a stored-clip
    /// JSON object.
    #[wasm_bindgen(js_name = trim_to_range)]
    pub fn trim_to_range(&self) -> Result<JsValue, JsError> {
        let trimmed = self
            .core
            .trim_to_range()
            .map_err(|e| JsError::new(&format!("trim error: {e}")))?;
        json_to_js(&clip_to_stored_json(&trimmed))
    }

    /// Persist the loaded clip through a JS sink callback
    /// `(name: string, storedClip: object) -> void`.
    #[wasm_bindgen]
    pub fn save(&self, name: String, sink: Function) -> Result<(), JsError> {
        let clip = self
            .core
            .clip()
            .ok_or_else(|| JsError::new("save: no clip loaded"))?;
        let mut js_sink = JsSink { f: sink };
        clipforge_retime_core::save_clip(&mut js_sink, &name, clip)
            .map_err(|e| JsError::new(&format!("save error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
