//! Interactive preview transport.
//!
//! `PreviewPlayer` owns the scrub/play/trim-play state for one clip and
//! drives a host-owned `PreviewRig` with evaluated poses. The host scheduler
//! calls `tick(dt, rig)`; the player advances time through the speed curve,
//! wraps per transport mode, and hands the rig a `Pose` to apply. The rig is
//! the scratch-resource seam: `attach` when a clip is (re)loaded, `teardown`
//! when the preview ends.
//!
//! The transforms in `baking`/`trimming` never depend on this module; the
//! player only calls into them as a convenience for hosts.

use serde::{Deserialize, Serialize};

use crate::baking::{bake, BakeConfig};
use crate::binding::CurveBinding;
use crate::data::{Clip, Curve};
use crate::error::ClipError;
use crate::sampling::evaluate_curve;
use crate::trimming::trim;

/// Transport mode of a preview player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayMode {
    /// Not advancing; time holds where it is.
    #[default]
    Stopped,
    /// Playing the whole clip, wrapping at the end.
    Playing,
    /// Playing the trim range, wrapping at its end.
    TrimPlaying,
}

impl PlayMode {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::TrimPlaying => "trimPlaying",
        }
    }

    /// Check if the transport is advancing time.
    #[inline]
    pub fn is_playing(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Tunables for the preview transport.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Floor applied to the evaluated speed so playback always advances.
    pub min_speed: f32,
    /// Minimum separation kept between the trim handles (seconds).
    pub trim_gap: f32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            min_speed: 1e-3,
            trim_gap: 0.01,
        }
    }
}

/// One evaluated channel value at a pose time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub binding: CurveBinding,
    pub value: f32,
}

/// All channel values of a clip evaluated at one time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub time: f32,
    pub samples: Vec<PoseSample>,
}

/// Host seam for the preview actor and its scratch resources.
///
/// `attach` is called whenever a clip is loaded (including replacing an
/// earlier one); `teardown` releases whatever `attach` created. Hosts report
/// their own failures; the player keeps going either way.
pub trait PreviewRig {
    fn attach(&mut self, clip: &Clip);
    fn apply_pose(&mut self, pose: &Pose);
    fn teardown(&mut self);
}

/// Scrub/play/trim-play state for one clip.
pub struct PreviewPlayer {
    clip: Option<Clip>,
    speed_curve: Curve,
    settings: PreviewSettings,
    time: f32,
    mode: PlayMode,
    trim_start: f32,
    trim_end: f32,
}

impl Default for PreviewPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewPlayer {
    pub fn new() -> Self {
        Self::with_settings(PreviewSettings::default())
    }

    pub fn with_settings(settings: PreviewSettings) -> Self {
        Self {
            clip: None,
            // Constant speed 1: identity warp until the artist authors one.
            speed_curve: Curve::constant(0.0, 1.0, 1.0),
            settings,
            time: 0.0,
            mode: PlayMode::Stopped,
            trim_start: 0.0,
            trim_end: 0.0,
        }
    }

    /// Load a clip for preview, replacing any previous one. Resets time to
    /// zero and the trim range to the full clip, then attaches the rig.
    pub fn load_clip(&mut self, clip: Clip, rig: &mut dyn PreviewRig) -> Result<(), ClipError> {
        clip.validate_basic()
            .map_err(|reason| ClipError::MalformedClip { reason })?;
        log::debug!("preview: loading clip '{}'", clip.name);
        self.time = 0.0;
        self.mode = PlayMode::Stopped;
        self.trim_start = 0.0;
        self.trim_end = clip.length();
        rig.attach(&clip);
        self.clip = Some(clip);
        Ok(())
    }

    /// End the preview: tear down rig resources and clear the loaded clip.
    pub fn unload(&mut self, rig: &mut dyn PreviewRig) {
        if self.clip.take().is_some() {
            rig.teardown();
        }
        self.time = 0.0;
        self.mode = PlayMode::Stopped;
    }

    /// Replace the speed curve used by `tick` and `bake_with_speed`.
    pub fn set_speed_curve(&mut self, curve: Curve) {
        self.speed_curve = curve;
    }

    pub fn speed_curve(&self) -> &Curve {
        &self.speed_curve
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn trim_range(&self) -> (f32, f32) {
        (self.trim_start, self.trim_end)
    }

    /// Start full-clip playback from the current time.
    pub fn play(&mut self) {
        if self.clip.is_some() {
            self.mode = PlayMode::Playing;
        }
    }

    /// Start trim-range playback, pulling the current time into the range.
    pub fn play_trim(&mut self) {
        if self.clip.is_some() {
            self.time = self.time.clamp(self.trim_start, self.trim_end);
            self.mode = PlayMode::TrimPlaying;
        }
    }

    /// Halt playback, keeping the current time for a later resume.
    pub fn pause(&mut self) {
        self.mode = PlayMode::Stopped;
    }

    /// Halt playback, rewind to zero and show the rest pose.
    pub fn stop(&mut self, rig: &mut dyn PreviewRig) {
        self.mode = PlayMode::Stopped;
        self.time = 0.0;
        if self.clip.is_some() {
            let pose = self.sample_pose(0.0);
            rig.apply_pose(&pose);
        }
    }

    /// Jump to a time (clamped to the clip) and show that pose.
    pub fn scrub(&mut self, time: f32, rig: &mut dyn PreviewRig) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        self.time = time.clamp(0.0, clip.length());
        let pose = self.sample_pose(self.time);
        rig.apply_pose(&pose);
    }

    /// Move the trim handles, keeping them `trim_gap` apart and inside the
    /// clip. Non-finite inputs leave the handles where they are; no-op
    /// without a clip.
    pub fn set_trim_range(&mut self, start: f32, end: f32) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        if !start.is_finite() || !end.is_finite() {
            log::warn!("preview: ignoring non-finite trim range [{start}, {end}]");
            return;
        }
        let length = clip.length();
        let gap = self.settings.trim_gap;
        if length <= gap {
            // Clip shorter than the handle gap: the whole clip is the range.
            self.trim_start = 0.0;
            self.trim_end = length;
            return;
        }
        self.trim_end = end.clamp(gap, length);
        self.trim_start = start.clamp(0.0, self.trim_end - gap);
    }

    /// Advance playback by `dt` seconds of host time and apply the resulting
    /// pose. The speed curve is evaluated at the current (pre-advance) time;
    /// wrapping depends on the transport mode.
    pub fn tick(&mut self, dt: f32, rig: &mut dyn PreviewRig) {
        if !self.mode.is_playing() {
            return;
        }
        let Some(clip) = self.clip.as_ref() else {
            return;
        };

        let speed = evaluate_curve(&self.speed_curve, self.time).max(self.settings.min_speed);
        self.time += dt * speed;

        match self.mode {
            PlayMode::TrimPlaying => {
                if self.time > self.trim_end {
                    self.time = self.trim_start;
                }
            }
            _ => {
                if self.time > clip.length() {
                    self.time = 0.0;
                }
            }
        }

        let pose = self.sample_pose(self.time);
        rig.apply_pose(&pose);
    }

    /// Evaluate every channel of the loaded clip at `time`. Empty without a
    /// clip.
    pub fn sample_pose(&self, time: f32) -> Pose {
        let samples = match self.clip.as_ref() {
            Some(clip) => clip
                .channels
                .iter()
                .map(|channel| PoseSample {
                    binding: channel.binding.clone(),
                    value: evaluate_curve(&channel.curve, time),
                })
                .collect(),
            None => Vec::new(),
        };
        Pose { time, samples }
    }

    /// Bake the loaded clip through the current speed curve.
    pub fn bake_with_speed(&self, cfg: &BakeConfig) -> Result<Clip, ClipError> {
        let clip = self
            .clip
            .as_ref()
            .ok_or_else(|| ClipError::invalid_input("no clip loaded for preview"))?;
        bake(clip, &self.speed_curve, cfg)
    }

    /// Trim the loaded clip to the current trim range.
    pub fn trim_to_range(&self) -> Result<Clip, ClipError> {
        let clip = self
            .clip
            .as_ref()
            .ok_or_else(|| ClipError::invalid_input("no clip loaded for preview"))?;
        trim(clip, self.trim_start, self.trim_end)
    }
}
