use clipforge_retime_core::{
    BakeConfig, Clip, ClipError, Curve, CurveBinding, Keyframe, PlayMode, Pose, PreviewPlayer,
    PreviewRig, PreviewSettings, TargetKind,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Rig double that records every call the player makes.
#[derive(Default)]
struct RecordingRig {
    attached: Vec<String>,
    poses: Vec<Pose>,
    teardowns: usize,
}

impl PreviewRig for RecordingRig {
    fn attach(&mut self, clip: &Clip) {
        self.attached.push(clip.name.clone());
    }
    fn apply_pose(&mut self, pose: &Pose) {
        self.poses.push(pose.clone());
    }
    fn teardown(&mut self) {
        self.teardowns += 1;
    }
}

/// Identity clip: one channel whose value equals the sample time.
fn mk_clip(length: f32) -> Clip {
    let mut clip = Clip::new("preview", 30.0);
    clip.set_curve(
        CurveBinding::new("node", TargetKind::Float, "value"),
        Curve::linear(0.0, 0.0, length, length),
    );
    clip
}

/// it should attach the rig and reset transport state on load
#[test]
fn load_attaches_and_resets() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();

    player.load_clip(mk_clip(2.0), &mut rig).unwrap();
    assert_eq!(rig.attached, vec!["preview".to_string()]);
    assert_eq!(player.time(), 0.0);
    assert_eq!(player.mode(), PlayMode::Stopped);
    assert_eq!(player.trim_range(), (0.0, 2.0));

    // Loading again replaces the previous clip: attach fires again.
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();
    assert_eq!(rig.attached.len(), 2);
    assert_eq!(player.trim_range(), (0.0, 1.0));
}

/// it should reject malformed clips on load without touching the rig
#[test]
fn load_rejects_malformed() {
    let mut clip = Clip::new("bad", 30.0);
    clip.set_curve(
        CurveBinding::new("node", TargetKind::Float, "value"),
        Curve::new(vec![Keyframe::new(1.0, 0.0), Keyframe::new(0.5, 1.0)]),
    );
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();

    let err = player.load_clip(clip, &mut rig).unwrap_err();
    assert!(matches!(err, ClipError::MalformedClip { .. }));
    assert!(rig.attached.is_empty());
    assert!(player.clip().is_none());
}

/// it should advance through the speed curve and wrap at the clip end
#[test]
fn tick_advances_and_wraps() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.play();
    assert_eq!(player.mode(), PlayMode::Playing);

    player.tick(0.6, &mut rig);
    approx(player.time(), 0.6, 1e-6);

    // 0.6 + 0.6 = 1.2 > length, wraps to zero.
    player.tick(0.6, &mut rig);
    approx(player.time(), 0.0, 1e-6);

    assert_eq!(rig.poses.len(), 2);
    approx(rig.poses[0].time, 0.6, 1e-6);
    approx(rig.poses[0].samples[0].value, 0.6, 1e-5);
    approx(rig.poses[1].time, 0.0, 1e-6);
}

/// it should pull the time into the trim range and wrap inside it
#[test]
fn trim_playback_wraps_into_range() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();
    player.set_trim_range(0.2, 0.5);

    player.play_trim();
    assert_eq!(player.mode(), PlayMode::TrimPlaying);
    approx(player.time(), 0.2, 1e-6); // clamped up into the range

    player.tick(0.4, &mut rig);
    // 0.2 + 0.4 = 0.6 > trim end, wraps to trim start.
    approx(player.time(), 0.2, 1e-6);
}

/// it should clamp the evaluated speed to the configured floor
#[test]
fn speed_floor_keeps_playback_moving() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(10.0), &mut rig).unwrap();
    player.set_speed_curve(Curve::constant(0.0, 10.0, 0.0));

    player.play();
    player.tick(1.0, &mut rig);
    approx(player.time(), 1e-3, 1e-7);
}

/// it should evaluate the speed curve at the pre-advance time
#[test]
fn speed_sampled_before_advancing() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(10.0), &mut rig).unwrap();
    // Speed 2 at t=0, speed 4 at t=10.
    player.set_speed_curve(Curve::linear(0.0, 2.0, 10.0, 4.0));

    player.play();
    player.tick(0.5, &mut rig);
    // Advance uses speed(0) = 2, not the speed at the landing time.
    approx(player.time(), 1.0, 1e-5);
}

/// it should keep the trim handles a gap apart and inside the clip
#[test]
fn trim_handles_keep_gap() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.set_trim_range(-1.0, 2.0);
    assert_eq!(player.trim_range(), (0.0, 1.0));

    player.set_trim_range(0.5, 0.505);
    let (start, end) = player.trim_range();
    assert!(end - start >= 0.01 - 1e-6, "gap collapsed: {start}..{end}");
    assert!(start >= 0.0 && end <= 1.0);
}

/// it should hold the previous handles when given non-finite ones
#[test]
fn trim_handles_ignore_non_finite() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();
    player.set_trim_range(0.2, 0.8);

    player.set_trim_range(0.2, f32::NAN);
    assert_eq!(player.trim_range(), (0.2, 0.8));
    player.set_trim_range(f32::NAN, 0.8);
    assert_eq!(player.trim_range(), (0.2, 0.8));
    player.set_trim_range(f32::NEG_INFINITY, f32::INFINITY);
    assert_eq!(player.trim_range(), (0.2, 0.8));

    // The held handles still drive trim playback.
    player.play_trim();
    assert_eq!(player.mode(), PlayMode::TrimPlaying);
    approx(player.time(), 0.2, 1e-6);
    player.tick(0.7, &mut rig);
    // 0.2 + 0.7 = 0.9 > trim end, wraps to trim start.
    approx(player.time(), 0.2, 1e-6);
}

/// it should stop to time zero and show the rest pose
#[test]
fn stop_rewinds_and_applies_rest_pose() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.play();
    player.tick(0.4, &mut rig);
    player.stop(&mut rig);

    assert_eq!(player.mode(), PlayMode::Stopped);
    assert_eq!(player.time(), 0.0);
    let last = rig.poses.last().unwrap();
    approx(last.time, 0.0, 1e-6);
}

/// it should pause in place and resume from the held time
#[test]
fn pause_holds_time() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.play();
    player.tick(0.3, &mut rig);
    player.pause();
    assert_eq!(player.mode(), PlayMode::Stopped);
    approx(player.time(), 0.3, 1e-6);

    // Ticking while stopped is inert.
    player.tick(0.5, &mut rig);
    approx(player.time(), 0.3, 1e-6);
    assert_eq!(rig.poses.len(), 1);

    player.play();
    player.tick(0.2, &mut rig);
    approx(player.time(), 0.5, 1e-6);
}

/// it should scrub to a clamped time and apply that pose
#[test]
fn scrub_clamps_and_applies() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.scrub(5.0, &mut rig);
    approx(player.time(), 1.0, 1e-6);
    player.scrub(-2.0, &mut rig);
    approx(player.time(), 0.0, 1e-6);
    assert_eq!(rig.poses.len(), 2);
    approx(rig.poses[0].samples[0].value, 1.0, 1e-5);
}

/// it should tear down the rig exactly once on unload
#[test]
fn unload_tears_down_once() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();
    player.load_clip(mk_clip(1.0), &mut rig).unwrap();

    player.unload(&mut rig);
    assert_eq!(rig.teardowns, 1);
    assert!(player.clip().is_none());
    assert_eq!(player.time(), 0.0);

    // Unloading without a clip must not tear down again.
    player.unload(&mut rig);
    assert_eq!(rig.teardowns, 1);
}

/// it should bake and trim through the loaded clip
#[test]
fn bake_and_trim_conveniences() {
    let mut player = PreviewPlayer::new();
    let mut rig = RecordingRig::default();

    // Without a clip both conveniences refuse.
    assert!(matches!(
        player.bake_with_speed(&BakeConfig::default()),
        Err(ClipError::InvalidInput { .. })
    ));
    assert!(matches!(
        player.trim_to_range(),
        Err(ClipError::InvalidInput { .. })
    ));

    player.load_clip(mk_clip(2.0), &mut rig).unwrap();
    player.set_speed_curve(Curve::constant(0.0, 2.0, 2.0));

    let baked = player.bake_with_speed(&BakeConfig { frame_rate: 10.0 }).unwrap();
    assert_eq!(baked.channels[0].curve.len(), 21);
    approx(baked.frame_rate, 10.0, 1e-6);

    // Trim the baked result through a fresh load.
    player.load_clip(baked, &mut rig).unwrap();
    player.set_trim_range(0.25, 0.75);
    let trimmed = player.trim_to_range().unwrap();
    let keys = &trimmed.channels[0].curve.keys;
    assert_eq!(keys.len(), 5); // baked keys at 0.3 .. 0.7
    for key in keys {
        assert!(key.time >= 0.0 && key.time <= 0.5 + 1e-6);
    }
}

/// it should ignore transport commands without a clip
#[test]
fn transport_without_clip_is_inert() {
    let mut player = PreviewPlayer::with_settings(PreviewSettings::default());
    let mut rig = RecordingRig::default();

    player.play();
    assert_eq!(player.mode(), PlayMode::Stopped);
    player.play_trim();
    assert_eq!(player.mode(), PlayMode::Stopped);
    player.tick(1.0, &mut rig);
    player.scrub(0.5, &mut rig);
    assert!(rig.poses.is_empty());
    assert_eq!(player.time(), 0.0);
}

/// it should report transport mode names for host UIs
#[test]
fn mode_names() {
    assert_eq!(PlayMode::Stopped.name(), "stopped");
    assert_eq!(PlayMode::Playing.name(), "playing");
    assert_eq!(PlayMode::TrimPlaying.name(), "trimPlaying");
    assert!(PlayMode::Playing.is_playing());
    assert!(PlayMode::TrimPlaying.is_playing());
    assert!(!PlayMode::Stopped.is_playing());
}
