use super::*;
use crate::foundation::core::Rgb8;
use crate::media::probe::VideoSourceInfo;
use std::path::PathBuf;

fn solid(size: FrameSize) -> BackgroundClip {
    BackgroundClip::Solid {
        size,
        color: Rgb8::BLACK,
        duration_secs: 99.0,
    }
}

fn track(secs: f64) -> AudioTrack {
    AudioTrack {
        path: PathBuf::from("a.f32le"),
        sample_rate: 48_000,
        channels: 2,
        duration_secs: secs,
    }
}

#[test]
fn full_pass_reaches_encoded() {
    let mut c = Compositor::new(3.0);
    assert_eq!(c.state(), CompositorState::Idle);
    let size = c
        .set_background(Resolved::Primary(solid(FrameSize::new(9, 15))))
        .unwrap();
    assert_eq!(size, FrameSize::new(8, 14));
    c.layer_text(TextLayer::transparent(size)).unwrap();
    assert!(c.attach_audio(track(10.0)).unwrap());
    let unit = c.composite().unwrap();
    assert_eq!(unit.duration_secs, 3.0);
    assert_eq!(unit.background.duration_secs(), 3.0, "trimmed to render duration");
    assert_eq!(unit.audio.as_ref().unwrap().duration_secs, 3.0);
    assert_eq!(unit.frame_size(), FrameSize::new(8, 14));
    c.finish(true).unwrap();
    assert_eq!(c.state(), CompositorState::Encoded);
}

#[test]
fn audio_is_optional() {
    let mut c = Compositor::new(1.0);
    let size = c
        .set_background(Resolved::Primary(solid(FrameSize::new(4, 4))))
        .unwrap();
    c.layer_text(TextLayer::transparent(size)).unwrap();
    let unit = c.composite().unwrap();
    assert!(unit.audio.is_none());
    c.finish(false).unwrap();
    assert_eq!(c.state(), CompositorState::Failed);
}

#[test]
fn zero_length_audio_never_attached() {
    let mut c = Compositor::new(2.0);
    let size = c
        .set_background(Resolved::Primary(solid(FrameSize::new(4, 4))))
        .unwrap();
    c.layer_text(TextLayer::transparent(size)).unwrap();
    assert!(!c.attach_audio(track(0.0)).unwrap());
    assert!(c.composite().unwrap().audio.is_none());

    assert!(reconcile_audio(track(-1.0), 2.0).is_none());
    assert!(reconcile_audio(track(f64::NAN), 2.0).is_none());
    assert_eq!(reconcile_audio(track(1.5), 2.0).unwrap().duration_secs, 1.5);
}

#[test]
fn zero_sized_background_falls_back() {
    let mut c = Compositor::new(1.0);
    let info = VideoSourceInfo {
        source_path: PathBuf::from("v.mp4"),
        width: 0,
        height: 720,
        frame_rate: None,
        duration_secs: None,
        has_audio: false,
    };
    let size = c
        .set_background(Resolved::Primary(BackgroundClip::Video {
            info,
            duration_secs: 1.0,
        }))
        .unwrap();
    assert_eq!(size, FrameSize::STORY);
}

#[test]
fn mismatched_text_layer_is_resized() {
    let mut c = Compositor::new(1.0);
    c.set_background(Resolved::Primary(solid(FrameSize::new(20, 40))))
        .unwrap();
    c.layer_text(TextLayer::transparent(FrameSize::new(10, 20)))
        .unwrap();
    let unit = c.composite().unwrap();
    assert_eq!(unit.text_layer.size, FrameSize::new(20, 40));
}

#[test]
fn states_cannot_be_skipped_or_revisited() {
    let mut c = Compositor::new(1.0);
    assert!(c.layer_text(TextLayer::transparent(FrameSize::new(2, 2))).is_err());
    assert!(c.composite().is_err());
    c.set_background(Resolved::Primary(solid(FrameSize::new(2, 2))))
        .unwrap();
    assert!(
        c.set_background(Resolved::Primary(solid(FrameSize::new(2, 2))))
            .is_err()
    );
    assert!(c.attach_audio(track(1.0)).is_err());
    assert!(c.finish(true).is_err());
}

#[test]
fn composite_frame_checks_sizes() {
    let layer = TextLayer {
        size: FrameSize::new(1, 1),
        rgba8_premul: vec![255, 0, 0, 255],
    };
    let mut bg = vec![0, 0, 255, 255];
    composite_frame(&mut bg, &layer).unwrap();
    assert_eq!(bg, vec![255, 0, 0, 255]);

    let mut wrong = vec![0u8; 8];
    assert!(composite_frame(&mut wrong, &layer).is_err());
}
