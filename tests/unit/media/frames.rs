use super::*;
use crate::foundation::core::Rgb8;
use crate::media::fallback::fallback_clip;
use crate::media::probe::is_ffmpeg_on_path;

#[test]
fn solid_source_repeats_its_color_at_requested_size() {
    let clip = BackgroundClip::Solid {
        size: FrameSize::STORY,
        color: Rgb8::new(9, 8, 7),
        duration_secs: 1.0,
    };
    let mut src = open_frames(&clip, FrameSize::new(4, 6), 24).unwrap();
    assert_eq!(src.size(), FrameSize::new(4, 6));
    for _ in 0..3 {
        let f = src.next_frame().unwrap();
        assert_eq!(f.len(), 4 * 6 * 4);
        assert_eq!(&f[..4], &[9, 8, 7, 255]);
    }
}

#[test]
fn fallback_clip_frames_are_black() {
    let mut src = open_frames(&fallback_clip(1.0), FrameSize::new(2, 2), 24).unwrap();
    assert!(src.next_frame().unwrap().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn decoder_rejects_zero_fps() {
    let info = VideoSourceInfo {
        source_path: "x.mp4".into(),
        width: 2,
        height: 2,
        frame_rate: None,
        duration_secs: None,
        has_audio: false,
    };
    assert!(DecodedFrames::spawn(&info, FrameSize::new(2, 2), 0, 1.0).is_err());
}

#[test]
fn decoding_a_short_clip_holds_last_frame() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("red.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i", "color=c=red:s=64x96:d=0.5:r=10"])
        .args(["-pix_fmt", "yuv420p"])
        .arg(&clip)
        .status()
        .unwrap();
    assert!(status.success());

    let info = crate::media::probe::probe_video(&clip).unwrap();
    let mut src = DecodedFrames::spawn(&info, FrameSize::new(32, 48), 10, 2.0).unwrap();
    let mut last = Vec::new();
    for _ in 0..20 {
        last = src.next_frame().unwrap().to_vec();
    }
    assert!(src.decoded() > 0 && src.decoded() < 20);
    assert_eq!(last.len(), 32 * 48 * 4);
    assert!(last[0] > 200, "red channel should dominate");
}

fn truncated_after_header(dir: &std::path::Path) -> std::path::PathBuf {
    let clip = dir.join("full.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i", "testsrc=s=64x96:d=1:r=10"])
        .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
        .arg(&clip)
        .status()
        .unwrap();
    assert!(status.success());
    let bytes = std::fs::read(&clip).unwrap();
    let mdat = bytes.windows(4).position(|w| w == b"mdat").unwrap();
    let cut = dir.join("cut.mp4");
    std::fs::write(&cut, &bytes[..mdat + 4]).unwrap();
    cut
}

#[test]
fn undecodable_video_yields_solid_frames() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let info = VideoSourceInfo {
        source_path: "/no/such/background.mp4".into(),
        width: 64,
        height: 96,
        frame_rate: Some(10.0),
        duration_secs: Some(1.0),
        has_audio: false,
    };
    assert!(matches!(
        ensure_decodable(&info),
        Err(StoryError::MediaUnavailable(_))
    ));
    let clip = BackgroundClip::Video {
        info,
        duration_secs: 1.0,
    };
    let mut src = open_frames(&clip, FrameSize::new(4, 6), 10).unwrap();
    for _ in 0..3 {
        assert!(src.next_frame().unwrap().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }
}

#[test]
fn header_only_video_is_not_decodable() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let cut = truncated_after_header(dir.path());
    let Ok(info) = crate::media::probe::probe_video(&cut) else {
        return;
    };
    assert!(matches!(
        ensure_decodable(&info),
        Err(StoryError::MediaUnavailable(_))
    ));
}

#[test]
fn primed_first_frame_is_returned_once() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("blue.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i", "color=c=blue:s=32x32:d=1:r=10"])
        .args(["-pix_fmt", "yuv420p"])
        .arg(&clip)
        .status()
        .unwrap();
    assert!(status.success());

    let info = crate::media::probe::probe_video(&clip).unwrap();
    let mut src = DecodedFrames::spawn(&info, FrameSize::new(16, 16), 10, 1.0).unwrap();
    src.prime().unwrap();
    assert_eq!(src.decoded(), 1);
    src.next_frame().unwrap();
    assert_eq!(src.decoded(), 1);
    src.next_frame().unwrap();
    assert_eq!(src.decoded(), 2);
}
