use super::*;

#[test]
fn fallback_is_black_story_canvas() {
    let clip = fallback_clip(7.5);
    assert_eq!(clip.size(), FrameSize::new(1080, 1920));
    assert_eq!(clip.duration_secs(), 7.5);
    assert!(clip.is_solid());
    match clip {
        BackgroundClip::Solid { color, .. } => assert_eq!(color, Rgb8::BLACK),
        BackgroundClip::Video { .. } => panic!("expected solid clip"),
    }
}

#[test]
fn solid_frame_is_opaque_fill() {
    let f = solid_frame(FrameSize::new(3, 2), Rgb8::new(1, 2, 3));
    assert_eq!(f.len(), 3 * 2 * 4);
    assert!(f.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}
