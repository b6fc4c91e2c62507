use crate::foundation::core::{FrameSize, Rgb8};
use crate::media::background::BackgroundClip;

/// Color of the substitute background.
pub const FALLBACK_COLOR: Rgb8 = Rgb8::BLACK;

/// Solid black 1080x1920 clip lasting `duration_secs`.
pub fn fallback_clip(duration_secs: f64) -> BackgroundClip {
    BackgroundClip::Solid {
        size: FrameSize::STORY,
        color: FALLBACK_COLOR,
        duration_secs,
    }
}

/// Solid RGBA8 frame of `size` filled with `color`.
pub fn solid_frame(size: FrameSize, color: Rgb8) -> Vec<u8> {
    [color.r, color.g, color.b, 255].repeat(size.width as usize * size.height as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/media/fallback.rs"]
mod tests;
