use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::FrameSize;
use crate::foundation::error::StoryResult;
use crate::foundation::math::premul_over_opaque_in_place;
use crate::media::fallback::{FALLBACK_COLOR, solid_frame};
use crate::media::temp::ensure_parent_dir;
use crate::text::color::resolve_color;
use crate::text::layout::TextLayoutEngine;
use crate::text::normalize::normalize_text;
use crate::text::raster::rasterize_text;

/// Smallest font size used for previews.
pub const PREVIEW_MIN_FONT_SIZE: u32 = 80;

/// Previews draw at twice the requested size, never below [`PREVIEW_MIN_FONT_SIZE`].
pub fn preview_font_size(font_size_pt: u32) -> u32 {
    font_size_pt.saturating_mul(2).max(PREVIEW_MIN_FONT_SIZE)
}

/// Render `text` over a black 1080x1920 canvas.
///
/// Empty text shows the placeholder; drawing failures show the fallback bar.
pub fn render_preview(
    fonts: &[PathBuf],
    text: &str,
    font_size_pt: u32,
    color: &str,
) -> image::RgbaImage {
    let canvas = FrameSize::STORY;
    let mut engine =
        TextLayoutEngine::with_candidates(fonts, preview_font_size(font_size_pt)).into_value();
    let layout = engine.layout(&normalize_text(text), canvas);
    let layer = rasterize_text(&mut engine, &layout, resolve_color(color)).into_value();

    let mut pixels = solid_frame(canvas, FALLBACK_COLOR);
    premul_over_opaque_in_place(&mut pixels, &layer.rgba8_premul);
    image::RgbaImage::from_raw(canvas.width, canvas.height, pixels)
        .unwrap_or_else(|| image::RgbaImage::new(canvas.width, canvas.height))
}

/// Save a preview as PNG.
pub fn write_preview_png(img: &image::RgbaImage, path: &Path) -> StoryResult<()> {
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write preview '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
