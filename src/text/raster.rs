use crate::foundation::core::{FrameSize, Rect, Resolved, Rgb8};
use crate::foundation::error::{StoryError, StoryResult};
use crate::text::fonts::{FontFace, builtin};
use crate::text::layout::{LineLayout, TextLayoutEngine};

/// Alpha of each outline stamp; overlapping stamps build up to near-opaque black.
pub const OUTLINE_ALPHA: u8 = 180;
/// Height of the degraded fallback bar in pixels.
pub const FALLBACK_BAR_HEIGHT: u32 = 120;
/// Width of the degraded fallback bar as a fraction of the canvas width.
pub const FALLBACK_BAR_WIDTH_FRACTION: f64 = 0.8;

/// Transparent RGBA layer holding rendered text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    /// Layer size (matches the background it will be composited over).
    pub size: FrameSize,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Vec<u8>,
}

impl TextLayer {
    /// Fully transparent layer.
    pub fn transparent(size: FrameSize) -> Self {
        Self {
            size,
            rgba8_premul: vec![0u8; size.rgba_len()],
        }
    }

    /// Alpha value at `(x, y)`, or `None` outside the layer.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4 + 3;
        self.rgba8_premul.get(idx).copied()
    }

    /// Return `true` when no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Resample the layer to `target` size.
    pub fn resized(&self, target: FrameSize) -> Self {
        if target == self.size {
            return self.clone();
        }
        let Some(img) = image::RgbaImage::from_raw(
            self.size.width,
            self.size.height,
            self.rgba8_premul.clone(),
        ) else {
            return Self::transparent(target);
        };
        let scaled = image::imageops::resize(
            &img,
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        );
        Self {
            size: target,
            rgba8_premul: scaled.into_raw(),
        }
    }
}

/// Largest outline radius in pixels.
pub const MAX_OUTLINE_RADIUS: i32 = 8;

/// Outline radius in pixels for a font size, between 2 and [`MAX_OUTLINE_RADIUS`].
pub fn outline_radius(font_size: f32) -> i32 {
    ((font_size / 20.0) as i32).clamp(2, MAX_OUTLINE_RADIUS)
}

/// Draw a [`LineLayout`] as outlined, centered text.
///
/// Never fails: when drawing is impossible a plain colored bar is returned as a
/// [`Resolved::Substituted`] layer.
pub fn rasterize_text(
    engine: &mut TextLayoutEngine,
    layout: &LineLayout,
    color: Rgb8,
) -> Resolved<TextLayer> {
    match try_rasterize(engine, layout, color) {
        Ok(layer) => Resolved::Primary(layer),
        Err(e) => {
            tracing::warn!(error = %e, "text rasterization failed, using fallback bar");
            Resolved::substituted(fallback_bar_layer(layout.canvas, color), e.to_string())
        }
    }
}

/// Degraded text layer: an opaque bar of the text color, 80% of the canvas wide.
pub fn fallback_bar_layer(canvas: FrameSize, color: Rgb8) -> TextLayer {
    let mut layer = TextLayer::transparent(canvas);
    let bar_w = (f64::from(canvas.width) * FALLBACK_BAR_WIDTH_FRACTION) as u32;
    let bar_h = FALLBACK_BAR_HEIGHT.min(canvas.height);
    let x0 = (canvas.width - bar_w) / 2;
    let y0 = (canvas.height - bar_h) / 2;
    for y in y0..y0 + bar_h {
        for x in x0..x0 + bar_w {
            let idx = ((y as usize) * (canvas.width as usize) + (x as usize)) * 4;
            layer.rgba8_premul[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }
    layer
}

fn try_rasterize(
    engine: &mut TextLayoutEngine,
    layout: &LineLayout,
    color: Rgb8,
) -> StoryResult<TextLayer> {
    let canvas = layout.canvas;
    if !canvas.is_valid() {
        return Err(StoryError::validation("text layer size must be non-zero"));
    }
    let (Ok(w), Ok(h)) = (u16::try_from(canvas.width), u16::try_from(canvas.height)) else {
        return Err(StoryError::validation(format!(
            "text layer {}x{} exceeds the rasterizer limit",
            canvas.width, canvas.height
        )));
    };

    let font_size = engine.font_size();
    let radius = outline_radius(font_size);
    let (ox, oy) = layout.area_origin;
    let outline = vello_cpu::peniko::Color::from_rgba8(0, 0, 0, OUTLINE_ALPHA);
    let fill = vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    for line in layout.lines.iter().filter(|l| !l.is_blank()) {
        let base_x = f64::from(ox + line.x);
        let base_y = f64::from(oy + line.y);

        let stamp: Box<dyn Fn(&mut vello_cpu::RenderContext)> = match engine.face().clone() {
            FontFace::Outline { data, .. } => {
                let shaped = engine.shape_line(&line.text).ok_or_else(|| {
                    StoryError::Other(anyhow::anyhow!("failed to shape line {:?}", line.text))
                })?;
                Box::new(move |ctx: &mut vello_cpu::RenderContext| {
                    let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&data)
                        .font_size(shaped.font_size)
                        .fill_glyphs(glyphs);
                })
            }
            FontFace::Builtin => {
                let rects: Vec<Rect> = builtin::glyph_rects(&line.text, font_size);
                Box::new(move |ctx: &mut vello_cpu::RenderContext| {
                    for r in &rects {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1));
                    }
                })
            }
        };

        ctx.set_paint(outline);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                    base_x + f64::from(dx),
                    base_y + f64::from(dy),
                )));
                stamp(&mut ctx);
            }
        }

        ctx.set_paint(fill);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((base_x, base_y)));
        stamp(&mut ctx);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(TextLayer {
        size: canvas,
        rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
