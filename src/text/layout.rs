use std::borrow::Cow;
use std::path::PathBuf;

use crate::foundation::core::{FrameSize, Resolved, STORY_HEIGHT};
use crate::text::fonts::{FontFace, builtin, load_first_face};
use crate::text::normalize::PLACEHOLDER_TEXT;

/// Fraction of the background width available to text.
pub const TEXT_AREA_WIDTH_FRACTION: f64 = 0.9;
/// Fraction of the background height available to text.
pub const TEXT_AREA_HEIGHT_FRACTION: f64 = 0.8;
/// Logical lines with at most this many characters are never wrapped.
pub const WRAP_THRESHOLD_CHARS: usize = 40;
/// Share of the text area width a wrapped line may fill.
pub const WRAP_WIDTH_FRACTION: f64 = 0.8;
/// Largest font size the engine lays out; larger requests are clamped to it.
pub const MAX_FONT_SIZE_PX: u32 = STORY_HEIGHT;
/// Extra spacing between lines, as a fraction of the font size.
pub const LINE_SPACING_FRACTION: f64 = 0.3;

const LINE_HEIGHT_PROBE: &str = "Ay";

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// One positioned line of text, relative to the top-left of the text area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLine {
    /// Line content; empty for stanza breaks.
    pub text: String,
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset of the line's top edge in pixels.
    pub y: i32,
    /// Measured width in pixels.
    pub width: u32,
}

impl PlacedLine {
    /// Return `true` for stanza-break lines that take space but draw nothing.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Placement of every line of a text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineLayout {
    /// Full layer size (the background size).
    pub canvas: FrameSize,
    /// Size of the centered text area inside the canvas.
    pub area: FrameSize,
    /// Top-left corner of the text area within the canvas.
    pub area_origin: (i32, i32),
    /// Height of every line, spacing included.
    pub line_height: u32,
    /// Lines in reading order.
    pub lines: Vec<PlacedLine>,
}

impl LineLayout {
    /// Y coordinate of the first line, relative to the text area.
    pub fn start_y(&self) -> i32 {
        self.lines.first().map(|l| l.y).unwrap_or(0)
    }

    /// Height of the whole block (`lines * line_height`).
    pub fn block_height(&self) -> u32 {
        self.line_height.saturating_mul(self.lines.len() as u32)
    }
}

/// Glyph position relative to a line's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShapedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// Shaped glyphs of one line.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapedLine {
    pub(crate) glyphs: Vec<ShapedGlyph>,
    pub(crate) font_size: f32,
}

/// Text area for a background of `background` size.
pub fn text_area_for(background: FrameSize) -> FrameSize {
    FrameSize::new(
        (f64::from(background.width) * TEXT_AREA_WIDTH_FRACTION) as u32,
        (f64::from(background.height) * TEXT_AREA_HEIGHT_FRACTION) as u32,
    )
}

fn effective_font_size(font_size_pt: u32) -> f32 {
    let clamped = font_size_pt.clamp(1, MAX_FONT_SIZE_PX);
    if clamped != font_size_pt {
        tracing::debug!(requested = font_size_pt, used = clamped, "font size clamped");
    }
    clamped as f32
}

/// Lays out normalized text with a single selected font at a fixed size.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    face: FontFace,
    font_size: f32,
}

impl TextLayoutEngine {
    /// Build an engine with the first loadable font among `candidates`.
    ///
    /// Falls back to the built-in block face when no candidate loads.
    pub fn with_candidates(candidates: &[PathBuf], font_size_pt: u32) -> Resolved<Self> {
        let mut font_ctx = parley::FontContext::default();
        let face = load_first_face(&mut font_ctx, candidates);
        let make = |face| Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            face,
            font_size: effective_font_size(font_size_pt),
        };
        match face {
            Resolved::Primary(f) => Resolved::Primary(make(f)),
            Resolved::Substituted { value, reason } => {
                tracing::warn!(%reason, "no font file available, using built-in block face");
                Resolved::Substituted {
                    value: make(value),
                    reason,
                }
            }
        }
    }

    /// Build an engine that only uses the built-in block face.
    pub fn builtin(font_size_pt: u32) -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            face: FontFace::Builtin,
            font_size: effective_font_size(font_size_pt),
        }
    }

    /// Selected face.
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Font size in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Measured advance width of a single line in pixels.
    pub fn measure_line(&mut self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self.build_layout(text) {
            Some(layout) => layout
                .lines()
                .map(|l| l.metrics().advance)
                .fold(0.0f32, f32::max),
            None => builtin::measure(text, self.font_size),
        }
    }

    /// Line height: ascent plus descent of a probe string plus 30% of the font size.
    ///
    /// Uses `font_size + 10` when the face has no metrics.
    pub fn line_height(&mut self) -> u32 {
        let spacing = (f64::from(self.font_size) * LINE_SPACING_FRACTION) as u32;
        let fallback = (self.font_size as u32).saturating_add(10);
        if self.face.is_builtin() {
            return fallback;
        }
        let Some(layout) = self.build_layout(LINE_HEIGHT_PROBE) else {
            return fallback;
        };
        match layout.lines().next() {
            Some(line) => {
                let m = line.metrics();
                let glyph_height = m.ascent + m.descent;
                if glyph_height.is_finite() && glyph_height > 0.0 {
                    glyph_height.round() as u32 + spacing
                } else {
                    fallback
                }
            }
            None => fallback,
        }
    }

    /// Split `normalized` into display lines, wrapping long logical lines to `max_width_px`.
    ///
    /// Logical lines of at most [`WRAP_THRESHOLD_CHARS`] characters are kept verbatim. Longer
    /// ones are wrapped greedily on word boundaries using measured widths; a word wider than
    /// the budget on its own is split between characters.
    pub fn wrap_lines(&mut self, normalized: &str, max_width_px: f32) -> Vec<String> {
        let mut out = Vec::new();
        for line in normalized.split('\n') {
            if line.chars().count() <= WRAP_THRESHOLD_CHARS {
                out.push(line.to_string());
                continue;
            }
            let mut current = String::new();
            for word in line.split(' ').filter(|w| !w.is_empty()) {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.measure_line(&candidate) <= max_width_px {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                if self.measure_line(word) <= max_width_px {
                    current = word.to_string();
                } else {
                    current = self.split_long_word(word, max_width_px, &mut out);
                }
            }
            if !current.is_empty() {
                out.push(current);
            }
        }
        out
    }

    fn split_long_word(&mut self, word: &str, max_width_px: f32, out: &mut Vec<String>) -> String {
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if piece.chars().count() > 1 && self.measure_line(&piece) > max_width_px {
                piece.pop();
                out.push(std::mem::take(&mut piece));
                piece.push(ch);
            }
        }
        piece
    }

    /// Lay out `normalized` text centered on a canvas of `background` size.
    ///
    /// Empty input is replaced with [`PLACEHOLDER_TEXT`].
    pub fn layout(&mut self, normalized: &str, background: FrameSize) -> LineLayout {
        let text = if normalized.trim().is_empty() {
            PLACEHOLDER_TEXT
        } else {
            normalized
        };

        let area = text_area_for(background);
        let budget = (f64::from(area.width) * WRAP_WIDTH_FRACTION) as f32;
        let wrapped = self.wrap_lines(text, budget);
        let line_height = self.line_height();

        let block = (line_height as i64) * (wrapped.len() as i64);
        let start_y = ((i64::from(area.height) - block) / 2).max(0);

        let lines = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let width = self.measure_line(&text).ceil().max(0.0) as u32;
                let x = ((i64::from(area.width) - i64::from(width)) / 2).max(0);
                PlacedLine {
                    text,
                    x: x as i32,
                    y: (start_y + (i as i64) * (line_height as i64)) as i32,
                    width,
                }
            })
            .collect();

        LineLayout {
            canvas: background,
            area,
            area_origin: (
                ((i64::from(background.width) - i64::from(area.width)) / 2) as i32,
                ((i64::from(background.height) - i64::from(area.height)) / 2) as i32,
            ),
            line_height,
            lines,
        }
    }

    /// Shape one line for drawing. Returns `None` for the built-in face.
    pub(crate) fn shape_line(&mut self, text: &str) -> Option<ShapedLine> {
        let layout = self.build_layout(text)?;
        let mut shaped = ShapedLine {
            glyphs: Vec::new(),
            font_size: self.font_size,
        };
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                shaped.font_size = run.run().font_size();
                let mut x = run.offset();
                let y = run.baseline();
                for g in run.glyphs() {
                    shaped.glyphs.push(ShapedGlyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    });
                    x += g.advance;
                }
            }
        }
        Some(shaped)
    }

    fn build_layout(&mut self, text: &str) -> Option<parley::Layout<TextBrushRgba8>> {
        let FontFace::Outline { family, .. } = &self.face else {
            return None;
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.font_size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }));
        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
