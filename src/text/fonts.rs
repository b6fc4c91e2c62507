use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::foundation::core::{Rect, Resolved};

/// Upper bound on fonts contributed by system discovery.
pub const MAX_DISCOVERED_FONTS: usize = 15;

const PREFERRED_FAMILY_KEYWORDS: [&str; 5] = ["dejavu", "liberation", "ubuntu", "roboto", "opensans"];

/// Ordered font files tried by the layout engine: bundled fonts first, then system paths.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "static/fonts/Roboto-Bold.ttf",
        "static/fonts/Roboto-Regular.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/ubuntu/Ubuntu-B.ttf",
        "/usr/share/fonts/truetype/roboto/Roboto-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "/System/Library/Fonts/Arial.ttf",
        "C:/Windows/Fonts/arial.ttf",
        "C:/Windows/Fonts/calibri.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// System font files found by scanning the platform font directories.
///
/// The scan runs at most once per process; later calls return the cached list. Files whose
/// names match well-known legible families are ordered first.
pub fn discovered_system_fonts() -> &'static [PathBuf] {
    static DISCOVERED: OnceLock<Vec<PathBuf>> = OnceLock::new();
    DISCOVERED.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let paths = db.faces().filter_map(|face| match &face.source {
            usvg::fontdb::Source::File(p) => Some(p.clone()),
            usvg::fontdb::Source::SharedFile(p, _) => Some(p.clone()),
            _ => None,
        });
        let found = prioritize_font_paths(paths, MAX_DISCOVERED_FONTS);
        tracing::info!(count = found.len(), "discovered system fonts");
        found
    })
}

/// Deduplicate, move preferred families to the front and cap the list at `limit`.
pub fn prioritize_font_paths(paths: impl IntoIterator<Item = PathBuf>, limit: usize) -> Vec<PathBuf> {
    let mut preferred = Vec::new();
    let mut regular = Vec::new();
    for p in paths {
        if preferred.contains(&p) || regular.contains(&p) {
            continue;
        }
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if PREFERRED_FAMILY_KEYWORDS.iter().any(|k| name.contains(k)) {
            preferred.push(p);
        } else {
            regular.push(p);
        }
    }
    preferred.into_iter().chain(regular).take(limit).collect()
}

/// Font chosen for a render.
#[derive(Clone)]
pub enum FontFace {
    /// A font file registered with the shaping engine.
    Outline {
        /// File the font was loaded from.
        path: PathBuf,
        /// Family name as registered with Parley.
        family: String,
        /// Font bytes shared with the rasterizer.
        data: vello_cpu::peniko::FontData,
    },
    /// Built-in block face that needs no font file.
    Builtin,
}

impl FontFace {
    /// Source path for outline faces.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Outline { path, .. } => Some(path),
            Self::Builtin => None,
        }
    }

    /// Return `true` for the built-in block face.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { path, family, .. } => f
                .debug_struct("Outline")
                .field("path", path)
                .field("family", family)
                .finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

/// Register the first loadable candidate with `font_ctx`.
///
/// Unreadable or unparsable files are skipped. When nothing loads the built-in face is
/// substituted.
pub(crate) fn load_first_face(
    font_ctx: &mut parley::FontContext,
    candidates: &[PathBuf],
) -> Resolved<FontFace> {
    for path in candidates {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "font candidate unreadable");
                continue;
            }
        };
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let Some(family) = families
            .first()
            .and_then(|(id, _)| font_ctx.collection.family_name(*id))
            .map(str::to_string)
        else {
            tracing::debug!(path = %path.display(), "font candidate registered no families");
            continue;
        };

        tracing::debug!(path = %path.display(), family, "using font");
        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        return Resolved::Primary(FontFace::Outline {
            path: path.clone(),
            family,
            data,
        });
    }

    Resolved::substituted(
        FontFace::Builtin,
        format!(
            "none of {} font candidates could be loaded",
            candidates.len()
        ),
    )
}

/// Fixed-pitch 5x7 block face drawn as filled rectangles.
pub(crate) mod builtin {
    use super::Rect;

    const COLS: u32 = 5;
    const ROWS: u32 = 7;

    /// Size of one glyph pixel at `font_size`.
    pub(crate) fn unit(font_size: f32) -> f64 {
        f64::from((font_size / 8.0).max(1.0))
    }

    /// Horizontal advance per character (five glyph columns plus a gap).
    pub(crate) fn advance(font_size: f32) -> f64 {
        unit(font_size) * f64::from(COLS + 1)
    }

    /// Width of `text` in pixels.
    pub(crate) fn measure(text: &str, font_size: f32) -> f32 {
        (text.chars().count() as f64 * advance(font_size)) as f32
    }

    /// Rectangles covering the lit pixels of `text`, relative to the line's top-left corner.
    pub(crate) fn glyph_rects(text: &str, font_size: f32) -> Vec<Rect> {
        let u = unit(font_size);
        let adv = advance(font_size);
        let mut out = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            let x0 = i as f64 * adv;
            for (row, bits) in pattern(ch).iter().enumerate() {
                for col in 0..COLS {
                    if (bits >> (COLS - 1 - col)) & 1 == 1 {
                        let x = x0 + f64::from(col) * u;
                        let y = row as f64 * u;
                        out.push(Rect::new(x, y, x + u, y + u));
                    }
                }
            }
        }
        out
    }

    fn pattern(ch: char) -> [u8; ROWS as usize] {
        match ch.to_ascii_uppercase() {
            ' ' => [0; 7],
            'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
            'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
            'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
            'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
            'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
            'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
            'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
            'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
            'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
            'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
            'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
            'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
            'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
            'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
            'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
            'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
            'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
            'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
            'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
            'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
            'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
            '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
            '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
            '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
            '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
            '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
            '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
            '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
            '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
            '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
            '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
            ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
            '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
            '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
            '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
            '"' => [0b01010, 0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000],
            ':' => [0b00000, 0b00000, 0b01100, 0b00000, 0b00000, 0b01100, 0b00000],
            ';' => [0b00000, 0b00000, 0b01100, 0b00000, 0b00000, 0b01100, 0b01000],
            '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
            '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
            ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
            '/' => [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
            '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
            // Unknown glyph
            _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
