use crate::foundation::core::Rgb8;

const NAMED_COLORS: [(&str, Rgb8); 8] = [
    ("white", Rgb8::new(255, 255, 255)),
    ("black", Rgb8::new(0, 0, 0)),
    ("red", Rgb8::new(255, 0, 0)),
    ("green", Rgb8::new(0, 255, 0)),
    ("blue", Rgb8::new(0, 0, 255)),
    ("yellow", Rgb8::new(255, 255, 0)),
    ("cyan", Rgb8::new(0, 255, 255)),
    ("magenta", Rgb8::new(255, 0, 255)),
];

/// Parse `#RRGGBB` (case-insensitive) or one of the fixed color names.
pub fn parse_color(input: &str) -> Option<Rgb8> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, c)| *c)
}

/// Resolve a color string, falling back to white for anything unrecognized.
///
/// Text color is cosmetic, so a bad value never aborts a render.
pub fn resolve_color(input: &str) -> Rgb8 {
    parse_color(input).unwrap_or_else(|| {
        tracing::debug!(input, "unrecognized text color, using white");
        Rgb8::WHITE
    })
}

fn parse_hex(hex: &str) -> Option<Rgb8> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb8::new(byte(0)?, byte(2)?, byte(4)?))
}

#[cfg(test)]
#[path = "../../tests/unit/text/color.rs"]
mod tests;
