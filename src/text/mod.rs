//! Text preparation: normalization, color parsing, font selection, layout and rasterization.

/// Text color parsing.
pub mod color;
/// Font candidates, discovery and the built-in block face.
pub mod fonts;
/// Line wrapping and placement.
pub mod layout;
/// Whitespace normalization for poem text.
pub mod normalize;
/// Outlined glyph rasterization into a transparent layer.
pub mod raster;
