use crate::foundation::error::{StoryError, StoryResult};

pub use kurbo::Rect;

/// Width of the vertical story format in pixels.
pub const STORY_WIDTH: u32 = 1080;
/// Height of the vertical story format in pixels.
pub const STORY_HEIGHT: u32 = 1920;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pixel dimensions of a frame, layer or clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// The 1080x1920 story canvas.
    pub const STORY: Self = Self::new(STORY_WIDTH, STORY_HEIGHT);

    /// Construct a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when both dimensions are non-zero.
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Longer of the two dimensions.
    pub fn long_edge(self) -> u32 {
        self.width.max(self.height)
    }

    /// Round both dimensions down to even values (yuv420p needs even sizes), never below 2.
    pub fn even(self) -> Self {
        Self {
            width: (self.width & !1).max(2),
            height: (self.height & !1).max(2),
        }
    }

    /// Proportionally shrink so the long edge is at most `max_long_edge`.
    ///
    /// Sizes already within the ceiling are returned unchanged.
    pub fn fit_long_edge(self, max_long_edge: u32) -> Self {
        let long = self.long_edge();
        if long <= max_long_edge || long == 0 {
            return self;
        }
        let scale = f64::from(max_long_edge) / f64::from(long);
        Self {
            width: ((f64::from(self.width) * scale).round() as u32).max(1),
            height: ((f64::from(self.height) * scale).round() as u32).max(1),
        }
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// A frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Size of this frame.
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Outcome of a stage that may substitute a degraded value instead of failing.
///
/// Every substitution point in the pipeline returns one of these so that the reason for a
/// fallback stays visible to callers and tests.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<T> {
    /// The requested value was produced.
    Primary(T),
    /// A fallback value was produced instead.
    Substituted {
        /// The fallback value.
        value: T,
        /// Why the primary value could not be produced.
        reason: String,
    },
}

impl<T> Resolved<T> {
    /// Build a substituted outcome.
    pub fn substituted(value: T, reason: impl Into<String>) -> Self {
        Self::Substituted {
            value,
            reason: reason.into(),
        }
    }

    /// Borrow the carried value.
    pub fn value(&self) -> &T {
        match self {
            Self::Primary(v) | Self::Substituted { value: v, .. } => v,
        }
    }

    /// Unwrap into the carried value.
    pub fn into_value(self) -> T {
        match self {
            Self::Primary(v) | Self::Substituted { value: v, .. } => v,
        }
    }

    /// Return `true` when a fallback was substituted.
    pub fn is_substituted(&self) -> bool {
        matches!(self, Self::Substituted { .. })
    }

    /// Substitution reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Primary(_) => None,
            Self::Substituted { reason, .. } => Some(reason),
        }
    }
}

/// Validate that a duration in seconds is finite and strictly positive.
pub fn validate_duration(secs: f64) -> StoryResult<f64> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(StoryError::validation(format!(
            "duration must be finite and > 0, got {secs}"
        )));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
