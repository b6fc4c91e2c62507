//! Storyreel renders poem text over a background clip into vertical 1080x1920 story videos.
//!
//! The pipeline for one render:
//!
//! - Resolve the background (local file, download, or a solid fallback)
//! - Lay out and rasterize outlined text sized to that background
//! - Attach optional audio, trimmed to the duration
//! - Encode through `ffmpeg`, retrying with more conservative settings on failure
//!
//! Media, font and drawing problems degrade the output rather than failing it. The only
//! failures a caller sees are invalid input and an exhausted encoder.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Compositor state machine.
pub mod compose;
/// Process-level settings.
pub mod config;
/// Encoding sinks and the retrying encoder.
pub mod encode;
/// Media acquisition, probing and frame sources.
pub mod media;
/// Requests, the render pipeline and previews.
pub mod render;
/// Text normalization, fonts, layout and rasterization.
pub mod text;

pub use crate::foundation::core::{
    FrameRGBA, FrameSize, Rect, Resolved, Rgb8, STORY_HEIGHT, STORY_WIDTH,
};
pub use crate::foundation::error::{StoryError, StoryResult};

pub use crate::config::{ProviderCredential, StoryConfig};
pub use crate::encode::ladder::{EncodeAttempt, EncodeReport, Encoder, SinkProvider, ladder};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
pub use crate::media::temp::{sweep_stale_temp_files, unique_output_path};
pub use crate::render::pipeline::{BatchSummary, Renderer};
pub use crate::render::preview::{render_preview, write_preview_png};
pub use crate::render::request::{RenderErrorKind, RenderRequest, RenderResult, parse_batch_json};
