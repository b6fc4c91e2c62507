//! Encoding sinks and the retrying encoder.
//!
//! Sinks consume composited frames in timeline order; the [`ladder::Encoder`] drives them
//! through progressively more conservative settings until one attempt succeeds.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Encode attempts and the retrying encoder.
pub mod ladder;
/// Frame sink contract and its configuration.
pub mod sink;
