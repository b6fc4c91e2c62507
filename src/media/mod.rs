//! Background and audio acquisition, probing and frame production.

/// Resolve media references into local files and decoded descriptors.
pub mod acquire;
/// Resolved background clips.
pub mod background;
/// Solid-color substitute background.
pub mod fallback;
/// Streaming background frame sources.
pub mod frames;
/// `ffprobe`/`ffmpeg` helpers.
pub mod probe;
/// Temporary artifact tracking and cleanup.
pub mod temp;
