use crate::foundation::core::FrameRGBA;
use crate::foundation::error::StoryResult;
use std::path::PathBuf;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: u32,
    /// Optional external raw PCM audio file input.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input configuration for sinks that support audio encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Seconds of audio to use from the start of the file.
    pub duration_secs: f64,
}

/// Sink contract for consuming composited frames in timeline order.
///
/// Ordering contract: `push_frame` is called with strictly increasing frame indices.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StoryResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> StoryResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StoryResult<()>;
}
