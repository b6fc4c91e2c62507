use std::borrow::Cow;
use std::path::Path;

use crate::compose::compositor::{CompositedUnit, composite_frame};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, RateControl};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{FrameRGBA, FrameSize};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::frames::open_frames;
use crate::text::raster::TextLayer;

/// Long-edge ceiling applied by the conservative attempt.
pub const SAFE_LONG_EDGE: u32 = 1920;

/// Settings for one encode attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeAttempt {
    /// 1-based position in the ladder.
    pub number: u8,
    /// Short name for logs.
    pub name: &'static str,
    /// Output frame rate.
    pub fps: u32,
    /// Video rate control.
    pub rate: RateControl,
    /// `libx264` preset.
    pub preset: &'static str,
    /// Whether the audio track is muxed.
    pub with_audio: bool,
    /// Downscale so the long edge fits this ceiling.
    pub max_long_edge: Option<u32>,
}

impl EncodeAttempt {
    /// Output size for a composited unit of `frame_size`.
    pub fn output_size(&self, frame_size: FrameSize) -> FrameSize {
        match self.max_long_edge {
            Some(max) => frame_size.fit_long_edge(max).even(),
            None => frame_size.even(),
        }
    }
}

/// The fixed sequence of attempts, from full quality to most conservative.
pub fn ladder() -> [EncodeAttempt; 3] {
    [
        EncodeAttempt {
            number: 1,
            name: "full",
            fps: 24,
            rate: RateControl::Crf(23),
            preset: "medium",
            with_audio: true,
            max_long_edge: None,
        },
        EncodeAttempt {
            number: 2,
            name: "no-audio",
            fps: 24,
            rate: RateControl::Crf(23),
            preset: "medium",
            with_audio: false,
            max_long_edge: None,
        },
        EncodeAttempt {
            number: 3,
            name: "conservative",
            fps: 15,
            rate: RateControl::BitrateKbps(1500),
            preset: "ultrafast",
            with_audio: false,
            max_long_edge: Some(SAFE_LONG_EDGE),
        },
    ]
}

/// Number of frames for `duration_secs` at `fps`; never zero.
pub fn frame_count(duration_secs: f64, fps: u32) -> u64 {
    let n = (duration_secs * f64::from(fps)).round();
    if n.is_finite() && n >= 1.0 { n as u64 } else { 1 }
}

/// Opens the sink each attempt writes into.
pub trait SinkProvider: Send + Sync {
    /// Create a sink writing to `out_path` with `attempt`'s settings.
    fn open(&self, attempt: &EncodeAttempt, out_path: &Path) -> StoryResult<Box<dyn FrameSink>>;
}

/// Provides [`FfmpegSink`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegSinkProvider;

impl SinkProvider for FfmpegSinkProvider {
    fn open(&self, attempt: &EncodeAttempt, out_path: &Path) -> StoryResult<Box<dyn FrameSink>> {
        let opts = FfmpegSinkOpts {
            out_path: out_path.to_path_buf(),
            overwrite: true,
            preset: attempt.preset.to_string(),
            rate: attempt.rate,
        };
        Ok(Box::new(FfmpegSink::new(opts)))
    }
}

/// What the successful attempt produced.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeReport {
    /// Which attempt succeeded.
    pub attempt: u8,
    /// Output frame size.
    pub size: FrameSize,
    /// Output frame rate.
    pub fps: u32,
    /// Whether audio was muxed.
    pub with_audio: bool,
    /// Frames written.
    pub frames: u64,
}

/// Writes composited units, walking the attempt ladder until one succeeds.
pub struct Encoder {
    provider: Box<dyn SinkProvider>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(Box::new(FfmpegSinkProvider))
    }
}

impl Encoder {
    /// Create an encoder that opens sinks through `provider`.
    pub fn new(provider: Box<dyn SinkProvider>) -> Self {
        Self { provider }
    }

    /// Encode `unit` to `out_path`.
    ///
    /// Partial output from a failed attempt is removed before the next one. Fails with
    /// [`StoryError::Encoding`] only when every attempt fails.
    pub fn encode(&self, unit: &CompositedUnit, out_path: &Path) -> StoryResult<EncodeReport> {
        let attempts = ladder();
        let mut last_error = None;
        for attempt in &attempts {
            match self.try_attempt(unit, attempt, out_path) {
                Ok(report) => {
                    tracing::info!(
                        attempt = attempt.number,
                        name = attempt.name,
                        frames = report.frames,
                        "encode succeeded"
                    );
                    return Ok(report);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt.number,
                        name = attempt.name,
                        fps = attempt.fps,
                        rate = ?attempt.rate,
                        preset = attempt.preset,
                        with_audio = attempt.with_audio,
                        max_long_edge = ?attempt.max_long_edge,
                        error = %e,
                        "encode attempt failed"
                    );
                    remove_partial_output(out_path);
                    last_error = Some(e);
                }
            }
        }
        let detail = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(StoryError::encoding(format!(
            "all {} encode attempts failed; last error: {detail}",
            attempts.len()
        )))
    }

    fn try_attempt(
        &self,
        unit: &CompositedUnit,
        attempt: &EncodeAttempt,
        out_path: &Path,
    ) -> StoryResult<EncodeReport> {
        let size = attempt.output_size(unit.frame_size());
        let text: Cow<'_, TextLayer> = if unit.text_layer.size == size {
            Cow::Borrowed(&unit.text_layer)
        } else {
            tracing::debug!(from = ?unit.text_layer.size, to = ?size, "downscaling text layer");
            Cow::Owned(unit.text_layer.resized(size))
        };

        let audio = if attempt.with_audio {
            unit.audio.as_ref().map(|a| AudioInputConfig {
                path: a.path.clone(),
                sample_rate: a.sample_rate,
                channels: a.channels,
                duration_secs: a.duration_secs,
            })
        } else {
            None
        };
        let with_audio = audio.is_some();

        let mut sink = self.provider.open(attempt, out_path)?;
        let mut frames = open_frames(&unit.background, size, attempt.fps)?;
        sink.begin(SinkConfig {
            width: size.width,
            height: size.height,
            fps: attempt.fps,
            audio,
        })?;

        let total = frame_count(unit.duration_secs, attempt.fps);
        let mut frame = FrameRGBA {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.rgba_len()],
            premultiplied: false,
        };
        for idx in 0..total {
            frame.data.copy_from_slice(frames.next_frame()?);
            composite_frame(&mut frame.data, &text)?;
            sink.push_frame(idx, &frame)?;
        }
        sink.end()?;

        Ok(EncodeReport {
            attempt: attempt.number,
            size,
            fps: attempt.fps,
            with_audio,
            frames: total,
        })
    }
}

fn remove_partial_output(out_path: &Path) {
    match std::fs::remove_file(out_path) {
        Ok(()) => tracing::debug!(path = %out_path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %out_path.display(), error = %e, "could not remove partial output"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ladder.rs"]
mod tests;
