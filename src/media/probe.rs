use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::FrameSize;
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::temp::{TempResourceTracker, ensure_parent_dir};

/// Sample rate used for every decoded audio track.
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;
/// Channel count used for every decoded audio track.
pub const AUDIO_CHANNELS: u16 = 2;

#[derive(Clone, Debug, PartialEq)]
/// Basic metadata about a decodable source video file.
pub struct VideoSourceInfo {
    /// Local path used for probing and decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Average frame rate, when ffprobe reports one.
    pub frame_rate: Option<f64>,
    /// Container duration in seconds, when ffprobe reports one.
    pub duration_secs: Option<f64>,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

impl VideoSourceInfo {
    /// Native frame size.
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Decoded audio track stored as interleaved `f32le` PCM in a temporary file.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    /// Path to the raw PCM file.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Length of the decoded PCM in seconds.
    pub duration_secs: f64,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
}

#[derive(serde::Deserialize, Default)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: ProbeFormat,
}

fn run_ffprobe(source_path: &Path) -> StoryResult<ProbeOut> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| StoryError::media_unavailable(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StoryError::media_unavailable(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    serde_json::from_slice(&out.stdout)
        .map_err(|e| StoryError::media_unavailable(format!("ffprobe json parse failed: {e}")))
}

/// Probe source video metadata through `ffprobe`.
///
/// Files without a video stream or with zero-sized frames are reported as unavailable.
pub fn probe_video(source_path: &Path) -> StoryResult<VideoSourceInfo> {
    let parsed = run_ffprobe(source_path)?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StoryError::media_unavailable("no video stream found"))?;
    let width = video_stream.width.unwrap_or(0);
    let height = video_stream.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(StoryError::media_unavailable(format!(
            "video '{}' has invalid dimensions {width}x{height}",
            source_path.display()
        )));
    }
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        frame_rate: parse_frame_rate(video_stream.avg_frame_rate.as_deref()),
        duration_secs: parse_duration(parsed.format.duration.as_deref()),
        has_audio,
    })
}

/// Check that `source_path` has at least one audio stream.
pub fn probe_has_audio(source_path: &Path) -> StoryResult<bool> {
    let parsed = run_ffprobe(source_path)?;
    Ok(parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio")))
}

fn parse_duration(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

fn parse_frame_rate(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Decode the first `max_secs` seconds of audio from `path` into a tracked PCM temp file.
///
/// The output is stereo interleaved `f32le` at [`AUDIO_SAMPLE_RATE`]. The destination path is
/// registered with `tracker` before ffmpeg runs.
pub fn decode_audio_to_pcm_file(
    path: &Path,
    max_secs: f64,
    tracker: &mut TempResourceTracker,
) -> StoryResult<AudioTrack> {
    if !probe_has_audio(path)? {
        return Err(StoryError::media_unavailable(format!(
            "'{}' has no audio stream",
            path.display()
        )));
    }

    let pcm_path = tracker.allocate("audio", "f32le");
    ensure_parent_dir(&pcm_path)?;

    let out = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-t",
            &format!("{max_secs:.6}"),
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &AUDIO_CHANNELS.to_string(),
            "-ar",
            &AUDIO_SAMPLE_RATE.to_string(),
        ])
        .arg(&pcm_path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            StoryError::media_unavailable(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;
    if !out.status.success() {
        return Err(StoryError::media_unavailable(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let bytes = std::fs::metadata(&pcm_path)
        .map_err(|e| StoryError::media_unavailable(format!("decoded audio missing: {e}")))?
        .len();
    let duration_secs = pcm_duration_secs(bytes, AUDIO_SAMPLE_RATE, AUDIO_CHANNELS);
    if duration_secs <= 0.0 {
        return Err(StoryError::media_unavailable(format!(
            "'{}' decoded to an empty audio track",
            path.display()
        )));
    }

    Ok(AudioTrack {
        path: pcm_path,
        sample_rate: AUDIO_SAMPLE_RATE,
        channels: AUDIO_CHANNELS,
        duration_secs,
    })
}

/// Duration in seconds of `bytes` of interleaved `f32` PCM.
pub fn pcm_duration_secs(bytes: u64, sample_rate: u32, channels: u16) -> f64 {
    let frame_bytes = 4 * u64::from(channels);
    if frame_bytes == 0 || sample_rate == 0 {
        return 0.0;
    }
    (bytes / frame_bytes) as f64 / f64::from(sample_rate)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
