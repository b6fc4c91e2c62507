use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::FrameSize;
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::background::BackgroundClip;
use crate::media::fallback::{FALLBACK_COLOR, solid_frame};
use crate::media::probe::VideoSourceInfo;

/// Produces opaque straight-alpha RGBA8 background frames in timeline order.
pub trait FrameSource {
    /// Size of every produced frame.
    fn size(&self) -> FrameSize;
    /// Next frame. Sources that run out keep returning their last frame.
    fn next_frame(&mut self) -> StoryResult<&[u8]>;
}

/// The same solid frame forever.
pub struct SolidFrames {
    size: FrameSize,
    frame: Vec<u8>,
}

impl FrameSource for SolidFrames {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> StoryResult<&[u8]> {
        Ok(&self.frame)
    }
}

/// Frames streamed from an `ffmpeg` child decoding a video at a fixed rate and size.
pub struct DecodedFrames {
    size: FrameSize,
    child: Child,
    stdout: ChildStdout,
    frame: Vec<u8>,
    scratch: Vec<u8>,
    decoded: u64,
    exhausted: bool,
    primed: bool,
}

impl DecodedFrames {
    /// Start decoding `source` scaled to `size`, resampled to `fps`, limited to `duration_secs`.
    pub fn spawn(
        source: &VideoSourceInfo,
        size: FrameSize,
        fps: u32,
        duration_secs: f64,
    ) -> StoryResult<Self> {
        if !size.is_valid() || fps == 0 {
            return Err(StoryError::validation(format!(
                "invalid decode target {}x{} at {fps} fps",
                size.width, size.height
            )));
        }
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&source.source_path)
            .args([
                "-an",
                "-t",
                &format!("{duration_secs:.6}"),
                "-vf",
                &format!("fps={fps},scale={}:{}", size.width, size.height),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                StoryError::encoding(format!("failed to spawn ffmpeg for video decode: {e}"))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StoryError::encoding("failed to open ffmpeg stdout (unexpected)"))?;

        Ok(Self {
            size,
            child,
            stdout,
            frame: vec![0u8; size.rgba_len()],
            scratch: vec![0u8; size.rgba_len()],
            decoded: 0,
            exhausted: false,
            primed: false,
        })
    }

    /// Frames read from the decoder so far.
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Read the first frame ahead of time; the next [`FrameSource::next_frame`] returns it.
    ///
    /// Fails with `MediaUnavailable` when the decoder produces no frame at all.
    pub fn prime(&mut self) -> StoryResult<()> {
        if self.decoded == 0 {
            self.next_frame()?;
            self.primed = true;
        }
        Ok(())
    }
}

impl FrameSource for DecodedFrames {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn next_frame(&mut self) -> StoryResult<&[u8]> {
        if self.exhausted {
            return Ok(&self.frame);
        }
        if self.primed {
            self.primed = false;
            return Ok(&self.frame);
        }
        // A short read leaves `scratch` partially written, so only a full frame replaces `frame`.
        match self.stdout.read_exact(&mut self.scratch) {
            Ok(()) => {
                std::mem::swap(&mut self.frame, &mut self.scratch);
                self.decoded += 1;
                Ok(&self.frame)
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof && self.decoded > 0 => {
                tracing::debug!(frames = self.decoded, "background ended early, holding last frame");
                self.exhausted = true;
                Ok(&self.frame)
            }
            Err(e) if self.decoded == 0 => Err(StoryError::media_unavailable(format!(
                "background decode produced no frames: {e}"
            ))),
            Err(e) => Err(StoryError::encoding(format!("background decode failed: {e}"))),
        }
    }
}

impl Drop for DecodedFrames {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Check that `source` decodes to at least one frame.
pub fn ensure_decodable(source: &VideoSourceInfo) -> StoryResult<()> {
    let mut frames = DecodedFrames::spawn(source, FrameSize::new(16, 16), 24, 1.0)?;
    frames.prime()
}

/// Open a frame source for `clip` producing frames of `size` at `fps`.
///
/// A video that decodes to no frames is replaced by solid fallback frames.
pub fn open_frames(
    clip: &BackgroundClip,
    size: FrameSize,
    fps: u32,
) -> StoryResult<Box<dyn FrameSource>> {
    match clip {
        BackgroundClip::Solid { color, .. } => Ok(Box::new(SolidFrames {
            size,
            frame: solid_frame(size, *color),
        })),
        BackgroundClip::Video {
            info,
            duration_secs,
        } => {
            let mut frames = DecodedFrames::spawn(info, size, fps, *duration_secs)?;
            match frames.prime() {
                Ok(()) => Ok(Box::new(frames)),
                Err(StoryError::MediaUnavailable(reason)) => {
                    tracing::warn!(
                        source = %info.source_path.display(),
                        %reason,
                        "background produced no frames, using solid fallback"
                    );
                    Ok(Box::new(SolidFrames {
                        size,
                        frame: solid_frame(size, FALLBACK_COLOR),
                    }))
                }
                Err(e) => Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/frames.rs"]
mod tests;
