use crate::foundation::core::{FrameSize, Resolved};
use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::premul_over_opaque_in_place;
use crate::media::background::BackgroundClip;
use crate::media::fallback::fallback_clip;
use crate::media::probe::AudioTrack;
use crate::text::raster::TextLayer;

/// Lifecycle of one composition. States only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompositorState {
    /// Nothing resolved yet.
    Idle,
    /// Background resolved and trimmed.
    BackgroundReady,
    /// Text layer sized to the background.
    TextLayered,
    /// Audio attached.
    AudioAttached,
    /// Ready for encoding.
    Composited,
    /// Written to disk.
    Encoded,
    /// Encoding failed.
    Failed,
}

/// Background, text layer and optional audio ready for the encoder.
#[derive(Clone, Debug)]
pub struct CompositedUnit {
    /// Background clip.
    pub background: BackgroundClip,
    /// Text layer matching [`CompositedUnit::frame_size`].
    pub text_layer: TextLayer,
    /// Audio track, already trimmed to the duration.
    pub audio: Option<AudioTrack>,
    /// Render duration in seconds.
    pub duration_secs: f64,
}

impl CompositedUnit {
    /// Encoded frame size: the background size rounded down to even dimensions.
    pub fn frame_size(&self) -> FrameSize {
        self.background.size().even()
    }
}

/// Composite a premultiplied text layer over an opaque background frame in place.
pub fn composite_frame(background: &mut [u8], text: &TextLayer) -> StoryResult<()> {
    if background.len() != text.rgba8_premul.len() {
        return Err(StoryError::validation(format!(
            "frame/text layer size mismatch: {} vs {} bytes",
            background.len(),
            text.rgba8_premul.len()
        )));
    }
    premul_over_opaque_in_place(background, &text.rgba8_premul);
    Ok(())
}

/// Trim `audio` to `duration_secs`; drop it when nothing audible remains.
pub fn reconcile_audio(audio: AudioTrack, duration_secs: f64) -> Option<AudioTrack> {
    let trimmed = audio.duration_secs.min(duration_secs);
    if !trimmed.is_finite() || trimmed <= 0.0 {
        tracing::info!(
            audio_secs = audio.duration_secs,
            "audio has no positive duration, omitting"
        );
        return None;
    }
    Some(AudioTrack {
        duration_secs: trimmed,
        ..audio
    })
}

/// Runs one render's composition exactly once.
#[derive(Debug)]
pub struct Compositor {
    state: CompositorState,
    duration_secs: f64,
    background: Option<BackgroundClip>,
    text_layer: Option<TextLayer>,
    audio: Option<AudioTrack>,
}

impl Compositor {
    /// Start a composition for `duration_secs`.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            state: CompositorState::Idle,
            duration_secs,
            background: None,
            text_layer: None,
            audio: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    fn advance(&mut self, from: &[CompositorState], to: CompositorState) -> StoryResult<()> {
        if !from.contains(&self.state) {
            return Err(StoryError::validation(format!(
                "compositor cannot move from {:?} to {to:?}",
                self.state
            )));
        }
        tracing::debug!(from = ?self.state, ?to, "compositor transition");
        self.state = to;
        Ok(())
    }

    /// Accept the resolved background, trim it to the duration and revalidate its size.
    ///
    /// A clip with a zero dimension is replaced by the solid fallback.
    pub fn set_background(&mut self, clip: Resolved<BackgroundClip>) -> StoryResult<FrameSize> {
        self.advance(&[CompositorState::Idle], CompositorState::BackgroundReady)?;
        if let Some(reason) = clip.reason() {
            tracing::info!(%reason, "using substituted background");
        }
        let clip = clip.into_value();
        let clip = if clip.size().is_valid() {
            match clip {
                BackgroundClip::Video { info, .. } => BackgroundClip::Video {
                    info,
                    duration_secs: self.duration_secs,
                },
                BackgroundClip::Solid { size, color, .. } => BackgroundClip::Solid {
                    size,
                    color,
                    duration_secs: self.duration_secs,
                },
            }
        } else {
            tracing::warn!(size = ?clip.size(), "background has invalid dimensions, using fallback");
            fallback_clip(self.duration_secs)
        };
        let size = clip.size().even();
        self.background = Some(clip);
        Ok(size)
    }

    /// Size text layers must have.
    pub fn frame_size(&self) -> Option<FrameSize> {
        self.background.as_ref().map(|b| b.size().even())
    }

    /// Attach the text layer, resampling it if it does not match the background.
    pub fn layer_text(&mut self, layer: TextLayer) -> StoryResult<()> {
        self.advance(&[CompositorState::BackgroundReady], CompositorState::TextLayered)?;
        let target = self
            .frame_size()
            .ok_or_else(|| StoryError::validation("text layered before background"))?;
        let layer = if layer.size == target {
            layer
        } else {
            tracing::debug!(from = ?layer.size, to = ?target, "resizing text layer");
            layer.resized(target)
        };
        self.text_layer = Some(layer);
        Ok(())
    }

    /// Attach an audio track if it has a positive duration after trimming.
    ///
    /// Returns whether audio was attached.
    pub fn attach_audio(&mut self, audio: AudioTrack) -> StoryResult<bool> {
        self.advance(&[CompositorState::TextLayered], CompositorState::AudioAttached)?;
        self.audio = reconcile_audio(audio, self.duration_secs);
        Ok(self.audio.is_some())
    }

    /// Merge everything into a [`CompositedUnit`].
    pub fn composite(&mut self) -> StoryResult<CompositedUnit> {
        self.advance(
            &[CompositorState::TextLayered, CompositorState::AudioAttached],
            CompositorState::Composited,
        )?;
        let background = self
            .background
            .take()
            .ok_or_else(|| StoryError::validation("missing background"))?;
        let text_layer = self
            .text_layer
            .take()
            .ok_or_else(|| StoryError::validation("missing text layer"))?;
        Ok(CompositedUnit {
            background,
            text_layer,
            audio: self.audio.take(),
            duration_secs: self.duration_secs,
        })
    }

    /// Record the encoder outcome.
    pub fn finish(&mut self, encoded: bool) -> StoryResult<()> {
        let to = if encoded {
            CompositorState::Encoded
        } else {
            CompositorState::Failed
        };
        self.advance(&[CompositorState::Composited], to)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
