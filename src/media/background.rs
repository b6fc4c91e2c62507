use crate::foundation::core::{FrameSize, Resolved, Rgb8};
use crate::media::acquire::{MediaAcquirer, MediaRef};
use crate::media::fallback::fallback_clip;
use crate::media::frames::ensure_decodable;
use crate::media::probe::VideoSourceInfo;
use crate::media::temp::TempResourceTracker;

/// Background the text is composited over, trimmed to the render duration.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundClip {
    /// A decodable video file.
    Video {
        /// Probed source.
        info: VideoSourceInfo,
        /// Playback length used by the render.
        duration_secs: f64,
    },
    /// A single color.
    Solid {
        /// Frame size.
        size: FrameSize,
        /// Fill color.
        color: Rgb8,
        /// Playback length used by the render.
        duration_secs: f64,
    },
}

impl BackgroundClip {
    /// Native frame size.
    pub fn size(&self) -> FrameSize {
        match self {
            Self::Video { info, .. } => info.size(),
            Self::Solid { size, .. } => *size,
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        match self {
            Self::Video { duration_secs, .. } | Self::Solid { duration_secs, .. } => {
                *duration_secs
            }
        }
    }

    /// Return `true` for solid-color clips.
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid { .. })
    }
}

/// Resolve the background for a render of `duration_secs`.
///
/// Missing references and every acquisition, probe or decode failure yield the solid
/// fallback clip.
/// A source longer than the duration is trimmed; a shorter one holds its last frame.
pub fn resolve_background(
    acquirer: &MediaAcquirer,
    reference: Option<&MediaRef>,
    duration_secs: f64,
    tracker: &mut TempResourceTracker,
) -> Resolved<BackgroundClip> {
    let Some(media) = reference else {
        return Resolved::substituted(fallback_clip(duration_secs), "no background video given");
    };
    let acquired = acquirer
        .acquire_video(media, tracker)
        .and_then(|info| ensure_decodable(&info).map(|()| info));
    match acquired {
        Ok(info) => {
            if let Some(src) = info.duration_secs
                && src < duration_secs
            {
                tracing::debug!(
                    source_secs = src,
                    duration_secs,
                    "background shorter than render, holding last frame"
                );
            }
            Resolved::Primary(BackgroundClip::Video {
                info,
                duration_secs,
            })
        }
        Err(e) => {
            tracing::warn!(error = %e, "background video unavailable, using solid fallback");
            Resolved::substituted(fallback_clip(duration_secs), e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/background.rs"]
mod tests;
