use std::path::PathBuf;

use crate::config::StoryConfig;
use crate::foundation::core::{Rgb8, validate_duration};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::acquire::MediaRef;
use crate::text::color::resolve_color;
use crate::text::normalize::normalize_text;

/// Why a render did not produce a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RenderErrorKind {
    /// Empty text or a non-positive size or duration. Nothing was rendered.
    InvalidInput,
    /// Every encode attempt failed.
    EncodingFailed,
}

/// One render job. Immutable once built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    text: String,
    #[serde(default)]
    background_ref: Option<String>,
    #[serde(default)]
    audio_ref: Option<String>,
    #[serde(default = "default_font_size")]
    font_size_pt: u32,
    #[serde(default = "default_text_color")]
    text_color: String,
    #[serde(default = "default_duration")]
    duration_secs: f64,
}

fn default_font_size() -> u32 {
    80
}

fn default_text_color() -> String {
    "#FFFFFF".to_string()
}

fn default_duration() -> f64 {
    15.0
}

/// Batch file entry; absent fields take the configured defaults.
#[derive(serde::Deserialize)]
struct BatchEntry {
    text: String,
    #[serde(default)]
    background_ref: Option<String>,
    #[serde(default)]
    audio_ref: Option<String>,
    #[serde(default)]
    font_size_pt: Option<u32>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    duration_secs: Option<f64>,
}

impl BatchEntry {
    fn into_request(self, cfg: &StoryConfig) -> RenderRequest {
        RenderRequest {
            background_ref: self.background_ref,
            audio_ref: self.audio_ref,
            font_size_pt: self.font_size_pt.unwrap_or(cfg.default_font_size),
            text_color: self
                .text_color
                .unwrap_or_else(|| cfg.default_text_color.clone()),
            duration_secs: self.duration_secs.unwrap_or(cfg.default_duration_secs),
            text: self.text,
        }
    }
}

/// Parse a JSON array of render requests, filling missing fields from `cfg`.
pub fn parse_batch_json(raw: &str, cfg: &StoryConfig) -> StoryResult<Vec<RenderRequest>> {
    let entries: Vec<BatchEntry> = serde_json::from_str(raw)
        .map_err(|e| StoryError::validation(format!("invalid batch json: {e}")))?;
    Ok(entries.into_iter().map(|e| e.into_request(cfg)).collect())
}

impl RenderRequest {
    /// Request for `text` with built-in defaults (80 px white text for 15 seconds).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            background_ref: None,
            audio_ref: None,
            font_size_pt: default_font_size(),
            text_color: default_text_color(),
            duration_secs: default_duration(),
        }
    }

    /// Request for `text` using the defaults from `cfg`.
    pub fn with_config_defaults(text: impl Into<String>, cfg: &StoryConfig) -> Self {
        Self {
            font_size_pt: cfg.default_font_size,
            text_color: cfg.default_text_color.clone(),
            duration_secs: cfg.default_duration_secs,
            ..Self::new(text)
        }
    }

    /// Set the background video reference (local path or URL).
    pub fn with_background(mut self, reference: impl Into<String>) -> Self {
        self.background_ref = Some(reference.into());
        self
    }

    /// Set the audio reference (local path or URL).
    pub fn with_audio(mut self, reference: impl Into<String>) -> Self {
        self.audio_ref = Some(reference.into());
        self
    }

    /// Set the font size in pixels.
    pub fn with_font_size(mut self, font_size_pt: u32) -> Self {
        self.font_size_pt = font_size_pt;
        self
    }

    /// Set the text color (`#RRGGBB` or a named color).
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Set the duration in seconds.
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Background reference, if any.
    pub fn background_ref(&self) -> Option<&str> {
        self.background_ref.as_deref()
    }

    /// Audio reference, if any.
    pub fn audio_ref(&self) -> Option<&str> {
        self.audio_ref.as_deref()
    }

    /// Font size in pixels.
    pub fn font_size_pt(&self) -> u32 {
        self.font_size_pt
    }

    /// Color string as given.
    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Check the request and resolve its derived values. Performs no I/O.
    pub fn validate(&self) -> StoryResult<ValidatedRequest> {
        let text = normalize_text(&self.text);
        if text.is_empty() {
            return Err(StoryError::validation("text is empty"));
        }
        if self.font_size_pt == 0 {
            return Err(StoryError::validation("font size must be > 0"));
        }
        let duration_secs = validate_duration(self.duration_secs)?;
        Ok(ValidatedRequest {
            text,
            background: self.background_ref.as_deref().and_then(MediaRef::parse),
            audio: self.audio_ref.as_deref().and_then(MediaRef::parse),
            font_size_pt: self.font_size_pt,
            color: resolve_color(&self.text_color),
            duration_secs,
        })
    }
}

/// A request after validation: normalized text and parsed references.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    /// Normalized, non-empty text.
    pub text: String,
    /// Background reference.
    pub background: Option<MediaRef>,
    /// Audio reference.
    pub audio: Option<MediaRef>,
    /// Font size in pixels.
    pub font_size_pt: u32,
    /// Resolved text color.
    pub color: Rgb8,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Outcome of one render call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderResult {
    /// Whether a video was written.
    pub success: bool,
    /// Written file on success.
    pub output_path: Option<PathBuf>,
    /// Failure classification.
    pub error_kind: Option<RenderErrorKind>,
    /// Human-readable failure detail.
    pub detail: Option<String>,
}

impl RenderResult {
    /// Successful render to `path`.
    pub fn succeeded(path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            output_path: Some(path.into()),
            error_kind: None,
            detail: None,
        }
    }

    /// Failed render.
    pub fn failed(kind: RenderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            error_kind: Some(kind),
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/request.rs"]
mod tests;
