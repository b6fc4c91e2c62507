use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::StoryResult;
use crate::text::fonts::default_font_candidates;

/// Browser-like user agent; some stock footage hosts reject unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Extra header sent with downloads from one media host.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProviderCredential {
    /// Host suffix the credential applies to, e.g. `pexels.com`.
    pub domain: String,
    /// Header name.
    pub header: String,
    /// Header value.
    pub value: String,
}

/// Process-level settings for rendering.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Directory for downloaded media and decoded audio.
    pub temp_dir: PathBuf,
    /// Directory for generated videos when no explicit output path is given.
    pub output_dir: PathBuf,
    /// Font files tried in order.
    pub font_candidates: Vec<PathBuf>,
    /// Append discovered system fonts after `font_candidates`.
    pub discover_system_fonts: bool,
    /// Timeout for background video downloads.
    pub video_timeout_secs: u64,
    /// Timeout for audio downloads.
    pub audio_timeout_secs: u64,
    /// `User-Agent` sent with downloads.
    pub user_agent: String,
    /// Per-host extra headers.
    pub credentials: Vec<ProviderCredential>,
    /// Font size used when a request does not specify one.
    pub default_font_size: u32,
    /// Text color used when a request does not specify one.
    pub default_text_color: String,
    /// Duration used when a request does not specify one.
    pub default_duration_secs: f64,
    /// Age after which leftover temp files are swept.
    pub stale_temp_age_secs: u64,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("storyreel"),
            output_dir: PathBuf::from("outputs"),
            font_candidates: default_font_candidates(),
            discover_system_fonts: true,
            video_timeout_secs: 30,
            audio_timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials: Vec::new(),
            default_font_size: 80,
            default_text_color: "#FFFFFF".to_string(),
            default_duration_secs: 15.0,
            stale_temp_age_secs: 3600,
        }
    }
}

impl StoryConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> StoryResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Parse a JSON config document.
    pub fn from_json_str(raw: &str) -> StoryResult<Self> {
        let cfg = serde_json::from_str(raw).context("parse config json")?;
        Ok(cfg)
    }

    /// Overlay settings from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay settings from `lookup`.
    ///
    /// Recognized keys: `STORYREEL_TEMP_DIR`, `STORYREEL_OUTPUT_DIR` and `PEXELS_API_KEY`.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("STORYREEL_TEMP_DIR").filter(|v| !v.is_empty()) {
            self.temp_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("STORYREEL_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("PEXELS_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.credentials.retain(|c| c.domain != "pexels.com");
            self.credentials.push(ProviderCredential {
                domain: "pexels.com".to_string(),
                header: "Authorization".to_string(),
                value: key.trim().to_string(),
            });
        }
        self
    }

    /// Download timeout for background videos.
    pub fn video_timeout(&self) -> Duration {
        Duration::from_secs(self.video_timeout_secs)
    }

    /// Download timeout for audio.
    pub fn audio_timeout(&self) -> Duration {
        Duration::from_secs(self.audio_timeout_secs)
    }

    /// Age threshold for [`crate::sweep_stale_temp_files`].
    pub fn stale_temp_age(&self) -> Duration {
        Duration::from_secs(self.stale_temp_age_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
