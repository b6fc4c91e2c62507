use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{ProviderCredential, StoryConfig};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::probe::{AudioTrack, VideoSourceInfo, decode_audio_to_pcm_file, probe_video};
use crate::media::temp::{TempResourceTracker, ensure_parent_dir};

/// Where a background or audio asset comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaRef {
    /// An existing local file.
    Local(PathBuf),
    /// An `http`/`https` URL that is downloaded first.
    Remote(String),
}

impl MediaRef {
    /// Interpret a user-supplied reference. Blank references mean "none".
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(Self::Remote(reference.to_string()))
        } else {
            Some(Self::Local(PathBuf::from(reference)))
        }
    }
}

/// Kind of asset being fetched; selects timeout and default file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Background video.
    Video,
    /// Background audio.
    Audio,
}

impl MediaKind {
    fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio_src",
        }
    }

    fn default_extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }
}

/// Resolves [`MediaRef`]s into local, probed media.
#[derive(Clone, Debug)]
pub struct MediaAcquirer {
    video_timeout: Duration,
    audio_timeout: Duration,
    user_agent: String,
    credentials: Vec<ProviderCredential>,
}

impl MediaAcquirer {
    /// Build an acquirer from process settings.
    pub fn from_config(cfg: &StoryConfig) -> Self {
        Self {
            video_timeout: cfg.video_timeout(),
            audio_timeout: cfg.audio_timeout(),
            user_agent: cfg.user_agent.clone(),
            credentials: cfg.credentials.clone(),
        }
    }

    fn timeout(&self, kind: MediaKind) -> Duration {
        match kind {
            MediaKind::Video => self.video_timeout,
            MediaKind::Audio => self.audio_timeout,
        }
    }

    /// Make `media` available as a local file.
    ///
    /// Remote media is streamed into a file allocated from `tracker`; local media is used in
    /// place and must exist.
    pub fn fetch(
        &self,
        media: &MediaRef,
        kind: MediaKind,
        tracker: &mut TempResourceTracker,
    ) -> StoryResult<PathBuf> {
        match media {
            MediaRef::Local(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(StoryError::media_unavailable(format!(
                        "local file '{}' does not exist",
                        path.display()
                    )))
                }
            }
            MediaRef::Remote(url) => self.download(url, kind, tracker),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, tracker))]
    fn download(
        &self,
        url: &str,
        kind: MediaKind,
        tracker: &mut TempResourceTracker,
    ) -> StoryResult<PathBuf> {
        let ext = extension_from_url(url).unwrap_or_else(|| kind.default_extension().to_string());
        let dest = tracker.allocate(kind.label(), &ext);

        let client = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout(kind))
            .build()
            .map_err(|e| StoryError::media_unavailable(format!("http client setup failed: {e}")))?;

        let mut request = client.get(url);
        if let Some(cred) = credential_for(url, &self.credentials) {
            tracing::debug!(domain = %cred.domain, header = %cred.header, "attaching credential");
            request = request.header(cred.header.as_str(), cred.value.as_str());
        }

        let mut response = request
            .send()
            .map_err(|e| StoryError::media_unavailable(format!("GET {url} failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoryError::media_unavailable(format!(
                "GET {url} returned {status}"
            )));
        }

        ensure_parent_dir(&dest)?;
        let mut file = std::fs::File::create(&dest).map_err(|e| {
            StoryError::media_unavailable(format!("create '{}': {e}", dest.display()))
        })?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| StoryError::media_unavailable(format!("download {url} failed: {e}")))?;
        if bytes == 0 {
            return Err(StoryError::media_unavailable(format!("GET {url} returned no data")));
        }
        tracing::info!(bytes, path = %dest.display(), "downloaded media");
        Ok(dest)
    }

    /// Fetch and probe a background video.
    pub fn acquire_video(
        &self,
        media: &MediaRef,
        tracker: &mut TempResourceTracker,
    ) -> StoryResult<VideoSourceInfo> {
        let path = self.fetch(media, MediaKind::Video, tracker)?;
        probe_video(&path)
    }

    /// Fetch background audio and decode at most `max_secs` of it.
    pub fn acquire_audio(
        &self,
        media: &MediaRef,
        max_secs: f64,
        tracker: &mut TempResourceTracker,
    ) -> StoryResult<AudioTrack> {
        let path = self.fetch(media, MediaKind::Audio, tracker)?;
        decode_audio_to_pcm_file(&path, max_secs, tracker)
    }
}

/// Credential whose domain matches the URL host exactly or as a parent domain.
pub fn credential_for<'a>(
    url: &str,
    credentials: &'a [ProviderCredential],
) -> Option<&'a ProviderCredential> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    credentials.iter().find(|c| {
        let domain = c.domain.trim().trim_start_matches('.').to_ascii_lowercase();
        !domain.is_empty()
            && (host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

fn extension_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.last()?;
    let ext = Path::new(last).extension()?.to_str()?;
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_ascii_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/media/acquire.rs"]
mod tests;
