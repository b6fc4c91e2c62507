use std::path::{Path, PathBuf};

use crate::compose::compositor::Compositor;
use crate::config::StoryConfig;
use crate::encode::ladder::{EncodeReport, Encoder};
use crate::foundation::error::StoryResult;
use crate::media::acquire::MediaAcquirer;
use crate::media::background::resolve_background;
use crate::media::temp::{TempResourceTracker, unique_output_path};
use crate::render::preview::render_preview;
use crate::render::request::{RenderErrorKind, RenderRequest, RenderResult, ValidatedRequest};
use crate::text::fonts::discovered_system_fonts;
use crate::text::layout::TextLayoutEngine;
use crate::text::raster::rasterize_text;

/// Output file prefix for single renders.
pub const STORY_PREFIX: &str = "story";
/// Output file prefix for batch renders.
pub const BATCH_PREFIX: &str = "batch_story";

/// Renders poem text over a background into story videos.
///
/// A `Renderer` holds configuration only; every call gets its own compositor and temp
/// tracker, so one instance can serve concurrent callers.
pub struct Renderer {
    config: StoryConfig,
    fonts: Vec<PathBuf>,
    acquirer: MediaAcquirer,
    encoder: Encoder,
}

impl Renderer {
    /// Build a renderer. System font discovery runs here at most once per process.
    pub fn new(config: StoryConfig) -> Self {
        let mut fonts = config.font_candidates.clone();
        if config.discover_system_fonts {
            fonts.extend(
                discovered_system_fonts()
                    .iter()
                    .filter(|p| !config.font_candidates.contains(*p))
                    .cloned(),
            );
        }
        Self {
            acquirer: MediaAcquirer::from_config(&config),
            encoder: Encoder::default(),
            fonts,
            config,
        }
    }

    /// Replace the encoder.
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Replace the ordered font candidate list.
    pub fn with_font_candidates(mut self, fonts: Vec<PathBuf>) -> Self {
        self.fonts = fonts;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Font files tried in order.
    pub fn font_candidates(&self) -> &[PathBuf] {
        &self.fonts
    }

    /// Render `request` to `output_path`.
    ///
    /// Invalid requests fail before any file I/O. Media and font problems degrade the output
    /// instead of failing it; only an exhausted encoder ladder fails a valid request. Temp
    /// files created by the call are removed before it returns.
    #[tracing::instrument(skip(self, request), fields(output = %output_path.display()))]
    pub fn render(&self, request: &RenderRequest, output_path: &Path) -> RenderResult {
        let valid = match request.validate() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting render request");
                return RenderResult::failed(RenderErrorKind::InvalidInput, e.to_string());
            }
        };

        let mut tracker = TempResourceTracker::new(&self.config.temp_dir);
        let outcome = self.run(&valid, output_path, &mut tracker);
        let leftover = tracker.cleanup();
        if leftover > 0 {
            tracing::warn!(leftover, "some temp files could not be removed");
        }

        match outcome {
            Ok(report) => {
                tracing::info!(
                    attempt = report.attempt,
                    width = report.size.width,
                    height = report.size.height,
                    fps = report.fps,
                    audio = report.with_audio,
                    "render complete"
                );
                RenderResult::succeeded(output_path)
            }
            Err(e) => {
                tracing::error!(error = %e, "render failed");
                RenderResult::failed(RenderErrorKind::EncodingFailed, e.to_string())
            }
        }
    }

    fn run(
        &self,
        valid: &ValidatedRequest,
        output_path: &Path,
        tracker: &mut TempResourceTracker,
    ) -> StoryResult<EncodeReport> {
        let duration = valid.duration_secs;
        let mut compositor = Compositor::new(duration);

        let background =
            resolve_background(&self.acquirer, valid.background.as_ref(), duration, tracker);
        let frame_size = compositor.set_background(background)?;

        let mut engine =
            TextLayoutEngine::with_candidates(&self.fonts, valid.font_size_pt).into_value();
        let layout = engine.layout(&valid.text, frame_size);
        let layer = rasterize_text(&mut engine, &layout, valid.color).into_value();
        compositor.layer_text(layer)?;

        if let Some(audio_ref) = valid.audio.as_ref() {
            match self.acquirer.acquire_audio(audio_ref, duration, tracker) {
                Ok(track) => {
                    compositor.attach_audio(track)?;
                }
                Err(e) => tracing::warn!(error = %e, "audio unavailable, rendering silent video"),
            }
        }

        let unit = compositor.composite()?;
        let encoded = self.encoder.encode(&unit, output_path);
        compositor.finish(encoded.is_ok())?;
        encoded
    }

    /// Render into a uniquely named file in the configured output directory.
    pub fn render_to_output_dir(&self, request: &RenderRequest) -> RenderResult {
        let path = unique_output_path(&self.config.output_dir, STORY_PREFIX);
        self.render(request, &path)
    }

    /// Render each request into a unique file under `output_dir`, in order.
    ///
    /// One failing item never stops the batch.
    pub fn render_batch(&self, requests: &[RenderRequest], output_dir: &Path) -> Vec<RenderResult> {
        let total = requests.len();
        requests
            .iter()
            .enumerate()
            .map(|(i, request)| {
                tracing::info!(item = i + 1, total, "batch item");
                let path = unique_output_path(output_dir, BATCH_PREFIX);
                self.render(request, &path)
            })
            .collect()
    }

    /// Still preview of `text` using this renderer's fonts.
    pub fn preview(&self, text: &str, font_size_pt: u32, color: &str) -> image::RgbaImage {
        render_preview(&self.fonts, text, font_size_pt, color)
    }
}

/// Counts of a batch run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    /// Items attempted.
    pub total: usize,
    /// Items that produced a video.
    pub succeeded: usize,
    /// Items that failed.
    pub failed: usize,
}

impl BatchSummary {
    /// Tally `results`.
    pub fn from_results(results: &[RenderResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
