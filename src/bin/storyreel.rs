use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    /// JSON config file (defaults apply for anything not set).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a story MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render every request in a JSON array into the output directory.
    Batch(BatchArgs),
    /// Render a still preview as a PNG.
    Preview(PreviewArgs),
    /// Delete stale temp files.
    Sweep,
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Poem text.
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the poem text from a file.
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long)]
    font_size: Option<u32>,

    /// Text color: `#RRGGBB` or a named color.
    #[arg(long)]
    color: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    text: TextArgs,

    /// Background video path or URL.
    #[arg(long)]
    video: Option<String>,

    /// Background audio path or URL.
    #[arg(long)]
    audio: Option<String>,

    /// Duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Output MP4 path (defaults to a unique name in the output directory).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON array of render requests.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory for the rendered videos (defaults to the configured output directory).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write per-item results as JSON.
    #[arg(long)]
    results: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    text: TextArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Batch(args) => cmd_batch(config, args),
        Command::Preview(args) => cmd_preview(config, args),
        Command::Sweep => cmd_sweep(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<storyreel::StoryConfig> {
    let cfg = match path {
        Some(p) => storyreel::StoryConfig::from_path(p)?,
        None => storyreel::StoryConfig::default(),
    };
    Ok(cfg.with_env())
}

fn read_text(args: &TextArgs) -> anyhow::Result<String> {
    match (&args.text, &args.text_file) {
        (Some(t), _) => Ok(t.clone()),
        (None, Some(p)) => {
            std::fs::read_to_string(p).with_context(|| format!("read text '{}'", p.display()))
        }
        (None, None) => anyhow::bail!("one of --text or --text-file is required"),
    }
}

fn cmd_render(config: storyreel::StoryConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut request =
        storyreel::RenderRequest::with_config_defaults(read_text(&args.text)?, &config);
    if let Some(size) = args.text.font_size {
        request = request.with_font_size(size);
    }
    if let Some(color) = args.text.color {
        request = request.with_text_color(color);
    }
    if let Some(duration) = args.duration {
        request = request.with_duration(duration);
    }
    if let Some(video) = args.video {
        request = request.with_background(video);
    }
    if let Some(audio) = args.audio {
        request = request.with_audio(audio);
    }

    let renderer = storyreel::Renderer::new(config);
    let result = match args.out {
        Some(out) => renderer.render(&request, &out),
        None => renderer.render_to_output_dir(&request),
    };
    match (result.success, result.output_path) {
        (true, Some(path)) => {
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        _ => anyhow::bail!(
            "render failed ({:?}): {}",
            result.error_kind,
            result.detail.unwrap_or_default()
        ),
    }
}

fn cmd_batch(config: storyreel::StoryConfig, args: BatchArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read batch '{}'", args.in_path.display()))?;
    let requests = storyreel::parse_batch_json(&raw, &config).context("parse batch json")?;

    let out_dir = args.out_dir.unwrap_or_else(|| config.output_dir.clone());
    let renderer = storyreel::Renderer::new(config);
    let results = renderer.render_batch(&requests, &out_dir);
    let summary = storyreel::BatchSummary::from_results(&results);

    if let Some(path) = args.results {
        let doc = serde_json::json!({ "summary": summary, "results": results });
        std::fs::write(&path, serde_json::to_vec_pretty(&doc)?)
            .with_context(|| format!("write results '{}'", path.display()))?;
    }
    eprintln!(
        "batch: {} total, {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    Ok(())
}

fn cmd_preview(config: storyreel::StoryConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let text = read_text(&args.text)?;
    let font_size = args.text.font_size.unwrap_or(config.default_font_size);
    let color = args
        .text
        .color
        .unwrap_or_else(|| config.default_text_color.clone());
    let renderer = storyreel::Renderer::new(config);
    let img = renderer.preview(&text, font_size, &color);
    storyreel::write_preview_png(&img, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(config: &storyreel::StoryConfig) -> anyhow::Result<()> {
    let removed = storyreel::sweep_stale_temp_files(&config.temp_dir, config.stale_temp_age());
    eprintln!("removed {removed} stale temp files from {}", config.temp_dir.display());
    Ok(())
}
