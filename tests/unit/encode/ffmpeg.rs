use super::*;
use crate::encode::sink::AudioInputConfig;

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn cfg(audio: Option<AudioInputConfig>) -> SinkConfig {
    SinkConfig {
        width: 1080,
        height: 1920,
        fps: 24,
        audio,
    }
}

#[test]
fn crf_command_without_audio() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/story.mp4"));
    let args = args_of(&sink.build_command(&cfg(None)).unwrap());
    let joined = args.join(" ");
    assert!(joined.contains("-s 1080x1920"));
    assert!(joined.contains("-r 24"));
    assert!(joined.contains("-an"));
    assert!(joined.contains("-preset medium"));
    assert!(joined.contains("-crf 23"));
    assert!(joined.contains("-pix_fmt yuv420p"));
    assert!(joined.contains("+faststart"));
    assert_eq!(args.last().map(String::as_str), Some("out/story.mp4"));
}

#[test]
fn bitrate_command_with_audio() {
    let mut opts = FfmpegSinkOpts::new("o.mp4");
    opts.preset = "ultrafast".to_string();
    opts.rate = RateControl::BitrateKbps(1500);
    let sink = FfmpegSink::new(opts);
    let audio = AudioInputConfig {
        path: PathBuf::from("a.f32le"),
        sample_rate: 48_000,
        channels: 2,
        duration_secs: 2.5,
    };
    let joined = args_of(&sink.build_command(&cfg(Some(audio))).unwrap()).join(" ");
    assert!(joined.contains("-f f32le -ar 48000 -ac 2 -t 2.500000 -i a.f32le"));
    assert!(joined.contains("-c:a aac"));
    assert!(joined.contains("-b:v 1500k"));
    assert!(!joined.contains("-crf"));
    assert!(!joined.contains("-an"));
}

#[test]
fn short_audio_does_not_truncate_video() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("o.mp4"));
    let audio = AudioInputConfig {
        path: PathBuf::from("a.f32le"),
        sample_rate: 48_000,
        channels: 2,
        duration_secs: 3.0,
    };
    let args = args_of(&sink.build_command(&cfg(Some(audio))).unwrap());
    assert!(!args.iter().any(|a| a == "-shortest"));
    assert!(args.join(" ").contains("-t 3.000000 -i a.f32le"));
}

#[test]
fn invalid_audio_config_is_rejected() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("o.mp4"));
    let audio = AudioInputConfig {
        path: PathBuf::from("a.f32le"),
        sample_rate: 0,
        channels: 2,
        duration_secs: 1.0,
    };
    assert!(sink.build_command(&cfg(Some(audio))).is_err());
}

#[test]
fn begin_rejects_odd_or_empty_sizes() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("o.mp4"));
    let mut c = cfg(None);
    c.width = 1081;
    assert!(matches!(sink.begin(c.clone()), Err(StoryError::Validation(_))));
    c.width = 0;
    assert!(matches!(sink.begin(c.clone()), Err(StoryError::Validation(_))));
    c.width = 1080;
    c.fps = 0;
    assert!(matches!(sink.begin(c), Err(StoryError::Validation(_))));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("o.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: false,
    };
    assert!(sink.push_frame(0, &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn flatten_over_black_keeps_premultiplied_color() {
    let src = vec![10u8, 20, 30, 128, 0, 0, 0, 0];
    let mut dst = vec![0u8; 8];
    flatten_premul_over_black(&mut dst, &src);
    assert_eq!(dst, vec![10, 20, 30, 255, 0, 0, 0, 255]);
}
