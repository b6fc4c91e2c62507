use super::*;

#[test]
fn defaults_match_story_settings() {
    let cfg = StoryConfig::default();
    assert_eq!(cfg.output_dir, PathBuf::from("outputs"));
    assert_eq!(cfg.video_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.audio_timeout(), Duration::from_secs(15));
    assert_eq!(cfg.default_font_size, 80);
    assert_eq!(cfg.default_text_color, "#FFFFFF");
    assert_eq!(cfg.default_duration_secs, 15.0);
    assert_eq!(cfg.stale_temp_age(), Duration::from_secs(3600));
    assert!(cfg.credentials.is_empty());
    assert!(
        cfg.font_candidates[0].ends_with("static/fonts/Roboto-Bold.ttf"),
        "bundled font goes first"
    );
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = StoryConfig::from_json_str(
        r#"{ "output_dir": "out", "video_timeout_secs": 5, "discover_system_fonts": false }"#,
    )
    .unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("out"));
    assert_eq!(cfg.video_timeout_secs, 5);
    assert!(!cfg.discover_system_fonts);
    assert_eq!(cfg.audio_timeout_secs, 15);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(StoryConfig::from_json_str("{ not json").is_err());
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("cfg.json");
    std::fs::write(&p, r#"{ "default_font_size": 64 }"#).unwrap();
    let cfg = StoryConfig::from_path(&p).unwrap();
    assert_eq!(cfg.default_font_size, 64);
    assert!(StoryConfig::from_path(&dir.path().join("missing.json")).is_err());
}

#[test]
fn env_overlay_adds_pexels_credential_once() {
    let lookup = |key: &str| match key {
        "PEXELS_API_KEY" => Some(" secret ".to_string()),
        "STORYREEL_TEMP_DIR" => Some("/tmp/sr".to_string()),
        _ => None,
    };
    let cfg = StoryConfig::default().with_env_from(lookup).with_env_from(lookup);
    assert_eq!(cfg.temp_dir, PathBuf::from("/tmp/sr"));
    assert_eq!(
        cfg.credentials,
        vec![ProviderCredential {
            domain: "pexels.com".to_string(),
            header: "Authorization".to_string(),
            value: "secret".to_string(),
        }]
    );
}

#[test]
fn empty_env_values_are_ignored() {
    let cfg = StoryConfig::default().with_env_from(|_| Some(String::new()));
    assert_eq!(cfg, StoryConfig::default());
}
