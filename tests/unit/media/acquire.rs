use super::*;

fn cred(domain: &str) -> ProviderCredential {
    ProviderCredential {
        domain: domain.to_string(),
        header: "Authorization".to_string(),
        value: "k".to_string(),
    }
}

#[test]
fn parse_distinguishes_remote_local_and_blank() {
    assert_eq!(
        MediaRef::parse(" https://x.test/a.mp4 "),
        Some(MediaRef::Remote("https://x.test/a.mp4".to_string()))
    );
    assert_eq!(
        MediaRef::parse("HTTP://x.test/a"),
        Some(MediaRef::Remote("HTTP://x.test/a".to_string()))
    );
    assert_eq!(
        MediaRef::parse("clips/bg.mp4"),
        Some(MediaRef::Local(PathBuf::from("clips/bg.mp4")))
    );
    assert_eq!(MediaRef::parse("   "), None);
}

#[test]
fn credentials_match_by_host_suffix() {
    let creds = vec![cred("pexels.com")];
    assert!(credential_for("https://videos.pexels.com/v/1.mp4", &creds).is_some());
    assert!(credential_for("https://pexels.com/v/1.mp4", &creds).is_some());
    assert!(credential_for("https://notpexels.com/v/1.mp4", &creds).is_none());
    assert!(credential_for("https://example.org/v/1.mp4", &creds).is_none());
    assert!(credential_for("not a url", &creds).is_none());
}

#[test]
fn extension_comes_from_url_path() {
    assert_eq!(extension_from_url("https://a.test/x/clip.MOV?t=1"), Some("mov".to_string()));
    assert_eq!(extension_from_url("https://a.test/x/clip"), None);
    assert_eq!(extension_from_url("https://a.test/x/clip.toolongext"), None);
}

#[test]
fn missing_local_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let acquirer = MediaAcquirer::from_config(&StoryConfig::default());
    let mut tracker = TempResourceTracker::new(dir.path());
    let err = acquirer
        .fetch(
            &MediaRef::Local(dir.path().join("nope.mp4")),
            MediaKind::Video,
            &mut tracker,
        )
        .unwrap_err();
    assert!(matches!(err, StoryError::MediaUnavailable(_)));
    assert!(tracker.tracked().is_empty());
}

#[test]
fn existing_local_file_is_used_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("bg.mp4");
    std::fs::write(&p, b"x").unwrap();
    let acquirer = MediaAcquirer::from_config(&StoryConfig::default());
    let mut tracker = TempResourceTracker::new(dir.path());
    let got = acquirer
        .fetch(&MediaRef::Local(p.clone()), MediaKind::Video, &mut tracker)
        .unwrap();
    assert_eq!(got, p);
    assert!(tracker.tracked().is_empty());
}

#[test]
fn unreachable_host_is_unavailable_and_tracked() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = StoryConfig::default();
    cfg.video_timeout_secs = 2;
    let acquirer = MediaAcquirer::from_config(&cfg);
    let mut tracker = TempResourceTracker::new(dir.path());
    let err = acquirer
        .fetch(
            &MediaRef::Remote("http://127.0.0.1:1/clip.mp4".to_string()),
            MediaKind::Video,
            &mut tracker,
        )
        .unwrap_err();
    assert!(matches!(err, StoryError::MediaUnavailable(_)));
    assert_eq!(tracker.tracked().len(), 1);
}
