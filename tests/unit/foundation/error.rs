use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StoryError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StoryError::media_unavailable("x")
            .to_string()
            .contains("media unavailable:")
    );
    assert!(
        StoryError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StoryError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
