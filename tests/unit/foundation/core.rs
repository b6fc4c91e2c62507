use super::*;

#[test]
fn even_rounds_down_and_keeps_minimum() {
    assert_eq!(FrameSize::new(1081, 1921).even(), FrameSize::new(1080, 1920));
    assert_eq!(FrameSize::new(1, 1).even(), FrameSize::new(2, 2));
}

#[test]
fn fit_long_edge_scales_proportionally() {
    let s = FrameSize::new(2160, 3840).fit_long_edge(1920);
    assert_eq!(s, FrameSize::new(1080, 1920));

    let landscape = FrameSize::new(3840, 2160).fit_long_edge(1920);
    assert_eq!(landscape, FrameSize::new(1920, 1080));

    assert_eq!(FrameSize::STORY.fit_long_edge(1920), FrameSize::STORY);
}

#[test]
fn resolved_exposes_reason_only_when_substituted() {
    let p = Resolved::Primary(3);
    assert!(!p.is_substituted());
    assert_eq!(p.reason(), None);
    assert_eq!(*p.value(), 3);

    let s = Resolved::substituted(4, "font missing");
    assert!(s.is_substituted());
    assert_eq!(s.reason(), Some("font missing"));
    assert_eq!(s.into_value(), 4);
}

#[test]
fn durations_must_be_positive_and_finite() {
    assert!(validate_duration(10.0).is_ok());
    assert!(validate_duration(0.0).is_err());
    assert!(validate_duration(-1.0).is_err());
    assert!(validate_duration(f64::NAN).is_err());
    assert!(validate_duration(f64::INFINITY).is_err());
}
