use super::*;

#[test]
fn parses_hex_in_either_case() {
    assert_eq!(resolve_color("#FF8000"), Rgb8::new(255, 128, 0));
    assert_eq!(resolve_color("#ff8000"), Rgb8::new(255, 128, 0));
    assert_eq!(resolve_color("  #00ff7f "), Rgb8::new(0, 255, 127));
}

#[test]
fn parses_named_colors_case_insensitively() {
    assert_eq!(resolve_color("yellow"), Rgb8::new(255, 255, 0));
    assert_eq!(resolve_color("Magenta"), Rgb8::new(255, 0, 255));
    assert_eq!(resolve_color("BLACK"), Rgb8::BLACK);
}

#[test]
fn malformed_or_unknown_falls_back_to_white() {
    for bad in ["#12", "#GGGGGG", "#1234567", "orange", "", "#"] {
        assert_eq!(parse_color(bad), None, "{bad}");
        assert_eq!(resolve_color(bad), Rgb8::WHITE, "{bad}");
    }
}
