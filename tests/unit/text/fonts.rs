use super::*;

#[test]
fn bundled_fonts_come_first() {
    let c = default_font_candidates();
    assert!(c[0].ends_with("Roboto-Bold.ttf"));
    assert!(c[0].starts_with("static"));
    assert!(c.len() > 2);
}

#[test]
fn prioritize_moves_known_families_first_and_caps() {
    let paths = vec![
        PathBuf::from("/fonts/zzz.ttf"),
        PathBuf::from("/fonts/DejaVuSans.ttf"),
        PathBuf::from("/fonts/zzz.ttf"),
        PathBuf::from("/fonts/abc.otf"),
        PathBuf::from("/fonts/Roboto-Bold.ttf"),
    ];
    let out = prioritize_font_paths(paths, 3);
    assert_eq!(
        out,
        vec![
            PathBuf::from("/fonts/DejaVuSans.ttf"),
            PathBuf::from("/fonts/Roboto-Bold.ttf"),
            PathBuf::from("/fonts/zzz.ttf"),
        ]
    );
}

#[test]
fn missing_and_corrupt_candidates_fall_through_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = dir.path().join("broken.ttf");
    std::fs::write(&corrupt, b"not a font").unwrap();

    let mut ctx = parley::FontContext::default();
    let face = load_first_face(
        &mut ctx,
        &[dir.path().join("missing.ttf"), corrupt],
    );
    assert!(face.is_substituted());
    assert!(face.value().is_builtin());
    assert!(face.value().path().is_none());
}

#[test]
fn builtin_measure_is_linear_in_chars() {
    let one = builtin::measure("a", 40.0);
    let four = builtin::measure("abcd", 40.0);
    assert!((four - 4.0 * one).abs() < 1e-3);
    assert_eq!(builtin::measure("", 40.0), 0.0);
}

#[test]
fn builtin_rects_stay_within_line_box() {
    let size = 48.0;
    let text = "Hi?";
    let width = f64::from(builtin::measure(text, size));
    let height = builtin::unit(size) * 7.0;
    let rects = builtin::glyph_rects(text, size);
    assert!(!rects.is_empty());
    for r in rects {
        assert!(r.x0 >= 0.0 && r.x1 <= width);
        assert!(r.y0 >= 0.0 && r.y1 <= height);
    }
    assert!(builtin::glyph_rects("   ", size).is_empty());
}
