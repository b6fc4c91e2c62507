use proptest::prelude::*;

use super::*;

#[test]
fn collapses_horizontal_whitespace_and_trims_lines() {
    assert_eq!(
        normalize_text("  Roses \t are   red,  \n\tViolets are blue "),
        "Roses are red,\nViolets are blue"
    );
}

#[test]
fn keeps_single_stanza_break() {
    let input = "\n\nline one\n\n\n   \nline two\n\n";
    assert_eq!(normalize_text(input), "line one\n\nline two");
}

#[test]
fn handles_windows_and_old_mac_line_endings() {
    assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
}

#[test]
fn whitespace_only_input_normalizes_to_empty() {
    assert_eq!(normalize_text(""), "");
    assert_eq!(normalize_text(" \n\t\n  "), "");
}

proptest! {
    #[test]
    fn normalization_is_idempotent(s in "[a-zA-Z ,.\t\r\n]{0,200}") {
        let once = normalize_text(&s);
        let twice = normalize_text(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_text_has_no_double_blank_lines(s in "[a-z \n]{0,120}") {
        let out = normalize_text(&s);
        prop_assert!(!out.contains("\n\n\n"));
        prop_assert!(!out.starts_with('\n'));
        prop_assert!(!out.ends_with('\n'));
    }
}
