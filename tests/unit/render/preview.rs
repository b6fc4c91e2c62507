use super::*;

#[test]
fn preview_size_doubles_with_floor() {
    assert_eq!(preview_font_size(20), 80);
    assert_eq!(preview_font_size(40), 80);
    assert_eq!(preview_font_size(60), 120);
    assert_eq!(preview_font_size(u32::MAX), u32::MAX);
}

#[test]
fn preview_draws_text_on_black_story_canvas() {
    let img = render_preview(&[], "HELLO", 40, "yellow");
    assert_eq!(img.dimensions(), (1080, 1920));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert!(img.pixels().all(|p| p.0[3] == 255));
    let yellow = img.pixels().filter(|p| p.0 == [255, 255, 0, 255]).count();
    assert!(yellow > 0, "fill color should appear");
}

#[test]
fn preview_png_round_trips_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("p.png");
    let img = render_preview(&[], "", 40, "white");
    write_preview_png(&img, &path).unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (1080, 1920));
}
