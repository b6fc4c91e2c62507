use super::*;

#[test]
fn transparent_source_leaves_destination() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_opaque_in_place(&mut dst, &[0, 0, 0, 0]);
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opaque_source_replaces_destination() {
    let mut dst = vec![10u8, 20, 30, 255];
    premul_over_opaque_in_place(&mut dst, &[200, 100, 50, 255]);
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn half_alpha_white_over_black_is_mid_grey() {
    let mut dst = vec![0u8, 0, 0, 255];
    premul_over_opaque_in_place(&mut dst, &[128, 128, 128, 128]);
    assert_eq!(dst, vec![128, 128, 128, 255]);
}
