use super::*;
use crate::foundation::core::Rgba8;

fn canvas(w: u32, h: u32) -> Vec<u8> {
    vec![0u8; (w * h * 4) as usize]
}

fn put(buf: &mut [u8], w: u32, x: u32, y: u32, px: PremulRgba8) {
    let idx = ((y * w + x) * 4) as usize;
    buf[idx..idx + 4].copy_from_slice(&px);
}

fn get(buf: &[u8], w: u32, x: u32, y: u32) -> PremulRgba8 {
    let idx = ((y * w + x) * 4) as usize;
    [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]]
}

#[test]
fn over_transparent_src_is_noop() {
    assert_eq!(over([1, 2, 3, 4], [9, 9, 9, 0]), [1, 2, 3, 4]);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([1, 2, 3, 255], [9, 8, 7, 255]), [9, 8, 7, 255]);
}

#[test]
fn over_half_alpha_mixes() {
    let out = over([0, 0, 200, 255], [100, 0, 0, 128]);
    assert_eq!(out[0], 100);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[2]) - 100).abs() <= 1);
}

#[test]
fn multiply_with_white_keeps_destination() {
    let mut dst = vec![200u8, 100, 50, 255];
    blend_in_place(&mut dst, &[255, 255, 255, 255], BlendMode::Multiply).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn screen_with_black_keeps_destination() {
    let mut dst = vec![200u8, 100, 50, 255];
    blend_in_place(&mut dst, &[0, 0, 0, 255], BlendMode::Screen).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn darken_and_lighten_pick_per_channel() {
    let src = [100u8, 200, 0, 255];
    let mut dark = vec![150u8, 150, 150, 255];
    blend_in_place(&mut dark, &src, BlendMode::Darken).unwrap();
    assert_eq!(dark, vec![100, 150, 0, 255]);
    let mut light = vec![150u8, 150, 150, 255];
    blend_in_place(&mut light, &src, BlendMode::Lighten).unwrap();
    assert_eq!(light, vec![150, 200, 150, 255]);
}

#[test]
fn blend_onto_transparent_destination_is_plain_source() {
    for mode in [BlendMode::Multiply, BlendMode::Screen, BlendMode::Darken] {
        let mut dst = vec![0u8; 4];
        blend_in_place(&mut dst, &[60, 30, 0, 128], mode).unwrap();
        assert_eq!(dst, vec![60, 30, 0, 128], "{mode:?}");
    }
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(blend_in_place(&mut dst, &[0u8; 4], BlendMode::Normal).is_err());
    assert!(blend_in_place(&mut dst, &[0u8; 4], BlendMode::Screen).is_err());
}

#[test]
fn alpha_bounds_cover_only_painted_pixels() {
    let (w, h) = (10, 6);
    let mut buf = canvas(w, h);
    assert_eq!(alpha_bounds(&buf, w, h), None);
    put(&mut buf, w, 2, 1, [0, 0, 0, 1]);
    put(&mut buf, w, 7, 4, [0, 0, 0, 1]);
    assert_eq!(alpha_bounds(&buf, w, h), Some((2, 1, 8, 5)));
}

#[test]
fn hard_shadow_is_tinted_and_offset() {
    let (w, h) = (10, 10);
    let mut buf = canvas(w, h);
    put(&mut buf, w, 2, 2, [255, 255, 255, 255]);
    let shadow = Shadow::new(Rgba8::rgba(0, 0, 0, 204), 0.0, 3.0, 2.0);
    let patch = cast_shadow(&buf, w, h, &shadow).unwrap().unwrap();
    assert_eq!((patch.x, patch.y, patch.width, patch.height), (5, 4, 1, 1));

    let mut target = canvas(w, h);
    patch.over_canvas(&mut target, w, h).unwrap();
    assert_eq!(get(&target, w, 5, 4), [0, 0, 0, 204]);
    assert_eq!(get(&target, w, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn fractional_offsets_round_to_whole_pixels() {
    let (w, h) = (6, 6);
    let mut buf = canvas(w, h);
    put(&mut buf, w, 1, 1, [0, 0, 0, 255]);
    let shadow = Shadow::new(Rgba8::rgb(255, 0, 0), 0.0, 1.4, 1.6);
    let patch = cast_shadow(&buf, w, h, &shadow).unwrap().unwrap();
    assert_eq!((patch.x, patch.y), (2, 3));
    assert_eq!(patch.pixel(2, 3), Some([255, 0, 0, 255]));
}

#[test]
fn blurred_shadow_spreads_around_its_source() {
    let (w, h) = (40, 40);
    let mut buf = canvas(w, h);
    put(&mut buf, w, 20, 20, [255, 255, 255, 255]);
    let shadow = Shadow::new(Rgba8::rgb(0, 0, 0), 4.0, 0.0, 0.0);
    let patch = cast_shadow(&buf, w, h, &shadow).unwrap().unwrap();
    // sigma 2 truncates at radius 6.
    assert_eq!((patch.x, patch.width), (14, 13));
    let center = patch.pixel(20, 20).unwrap()[3];
    let near = patch.pixel(21, 20).unwrap()[3];
    assert!(center > near && near > 0);
}

#[test]
fn shadow_patch_clips_at_the_canvas_edge() {
    let (w, h) = (8, 8);
    let mut buf = canvas(w, h);
    put(&mut buf, w, 7, 7, [0, 0, 0, 255]);
    let shadow = Shadow::new(Rgba8::rgb(0, 0, 0), 2.0, 1.0, 1.0);
    let patch = cast_shadow(&buf, w, h, &shadow).unwrap().unwrap();
    let mut target = canvas(w, h);
    patch.over_canvas(&mut target, w, h).unwrap();
    assert!(get(&target, w, 7, 7)[3] > 0);
}

#[test]
fn invisible_shadows_produce_nothing() {
    let (w, h) = (4, 4);
    let mut buf = canvas(w, h);
    let clear = Shadow::new(Rgba8::rgba(0, 0, 0, 0), 4.0, 1.0, 1.0);
    put(&mut buf, w, 1, 1, [0, 0, 0, 255]);
    assert!(cast_shadow(&buf, w, h, &clear).unwrap().is_none());

    let empty = canvas(w, h);
    let black = Shadow::new(Rgba8::rgb(0, 0, 0), 4.0, 1.0, 1.0);
    assert!(cast_shadow(&empty, w, h, &black).unwrap().is_none());
}
