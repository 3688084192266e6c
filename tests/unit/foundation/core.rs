use super::*;

#[test]
fn poster_canvas_is_fixed_square() {
    assert_eq!(Canvas::POSTER.width, 1080);
    assert_eq!(Canvas::POSTER.height, 1080);
    assert_eq!(Canvas::POSTER.center_x(), 540.0);
    assert_eq!(Canvas::POSTER.byte_len(), 1080 * 1080 * 4);
}

#[test]
fn hex_colors_parse_in_all_lengths() {
    assert_eq!(Rgba8::parse("#ffd700").unwrap(), Rgba8::rgb(255, 215, 0));
    assert_eq!(Rgba8::parse("#fff").unwrap(), Rgba8::rgb(255, 255, 255));
    assert_eq!(
        Rgba8::parse("#08376580").unwrap(),
        Rgba8::rgba(8, 55, 101, 128)
    );
    assert!(Rgba8::parse("#ggg").is_err());
    assert!(Rgba8::parse("#12345").is_err());
}

#[test]
fn css_functional_colors_parse() {
    assert_eq!(
        Rgba8::parse("rgba(251, 191, 36, 0.2)").unwrap(),
        Rgba8::rgba(251, 191, 36, 51)
    );
    assert_eq!(
        Rgba8::parse("rgb(8,55,101)").unwrap(),
        Rgba8::rgb(8, 55, 101)
    );
    assert!(Rgba8::parse("hsl(1,2,3)").is_err());
    assert!(Rgba8::parse("rgba(1,2)").is_err());
}

#[test]
fn colors_serialize_as_css_strings() {
    let c = Rgba8::rgb(0x1e, 0x3a, 0x8a);
    let s = serde_json::to_string(&c).unwrap();
    assert_eq!(s, "\"#1e3a8a\"");
    let back: Rgba8 = serde_json::from_str(&s).unwrap();
    assert_eq!(back, c);
}

#[test]
fn premultiply_rounds_like_canvas() {
    assert_eq!(
        Rgba8::rgba(200, 100, 50, 128).premultiplied(),
        [100, 50, 25, 128]
    );
    assert_eq!(Rgba8::rgba(255, 255, 255, 0).premultiplied(), [0, 0, 0, 0]);
}

#[test]
fn alpha_factor_is_clamped() {
    let c = Rgba8::rgb(1, 2, 3);
    assert_eq!(c.with_alpha_factor(0.5).a, 128);
    assert_eq!(c.with_alpha_factor(4.0).a, 255);
    assert_eq!(c.with_alpha_factor(-1.0).a, 0);
}
