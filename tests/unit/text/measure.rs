use super::*;
use crate::assets::fonts::SystemFonts;

fn engine_with_system_font() -> Option<TextLayoutEngine> {
    let fonts = SystemFonts::load(true, &[] as &[&str]);
    let face = fonts.resolve("sans-serif", false)?;
    let mut map = BTreeMap::new();
    let face = Arc::new(face);
    for role in FontRole::ALL {
        map.insert(role, face.clone());
    }
    Some(TextLayoutEngine::new(&map))
}

#[test]
fn missing_role_font_is_a_measurement_failure() {
    let mut engine = TextLayoutEngine::new(&BTreeMap::new());
    assert!(!engine.has_role(FontRole::Title));
    let err = engine.measure(FontRole::Title, 32.0, "hello").unwrap_err();
    assert!(matches!(err, PosterError::Measurement(_)));
    assert!(engine.shape_line(FontRole::Body, 32.0, "hello").is_err());
}

#[test]
fn measure_grows_with_text_when_a_system_font_exists() {
    let Some(mut engine) = engine_with_system_font() else {
        return;
    };
    let short = engine.measure(FontRole::Body, 32.0, "hi").unwrap();
    let long = engine.measure(FontRole::Body, 32.0, "hi there friend").unwrap();
    assert!(short > 0.0);
    assert!(long > short);

    let bigger = engine.measure(FontRole::Body, 64.0, "hi").unwrap();
    assert!(bigger > short);
}

#[test]
fn shaped_line_glyphs_advance_left_to_right() {
    let Some(mut engine) = engine_with_system_font() else {
        return;
    };
    let line = engine.shape_line(FontRole::Title, 40.0, "abc").unwrap();
    assert_eq!(line.glyphs.len(), 3);
    assert!(line.glyphs[0].x < line.glyphs[1].x);
    assert!(line.glyphs[1].x < line.glyphs[2].x);
    assert!(line.ascent > 0.0);
    assert!((f64::from(line.glyphs[0].y) - line.ascent).abs() < 1.0);
    assert!(line.width > 0.0);
}

#[test]
fn invalid_size_is_rejected() {
    let mut engine = TextLayoutEngine::new(&BTreeMap::new());
    assert!(engine.measure(FontRole::Title, 0.0, "x").is_err());
}
