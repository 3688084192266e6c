use super::*;

#[test]
fn empty_json_yields_defaults() {
    let spec = PosterSpec::from_json_str("{}").unwrap();
    assert_eq!(spec, PosterSpec::default());
    assert_eq!(spec.positions.title_y, 120);
    assert_eq!(spec.quote_box.width, 600.0);
    assert_eq!(spec.social_row.gap, 50.0);
    assert_eq!(spec.place_row.y, 900.0);
    assert!(spec.captions);
    spec.validate().unwrap();
}

#[test]
fn json_fields_use_snake_case_names() {
    let json = r##"{
        "title": "Hello",
        "template": "royal_purple",
        "language": "oromic",
        "quote_box": {"style": "diamond", "width": 500},
        "frame": {"style": "corner_brackets"},
        "fills": {"body": {"kind": "golden"}, "title": {"kind": "solid", "color": "#ffffff"}},
        "social_row": {"items": [{"icon": "telegram", "label": "@a"}], "gap": 10, "y": 1000},
        "gradient": {"mode": "two_zone", "top": {"height": 200}, "bottom": {"enabled": false}}
    }"##;
    let spec = PosterSpec::from_json_str(json).unwrap();
    assert_eq!(spec.template, Template::RoyalPurple);
    assert_eq!(spec.language, Language::Oromic);
    assert_eq!(spec.quote_box.style, QuoteBoxStyle::Diamond);
    assert_eq!(spec.quote_box.height, 150.0);
    assert_eq!(spec.frame.style, FrameStyle::CornerBrackets);
    assert_eq!(spec.fills.body, Some(TextFill::Golden));
    assert_eq!(spec.social_row.items.len(), 1);
    let GradientConfig::TwoZone(z) = &spec.gradient else {
        panic!("expected two-zone gradient");
    };
    assert_eq!(z.top.height, 200.0);
    assert!(!z.bottom.enabled);
    spec.validate().unwrap();
}

#[test]
fn role_fills_default_per_role() {
    let fills = TextFills::default();
    assert_eq!(
        fills.resolve(FontRole::Title, Template::ClassicalBlue),
        TextFill::Golden
    );
    assert_eq!(
        fills.resolve(FontRole::Body, Template::GoldenElegance),
        TextFill::Solid {
            color: Rgba8::rgb(255, 255, 255)
        }
    );
    assert_eq!(
        fills.resolve(FontRole::Caption, Template::ClassicalBlue),
        TextFill::Solid { color: LABEL_GOLD }
    );
}

#[test]
fn validate_rejects_bad_numbers() {
    let mut spec = PosterSpec::default();
    spec.font_sizes.title = 0.0;
    assert!(spec.validate().is_err());

    let mut spec = PosterSpec::default();
    spec.crop.scale = f64::NAN;
    assert!(spec.validate().is_err());

    let mut spec = PosterSpec::default();
    spec.social_row.gap = -1.0;
    assert!(spec.validate().is_err());

    let mut spec = PosterSpec::default();
    if let GradientConfig::Unified(u) = &mut spec.gradient {
        u.intensity = 150.0;
    }
    assert!(spec.validate().is_err());
}

#[test]
fn out_of_range_stops_are_accepted_for_clamping() {
    let mut spec = PosterSpec::default();
    if let GradientConfig::Unified(u) = &mut spec.gradient {
        u.stops = vec![GradientStop::new(Rgba8::rgb(0, 0, 0), 250.0, -40.0)];
    }
    spec.validate().unwrap();
}

#[test]
fn frame_catalog_has_seventeen_entries() {
    assert_eq!(FrameStyle::ALL.len(), 17);
    for style in FrameStyle::ALL {
        let s = serde_json::to_string(&style).unwrap();
        let back: FrameStyle = serde_json::from_str(&s).unwrap();
        assert_eq!(back, style);
    }
}

#[test]
fn rows_report_visibility_from_trimmed_labels() {
    let mut row = IconRow::social();
    assert!(!row.has_visible_items());
    row.items[1].label = "   ".into();
    assert!(!row.has_visible_items());
    row.items[2].label = "@c".into();
    assert!(row.has_visible_items());
}

#[test]
fn invalid_json_is_a_validation_error() {
    let err = PosterSpec::from_json_str("{\"title\": 3}").unwrap_err();
    assert!(matches!(err, PosterError::Validation(_)));
}
