use super::*;

fn within(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 - 1e-6
        && inner.y0 >= outer.y0 - 1e-6
        && inner.x1 <= outer.x1 + 1e-6
        && inner.y1 <= outer.y1 + 1e-6
}

#[test]
fn quote_box_is_centered_with_top_at_quote_y() {
    let rect = quote_box_rect(Canvas::POSTER, &QuoteBox::default(), 750.0);
    assert_eq!(rect, Rect::new(240.0, 750.0, 840.0, 900.0));
}

#[test]
fn none_style_draws_no_shape_and_others_do() {
    let rect = Rect::new(240.0, 750.0, 840.0, 900.0);
    assert!(quote_box_path(QuoteBoxStyle::None, rect).is_none());
    for style in [
        QuoteBoxStyle::Rectangle,
        QuoteBoxStyle::Rounded,
        QuoteBoxStyle::Circle,
        QuoteBoxStyle::Diamond,
    ] {
        let path = quote_box_path(style, rect).expect("shape");
        assert!(within(rect, path.bounding_box()), "{style:?} escapes its box");
    }
}

#[test]
fn circle_uses_the_shorter_side() {
    let rect = Rect::new(240.0, 750.0, 840.0, 900.0);
    let bb = quote_box_path(QuoteBoxStyle::Circle, rect)
        .unwrap()
        .bounding_box();
    assert!((bb.width() - 150.0).abs() < 0.5);
    assert!((bb.center().x - 540.0).abs() < 0.5);
    assert!((bb.center().y - 825.0).abs() < 0.5);
}

#[test]
fn diamond_touches_edge_midpoints() {
    let rect = Rect::new(0.0, 0.0, 100.0, 60.0);
    let path = quote_box_path(QuoteBoxStyle::Diamond, rect).unwrap();
    assert_eq!(path.bounding_box(), rect);
    assert!(path.contains(rect.center()));
    assert!(!path.contains(kurbo::Point::new(5.0, 5.0)));
}

#[test]
fn none_frame_is_empty_and_every_other_style_paints() {
    assert!(frame_recipe(FrameStyle::None, 1080.0, 1080.0).is_empty());
    for style in FrameStyle::ALL.into_iter().filter(|s| *s != FrameStyle::None) {
        let recipe = frame_recipe(style, 1080.0, 1080.0);
        assert!(!recipe.is_empty(), "{style:?} has no strokes");
    }
}

#[test]
fn frame_outlines_stay_on_canvas() {
    let canvas = Rect::new(0.0, 0.0, 1080.0, 1080.0);
    for style in FrameStyle::ALL {
        for (outline, alpha) in frame_outlines(&frame_recipe(style, 1080.0, 1080.0)) {
            assert!(alpha > 0.0 && alpha <= 1.0);
            assert!(
                within(canvas, outline.bounding_box()),
                "{style:?} outline leaves the canvas"
            );
        }
    }
}

#[test]
fn frame_recipes_follow_canvas_size() {
    let small = frame_recipe(FrameStyle::Solid, 1080.0, 1080.0);
    let large = frame_recipe(FrameStyle::Solid, 2160.0, 1080.0);
    assert_eq!(small.strokes[0].path.bounding_box().x1, 1070.0);
    assert_eq!(large.strokes[0].path.bounding_box().x1, 2150.0);
}

#[test]
fn partial_borders_cover_only_their_sides() {
    let tl = frame_outlines(&frame_recipe(FrameStyle::DiagonalTopLeft, 1080.0, 1080.0));
    let bb = tl[0].0.bounding_box();
    assert!(bb.x0 < 20.0 && bb.y0 < 20.0);
    assert!(!tl[0].0.contains(kurbo::Point::new(1066.0, 540.0)));
    assert!(tl[0].0.contains(kurbo::Point::new(14.0, 540.0)));

    let two = frame_recipe(FrameStyle::TwoCorners, 1080.0, 1080.0);
    assert_eq!(two.strokes.len(), 2);
    let brackets = frame_recipe(FrameStyle::CornerBrackets, 1080.0, 1080.0);
    assert_eq!(brackets.strokes.len(), 4);
}

#[test]
fn glow_styles_glow_in_frame_color() {
    for style in [FrameStyle::Glow, FrameStyle::Neon] {
        let shadow = frame_recipe(style, 1080.0, 1080.0).shadow.unwrap();
        assert!(shadow.color.is_none());
        assert_eq!(shadow.offset, Vec2::ZERO);
    }
    let drop = frame_recipe(FrameStyle::Shadow, 1080.0, 1080.0).shadow.unwrap();
    assert!(drop.offset.x > 0.0 && drop.offset.y > 0.0);
}

#[test]
fn dashed_outline_has_gaps() {
    let dashed = frame_outlines(&frame_recipe(FrameStyle::Dashed, 1080.0, 1080.0));
    let solid = frame_outlines(&frame_recipe(FrameStyle::Solid, 1080.0, 1080.0));
    // The top edge starts at x = 14 with a 28 px dash followed by a 14 px gap.
    assert!(dashed[0].0.contains(kurbo::Point::new(24.0, 14.0)));
    assert!(!dashed[0].0.contains(kurbo::Point::new(49.0, 14.0)));
    assert!(solid[0].0.contains(kurbo::Point::new(49.0, 10.0)));
}
