use kurbo::{BezPath, Cap, Circle, Join, Rect, RoundedRect, Shape, Stroke, StrokeOpts};

use crate::{
    composition::model::{FrameStyle, QuoteBox, QuoteBoxStyle},
    foundation::core::{Canvas, Rgba8, Vec2},
};

pub const QUOTE_CORNER_RADIUS: f64 = 20.0;
pub const QUOTE_BORDER_WIDTH: f64 = 3.0;
/// Blur of the border-colored glow behind the quote box stroke.
pub const QUOTE_GLOW_BLUR: f64 = 10.0;

const TOLERANCE: f64 = 0.1;

/// The quote box bounds: horizontally centered, top edge at `quote_y`.
pub fn quote_box_rect(canvas: Canvas, quote_box: &QuoteBox, quote_y: f64) -> Rect {
    let x0 = (canvas.width_f64() - quote_box.width) * 0.5;
    Rect::new(x0, quote_y, x0 + quote_box.width, quote_y + quote_box.height)
}

/// Outline of the quote box for `style`, or `None` when the style draws no shape.
pub fn quote_box_path(style: QuoteBoxStyle, rect: Rect) -> Option<BezPath> {
    let path = match style {
        QuoteBoxStyle::None => return None,
        QuoteBoxStyle::Rectangle => rect.to_path(TOLERANCE),
        QuoteBoxStyle::Rounded => {
            RoundedRect::from_rect(rect, QUOTE_CORNER_RADIUS).to_path(TOLERANCE)
        }
        QuoteBoxStyle::Circle => {
            let radius = rect.width().min(rect.height()) * 0.5;
            Circle::new(rect.center(), radius).to_path(TOLERANCE)
        }
        QuoteBoxStyle::Diamond => {
            let c = rect.center();
            let mut p = BezPath::new();
            p.move_to((c.x, rect.y0));
            p.line_to((rect.x1, c.y));
            p.line_to((c.x, rect.y1));
            p.line_to((rect.x0, c.y));
            p.close_path();
            p
        }
    };
    Some(path)
}

/// Turn a stroked path into the filled outline that paints the same pixels.
pub fn stroke_outline(path: &BezPath, style: &Stroke) -> BezPath {
    kurbo::stroke(path.iter(), style, &StrokeOpts::default(), TOLERANCE)
}

/// One stroked path of a frame.
#[derive(Clone, Debug)]
pub struct FrameStroke {
    pub path: BezPath,
    pub stroke: Stroke,
    /// Multiplier on the frame color's alpha.
    pub alpha: f32,
}

/// A shadow or glow drawn beneath the frame strokes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameShadow {
    /// `None` glows in the frame's own color.
    pub color: Option<Rgba8>,
    pub blur: f64,
    pub offset: Vec2,
}

/// Everything needed to paint one frame style.
#[derive(Clone, Debug, Default)]
pub struct FrameRecipe {
    pub strokes: Vec<FrameStroke>,
    pub shadow: Option<FrameShadow>,
}

impl FrameRecipe {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

fn inset_rect(width: f64, height: f64, inset: f64) -> BezPath {
    Rect::new(inset, inset, width - inset, height - inset).to_path(TOLERANCE)
}

fn polyline(points: &[(f64, f64)]) -> BezPath {
    let mut p = BezPath::new();
    for (i, &pt) in points.iter().enumerate() {
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p
}

fn solid(width: f64) -> Stroke {
    Stroke::new(width).with_join(Join::Miter).with_caps(Cap::Butt)
}

fn dashed(width: f64, pattern: &[f64]) -> Stroke {
    solid(width).with_dashes(0.0, pattern.iter().copied())
}

fn stroke(path: BezPath, stroke: Stroke) -> FrameStroke {
    FrameStroke {
        path,
        stroke,
        alpha: 1.0,
    }
}

/// Fixed recipe for `style` on a `width` x `height` canvas.
pub fn frame_recipe(style: FrameStyle, width: f64, height: f64) -> FrameRecipe {
    let (w, h) = (width, height);
    let rect = |inset: f64| inset_rect(w, h, inset);
    // L-shaped corner arms; `sx`/`sy` point from the corner into the canvas.
    let corner = |cx: f64, cy: f64, sx: f64, sy: f64, arm: f64| {
        polyline(&[(cx, cy + sy * arm), (cx, cy), (cx + sx * arm, cy)])
    };

    let mut strokes = Vec::new();
    let mut shadow = None;
    match style {
        FrameStyle::None => {}
        FrameStyle::Solid => strokes.push(stroke(rect(10.0), solid(8.0))),
        FrameStyle::Thin => strokes.push(stroke(rect(12.0), solid(2.0))),
        FrameStyle::Thick => strokes.push(stroke(rect(16.0), solid(24.0))),
        FrameStyle::Double => {
            strokes.push(stroke(rect(12.0), solid(4.0)));
            strokes.push(stroke(rect(28.0), solid(4.0)));
        }
        FrameStyle::Dashed => strokes.push(stroke(rect(14.0), dashed(6.0, &[28.0, 14.0]))),
        FrameStyle::Dotted => strokes.push(stroke(rect(14.0), dashed(6.0, &[6.0, 10.0]))),
        FrameStyle::DashDot => {
            strokes.push(stroke(rect(14.0), dashed(6.0, &[28.0, 10.0, 6.0, 10.0])));
        }
        FrameStyle::Rounded => {
            let r = RoundedRect::new(16.0, 16.0, w - 16.0, h - 16.0, 48.0).to_path(TOLERANCE);
            strokes.push(stroke(r, solid(8.0)));
        }
        FrameStyle::Inset => strokes.push(stroke(rect(40.0), solid(4.0))),
        FrameStyle::Glow => {
            strokes.push(stroke(rect(16.0), solid(6.0)));
            shadow = Some(FrameShadow {
                color: None,
                blur: 20.0,
                offset: Vec2::ZERO,
            });
        }
        FrameStyle::Neon => {
            strokes.push(FrameStroke {
                alpha: 0.35,
                ..stroke(rect(16.0), solid(10.0))
            });
            strokes.push(stroke(rect(16.0), solid(3.0)));
            shadow = Some(FrameShadow {
                color: None,
                blur: 30.0,
                offset: Vec2::ZERO,
            });
        }
        FrameStyle::Shadow => {
            strokes.push(stroke(rect(14.0), solid(8.0)));
            shadow = Some(FrameShadow {
                color: Some(Rgba8::rgba(0, 0, 0, 153)),
                blur: 12.0,
                offset: Vec2::new(6.0, 6.0),
            });
        }
        FrameStyle::CornerBrackets => {
            let (i, arm) = (20.0, 120.0);
            for (cx, cy, sx, sy) in [
                (i, i, 1.0, 1.0),
                (w - i, i, -1.0, 1.0),
                (w - i, h - i, -1.0, -1.0),
                (i, h - i, 1.0, -1.0),
            ] {
                strokes.push(stroke(corner(cx, cy, sx, sy, arm), solid(8.0)));
            }
        }
        FrameStyle::TwoCorners => {
            let (i, arm) = (20.0, 220.0);
            strokes.push(stroke(corner(i, i, 1.0, 1.0, arm), solid(8.0)));
            strokes.push(stroke(corner(w - i, h - i, -1.0, -1.0, arm), solid(8.0)));
        }
        FrameStyle::DiagonalTopLeft => {
            let i = 14.0;
            let p = polyline(&[(i, h - i), (i, i), (w - i, i)]);
            strokes.push(stroke(p, solid(8.0)));
        }
        FrameStyle::DiagonalBottomRight => {
            let i = 14.0;
            let p = polyline(&[(w - i, i), (w - i, h - i), (i, h - i)]);
            strokes.push(stroke(p, solid(8.0)));
        }
    }

    FrameRecipe { strokes, shadow }
}

/// Filled outlines of every stroke in `recipe`, paired with their alpha multipliers.
pub fn frame_outlines(recipe: &FrameRecipe) -> Vec<(BezPath, f32)> {
    recipe
        .strokes
        .iter()
        .map(|s| (stroke_outline(&s.path, &s.stroke), s.alpha))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/paint/shapes.rs"]
mod tests;
