use std::sync::Arc;

use crate::{
    assets::decode::{DecodedImage, FontFace},
    assets::loader::PreparedResources,
    composition::model::{
        BlendMode, FontRole, FrameStyle, LABEL_GOLD, PosterSpec, QuoteBoxStyle, TextFill,
    },
    foundation::core::{Affine, BezPath, Canvas, Point, Rgba8, Vec2},
    foundation::error::PosterResult,
    layout::row::{ICON_SIZE, LABEL_SIZE_PX, RowLayout, layout_row},
    paint::{gradient, shapes},
    text::flow::{Anchor, place_lines, wrap_words},
    text::measure::{PlacedGlyph, TextLayoutEngine, TextMeasure},
};

/// Backend-agnostic description of one poster: an ordered list of layers, painted bottom to
/// top onto a canvas that starts fully transparent.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub layers: Vec<Layer>,
}

impl RenderPlan {
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }
}

/// What a layer depicts. Declaration order is paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Background,
    Gradient,
    Title,
    Body,
    QuoteBox,
    QuoteBorder,
    QuoteText,
    Captions,
    PlaceRow,
    SocialRow,
    Clipart,
    Frame,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Gradient => "gradient",
            LayerKind::Title => "title",
            LayerKind::Body => "body",
            LayerKind::QuoteBox => "quote_box",
            LayerKind::QuoteBorder => "quote_border",
            LayerKind::QuoteText => "quote_text",
            LayerKind::Captions => "captions",
            LayerKind::PlaceRow => "place_row",
            LayerKind::SocialRow => "social_row",
            LayerKind::Clipart => "clipart",
            LayerKind::Frame => "frame",
        }
    }
}

/// One paint step. Its paint state (shadow, blend) is immutable and scoped to the layer, so
/// nothing leaks into the next one.
#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub content: LayerContent,
    /// Drop shadow cast by everything in the layer.
    pub shadow: Option<Shadow>,
    pub blend: BlendMode,
}

#[derive(Clone, Debug)]
pub enum LayerContent {
    Vector(Vec<DrawOp>),
    /// Canvas-sized premultiplied pixels used as-is.
    Raster(Arc<DecodedImage>),
}

/// Shadow parameters with canvas semantics: `blur` is the shadow blur, sigma = `blur / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    pub blur: f64,
    pub offset: Vec2,
}

impl Shadow {
    pub const fn new(color: Rgba8, blur: f64, dx: f64, dy: f64) -> Self {
        Self {
            color,
            blur,
            offset: Vec2::new(dx, dy),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphFill {
    Solid(Rgba8),
    /// The golden ramp from the line top down one font size.
    Golden,
}

impl From<TextFill> for GlyphFill {
    fn from(fill: TextFill) -> Self {
        match fill {
            TextFill::Solid { color } => GlyphFill::Solid(color),
            TextFill::Golden => GlyphFill::Golden,
        }
    }
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    FillPath {
        path: BezPath,
        color: Rgba8,
    },
    /// Draw a premultiplied image; `transform` maps image pixels to canvas pixels.
    Image {
        image: Arc<DecodedImage>,
        transform: Affine,
    },
    /// One shaped line; glyph positions are relative to `origin`, the line's top-left.
    Glyphs {
        font: Arc<FontFace>,
        size_px: f32,
        glyphs: Vec<PlacedGlyph>,
        origin: Point,
        fill: GlyphFill,
    },
}

const SHADOW_BLACK_80: Rgba8 = Rgba8::rgba(0, 0, 0, 204);
const SHADOW_BLACK_70: Rgba8 = Rgba8::rgba(0, 0, 0, 179);

const TITLE_MAX_WIDTH: f64 = 800.0;
const TITLE_LINE_HEIGHT: f64 = 1.2;
const TITLE_SHADOW: Shadow = Shadow::new(SHADOW_BLACK_80, 8.0, 3.0, 3.0);

const BODY_MAX_WIDTH: f64 = 700.0;
const BODY_LINE_HEIGHT: f64 = 1.5;
const BODY_SHADOW: Shadow = Shadow::new(SHADOW_BLACK_70, 6.0, 2.0, 2.0);

const QUOTE_TEXT_INSET_Y: f64 = 50.0;
const QUOTE_TEXT_PADDING_X: f64 = 40.0;
const QUOTE_LINE_HEIGHT: f64 = 1.4;

const CAPTION_TOP_Y: f64 = 40.0;
const CAPTION_BOTTOM_Y: f64 = 950.0;
const CAPTION_MAX_WIDTH: f64 = 1000.0;
const CAPTION_LINE_HEIGHT: f64 = 1.2;
const CAPTION_SHADOW: Shadow = Shadow::new(SHADOW_BLACK_80, 4.0, 2.0, 2.0);

const ROW_SHADOW: Shadow = Shadow::new(SHADOW_BLACK_80, 3.0, 1.0, 1.0);
const ROW_LABEL_ROLE: FontRole = FontRole::Body;

/// A wrapped, centered text block.
struct TextBlock<'a> {
    role: FontRole,
    text: &'a str,
    center_x: f64,
    top: f64,
    max_width: f64,
    line_height: f64,
}

/// Compile `spec` into a [`RenderPlan`] using already-prepared resources.
///
/// Layers follow the fixed z-order: background, gradient overlays, title, body, quote box and
/// quote text, captions, place row, social row, clipart, frame. A text layer that cannot be
/// measured is left out and logged; the rest of the poster still compiles.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_poster(
    spec: &PosterSpec,
    resources: &PreparedResources,
    text: &mut TextLayoutEngine,
) -> PosterResult<RenderPlan> {
    let canvas = Canvas::POSTER;
    let palette = spec.template.palette();
    let mut layers = Vec::new();

    layers.push(background_layer(spec, resources, canvas));

    for overlay in gradient::synthesize(&spec.gradient, canvas) {
        layers.push(Layer {
            kind: LayerKind::Gradient,
            content: LayerContent::Raster(overlay.raster),
            shadow: None,
            blend: overlay.blend,
        });
    }

    let center_x = canvas.center_x();
    if !spec.title.trim().is_empty() {
        let size = spec.font_sizes.title;
        let block = TextBlock {
            role: FontRole::Title,
            text: &spec.title,
            center_x,
            top: f64::from(spec.positions.title_y),
            max_width: TITLE_MAX_WIDTH,
            line_height: f64::from(size) * TITLE_LINE_HEIGHT,
        };
        let fill: GlyphFill = spec.fills.resolve(FontRole::Title, spec.template).into();
        push_text_layer(&mut layers, LayerKind::Title, TITLE_SHADOW, || {
            text_block_ops(text, &block, size, fill)
        })?;
    }

    if !spec.body.trim().is_empty() {
        let size = spec.font_sizes.body;
        let block = TextBlock {
            role: FontRole::Body,
            text: &spec.body,
            center_x,
            top: f64::from(spec.positions.text_y),
            max_width: BODY_MAX_WIDTH,
            line_height: f64::from(size) * BODY_LINE_HEIGHT,
        };
        let fill: GlyphFill = spec.fills.resolve(FontRole::Body, spec.template).into();
        push_text_layer(&mut layers, LayerKind::Body, BODY_SHADOW, || {
            text_block_ops(text, &block, size, fill)
        })?;
    }

    if !spec.quote.trim().is_empty() {
        let rect = shapes::quote_box_rect(canvas, &spec.quote_box, f64::from(spec.positions.quote_y));
        if let Some(outline) = shapes::quote_box_path(spec.quote_box.style, rect) {
            let border = shapes::stroke_outline(&outline, &kurbo::Stroke::new(shapes::QUOTE_BORDER_WIDTH));
            layers.push(Layer {
                kind: LayerKind::QuoteBox,
                content: LayerContent::Vector(vec![DrawOp::FillPath {
                    path: outline,
                    color: palette.quote_background,
                }]),
                shadow: None,
                blend: BlendMode::Normal,
            });
            layers.push(Layer {
                kind: LayerKind::QuoteBorder,
                content: LayerContent::Vector(vec![DrawOp::FillPath {
                    path: border,
                    color: palette.quote_border,
                }]),
                shadow: Some(Shadow::new(palette.quote_border, shapes::QUOTE_GLOW_BLUR, 0.0, 0.0)),
                blend: BlendMode::Normal,
            });
        }

        let quoted = match spec.quote_box.style {
            QuoteBoxStyle::None => spec.quote.trim().to_string(),
            _ => format!("\"{}\"", spec.quote.trim()),
        };
        let size = spec.font_sizes.quote;
        let block = TextBlock {
            role: FontRole::Quote,
            text: &quoted,
            center_x: rect.center().x,
            top: rect.y0 + QUOTE_TEXT_INSET_Y,
            max_width: (spec.quote_box.width - QUOTE_TEXT_PADDING_X).max(1.0),
            line_height: f64::from(size) * QUOTE_LINE_HEIGHT,
        };
        let fill: GlyphFill = spec.fills.resolve(FontRole::Quote, spec.template).into();
        push_text_layer(&mut layers, LayerKind::QuoteText, TITLE_SHADOW, || {
            text_block_ops(text, &block, size, fill)
        })?;
    }

    if spec.captions {
        let (top_text, bottom_text) = spec.language.captions();
        let size = spec.font_sizes.caption;
        let fill: GlyphFill = spec.fills.resolve(FontRole::Caption, spec.template).into();
        push_text_layer(&mut layers, LayerKind::Captions, CAPTION_SHADOW, || {
            let mut ops = Vec::new();
            for (caption, top) in [(top_text, CAPTION_TOP_Y), (bottom_text, CAPTION_BOTTOM_Y)] {
                let block = TextBlock {
                    role: FontRole::Caption,
                    text: caption,
                    center_x,
                    top,
                    max_width: CAPTION_MAX_WIDTH,
                    line_height: f64::from(size) * CAPTION_LINE_HEIGHT,
                };
                ops.extend(text_block_ops(text, &block, size, fill)?);
            }
            Ok(ops)
        })?;
    }

    for (kind, row) in [
        (LayerKind::PlaceRow, &spec.place_row),
        (LayerKind::SocialRow, &spec.social_row),
    ] {
        if !row.has_visible_items() {
            continue;
        }
        push_text_layer(&mut layers, kind, ROW_SHADOW, || {
            let layout = layout_row(row, canvas.width_f64(), |label| {
                text.measure(ROW_LABEL_ROLE, LABEL_SIZE_PX, label)
            })?;
            row_ops(text, &layout, resources)
        })?;
    }

    if let (Some(clip), Some(image)) = (&spec.clipart, &resources.clipart) {
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let transform = Affine::translate((
            clip.center_x - clip.width * 0.5,
            clip.center_y - clip.height * 0.5,
        )) * Affine::scale_non_uniform(clip.width / iw, clip.height / ih);
        layers.push(Layer {
            kind: LayerKind::Clipart,
            content: LayerContent::Vector(vec![DrawOp::Image {
                image: image.clone(),
                transform,
            }]),
            shadow: None,
            blend: BlendMode::Normal,
        });
    }

    if spec.frame.style != FrameStyle::None {
        let recipe = shapes::frame_recipe(spec.frame.style, canvas.width_f64(), canvas.height_f64());
        let ops = shapes::frame_outlines(&recipe)
            .into_iter()
            .map(|(path, alpha)| DrawOp::FillPath {
                path,
                color: spec.frame.color.with_alpha_factor(alpha),
            })
            .collect();
        layers.push(Layer {
            kind: LayerKind::Frame,
            content: LayerContent::Vector(ops),
            shadow: recipe.shadow.map(|s| Shadow {
                color: s.color.unwrap_or(spec.frame.color),
                blur: s.blur,
                offset: s.offset,
            }),
            blend: BlendMode::Normal,
        });
    }

    Ok(RenderPlan { canvas, layers })
}

fn background_layer(spec: &PosterSpec, resources: &PreparedResources, canvas: Canvas) -> Layer {
    let content = match &resources.background {
        Some(image) => LayerContent::Vector(vec![DrawOp::Image {
            image: image.clone(),
            transform: cover_transform(image, spec, canvas),
        }]),
        None => {
            let palette = spec.template.palette();
            LayerContent::Raster(Arc::new(gradient::vertical_fill(
                palette.primary,
                palette.secondary,
                canvas,
            )))
        }
    };
    Layer {
        kind: LayerKind::Background,
        content,
        shadow: None,
        blend: BlendMode::Normal,
    }
}

/// Scale to cover the canvas, center, then apply the crop offset and extra scale around the
/// canvas center.
pub fn cover_transform(image: &DecodedImage, spec: &PosterSpec, canvas: Canvas) -> Affine {
    let (iw, ih) = (f64::from(image.width.max(1)), f64::from(image.height.max(1)));
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    let scale = (w / iw).max(h / ih) * spec.crop.scale;
    Affine::translate((w * 0.5 + spec.crop.offset_x, h * 0.5 + spec.crop.offset_y))
        * Affine::scale(scale)
        * Affine::translate((-iw * 0.5, -ih * 0.5))
}

/// Build a text layer. Recoverable failures drop the layer with a warning.
fn push_text_layer<F>(
    layers: &mut Vec<Layer>,
    kind: LayerKind,
    shadow: Shadow,
    build: F,
) -> PosterResult<()>
where
    F: FnOnce() -> PosterResult<Vec<DrawOp>>,
{
    match build() {
        Ok(ops) if ops.is_empty() => Ok(()),
        Ok(ops) => {
            layers.push(Layer {
                kind,
                content: LayerContent::Vector(ops),
                shadow: Some(shadow),
                blend: BlendMode::Normal,
            });
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!(layer = kind.name(), error = %e, "omitting layer");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn text_block_ops(
    engine: &mut TextLayoutEngine,
    block: &TextBlock<'_>,
    size_px: f32,
    fill: GlyphFill,
) -> PosterResult<Vec<DrawOp>> {
    let lines = wrap_words(block.text, block.max_width, |candidate| {
        engine.measure(block.role, size_px, candidate)
    })?;

    let mut shaped = Vec::with_capacity(lines.len());
    for line in &lines {
        shaped.push(engine.shape_line(block.role, size_px, line)?);
    }
    let widths: Vec<f64> = shaped.iter().map(|l| l.width).collect();
    let slots = place_lines(&widths, block.center_x, block.top, block.line_height, Anchor::Center);

    Ok(shaped
        .into_iter()
        .zip(slots)
        .map(|(line, slot)| DrawOp::Glyphs {
            font: line.font,
            size_px,
            glyphs: line.glyphs,
            origin: Point::new(slot.left, slot.top),
            fill,
        })
        .collect())
}

/// Place an icon raster of any size in the `ICON_SIZE` square left of `x`, centered on row `y`.
fn icon_transform(x: f64, y: f64, width: u32, height: u32) -> Affine {
    Affine::translate((x, y - ICON_SIZE * 0.5))
        * Affine::scale_non_uniform(
            ICON_SIZE / f64::from(width.max(1)),
            ICON_SIZE / f64::from(height.max(1)),
        )
}

fn row_ops(
    engine: &mut TextLayoutEngine,
    layout: &RowLayout,
    resources: &PreparedResources,
) -> PosterResult<Vec<DrawOp>> {
    let mut ops = Vec::new();
    for item in &layout.placements {
        match resources.icons.get(&item.icon) {
            Some(icon) => {
                ops.push(DrawOp::Image {
                    image: icon.clone(),
                    transform: icon_transform(item.x, item.y, icon.width, icon.height),
                });
            }
            None => {
                tracing::debug!(icon = item.icon.name(), "icon missing, drawing label only");
            }
        }

        let line = engine.shape_line(ROW_LABEL_ROLE, LABEL_SIZE_PX, &item.label)?;
        // Middle baseline: the em box is centered on the row's y.
        let top = item.y - (line.ascent + line.descent) * 0.5;
        ops.push(DrawOp::Glyphs {
            font: line.font,
            size_px: LABEL_SIZE_PX,
            glyphs: line.glyphs,
            origin: Point::new(item.label_x(), top),
            fill: GlyphFill::Solid(LABEL_GOLD),
        });
    }
    Ok(ops)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
