use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::{DecodedImage, FontFace},
    compile::plan::{DrawOp, GlyphFill, Layer, LayerContent},
    foundation::core::{Affine, BezPath, Canvas, Point},
    foundation::error::{PosterError, PosterResult},
    paint::gradient::ColorRamp,
    render::backend::{LayerBackend, Poster},
    render::composite,
    text::flow::GOLDEN_STOPS,
};

/// Height in texels of the golden text ramp; the paint transform stretches it to the font size.
const GOLDEN_RAMP_LEN: u16 = 256;

/// CPU raster backend powered by `vello_cpu`.
///
/// Vector layers are drawn into a scratch pixmap, then shadowed and blended onto the canvas in
/// software. Decoded images and fonts are converted to `vello_cpu` paints once and reused
/// across renders while the engine still holds them.
pub struct CpuBackend {
    canvas: Canvas,
    target: Vec<u8>,
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
    image_cache: HashMap<usize, (Arc<DecodedImage>, vello_cpu::Image)>,
    font_cache: HashMap<usize, (Arc<FontFace>, vello_cpu::peniko::FontData)>,
    golden: Option<vello_cpu::Image>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("canvas", &self.canvas)
            .field("cached_images", &self.image_cache.len())
            .field("cached_fonts", &self.font_cache.len())
            .finish()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            canvas: Canvas::POSTER,
            target: Vec::new(),
            ctx: None,
            scratch: None,
            image_cache: HashMap::new(),
            font_cache: HashMap::new(),
            golden: None,
        }
    }

    fn size_u16(&self) -> PosterResult<(u16, u16)> {
        let w: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| PosterError::evaluation("canvas width exceeds u16"))?;
        let h: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| PosterError::evaluation("canvas height exceeds u16"))?;
        Ok((w, h))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> PosterResult<R>,
    ) -> PosterResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Draw `ops` into the scratch pixmap, replacing its previous contents.
    fn rasterize_vector(&mut self, ops: &[DrawOp]) -> PosterResult<()> {
        let (w, h) = self.size_u16()?;
        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        scratch.data_as_u8_slice_mut().fill(0);

        self.with_ctx_mut(w, h, |backend, ctx| {
            for op in ops {
                backend.draw_op(ctx, op)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
            Ok(())
        })?;
        self.scratch = Some(scratch);
        Ok(())
    }

    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> PosterResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath { path, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    color.r, color.g, color.b, color.a,
                ));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::Image { image, transform } => {
                let paint = self.image_paint_for(image)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width),
                    f64::from(image.height),
                ));
            }
            DrawOp::Glyphs {
                font,
                size_px,
                glyphs,
                origin,
                fill,
            } => {
                let font_data = self.font_data_for(font);
                ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
                match fill {
                    GlyphFill::Solid(c) => {
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                    }
                    GlyphFill::Golden => {
                        ctx.set_paint(self.golden_paint()?);
                        ctx.set_paint_transform(vello_cpu::kurbo::Affine::scale_non_uniform(
                            1.0,
                            f64::from(*size_px) / f64::from(GOLDEN_RAMP_LEN),
                        ));
                    }
                }
                let run = glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(*size_px)
                    .fill_glyphs(run);
            }
        }
        Ok(())
    }

    fn image_paint_for(&mut self, image: &Arc<DecodedImage>) -> PosterResult<vello_cpu::Image> {
        let key = Arc::as_ptr(image) as usize;
        if let Some((_, paint)) = self.image_cache.get(&key) {
            return Ok(paint.clone());
        }
        let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(key, (image.clone(), paint.clone()));
        Ok(paint)
    }

    fn font_data_for(&mut self, font: &Arc<FontFace>) -> vello_cpu::peniko::FontData {
        let key = Arc::as_ptr(font) as usize;
        self.font_cache
            .entry(key)
            .or_insert_with(|| {
                let data = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                    font.index,
                );
                (font.clone(), data)
            })
            .1
            .clone()
    }

    /// 1 x [`GOLDEN_RAMP_LEN`] premultiplied ramp, top to bottom.
    fn golden_paint(&mut self) -> PosterResult<vello_cpu::Image> {
        if let Some(paint) = &self.golden {
            return Ok(paint.clone());
        }
        let ramp = ColorRamp::from_offsets(&GOLDEN_STOPS);
        let len = usize::from(GOLDEN_RAMP_LEN);
        let mut bytes = Vec::with_capacity(len * 4);
        for i in 0..len {
            let t = (i as f32 + 0.5) / len as f32;
            bytes.extend_from_slice(&ramp.sample(t));
        }
        let pixmap = image_premul_bytes_to_pixmap(&bytes, 1, u32::from(GOLDEN_RAMP_LEN))?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.golden = Some(paint.clone());
        Ok(paint)
    }

    /// Drop cached paints for resources nobody else holds anymore.
    fn evict_unshared(&mut self) {
        self.image_cache
            .retain(|_, (image, _)| Arc::strong_count(image) > 1);
        self.font_cache
            .retain(|_, (font, _)| Arc::strong_count(font) > 1);
    }
}

impl LayerBackend for CpuBackend {
    fn begin(&mut self, canvas: Canvas) -> PosterResult<()> {
        self.canvas = canvas;
        self.size_u16()?;
        self.target.clear();
        self.target.resize(canvas.byte_len(), 0);
        self.evict_unshared();
        Ok(())
    }

    fn paint_layer(&mut self, layer: &Layer) -> PosterResult<()> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        if self.target.len() != self.canvas.byte_len() {
            return Err(PosterError::evaluation("paint_layer called before begin"));
        }

        if let LayerContent::Vector(ops) = &layer.content {
            self.rasterize_vector(ops)?;
        }
        let src: &[u8] = match &layer.content {
            LayerContent::Vector(_) => self
                .scratch
                .as_ref()
                .ok_or_else(|| PosterError::evaluation("scratch pixmap missing"))?
                .data_as_u8_slice(),
            LayerContent::Raster(image) => {
                if image.width != w || image.height != h {
                    return Err(PosterError::evaluation(format!(
                        "{} raster is {}x{}, canvas is {w}x{h}",
                        layer.kind.name(),
                        image.width,
                        image.height
                    )));
                }
                image.rgba8_premul.as_slice()
            }
        };

        if let Some(shadow) = &layer.shadow
            && let Some(patch) = composite::cast_shadow(src, w, h, shadow)?
        {
            patch.over_canvas(&mut self.target, w, h)?;
        }
        composite::blend_in_place(&mut self.target, src, layer.blend)
    }

    fn finish(&mut self) -> PosterResult<Poster> {
        if self.target.len() != self.canvas.byte_len() {
            return Err(PosterError::evaluation("finish called before begin"));
        }
        Ok(Poster {
            width: self.canvas.width,
            height: self.canvas.height,
            data: std::mem::take(&mut self.target),
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::evaluation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::evaluation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PosterError::evaluation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
