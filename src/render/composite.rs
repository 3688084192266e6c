use crate::{
    compile::plan::Shadow,
    composition::model::BlendMode,
    foundation::error::{PosterError, PosterResult},
    foundation::math::mul_div255_u8,
    render::blur,
};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for one premultiplied pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

fn check_lengths(dst: &[u8], src: &[u8], what: &str) -> PosterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PosterError::evaluation(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PosterResult<()> {
    check_lengths(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` onto `dst` with a separable blend mode.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], blend: BlendMode) -> PosterResult<()> {
    // Dispatch once per layer; each arm gets its own monomorphized kernel.
    match blend {
        BlendMode::Normal => over_in_place(dst, src),
        BlendMode::Multiply => blend_with(dst, src, |s, d| s * d),
        BlendMode::Screen => blend_with(dst, src, |s, d| s + d - s * d),
        BlendMode::Darken => blend_with(dst, src, f32::min),
        BlendMode::Lighten => blend_with(dst, src, f32::max),
    }
}

#[inline(always)]
fn blend_with<F>(dst: &mut [u8], src: &[u8], blend_fn: F) -> PosterResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    check_lengths(dst, src, "blend_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = f32::from(s[3]) / 255.0;
        let da = f32::from(d[3]) / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
    Ok(())
}

/// Blurred, tinted copy of a layer's coverage, positioned in canvas pixels.
///
/// The patch may extend past the canvas; only its on-canvas part is composited.
#[derive(Clone, Debug)]
pub struct ShadowPatch {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ShadowPatch {
    pub fn pixel(&self, canvas_x: i64, canvas_y: i64) -> Option<PremulRgba8> {
        let px = canvas_x - self.x;
        let py = canvas_y - self.y;
        if px < 0 || py < 0 || px >= i64::from(self.width) || py >= i64::from(self.height) {
            return None;
        }
        let idx = ((py as usize) * (self.width as usize) + (px as usize)) * 4;
        let p = &self.data[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Source-over the patch onto a `width` x `height` canvas.
    pub fn over_canvas(&self, dst: &mut [u8], width: u32, height: u32) -> PosterResult<()> {
        if dst.len() != (width as usize) * (height as usize) * 4 {
            return Err(PosterError::evaluation(
                "shadow target does not match its dimensions",
            ));
        }
        let (w, h) = (i64::from(width), i64::from(height));
        let y_start = self.y.max(0);
        let y_end = (self.y + i64::from(self.height)).min(h);
        let x_start = self.x.max(0);
        let x_end = (self.x + i64::from(self.width)).min(w);
        for cy in y_start..y_end {
            for cx in x_start..x_end {
                let Some(s) = self.pixel(cx, cy) else {
                    continue;
                };
                if s[3] == 0 {
                    continue;
                }
                let idx = ((cy * w + cx) as usize) * 4;
                let d = &mut dst[idx..idx + 4];
                let out = over([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }
}

/// Build the shadow a layer casts: its alpha tinted with the shadow color, shifted by the
/// rounded offset and blurred.
///
/// Returns `None` when nothing would be visible.
pub fn cast_shadow(
    src: &[u8],
    width: u32,
    height: u32,
    shadow: &Shadow,
) -> PosterResult<Option<ShadowPatch>> {
    if src.len() != (width as usize) * (height as usize) * 4 {
        return Err(PosterError::evaluation(
            "cast_shadow expects src matching width*height*4",
        ));
    }
    let [tr, tg, tb, ta] = shadow.color.premultiplied();
    if ta == 0 {
        return Ok(None);
    }
    let Some((bx0, by0, bx1, by1)) = alpha_bounds(src, width, height) else {
        return Ok(None);
    };

    let (radius, sigma) = blur::shadow_kernel(shadow.blur);
    let round = |v: f64| if v.is_finite() { v.round() as i64 } else { 0 };
    let (dx, dy) = (round(shadow.offset.x), round(shadow.offset.y));
    let r = i64::from(radius);

    let x0 = i64::from(bx0) + dx - r;
    let y0 = i64::from(by0) + dy - r;
    let pw = (bx1 - bx0) + 2 * radius;
    let ph = (by1 - by0) + 2 * radius;
    let (w, h) = (i64::from(width), i64::from(height));

    let mut data = vec![0u8; (pw as usize) * (ph as usize) * 4];
    for py in 0..i64::from(ph) {
        let sy = y0 + py - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for px in 0..i64::from(pw) {
            let sx = x0 + px - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let a = src[((sy * w + sx) as usize) * 4 + 3];
            if a == 0 {
                continue;
            }
            let a = u16::from(a);
            let idx = ((py * i64::from(pw) + px) as usize) * 4;
            data[idx] = mul_div255_u8(u16::from(tr), a);
            data[idx + 1] = mul_div255_u8(u16::from(tg), a);
            data[idx + 2] = mul_div255_u8(u16::from(tb), a);
            data[idx + 3] = mul_div255_u8(u16::from(ta), a);
        }
    }

    let data = if radius > 0 {
        blur::blur_rgba8_premul(&data, pw, ph, radius, sigma)?
    } else {
        data
    };
    Ok(Some(ShadowPatch {
        x: x0,
        y: y0,
        width: pw,
        height: ph,
        data,
    }))
}

/// Bounding box `(x0, y0, x1, y1)` of pixels with non-zero alpha, exclusive on the far side.
pub fn alpha_bounds(src: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let w = width as usize;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (y, row) in src.chunks_exact(w * 4).take(height as usize).enumerate() {
        let mut first = None;
        let mut last = 0usize;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] != 0 {
                first.get_or_insert(x);
                last = x;
            }
        }
        let Some(first) = first else {
            continue;
        };
        let (y, first, last) = (y as u32, first as u32, last as u32 + 1);
        bounds = Some(match bounds {
            None => (first, y, last, y + 1),
            Some((x0, y0, x1, _)) => (x0.min(first), y0, x1.max(last), y + 1),
        });
    }
    bounds
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
