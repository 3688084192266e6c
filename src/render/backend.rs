use crate::{
    compile::plan::{Layer, RenderPlan},
    foundation::core::Canvas,
    foundation::error::{PosterError, PosterResult},
    foundation::math::Fnv1a64,
};

/// A finished poster as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**, tightly packed and row-major. Use
/// [`Poster::to_straight_rgba8`] before handing them to encoders that expect straight alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct Poster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Poster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("digest", &format_args!("{:016x}", self.digest()))
            .finish()
    }
}

impl Poster {
    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = self.data.get(idx..idx + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Stable content digest over dimensions and pixels.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(u64::from(self.width));
        h.write_u64(u64::from(self.height));
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Copy of the pixels with alpha un-premultiplied.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            if a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// A raster target that paints [`RenderPlan`] layers one at a time.
///
/// Each call to [`LayerBackend::paint_layer`] owns its layer's paint state; nothing set for one
/// layer may influence the next.
pub trait LayerBackend {
    /// Reset to a fully transparent canvas.
    fn begin(&mut self, canvas: Canvas) -> PosterResult<()>;

    fn paint_layer(&mut self, layer: &Layer) -> PosterResult<()>;

    /// Read back the painted canvas.
    fn finish(&mut self) -> PosterResult<Poster>;
}

/// Paint every layer of `plan` in order.
///
/// `is_current` is polled before each layer and once more before the result is returned; as
/// soon as it reports `false` the pass stops and yields `Ok(None)` so a stale poster is never
/// published.
#[tracing::instrument(skip_all, fields(layers = plan.layers.len()))]
pub fn execute_plan<B, F>(
    backend: &mut B,
    plan: &RenderPlan,
    mut is_current: F,
) -> PosterResult<Option<Poster>>
where
    B: LayerBackend + ?Sized,
    F: FnMut() -> bool,
{
    backend.begin(plan.canvas)?;
    for layer in &plan.layers {
        if !is_current() {
            tracing::debug!(layer = layer.kind.name(), "render superseded mid-paint");
            return Ok(None);
        }
        backend.paint_layer(layer)?;
    }
    let poster = backend.finish()?;
    if poster.width != plan.canvas.width || poster.height != plan.canvas.height {
        return Err(PosterError::evaluation(format!(
            "backend returned {}x{}, expected {}x{}",
            poster.width, poster.height, plan.canvas.width, plan.canvas.height
        )));
    }
    if !is_current() {
        tracing::debug!("render superseded before publish");
        return Ok(None);
    }
    Ok(Some(poster))
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
