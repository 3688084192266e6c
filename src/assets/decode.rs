use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PosterError, PosterResult};

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// A decoded font face plus the bytes needed to draw with it.
#[derive(Clone)]
pub struct FontFace {
    /// Primary family name found in the font's name table.
    pub family: String,
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

const MAX_RASTER_DIM: u32 = 16_384;

/// Decode an encoded raster (PNG, JPEG, ...) or an SVG document into premultiplied RGBA8.
///
/// SVG input is rasterized at its intrinsic size.
pub fn decode_image(bytes: &[u8]) -> PosterResult<DecodedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let size = tree.size();
        let w = (size.width().ceil() as u32).max(1);
        let h = (size.height().ceil() as u32).max(1);
        return rasterize_svg(&tree, w, h);
    }

    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PosterError::resource(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PosterResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| PosterError::resource(format!("{e:#}")))
}

/// Rasterize an SVG tree into a `width`x`height` premultiplied buffer, stretching to fit.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> PosterResult<DecodedImage> {
    if width == 0 || height == 0 || width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(PosterError::resource(format!(
            "svg raster size out of range: {width}x{height}"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PosterError::resource("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

/// Validate font bytes and read the primary family name.
pub fn decode_font(bytes: Vec<u8>) -> PosterResult<FontFace> {
    let mut db = usvg::fontdb::Database::new();
    let bytes = Arc::new(bytes);
    db.load_font_source(usvg::fontdb::Source::Binary(bytes.clone()));

    let face = db
        .faces()
        .next()
        .ok_or_else(|| PosterError::resource("font data contains no usable face"))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .ok_or_else(|| PosterError::resource("font face has no family name"))?;

    Ok(FontFace {
        family,
        index: face.index,
        bytes,
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
