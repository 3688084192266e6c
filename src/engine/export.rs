use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{PosterError, PosterResult},
    render::backend::Poster,
};

/// Encode a poster as a straight-alpha RGBA8 PNG.
pub fn encode_png(poster: &Poster) -> PosterResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(poster.width, poster.height, poster.to_straight_rgba8())
        .ok_or_else(|| PosterError::evaluation("poster buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode poster png")?;
    Ok(buf)
}

/// Destination for a completed poster.
pub trait Exporter {
    fn export(&mut self, poster: &Poster) -> PosterResult<()>;
}

/// Writes the poster to a PNG file, creating the parent directory if needed.
#[derive(Clone, Debug)]
pub struct PngFileExporter {
    path: PathBuf,
}

impl PngFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for PngFileExporter {
    fn export(&mut self, poster: &Poster) -> PosterResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let png = encode_png(poster)?;
        std::fs::write(&self.path, png)
            .with_context(|| format!("write png '{}'", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "poster exported");
        Ok(())
    }
}

/// Host capability that publishes encoded poster bytes (a share sheet, a chat upload, ...).
pub trait ShareTarget {
    fn share(&mut self, png: Vec<u8>, caption: Option<&str>) -> PosterResult<()>;
}

/// Hands PNG bytes and an optional caption to a [`ShareTarget`].
#[derive(Debug)]
pub struct ShareExporter<T: ShareTarget> {
    target: T,
    caption: Option<String>,
}

impl<T: ShareTarget> ShareExporter<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T: ShareTarget> Exporter for ShareExporter<T> {
    fn export(&mut self, poster: &Poster) -> PosterResult<()> {
        let png = encode_png(poster)?;
        self.target.share(png, self.caption.as_deref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/export.rs"]
mod tests;
