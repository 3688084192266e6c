use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use crate::{
    assets::decode::FontFace,
    composition::model::FontRole,
    foundation::error::{PosterError, PosterResult},
};

/// Width measurement capability used by word wrap and row layout.
pub trait TextMeasure {
    /// Advance width in pixels of `text` set on one line in `role`'s font at `size_px`.
    fn measure(&mut self, role: FontRole, size_px: f32, text: &str) -> PosterResult<f64>;
}

/// One glyph positioned relative to its line's top-left corner (`y` is the baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A single shaped line of text.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    pub glyphs: Vec<PlacedGlyph>,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub font: Arc<FontFace>,
    pub size_px: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct NoBrush;

/// Parley-backed shaper over the fonts resolved for each role.
///
/// Each role's face is registered once with the font collection; shaping then selects it by
/// family name so layout and painting agree on the exact face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<NoBrush>,
    families: BTreeMap<FontRole, (String, Arc<FontFace>)>,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("roles", &self.families.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TextLayoutEngine {
    /// Register every role's face. Faces parley cannot read are logged and left unregistered;
    /// text in those roles then fails to measure.
    pub fn new(fonts: &BTreeMap<FontRole, Arc<FontFace>>) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let mut families = BTreeMap::<FontRole, (String, Arc<FontFace>)>::new();
        for (role, face) in fonts {
            // Faces shared between roles are registered once.
            let shared = families
                .values()
                .find(|(_, f)| Arc::ptr_eq(&f.bytes, &face.bytes))
                .map(|(name, _)| name.clone());
            if let Some(name) = shared {
                families.insert(*role, (name, face.clone()));
                continue;
            }

            let registered = font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(face.bytes.as_ref().clone()),
                None,
            );
            let name = registered
                .first()
                .and_then(|(id, _)| font_ctx.collection.family_name(*id))
                .map(str::to_string);
            match name {
                Some(name) => {
                    families.insert(*role, (name, face.clone()));
                }
                None => {
                    tracing::warn!(role = role.name(), family = %face.family, "font rejected by shaper");
                }
            }
        }

        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            families,
        }
    }

    pub fn has_role(&self, role: FontRole) -> bool {
        self.families.contains_key(&role)
    }

    fn layout(
        &mut self,
        role: FontRole,
        size_px: f32,
        text: &str,
    ) -> PosterResult<(parley::Layout<NoBrush>, Arc<FontFace>)> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::measurement("text size must be finite and > 0"));
        }
        let (family, face) = self.families.get(&role).cloned().ok_or_else(|| {
            PosterError::measurement(format!("no font available for {} text", role.name()))
        })?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if role.is_bold() {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(NoBrush));

        let mut layout: parley::Layout<NoBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok((layout, face))
    }

    /// Shape `text` as a single unwrapped line.
    pub fn shape_line(
        &mut self,
        role: FontRole,
        size_px: f32,
        text: &str,
    ) -> PosterResult<ShapedLine> {
        let (layout, font) = self.layout(role, size_px, text)?;

        let mut glyphs = Vec::new();
        let mut width = 0.0f64;
        let mut ascent = 0.0f64;
        let mut descent = 0.0f64;
        for (i, line) in layout.lines().enumerate() {
            let m = line.metrics();
            if i == 0 {
                ascent = f64::from(m.ascent);
                descent = f64::from(m.descent);
            }
            width = width.max(f64::from(m.advance));
            let line_top = m.baseline - m.ascent;

            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let baseline = run.baseline() - line_top;
                for g in run.glyphs() {
                    glyphs.push(PlacedGlyph {
                        id: u32::from(g.id),
                        x: x + g.x,
                        y: baseline - g.y,
                    });
                    x += g.advance;
                }
            }
        }

        if !text.trim().is_empty() && glyphs.is_empty() {
            return Err(PosterError::measurement(format!(
                "no glyphs shaped for {} text",
                font.family
            )));
        }

        Ok(ShapedLine {
            glyphs,
            width,
            ascent,
            descent,
            font,
            size_px,
        })
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, role: FontRole, size_px: f32, text: &str) -> PosterResult<f64> {
        let (layout, _) = self.layout(role, size_px, text)?;
        let width = layout
            .lines()
            .map(|l| f64::from(l.metrics().advance))
            .fold(0.0f64, f64::max);
        if !width.is_finite() {
            return Err(PosterError::measurement("non-finite text advance"));
        }
        Ok(width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
