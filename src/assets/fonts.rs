use std::{path::Path, sync::Arc};

use crate::assets::decode::FontFace;

/// System font index used for the per-role fallback families.
///
/// Wraps a `fontdb` database populated from the OS font directories (optional) plus any extra
/// directories. An empty database is valid: every lookup then returns `None` and text roles
/// that need it are skipped.
pub struct SystemFonts {
    db: usvg::fontdb::Database,
}

impl std::fmt::Debug for SystemFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFonts")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl SystemFonts {
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip(extra_dirs))]
    pub fn load(include_system: bool, extra_dirs: &[impl AsRef<Path>]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if include_system {
            db.load_system_fonts();
        }
        for dir in extra_dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        tracing::debug!(faces = db.len(), "system font index ready");
        Self { db }
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Resolve a CSS-style family list (`"Georgia, serif"`) to a concrete face.
    ///
    /// Named families are tried in order, then the generic families, then any face at all.
    /// With `bold` set the closest bold face of the matched family is preferred.
    pub fn resolve(&self, family_list: &str, bold: bool) -> Option<FontFace> {
        let candidates = font_family_candidates(family_list);
        let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
        for c in &candidates {
            families.push(match normalize_font_family(c).as_str() {
                "serif" => usvg::fontdb::Family::Serif,
                "sans-serif" => usvg::fontdb::Family::SansSerif,
                "monospace" => usvg::fontdb::Family::Monospace,
                "cursive" => usvg::fontdb::Family::Cursive,
                "fantasy" => usvg::fontdb::Family::Fantasy,
                _ => usvg::fontdb::Family::Name(c.as_str()),
            });
        }
        families.push(usvg::fontdb::Family::Serif);

        let query = usvg::fontdb::Query {
            families: &families,
            weight: if bold {
                usvg::fontdb::Weight::BOLD
            } else {
                usvg::fontdb::Weight::NORMAL
            },
            ..Default::default()
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;
        self.face_for(id)
    }

    fn face_for(&self, id: usvg::fontdb::ID) -> Option<FontFace> {
        let family = self
            .db
            .face(id)?
            .families
            .first()
            .map(|(name, _)| name.clone())?;
        self.db.with_face_data(id, |data, index| FontFace {
            family,
            bytes: Arc::new(data.to_vec()),
            index,
        })
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

/// Split a CSS font-family list into candidate names, appending `sans-serif` if absent.
pub(crate) fn font_family_candidates(font_name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for part in font_name.split(',') {
        let family = part.trim().trim_matches('"').trim_matches('\'').trim();
        if !family.is_empty() {
            out.push(family.to_string());
        }
    }
    if !out
        .iter()
        .any(|v| normalize_font_family(v) == "sans-serif")
    {
        out.push("sans-serif".to_string());
    }
    out
}

fn normalize_font_family(name: &str) -> String {
    name.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_ascii_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
