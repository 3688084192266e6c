use std::{ffi::OsString, path::PathBuf, time::Duration};

use crate::assets::loader::LoaderTimeouts;

pub const ENV_RESOURCE_TIMEOUT_MS: &str = "POSTERKIT_RESOURCE_TIMEOUT_MS";
pub const ENV_FONT_TIMEOUT_MS: &str = "POSTERKIT_FONT_TIMEOUT_MS";
pub const ENV_FONT_DIRS: &str = "POSTERKIT_FONT_DIRS";
pub const ENV_NO_SYSTEM_FONTS: &str = "POSTERKIT_NO_SYSTEM_FONTS";

/// Engine-wide settings that are not part of a poster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base directory relative resource paths resolve against.
    pub asset_root: PathBuf,
    /// Bounded wait for images (background, clipart, icons).
    pub resource_timeout: Duration,
    /// Bounded wait for custom fonts before falling back to the role's system family.
    pub font_timeout: Duration,
    /// Extra directories scanned for fallback font families.
    pub font_dirs: Vec<PathBuf>,
    /// Whether installed system fonts take part in family fallback.
    pub system_fonts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let timeouts = LoaderTimeouts::default();
        Self {
            asset_root: PathBuf::from("."),
            resource_timeout: timeouts.image,
            font_timeout: timeouts.font,
            font_dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `POSTERKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var_os(key))
    }

    /// Apply overrides from `lookup`. Unparseable values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(d) = duration_ms(&lookup, ENV_RESOURCE_TIMEOUT_MS) {
            self.resource_timeout = d;
        }
        if let Some(d) = duration_ms(&lookup, ENV_FONT_TIMEOUT_MS) {
            self.font_timeout = d;
        }
        if let Some(dirs) = lookup(ENV_FONT_DIRS) {
            self.font_dirs
                .extend(std::env::split_paths(&dirs).filter(|p| !p.as_os_str().is_empty()));
        }
        if let Some(v) = lookup(ENV_NO_SYSTEM_FONTS) {
            let v = v.to_string_lossy();
            if matches!(v.trim(), "1" | "true" | "yes") {
                self.system_fonts = false;
            }
        }
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn timeouts(&self) -> LoaderTimeouts {
        LoaderTimeouts {
            image: self.resource_timeout,
            font: self.font_timeout,
        }
    }
}

fn duration_ms<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<OsString>,
{
    let raw = lookup(key)?;
    match raw.to_string_lossy().trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(key, value = %raw.to_string_lossy(), "ignoring invalid timeout override");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
