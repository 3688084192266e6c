use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let map: HashMap<String, OsString> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), OsString::from(v)))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_loader_timeouts() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.timeouts(), LoaderTimeouts::default());
    assert!(cfg.system_fonts);
    assert!(cfg.font_dirs.is_empty());
}

#[test]
fn overrides_apply_when_present() {
    let dirs = std::env::join_paths(["/opt/fonts", "/usr/local/fonts"]).unwrap();
    let cfg = EngineConfig::default().with_overrides(lookup(&[
        (ENV_RESOURCE_TIMEOUT_MS, "250"),
        (ENV_FONT_TIMEOUT_MS, " 75 "),
        (ENV_FONT_DIRS, dirs.to_str().unwrap()),
        (ENV_NO_SYSTEM_FONTS, "1"),
    ]));
    assert_eq!(cfg.resource_timeout, Duration::from_millis(250));
    assert_eq!(cfg.font_timeout, Duration::from_millis(75));
    assert_eq!(
        cfg.font_dirs,
        vec![PathBuf::from("/opt/fonts"), PathBuf::from("/usr/local/fonts")]
    );
    assert!(!cfg.system_fonts);
}

#[test]
fn invalid_values_keep_defaults() {
    let cfg = EngineConfig::default().with_overrides(lookup(&[
        (ENV_RESOURCE_TIMEOUT_MS, "soon"),
        (ENV_NO_SYSTEM_FONTS, "0"),
    ]));
    assert_eq!(cfg.resource_timeout, LoaderTimeouts::default().image);
    assert!(cfg.system_fonts);
}

#[test]
fn asset_root_builder_replaces_root() {
    let cfg = EngineConfig::default().with_asset_root("/srv/posters");
    assert_eq!(cfg.asset_root, PathBuf::from("/srv/posters"));
}
