use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use {anyhow::Context, tracing::debug};

use crate::{env_subst::substitute_env, schema::PagerConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["pager.toml", "pager.yaml", "pager.yml", "pager.json"];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Lock guarding config writes.
static CONFIG_SAVE_LOCK: Mutex<()> = Mutex::new(());

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Set a custom config directory. When set, discovery only looks in this
/// directory. Each call replaces the previous override.
pub fn set_config_dir(path: PathBuf) {
    *lock(&CONFIG_DIR_OVERRIDE) = Some(path);
}

fn config_dir_override() -> Option<PathBuf> {
    lock(&CONFIG_DIR_OVERRIDE).clone()
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<PagerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path).with_context(|| format!("failed to parse {}", path.display()))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./pager.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/pager/pager.{toml,yaml,yml,json}` (user-global)
///
/// Returns `PagerConfig::default()` when no file exists. A file that exists
/// but does not parse is an error: the channel table is static data and a
/// broken one must not be silently replaced.
pub fn discover_and_load() -> anyhow::Result<PagerConfig> {
    match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        },
        None => {
            debug!("no config file found, using defaults");
            Ok(PagerConfig::default())
        },
    }
}

/// Find the first config file in standard locations.
///
/// When a config dir override is set, only that directory is searched.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return find_in(&dir);
    }
    find_in(Path::new(".")).or_else(|| user_config_dir().and_then(|dir| find_in(&dir)))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

fn user_config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("pager"))
}

/// Returns the config directory: override, or `~/.config/pager/`.
pub fn config_dir() -> Option<PathBuf> {
    config_dir_override().or_else(user_config_dir)
}

/// Returns the data directory: `~/.pager/`.
pub fn data_dir() -> PathBuf {
    home_dir()
        .map(|h| h.join(".pager"))
        .unwrap_or_else(|| PathBuf::from(".pager"))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pager.toml")
}

/// Write `config` only if no config file exists yet.
///
/// Returns the path written to, or `None` when a file was already present.
pub fn write_config_if_absent(config: &PagerConfig) -> anyhow::Result<Option<PathBuf>> {
    let _guard = lock(&CONFIG_SAVE_LOCK);
    if let Some(existing) = find_config_file() {
        debug!(path = %existing.display(), "config already present");
        return Ok(None);
    }
    let path = find_or_default_config_path();
    write_toml(config, &path)?;
    Ok(Some(path))
}

fn write_toml(config: &PagerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<PagerConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("pager.yaml");
        std::fs::write(
            &yaml,
            "host:\n  supports_channels: false\nchannels:\n  - id: a\n    urgency: low\n",
        )
        .unwrap();
        let cfg = load_config(&yaml).unwrap();
        assert!(!cfg.host.supports_channels);
        assert_eq!(cfg.channels[0].id, "a");

        let json = dir.path().join("pager.json");
        std::fs::write(&json, r#"{"host":{"package":"com.example"}}"#).unwrap();
        let cfg = load_config(&json).unwrap();
        assert_eq!(cfg.host.package, "com.example");
        assert!(cfg.host.supports_channels);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pager.ini");
        std::fs::write(&path, "x=1").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported config format"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pager.toml");
        std::fs::write(&path, "[[channels]\nid = ").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn find_in_respects_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pager.json"), "{}").unwrap();
        std::fs::write(dir.path().join("pager.toml"), "").unwrap();
        assert_eq!(find_in(dir.path()), Some(dir.path().join("pager.toml")));
    }

    #[test]
    fn toml_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pager.toml");
        let mut cfg = PagerConfig::default();
        cfg.host.known_assets = Some(vec!["pager_ringing".into()]);
        write_toml(&cfg, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }
}
