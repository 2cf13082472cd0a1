/// Configuration system for segview.
///
/// Layers, lowest to highest precedence:
///
/// 1. **Built-in defaults** — [`schema::SegviewConfig::default()`]
/// 2. **User global config** — `~/.segview/config.toml`
/// 3. **Project local config** — `.segview.toml` in the current directory
/// 4. **Environment variables** — `SEGVIEW_*`
///
/// File layers are merged key by key: a project file that only sets
/// `output.format` keeps every other value from the global file.
///
/// ```rust,ignore
/// use segview::config;
///
/// let cfg = config::load();
/// if cfg.validation.strict {
///     // ...
/// }
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{OutputFormat, SegviewConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Never fails: unreadable or malformed files are skipped.
pub fn load() -> SegviewConfig {
    let mut config = load_layers(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
fn load_layers(paths: &[Option<PathBuf>]) -> SegviewConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());
    for path in paths.iter().flatten() {
        if let Some(layer) = read_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }
    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value. Returns `None` if missing or malformed.
fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Drop layers that do not fit the schema at all.
    value.clone().try_into::<SegviewConfig>().ok()?;
    Some(value)
}

/// Recursively merge `overlay` into `base`; tables merge, other values replace.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.segview/config.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".segview").join("config.toml"))
}

/// `.segview.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".segview.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `SEGVIEW_*` overrides read through `lookup`.
///
/// - `SEGVIEW_FORMAT` — `table`, `json` or `csv`
/// - `SEGVIEW_COLOR` — colorize table output (`1`/`true`/`yes`/`on`)
/// - `SEGVIEW_STRICT` — strict payload validation
/// - `SEGVIEW_LOG` — append renders to the history log
fn apply_env_overrides(config: &mut SegviewConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("SEGVIEW_FORMAT")
        && let Some(format) = OutputFormat::parse(&val)
    {
        config.output.format = format;
    }
    if let Some(val) = lookup("SEGVIEW_COLOR") {
        config.output.color = is_truthy(&val);
    }
    if let Some(val) = lookup("SEGVIEW_STRICT") {
        config.validation.strict = is_truthy(&val);
    }
    if let Some(val) = lookup("SEGVIEW_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.segview/config.toml`.
///
/// Fails if the file exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, SegviewConfig::default_toml()).context("failed to write config file")?;
    Ok(())
}

/// Set a dotted key (e.g. `output.format`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_value_in_file(&path, key, value)
}

fn set_value_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(SegviewConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    root.clone()
        .try_into::<SegviewConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML tree by dotted key, keeping the existing value's type.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be of the form section.key, got '{key}'");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Overwrite the global config with defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective configuration as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn no_files_gives_defaults() {
        let config = load_layers(&[None, None]);
        assert_eq!(config, SegviewConfig::default());
    }

    #[test]
    fn project_layer_merges_over_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(
            dir.path(),
            "global.toml",
            "[output]\nformat = \"json\"\ncolor = false\n[logging]\nhistory_limit = 5\n",
        );
        let project = write(dir.path(), "project.toml", "[output]\nformat = \"csv\"\n");

        let config = load_layers(&[Some(global), Some(project)]);

        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(!config.output.color);
        assert_eq!(config.logging.history_limit, 5);
    }

    #[test]
    fn malformed_layer_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.toml", "[output\nformat = ");
        let wrong_type = write(dir.path(), "wrong.toml", "[output]\nformat = \"xml\"\n");

        let config = load_layers(&[Some(bad), Some(wrong_type)]);
        assert_eq!(config, SegviewConfig::default());
    }

    #[test]
    fn env_overrides_beat_files() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(dir.path(), "global.toml", "[validation]\nstrict = false\n");
        let mut config = load_layers(&[Some(global)]);

        let env: HashMap<&str, &str> = HashMap::from([
            ("SEGVIEW_STRICT", "yes"),
            ("SEGVIEW_FORMAT", "json"),
            ("SEGVIEW_LOG", "0"),
        ]);
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert!(config.validation.strict);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn unknown_env_format_is_ignored() {
        let mut config = SegviewConfig::default();
        apply_env_overrides(&mut config, |k| (k == "SEGVIEW_FORMAT").then(|| "xml".to_string()));
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default_config(&path, false).unwrap();
        assert!(write_default_config(&path, false).is_err());
        assert!(write_default_config(&path, true).is_ok());
    }

    #[test]
    fn set_value_keeps_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set_value_in_file(&path, "validation.strict", "true").unwrap();
        set_value_in_file(&path, "logging.history_limit", "50").unwrap();
        set_value_in_file(&path, "output.format", "csv").unwrap();

        let config = load_layers(&[Some(path)]);
        assert!(config.validation.strict);
        assert_eq!(config.logging.history_limit, 50);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(set_value_in_file(&path, "nonexistent.key", "x").is_err());
        assert!(set_value_in_file(&path, "output.missing", "x").is_err());
        assert!(set_value_in_file(&path, "logging.history_limit", "many").is_err());
        assert!(set_value_in_file(&path, "output.format", "xml").is_err());
        assert!(set_value_in_file(&path, "toplevel", "x").is_err());
    }

    #[test]
    fn show_effective_config_round_trips() {
        let toml_str = show_effective_config().unwrap();
        let _: SegviewConfig = toml::from_str(&toml_str).unwrap();
    }
}
