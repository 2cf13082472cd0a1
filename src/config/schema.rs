/// Configuration schema and defaults for segview.
///
/// Sections: `[output]`, `[validation]` and `[logging]`. Every field has a
/// built-in default, so a config file only needs the keys it changes.
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level segview configuration.
///
/// Maps directly to `~/.segview/config.toml` and `.segview.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegviewConfig {
    pub output: OutputConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [output]
// ---------------------------------------------------------------------------

/// How a display tree is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name; unknown or missing names fall back to `table`.
    pub fn from_str_opt(s: Option<&str>) -> Self {
        Self::parse(s.unwrap_or_default()).unwrap_or_default()
    }

    /// Parse a format name, returning `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format when `--format` is not given.
    pub format: OutputFormat,
    /// Colorize table output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [validation]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject payloads whose segment keys disagree across mappings or whose
    /// transition matrix is not square, instead of rendering them as-is.
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one line per render to `~/.segview/render-log.jsonl`.
    pub enabled: bool,
    /// Number of entries `segview history` shows by default.
    pub history_limit: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_limit: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl SegviewConfig {
    /// Annotated default config file content, written by `segview config init`.
    pub fn default_toml() -> String {
        r#"# segview configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SEGVIEW_*)
#   2. Project config (.segview.toml in current directory)
#   3. User global config (~/.segview/config.toml)
#   4. Built-in defaults

[output]
format = "table"   # table | json | csv
color = true

[validation]
strict = false     # Reject ragged transition matrices and unmatched segment keys

[logging]
enabled = true     # Append renders to ~/.segview/render-log.jsonl
history_limit = 20
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
