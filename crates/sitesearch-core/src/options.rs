//! Effective Stork input options.
//!
//! Three sources are merged, lowest priority first:
//!
//! 1. built-in defaults (`html_selector`, `base_directory`),
//! 2. the deprecated `SEARCH_HTML_SELECTOR` / `SEARCH_MODE` settings, honored
//!    only when `STORK_INPUT_OPTIONS` is absent,
//! 3. `STORK_INPUT_OPTIONS`, key by key.
//!
//! Resolution is pure: deprecation notices are returned to the caller, which
//! decides how to report them.

use std::{fmt, path::Path, str::FromStr};

use crate::{
    error::{CoreError, Result},
    settings::Settings,
};

/// Default CSS selector Stork extracts page text from.
pub const DEFAULT_HTML_SELECTOR: &str = "main";

/// Value of the deprecated `SEARCH_MODE` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Index generated HTML in the output directory.
    Output,
    /// Index source files in the content directory.
    Source,
}

impl FromStr for SearchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "output" => Ok(Self::Output),
            "source" => Ok(Self::Source),
            other => Err(CoreError::config(format!(
                "SEARCH_MODE must be \"output\" or \"source\", got \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => f.write_str("output"),
            Self::Source => f.write_str("source"),
        }
    }
}

/// Whether indexed paths point at generated output or raw sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// `base_directory` is the output directory.
    Output,
    /// `base_directory` is anything else, usually the content directory.
    Source,
}

/// A deprecated setting that was honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    /// Name of the deprecated setting.
    pub setting: &'static str,

    /// Human-readable notice.
    pub message: String,
}

/// Input options after the merge.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    /// Effective `[input]` options, without `files`.
    pub input: toml::Table,

    /// Indexing mode derived from `base_directory`.
    pub mode: IndexMode,

    /// Deprecated settings that took effect.
    pub deprecations: Vec<Deprecation>,
}

/// Render a path the way it appears in the Stork configuration.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Merge defaults, deprecated settings and `STORK_INPUT_OPTIONS`.
pub fn resolve_input_options(settings: &Settings, output_dir: &Path) -> Result<ResolvedOptions> {
    let output_dir = path_string(output_dir);

    let mut input = toml::Table::new();
    input.insert(
        "html_selector".to_string(),
        toml::Value::String(DEFAULT_HTML_SELECTOR.to_string()),
    );
    input.insert(
        "base_directory".to_string(),
        toml::Value::String(output_dir.clone()),
    );

    let mut deprecations = Vec::new();

    match &settings.stork_input_options {
        Some(options) => {
            for (key, value) in options {
                input.insert(key.clone(), value.clone());
            }
        }
        None => {
            if let Some(selector) = &settings.search_html_selector {
                input.insert(
                    "html_selector".to_string(),
                    toml::Value::String(selector.clone()),
                );
                deprecations.push(Deprecation {
                    setting: "SEARCH_HTML_SELECTOR",
                    message: format!(
                        "SEARCH_HTML_SELECTOR is deprecated and will be removed in a future \
                         release. Set STORK_INPUT_OPTIONS.html_selector = \"{selector}\" instead."
                    ),
                });
            }

            if let Some(raw_mode) = &settings.search_mode {
                let mode: SearchMode = raw_mode.parse()?;
                let base_directory = match mode {
                    SearchMode::Output => output_dir.clone(),
                    SearchMode::Source => settings
                        .path
                        .as_deref()
                        .map(path_string)
                        .ok_or_else(|| CoreError::config("SEARCH_MODE = source requires PATH"))?,
                };
                input.insert(
                    "base_directory".to_string(),
                    toml::Value::String(base_directory.clone()),
                );
                deprecations.push(Deprecation {
                    setting: "SEARCH_MODE",
                    message: format!(
                        "SEARCH_MODE = {mode} is deprecated and will be removed in a future \
                         release. Set STORK_INPUT_OPTIONS.base_directory = \"{base_directory}\" \
                         instead."
                    ),
                });
            }
        }
    }

    // A user-supplied list would be replaced anyway.
    input.remove("files");

    let mode = match input.get("base_directory").and_then(toml::Value::as_str) {
        Some(base) if base == output_dir => IndexMode::Output,
        _ => IndexMode::Source,
    };

    Ok(ResolvedOptions {
        input,
        mode,
        deprecations,
    })
}
