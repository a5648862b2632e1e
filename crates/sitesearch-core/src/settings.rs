//! Build settings recognized by the search generator.
//!
//! Keys follow the host pipeline's upper-case naming so an existing settings
//! file can be read as-is. Keys this crate does not know about are ignored.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    content::TemplatePages,
    error::{CoreError, Result},
};

/// Settings bundle for one site build.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Source content root.
    #[serde(rename = "PATH", default)]
    pub path: Option<PathBuf>,

    /// Template pages rendered outside the content collections.
    #[serde(rename = "TEMPLATE_PAGES", default)]
    pub template_pages: TemplatePages,

    /// Stork `[input]` options. When present, the deprecated keys are ignored.
    #[serde(rename = "STORK_INPUT_OPTIONS", default)]
    pub stork_input_options: Option<toml::Table>,

    /// Stork `[output]` options.
    #[serde(rename = "STORK_OUTPUT_OPTIONS", default)]
    pub stork_output_options: Option<toml::Table>,

    /// Seconds to wait for `stork build` before killing it.
    #[serde(rename = "STORK_TIMEOUT", default = "default_timeout_secs")]
    pub stork_timeout: u64,

    /// Deprecated: use `STORK_INPUT_OPTIONS.html_selector`.
    #[serde(rename = "SEARCH_HTML_SELECTOR", default)]
    pub search_html_selector: Option<String>,

    /// Deprecated: use `STORK_INPUT_OPTIONS.base_directory`.
    #[serde(rename = "SEARCH_MODE", default)]
    pub search_mode: Option<String>,
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: None,
            template_pages: TemplatePages::default(),
            stork_input_options: None,
            stork_output_options: None,
            stork_timeout: default_timeout_secs(),
            search_html_selector: None,
            search_mode: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse settings file: {}", path.display()),
                e,
            )
        })?;

        Ok(settings)
    }

    /// Parse settings from a TOML document.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Time limit for the index builder; `None` when set to zero.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.stork_timeout > 0).then(|| Duration::from_secs(self.stork_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let settings_path = dir.path().join("settings.toml");
        let doc = r#"
PATH = "content"
SITENAME = "Ignored by the search generator"
STORK_TIMEOUT = 60

[TEMPLATE_PAGES]
"src/books.html" = "dest/books.html"

[STORK_INPUT_OPTIONS]
html_selector = "article"
url_prefix = "https://example.com/"

[STORK_OUTPUT_OPTIONS]
debug = true
"#;
        std::fs::write(&settings_path, doc).expect("write");

        let settings = Settings::load(&settings_path).expect("load settings");

        assert_eq!(settings.path, Some(PathBuf::from("content")));
        assert_eq!(settings.template_pages.len(), 1);
        let input = settings.stork_input_options.as_ref().expect("input options");
        assert_eq!(input["html_selector"].as_str(), Some("article"));
        let output = settings.stork_output_options.as_ref().expect("output options");
        assert_eq!(output["debug"].as_bool(), Some(true));
        assert_eq!(settings.timeout(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_toml("").expect("parse empty settings");

        assert!(settings.path.is_none());
        assert!(settings.template_pages.is_empty());
        assert!(settings.stork_input_options.is_none());
        assert!(settings.stork_output_options.is_none());
        assert!(settings.search_html_selector.is_none());
        assert!(settings.search_mode.is_none());
        assert_eq!(settings.timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let settings = Settings::from_toml("STORK_TIMEOUT = 0").expect("parse");
        assert!(settings.timeout().is_none());
    }

    #[test]
    fn test_empty_input_options_are_present() {
        let settings = Settings::from_toml("[STORK_INPUT_OPTIONS]").expect("parse");
        assert!(settings.stork_input_options.is_some_and(|t| t.is_empty()));
    }

    #[test]
    fn test_settings_not_found() {
        let result = Settings::load(Path::new("/nonexistent/settings.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_settings_parse_failure_names_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let settings_path = dir.path().join("settings.toml");
        std::fs::write(&settings_path, "STORK_TIMEOUT = \"soon\"").expect("write");

        let err = Settings::load(&settings_path).unwrap_err();
        assert!(matches!(err, CoreError::Config { source: Some(_), .. }));
        assert!(err.to_string().contains("Failed to parse settings file"));
    }
}
