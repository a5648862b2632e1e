//! Content types handed over by the host site pipeline.

use std::{fmt, fs, path::Path};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use crate::error::{CoreError, Result};

/// A page or article produced by the host pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentItem {
    /// Display title, possibly containing inline HTML.
    pub title: String,

    /// Site-relative URL without a leading slash.
    pub url: String,

    /// Output path relative to the output directory.
    pub save_as: String,

    /// Source path relative to the content directory.
    pub relative_source_path: String,

    /// Localized versions of this item.
    #[serde(default)]
    pub translations: Vec<ContentItem>,
}

impl ContentItem {
    /// Create an item without translations.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        save_as: impl Into<String>,
        relative_source_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            save_as: save_as.into(),
            relative_source_path: relative_source_path.into(),
            translations: Vec::new(),
        }
    }

    /// Attach translations to this item.
    #[must_use]
    pub fn with_translations(mut self, translations: Vec<ContentItem>) -> Self {
        self.translations = translations;
        self
    }
}

/// The page and article collections of one site build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SiteContext {
    /// Standalone pages, in pipeline order.
    #[serde(default)]
    pub pages: Vec<ContentItem>,

    /// Articles, in pipeline order.
    #[serde(default)]
    pub articles: Vec<ContentItem>,
}

impl SiteContext {
    /// Create a context from page and article lists.
    #[must_use]
    pub fn new(pages: Vec<ContentItem>, articles: Vec<ContentItem>) -> Self {
        Self { pages, articles }
    }

    /// Load a JSON site manifest exported by the host pipeline.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Site manifest not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let context: SiteContext = serde_json::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse site manifest: {}", path.display()),
                e,
            )
        })?;

        tracing::debug!(
            pages = context.pages.len(),
            articles = context.articles.len(),
            "loaded site manifest"
        );

        Ok(context)
    }
}

/// A template page rendered from `source` into `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePage {
    /// Template path relative to the content directory.
    pub source: String,

    /// Rendered path relative to the output directory.
    pub destination: String,
}

/// Ordered source → destination mapping of template pages.
///
/// Entries keep the order in which they appear in the settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePages(Vec<TemplatePage>);

impl TemplatePages {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the destination of an existing source.
    pub fn insert(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        let source = source.into();
        let destination = destination.into();
        match self.0.iter_mut().find(|page| page.source == source) {
            Some(existing) => existing.destination = destination,
            None => self.0.push(TemplatePage {
                source,
                destination,
            }),
        }
    }

    /// Iterate entries in mapping order.
    pub fn iter(&self) -> std::slice::Iter<'_, TemplatePage> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S, D> FromIterator<(S, D)> for TemplatePages
where
    S: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut pages = Self::new();
        for (source, destination) in iter {
            pages.insert(source, destination);
        }
        pages
    }
}

impl<'a> IntoIterator for &'a TemplatePages {
    type Item = &'a TemplatePage;
    type IntoIter = std::slice::Iter<'a, TemplatePage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de> Deserialize<'de> for TemplatePages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TemplatePagesVisitor;

        impl<'de> Visitor<'de> for TemplatePagesVisitor {
            type Value = TemplatePages;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of template source paths to destination paths")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut pages = TemplatePages::new();
                while let Some((source, destination)) = access.next_entry::<String, String>()? {
                    pages.insert(source, destination);
                }
                Ok(pages)
            }
        }

        deserializer.deserialize_map(TemplatePagesVisitor)
    }
}
