//! Stork configuration document.
//!
//! Built in memory and handed to the `toml` serializer.

use std::{fs, path::Path};

use thiserror::Error;
use tracing::trace;

use crate::collector::InputFile;

/// Document generation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Value conversion error.
    #[error("invalid value: {0}")]
    Value(#[from] toml::ser::Error),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// The `search.toml` document passed to `stork build`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Effective `[input]` options, excluding `files`.
    pub input: toml::Table,

    /// Records for `[[input.files]]`.
    pub files: Vec<InputFile>,

    /// `[output]` options, if any were configured.
    pub output: Option<toml::Table>,
}

impl IndexConfig {
    /// Assemble a document.
    #[must_use]
    pub fn new(input: toml::Table, files: Vec<InputFile>, output: Option<toml::Table>) -> Self {
        Self {
            input,
            files,
            output,
        }
    }

    /// Nested table form; `input.files` always replaces any option of that name.
    pub fn to_table(&self) -> Result<toml::Table> {
        let mut input = self.input.clone();
        input.insert("files".to_string(), toml::Value::try_from(&self.files)?);

        let mut root = toml::Table::new();
        root.insert("input".to_string(), toml::Value::Table(input));
        if let Some(output) = &self.output {
            root.insert("output".to_string(), toml::Value::Table(output.clone()));
        }

        Ok(root)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(&self.to_table()?)?)
    }

    /// Write the document, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml_string()?)?;

        trace!(
            path = %path.display(),
            files = self.files.len(),
            "wrote search settings"
        );
        Ok(())
    }
}
