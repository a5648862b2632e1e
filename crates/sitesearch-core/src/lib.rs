//! Sitesearch Core Library
//!
//! Settings, content model, and input-option resolution for the sitesearch
//! Stork integration.

pub mod content;
pub mod error;
pub mod options;
pub mod settings;

pub use content::{ContentItem, SiteContext, TemplatePage, TemplatePages};
pub use error::{CoreError, Result};
pub use options::{Deprecation, IndexMode, ResolvedOptions, SearchMode, resolve_input_options};
pub use settings::Settings;
