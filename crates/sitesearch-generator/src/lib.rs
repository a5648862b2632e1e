//! Sitesearch Generator Library
//!
//! Turns a site's content into a Stork configuration and drives `stork build`.
//!
//! # Modules
//!
//! - [`collector`] - Flattens pages, articles, translations and template pages
//! - [`document`] - The `search.toml` configuration document
//! - [`stork`] - Locating and running the index builder
//! - [`generator`] - The per-build generator entry point

pub mod collector;
pub mod document;
pub mod generator;
pub mod stork;

pub use collector::{InputFile, collect_input_files};
pub use document::{DocumentError, IndexConfig};
pub use generator::{
    BuildLogLevel, Generator, GeneratorError, LOG_BANNER, SETTINGS_FILE_NAME,
    SearchIndexGenerator, classify_build_log,
};
pub use stork::{CommandOutput, CommandRunner, IndexError, StorkIndexer, SystemRunner};
