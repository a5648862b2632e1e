//! Sitesearch CLI Library
//!
//! Command implementations for the `sitesearch` binary. The binary stands in
//! for the host pipeline: it reads the settings file and an exported site
//! manifest, then runs the search generator once.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sitesearch::cmd;
//!
//! cmd::build::run(
//!     Path::new("settings.toml"),
//!     Path::new("site.json"),
//!     Path::new("output"),
//!     None,
//! )
//! .unwrap();
//! ```

pub mod cmd;

pub use sitesearch_core::{ContentItem, Settings, SiteContext};
pub use sitesearch_generator::{Generator, SearchIndexGenerator};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
