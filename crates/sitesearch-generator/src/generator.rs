//! Search index generator.
//!
//! Registered with the host pipeline as a [`Generator`]; runs once per build
//! after the site has been written.

use std::path::{Path, PathBuf};

use sitesearch_core::{
    CoreError, IndexMode, ResolvedOptions, Settings, SiteContext, TemplatePages,
};
use thiserror::Error;
use tracing::{debug, error, trace, warn};

use crate::{
    collector::{InputFile, collect_input_files},
    document::{DocumentError, IndexConfig},
    stork::{CommandRunner, IndexError, StorkIndexer, SystemRunner},
};

/// Prefix of every build log record.
pub const LOG_BANNER: &str = "Search plugin reported ";

/// File name of the Stork configuration inside the output directory.
pub const SETTINGS_FILE_NAME: &str = "search.toml";

/// Generator errors. All of them abort the build step.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Settings could not be resolved.
    #[error("config error: {0}")]
    Core(#[from] CoreError),

    /// The Stork configuration could not be written.
    #[error("search settings error: {0}")]
    Document(#[from] DocumentError),

    /// The index builder is missing or failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Output step invoked by the host pipeline once per build.
pub trait Generator {
    /// Name used in host logs.
    fn name(&self) -> &'static str;

    /// Produce this generator's output files.
    fn generate_output(&self) -> Result<()>;
}

/// Severity a build log is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildLogLevel {
    /// The log mentions an error.
    Error,
    /// Anything else.
    Debug,
}

/// Classify a build log by a plain, case-sensitive substring match on `error`.
#[must_use]
pub fn classify_build_log(log: &str) -> BuildLogLevel {
    if log.contains("error") {
        BuildLogLevel::Error
    } else {
        BuildLogLevel::Debug
    }
}

/// Emit the single log record for a finished index build.
pub fn report_build_log(log: &str) {
    let message = format!("{LOG_BANNER}{log}");
    match classify_build_log(&message) {
        BuildLogLevel::Error => error!("{message}"),
        BuildLogLevel::Debug => debug!("{message}"),
    }
}

/// Writes `search.toml` and runs `stork build` for one site build.
#[derive(Debug)]
pub struct SearchIndexGenerator<R = SystemRunner> {
    context: SiteContext,
    template_pages: TemplatePages,
    output_dir: PathBuf,
    options: ResolvedOptions,
    output_options: Option<toml::Table>,
    indexer: StorkIndexer<R>,
}

impl SearchIndexGenerator<SystemRunner> {
    /// Create a generator that runs the real `stork` binary.
    pub fn new(
        context: SiteContext,
        settings: &Settings,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let indexer = StorkIndexer::new(settings.timeout());
        Self::with_indexer(context, settings, output_dir, indexer)
    }
}

impl<R: CommandRunner> SearchIndexGenerator<R> {
    /// Create a generator with a custom indexer.
    ///
    /// Input options are resolved here; each deprecated setting that takes
    /// effect is logged once.
    pub fn with_indexer(
        context: SiteContext,
        settings: &Settings,
        output_dir: impl Into<PathBuf>,
        indexer: StorkIndexer<R>,
    ) -> Result<Self> {
        let output_dir = output_dir.into();
        let options = sitesearch_core::resolve_input_options(settings, &output_dir)?;

        for deprecation in &options.deprecations {
            warn!(setting = deprecation.setting, "{}", deprecation.message);
        }

        Ok(Self {
            context,
            template_pages: settings.template_pages.clone(),
            output_dir,
            options,
            output_options: settings.stork_output_options.clone(),
            indexer,
        })
    }

    /// Effective `[input]` options, without `files`.
    pub fn input_options(&self) -> &toml::Table {
        &self.options.input
    }

    /// Whether output files or source files are indexed.
    pub fn index_mode(&self) -> IndexMode {
        self.options.mode
    }

    /// Output directory of the site.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The indexer in use.
    pub fn indexer(&self) -> &StorkIndexer<R> {
        &self.indexer
    }

    /// Path `search.toml` is written to.
    pub fn settings_path(&self) -> PathBuf {
        self.output_dir.join(SETTINGS_FILE_NAME)
    }

    /// Records for every indexable document.
    pub fn get_input_files(&self) -> Vec<InputFile> {
        collect_input_files(&self.context, &self.template_pages, self.options.mode)
    }

    /// Assemble the Stork configuration with freshly collected files.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(
            self.options.input.clone(),
            self.get_input_files(),
            self.output_options.clone(),
        )
    }

    /// Write the Stork configuration to `path`.
    pub fn generate_stork_settings(&self, path: &Path) -> Result<()> {
        self.index_config().write_to(path)?;
        Ok(())
    }

    /// Run `stork build` against the configuration at `path`.
    pub fn build_search_index(&self, path: &Path) -> Result<String> {
        Ok(self.indexer.build_index(path, &self.output_dir)?)
    }
}

impl<R: CommandRunner> Generator for SearchIndexGenerator<R> {
    fn name(&self) -> &'static str {
        "search"
    }

    fn generate_output(&self) -> Result<()> {
        let settings_path = self.settings_path();
        self.generate_stork_settings(&settings_path)?;

        trace!(
            path = %settings_path.display(),
            mode = ?self.options.mode,
            "generated search settings"
        );

        let build_log = self.build_search_index(&settings_path)?;
        report_build_log(&build_log);
        Ok(())
    }
}
