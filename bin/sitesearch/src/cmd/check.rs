//! Check command: resolve settings and render `search.toml` without building.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitesearch_generator::SearchIndexGenerator;
use tracing::info;

use super::load_inputs;

/// Render the Stork configuration the build command would write.
pub fn run(settings_path: &Path, site_path: &Path, output_dir: &Path) -> Result<String> {
    let (settings, context) = load_inputs(settings_path, site_path)?;
    let generator = SearchIndexGenerator::new(context, &settings, output_dir)
        .wrap_err("resolving search settings")?;

    let config = generator.index_config();
    info!(
        files = config.files.len(),
        mode = ?generator.index_mode(),
        "search settings are valid"
    );

    config
        .to_toml_string()
        .wrap_err("serializing search settings")
}
