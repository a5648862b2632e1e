//! Build command: write `search.toml` and run `stork build`.

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use sitesearch_generator::{Generator, SearchIndexGenerator, StorkIndexer};
use tracing::info;

use super::load_inputs;

/// Generate the search index for a built site.
///
/// `stork_program` overrides the executable name looked up on `PATH`.
pub fn run(
    settings_path: &Path,
    site_path: &Path,
    output_dir: &Path,
    stork_program: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    let (settings, context) = load_inputs(settings_path, site_path)?;

    let mut indexer = StorkIndexer::new(settings.timeout());
    if let Some(program) = stork_program {
        indexer = indexer.with_program(program);
    }

    let generator = SearchIndexGenerator::with_indexer(context, &settings, output_dir, indexer)
        .wrap_err("resolving search settings")?;

    info!(
        generator = generator.name(),
        output = %output_dir.display(),
        "running generator"
    );
    generator
        .generate_output()
        .wrap_err("building search index")?;

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        "search index complete"
    );
    Ok(())
}
