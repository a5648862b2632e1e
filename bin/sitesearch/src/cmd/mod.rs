//! Command implementations.

pub mod build;
pub mod check;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitesearch_core::{Settings, SiteContext};

/// Load the settings file and site manifest shared by every command.
pub(crate) fn load_inputs(
    settings_path: &Path,
    site_path: &Path,
) -> Result<(Settings, SiteContext)> {
    let settings = Settings::load(settings_path)
        .wrap_err_with(|| format!("loading settings from {}", settings_path.display()))?;
    let context = SiteContext::load(site_path)
        .wrap_err_with(|| format!("loading site manifest from {}", site_path.display()))?;
    Ok((settings, context))
}
