use anyhow::{Context, Result};
use buscador_core::{
    load_catalog, load_config, load_preferences, save_preferences, Catalog, CriteriaDefaults,
    EngineConfig, Preferences,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load a catalog, reporting how many records were dropped
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let catalog = load_catalog(path)?;

    if catalog.skipped > 0 {
        warn!(
            skipped = catalog.skipped,
            "some listings were malformed; run `buscador validate` for details"
        );
    }
    info!(listings = catalog.records.len(), path = %path.display(), "catalog ready");

    Ok(catalog)
}

/// Load preferences if the file exists. A missing file means first use.
pub fn load_preferences_file(
    path: &Path,
    defaults: &CriteriaDefaults,
) -> Result<Option<Preferences>> {
    if !path.exists() {
        info!(path = %path.display(), "no saved preferences yet");
        return Ok(None);
    }
    Ok(Some(load_preferences(path, defaults)?))
}

pub fn save_preferences_file(prefs: &Preferences, path: &Path) -> Result<()> {
    save_preferences(prefs, path)?;
    Ok(())
}

/// Engine settings from an optional file, defaults otherwise
pub fn load_config_file(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// The catalog as untyped JSON, for validation reports
pub fn read_raw_catalog(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Catalog {} is not valid JSON", path.display()))
}
