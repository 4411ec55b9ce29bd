use anyhow::{Context, Result};
use buscador_core::{
    BrowseSession, Catalog, Category, CriteriaPatch, EngineConfig, PagedResults, StagingError,
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::operations::{load_catalog_file, load_preferences_file, save_preferences_file};

/// Application state for one CLI run
#[derive(Debug)]
pub struct AppState {
    /// Listings that survived loading
    pub catalog: Catalog,
    /// Path to the catalog file
    pub catalog_file: PathBuf,
    /// Path to the preferences file, if any
    pub prefs_file: Option<PathBuf>,
    /// Browsing state: filters, sort, query and page
    pub session: BrowseSession,
}

impl AppState {
    /// Load a catalog and restore saved preferences when a file is given
    pub fn open(
        catalog_file: &Path,
        prefs_file: Option<PathBuf>,
        config: EngineConfig,
        category: Category,
    ) -> Result<Self> {
        let catalog = load_catalog_file(catalog_file)?;
        let mut session = BrowseSession::new(config, category);

        if let Some(path) = &prefs_file {
            if let Some(prefs) = load_preferences_file(path, &session.config().defaults)? {
                session.restore(&prefs);
            }
        }

        Ok(Self {
            catalog,
            catalog_file: catalog_file.to_path_buf(),
            prefs_file,
            session,
        })
    }

    /// Stage filter edits and apply them in one step
    pub fn apply_edits(&mut self, patches: Vec<CriteriaPatch>) -> Result<(), StagingError> {
        if patches.is_empty() {
            return Ok(());
        }
        self.session.stage(patches)?;
        self.session.apply_filters();
        Ok(())
    }

    pub fn search(&mut self, as_of: DateTime<Utc>) -> PagedResults {
        self.session.search(&self.catalog.records, as_of)
    }

    /// Save applied filters, sort and view mode
    pub fn save_preferences(&self) -> Result<()> {
        let path = self
            .prefs_file
            .as_ref()
            .context("No preferences file set")?;
        save_preferences_file(&self.session.export_preferences(), path)
    }

    /// Title line with catalog name and category
    pub fn get_title(&self) -> String {
        let file_name = self
            .catalog_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("catalog");

        format!("{} - {}", file_name, self.session.category())
    }
}
