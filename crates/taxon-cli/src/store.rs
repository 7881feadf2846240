//! Locating the store directory and catalog configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use taxon::{Catalog, CatalogConfig};
use taxon_file::FileStore;

/// Where the documents live and how the catalog reads them.
#[derive(Debug)]
pub struct StoreLocation {
    pub root: PathBuf,
    pub config: CatalogConfig,
}

impl StoreLocation {
    /// Resolve the store root and load the configuration, if any.
    pub fn resolve(store: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let root = match store {
            Some(root) => root,
            None => default_root()?,
        };

        let config = match config {
            Some(path) => CatalogConfig::from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CatalogConfig::default(),
        };

        Ok(Self { root, config })
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.root)
    }

    pub fn catalog(&self) -> Result<Catalog<FileStore>> {
        Catalog::new(Arc::new(self.file_store()), self.config.clone())
            .context("Invalid catalog configuration")
    }
}

fn default_root() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "taxon").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("store"))
}
