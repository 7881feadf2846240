//! Catalog configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! {
//!   "images": { "base_url": "https://cdn.example.org/image/upload/" },
//!   "class_cache_ttl_secs": 60
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`CatalogConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

/// Top-level catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Collection names in the document store.
    pub collections: CollectionNames,

    /// CDN image URL templating.
    pub images: ImageConfig,

    /// Field names of observation documents.
    pub observations: ObservationFields,

    /// Freshness window of the class name cache, in seconds.
    pub class_cache_ttl_secs: u64,

    /// Page size used when a request does not name one.
    pub default_page_size: u32,

    /// Largest page size a request may ask for.
    pub max_page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            collections: CollectionNames::default(),
            images: ImageConfig::default(),
            observations: ObservationFields::default(),
            class_cache_ttl_secs: 300,
            default_page_size: 5,
            max_page_size: 50,
        }
    }
}

impl CatalogConfig {
    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_page_size must be positive".to_string(),
            });
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "default_page_size must be between 1 and {}",
                    self.max_page_size
                ),
            });
        }

        self.images.base_url()?;

        Ok(())
    }

    /// The class name cache freshness window.
    pub fn class_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.class_cache_ttl_secs)
    }
}

/// Collection names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    pub species: String,
    pub classes: String,
    pub observations: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            species: "species".to_string(),
            classes: "speciesClass".to_string(),
            observations: "observations".to_string(),
        }
    }
}

/// CDN image URL templating: `<base_url><transformation>/<version>/<reference>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub base_url: String,
    pub version: String,
    pub thumbnail: String,
    pub full: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://res.cloudinary.com/demo/image/upload/".to_string(),
            version: "v1".to_string(),
            thumbnail: "w_100,ar_1:1,c_fill,g_auto".to_string(),
            full: "w_1080,c_scale".to_string(),
        }
    }
}

impl ImageConfig {
    /// Parse the base URL, normalized to end in a slash.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            reason: format!("images.base_url '{}': {}", self.base_url, e),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                reason: format!("images.base_url '{}' cannot be a base", self.base_url),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

/// Field names on observation documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationFields {
    pub user_id: String,
    pub species_id: String,
    pub found_at: String,
}

impl Default for ObservationFields {
    fn default() -> Self {
        Self {
            user_id: "uid".to_string(),
            species_id: "speciesId".to_string(),
            found_at: "dateFound".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CatalogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.class_cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.collections.classes, "speciesClass");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = CatalogConfig::from_json(
            r#"{ "class_cache_ttl_secs": 60, "images": { "version": "v42" } }"#,
        )
        .unwrap();
        assert_eq!(config.class_cache_ttl_secs, 60);
        assert_eq!(config.images.version, "v42");
        assert_eq!(config.images.full, "w_1080,c_scale");
        assert_eq!(config.default_page_size, 5);
    }

    #[test]
    fn rejects_default_page_size_above_max() {
        let err = CatalogConfig::from_json(r#"{ "default_page_size": 80 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_bad_base_url() {
        let err =
            CatalogConfig::from_json(r#"{ "images": { "base_url": "not a url" } }"#).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let images = ImageConfig {
            base_url: "https://cdn.example.org/upload".to_string(),
            ..ImageConfig::default()
        };
        assert_eq!(
            images.base_url().unwrap().as_str(),
            "https://cdn.example.org/upload/"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CatalogConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
