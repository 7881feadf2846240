//! Image URL templating.

use std::fmt;

use url::Url;

use crate::config::{ConfigError, ImageConfig};

/// Derives display URLs from stored image references.
pub trait ImageUrls: Send + Sync + fmt::Debug {
    /// Small square thumbnail for list views.
    fn thumbnail(&self, reference: &str) -> Option<String>;

    /// Full-size image.
    fn full(&self, reference: &str) -> Option<String>;
}

/// CDN-backed templating: `<base><transformation>/<version>/<reference>`.
#[derive(Debug, Clone)]
pub struct CdnImageUrls {
    base: Url,
    version: String,
    thumbnail: String,
    full: String,
}

impl CdnImageUrls {
    /// Build from configuration.
    pub fn new(config: &ImageConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base: config.base_url()?,
            version: config.version.trim_matches('/').to_string(),
            thumbnail: config.thumbnail.trim_matches('/').to_string(),
            full: config.full.trim_matches('/').to_string(),
        })
    }

    fn render(&self, transformation: &str, reference: &str) -> Option<String> {
        let reference = reference.trim().trim_start_matches('/');
        if reference.is_empty() {
            return None;
        }

        let relative = [transformation, self.version.as_str(), reference]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        // The leading "./" keeps a segment like "c:fill" from parsing as a scheme.
        self.base
            .join(&format!("./{}", relative))
            .ok()
            .map(String::from)
    }
}

impl ImageUrls for CdnImageUrls {
    fn thumbnail(&self, reference: &str) -> Option<String> {
        self.render(&self.thumbnail, reference)
    }

    fn full(&self, reference: &str) -> Option<String> {
        self.render(&self.full, reference)
    }
}
