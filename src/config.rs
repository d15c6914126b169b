//! Site configuration
//!
//! Defaults describe the production site. A JSON file can override any
//! subset of fields; missing fields keep their defaults.

use anyhow::{Context, Result};
use app_ui::SiteIdentity;
use sanity_client::SanityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the whole site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public identity used in page metadata
    pub site: SiteIdentity,
    /// Content API settings
    pub sanity: SanityConfig,
}

impl SiteConfig {
    /// Load a configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read site config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid site config {}", path.display()))?;
        tracing::info!(
            project = %config.sanity.project_id,
            dataset = %config.sanity.dataset,
            "loaded site config"
        );
        Ok(config)
    }

    /// Set the site identity
    pub fn with_site(mut self, site: SiteIdentity) -> Self {
        self.site = site;
        self
    }

    /// Set the content API settings
    pub fn with_sanity(mut self, sanity: SanityConfig) -> Self {
        self.sanity = sanity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_production() {
        let config = SiteConfig::default();
        assert_eq!(config.site.site_url, "https://redmalanga.com");
        assert_eq!(config.sanity.project_id, "or9vpa2z");
        assert!(config.sanity.use_cdn);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"sanity": {"dataset": "staging", "use_cdn": false}}"#).unwrap();
        assert_eq!(config.sanity.dataset, "staging");
        assert!(!config.sanity.use_cdn);
        assert_eq!(config.sanity.project_id, "or9vpa2z");
        assert_eq!(config.site.brand, "Red Malanga");
    }
}
