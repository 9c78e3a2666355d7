//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::time::Duration;

/// Public instance of the catalog API the storefront was built against.
pub const DEFAULT_CATALOG_URL: &str = "https://api.escuelajs.co/api/v1";

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API, without a trailing slash.
    pub catalog_url: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Overrides the default `reqwest` user agent.
    pub user_agent: Option<String>,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl CatalogClientConfig {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            extra_headers: BTreeMap::new(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}
