use std::time::Duration;

use anyhow::{Context, Result};
use storefront_catalog::{CatalogClient, CatalogClientConfig, Client};
use tracing::debug;

use crate::config::Config;

/// User agent sent with every catalog request unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Translate the CLI config into the client's configuration.
pub fn catalog_client_config(config: &Config) -> CatalogClientConfig {
    let mut extra_headers = config.extra_headers.clone();

    // Pass in a bool if we are running in CI, so requests can reflect this in the headers
    if std::env::var("CI").is_ok() {
        extra_headers.insert("storefront-ci".to_string(), "true".to_string());
    };

    CatalogClientConfig {
        catalog_url: config.catalog_url.clone(),
        extra_headers,
        user_agent: Some(
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        ),
        timeout: config.timeout_secs.map(Duration::from_secs),
    }
}

/// Initialize the catalog API client
pub fn init_catalog_client(config: &Config) -> Result<Client> {
    let client_config = catalog_client_config(config);
    debug!(catalog_url = %client_config.catalog_url, "using catalog client");
    let client = CatalogClient::new(client_config).context("Could not create catalog client")?;
    Ok(client.into())
}
