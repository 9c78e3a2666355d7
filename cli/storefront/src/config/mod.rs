use std::collections::BTreeMap;
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use serde::{Deserialize, Serialize};
use storefront_catalog::{DEFAULT_CATALOG_URL, DEFAULT_PAGE_SIZE};
use storefront_sdk::{ControllerOptions, NAVIGATE_AWAY_DELAY};
use tracing::debug;
use xdg::BaseDirectories;

/// Name of storefront managed directories
const STOREFRONT_DIR_NAME: &str = "storefront";
const STOREFRONT_CONFIG_DIR_VAR: &str = "STOREFRONT_CONFIG_DIR";
const STOREFRONT_ENV_PREFIX: &str = "STOREFRONT";
pub const STOREFRONT_CONFIG_FILE: &str = "storefront.toml";

/// Configuration of the storefront CLI
///
/// Read from (later sources override earlier ones):
/// 1. built-in defaults
/// 2. `/etc/storefront.toml`
/// 3. `storefront/storefront.toml` in the XDG config directories
/// 4. `$STOREFRONT_CONFIG_DIR/storefront.toml`
/// 5. `STOREFRONT_*` environment variables, e.g. `STOREFRONT_PAGE_SIZE=24`
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Base URL of the catalog API
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    pub catalog_url: String,

    /// Number of products per listing page
    pub page_size: NonZeroU32,

    /// Delay between a successful save and leaving the form, in milliseconds
    pub navigate_delay_ms: u64,

    /// Overrides the user agent sent to the catalog
    pub user_agent: Option<String>,

    /// Additional headers sent with every catalog request
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,

    /// Request timeout in seconds, unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            navigate_delay_ms: NAVIGATE_AWAY_DELAY.as_millis() as u64,
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout_secs: None,
        }
    }
}

impl Config {
    fn read_raw_config() -> Result<HierarchicalConfig> {
        let storefront_dirs = BaseDirectories::with_prefix(STOREFRONT_DIR_NAME);
        let defaults = Config::default();

        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", defaults.catalog_url)?
            .set_default("page_size", i64::from(defaults.page_size.get()))?
            .set_default("navigate_delay_ms", defaults.navigate_delay_ms as i64)?;

        // read from /etc
        builder = builder.add_source(
            config::File::from(PathBuf::from("/etc").join(STOREFRONT_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // look for files in XDG_CONFIG_DIRS locations
        for file in storefront_dirs.find_config_files(STOREFRONT_CONFIG_FILE) {
            debug!(?file, "found config file");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }

        // Add explicit STOREFRONT_CONFIG_DIR file last
        if let Ok(config_dir) = env::var(STOREFRONT_CONFIG_DIR_VAR) {
            debug!("`${STOREFRONT_CONFIG_DIR_VAR}` set: {config_dir}");
            builder = builder.add_source(
                config::File::from(PathBuf::from(config_dir).join(STOREFRONT_CONFIG_FILE))
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        // override via env variables
        let builder = builder.add_source(
            Environment::with_prefix(STOREFRONT_ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        Ok(builder.build()?)
    }

    /// Creates a [Config] from the environment and config files
    pub fn parse() -> Result<Config> {
        let final_config = Self::read_raw_config()?;
        let cli_config: Config = final_config
            .try_deserialize()
            .context("Could not parse config")?;
        debug!(?cli_config, "parsed config");
        Ok(cli_config)
    }

    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_delay_ms)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            page_size: self.page_size,
            navigate_delay: self.navigate_delay(),
        }
    }
}
