//! HTTP client for the storefront product catalog API.
//!
//! This crate provides:
//! - Typed records for the catalog's products and categories
//! - [`CatalogClient`], issuing list/get/save/delete requests with `reqwest`
//! - [`MockClient`], a canned-response client for tests of downstream crates
//! - Common error handling for catalog API operations
//!
//! ## Usage
//!
//! ```ignore
//! use storefront_catalog::{CatalogClient, CatalogClientConfig, ClientTrait, ListingQuery};
//!
//! let client = CatalogClient::new(CatalogClientConfig::new("https://api.escuelajs.co/api/v1"))?;
//! let products = client.list_products(ListingQuery::default()).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
mod types;

#[cfg(any(test, feature = "tests"))]
pub mod test_helpers;

pub use client::{CatalogClient, Client, ClientTrait};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL};
pub use error::{CatalogClientError, ErrorKind, MapResponseExt};
pub use mock::{MockClient, MockRequest, Response as MockResponse};
pub use types::*;
