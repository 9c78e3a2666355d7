//! Catalog interaction types.
//!
//! These are the typed records exchanged with the catalog API.
//! Responses are deserialized straight into them,
//! so a body that does not match fails at the boundary.

use std::fmt::Display;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of products shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(12).unwrap();

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Server assigned product id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Server assigned category id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct CategoryId(u64);

impl CategoryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Body of a create (`POST`) or update (`PUT`) request.
///
/// Only ever built from a validated form, see `storefront_sdk::form`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
}

// ---------------------------------------------------------------------------
// Filtering and pagination
// ---------------------------------------------------------------------------

/// Category filter of a product listing.
///
/// [CategoryFilter::All] is synthesized locally
/// and never sent to the server as a filter value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CategoryId),
}

impl CategoryFilter {
    pub fn category_id(self) -> Option<CategoryId> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Category(id) => Some(id),
        }
    }
}

impl From<Option<CategoryId>> for CategoryFilter {
    fn from(id: Option<CategoryId>) -> Self {
        id.map_or(CategoryFilter::All, CategoryFilter::Category)
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Category(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid category filter '{0}', expected a category id or 'all'")]
pub struct ParseCategoryFilterError(String);

impl FromStr for CategoryFilter {
    type Err = ParseCategoryFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<CategoryId>()
            .map(CategoryFilter::Category)
            .map_err(|_| ParseCategoryFilterError(s.to_string()))
    }
}

/// The request behind one page of a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingQuery {
    category: CategoryFilter,
    page: NonZeroU32,
    page_size: NonZeroU32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListingQuery {
    /// First page of all categories.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            category: CategoryFilter::All,
            page: NonZeroU32::MIN,
            page_size,
        }
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn page(&self) -> NonZeroU32 {
        self.page
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Change the category filter, always going back to the first page.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = NonZeroU32::MIN;
    }

    pub fn set_page(&mut self, page: NonZeroU32) {
        self.page = page;
    }

    /// Number of items before the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.page_size.get())
    }

    pub fn limit(&self) -> u32 {
        self.page_size.get()
    }

    /// Query string of the `GET /products` request for this page.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(category_id) = self.category.category_id() {
            pairs.push(("categoryId", category_id.to_string()));
        }
        pairs.push(("offset", self.offset().to_string()));
        pairs.push(("limit", self.limit().to_string()));
        pairs
    }
}

/// One page of products.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingResult {
    pub items: Vec<Product>,
    /// Whether another page is likely to exist.
    ///
    /// The API does not report a total count,
    /// so a page is assumed to be followed by another one iff it is full.
    /// An exactly full last page is followed by one empty page.
    pub has_more: bool,
}

impl ListingResult {
    pub fn from_page(items: Vec<Product>, page_size: NonZeroU32) -> Self {
        let has_more = items.len() == page_size.get() as usize;
        Self { items, has_more }
    }
}
