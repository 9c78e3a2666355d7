use std::fmt::Write;
use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_catalog::{
    CategoryFilter,
    Client,
    ClientTrait,
    ListingQuery,
    ListingResult,
};
use tracing::instrument;

use super::product_row;
use crate::config::Config;

// List one page of products
#[derive(Debug, Bpaf, Clone)]
pub struct List {
    /// Only list products of this category id ('all' for every category)
    #[bpaf(long, argument("ID"), fallback(CategoryFilter::All))]
    pub category: CategoryFilter,

    /// Page to list, starting at 1
    #[bpaf(long, argument("N"), fallback(NonZeroU32::MIN))]
    pub page: NonZeroU32,

    /// Display the products as a JSON array
    #[bpaf(long)]
    pub json: bool,
}

impl List {
    #[instrument(name = "list", fields(category = %self.category, page = self.page.get()), skip_all)]
    pub async fn handle(self, config: &Config, client: Client) -> Result<()> {
        let mut query = ListingQuery::new(config.page_size);
        query.set_category(self.category);
        query.set_page(self.page);

        let items = client
            .list_products(query)
            .await
            .context("Failed to load products")?;
        let result = ListingResult::from_page(items, query.page_size());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result.items)?);
        } else {
            print!("{}", render_listing(&query, &result));
        }
        Ok(())
    }
}

fn render_listing(query: &ListingQuery, result: &ListingResult) -> String {
    let mut out = String::new();
    if result.items.is_empty() {
        out.push_str("No products found.\n");
    }
    for product in &result.items {
        let _ = writeln!(out, "{}", product_row(product));
    }
    if result.has_more {
        let _ = writeln!(
            out,
            "\nPage {page}. Use '--page {next}' to see more.",
            page = query.page(),
            next = query.page().saturating_add(1),
        );
    }
    out
}
