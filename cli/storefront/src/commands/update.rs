use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bpaf::Bpaf;
use storefront_catalog::{CategoryId, Client, ProductId};
use storefront_sdk::{EntityMode, EntitySession};
use tracing::instrument;

use crate::config::Config;
use crate::utils::message;

// Update an existing product
#[derive(Debug, Bpaf, Clone)]
pub struct Update {
    /// New title
    #[bpaf(long, argument("TITLE"))]
    pub title: Option<String>,

    /// New price, e.g. 12.5
    #[bpaf(long, argument("PRICE"))]
    pub price: Option<String>,

    /// New description
    #[bpaf(long, argument("TEXT"))]
    pub description: Option<String>,

    /// New category id
    #[bpaf(long, argument("ID"))]
    pub category: Option<CategoryId>,

    /// New comma separated image URLs, replacing the current ones
    #[bpaf(long, argument("URLS"))]
    pub images: Option<String>,

    /// Id of the product to update
    #[bpaf(positional("ID"))]
    pub id: ProductId,
}

impl Update {
    #[instrument(name = "update", fields(id = %self.id), skip_all)]
    pub async fn handle(self, config: &Config, client: Client) -> Result<()> {
        let mut session = EntitySession::open(
            Arc::new(client),
            EntityMode::Editing(self.id),
            config.navigate_delay(),
        )
        .await;

        // Fields not given on the command line keep their current value.
        let Some(mut form) = session.form(None) else {
            let reason = session
                .status()
                .message()
                .unwrap_or("Product could not be loaded");
            return Err(anyhow!(reason.to_string()));
        };
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category_id = category.to_string();
        }
        if let Some(images) = self.images {
            form.images = images;
        }

        session
            .submit(&form)
            .await
            .context("Failed to update product")?;
        if let Some(msg) = session.status().message() {
            message::updated(msg);
        }
        session.close();
        Ok(())
    }
}
