use std::sync::Arc;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_catalog::{CategoryId, Client};
use storefront_sdk::{CategoryDirectory, EntityMode, EntitySession};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::utils::message;

// Create a product
#[derive(Debug, Bpaf, Clone)]
pub struct Create {
    /// Title of the product
    #[bpaf(long, argument("TITLE"))]
    pub title: String,

    /// Price of the product, e.g. 12.5
    #[bpaf(long, argument("PRICE"))]
    pub price: String,

    /// Description of the product
    #[bpaf(long, argument("TEXT"))]
    pub description: String,

    /// Category id of the product (default: the first category of the catalog)
    #[bpaf(long, argument("ID"))]
    pub category: Option<CategoryId>,

    /// Comma separated image URLs
    #[bpaf(long, argument("URLS"))]
    pub images: String,
}

impl Create {
    #[instrument(name = "create", skip_all)]
    pub async fn handle(self, config: &Config, client: Client) -> Result<()> {
        let client = Arc::new(client);

        let default_category = match self.category {
            Some(category) => Some(category),
            None => {
                let directory = CategoryDirectory::new();
                directory
                    .load(&*client)
                    .await
                    .context("Failed to fetch categories")?;
                debug!(default = ?directory.default_category(), "using default category");
                directory.default_category()
            },
        };

        let mut session =
            EntitySession::open(client, EntityMode::New, config.navigate_delay()).await;
        let mut form = session
            .form(default_category)
            .context("Product form is not available")?;
        form.title = self.title;
        form.price = self.price;
        form.description = self.description;
        form.images = self.images;

        session
            .submit(&form)
            .await
            .context("Failed to create product")?;
        if let Some(msg) = session.status().message() {
            message::created(msg);
        }
        session.close();
        Ok(())
    }
}
