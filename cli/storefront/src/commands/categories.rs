use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_catalog::{Category, Client, ClientTrait};
use tracing::instrument;

// List the product categories
#[derive(Debug, Bpaf, Clone)]
pub struct Categories {
    /// Display the categories as a JSON array
    #[bpaf(long)]
    pub json: bool,
}

impl Categories {
    #[instrument(name = "categories", fields(json = self.json), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        let categories = client
            .list_categories()
            .await
            .context("Failed to fetch categories")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&categories)?);
        } else {
            print!("{}", render_categories(&categories));
        }
        Ok(())
    }
}

fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }
    categories
        .iter()
        .map(|category| format!("{:>5}  {}\n", category.id.get(), category.name))
        .collect()
}
