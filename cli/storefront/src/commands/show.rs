use anyhow::{Result, bail};
use bpaf::Bpaf;
use storefront_catalog::{CatalogClientError, Client, ClientTrait, ProductId};
use tracing::instrument;

use super::product_detail;

// Show details about a single product
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the product as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Id of the product to show
    #[bpaf(positional("ID"))]
    pub id: ProductId,
}

impl Show {
    #[instrument(name = "show", fields(id = %self.id), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        let product = match client.get_product(self.id).await {
            Ok(product) => product,
            Err(CatalogClientError::NotFound) => bail!("Product not found."),
            Err(e) => Err(e)?,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&product)?);
        } else {
            print!("{}", product_detail(&product));
        }
        Ok(())
    }
}
