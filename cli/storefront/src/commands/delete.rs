use anyhow::{Context, Result};
use bpaf::Bpaf;
use storefront_catalog::{Client, ClientTrait, ProductId};
use tracing::instrument;

use crate::utils::message;

// Delete a product
#[derive(Debug, Bpaf, Clone)]
pub struct Delete {
    /// Id of the product to delete
    #[bpaf(positional("ID"))]
    pub id: ProductId,
}

impl Delete {
    #[instrument(name = "delete", fields(id = %self.id), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        client
            .delete_product(self.id)
            .await
            .context("Error deleting product")?;
        message::deleted(format!("Product with ID {} deleted successfully!", self.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storefront_catalog::{MockClient, MockRequest};

    use super::*;
    use crate::utils::message::history::History;

    #[tokio::test]
    async fn deletes_product() {
        let mock = MockClient::new();
        mock.push_deleted();

        Delete {
            id: ProductId::from(7),
        }
        .handle(mock.clone().into())
        .await
        .unwrap();

        assert_eq!(mock.requests(), vec![MockRequest::DeleteProduct(
            ProductId::from(7)
        )]);
        assert_eq!(&History::global().messages(), &[
            "🗑️  Product with ID 7 deleted successfully!"
        ]);
    }

    #[tokio::test]
    async fn failed_delete_prints_nothing() {
        let mock = MockClient::new();
        mock.push_error_response(500);

        let err = Delete {
            id: ProductId::from(7),
        }
        .handle(mock.into())
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Error deleting product");
        assert!(History::global().messages().is_empty());
    }
}
