//! Ties the catalog sessions of one storefront together.
//!
//! A [CatalogController] owns the client, the category directory, the
//! listing and the notifier, and opens entity sessions on demand.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use storefront_catalog::{
    CatalogClientError,
    CategoryFilter,
    ClientTrait,
    DEFAULT_PAGE_SIZE,
    Product,
    ProductId,
};
use tracing::{debug, instrument, warn};

use crate::categories::CategoryDirectory;
use crate::entity::{EntityMode, EntitySession, NAVIGATE_AWAY_DELAY};
use crate::listing::ListingSession;
use crate::status::{Notice, StatusNotifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub page_size: NonZeroU32,
    pub navigate_delay: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            navigate_delay: NAVIGATE_AWAY_DELAY,
        }
    }
}

/// Ties the sessions of one catalog view together.
///
/// The controller owns the category directory, the product listing and the
/// notice shown after mutations. Entity sessions are handed out on demand
/// and share the controller's client.
#[derive(Debug)]
pub struct CatalogController<C> {
    client: Arc<C>,
    categories: CategoryDirectory,
    listing: ListingSession<C>,
    notifier: StatusNotifier,
    options: ControllerOptions,
}

impl<C: ClientTrait> CatalogController<C> {
    pub fn new(client: C, options: ControllerOptions) -> Self {
        let client = Arc::new(client);
        Self {
            listing: ListingSession::new(client.clone(), options.page_size),
            client,
            categories: CategoryDirectory::new(),
            notifier: StatusNotifier::new(),
            options,
        }
    }

    /// Load the categories, then the first page of products.
    ///
    /// The listing is fetched even if the categories failed to load.
    /// The first error is returned.
    #[instrument(skip_all)]
    pub async fn start(&mut self) -> Result<(), CatalogClientError> {
        let categories = self.categories.load(&*self.client).await.map(|_| ());
        if let Err(err) = &categories {
            warn!(%err, "continuing without categories");
        }
        let listing = self.listing.refresh().await;
        categories.and(listing)
    }

    pub async fn set_category_filter(
        &mut self,
        category: CategoryFilter,
    ) -> Result<(), CatalogClientError> {
        self.listing.set_category_filter(category).await
    }

    /// Delete a product and reload the listing from the first page.
    ///
    /// A failed delete leaves the listing untouched.
    #[instrument(skip(self))]
    pub async fn delete_product(&mut self, id: ProductId) -> Result<(), CatalogClientError> {
        if let Err(err) = self.client.delete_product(id).await {
            self.notifier
                .set(Notice::Error(format!("Error deleting product: {err}")));
            return Err(err);
        }

        debug!("deleted product, refreshing listing");
        self.notifier.set(Notice::Success(format!(
            "Product with ID {id} deleted successfully!"
        )));
        self.listing.refresh_after_delete(id).await
    }

    /// A single product for the read-only detail view.
    pub async fn product_detail(&self, id: ProductId) -> Result<Product, CatalogClientError> {
        self.client.get_product(id).await
    }

    /// Open a create or update session sharing this controller's client.
    pub async fn entity_session(&self, mode: EntityMode) -> EntitySession<C> {
        EntitySession::open(self.client.clone(), mode, self.options.navigate_delay).await
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn categories(&self) -> &CategoryDirectory {
        &self.categories
    }

    pub fn listing(&self) -> &ListingSession<C> {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut ListingSession<C> {
        &mut self.listing
    }

    pub fn notifier(&self) -> &StatusNotifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut StatusNotifier {
        &mut self.notifier
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }
}
