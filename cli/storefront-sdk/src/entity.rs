//! Lifecycle of a single product behind a create or update form.

use std::sync::Arc;
use std::time::Duration;

use storefront_catalog::{CatalogClientError, CategoryId, ClientTrait, Product, ProductId};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::deferred::DeferredAction;
use crate::form::{ProductForm, ValidationError};
use crate::status::SessionStatus;

/// Time between a successful save and the signal to leave the form.
pub const NAVIGATE_AWAY_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMode {
    New,
    Editing(ProductId),
}

impl EntityMode {
    fn verb(&self) -> &'static str {
        match self {
            EntityMode::New => "create",
            EntityMode::Editing(_) => "update",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            EntityMode::New => "created",
            EntityMode::Editing(_) => "updated",
        }
    }
}

#[derive(Debug, Error)]
pub enum EntityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogClientError),
    #[error("product {0} could not be loaded")]
    Unavailable(ProductId),
}

/// A product being created or edited.
///
/// Opening a session for an existing product fetches it once.
/// If that fails the session stays in an error state and offers no form.
#[derive(Debug)]
pub struct EntitySession<C> {
    client: Arc<C>,
    mode: EntityMode,
    product: Option<Product>,
    status: SessionStatus,
    navigate_delay: Duration,
    navigation: Option<DeferredAction>,
}

impl<C: ClientTrait> EntitySession<C> {
    #[instrument(skip(client))]
    pub async fn open(client: Arc<C>, mode: EntityMode, navigate_delay: Duration) -> Self {
        let mut session = Self {
            client,
            mode,
            product: None,
            status: SessionStatus::Idle,
            navigate_delay,
            navigation: None,
        };

        if let EntityMode::Editing(id) = mode {
            session.status = SessionStatus::Loading;
            match session.client.get_product(id).await {
                Ok(product) => {
                    debug!(%id, "loaded product for editing");
                    session.product = Some(product);
                    session.status = SessionStatus::Idle;
                },
                Err(err) => {
                    warn!(%id, %err, "could not load product");
                    session.status =
                        SessionStatus::Error(format!("Product not found with ID {id}. {err}"));
                },
            }
        }

        session
    }

    pub fn mode(&self) -> EntityMode {
        self.mode
    }

    /// The product as loaded or last saved.
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Whether a form can be shown.
    pub fn is_available(&self) -> bool {
        match self.mode {
            EntityMode::New => true,
            EntityMode::Editing(_) => self.product.is_some(),
        }
    }

    /// The initial form, `None` if the product to edit could not be loaded.
    ///
    /// New products preselect `default_category`.
    pub fn form(&self, default_category: Option<CategoryId>) -> Option<ProductForm> {
        match (self.mode, &self.product) {
            (EntityMode::New, _) => Some(ProductForm::new(default_category)),
            (EntityMode::Editing(_), Some(product)) => Some(ProductForm::from_product(product)),
            (EntityMode::Editing(_), None) => None,
        }
    }

    /// Validate `form` and save it.
    ///
    /// Invalid forms never reach the catalog.
    /// After a successful save the navigate-away signal is scheduled,
    /// see [EntitySession::navigation].
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn submit(&mut self, form: &ProductForm) -> Result<Product, EntityError> {
        if let (EntityMode::Editing(id), None) = (self.mode, &self.product) {
            return Err(EntityError::Unavailable(id));
        }

        let payload = match form.parse() {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%err, "form rejected");
                self.status = SessionStatus::Error(format!("Error: {err}"));
                return Err(err.into());
            },
        };

        let existing = match self.mode {
            EntityMode::New => None,
            EntityMode::Editing(id) => Some(id),
        };

        self.status = SessionStatus::Loading;
        match self.client.save_product(&payload, existing).await {
            Ok(product) => {
                self.status = SessionStatus::Success(format!(
                    "Product with ID {} {} successfully!",
                    product.id,
                    self.mode.past_tense()
                ));
                self.product = Some(product.clone());
                self.navigation = Some(DeferredAction::schedule(self.navigate_delay));
                Ok(product)
            },
            Err(err) => {
                self.status = SessionStatus::Error(format!(
                    "Error: Failed to {} product. {err}",
                    self.mode.verb()
                ));
                Err(err.into())
            },
        }
    }

    /// The pending navigate-away signal, if a save succeeded.
    pub fn navigation(&mut self) -> Option<&mut DeferredAction> {
        self.navigation.as_mut()
    }

    /// Leave the session, cancelling a pending navigation.
    ///
    /// The cancelled action stays reachable through [EntitySession::navigation]
    /// and never fires.
    pub fn close(&mut self) {
        if let Some(navigation) = &self.navigation {
            navigation.cancel();
        }
    }
}
