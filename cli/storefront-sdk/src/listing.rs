//! Filtered, paginated product listing.
//!
//! A [ListingSession] owns the current [ListingQuery] and the last page it
//! received. Every intent (filter change, next/previous page, refresh)
//! mutates the query and yields a [FetchTicket] tagged with a new generation
//! number. A fetch result is only applied if its ticket is still current, so
//! when intents overlap the last request wins regardless of the order in
//! which responses arrive.
//!
//! The async methods run a whole fetch cycle. Presentation layers that keep
//! accepting intents while a request is pending can use the `request_*`
//! methods together with [ListingSession::complete_fetch] instead.

use std::num::NonZeroU32;
use std::sync::Arc;

use storefront_catalog::{
    CatalogClientError,
    CategoryFilter,
    ClientTrait,
    ListingQuery,
    ListingResult,
    Product,
    ProductId,
};
use tracing::{debug, instrument};

use crate::status::SessionStatus;

/// A started fetch of one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: ListingQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> ListingQuery {
        self.query
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started in the meantime; the result was dropped.
    Stale,
}

#[derive(Debug)]
pub struct ListingSession<C> {
    client: Arc<C>,
    query: ListingQuery,
    result: Option<ListingResult>,
    status: SessionStatus,
    generation: u64,
}

impl<C: ClientTrait> ListingSession<C> {
    /// A session on the first page of all categories. Nothing is fetched yet.
    pub fn new(client: Arc<C>, page_size: NonZeroU32) -> Self {
        Self {
            client,
            query: ListingQuery::new(page_size),
            result: None,
            status: SessionStatus::Idle,
            generation: 0,
        }
    }

    pub fn query(&self) -> ListingQuery {
        self.query
    }

    pub fn page(&self) -> NonZeroU32 {
        self.query.page()
    }

    pub fn category(&self) -> CategoryFilter {
        self.query.category()
    }

    /// The last page received, `None` before the first fetch and after errors.
    pub fn result(&self) -> Option<&ListingResult> {
        self.result.as_ref()
    }

    pub fn items(&self) -> &[Product] {
        self.result
            .as_ref()
            .map(|result| result.items.as_slice())
            .unwrap_or_default()
    }

    /// Whether the current page was full.
    ///
    /// Unknown, and so `false`, while a fetch is pending: the last page
    /// received may belong to another query.
    pub fn has_more(&self) -> bool {
        !self.status.is_loading() && self.result.as_ref().is_some_and(|result| result.has_more)
    }

    pub fn has_previous(&self) -> bool {
        self.query.page() > NonZeroU32::MIN
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Generation of the most recently started fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // region: intents

    /// Filter by `category`, going back to the first page.
    pub async fn set_category_filter(
        &mut self,
        category: CategoryFilter,
    ) -> Result<(), CatalogClientError> {
        let ticket = self.request_category(category);
        self.run(ticket).await
    }

    /// Fetch the next page. No-op unless the current page was full.
    pub async fn next_page(&mut self) -> Result<(), CatalogClientError> {
        match self.request_next_page() {
            Some(ticket) => self.run(ticket).await,
            None => Ok(()),
        }
    }

    /// Fetch the previous page. No-op on the first page.
    pub async fn previous_page(&mut self) -> Result<(), CatalogClientError> {
        match self.request_previous_page() {
            Some(ticket) => self.run(ticket).await,
            None => Ok(()),
        }
    }

    /// Reload from the first page after `id` was deleted.
    ///
    /// The deleted product is not removed locally;
    /// the listing is derived from the server again.
    #[instrument(skip(self))]
    pub async fn refresh_after_delete(&mut self, id: ProductId) -> Result<(), CatalogClientError> {
        let ticket = self.request_first_page();
        self.run(ticket).await
    }

    /// Fetch the current page again.
    pub async fn refresh(&mut self) -> Result<(), CatalogClientError> {
        let ticket = self.request_refresh();
        self.run(ticket).await
    }

    // endregion

    // region: fetch cycle

    pub fn request_category(&mut self, category: CategoryFilter) -> FetchTicket {
        debug!(%category, "changing category filter");
        self.query.set_category(category);
        self.begin_fetch()
    }

    pub fn request_next_page(&mut self) -> Option<FetchTicket> {
        if !self.has_more() {
            debug!(page = self.page().get(), loading = self.status.is_loading(), "no next page");
            return None;
        }
        self.query.set_page(self.query.page().saturating_add(1));
        Some(self.begin_fetch())
    }

    pub fn request_previous_page(&mut self) -> Option<FetchTicket> {
        let previous = NonZeroU32::new(self.query.page().get() - 1)?;
        self.query.set_page(previous);
        Some(self.begin_fetch())
    }

    pub fn request_first_page(&mut self) -> FetchTicket {
        self.query.set_page(NonZeroU32::MIN);
        self.begin_fetch()
    }

    pub fn request_refresh(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Start a fetch of the current query.
    ///
    /// Any fetch started earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = SessionStatus::Loading;
        FetchTicket {
            generation: self.generation,
            query: self.query,
        }
    }

    /// Apply the result of the fetch started with `ticket`.
    ///
    /// Results of stale tickets are dropped, including errors.
    /// On error the previous page is cleared and the error is returned.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Product>, CatalogClientError>,
    ) -> Result<FetchOutcome, CatalogClientError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale listing response"
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(items) => {
                let result = ListingResult::from_page(items, ticket.query.page_size());
                self.status = SessionStatus::Success(format!(
                    "Page {} ({} products)",
                    ticket.query.page(),
                    result.items.len()
                ));
                self.result = Some(result);
                Ok(FetchOutcome::Applied)
            },
            Err(err) => {
                self.status = SessionStatus::Error(format!("Failed to load products. {err}"));
                self.result = None;
                Err(err)
            },
        }
    }

    #[instrument(skip_all, fields(generation = ticket.generation, page = ticket.query.page().get()))]
    async fn run(&mut self, ticket: FetchTicket) -> Result<(), CatalogClientError> {
        let result = self.client.list_products(ticket.query).await;
        self.complete_fetch(ticket, result).map(|_| ())
    }

    // endregion
}
