//! Canned-response catalog client for testing.
//!
//! Responses are served in the order they were pushed,
//! and every call is recorded so tests can assert on the requests
//! that were (or were not) issued.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::client::ClientTrait;
use crate::error::CatalogClientError;
use crate::types::*;

// Arc allows you to push things into the client from outside the client if necessary
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// A queued mock response.
#[derive(Debug, Clone)]
pub enum Response {
    Products(Vec<Product>),
    Product(Product),
    Categories(Vec<Category>),
    Deleted,
    /// A non-2xx response with the given status.
    Error(u16),
}

/// A request received by the [MockClient].
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    ListProducts(ListingQuery),
    GetProduct(ProductId),
    SaveProduct {
        payload: MutationPayload,
        existing: Option<ProductId>,
    },
    DeleteProduct(ProductId),
    ListCategories,
}

/// A catalog client that can be seeded with mock responses
///
/// Clones share their responses and request log.
#[derive(Debug, Default, Clone)]
pub struct MockClient {
    pub mock_responses: MockField<VecDeque<Response>>,
    pub requests: MockField<Vec<MockRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new response into the list of mock responses
    pub fn push_response(&self, resp: Response) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(resp);
    }

    pub fn push_products(&self, products: Vec<Product>) {
        self.push_response(Response::Products(products));
    }

    pub fn push_product(&self, product: Product) {
        self.push_response(Response::Product(product));
    }

    pub fn push_categories(&self, categories: Vec<Category>) {
        self.push_response(Response::Categories(categories));
    }

    pub fn push_deleted(&self) {
        self.push_response(Response::Deleted);
    }

    /// Push an API error into the list of mock responses
    pub fn push_error_response(&self, status_code: u16) {
        self.push_response(Response::Error(status_code));
    }

    /// Snapshot of the requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    /// Number of responses not consumed yet.
    pub fn pending_responses(&self) -> usize {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .len()
    }

    fn next_response(&self, request: MockRequest) -> Response {
        debug!(?request, "mock catalog request");
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .push(request.clone());
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front()
            .unwrap_or_else(|| panic!("no mock response left for {request:?}"))
    }
}

impl ClientTrait for MockClient {
    async fn list_products(&self, query: ListingQuery) -> Result<Vec<Product>, CatalogClientError> {
        match self.next_response(MockRequest::ListProducts(query)) {
            Response::Products(products) => Ok(products),
            Response::Error(status) => Err(CatalogClientError::from_status(status)),
            other => panic!("expected products response, found {other:?}"),
        }
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogClientError> {
        match self.next_response(MockRequest::GetProduct(id)) {
            Response::Product(product) => Ok(product),
            Response::Error(status) => Err(CatalogClientError::from_status(status)),
            other => panic!("expected product response, found {other:?}"),
        }
    }

    async fn save_product(
        &self,
        payload: &MutationPayload,
        existing: Option<ProductId>,
    ) -> Result<Product, CatalogClientError> {
        let request = MockRequest::SaveProduct {
            payload: payload.clone(),
            existing,
        };
        match self.next_response(request) {
            Response::Product(product) => Ok(product),
            Response::Error(status) => Err(CatalogClientError::from_status(status)),
            other => panic!("expected product response, found {other:?}"),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogClientError> {
        match self.next_response(MockRequest::DeleteProduct(id)) {
            Response::Deleted => Ok(()),
            Response::Error(status) => Err(CatalogClientError::from_status(status)),
            other => panic!("expected delete response, found {other:?}"),
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogClientError> {
        match self.next_response(MockRequest::ListCategories) {
            Response::Categories(categories) => Ok(categories),
            Response::Error(status) => Err(CatalogClientError::from_status(status)),
            other => panic!("expected categories response, found {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::product;

    #[tokio::test]
    async fn responses_are_served_in_order() {
        let client = MockClient::new();
        client.push_product(product(1, 2));
        client.push_error_response(404);

        let first = client.get_product(ProductId::from(1)).await.unwrap();
        assert_eq!(first.id, ProductId::from(1));

        let second = client.get_product(ProductId::from(2)).await;
        assert!(matches!(second, Err(CatalogClientError::NotFound)));

        assert_eq!(client.requests(), vec![
            MockRequest::GetProduct(ProductId::from(1)),
            MockRequest::GetProduct(ProductId::from(2)),
        ]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let client = MockClient::new();
        let handle = client.clone();
        handle.push_deleted();

        client.delete_product(ProductId::from(7)).await.unwrap();
        assert_eq!(handle.requests(), vec![MockRequest::DeleteProduct(
            ProductId::from(7)
        )]);
        assert_eq!(handle.pending_responses(), 0);
    }
}
