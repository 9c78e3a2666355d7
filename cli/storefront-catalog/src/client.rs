//! Catalog client issuing the REST operations of the catalog API.

use std::fmt::Debug;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, MapResponseExt};
use crate::mock::MockClient;
use crate::types::*;

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The complete catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog API via [`CatalogClient`]
/// - **Mock**: canned responses without HTTP via [`MockClient`]
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Fetch one page of products.
    async fn list_products(&self, query: ListingQuery) -> Result<Vec<Product>, CatalogClientError>;

    /// Fetch a single product.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogClientError>;

    /// Create a product (`existing == None`) or replace an existing one.
    async fn save_product(
        &self,
        payload: &MutationPayload,
        existing: Option<ProductId>,
    ) -> Result<Product, CatalogClientError>;

    /// Delete a product.
    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogClientError>;

    /// Fetch the category taxonomy.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogClientError>;
}

/// A client for the catalog service.
///
/// This is a thin wrapper around a [reqwest::Client] that handles:
/// - HTTP client configuration (headers, user agent, optional timeout)
/// - URL construction for the catalog endpoints
/// - Translating failures into [CatalogClientError]s
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        url::Url::parse(&config.catalog_url).map_err(|e| {
            CatalogClientError::Other(format!(
                "invalid catalog url '{}': {e}",
                config.catalog_url
            ))
        })?;
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    fn endpoint(&self, path: impl AsRef<str>) -> String {
        format!(
            "{}/{}",
            self.config.catalog_url.trim_end_matches('/'),
            path.as_ref()
        )
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip(self), fields(category = %query.category(), page = query.page().get()))]
    async fn list_products(&self, query: ListingQuery) -> Result<Vec<Product>, CatalogClientError> {
        debug!(
            offset = query.offset(),
            limit = query.limit(),
            "sending product listing request"
        );
        let response = self
            .http
            .get(self.endpoint("products"))
            .query(&query.to_query_pairs())
            .send()
            .await
            .check_response()
            .await?;

        let products: Vec<Product> = read_json(response).await?;
        debug!(n_products = products.len(), "received products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogClientError> {
        let response = self
            .http
            .get(self.endpoint(format!("products/{id}")))
            .send()
            .await
            .check_response()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self, payload))]
    async fn save_product(
        &self,
        payload: &MutationPayload,
        existing: Option<ProductId>,
    ) -> Result<Product, CatalogClientError> {
        let request = match existing {
            Some(id) => self.http.put(self.endpoint(format!("products/{id}"))),
            None => self.http.post(self.endpoint("products")),
        };
        let response = request
            .json(payload)
            .send()
            .await
            .check_response()
            .await?;

        let product: Product = read_json(response).await?;
        debug!(id = %product.id, "saved product");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogClientError> {
        self.http
            .delete(self.endpoint(format!("products/{id}")))
            .send()
            .await
            .check_response()
            .await?;

        debug!("successfully deleted product");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogClientError> {
        let response = self
            .http
            .get(self.endpoint("categories"))
            .send()
            .await
            .check_response()
            .await?;

        let categories: Vec<Category> = read_json(response).await?;
        debug!(n_categories = categories.len(), "received categories");
        Ok(categories)
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Read a JSON body.
///
/// Bodies that arrive but don't match `T` are invalid responses,
/// bodies that can't be read to the end are network errors.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogClientError> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            CatalogClientError::InvalidResponse(e)
        } else {
            CatalogClientError::Network(e)
        }
    })
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client used for all catalog requests.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        timeout = ?config.timeout,
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder().default_headers(headers);

    let client_builder = match config.timeout {
        Some(timeout) => client_builder.timeout(timeout),
        None => client_builder,
    };

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;
    use std::num::NonZeroU32;

    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    fn client_config(url: &str) -> CatalogClientConfig {
        CatalogClientConfig::new(url)
    }

    fn product_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "price": 10,
            "description": "a product",
            "images": ["https://i.imgur.com/1.jpeg"],
            "category": { "id": 2, "name": "Electronics" }
        })
    }

    #[tokio::test]
    async fn list_products_sends_filter_and_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/products")
                    .query_param("categoryId", "2")
                    .query_param("offset", "12")
                    .query_param("limit", "12");
                then.status(200).json_body(json!([product_json(13)]));
            })
            .await;

        let mut query = ListingQuery::default();
        query.set_category(CategoryFilter::Category(CategoryId::from(2)));
        query.set_page(NonZeroU32::new(2).unwrap());

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let products = client.list_products(query).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::from(13));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_products_without_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/products")
                    .query_param("offset", "0")
                    .query_param("limit", "12");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let products = client.list_products(ListingQuery::default()).await.unwrap();
        assert!(products.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/products").json_body(json!({
                    "title": "Pen",
                    "price": 1.5,
                    "description": "d",
                    "categoryId": 3,
                    "images": ["a.jpg", "b.jpg"],
                }));
                then.status(201).json_body(product_json(42));
            })
            .await;

        let payload = MutationPayload {
            title: "Pen".to_string(),
            price: 1.5,
            description: "d".to_string(),
            category_id: CategoryId::from(3),
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        };

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let product = client.save_product(&payload, None).await.unwrap();
        assert_eq!(product.id, ProductId::from(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_puts_to_product() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/products/42");
                then.status(200).json_body(product_json(42));
            })
            .await;

        let payload = MutationPayload {
            title: "Pen".to_string(),
            price: 1.5,
            description: "d".to_string(),
            category_id: CategoryId::from(3),
            images: vec!["a.jpg".to_string()],
        };

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        client
            .save_product(&payload, Some(ProductId::from(42)))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/products/7");
                then.status(200).body("true");
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        client.delete_product(ProductId::from(7)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn categories_are_typed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/categories");
                then.status(200).json_body(json!([
                    { "id": 1, "name": "Clothes", "slug": "clothes", "image": "https://i.imgur.com/c.jpeg" },
                    { "id": 2, "name": "Electronics" },
                ]));
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let categories = client.list_categories().await.unwrap();
        assert_eq!(
            categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Clothes", "Electronics"]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn extra_headers_set_on_all_requests() {
        let mut extra_headers: BTreeMap<String, String> = BTreeMap::new();
        extra_headers.insert("storefront-test".to_string(), "test-value".to_string());

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.header("storefront-test", "test-value");
                then.status(200).json_body(json!([]));
            })
            .await;

        let config = CatalogClientConfig {
            extra_headers,
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.list_categories().await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn user_agent_set_on_all_requests() {
        let expected_agent = "my-custom-user-agent";

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.header("user-agent", expected_agent);
                then.status(200).json_body(json!([]));
            })
            .await;

        let config = CatalogClientConfig {
            user_agent: Some(expected_agent.to_owned()),
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.list_categories().await;
        mock.assert_async().await;
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = CatalogClient::new(client_config("not a url"));
        assert!(matches!(result, Err(CatalogClientError::Other(_))));
    }

    // region: Error response handling
    //
    // 404 responses map to `NotFound`, other non-2xx responses to `Http`
    // with the server's `message` as detail when it can be parsed.
    // 2xx responses that don't match the typed records are `InvalidResponse`.

    #[tokio::test]
    async fn get_product_not_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/999");
                then.status(404).json_body(json!({
                    "message": "Could not find any entity of type \"Product\"",
                    "statusCode": 404
                }));
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.get_product(ProductId::from(999)).await;
        assert!(
            matches!(result, Err(CatalogClientError::NotFound)),
            "expected CatalogClientError::NotFound, found: {result:?}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_response_detail() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_, then| {
                then.status(400).json_body(json!({
                    "message": ["price must be a positive number"],
                    "error": "Bad Request",
                    "statusCode": 400
                }));
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "status: 400: price must be a positive number");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_response_without_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_, then| {
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert!(
            matches!(err, CatalogClientError::Http { detail: None, .. }),
            "expected Http error without detail, found: {err:?}"
        );
        assert_eq!(err.status(), Some(502));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unexpected_shape_is_invalid_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|_, then| {
                then.status(200).json_body(json!({ "unknown": "ceramic" }));
            })
            .await;

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.get_product(ProductId::from(1)).await;
        assert!(
            matches!(result, Err(CatalogClientError::InvalidResponse(_))),
            "expected CatalogClientError::InvalidResponse, found: {result:?}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn truncated_body_is_network_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Announces a longer body than it sends, then hangs up.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0_u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n[{\"id\": 1",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = CatalogClient::new(client_config(&format!("http://{addr}"))).unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert!(
            matches!(err, CatalogClientError::Network(_)),
            "expected CatalogClientError::Network, found: {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Nothing listens on port 1.
        let client = CatalogClient::new(client_config("http://127.0.0.1:1")).unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.status(), None);
    }

    // endregion
}
