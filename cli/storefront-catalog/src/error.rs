//! Error handling for catalog API operations.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Common error type for catalog API operations.
///
/// Every failure is terminal for the request that produced it;
/// the client never retries.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("not found")]
    NotFound,
    #[error("{}", fmt_http_error(*.status, .detail.as_deref()))]
    Http {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("could not reach the catalog")]
    Network(#[source] reqwest::Error),
    #[error("unexpected response from the catalog")]
    InvalidResponse(#[source] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of [CatalogClientError]s for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ServerError,
    NetworkError,
}

impl CatalogClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogClientError::NotFound => ErrorKind::NotFound,
            CatalogClientError::Network(_) => ErrorKind::NetworkError,
            CatalogClientError::Http { .. }
            | CatalogClientError::InvalidResponse(_)
            | CatalogClientError::Other(_) => ErrorKind::ServerError,
        }
    }

    /// The HTTP status that caused this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogClientError::NotFound => Some(StatusCode::NOT_FOUND.as_u16()),
            CatalogClientError::Http { status, .. } => Some(status.as_u16()),
            CatalogClientError::Network(e) | CatalogClientError::InvalidResponse(e) => {
                e.status().map(|status| status.as_u16())
            },
            CatalogClientError::Other(_) => None,
        }
    }

    /// Build the error for a non-2xx status without a parsed body.
    pub fn from_status(status: u16) -> Self {
        match StatusCode::from_u16(status) {
            Ok(StatusCode::NOT_FOUND) => CatalogClientError::NotFound,
            Ok(status) => CatalogClientError::Http {
                status,
                detail: None,
            },
            Err(_) => CatalogClientError::Other(format!("invalid status code {status}")),
        }
    }
}

/// Error body returned by the catalog API.
///
/// `message` is either a single string or a list of validation messages.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<ApiErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl From<ApiErrorMessage> for String {
    fn from(message: ApiErrorMessage) -> Self {
        match message {
            ApiErrorMessage::One(msg) => msg,
            ApiErrorMessage::Many(msgs) => msgs.join(", "),
        }
    }
}

/// Extension trait for turning raw `reqwest` results into checked responses.
pub trait MapResponseExt {
    /// Consumes a `Result<Response, reqwest::Error>`, maps transport errors
    /// and non-2xx responses into `CatalogClientError`,
    /// and returns the successful response.
    fn check_response(
        self,
    ) -> impl std::future::Future<Output = Result<reqwest::Response, CatalogClientError>> + Send;
}

impl MapResponseExt for Result<reqwest::Response, reqwest::Error> {
    async fn check_response(self) -> Result<reqwest::Response, CatalogClientError> {
        let response = self.map_err(CatalogClientError::Network)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogClientError::NotFound);
        }
        parse_api_error(response).await
    }
}

async fn parse_api_error<T>(response: reqwest::Response) -> Result<T, CatalogClientError> {
    let status = response.status();
    // The body may be HTML garbage from a proxy, in which case it is dropped.
    let detail = response
        .json::<ApiErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.message)
        .map(String::from);
    Err(CatalogClientError::Http { status, detail })
}

fn fmt_http_error(status: StatusCode, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("status: {}: {detail}", status.as_u16()),
        None => format!("status: {}", status.as_u16()),
    }
}
