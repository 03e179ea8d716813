//! HTTP client adapter for the marks REST API
//!
//! Every request goes to a fixed base URL with `Content-Type:
//! application/json`. Just before sending, the session is consulted and a
//! `Authorization: Bearer <token>` header is attached when a token exists.
//!
//! Responses are classified into `ApiResult`:
//! - 2xx with a decodable body: `Ok`
//! - 2xx with anything else: `ApiError::Malformed`
//! - non-2xx: `ApiError::Server`, carrying the body's `error` text if present
//! - no response: `ApiError::Transport`
//!
//! There is no caching, retry, or timeout.

pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::models::ApiErrorBody;
use crate::session::Session;

pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};

/// Client for the bookmark REST API
///
/// Cheap to clone; clones share the transport and the session.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: Session,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Create a client that talks HTTP through `reqwest`
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_transport(base_url, session, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        base_url: impl Into<String>,
        session: Session,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `GET path` with optional query parameters, decoding the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let mut request = self.request(Method::Get, path, None);
        request.query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let response = self.send(request).await?;
        decode(&response)
    }

    /// `POST path` with a JSON body, decoding the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::Post, path, Some(encode(body)?));
        let response = self.send(request).await?;
        decode(&response)
    }

    /// `PUT path` with a JSON body, decoding the JSON response
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::Put, path, Some(encode(body)?));
        let response = self.send(request).await?;
        decode(&response)
    }

    /// `DELETE path`; the response body is ignored
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.request(Method::Delete, path, None);
        self.send(request).await.map(|_| ())
    }

    /// Build a request with the default headers and the current credential
    fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            query: Vec::new(),
            headers,
            body,
        }
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!("{} {}", method, url);

        let response = self.transport.execute(request).await?;
        debug!("{} {} -> {}", method, url, response.status);

        if response.is_success() {
            Ok(response)
        } else {
            Err(server_error(&response))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::Malformed(format!("Failed to encode request body: {}", e)))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApiResult<T> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Classify a non-success response, reading the `error` field if present
fn server_error(response: &ApiResponse) -> ApiError {
    let message = serde_json::from_str::<ApiErrorBody>(&response.body)
        .ok()
        .map(|body| body.error);

    ApiError::Server {
        status: response.status,
        message,
    }
}
