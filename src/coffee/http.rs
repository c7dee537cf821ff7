use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Method, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::{debug, warn};

use crate::error::{FinderError, InvokeError};

const APPLICATION_JSON: &str = "application/json";

/// One outgoing call to the coffee shop API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// `POST` with an empty body, announcing and accepting JSON.
    pub fn post_json(url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        ApiRequest {
            method: Method::POST,
            url: url.into(),
            headers,
        }
    }

    /// `GET` accepting JSON.
    pub fn get_json(url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        ApiRequest {
            method: Method::GET,
            url: url.into(),
            headers,
        }
    }
}

/// Status and raw body of a completed call. Nothing is interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Wraps a status and the body text read for it.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }
}

/// Delivers a request and reads the full response body.
///
/// Implementations perform exactly one network call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InvokeError>;
}

#[async_trait]
impl<'a, T: Transport + ?Sized> Transport for &'a T {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InvokeError> {
        (**self).send(request).await
    }
}

/// [`Transport`] backed by a `reqwest` client.
///
/// The client carries no timeout of its own; the bound is enforced by
/// [`BoundedInvoker`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a `brewscout/<version>` user agent.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Client`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FinderError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InvokeError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .send()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

/// Issues one request at a time with a wall-clock bound.
///
/// The bound covers sending the request and reading the body. When it
/// expires the in-flight request is dropped, which cancels it.
#[derive(Debug, Clone)]
pub struct BoundedInvoker<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> BoundedInvoker<T> {
    /// Wraps `transport` so that every call is bounded by `timeout`.
    pub fn new(transport: T, timeout: Duration) -> Self {
        BoundedInvoker { transport, timeout }
    }

    /// Sends one request and waits at most the configured bound for it.
    ///
    /// Any status code, including errors, is returned as a response.
    ///
    /// # Errors
    ///
    /// - [`InvokeError::Timeout`] when the bound expires first.
    /// - [`InvokeError::Network`] when the transport fails.
    pub async fn invoke(&self, request: ApiRequest) -> Result<ApiResponse, InvokeError> {
        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, url = %redact_token(&url), "sending request");

        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => {
                debug!(%method, status = %response.status, "received response");
                Ok(response)
            }
            Ok(Err(e)) => {
                warn!(%method, url = %redact_token(&url), error = %e, "request failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    %method,
                    url = %redact_token(&url),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "request timed out"
                );
                Err(InvokeError::Timeout(self.timeout))
            }
        }
    }
}

/// Hides the value of a `token` query parameter so it never reaches the logs.
///
/// Strings that do not parse as a URL are returned unchanged.
pub fn redact_token(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    if !parsed.query_pairs().any(|(key, _)| key == "token") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "token" { "***".into() } else { value };
            (key.into_owned(), value.into_owned())
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}
