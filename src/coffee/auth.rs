use tracing::{debug, instrument};

use crate::{
    coffee::http::{ApiRequest, BoundedInvoker, Transport},
    error::{FinderError, InvokeError},
    types::{Token, TokenResponse},
};

/// Obtains bearer tokens from the token endpoint.
///
/// Every call to [`TokenProvider::acquire_token`] performs exactly one bounded
/// request. Deciding whether a failure is worth another attempt is left to
/// the caller.
pub struct TokenProvider<'a, T> {
    invoker: &'a BoundedInvoker<T>,
    token_url: &'a str,
}

impl<'a, T: Transport> TokenProvider<'a, T> {
    pub fn new(invoker: &'a BoundedInvoker<T>, token_url: &'a str) -> Self {
        TokenProvider { invoker, token_url }
    }

    /// Requests a fresh token.
    ///
    /// Sends an empty `POST` with JSON `Content-Type` and `Accept` headers and
    /// reads the `token` field of the response body.
    ///
    /// # Errors
    ///
    /// - [`FinderError::AuthService`] for any non-success status, timeout or
    ///   network failure.
    /// - [`FinderError::Format`] when a successful response has no string
    ///   `token` field.
    #[instrument(skip(self), fields(url = %self.token_url))]
    pub async fn acquire_token(&self) -> Result<Token, FinderError> {
        let response = self
            .invoker
            .invoke(ApiRequest::post_json(self.token_url))
            .await
            .map_err(|e: InvokeError| FinderError::AuthService {
                message: format!("token endpoint unreachable, {}", e),
            })?;

        if !response.status.is_success() {
            return Err(FinderError::AuthService {
                message: format!(
                    "Token request failed with status {}",
                    response.status.as_u16()
                ),
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| FinderError::format("token response", e))?;

        debug!("token acquired");
        Ok(parsed.token)
    }
}
