use reqwest::{StatusCode, Url};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::{
    coffee::{
        auth::TokenProvider,
        http::{ApiRequest, BoundedInvoker, Transport},
    },
    config::RetryPolicy,
    error::{FinderError, InvokeError},
    types::{ShopRecord, Token},
};

/// A shop request that did not produce a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// The endpoint answered with a non-success status.
    Status(StatusCode),
    /// No response arrived within the bound.
    Timeout,
}

impl FetchFailure {
    fn into_error(self, retried: bool) -> FinderError {
        let status = match self {
            FetchFailure::Status(status) => status,
            FetchFailure::Timeout => StatusCode::GATEWAY_TIMEOUT,
        };

        FinderError::Api {
            status: status.as_u16(),
            message: describe_status(status),
            retried,
        }
    }
}

/// What to do after a failed shop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Wait, fetch a new token and try again.
    RefreshToken,
    /// Wait and try again with the same token.
    Retry,
    /// The failure is final.
    GiveUp,
}

/// Remaining retry budgets of one [`ShopFetcher::fetch_shops`] call.
///
/// Each failure class draws from its own budget. Nothing survives the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    pub token_refreshes: u32,
    pub unavailable_retries: u32,
    pub timeout_retries: u32,
    /// Set once any retry has been granted.
    pub retried: bool,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        RetryState {
            token_refreshes: policy.token_refreshes,
            unavailable_retries: policy.unavailable_retries,
            timeout_retries: policy.timeout_retries,
            retried: false,
        }
    }

    /// Decides how to react to `failure`, consuming budget when a retry is granted.
    pub fn next_step(&mut self, failure: FetchFailure) -> RetryStep {
        let (budget, step) = match failure {
            FetchFailure::Status(StatusCode::UNAUTHORIZED) => {
                (&mut self.token_refreshes, RetryStep::RefreshToken)
            }
            FetchFailure::Status(StatusCode::SERVICE_UNAVAILABLE) => {
                (&mut self.unavailable_retries, RetryStep::Retry)
            }
            FetchFailure::Status(StatusCode::GATEWAY_TIMEOUT) | FetchFailure::Timeout => {
                (&mut self.timeout_retries, RetryStep::Retry)
            }
            FetchFailure::Status(_) => return RetryStep::GiveUp,
        };

        if *budget == 0 {
            return RetryStep::GiveUp;
        }

        *budget -= 1;
        self.retried = true;
        step
    }
}

/// Fetches the shop list, recovering from a stale token, a temporary outage
/// and timeouts within the budgets of a [`RetryPolicy`].
pub struct ShopFetcher<'a, T> {
    invoker: &'a BoundedInvoker<T>,
    tokens: TokenProvider<'a, T>,
    policy: &'a RetryPolicy,
}

impl<'a, T: Transport> ShopFetcher<'a, T> {
    pub fn new(
        invoker: &'a BoundedInvoker<T>,
        tokens: TokenProvider<'a, T>,
        policy: &'a RetryPolicy,
    ) -> Self {
        ShopFetcher {
            invoker,
            tokens,
            policy,
        }
    }

    /// Retrieves all shops listed at `url`, authenticating with `token`.
    ///
    /// Requests are sent as `GET url?token=<token>` accepting JSON. Failed
    /// requests are handled as follows, each retry preceded by the fixed
    /// backoff of the policy:
    ///
    /// | Failure | Reaction |
    /// |---------|----------|
    /// | 401 | fetch a fresh token and retry (`token_refreshes`) |
    /// | 503 | retry (`unavailable_retries`) |
    /// | 504 or no response in time | retry (`timeout_retries`) |
    /// | anything else | fail immediately |
    ///
    /// # Errors
    ///
    /// - [`FinderError::Api`] for a final failure status or an exhausted budget.
    ///   A timeout that exhausts its budget is reported as status 504.
    /// - [`FinderError::Format`] when the body is not a list of shops.
    /// - [`FinderError::AuthService`] when fetching a fresh token fails.
    /// - [`FinderError::Unreachable`] on network failure.
    #[instrument(skip(self, token))]
    pub async fn fetch_shops(
        &self,
        url: &str,
        token: Token,
    ) -> Result<Vec<ShopRecord>, FinderError> {
        let mut token = token;
        let mut state = RetryState::new(self.policy);

        loop {
            let request = ApiRequest::get_json(shops_url(url, &token)?);

            let failure = match self.invoker.invoke(request).await {
                Ok(response) if response.status.is_success() => {
                    let shops = parse_shops(&response.body)?;
                    debug!(count = shops.len(), "shops fetched");
                    return Ok(shops);
                }
                Ok(response) => FetchFailure::Status(response.status),
                Err(InvokeError::Timeout(_)) => FetchFailure::Timeout,
                Err(InvokeError::Network(message)) => {
                    return Err(FinderError::Unreachable { message });
                }
            };

            match state.next_step(failure) {
                RetryStep::RefreshToken => {
                    self.backoff(failure).await;
                    token = self.tokens.acquire_token().await?;
                }
                RetryStep::Retry => self.backoff(failure).await,
                RetryStep::GiveUp => return Err(failure.into_error(state.retried)),
            }
        }
    }

    async fn backoff(&self, failure: FetchFailure) {
        warn!(
            ?failure,
            delay_ms = self.policy.backoff.as_millis() as u64,
            "shop request failed, retrying after backoff"
        );
        sleep(self.policy.backoff).await;
    }
}

/// Appends the token as a query parameter to the shop endpoint.
pub fn shops_url(url: &str, token: &Token) -> Result<String, FinderError> {
    let mut parsed = Url::parse(url)
        .map_err(|e| FinderError::Config(format!("invalid shops URL '{}': {}", url, e)))?;
    parsed.query_pairs_mut().append_pair("token", token.as_str());
    Ok(parsed.into())
}

/// Parses a shop list body. Anything but a JSON array of shops is rejected.
pub fn parse_shops(body: &str) -> Result<Vec<ShopRecord>, FinderError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FinderError::format("shop list", e))?;

    if !value.is_array() {
        return Err(FinderError::format("shop list", "expected a JSON array"));
    }

    serde_json::from_value(value).map_err(|e| FinderError::format("shop list", e))
}

/// Human-readable meaning of a shop endpoint status.
pub fn describe_status(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => {
            "Authentication failed. Please try again with a new token.".to_string()
        }
        StatusCode::NOT_ACCEPTABLE => {
            "Invalid request format. Please check the Accept header.".to_string()
        }
        StatusCode::SERVICE_UNAVAILABLE => {
            "Service unavailable. Please try again later.".to_string()
        }
        StatusCode::GATEWAY_TIMEOUT => "Request timed out. Please try again.".to_string(),
        other => format!("API request failed with status {}", other.as_u16()),
    }
}
