use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::{
    coffee::{
        auth::TokenProvider,
        http::{BoundedInvoker, ReqwestTransport, Transport},
        shops::ShopFetcher,
    },
    config::ClientConfig,
    error::FinderError,
    types::{Position, RankedShop, Token},
    utils,
};

/// Runs the whole lookup: token, shop list, ranking.
pub struct ShopFinder<T> {
    invoker: BoundedInvoker<T>,
    config: ClientConfig,
}

impl ShopFinder<ReqwestTransport> {
    /// Creates a finder talking to the configured endpoints over HTTP.
    pub fn from_config(config: ClientConfig) -> Result<Self, FinderError> {
        let transport = ReqwestTransport::new()?;
        ShopFinder::new(transport, config)
    }
}

impl<T: Transport> ShopFinder<T> {
    /// Creates a finder sending its requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] when `config` does not validate. No
    /// request is sent in that case.
    pub fn new(transport: T, config: ClientConfig) -> Result<Self, FinderError> {
        config.validate()?;
        let invoker = BoundedInvoker::new(transport, config.timeout);
        Ok(ShopFinder { invoker, config })
    }

    /// Looks up the nearest shops for coordinates given as text.
    ///
    /// Missing or non-numeric input yields an empty list without touching
    /// the network.
    pub async fn nearest_shops_from_args<I, S>(
        &self,
        args: I,
    ) -> Result<Vec<RankedShop>, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match Position::from_args(args) {
            Ok(position) => self.nearest_shops(Some(position)).await,
            Err(e) => {
                warn!(error = %e, "no usable query coordinate");
                Ok(Vec::new())
            }
        }
    }

    /// Returns the closest shops to `position`, nearest first.
    ///
    /// An absent or non-finite position yields an empty list without touching
    /// the network. Any failure while talking to the API ends the run; partial
    /// results are never returned.
    #[instrument(skip(self))]
    pub async fn nearest_shops(
        &self,
        position: Option<Position>,
    ) -> Result<Vec<RankedShop>, FinderError> {
        let position = match position {
            Some(p) if p.is_valid() => p,
            _ => {
                warn!("query coordinate missing or not finite, skipping lookup");
                return Ok(Vec::new());
            }
        };

        let tokens = self.token_provider();
        let token = self.acquire_token(&tokens).await?;

        let fetcher = ShopFetcher::new(&self.invoker, tokens, &self.config.retry);
        let records = fetcher.fetch_shops(&self.config.shops_url, token).await?;

        let ranked = utils::rank_shops(&position, &records);
        info!(received = records.len(), ranked = ranked.len(), "ranked shops");
        Ok(ranked)
    }

    fn token_provider(&self) -> TokenProvider<'_, T> {
        TokenProvider::new(&self.invoker, &self.config.token_url)
    }

    /// Acquires the initial token, retrying authentication service failures
    /// up to `token_retries` times.
    async fn acquire_token(&self, tokens: &TokenProvider<'_, T>) -> Result<Token, FinderError> {
        let mut retries_left = self.config.retry.token_retries;

        loop {
            match tokens.acquire_token().await {
                Ok(token) => return Ok(token),
                Err(e @ FinderError::AuthService { .. }) if retries_left > 0 => {
                    retries_left -= 1;
                    warn!(
                        error = %e,
                        retries_left,
                        delay_ms = self.config.retry.backoff.as_millis() as u64,
                        "token request failed, retrying after backoff"
                    );
                    sleep(self.config.retry.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
