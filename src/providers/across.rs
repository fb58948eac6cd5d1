//! Across suggested-fees API quote provider implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use crate::bridge::{ACROSS_SUGGESTED_FEES_URL, QUOTE_REQUEST_TIMEOUT};
use crate::error::{BridgeError, Result};
use crate::protocol::{Quote, QuoteRequest};
use crate::traits::QuoteProvider;

/// Production quote provider using Across's hosted suggested-fees API.
///
/// Every request is bounded by the client timeout, so a stalled API can't
/// suspend the workflow indefinitely.
///
/// # Examples
///
/// ```rust,no_run
/// use across_bridge::providers::AcrossQuoteProvider;
/// use across_bridge::traits::QuoteProvider;
/// use across_bridge::{QuoteRequest, USDC};
/// use alloy_primitives::U256;
///
/// # async fn example() -> Result<(), across_bridge::BridgeError> {
/// let provider = AcrossQuoteProvider::production()?;
/// let quote = provider
///     .suggested_fees(&QuoteRequest {
///         token: USDC.address,
///         amount: U256::from(100_000_000u64),
///         origin_chain_id: 1,
///         destination_chain_id: 10,
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AcrossQuoteProvider {
    endpoint: Url,
    client: Client,
}

impl AcrossQuoteProvider {
    /// Creates a provider for the given suggested-fees endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if the URL is invalid or the HTTP
    /// client can't be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BridgeError::InvalidConfig(format!("invalid quote URL {endpoint}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { endpoint, client })
    }

    /// Creates a provider for Across's hosted API with the default timeout.
    pub fn production() -> Result<Self> {
        Self::new(ACROSS_SUGGESTED_FEES_URL, QUOTE_REQUEST_TIMEOUT)
    }

    /// Constructs the full GET URL for a quote request.
    pub fn quote_url(&self, request: &QuoteRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        url
    }
}

/// Classifies a quote response by status and body.
fn parse_quote_response(status: StatusCode, body: &str) -> Result<Quote> {
    if !status.is_success() {
        return Err(BridgeError::QuoteService {
            status: Some(status.as_u16()),
            reason: body.chars().take(256).collect(),
        });
    }

    serde_json::from_str::<Quote>(body).map_err(|e| BridgeError::QuoteService {
        status: Some(status.as_u16()),
        reason: format!("malformed quote body: {e}"),
    })
}

fn transport_error(e: reqwest::Error) -> BridgeError {
    BridgeError::QuoteService {
        status: e.status().map(|s| s.as_u16()),
        reason: e.to_string(),
    }
}

#[async_trait]
impl QuoteProvider for AcrossQuoteProvider {
    #[instrument(skip(self), fields(token = %request.token, amount = %request.amount))]
    async fn suggested_fees(&self, request: &QuoteRequest) -> Result<Quote> {
        let url = self.quote_url(request);
        trace!(url = %url, "Requesting suggested fees from Across API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        trace!(status_code = %status, "Received response from Across API");

        let body = response.text().await.map_err(transport_error)?;

        match parse_quote_response(status, &body) {
            Ok(quote) => {
                debug!(
                    total_relay_fee = %quote.total_relay_fee,
                    exclusive_relayer = %quote.exclusive_relayer,
                    timestamp = quote.timestamp,
                    "Quote response parsed"
                );
                Ok(quote)
            }
            Err(e) => {
                warn!(error = %e, response_body = %body, event = "quote_response_rejected");
                Err(e)
            }
        }
    }
}
