use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use bon::Builder;
use tracing::{debug, error, field, info, warn, Instrument};

use super::config::RetryConfig;
use super::params::DepositParams;
use crate::chain::addresses::NATIVE_OUTPUT_TOKEN;
use crate::chain::{AcrossChain, DEPOSIT_GAS_LIMIT, FILL_DEADLINE_OFFSET_SECS};
use crate::contracts::erc20::approve_transaction;
use crate::contracts::spoke_pool::SpokePoolContract;
use crate::error::{BridgeError, Result};
use crate::protocol::{Quote, QuoteRequest};
use crate::spans;
use crate::traits::{ChainSigner, Clock, QuoteProvider};

/// Across bridge client for the Ethereum → Optimism route
///
/// Bundles the four stateless operations the workflow is built from:
/// allowance check, approval, quote fetch and deposit. None of them keeps
/// state between calls; the signer is passed in on every call.
///
/// # Example
///
/// ```rust,no_run
/// # use across_bridge::{AcrossBridge, BridgeError, USDC};
/// # use across_bridge::providers::{AcrossQuoteProvider, AlloyWallet, TokioClock};
/// # use across_bridge::traits::WalletGateway;
/// # use alloy_primitives::U256;
/// # use alloy_provider::ProviderBuilder;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bridge = AcrossBridge::builder()
///     .quote_provider(AcrossQuoteProvider::production()?)
///     .clock(TokioClock::new())
///     .build();
///
/// let provider = ProviderBuilder::new().connect("http://localhost:1248").await?;
/// let signer = AlloyWallet::new(provider).connect().await?;
///
/// let amount = U256::from(100_000_000u64); // 100 USDC
/// if !bridge.check_allowance(&signer, USDC.address, amount).await? {
///     bridge.approve_token(&signer, USDC.address, amount).await?;
/// }
/// let tx_hash = bridge.initiate_deposit(&signer, USDC.address, amount).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug)]
pub struct AcrossBridge<Q: QuoteProvider, C: Clock> {
    quote_provider: Q,
    clock: C,
    #[builder(default = NamedChain::Mainnet)]
    origin_chain: NamedChain,
    #[builder(default = NamedChain::Optimism)]
    destination_chain: NamedChain,
    /// Spender of the approval and deposit target. Defaults to the origin
    /// chain's SpokePool.
    spoke_pool: Option<Address>,
    #[builder(default)]
    retry_config: RetryConfig,
    #[builder(default = DEPOSIT_GAS_LIMIT)]
    gas_limit: u64,
    #[builder(default = FILL_DEADLINE_OFFSET_SECS)]
    fill_deadline_offset_secs: u64,
}

/// Computes `amount - fee`.
///
/// # Errors
///
/// Returns [`BridgeError::InsufficientAmount`] if the fee is at least the amount,
/// since nothing (or less than nothing) would reach the destination.
///
/// # Example
///
/// ```rust
/// use across_bridge::output_amount;
/// use alloy_primitives::U256;
///
/// let out = output_amount(U256::from(100_000_000u64), U256::from(5_000_000u64)).unwrap();
/// assert_eq!(out, U256::from(95_000_000u64));
/// assert!(output_amount(U256::from(5u64), U256::from(5u64)).is_err());
/// ```
pub fn output_amount(amount: U256, fee: U256) -> Result<U256> {
    if fee >= amount {
        return Err(BridgeError::InsufficientAmount { amount, fee });
    }
    Ok(amount - fee)
}

impl<Q: QuoteProvider, C: Clock> AcrossBridge<Q, C> {
    pub fn origin_chain(&self) -> NamedChain {
        self.origin_chain
    }

    pub fn destination_chain(&self) -> NamedChain {
        self.destination_chain
    }

    /// Returns the SpokePool address, the spender every allowance is checked against
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if no address was configured and
    /// the origin chain has no known SpokePool.
    pub fn spoke_pool(&self) -> Result<Address> {
        match self.spoke_pool {
            Some(address) => Ok(address),
            None => self.origin_chain.spoke_pool_address(),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry_config
    }

    pub fn quote_provider(&self) -> &Q {
        &self.quote_provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Builds the quote request for `amount` of `token` on this route.
    pub fn quote_request(&self, token: Address, amount: U256) -> QuoteRequest {
        QuoteRequest {
            token,
            amount,
            origin_chain_id: u64::from(self.origin_chain),
            destination_chain_id: u64::from(self.destination_chain),
        }
    }

    /// Returns true iff the SpokePool may already move at least `amount` of
    /// `token` from the signer's account.
    ///
    /// Comparison is on [`U256`] base units. Not retried.
    ///
    /// # Errors
    ///
    /// Propagates [`BridgeError::ChainRead`] from the signer.
    pub async fn check_allowance<S>(&self, signer: &S, token: Address, amount: U256) -> Result<bool>
    where
        S: ChainSigner + ?Sized,
    {
        let owner = signer.address();
        let spoke_pool = self.spoke_pool()?;
        let span = spans::check_allowance(&owner, &token, &spoke_pool, &amount);

        let result = signer
            .allowance(token, owner, spoke_pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(current) => {
                let sufficient = current >= amount;
                span.record("sufficient", sufficient);
                debug!(
                    owner = %owner,
                    allowance = %current,
                    requested = %amount,
                    sufficient = sufficient,
                    event = "allowance_checked"
                );
                Ok(sufficient)
            }
            Err(e) => {
                spans::record_error(&span, &e);
                error!(error = %e, owner = %owner, event = "allowance_check_failed");
                Err(e)
            }
        }
    }

    /// Approves the SpokePool for exactly `amount` and waits for the approval
    /// to be mined.
    ///
    /// The on-chain allowance is only guaranteed to reflect the approval once
    /// this returns.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TransactionRejected`] if the signer declines
    /// - [`BridgeError::TransactionReverted`] if the approval fails on chain
    pub async fn approve_token<S>(&self, signer: &S, token: Address, amount: U256) -> Result<TxHash>
    where
        S: ChainSigner + ?Sized,
    {
        let owner = signer.address();
        let spoke_pool = self.spoke_pool()?;
        let span = spans::approve_token(&owner, &token, &spoke_pool, &amount);

        let result = async {
            let tx = approve_transaction(token, owner, spoke_pool, amount);
            let tx_hash = signer.send_transaction(tx).await?;
            info!(tx_hash = %tx_hash, event = "approve_transaction_sent");

            let confirmed = signer
                .wait_for_confirmation(tx_hash)
                .instrument(spans::wait_for_confirmation(&tx_hash))
                .await?;
            info!(tx_hash = %confirmed, event = "approve_transaction_confirmed");
            Ok::<_, BridgeError>(confirmed)
        }
        .instrument(span.clone())
        .await;

        match &result {
            Ok(tx_hash) => {
                span.record("tx_hash", field::display(tx_hash));
            }
            Err(e) => {
                spans::record_error(&span, e);
                error!(error = %e, event = "approve_failed");
            }
        }
        result
    }

    /// Fetches a fee quote, retrying transient failures with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns the last [`BridgeError::QuoteService`] once the attempts are
    /// exhausted, or immediately for a non-retryable failure.
    pub async fn fetch_quote(&self, request: QuoteRequest) -> Result<Quote> {
        let max_attempts = self.retry_config.max_attempts.max(1);
        let span = spans::fetch_quote(
            &request.token,
            &request.amount,
            request.origin_chain_id,
            request.destination_chain_id,
            max_attempts,
        );

        let result = async {
            let mut attempt = 1;
            loop {
                let outcome = self
                    .quote_provider
                    .suggested_fees(&request)
                    .instrument(spans::quote_attempt(attempt))
                    .await;

                match outcome {
                    Ok(quote) => {
                        info!(
                            total_relay_fee = %quote.total_relay_fee,
                            exclusive_relayer = %quote.exclusive_relayer,
                            quote_timestamp = quote.timestamp,
                            attempt = attempt,
                            event = "quote_received"
                        );
                        return Ok(quote);
                    }
                    Err(e) if e.is_retryable_quote_error() && attempt < max_attempts => {
                        let delay = self.retry_config.backoff_for_retry(attempt);
                        warn!(
                            error = %e,
                            attempt = attempt,
                            max_attempts = max_attempts,
                            backoff_ms = delay.as_millis() as u64,
                            event = "quote_attempt_failed"
                        );
                        self.clock.sleep(delay).await;
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        .instrument(span.clone())
        .await;

        if let Err(e) = &result {
            spans::record_error(&span, e);
            error!(error = %e, event = "quote_failed");
        }
        result
    }

    /// Unix timestamp after which the deposit can no longer be filled.
    pub fn fill_deadline(&self) -> Result<u32> {
        let deadline = self
            .clock
            .unix_timestamp()
            .saturating_add(self.fill_deadline_offset_secs);
        u32::try_from(deadline).map_err(|_| {
            BridgeError::InvalidConfig(format!("fill deadline {deadline} does not fit in uint32"))
        })
    }

    /// Assembles `depositV3` arguments from a quote.
    ///
    /// The depositor is also the recipient, and the output token is the native
    /// asset sentinel so the relayer pays out on the destination chain.
    pub fn deposit_params(
        &self,
        depositor: Address,
        token: Address,
        amount: U256,
        quote: &Quote,
    ) -> Result<DepositParams> {
        let output = output_amount(amount, quote.total_relay_fee)?;

        Ok(DepositParams::builder()
            .depositor(depositor)
            .recipient(depositor)
            .input_token(token)
            .output_token(NATIVE_OUTPUT_TOKEN)
            .input_amount(amount)
            .output_amount(output)
            .destination_chain_id(u64::from(self.destination_chain))
            .exclusive_relayer(quote.exclusive_relayer)
            .quote_timestamp(quote.timestamp)
            .fill_deadline(self.fill_deadline()?)
            .exclusivity_deadline(quote.exclusivity_deadline)
            .message(Bytes::new())
            .build())
    }

    /// Quotes, builds and sends a `depositV3` for `amount`, then waits for it
    /// to be mined.
    ///
    /// The caller must have established that the allowance covers `amount`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::QuoteService`] if no quote could be fetched
    /// - [`BridgeError::InsufficientAmount`] if the relay fee eats the whole amount
    /// - [`BridgeError::TransactionRejected`] / [`BridgeError::TransactionReverted`]
    pub async fn initiate_deposit<S>(
        &self,
        signer: &S,
        token: Address,
        amount: U256,
    ) -> Result<TxHash>
    where
        S: ChainSigner + ?Sized,
    {
        let depositor = signer.address();
        let span = spans::initiate_deposit(&depositor, &token, &amount);

        let result = async {
            let quote = self.fetch_quote(self.quote_request(token, amount)).await?;
            let params = self.deposit_params(depositor, token, amount, &quote)?;
            tracing::Span::current().record("output_amount", field::display(params.output_amount()));

            let tx = SpokePoolContract::new(self.spoke_pool()?)
                .deposit_v3_transaction(&params, self.gas_limit);
            let tx_hash = signer.send_transaction(tx).await?;
            info!(tx_hash = %tx_hash, event = "deposit_transaction_sent");

            let confirmed = signer
                .wait_for_confirmation(tx_hash)
                .instrument(spans::wait_for_confirmation(&tx_hash))
                .await?;
            info!(
                tx_hash = %confirmed,
                input_amount = %params.input_amount(),
                output_amount = %params.output_amount(),
                event = "deposit_transaction_confirmed"
            );
            Ok::<_, BridgeError>(confirmed)
        }
        .instrument(span.clone())
        .await;

        match &result {
            Ok(tx_hash) => {
                span.record("tx_hash", field::display(tx_hash));
            }
            Err(e) => {
                spans::record_error(&span, e);
                error!(error = %e, event = "deposit_failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::{ETHEREUM_SPOKE_POOL_ADDRESS, OPTIMISM_SPOKE_POOL_ADDRESS};
    use crate::testing::{FakeClock, FakeQuoteProvider, FakeSigner};
    use crate::USDC;
    use rstest::rstest;
    use std::time::Duration;

    fn quote(fee: u64) -> Quote {
        Quote {
            total_relay_fee: U256::from(fee),
            exclusive_relayer: Address::ZERO,
            timestamp: 1_718_000_000,
            exclusivity_deadline: 0,
        }
    }

    fn server_error() -> BridgeError {
        BridgeError::QuoteService {
            status: Some(503),
            reason: "unavailable".to_string(),
        }
    }

    fn bridge(quotes: FakeQuoteProvider, clock: FakeClock) -> AcrossBridge<FakeQuoteProvider, FakeClock> {
        AcrossBridge::builder()
            .quote_provider(quotes)
            .clock(clock)
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let bridge = bridge(FakeQuoteProvider::new(), FakeClock::new());
        assert_eq!(bridge.origin_chain(), NamedChain::Mainnet);
        assert_eq!(bridge.destination_chain(), NamedChain::Optimism);
        assert_eq!(bridge.spoke_pool().unwrap(), ETHEREUM_SPOKE_POOL_ADDRESS);
        assert_eq!(bridge.retry_config(), RetryConfig::default());

        let request = bridge.quote_request(USDC.address, U256::from(1u64));
        assert_eq!(request.origin_chain_id, 1);
        assert_eq!(request.destination_chain_id, 10);
    }

    #[test]
    fn test_output_amount() {
        assert_eq!(
            output_amount(U256::from(100_000_000u64), U256::from(5_000_000u64)).unwrap(),
            U256::from(95_000_000u64)
        );
        assert_eq!(
            output_amount(U256::from(10u64), U256::from(10u64)).unwrap_err(),
            BridgeError::InsufficientAmount {
                amount: U256::from(10u64),
                fee: U256::from(10u64)
            }
        );
        assert!(output_amount(U256::from(10u64), U256::from(11u64)).is_err());
    }

    #[test]
    fn test_fill_deadline_is_five_hours_out() {
        let clock = FakeClock::new();
        clock.set_unix_timestamp(1_718_000_000);
        let bridge = bridge(FakeQuoteProvider::new(), clock);

        assert_eq!(bridge.fill_deadline().unwrap(), 1_718_018_000);
    }

    #[test]
    fn test_fill_deadline_overflow() {
        let clock = FakeClock::new();
        clock.set_unix_timestamp(u64::from(u32::MAX));
        let bridge = bridge(FakeQuoteProvider::new(), clock);

        assert!(matches!(
            bridge.fill_deadline(),
            Err(BridgeError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_check_allowance_compares_exact_amount() {
        let bridge = bridge(FakeQuoteProvider::new(), FakeClock::new());
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        signer.set_allowance(USDC.address, bridge.spoke_pool().unwrap(), U256::from(100_000_000u64));

        assert!(bridge
            .check_allowance(&signer, USDC.address, U256::from(100_000_000u64))
            .await
            .unwrap());
        assert!(!bridge
            .check_allowance(&signer, USDC.address, U256::from(100_000_001u64))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_fetch_quote_retries_transient_errors() {
        let quotes = FakeQuoteProvider::new();
        quotes.add_response_sequence(vec![
            Err(server_error()),
            Err(server_error()),
            Ok(quote(5_000_000)),
        ]);
        let clock = FakeClock::new();
        let bridge = bridge(quotes.clone(), clock.clone());

        let result = bridge
            .fetch_quote(bridge.quote_request(USDC.address, U256::from(100_000_000u64)))
            .await
            .unwrap();

        assert_eq!(result.total_relay_fee, U256::from(5_000_000u64));
        assert_eq!(quotes.call_count(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(500), Duration::from_millis(1000)]
        );
    }

    #[tokio::test]
    async fn test_fetch_quote_gives_up_after_max_attempts() {
        let quotes = FakeQuoteProvider::new();
        quotes.add_response_sequence(vec![Err(server_error()); 5]);
        let clock = FakeClock::new();
        let bridge = bridge(quotes.clone(), clock.clone());

        let err = bridge
            .fetch_quote(bridge.quote_request(USDC.address, U256::from(1u64)))
            .await
            .unwrap_err();

        assert_eq!(err, server_error());
        assert_eq!(quotes.call_count(), 3);
        assert_eq!(clock.sleep_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_quote_does_not_retry_client_errors() {
        let quotes = FakeQuoteProvider::new();
        let bad_request = BridgeError::QuoteService {
            status: Some(400),
            reason: "bad token".to_string(),
        };
        quotes.add_response_sequence(vec![Err(bad_request.clone()), Ok(quote(1))]);
        let clock = FakeClock::new();
        let bridge = bridge(quotes.clone(), clock.clone());

        let err = bridge
            .fetch_quote(bridge.quote_request(USDC.address, U256::from(1u64)))
            .await
            .unwrap_err();

        assert_eq!(err, bad_request);
        assert_eq!(quotes.call_count(), 1);
        assert_eq!(clock.sleep_count(), 0);
    }

    #[tokio::test]
    async fn test_initiate_deposit_sends_depositv3() {
        let quotes = FakeQuoteProvider::new();
        quotes.add_response_sequence(vec![Ok(quote(5_000_000))]);
        let clock = FakeClock::new();
        clock.set_unix_timestamp(1_718_000_000);
        let bridge = bridge(quotes.clone(), clock);
        let signer = FakeSigner::new(Address::repeat_byte(0x11));

        let tx_hash = bridge
            .initiate_deposit(&signer, USDC.address, U256::from(100_000_000u64))
            .await
            .unwrap();

        let sent = signer.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].gas, Some(DEPOSIT_GAS_LIMIT));
        assert_eq!(signer.confirmed_transactions(), vec![tx_hash]);

        let request = quotes.last_request().unwrap();
        assert_eq!(request.amount, U256::from(100_000_000u64));
    }

    #[tokio::test]
    async fn test_initiate_deposit_rejects_fee_above_amount() {
        let quotes = FakeQuoteProvider::new();
        quotes.add_response_sequence(vec![Ok(quote(2_000_000))]);
        let bridge = bridge(quotes, FakeClock::new());
        let signer = FakeSigner::new(Address::repeat_byte(0x11));

        let err = bridge
            .initiate_deposit(&signer, USDC.address, U256::from(1_000_000u64))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::InsufficientAmount { .. }));
        assert!(signer.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_approve_token_waits_for_confirmation() {
        let bridge = bridge(FakeQuoteProvider::new(), FakeClock::new());
        let signer = FakeSigner::new(Address::repeat_byte(0x11));

        let tx_hash = bridge
            .approve_token(&signer, USDC.address, U256::from(42u64))
            .await
            .unwrap();

        assert_eq!(signer.confirmed_transactions(), vec![tx_hash]);
        assert_eq!(
            signer.allowance_of(USDC.address, bridge.spoke_pool().unwrap()),
            U256::from(42u64)
        );
    }

    #[rstest]
    #[case(NamedChain::Mainnet, ETHEREUM_SPOKE_POOL_ADDRESS)]
    #[case(NamedChain::Optimism, OPTIMISM_SPOKE_POOL_ADDRESS)]
    fn test_spoke_pool_follows_origin_chain(#[case] origin: NamedChain, #[case] expected: Address) {
        let bridge = AcrossBridge::builder()
            .quote_provider(FakeQuoteProvider::new())
            .clock(FakeClock::new())
            .origin_chain(origin)
            .build();

        assert_eq!(bridge.spoke_pool().unwrap(), expected);
    }

    #[test]
    fn test_explicit_spoke_pool_wins() {
        let custom = Address::repeat_byte(0x77);
        let bridge = AcrossBridge::builder()
            .quote_provider(FakeQuoteProvider::new())
            .clock(FakeClock::new())
            .origin_chain(NamedChain::Arbitrum)
            .spoke_pool(custom)
            .build();

        assert_eq!(bridge.spoke_pool().unwrap(), custom);
    }

    #[tokio::test]
    async fn test_unknown_origin_chain_reads_nothing() {
        let bridge = AcrossBridge::builder()
            .quote_provider(FakeQuoteProvider::new())
            .clock(FakeClock::new())
            .origin_chain(NamedChain::Arbitrum)
            .build();
        let signer = FakeSigner::new(Address::repeat_byte(0x11));

        let err = bridge
            .check_allowance(&signer, USDC.address, U256::from(1u64))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::InvalidConfig(_)));
        assert_eq!(signer.allowance_read_count(), 0);

        let err = bridge
            .approve_token(&signer, USDC.address, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidConfig(_)));
        assert!(signer.sent_transactions().is_empty());
    }
}
