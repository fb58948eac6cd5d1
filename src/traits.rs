//! Core trait abstractions for the bridge workflow.
//!
//! The wallet, the chain, the quote API and time are all reached through the
//! traits below. Production implementations live in [`crate::providers`];
//! fakes for tests live in [`crate::testing`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use across_bridge::traits::QuoteProvider;
//! use across_bridge::{Quote, QuoteRequest, Result};
//!
//! struct FixedFeeQuotes {
//!     quote: Quote,
//! }
//!
//! #[async_trait::async_trait]
//! impl QuoteProvider for FixedFeeQuotes {
//!     async fn suggested_fees(&self, _request: &QuoteRequest) -> Result<Quote> {
//!         Ok(self.quote.clone())
//!     }
//! }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::protocol::{Quote, QuoteRequest};

/// Source of a signing identity, the Rust side of an injected browser wallet.
///
/// # Test Scenarios
///
/// - No wallet available ([`BridgeError::NoProvider`](crate::BridgeError::NoProvider))
/// - User declines the account request ([`BridgeError::UserRejected`](crate::BridgeError::UserRejected))
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Signer capability handed out on a successful connection.
    type Signer: ChainSigner;

    /// Requests account access and returns a signer bound to the connected account.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NoProvider`](crate::BridgeError::NoProvider) if no wallet is reachable
    /// - [`BridgeError::UserRejected`](crate::BridgeError::UserRejected) if the user declines
    async fn connect(&self) -> Result<Self::Signer>;
}

/// A connected account that can read the chain and sign transactions.
///
/// Sending and confirming are separate calls so callers can observe the
/// transaction hash before the (possibly long) confirmation wait.
#[async_trait]
pub trait ChainSigner: Send + Sync {
    /// The connected account.
    fn address(&self) -> Address;

    /// Reads the ERC-20 allowance `owner` has granted `spender` on `token`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ChainRead`](crate::BridgeError::ChainRead) if the RPC call fails.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Signs and broadcasts a transaction, returning its hash.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::TransactionRejected`](crate::BridgeError::TransactionRejected)
    /// if the signer declines or the node refuses the transaction.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Waits until the transaction is mined.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TransactionReverted`](crate::BridgeError::TransactionReverted)
    ///   if the receipt reports failure
    /// - [`BridgeError::ChainRead`](crate::BridgeError::ChainRead) if the receipt
    ///   cannot be obtained
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash>;
}

/// A single suggested-fees request against the quote service.
///
/// Retries are the caller's concern, see
/// [`AcrossBridge::fetch_quote`](crate::AcrossBridge::fetch_quote).
///
/// # Test Scenarios
///
/// - Server errors followed by success
/// - Malformed bodies
/// - Fees larger than the deposit
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches a fee quote.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::QuoteService`](crate::BridgeError::QuoteService) on
    /// transport failure, non-2xx status or an unparseable body.
    async fn suggested_fees(&self, request: &QuoteRequest) -> Result<Quote>;
}

/// Trait for time-based operations.
///
/// Lets tests skip retry backoff and pin the wall clock used for fill deadlines.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Seconds since the Unix epoch.
    fn unix_timestamp(&self) -> u64;
}
