//! Span helpers for bridge operations
//!
//! Static span names and structured attributes, kept apart from the business
//! logic. The helpers are used by [`AcrossBridge`](crate::AcrossBridge) and
//! [`WorkflowController`](crate::WorkflowController) and are public for callers
//! who want to wrap their own instrumentation around the same operations.
//!
//! # Example
//!
//! ```rust,no_run
//! use across_bridge::spans;
//! use alloy_primitives::{Address, U256};
//!
//! let span = spans::fetch_quote(&Address::ZERO, &U256::from(100u64), 1, 10, 3);
//! let _guard = span.enter();
//! // Your custom quote logic here
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;

use crate::error::BridgeError;

/// Create span for reading the ERC-20 allowance of the SpokePool.
#[inline]
pub fn check_allowance(owner: &Address, token: &Address, spender: &Address, amount: &U256) -> Span {
    tracing::debug_span!(
        "across_bridge.check_allowance",
        owner = %owner,
        token = %token,
        spender = %spender,
        amount = %amount,
        sufficient = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for the approve transaction and its confirmation wait.
///
/// Children: wait_for_confirmation
#[inline]
pub fn approve_token(owner: &Address, token: &Address, spender: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "across_bridge.approve_token",
        owner = %owner,
        token = %token,
        spender = %spender,
        amount = %amount,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for fetching a quote, covering every retry attempt.
///
/// Children: across_bridge.quote_attempt
#[inline]
pub fn fetch_quote(
    token: &Address,
    amount: &U256,
    origin_chain_id: u64,
    destination_chain_id: u64,
    max_attempts: u32,
) -> Span {
    tracing::info_span!(
        "across_bridge.fetch_quote",
        token = %token,
        amount = %amount,
        origin_chain_id = origin_chain_id,
        destination_chain_id = destination_chain_id,
        max_attempts = max_attempts,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a single quote request.
///
/// Parent: across_bridge.fetch_quote
#[inline]
pub fn quote_attempt(attempt: u32) -> Span {
    tracing::debug_span!("across_bridge.quote_attempt", attempt = attempt)
}

/// Create span for the whole deposit: quote, fee deduction, send, confirm.
#[inline]
pub fn initiate_deposit(depositor: &Address, token: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "across_bridge.initiate_deposit",
        depositor = %depositor,
        token = %token,
        amount = %amount,
        output_amount = tracing::field::Empty,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for building a `depositV3` transaction request.
#[inline]
pub fn deposit_v3(
    depositor: &Address,
    input_token: &Address,
    input_amount: &U256,
    output_amount: &U256,
    destination_chain_id: u64,
) -> Span {
    tracing::debug_span!(
        "across_bridge.deposit_v3",
        depositor = %depositor,
        input_token = %input_token,
        input_amount = %input_amount,
        output_amount = %output_amount,
        destination_chain_id = destination_chain_id,
    )
}

/// Create span for waiting on a transaction receipt.
#[inline]
pub fn wait_for_confirmation(tx_hash: &TxHash) -> Span {
    tracing::debug_span!("across_bridge.wait_for_confirmation", tx_hash = %tx_hash)
}

/// Create span for a workflow submission.
#[inline]
pub fn submit(account: &Address, amount: &U256, has_allowance: bool) -> Span {
    tracing::info_span!(
        "across_bridge.submit",
        account = %account,
        amount = %amount,
        has_allowance = has_allowance,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record a [`BridgeError`] on `span`.
///
/// Follows OpenTelemetry conventions: `error.type`, `error.message` and an
/// `ERROR` status code.
pub fn record_error(span: &Span, error: &BridgeError) {
    span.record("error.type", error.kind());
    span.record("error.message", error.to_string());
    span.record("otel.status_code", "ERROR");
}
