// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
use alloy_primitives::{TxHash, U256};
use thiserror::Error;

/// Errors surfaced by the bridge workflow.
///
/// Every variant is cloneable so a failure can be held by
/// [`WorkflowState::Failed`](crate::WorkflowState::Failed) and shown to the user.
/// Lower level errors (RPC, HTTP, JSON) are classified into one of these
/// variants at the boundary where they occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("No wallet provider available")]
    NoProvider,

    #[error("User rejected the wallet connection request")]
    UserRejected,

    #[error("Chain read failed: {0}")]
    ChainRead(String),

    #[error("Transaction rejected by signer: {reason}")]
    TransactionRejected { reason: String },

    #[error("Transaction {tx_hash} reverted: {reason}")]
    TransactionReverted { tx_hash: TxHash, reason: String },

    #[error("Quote service error{}: {reason}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    QuoteService { status: Option<u16>, reason: String },

    #[error("Relay fee {fee} exceeds deposit amount {amount}")]
    InsufficientAmount { amount: U256, fee: U256 },

    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Unsupported token: {symbol}")]
    UnsupportedToken { symbol: String },

    /// The submission was dropped before its transaction resolved. The
    /// transaction may still be mined.
    #[error("Submission interrupted while {stage}; the transaction may still be pending")]
    Interrupted { stage: String },

    #[error("Submission disabled: {reason}")]
    SubmissionDisabled { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Returns true if a quote request that failed with this error may succeed
    /// when repeated.
    ///
    /// Transport failures and timeouts carry no status. Rate limiting and
    /// server errors are transient; other client errors and malformed bodies
    /// are not.
    pub fn is_retryable_quote_error(&self) -> bool {
        match self {
            BridgeError::QuoteService { status: None, .. } => true,
            BridgeError::QuoteService {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Short static name of the variant, used for span error attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::NoProvider => "NoProviderError",
            BridgeError::UserRejected => "UserRejectedError",
            BridgeError::ChainRead(_) => "ChainReadError",
            BridgeError::TransactionRejected { .. } => "TransactionRejectedError",
            BridgeError::TransactionReverted { .. } => "TransactionRevertedError",
            BridgeError::QuoteService { .. } => "QuoteServiceError",
            BridgeError::InsufficientAmount { .. } => "InsufficientAmountError",
            BridgeError::InvalidAmount { .. } => "InvalidAmount",
            BridgeError::UnsupportedToken { .. } => "UnsupportedToken",
            BridgeError::Interrupted { .. } => "InterruptedError",
            BridgeError::SubmissionDisabled { .. } => "SubmissionDisabled",
            BridgeError::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
