//! # across-bridge-rs
//!
//! A Rust SDK for bridging USDC from Ethereum to Optimism through the
//! [Across](https://across.to) protocol.
//!
//! A transfer takes two on-chain steps: an ERC-20 `approve` that lets the
//! Ethereum SpokePool pull the tokens, then a `depositV3` call whose output
//! amount is the input minus the relayer fee quoted by Across's
//! suggested-fees API. [`WorkflowController`] sequences the two steps and
//! re-checks the allowance whenever the amount changes, so a deposit is never
//! sent without a sufficient allowance.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use across_bridge::providers::{AcrossQuoteProvider, AlloyWallet, TokioClock};
//! use across_bridge::{AcrossBridge, SubmitOutcome, WorkflowController};
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ProviderBuilder::new().connect("http://localhost:1248").await?;
//!
//! let bridge = AcrossBridge::builder()
//!     .quote_provider(AcrossQuoteProvider::production()?)
//!     .clock(TokioClock::new())
//!     .build();
//! let mut controller = WorkflowController::new(AlloyWallet::new(provider), bridge);
//!
//! controller.connect().await?;
//! controller.select_token("USDC").await?;
//! controller.set_amount("100").await?;
//!
//! // First submit approves, second submit deposits
//! while controller.can_submit() {
//!     if let SubmitOutcome::Deposited { tx_hash } = controller.submit().await? {
//!         println!("deposit mined: {tx_hash}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Every external effect sits behind a trait in [`traits`]: the wallet, the
//! signer, the quote service and the clock. [`testing`] has in-memory fakes for
//! all four.
//!
//! ## Public API
//!
//! - [`WorkflowController`], [`WorkflowState`] and [`SubmitOutcome`] - the user-facing state machine
//! - [`AcrossBridge`] - allowance, approval, quote and deposit executors
//! - [`Quote`] and [`QuoteRequest`] - Across suggested-fees API types
//! - [`BridgeError`] and [`Result`] - Error types for error handling
//! - Contract wrappers: [`Erc20Contract`], [`SpokePoolContract`], plus [`approve_transaction`]

mod amount;
mod bridge;
mod chain;
mod contracts;
mod error;
mod protocol;
mod workflow;

pub use amount::{format_token_amount, parse_token_amount};
pub use bridge::{
    output_amount, AcrossBridge, DepositParams, RetryConfig, ACROSS_SUGGESTED_FEES_URL,
    QUOTE_REQUEST_TIMEOUT,
};
pub use chain::addresses::{
    ETHEREUM_SPOKE_POOL_ADDRESS, ETHEREUM_USDC_ADDRESS, NATIVE_OUTPUT_TOKEN,
    OPTIMISM_SPOKE_POOL_ADDRESS,
};
pub use chain::{
    AcrossChain, Token, DEPOSIT_GAS_LIMIT, DESTINATION_CHAIN_ID, FILL_DEADLINE_OFFSET_SECS,
    ORIGIN_CHAIN_ID, USDC,
};
pub use contracts::{
    erc20::{approve_transaction, Erc20Contract},
    spoke_pool::SpokePoolContract,
};
pub use error::{BridgeError, Result};
pub use protocol::{Quote, QuoteRequest};
pub use workflow::{submit_label, SubmitOutcome, WorkflowController, WorkflowState};

// Public module for advanced users who need custom instrumentation
pub mod spans;

// Trait abstractions and their production implementations
pub mod providers;
pub mod traits;

// Fakes for driving the workflow in tests
pub mod testing;
