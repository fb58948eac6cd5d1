//! Chain configuration and contract addresses for the Across route
//!
//! This module contains the fixed Ethereum → Optimism route: chain ids, the
//! origin SpokePool, the bridged token and the deposit constants.

pub mod addresses;
mod config;

pub use config::{AcrossChain, Token, USDC};

/// Origin chain id (Ethereum mainnet).
pub const ORIGIN_CHAIN_ID: u64 = 1;

/// Destination chain id (OP Mainnet).
pub const DESTINATION_CHAIN_ID: u64 = 10;

/// Seconds added to the current time to form the deposit's fill deadline (5 hours).
pub const FILL_DEADLINE_OFFSET_SECS: u64 = 18_000;

/// Gas limit ceiling attached to every `depositV3` transaction.
pub const DEPOSIT_GAS_LIMIT: u64 = 500_000;
