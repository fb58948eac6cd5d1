// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract addresses used by the Across route
//!
//! This module centralizes the SpokePool and token addresses for the chains the
//! bridge knows about.

use alloy_primitives::{address, Address};

// SpokePool Addresses

/// <https://etherscan.io/address/0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5>
pub const ETHEREUM_SPOKE_POOL_ADDRESS: Address =
    address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5");

/// <https://optimistic.etherscan.io/address/0x6f26Bf09B1C792e3228e5467807a900A503c0281>
pub const OPTIMISM_SPOKE_POOL_ADDRESS: Address =
    address!("6f26Bf09B1C792e3228e5467807a900A503c0281");

// Token Addresses

/// <https://etherscan.io/address/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48>
pub const ETHEREUM_USDC_ADDRESS: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Sentinel output token: the relayer fills with the destination chain's native asset.
pub const NATIVE_OUTPUT_TOKEN: Address = Address::ZERO;
