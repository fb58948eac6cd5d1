// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Core Across bridge implementation
//!
//! This module provides the stateless executors the workflow is built from:
//! allowance check, approval, quote fetch with retry, and the `depositV3` call
//! into the Ethereum SpokePool.

mod across;
mod config;
mod params;

pub use across::{output_amount, AcrossBridge};
pub use config::{RetryConfig, ACROSS_SUGGESTED_FEES_URL, QUOTE_REQUEST_TIMEOUT};
pub use params::DepositParams;
