//! Contract bindings
//!
//! This module contains Alloy-generated contract bindings for the two contracts
//! the bridge talks to:
//!
//! - [`Erc20Contract`](erc20::Erc20Contract): allowance reads and `approve` requests
//! - [`SpokePoolContract`](spoke_pool::SpokePoolContract): Across `depositV3` requests

pub mod erc20;
pub mod spoke_pool;
