// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 contract bindings for approval and allowance operations
//!
//! The SpokePool pulls the deposit amount with `transferFrom`, so the depositor
//! has to approve it first.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use Erc20::Erc20Instance;

/// ERC20 contract wrapper for allowance reads
///
/// Approvals are built with [`approve_transaction`], which needs no provider
/// and can be handed to any signer.
///
/// # Example
///
/// ```rust,no_run
/// use across_bridge::{approve_transaction, Erc20Contract};
/// use alloy_primitives::{address, U256};
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
/// let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
/// let spoke_pool = address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5");
///
/// let erc20 = Erc20Contract::new(usdc, provider);
///
/// let owner = address!("1234567890123456789012345678901234567890");
/// let allowance = erc20.allowance(owner, spoke_pool).await?;
///
/// if allowance < U256::from(1_000_000u64) {
///     let tx = approve_transaction(
///         usdc,
///         owner,
///         spoke_pool,
///         U256::from(1_000_000u64),
///     );
///     // Send transaction...
/// }
/// # Ok(())
/// # }
/// ```
pub struct Erc20Contract<P: Provider<Ethereum>> {
    instance: Erc20Instance<P>,
}

impl<P: Provider<Ethereum>> Erc20Contract<P> {
    /// Create a new ERC20 contract wrapper
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self {
            instance: Erc20Instance::new(address, provider),
        }
    }

    /// Get the amount of tokens `spender` may move on behalf of `owner`
    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<U256, alloy_contract::Error> {
        debug!(
            owner = %owner,
            spender = %spender,
            contract_address = %self.instance.address(),
            event = "checking_allowance"
        );

        let result = self.instance.allowance(owner, spender).call().await?;

        debug!(
            owner = %owner,
            spender = %spender,
            allowance = %result,
            event = "allowance_retrieved"
        );

        Ok(result)
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Create a transaction request approving `spender` for `amount` of `token`
///
/// This creates but does not send the approval transaction.
pub fn approve_transaction(
    token: Address,
    from: Address,
    spender: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        spender = %spender,
        amount = %amount,
        contract_address = %token,
        event = "approve_transaction_created"
    );

    let calldata = Erc20::approveCall { spender, amount }.abi_encode();

    TransactionRequest::default()
        .with_from(from)
        .with_to(token)
        .with_input(calldata)
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
);
