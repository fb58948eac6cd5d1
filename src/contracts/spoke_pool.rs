// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Across SpokePool contract bindings
//!
//! The SpokePool is the origin-chain entry point that escrows the deposit and
//! emits the intent relayers fill on the destination chain.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::info;

use crate::bridge::DepositParams;
use crate::spans;

/// The Across SpokePool contract wrapper
///
/// Builds `depositV3` transaction requests. Sending them is left to a
/// [`ChainSigner`](crate::traits::ChainSigner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpokePoolContract {
    address: Address,
}

impl SpokePoolContract {
    /// Create a new SpokePoolContract.
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Create the transaction request for the `depositV3` function.
    ///
    /// The request is sent from the depositor with an explicit gas limit.
    pub fn deposit_v3_transaction(
        &self,
        params: &DepositParams,
        gas_limit: u64,
    ) -> TransactionRequest {
        let span = spans::deposit_v3(
            &params.depositor(),
            &params.input_token(),
            &params.input_amount(),
            &params.output_amount(),
            params.destination_chain_id(),
        );
        let _guard = span.enter();

        info!(
            depositor = %params.depositor(),
            recipient = %params.recipient(),
            input_amount = %params.input_amount(),
            output_amount = %params.output_amount(),
            exclusive_relayer = %params.exclusive_relayer(),
            fill_deadline = params.fill_deadline(),
            gas_limit = gas_limit,
            contract_address = %self.address,
            event = "deposit_v3_transaction_created"
        );

        let calldata = SpokePool::depositV3Call {
            depositor: params.depositor(),
            recipient: params.recipient(),
            inputToken: params.input_token(),
            outputToken: params.output_token(),
            inputAmount: params.input_amount(),
            outputAmount: params.output_amount(),
            destinationChainId: U256::from(params.destination_chain_id()),
            exclusiveRelayer: params.exclusive_relayer(),
            quoteTimestamp: params.quote_timestamp(),
            fillDeadline: params.fill_deadline(),
            exclusivityDeadline: params.exclusivity_deadline(),
            message: params.message().clone(),
        }
        .abi_encode();

        TransactionRequest::default()
            .with_from(params.depositor())
            .with_to(self.address)
            .with_input(calldata)
            .with_gas_limit(gas_limit)
    }
}

sol! {
    #[allow(missing_docs)]
    interface SpokePool {
        function depositV3(
            address depositor,
            address recipient,
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 destinationChainId,
            address exclusiveRelayer,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes calldata message
        ) external payable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, TxKind};

    #[test]
    fn test_deposit_v3_transaction_encoding() {
        let spoke_pool = SpokePoolContract::new(address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5"));
        let user = address!("1111111111111111111111111111111111111111");
        let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

        let params = DepositParams::builder()
            .depositor(user)
            .recipient(user)
            .input_token(usdc)
            .output_token(Address::ZERO)
            .input_amount(U256::from(100_000_000u64))
            .output_amount(U256::from(95_000_000u64))
            .destination_chain_id(10)
            .exclusive_relayer(Address::ZERO)
            .quote_timestamp(1_718_000_000)
            .fill_deadline(1_718_018_000)
            .exclusivity_deadline(0)
            .build();

        let tx = spoke_pool.deposit_v3_transaction(&params, 500_000);

        assert_eq!(tx.from, Some(user));
        assert_eq!(tx.to, Some(TxKind::Call(spoke_pool.address())));
        assert_eq!(tx.gas, Some(500_000));

        let input = tx.input.input().expect("calldata set");
        let call = SpokePool::depositV3Call::abi_decode(input).unwrap();
        assert_eq!(call.depositor, user);
        assert_eq!(call.recipient, user);
        assert_eq!(call.inputToken, usdc);
        assert_eq!(call.outputToken, Address::ZERO);
        assert_eq!(call.outputAmount, U256::from(95_000_000u64));
        assert_eq!(call.destinationChainId, U256::from(10u64));
        assert_eq!(call.fillDeadline, 1_718_018_000);
        assert!(call.message.is_empty());
    }
}
