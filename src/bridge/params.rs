use alloy_primitives::{Address, Bytes, U256};
use bon::Builder;

/// Arguments of a SpokePool `depositV3` call
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    depositor: Address,
    recipient: Address,
    input_token: Address,
    output_token: Address,
    input_amount: U256,
    output_amount: U256,
    destination_chain_id: u64,
    exclusive_relayer: Address,
    quote_timestamp: u32,
    fill_deadline: u32,
    exclusivity_deadline: u32,
    #[builder(default)]
    message: Bytes,
}

impl DepositParams {
    pub fn depositor(&self) -> Address {
        self.depositor
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn input_token(&self) -> Address {
        self.input_token
    }

    pub fn output_token(&self) -> Address {
        self.output_token
    }

    pub fn input_amount(&self) -> U256 {
        self.input_amount
    }

    pub fn output_amount(&self) -> U256 {
        self.output_amount
    }

    pub fn destination_chain_id(&self) -> u64 {
        self.destination_chain_id
    }

    pub fn exclusive_relayer(&self) -> Address {
        self.exclusive_relayer
    }

    pub fn quote_timestamp(&self) -> u32 {
        self.quote_timestamp
    }

    pub fn fill_deadline(&self) -> u32 {
        self.fill_deadline
    }

    pub fn exclusivity_deadline(&self) -> u32 {
        self.exclusivity_deadline
    }

    pub fn message(&self) -> &Bytes {
        &self.message
    }

    /// Relay fee implied by the input and output amounts.
    pub fn relay_fee(&self) -> U256 {
        self.input_amount.saturating_sub(self.output_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_params_builder() {
        let params = DepositParams::builder()
            .depositor(Address::ZERO)
            .recipient(Address::ZERO)
            .input_token(Address::ZERO)
            .output_token(Address::ZERO)
            .input_amount(U256::from(100_000_000u64))
            .output_amount(U256::from(95_000_000u64))
            .destination_chain_id(10)
            .exclusive_relayer(Address::ZERO)
            .quote_timestamp(1_718_000_000)
            .fill_deadline(1_718_018_000)
            .exclusivity_deadline(0)
            .build();

        assert_eq!(params.destination_chain_id(), 10);
        assert_eq!(params.relay_fee(), U256::from(5_000_000u64));
        assert!(params.message().is_empty());
    }
}
