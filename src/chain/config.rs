use alloy_chains::NamedChain;
use alloy_primitives::Address;

use super::addresses::{
    ETHEREUM_SPOKE_POOL_ADDRESS, ETHEREUM_USDC_ADDRESS, OPTIMISM_SPOKE_POOL_ADDRESS,
};
use crate::{BridgeError, Result};

/// An ERC-20 token the bridge can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub address: Address,
    pub decimals: u8,
}

/// USD Coin on Ethereum mainnet.
pub const USDC: Token = Token {
    symbol: "USDC",
    name: "USD Coin",
    address: ETHEREUM_USDC_ADDRESS,
    decimals: 6,
};

impl Token {
    /// Tokens offered for bridging.
    pub const SUPPORTED: &'static [Token] = &[USDC];

    /// Looks up a supported token by its symbol.
    pub fn by_symbol(symbol: &str) -> Result<Token> {
        Self::SUPPORTED
            .iter()
            .find(|token| token.symbol == symbol)
            .copied()
            .ok_or_else(|| BridgeError::UnsupportedToken {
                symbol: symbol.to_string(),
            })
    }
}

/// Across configuration for a chain
///
/// Implemented on `alloy_chains::NamedChain`.
pub trait AcrossChain {
    /// The address of the Across `SpokePool` deployment on the chain
    fn spoke_pool_address(&self) -> Result<Address>;
}

impl AcrossChain for NamedChain {
    fn spoke_pool_address(&self) -> Result<Address> {
        use NamedChain::*;

        match self {
            Mainnet => Ok(ETHEREUM_SPOKE_POOL_ADDRESS),
            Optimism => Ok(OPTIMISM_SPOKE_POOL_ADDRESS),
            _ => Err(BridgeError::InvalidConfig(format!(
                "no Across SpokePool known for {self}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{DESTINATION_CHAIN_ID, ORIGIN_CHAIN_ID};

    #[test]
    fn test_route_chain_ids_match_named_chains() {
        assert_eq!(u64::from(NamedChain::Mainnet), ORIGIN_CHAIN_ID);
        assert_eq!(u64::from(NamedChain::Optimism), DESTINATION_CHAIN_ID);
    }

    #[test]
    fn test_mainnet_spoke_pool() {
        assert_eq!(
            NamedChain::Mainnet.spoke_pool_address().unwrap(),
            ETHEREUM_SPOKE_POOL_ADDRESS
        );
    }

    #[test]
    fn test_unknown_spoke_pool() {
        let result = NamedChain::BinanceSmartChain.spoke_pool_address();
        assert!(matches!(result, Err(BridgeError::InvalidConfig(_))));
    }

    #[test]
    fn test_token_lookup() {
        let usdc = Token::by_symbol("USDC").unwrap();
        assert_eq!(usdc.decimals, 6);
        assert_eq!(usdc.address, ETHEREUM_USDC_ADDRESS);

        assert_eq!(
            Token::by_symbol("DAI").unwrap_err(),
            BridgeError::UnsupportedToken {
                symbol: "DAI".to_string()
            }
        );
    }
}
