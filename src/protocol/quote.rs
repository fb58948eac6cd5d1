use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer};

/// Parameters of a suggested-fees request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub token: Address,
    pub amount: U256,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
}

impl QuoteRequest {
    /// Query parameters in the order the API documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("token", self.token.to_string()),
            ("originChainId", self.origin_chain_id.to_string()),
            ("destinationChainId", self.destination_chain_id.to_string()),
            ("amount", self.amount.to_string()),
        ]
    }
}

/// Fee quote returned by Across's suggested-fees API
///
/// Only the fields needed to build a `depositV3` call are kept. A quote is
/// fetched fresh for every deposit attempt and never cached.
///
/// # Example Response
///
/// ```json
/// {
///   "totalRelayFee": { "pct": "50000000000000000", "total": "5000000" },
///   "exclusiveRelayer": "0x0000000000000000000000000000000000000000",
///   "timestamp": "1718000000",
///   "exclusivityDeadline": 0
/// }
/// ```
///
/// **API Quirk**: `timestamp` and `exclusivityDeadline` are sent either as JSON
/// numbers or as numeric strings depending on the API version; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Total fee deducted from the input amount, in token base units
    #[serde(deserialize_with = "deserialize_relay_fee_total")]
    pub total_relay_fee: U256,
    /// Relayer with exclusive fill rights until `exclusivity_deadline`
    pub exclusive_relayer: Address,
    /// Quote timestamp the fee was computed against
    #[serde(deserialize_with = "deserialize_u32_number_or_string")]
    pub timestamp: u32,
    #[serde(deserialize_with = "deserialize_u32_number_or_string")]
    pub exclusivity_deadline: u32,
}

#[derive(Deserialize)]
struct RelayFee {
    total: String,
}

/// Reads `totalRelayFee.total`, a decimal string of base units.
fn deserialize_relay_fee_total<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let fee = RelayFee::deserialize(deserializer)?;
    fee.total
        .parse::<U256>()
        .map_err(|e| serde::de::Error::custom(format!("invalid totalRelayFee.total: {e}")))
}

fn deserialize_u32_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse::<u32>().map_err(serde::de::Error::custom),
    }
}
