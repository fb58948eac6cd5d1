//! Conversion between user-entered decimal amounts and token base units.
//!
//! Amounts are handled as [`U256`] base units end to end. Parsing never goes
//! through floating point, so `100.000001` USDC is exactly `100000001`.

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::error::{BridgeError, Result};

/// Parses a decimal string such as `"100"` or `"0.25"` into base units.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidAmount`] if the input is empty, negative,
/// not a plain decimal number, or has more fractional digits than `decimals`.
///
/// # Example
///
/// ```rust
/// use across_bridge::parse_token_amount;
/// use alloy_primitives::U256;
///
/// assert_eq!(parse_token_amount("100", 6).unwrap(), U256::from(100_000_000u64));
/// assert_eq!(parse_token_amount("0.5", 6).unwrap(), U256::from(500_000u64));
/// ```
pub fn parse_token_amount(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();
    let invalid = |reason: &str| BridgeError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("expected a non-negative decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid(&format!(
            "at most {decimals} fractional digits are allowed"
        )));
    }

    parse_units(trimmed, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| invalid(&e.to_string()))
}

/// Formats base units as a decimal string with `decimals` fractional digits.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
