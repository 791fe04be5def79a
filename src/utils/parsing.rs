//! Parsing utilities.
//!
//! Conversions between on-chain representations (hex quantities, smallest-unit
//! token amounts) and the human-readable forms used in notifications.

use alloy::primitives::U256;

/// Formats a smallest-unit token amount as a decimal string.
///
/// The conversion is exact integer arithmetic on `U256`; no floating point is
/// involved, so amounts up to the full 256-bit range keep every digit.
/// Trailing zeros in the fractional part are trimmed but at least one
/// fractional digit is kept, matching common ledger tooling output
/// (`1000000000000000000` at 18 decimals renders as `"1.0"`).
///
/// # Arguments
/// * `value` - Amount in the token's smallest unit
/// * `decimals` - The token's fixed decimal precision
///
/// # Returns
/// * `String` - Decimal representation, e.g. `"1.5"` or `"0.000021"`
pub fn format_token_units(value: U256, decimals: u8) -> String {
	if decimals == 0 {
		return value.to_string();
	}

	let scale = U256::from(10u8).pow(U256::from(decimals));
	let integer = value / scale;
	let fraction = value % scale;

	let mut fraction_str = format!(
		"{:0>width$}",
		fraction.to_string(),
		width = decimals as usize
	);
	while fraction_str.len() > 1 && fraction_str.ends_with('0') {
		fraction_str.pop();
	}

	format!("{}.{}", integer, fraction_str)
}

/// Parses a JSON-RPC hex quantity (e.g. `"0x10d4f"`) into a `u64`.
pub fn parse_hex_u64(value: &str) -> Result<u64, String> {
	let stripped = value
		.strip_prefix("0x")
		.ok_or_else(|| format!("Missing 0x prefix in hex quantity: {}", value))?;

	u64::from_str_radix(stripped, 16)
		.map_err(|e| format!("Invalid hex quantity {}: {}", value, e))
}
