//! Property-based tests for token amount formatting.
//! Tests cover shape, exactness and trailing-zero trimming of the decimal
//! rendering of raw token units.

use alloy::primitives::U256;

use proptest::{prelude::*, test_runner::Config};
use transfer_monitor::utils::format_token_units;

const DECIMALS: u8 = 18;

fn scale() -> U256 {
	U256::from(10u8).pow(U256::from(DECIMALS))
}

proptest! {
	#![proptest_config(Config {
		cases: 256,
		..Config::default()
	})]

	// Output is always "<integer>.<fraction>" with at least one digit on
	// each side and no sign, exponent or other notation.
	#[test]
	fn prop_output_shape(raw in any::<u128>()) {
		let formatted = format_token_units(U256::from(raw), DECIMALS);

		let (integer, fraction) = formatted.split_once('.').unwrap();
		prop_assert!(!integer.is_empty());
		prop_assert!(!fraction.is_empty());
		prop_assert!(integer.chars().all(|c| c.is_ascii_digit()));
		prop_assert!(fraction.chars().all(|c| c.is_ascii_digit()));
		prop_assert!(fraction.len() <= DECIMALS as usize);
	}

	// Formatting is exact: the rendered digits reconstruct the raw value.
	#[test]
	fn prop_formatting_is_lossless(raw in any::<u128>()) {
		let formatted = format_token_units(U256::from(raw), DECIMALS);
		let (integer, fraction) = formatted.split_once('.').unwrap();

		let integer: U256 = integer.parse().unwrap();
		let fraction_value: U256 = fraction.parse().unwrap();
		let rescale = U256::from(10u8).pow(U256::from(DECIMALS as usize - fraction.len()));

		let reconstructed = integer * scale() + fraction_value * rescale;
		prop_assert_eq!(reconstructed, U256::from(raw));
	}

	// Trailing zeros are trimmed down to a single mandatory fractional digit.
	#[test]
	fn prop_no_redundant_trailing_zeros(raw in any::<u128>()) {
		let formatted = format_token_units(U256::from(raw), DECIMALS);
		let (_, fraction) = formatted.split_once('.').unwrap();

		if fraction.len() > 1 {
			prop_assert!(!fraction.ends_with('0'));
		}
	}

	// Whole token amounts render as "<n>.0".
	#[test]
	fn prop_whole_amounts_have_zero_fraction(tokens in 0u64..1_000_000) {
		let raw = U256::from(tokens) * scale();
		let formatted = format_token_units(raw, DECIMALS);
		prop_assert_eq!(formatted, format!("{}.0", tokens));
	}
}
