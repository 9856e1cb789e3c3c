// src/amount.rs
//! Conversions between user-facing decimal strings and fixed-point token amounts

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;

use crate::error::{Result, VaultError};

/// Parse a decimal string such as `"1.5"` into base units of a token with `decimals`
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(VaultError::invalid_amount(input, "amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(VaultError::invalid_amount(input, "amount is negative"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (trimmed, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return Err(VaultError::invalid_amount(input, "amount is not a decimal number"));
    }
    if fraction.map_or(0, str::len) > decimals as usize {
        return Err(VaultError::invalid_amount(
            input,
            format!("more than {} decimal places", decimals),
        ));
    }

    match parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(VaultError::invalid_amount(input, "amount is negative")),
        Err(e) => Err(VaultError::invalid_amount(input, e.to_string())),
    }
}

/// Format base units as a decimal string, trimming trailing zeros (`150000000`, 8 → `"1.5"`)
pub fn format_amount(value: U256, decimals: u8) -> String {
    let formatted = match format_units(value, decimals) {
        Ok(formatted) => formatted,
        Err(_) => return value.to_string(),
    };

    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Lossy conversion of a fixed-point amount to a float for display and ratios
pub fn to_f64(value: U256, decimals: u8) -> f64 {
    format_units(value, decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
