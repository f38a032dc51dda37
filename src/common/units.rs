// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::constants::{NATIVE_DECIMALS, USDT_DECIMALS};
use crate::domain::error::AppError;
use alloy::primitives::U256;
use alloy::primitives::utils::{
    ParseUnits, format_units as alloy_format_units, parse_units as alloy_parse_units,
};

/// Decimal string to base units. Negative amounts are rejected.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AppError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("amount", "empty amount"));
    }
    if let Some((_, frac)) = trimmed.split_once('.')
        && frac.len() > decimals as usize
    {
        return Err(AppError::validation(
            "amount",
            format!("'{trimmed}' has more than {decimals} fractional digits"),
        ));
    }
    match alloy_parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(v)) => Ok(v),
        Ok(ParseUnits::I256(v)) if !v.is_negative() => Ok(v.into_raw()),
        Ok(ParseUnits::I256(_)) => Err(AppError::validation("amount", "amount must not be negative")),
        Err(e) => Err(AppError::validation("amount", format!("'{trimmed}': {e}"))),
    }
}

/// Base units to a trimmed decimal string ("0.02", "1.0").
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = alloy_format_units(value, decimals).unwrap_or_else(|_| value.to_string());
    trim_fraction(&raw)
}

pub fn parse_ether(amount: &str) -> Result<U256, AppError> {
    parse_units(amount, NATIVE_DECIMALS)
}

pub fn format_ether(value: U256) -> String {
    format_units(value, NATIVE_DECIMALS)
}

pub fn parse_usdt(amount: &str) -> Result<U256, AppError> {
    parse_units(amount, USDT_DECIMALS)
}

pub fn format_usdt(value: U256) -> String {
    format_units(value, USDT_DECIMALS)
}

pub fn gwei_to_wei(gwei: u64) -> u128 {
    u128::from(gwei) * 1_000_000_000
}

fn trim_fraction(raw: &str) -> String {
    let Some((whole, frac)) = raw.split_once('.') else {
        return format!("{raw}.0");
    };
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_deposit_parses_to_wei() {
        assert_eq!(
            parse_ether("0.02").unwrap(),
            U256::from(20_000_000_000_000_000u64)
        );
        assert_eq!(parse_usdt("100").unwrap(), U256::from(100_000_000u64));
    }

    #[test]
    fn rejects_bad_amounts() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("abc").is_err());
        // More fractional digits than the token supports.
        assert!(parse_usdt("0.0000001").is_err());
    }

    #[test]
    fn formats_like_ethers() {
        assert_eq!(format_ether(U256::from(20_000_000_000_000_000u64)), "0.02");
        assert_eq!(format_ether(U256::from(10u64).pow(U256::from(18u64))), "1.0");
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_usdt(U256::from(90_000_000u64)), "90.0");
        assert_eq!(format_usdt(U256::from(1_500_000u64)), "1.5");
    }

    #[test]
    fn gwei_scales() {
        assert_eq!(gwei_to_wei(3), 3_000_000_000);
    }
}
