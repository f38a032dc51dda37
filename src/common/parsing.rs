// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::domain::error::AppError;
use alloy::primitives::{Address, Bytes};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(s.trim())).ok()
}

/// Accepts lower, upper or EIP-55 mixed case; rejects mixed case with a bad checksum.
pub fn parse_address(raw: &str) -> Result<Address, AppError> {
    let trimmed = raw.trim();
    let body = strip_0x(trimmed);
    if body.len() != 40 {
        return Err(AppError::InvalidAddress(trimmed.to_string()));
    }
    let is_mixed = body.chars().any(|c| c.is_ascii_uppercase())
        && body.chars().any(|c| c.is_ascii_lowercase());
    let with_prefix = format!("0x{body}");
    if is_mixed {
        return Address::parse_checksummed(&with_prefix, None)
            .map_err(|_| AppError::InvalidAddress(trimmed.to_string()));
    }
    Address::from_str(&with_prefix).map_err(|_| AppError::InvalidAddress(trimmed.to_string()))
}

pub fn parse_bytecode(raw: &str) -> Result<Bytes, AppError> {
    let bytes = parse_hex_bytes(raw)
        .ok_or_else(|| AppError::validation("bytecode", "not valid hex"))?;
    if bytes.is_empty() {
        return Err(AppError::validation(
            "bytecode",
            "empty bytecode (abstract contract or interface?)",
        ));
    }
    Ok(Bytes::from(bytes))
}

/// Splits a comma/whitespace separated key list, dropping blanks and surrounding quotes.
pub fn split_key_list(raw: &str) -> Vec<String> {
    raw.trim_matches(|c| c == '`' || c == '"' || c == '\'')
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
