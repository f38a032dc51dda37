// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use alloy::primitives::U256;
use alloy_json_abi::JsonAbi;
use alloy_sol_types::{Panic, Revert, SolError};

fn panic_description(code: U256) -> &'static str {
    match code.to::<u64>() {
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "invalid storage byte array",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to uninitialized function",
        _ => "unknown panic",
    }
}

/// Human readable reason for raw revert data.
///
/// Handles `Error(string)`, `Panic(uint256)` and custom errors declared in
/// `abi`; anything else is returned as hex.
pub fn decode_revert(data: &[u8], abi: Option<&JsonAbi>) -> String {
    if data.is_empty() {
        return "reverted without reason".to_string();
    }
    if data.starts_with(&Revert::SELECTOR)
        && let Ok(revert) = Revert::abi_decode(data)
    {
        return revert.reason;
    }
    if data.starts_with(&Panic::SELECTOR)
        && let Ok(panic) = Panic::abi_decode(data)
    {
        if panic.code > U256::from(u64::MAX) {
            return format!("Panic({:#x})", panic.code);
        }
        return format!("Panic({:#x}): {}", panic.code, panic_description(panic.code));
    }
    if data.len() >= 4
        && let Some(abi) = abi
        && let Some(error) = abi.errors().find(|e| e.selector().as_slice() == &data[..4])
    {
        let args = &data[4..];
        if args.is_empty() {
            return format!("{}()", error.name);
        }
        return format!("{}(0x{})", error.name, hex::encode(args));
    }
    format!("0x{}", hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_require_messages() {
        let data = Revert {
            reason: "Only players can submit result".to_string(),
        }
        .abi_encode();
        assert_eq!(decode_revert(&data, None), "Only players can submit result");
    }

    #[test]
    fn decodes_panics() {
        let data = Panic { code: U256::from(0x11u64) }.abi_encode();
        assert_eq!(
            decode_revert(&data, None),
            "Panic(0x11): arithmetic overflow or underflow"
        );
    }

    #[test]
    fn decodes_custom_errors_from_abi() {
        let abi: JsonAbi = serde_json::from_str(
            r#"[{"type": "error", "name": "NotPlayer", "inputs": []}]"#,
        )
        .unwrap();
        let selector = abi.errors().next().unwrap().selector();
        assert_eq!(decode_revert(selector.as_slice(), Some(&abi)), "NotPlayer()");
        assert_eq!(
            decode_revert(selector.as_slice(), None),
            format!("0x{}", hex::encode(selector))
        );
    }

    #[test]
    fn empty_data_has_generic_reason() {
        assert_eq!(decode_revert(&[], None), "reverted without reason");
    }
}
