// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::common::parsing::parse_address;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Shape of `deployed-addresses.json`, shared with the browser client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedAddresses {
    #[serde(rename = "funRound", default, skip_serializing_if = "Option::is_none")]
    pub fun_round: Option<Address>,
    #[serde(rename = "mockUSDT", default, skip_serializing_if = "Option::is_none")]
    pub mock_usdt: Option<Address>,
}

pub fn read_deployed_address(path: impl AsRef<Path>) -> Result<Address, AppError> {
    let path = path.as_ref();
    let body = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    parse_address(body.trim())
}

pub fn write_deployed_address(path: impl AsRef<Path>, address: Address) -> Result<(), AppError> {
    let path = path.as_ref();
    fs::write(path, format!("{address}\n")).map_err(|e| AppError::io(path, e))
}

pub fn read_deployed_addresses(path: impl AsRef<Path>) -> Result<DeployedAddresses, AppError> {
    let path = path.as_ref();
    let body = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&body).map_err(|e| {
        AppError::Config(format!("Invalid deployments file {}: {}", path.display(), e))
    })
}

/// Merges into an existing file so a FunRound redeploy keeps the token entry.
pub fn write_deployed_addresses(
    path: impl AsRef<Path>,
    update: &DeployedAddresses,
) -> Result<DeployedAddresses, AppError> {
    let path = path.as_ref();
    let mut merged = if path.exists() {
        read_deployed_addresses(path).unwrap_or_else(|e| {
            tracing::warn!(target: "deploy", error = %e, "Overwriting unreadable deployments file");
            DeployedAddresses::default()
        })
    } else {
        DeployedAddresses::default()
    };
    if update.fun_round.is_some() {
        merged.fun_round = update.fun_round;
    }
    if update.mock_usdt.is_some() {
        merged.mock_usdt = update.mock_usdt;
    }
    let body = serde_json::to_string_pretty(&merged)?;
    fs::write(path, body).map_err(|e| AppError::io(path, e))?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployed-address.txt");
        fs::write(&path, "  0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed \n").unwrap();
        let addr = read_deployed_address(&path).unwrap();
        assert_eq!(
            addr.to_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );

        write_deployed_address(&path, Address::from([0x11u8; 20])).unwrap();
        assert_eq!(read_deployed_address(&path).unwrap(), Address::from([0x11u8; 20]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_deployed_address("/nonexistent/deployed-address.txt").unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }

    #[test]
    fn json_uses_frontend_keys_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployed-addresses.json");
        let usdt = Address::from([0x22u8; 20]);
        let game = Address::from([0x33u8; 20]);

        write_deployed_addresses(
            &path,
            &DeployedAddresses {
                fun_round: None,
                mock_usdt: Some(usdt),
            },
        )
        .unwrap();
        let merged = write_deployed_addresses(
            &path,
            &DeployedAddresses {
                fun_round: Some(game),
                mock_usdt: None,
            },
        )
        .unwrap();
        assert_eq!(merged.mock_usdt, Some(usdt));
        assert_eq!(merged.fun_round, Some(game));

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"funRound\""));
        assert!(body.contains("\"mockUSDT\""));
        assert_eq!(read_deployed_addresses(&path).unwrap(), merged);
    }
}
