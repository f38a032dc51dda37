// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::parsing::parse_bytecode;
use alloy::primitives::Bytes;
use alloy_json_abi::JsonAbi;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled contract as emitted by `hardhat compile`.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: Option<String>,
    abi: JsonAbi,
    #[serde(default)]
    bytecode: String,
}

impl ContractArtifact {
    pub fn from_json(name: &str, body: &str) -> Result<Self, AppError> {
        let raw: HardhatArtifact = serde_json::from_str(body).map_err(|e| {
            AppError::Config(format!("Failed to parse artifact {}: {}", name, e))
        })?;
        let bytecode = parse_bytecode(&raw.bytecode).map_err(|e| {
            AppError::Config(format!("Artifact {} has unusable bytecode: {}", name, e))
        })?;
        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| name.to_string()),
            abi: raw.abi,
            bytecode,
        })
    }

    pub fn constructor_arity(&self) -> usize {
        self.abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.len())
            .unwrap_or(0)
    }

    /// Creation code: bytecode followed by ABI-encoded constructor arguments.
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        Bytes::from(code)
    }
}

/// Looks up Hardhat artifacts under `artifacts/contracts/<Source>.sol/<Name>.json`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, name: &str) -> Result<ContractArtifact, AppError> {
        if !self.root.exists() {
            return Err(AppError::Config(format!(
                "Artifact directory not found: {} (run `npx hardhat compile`)",
                self.root.display()
            )));
        }

        let conventional = self.root.join(format!("{name}.sol")).join(format!("{name}.json"));
        let path = if conventional.exists() {
            conventional
        } else {
            find_artifact(&self.root, name)?.ok_or_else(|| {
                AppError::Config(format!(
                    "No artifact named {} under {}",
                    name,
                    self.root.display()
                ))
            })?
        };

        let body = fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        let artifact = ContractArtifact::from_json(name, &body)?;
        tracing::info!(
            target: "artifacts",
            contract = %artifact.name,
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            "Loaded artifact"
        );
        Ok(artifact)
    }

    /// ABI only; used for revert decoding where a missing artifact is not fatal.
    pub fn try_abi(&self, name: &str) -> Option<JsonAbi> {
        match self.load(name) {
            Ok(artifact) => Some(artifact.abi),
            Err(e) => {
                tracing::debug!(target: "artifacts", contract = name, error = %e, "ABI unavailable");
                None
            }
        }
    }
}

fn find_artifact(dir: &Path, name: &str) -> Result<Option<PathBuf>, AppError> {
    let wanted = format!("{name}.json");
    for entry in fs::read_dir(dir).map_err(|e| AppError::io(dir, e))? {
        let entry = entry.map_err(|e| AppError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_artifact(&path, name)? {
                return Ok(Some(found));
            }
        } else if path.file_name().and_then(|n| n.to_str()) == Some(wanted.as_str()) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUN_ROUND_ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "FunRound",
        "sourceName": "contracts/FunRound.sol",
        "abi": [
            {"type": "constructor", "stateMutability": "nonpayable",
             "inputs": [{"name": "_usdt", "type": "address", "internalType": "address"}]},
            {"type": "function", "name": "owner", "stateMutability": "view", "inputs": [],
             "outputs": [{"name": "", "type": "address", "internalType": "address"}]},
            {"type": "error", "name": "NotPlayer", "inputs": []}
        ],
        "bytecode": "0x6080604052",
        "deployedBytecode": "0x6080"
    }"#;

    #[test]
    fn parses_hardhat_layout() {
        let artifact = ContractArtifact::from_json("FunRound", FUN_ROUND_ARTIFACT).unwrap();
        assert_eq!(artifact.name, "FunRound");
        assert_eq!(artifact.constructor_arity(), 1);
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact.abi.errors().count(), 1);
    }

    #[test]
    fn init_code_appends_constructor_args() {
        let artifact = ContractArtifact::from_json("FunRound", FUN_ROUND_ARTIFACT).unwrap();
        let code = artifact.init_code(&[0u8; 32]);
        assert_eq!(code.len(), 5 + 32);
        assert_eq!(&code[..5], artifact.bytecode.as_ref());
    }

    #[test]
    fn rejects_interface_artifacts() {
        let body = r#"{"contractName": "IFunRound", "abi": [], "bytecode": "0x"}"#;
        assert!(ContractArtifact::from_json("IFunRound", body).is_err());
    }

    #[test]
    fn store_finds_nested_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("game").join("FunRound.sol");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("FunRound.json"), FUN_ROUND_ARTIFACT).unwrap();

        let store = ArtifactStore::new(dir.path());
        let artifact = store.load("FunRound").unwrap();
        assert_eq!(artifact.constructor_arity(), 1);
        assert!(store.load("MockUSDT").is_err());
        assert!(store.try_abi("MockUSDT").is_none());
    }
}
