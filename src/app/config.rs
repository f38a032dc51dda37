// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::parsing::{parse_address, split_key_list};
use crate::domain::constants;
use crate::domain::error::AppError;
use crate::infrastructure::data::deployments::{read_deployed_address, read_deployed_addresses};
use crate::infrastructure::network::gas::GasPolicy;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,
    /// Expected chain; auto-detected from the RPC when unset.
    pub chain_id: Option<u64>,
    #[serde(default = "default_http_provider")]
    pub http_provider: String,

    // Identity
    /// Comma-separated signer keys. The first one deploys and owns the contract.
    pub wallet_keys: Option<String>,
    /// Single-key fallback, same variable the Hardhat config reads.
    pub private_key: Option<String>,

    // Contracts
    pub fun_round_address: Option<String>,
    pub usdt_address: Option<String>,
    #[serde(default = "default_deployed_address_path")]
    pub deployed_address_path: String,
    #[serde(default = "default_deployed_addresses_path")]
    pub deployed_addresses_path: String,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,

    // Transaction
    /// Legacy gas price; `0` switches to EIP-1559 estimation.
    #[serde(default = "default_gas_price_gwei")]
    pub gas_price_gwei: u64,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    #[serde(default = "default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,
    #[serde(default = "default_receipt_confirm_blocks")]
    pub receipt_confirm_blocks: u64,

    // HTTP API
    #[serde(default = "default_api_bind")]
    pub api_bind: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

/// How long and how often to wait for a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub poll: Duration,
    pub timeout: Duration,
    pub confirm_blocks: u64,
}

// Defaults
fn default_false() -> bool {
    false
}
fn default_http_provider() -> String {
    constants::DEFAULT_HTTP_PROVIDER.to_string()
}
fn default_deployed_address_path() -> String {
    constants::DEFAULT_DEPLOYED_ADDRESS_PATH.to_string()
}
fn default_deployed_addresses_path() -> String {
    constants::DEFAULT_DEPLOYED_ADDRESSES_PATH.to_string()
}
fn default_artifacts_dir() -> String {
    constants::DEFAULT_ARTIFACTS_DIR.to_string()
}
fn default_gas_price_gwei() -> u64 {
    constants::DEFAULT_GAS_PRICE_GWEI
}
fn default_gas_limit() -> u64 {
    constants::DEFAULT_GAS_LIMIT
}
fn default_receipt_poll_ms() -> u64 {
    constants::DEFAULT_RECEIPT_POLL_MS
}
fn default_receipt_timeout_ms() -> u64 {
    constants::DEFAULT_RECEIPT_TIMEOUT_MS
}
fn default_receipt_confirm_blocks() -> u64 {
    constants::DEFAULT_RECEIPT_CONFIRM_BLOCKS
}
fn default_api_bind() -> String {
    constants::DEFAULT_API_BIND.to_string()
}
fn default_api_port() -> u16 {
    constants::DEFAULT_API_PORT
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let selected_config = resolve_config_path(path);
        let mut builder = Config::builder();

        if let Some(ref selected_path) = selected_config {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Deterministic precedence: CLI (in main) > env/.env > selected profile file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        if let Some(path) = selected_config {
            tracing::debug!(target: "config", path = %path, "Loaded config file");
        }
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        Url::parse(self.http_provider.trim())
            .map_err(|e| AppError::Config(format!("Invalid HTTP_PROVIDER: {}", e)))?;
        if self.gas_limit == 0 {
            return Err(AppError::Config("GAS_LIMIT must be positive".into()));
        }
        if self.receipt_timeout_ms < self.receipt_poll_ms {
            return Err(AppError::Config(format!(
                "RECEIPT_TIMEOUT_MS ({}) is shorter than RECEIPT_POLL_MS ({})",
                self.receipt_timeout_ms, self.receipt_poll_ms
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Raw signer keys in configured order.
    pub fn signer_keys(&self) -> Vec<String> {
        let from_list = self
            .wallet_keys
            .as_deref()
            .map(split_key_list)
            .unwrap_or_default();
        if !from_list.is_empty() {
            return from_list;
        }
        self.private_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![s.to_string()])
            .unwrap_or_default()
    }

    pub fn signers(&self) -> Result<Vec<PrivateKeySigner>, AppError> {
        self.signer_keys()
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                PrivateKeySigner::from_str(key)
                    .map_err(|e| AppError::Config(format!("Invalid wallet key #{}: {}", idx, e)))
            })
            .collect()
    }

    /// Explicit setting first, then `deployed-address.txt`, then `deployed-addresses.json`.
    pub fn fun_round_address(&self) -> Result<Address, AppError> {
        if let Some(raw) = non_empty(self.fun_round_address.as_deref()) {
            return parse_address(raw);
        }
        match read_deployed_address(&self.deployed_address_path) {
            Ok(addr) => return Ok(addr),
            Err(e) => {
                tracing::debug!(target: "config", error = %e, "No deployed-address file");
            }
        }
        read_deployed_addresses(&self.deployed_addresses_path)
            .ok()
            .and_then(|d| d.fun_round)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "FunRound address unknown: set FUN_ROUND_ADDRESS or deploy first ({} not found)",
                    self.deployed_address_path
                ))
            })
    }

    pub fn usdt_address(&self) -> Result<Option<Address>, AppError> {
        if let Some(raw) = non_empty(self.usdt_address.as_deref()) {
            return parse_address(raw).map(Some);
        }
        Ok(read_deployed_addresses(&self.deployed_addresses_path)
            .ok()
            .and_then(|d| d.mock_usdt))
    }

    pub fn gas_policy(&self) -> GasPolicy {
        GasPolicy::from_gwei(self.gas_price_gwei)
    }

    pub fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            poll: Duration::from_millis(self.receipt_poll_ms.max(1)),
            timeout: Duration::from_millis(self.receipt_timeout_ms.max(1)),
            confirm_blocks: self.receipt_confirm_blocks.max(1),
        }
    }

    pub fn api_socket_addr(
        &self,
        bind_override: Option<&str>,
        port_override: Option<u16>,
    ) -> Result<SocketAddr, AppError> {
        let bind = bind_override.unwrap_or(&self.api_bind).trim();
        let port = port_override.unwrap_or(self.api_port);
        format!("{bind}:{port}")
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid API bind {bind}:{port}: {e}")))
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn resolve_config_path(path: Option<&str>) -> Option<String> {
    if let Some(path) = path {
        return Some(path.to_string());
    }
    detect_active_config_file()
}

fn detect_active_config_file() -> Option<String> {
    let priority_files = [
        "config.prod.toml",
        "config.testnet.toml",
        "config.dev.toml",
        "config.toml",
    ];

    for file in priority_files.iter() {
        if let Some(true) = config_has_active_flag(file) {
            return Some((*file).to_string());
        }
    }

    // Fallback: scan current dir for config.*.toml with THIS_ACTIVE = true
    if let Ok(entries) = fs::read_dir(".") {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && name.starts_with("config.")
                && name.ends_with(".toml")
                && let Some(true) = config_has_active_flag(name)
            {
                return Some(name.to_string());
            }
        }
    }

    None
}

fn config_has_active_flag(path: &str) -> Option<bool> {
    let p = Path::new(path);
    if !p.exists() {
        return None;
    }

    Config::builder()
        .add_source(File::from(p))
        .build()
        .ok()?
        .get_bool("THIS_ACTIVE")
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::data::deployments::{
        DeployedAddresses, write_deployed_address, write_deployed_addresses,
    };
    use std::sync::{Mutex, OnceLock};

    fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn base_settings() -> GlobalSettings {
        GlobalSettings {
            debug: default_false(),
            log_json: default_false(),
            chain_id: None,
            http_provider: default_http_provider(),
            wallet_keys: None,
            private_key: None,
            fun_round_address: None,
            usdt_address: None,
            deployed_address_path: "/nonexistent/deployed-address.txt".to_string(),
            deployed_addresses_path: "/nonexistent/deployed-addresses.json".to_string(),
            artifacts_dir: default_artifacts_dir(),
            gas_price_gwei: default_gas_price_gwei(),
            gas_limit: default_gas_limit(),
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_timeout_ms: default_receipt_timeout_ms(),
            receipt_confirm_blocks: default_receipt_confirm_blocks(),
            api_bind: default_api_bind(),
            api_port: default_api_port(),
        }
    }

    // Well-known Hardhat development accounts #0 and #1.
    const DEV_KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn defaults_follow_hardhat_network() {
        let settings = base_settings();
        assert_eq!(settings.http_provider, "https://rpc.testnet.fantom.network");
        assert_eq!(
            settings.gas_policy(),
            GasPolicy::Legacy {
                gas_price: 3_000_000_000
            }
        );
        assert_eq!(settings.gas_limit, 8_000_000);
        assert_eq!(settings.receipt_policy().timeout, Duration::from_secs(60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = base_settings();
        settings.http_provider = "nope".into();
        assert!(settings.validate().is_err());

        let mut settings = base_settings();
        settings.gas_limit = 0;
        assert!(settings.validate().is_err());

        let mut settings = base_settings();
        settings.receipt_timeout_ms = 10;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn wallet_keys_take_precedence_over_private_key() {
        let mut settings = base_settings();
        settings.private_key = Some(DEV_KEY_0.to_string());
        assert_eq!(settings.signer_keys(), vec![DEV_KEY_0.to_string()]);

        settings.wallet_keys = Some(format!("{DEV_KEY_1}, {DEV_KEY_0}"));
        let signers = settings.signers().unwrap();
        assert_eq!(signers.len(), 2);
        assert_eq!(
            signers[0].address().to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
        assert_eq!(
            signers[1].address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn invalid_wallet_key_is_config_error() {
        let mut settings = base_settings();
        settings.wallet_keys = Some("0x1234".into());
        match settings.signers() {
            Err(AppError::Config(msg)) => assert!(msg.contains("#0")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn contract_address_falls_back_to_deployment_files() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("deployed-address.txt");
        let json = dir.path().join("deployed-addresses.json");
        let mut settings = base_settings();
        settings.deployed_address_path = txt.to_string_lossy().to_string();
        settings.deployed_addresses_path = json.to_string_lossy().to_string();

        assert!(settings.fun_round_address().is_err());
        assert_eq!(settings.usdt_address().unwrap(), None);

        let from_json = Address::from([0x44u8; 20]);
        let usdt = Address::from([0x55u8; 20]);
        write_deployed_addresses(
            &json,
            &DeployedAddresses {
                fun_round: Some(from_json),
                mock_usdt: Some(usdt),
            },
        )
        .unwrap();
        assert_eq!(settings.fun_round_address().unwrap(), from_json);
        assert_eq!(settings.usdt_address().unwrap(), Some(usdt));

        let from_txt = Address::from([0x66u8; 20]);
        write_deployed_address(&txt, from_txt).unwrap();
        assert_eq!(settings.fun_round_address().unwrap(), from_txt);

        let explicit = Address::from([0x77u8; 20]);
        settings.fun_round_address = Some(explicit.to_string());
        assert_eq!(settings.fun_round_address().unwrap(), explicit);
    }

    #[test]
    fn api_addr_honors_overrides() {
        let settings = base_settings();
        assert_eq!(
            settings.api_socket_addr(None, None).unwrap().to_string(),
            "0.0.0.0:3000"
        );
        assert_eq!(
            settings
                .api_socket_addr(Some("127.0.0.1"), Some(8080))
                .unwrap()
                .to_string(),
            "127.0.0.1:8080"
        );
        assert!(settings.api_socket_addr(Some("not-an-ip"), None).is_err());
    }

    #[test]
    fn load_reads_env_overrides() {
        let _env_lock = env_lock_guard();
        let old_port = std::env::var("API_PORT").ok();
        let old_gas = std::env::var("GAS_PRICE_GWEI").ok();
        unsafe {
            std::env::set_var("API_PORT", "4100");
            std::env::set_var("GAS_PRICE_GWEI", "0");
        }

        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("config.test.toml");
        fs::write(&cfg, "http_provider = \"http://127.0.0.1:8545\"\napi_port = 3001\n").unwrap();
        let settings = GlobalSettings::load_with_path(cfg.to_str()).unwrap();

        assert_eq!(settings.http_provider, "http://127.0.0.1:8545");
        assert_eq!(settings.api_port, 4100);
        assert_eq!(settings.gas_policy(), GasPolicy::Eip1559);

        unsafe {
            match old_port {
                Some(v) => std::env::set_var("API_PORT", v),
                None => std::env::remove_var("API_PORT"),
            }
            match old_gas {
                Some(v) => std::env::set_var("GAS_PRICE_GWEI", v),
                None => std::env::remove_var("GAS_PRICE_GWEI"),
            }
        }
    }
}
