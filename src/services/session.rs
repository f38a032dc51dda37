// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::app::config::GlobalSettings;
use crate::common::error::AppError;
use crate::data::artifacts::ArtifactStore;
use crate::domain::constants::FUN_ROUND_CONTRACT;
use crate::network::gas::GasOracle;
use crate::network::provider::{ConnectionFactory, HttpProvider};
use crate::services::game::FunRoundClient;
use crate::services::token::MockUsdtClient;
use crate::services::tx::TxSender;
use alloy::primitives::Address;
use std::sync::Arc;

/// Node connection plus one sender per configured signer.
pub struct Session {
    pub settings: GlobalSettings,
    pub provider: HttpProvider,
    pub chain_id: u64,
    pub artifacts: ArtifactStore,
    senders: Vec<Arc<TxSender>>,
}

impl Session {
    pub async fn open(settings: GlobalSettings) -> Result<Self, AppError> {
        let (provider, chain_id) =
            ConnectionFactory::connect(&settings.http_provider, settings.chain_id).await?;
        let artifacts = ArtifactStore::new(&settings.artifacts_dir);
        // Custom errors from the compiled contract, when artifacts are around.
        let revert_abi = artifacts.try_abi(FUN_ROUND_CONTRACT).map(Arc::new);

        let gas = GasOracle::new(provider.clone(), settings.gas_policy());
        let receipt = settings.receipt_policy();
        let senders = settings
            .signers()?
            .into_iter()
            .map(|signer| {
                Arc::new(
                    TxSender::new(
                        provider.clone(),
                        signer,
                        chain_id,
                        gas.clone(),
                        settings.gas_limit,
                        receipt,
                    )
                    .with_revert_abi(revert_abi.clone()),
                )
            })
            .collect::<Vec<_>>();

        tracing::info!(
            target: "config",
            chain_id,
            signers = senders.len(),
            gas_policy = ?settings.gas_policy(),
            "Session ready"
        );
        Ok(Self {
            settings,
            provider,
            chain_id,
            artifacts,
            senders,
        })
    }

    pub fn signer_count(&self) -> usize {
        self.senders.len()
    }

    pub fn sender(&self, index: usize) -> Result<Arc<TxSender>, AppError> {
        self.senders.get(index).cloned().ok_or_else(|| {
            AppError::Config(format!(
                "Signer #{} requested but only {} configured in WALLET_KEYS",
                index,
                self.senders.len()
            ))
        })
    }

    /// First configured signer: deployer and contract owner.
    pub fn owner(&self) -> Result<Arc<TxSender>, AppError> {
        self.sender(0)
    }

    pub fn signer_addresses(&self) -> Vec<Address> {
        self.senders.iter().map(|s| s.address()).collect()
    }

    /// Stake token bound to `sender`, or read-only without one.
    pub fn usdt(&self, sender: Option<Arc<TxSender>>) -> Result<Option<MockUsdtClient>, AppError> {
        Ok(self.settings.usdt_address()?.map(|addr| match sender {
            Some(sender) => MockUsdtClient::new(addr, sender),
            None => MockUsdtClient::read_only(addr, self.provider.clone()),
        }))
    }

    /// FunRound bound to the owner signer, with the stake token attached when known.
    /// Without configured keys the client is read-only.
    pub fn fun_round(&self) -> Result<FunRoundClient, AppError> {
        let address = self.settings.fun_round_address()?;
        let Some(owner) = self.senders.first().cloned() else {
            let usdt = self.usdt(None)?;
            return Ok(
                FunRoundClient::read_only(address, self.provider.clone(), self.chain_id)
                    .with_usdt(usdt),
            );
        };
        let usdt = self.usdt(Some(owner.clone()))?;
        Ok(FunRoundClient::new(address, owner).with_usdt(usdt))
    }
}
