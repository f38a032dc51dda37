// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::retry::retry_read;
use crate::data::abi::MockUSDT;
use crate::network::provider::HttpProvider;
use crate::services::tx::{SentTx, TxSender};
use alloy::primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;

/// Stake token used by the USDT deposit and bet flow.
pub struct MockUsdtClient {
    address: Address,
    contract: MockUSDT::MockUSDTInstance<HttpProvider>,
    sender: Option<Arc<TxSender>>,
}

impl MockUsdtClient {
    pub fn new(address: Address, sender: Arc<TxSender>) -> Self {
        let contract = MockUSDT::new(address, sender.provider().clone());
        Self {
            address,
            contract,
            sender: Some(sender),
        }
    }

    /// Balance and allowance reads without a signer.
    pub fn read_only(address: Address, provider: HttpProvider) -> Self {
        Self {
            address,
            contract: MockUSDT::new(address, provider),
            sender: None,
        }
    }

    pub fn connect(&self, sender: Arc<TxSender>) -> Self {
        Self {
            address: self.address,
            contract: self.contract.clone(),
            sender: Some(sender),
        }
    }

    fn signer(&self) -> Result<&TxSender, AppError> {
        self.sender.as_deref().ok_or_else(AppError::no_signer)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, AppError> {
        retry_read(|_| async move { self.contract.balanceOf(account).call().await })
            .await
            .map_err(|e| AppError::contract("balanceOf", e))
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, AppError> {
        retry_read(|_| async move { self.contract.allowance(owner, spender).call().await })
            .await
            .map_err(|e| AppError::contract("allowance", e))
    }

    pub async fn decimals(&self) -> Result<u8, AppError> {
        retry_read(|_| async { self.contract.decimals().call().await })
            .await
            .map_err(|e| AppError::contract("decimals", e))
    }

    pub async fn approve(&self, spender: Address, amount: U256) -> Result<SentTx, AppError> {
        let call = MockUSDT::approveCall { spender, amount };
        self.signer()?
            .send_call("approve", self.address, call.abi_encode(), U256::ZERO)
            .await
    }

    pub async fn mint(&self, to: Address, amount: U256) -> Result<SentTx, AppError> {
        let call = MockUSDT::mintCall { to, amount };
        self.signer()?
            .send_call("mint", self.address, call.abi_encode(), U256::ZERO)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::provider::ConnectionFactory;

    #[tokio::test]
    async fn read_only_token_refuses_sends() {
        let provider = ConnectionFactory::http("http://127.0.0.1:9").unwrap();
        let token = MockUsdtClient::read_only(Address::repeat_byte(0x55), provider);
        assert_eq!(token.address(), Address::repeat_byte(0x55));
        assert!(matches!(
            token.mint(Address::repeat_byte(0x01), U256::from(1u64)).await,
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            token.approve(Address::repeat_byte(0x02), U256::from(1u64)).await,
            Err(AppError::Config(_))
        ));
    }
}
