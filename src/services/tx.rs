// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::app::config::ReceiptPolicy;
use crate::common::error::AppError;
use crate::common::retry::is_revert_message;
use crate::infrastructure::data::revert::decode_revert;
use crate::network::gas::{FeeQuote, GasOracle, gas_limit_with_headroom};
use crate::network::nonce::NonceManager;
use crate::network::provider::HttpProvider;
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::eip2930::AccessList;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, B256, Bytes, Log, TxKind, U256};
use alloy::providers::Provider;
use alloy::rpc::types::eth::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::{RpcError as TransportRpcError, TransportError};
use alloy_json_abi::JsonAbi;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// A mined, successful transaction.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

/// Signs locally, broadcasts raw, and waits for confirmation. One per signer.
pub struct TxSender {
    provider: HttpProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    nonce: NonceManager,
    gas: GasOracle,
    gas_limit_cap: u64,
    receipt: ReceiptPolicy,
    revert_abi: Option<Arc<JsonAbi>>,
    // Held from nonce read to broadcast.
    send_lock: Mutex<()>,
}

impl TxSender {
    pub fn new(
        provider: HttpProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        gas: GasOracle,
        gas_limit_cap: u64,
        receipt: ReceiptPolicy,
    ) -> Self {
        let nonce = NonceManager::new(provider.clone(), signer.address());
        Self {
            provider,
            signer,
            chain_id,
            nonce,
            gas,
            gas_limit_cap,
            receipt,
            revert_abi: None,
            send_lock: Mutex::new(()),
        }
    }

    /// ABI whose custom errors should be named in revert messages.
    pub fn with_revert_abi(mut self, abi: Option<Arc<JsonAbi>>) -> Self {
        self.revert_abi = abi;
        self
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    pub async fn send_call(
        &self,
        label: &str,
        to: Address,
        calldata: Vec<u8>,
        value: U256,
    ) -> Result<SentTx, AppError> {
        self.submit(label, TxKind::Call(to), Bytes::from(calldata), value)
            .await
    }

    pub async fn deploy(&self, label: &str, init_code: Bytes) -> Result<SentTx, AppError> {
        let sent = self
            .submit(label, TxKind::Create, init_code, U256::ZERO)
            .await?;
        if sent.contract_address.is_none() {
            return Err(AppError::Transaction {
                hash: format!("{:#x}", sent.hash),
                reason: "receipt carries no contract address".into(),
            });
        }
        Ok(sent)
    }

    async fn submit(
        &self,
        label: &str,
        to: TxKind,
        input: Bytes,
        value: U256,
    ) -> Result<SentTx, AppError> {
        let request = TransactionRequest {
            from: Some(self.signer.address()),
            to: Some(to),
            value: Some(value),
            input: TransactionInput::new(input.clone()),
            chain_id: Some(self.chain_id),
            ..Default::default()
        };

        // Preflight: a revert surfaces here with its reason and nothing is broadcast.
        let estimate = self
            .provider
            .estimate_gas(request)
            .await
            .map_err(|e| classify_rpc_error(label, &e, self.revert_abi.as_deref()))?;
        let gas_limit = gas_limit_with_headroom(estimate, self.gas_limit_cap);
        let fees = self.gas.quote().await?;

        let hash = {
            let _guard = self.send_lock.lock().await;
            let nonce = self.nonce.next_nonce().await?;
            let (raw, hash) = self.sign(to, input, value, nonce, gas_limit, fees)?;
            if let Err(e) = self.provider.send_raw_transaction(&raw).await {
                self.nonce.invalidate();
                return Err(classify_rpc_error(label, &e, self.revert_abi.as_deref()));
            }
            self.nonce.mark_used(nonce);
            tracing::info!(
                target: "tx",
                method = label,
                from = %self.signer.address(),
                nonce,
                gas_limit,
                hash = %format!("{:#x}", hash),
                "Transaction sent, waiting for confirmation"
            );
            hash
        };

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.status() {
            return Err(AppError::Transaction {
                hash: format!("{:#x}", hash),
                reason: format!("{label} reverted on-chain"),
            });
        }
        tracing::info!(
            target: "tx",
            method = label,
            hash = %format!("{:#x}", hash),
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(SentTx {
            hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            contract_address: receipt.contract_address,
            logs: receipt.inner.logs().iter().map(|l| l.inner.clone()).collect(),
        })
    }

    fn sign(
        &self,
        to: TxKind,
        input: Bytes,
        value: U256,
        nonce: u64,
        gas_limit: u64,
        fees: FeeQuote,
    ) -> Result<(Vec<u8>, B256), AppError> {
        let envelope: TxEnvelope = match fees {
            FeeQuote::Legacy { gas_price } => {
                let mut tx = TxLegacy {
                    chain_id: Some(self.chain_id),
                    nonce,
                    gas_price,
                    gas_limit,
                    to,
                    value,
                    input,
                };
                let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
                    .map_err(|e| AppError::Initialization(format!("Sign tx failed: {}", e)))?;
                tx.into_signed(sig).into()
            }
            FeeQuote::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let mut tx = TxEip1559 {
                    chain_id: self.chain_id,
                    nonce,
                    gas_limit,
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                    to,
                    value,
                    access_list: AccessList::default(),
                    input,
                };
                let sig = TxSignerSync::sign_transaction_sync(&self.signer, &mut tx)
                    .map_err(|e| AppError::Initialization(format!("Sign tx failed: {}", e)))?;
                tx.into_signed(sig).into()
            }
        };
        let hash = *envelope.tx_hash();
        Ok((envelope.encoded_2718(), hash))
    }

    pub async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, AppError> {
        let started = Instant::now();
        loop {
            if started.elapsed() >= self.receipt.timeout {
                return Err(AppError::Timeout {
                    what: format!("receipt {:#x}", hash),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let Some(receipt_block) = receipt.block_number else {
                        return Ok(receipt);
                    };
                    if self.receipt.confirm_blocks <= 1 {
                        return Ok(receipt);
                    }
                    let head = self
                        .provider
                        .get_block_number()
                        .await
                        .unwrap_or(receipt_block);
                    if receipt_is_confirmed(head, receipt_block, self.receipt.confirm_blocks) {
                        return Ok(receipt);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        target: "tx",
                        error = %e,
                        hash = %format!("{:#x}", hash),
                        "Receipt lookup error; retrying"
                    );
                }
            }

            tokio::time::sleep(self.receipt.poll).await;
        }
    }
}

pub fn receipt_is_confirmed(current_head: u64, receipt_block: u64, confirm_blocks: u64) -> bool {
    let needed_head = receipt_block.saturating_add(confirm_blocks.saturating_sub(1));
    current_head >= needed_head
}

/// Maps a node error to a revert (with decoded reason) or a plain contract failure.
pub fn classify_rpc_error(label: &str, err: &TransportError, abi: Option<&JsonAbi>) -> AppError {
    if let TransportRpcError::ErrorResp(payload) = err {
        if let Some(data) = payload.as_revert_data() {
            return AppError::Reverted {
                reason: decode_revert(&data, abi),
            };
        }
        if let Some(reason) = revert_reason_from_message(&payload.message) {
            return AppError::Reverted { reason };
        }
    }
    AppError::contract(label, err)
}

/// Nodes without revert data still say `execution reverted: <reason>`.
pub fn revert_reason_from_message(message: &str) -> Option<String> {
    if !is_revert_message(message) {
        return None;
    }
    let reason = message
        .split_once(':')
        .map(|(_, reason)| reason.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| message.to_string());
    Some(reason)
}
