// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::common::retry::retry_read;
use crate::common::units::format_ether;
use crate::data::abi::FunRound;
use crate::domain::constants::ZERO_ADDRESS;
use crate::infrastructure::data::revert::decode_revert;
use crate::network::provider::HttpProvider;
use crate::services::events::{decode_game_events, deposit_game_id, result_submission};
use crate::services::token::MockUsdtClient;
use crate::services::tx::{SentTx, TxSender};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy_sol_types::SolCall;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_id: u64,
    pub is_active: bool,
    pub players: [Address; 2],
    pub has_played: [bool; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBalances {
    pub address: Address,
    pub native_wei: String,
    pub native: String,
    pub game_balance_wei: String,
    pub usdt_game_units: String,
    pub usdt_wallet_units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractOverview {
    pub address: Address,
    pub chain_id: u64,
    pub owner: Address,
    pub next_game_id: String,
    pub contract_balance_wei: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEventSummary {
    pub submitter: Address,
    pub winner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResult {
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    pub contract_address: Address,
    pub event: Option<ResultEventSummary>,
}

/// What the HTTP layer needs from the game contract.
pub trait GameGateway: Send + Sync + 'static {
    fn players(&self) -> impl Future<Output = Result<Vec<Address>, AppError>> + Send;

    /// `None` targets the most recent game.
    fn submit_game_result(
        &self,
        game_id: Option<u64>,
        winner: Address,
    ) -> impl Future<Output = Result<SubmittedResult, AppError>> + Send;

    fn game_state(&self, game_id: u64) -> impl Future<Output = Result<GameState, AppError>> + Send;

    fn player_balances(
        &self,
        player: Address,
    ) -> impl Future<Output = Result<PlayerBalances, AppError>> + Send;

    fn overview(&self) -> impl Future<Output = Result<ContractOverview, AppError>> + Send;
}

/// Drops empty player slots.
pub fn active_players(players: Vec<Address>) -> Vec<Address> {
    players.into_iter().filter(|p| *p != ZERO_ADDRESS).collect()
}

/// Id of the newest game given the contract's `nextGameId`.
pub fn latest_game_id(next_game_id: U256) -> U256 {
    next_game_id.saturating_sub(U256::from(1u64))
}

pub fn game_id_u64(game_id: U256) -> Result<u64, AppError> {
    u64::try_from(game_id)
        .map_err(|_| AppError::validation("gameId", format!("{game_id} does not fit in u64")))
}

fn call_error(method: &str, err: alloy::contract::Error) -> AppError {
    match err.as_revert_data() {
        Some(data) => AppError::Reverted {
            reason: decode_revert(&data, None),
        },
        None => AppError::contract(method, err),
    }
}

/// A game id plus the transaction that produced it.
#[derive(Debug, Clone)]
pub struct JoinedGame {
    pub game_id: u64,
    pub tx: SentTx,
}

pub struct FunRoundClient {
    address: Address,
    contract: FunRound::FunRoundInstance<HttpProvider>,
    chain_id: u64,
    sender: Option<Arc<TxSender>>,
    usdt: Option<MockUsdtClient>,
}

impl FunRoundClient {
    pub fn new(address: Address, sender: Arc<TxSender>) -> Self {
        let contract = FunRound::new(address, sender.provider().clone());
        Self {
            address,
            contract,
            chain_id: sender.chain_id(),
            sender: Some(sender),
            usdt: None,
        }
    }

    /// Reads only; every send fails with a configuration error.
    pub fn read_only(address: Address, provider: HttpProvider, chain_id: u64) -> Self {
        Self {
            address,
            contract: FunRound::new(address, provider),
            chain_id,
            sender: None,
            usdt: None,
        }
    }

    /// Wallet-side USDT balances are reported when a token is attached.
    pub fn with_usdt(mut self, usdt: Option<MockUsdtClient>) -> Self {
        self.usdt = usdt;
        self
    }

    /// Same contract, different signer.
    pub fn connect(&self, sender: Arc<TxSender>) -> Self {
        Self {
            address: self.address,
            contract: self.contract.clone(),
            chain_id: self.chain_id,
            usdt: self.usdt.as_ref().map(|t| t.connect(sender.clone())),
            sender: Some(sender),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Result<&Arc<TxSender>, AppError> {
        self.sender.as_ref().ok_or_else(AppError::no_signer)
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.sender.as_ref().map(|s| s.address())
    }

    pub fn usdt(&self) -> Option<&MockUsdtClient> {
        self.usdt.as_ref()
    }

    async fn send<C: SolCall>(&self, call: C, value: U256) -> Result<SentTx, AppError> {
        self.signer()?
            .send_call(C::SIGNATURE, self.address, call.abi_encode(), value)
            .await
    }

    pub async fn join_game(&self, value: U256) -> Result<JoinedGame, AppError> {
        let player = self.signer()?.address();
        let tx = self.send(FunRound::joinGameCall {}, value).await?;
        let events = decode_game_events(&tx.logs);
        let game_id = match deposit_game_id(&events, player) {
            Some(id) => id,
            None => {
                tracing::debug!(
                    target: "contract",
                    hash = %format!("{:#x}", tx.hash),
                    "No Deposit event in joinGame receipt; using nextGameId - 1"
                );
                latest_game_id(self.next_game_id().await?)
            }
        };
        Ok(JoinedGame {
            game_id: game_id_u64(game_id)?,
            tx,
        })
    }

    pub async fn deposit(&self, value: U256) -> Result<SentTx, AppError> {
        self.send(FunRound::depositCall {}, value).await
    }

    pub async fn deposit_usdt(&self, amount: U256) -> Result<SentTx, AppError> {
        self.send(FunRound::depositUSDTCall { amount }, U256::ZERO)
            .await
    }

    pub async fn bet_usdt(&self, amount: U256) -> Result<SentTx, AppError> {
        self.send(FunRound::betUSDTCall { amount }, U256::ZERO).await
    }

    pub async fn withdraw_fees(&self) -> Result<SentTx, AppError> {
        self.send(FunRound::withdrawFeesCall {}, U256::ZERO).await
    }

    pub async fn reset_game(&self, game_id: u64) -> Result<SentTx, AppError> {
        self.send(
            FunRound::resetGameCall {
                gameId: U256::from(game_id),
            },
            U256::ZERO,
        )
        .await
    }

    pub async fn submit_result_tx(&self, game_id: U256, winner: Address) -> Result<SentTx, AppError> {
        self.send(
            FunRound::submitGameResultCall {
                gameId: game_id,
                winner,
            },
            U256::ZERO,
        )
        .await
    }

    pub async fn game_players(&self, game_id: u64) -> Result<[Address; 2], AppError> {
        let id = U256::from(game_id);
        retry_read(|_| async move { self.contract.getGamePlayers(id).call().await })
            .await
            .map_err(|e| call_error("getGamePlayers", e))
    }

    pub async fn is_game_in_progress(&self, game_id: u64) -> Result<bool, AppError> {
        let id = U256::from(game_id);
        retry_read(|_| async move { self.contract.isGameInProgress(id).call().await })
            .await
            .map_err(|e| call_error("isGameInProgress", e))
    }

    pub async fn owner(&self) -> Result<Address, AppError> {
        retry_read(|_| async { self.contract.owner().call().await })
            .await
            .map_err(|e| call_error("owner", e))
    }

    pub async fn next_game_id(&self) -> Result<U256, AppError> {
        retry_read(|_| async { self.contract.nextGameId().call().await })
            .await
            .map_err(|e| call_error("nextGameId", e))
    }

    pub async fn contract_balance(&self) -> Result<U256, AppError> {
        retry_read(|_| async { self.contract.getContractBalance().call().await })
            .await
            .map_err(|e| call_error("getContractBalance", e))
    }

    pub async fn player_game_balance(&self, player: Address) -> Result<U256, AppError> {
        retry_read(|_| async move { self.contract.getPlayerBalance(player).call().await })
            .await
            .map_err(|e| call_error("getPlayerBalance", e))
    }

    pub async fn player_usdt_balance(&self, player: Address) -> Result<U256, AppError> {
        retry_read(|_| async move { self.contract.getPlayerUSDTBalance(player).call().await })
            .await
            .map_err(|e| call_error("getPlayerUSDTBalance", e))
    }

    pub async fn native_balance(&self, account: Address) -> Result<U256, AppError> {
        let provider = self.contract.provider();
        retry_read(|_| async move { provider.get_balance(account).await })
            .await
            .map_err(|e| AppError::Connection(format!("eth_getBalance failed: {e}")))
    }
}

impl GameGateway for FunRoundClient {
    async fn players(&self) -> Result<Vec<Address>, AppError> {
        let raw = retry_read(|_| async { self.contract.getPlayers().call().await })
            .await
            .map_err(|e| call_error("getPlayers", e))?;
        Ok(active_players(raw))
    }

    async fn submit_game_result(
        &self,
        game_id: Option<u64>,
        winner: Address,
    ) -> Result<SubmittedResult, AppError> {
        let from = self.signer()?.address();
        let game_id = match game_id {
            Some(id) => U256::from(id),
            None => latest_game_id(self.next_game_id().await?),
        };
        tracing::info!(
            target: "contract",
            game_id = %game_id,
            winner = %winner,
            from = %from,
            "Submitting game result"
        );
        let tx = self.submit_result_tx(game_id, winner).await?;
        let events = decode_game_events(&tx.logs);
        let event = result_submission(&events)
            .map(|(submitter, winner)| ResultEventSummary { submitter, winner });
        if event.is_none() {
            tracing::warn!(
                target: "contract",
                hash = %format!("{:#x}", tx.hash),
                "Receipt carries no result submission event"
            );
        }
        Ok(SubmittedResult {
            transaction_hash: format!("{:#x}", tx.hash),
            block_number: tx.block_number,
            contract_address: self.address,
            event,
        })
    }

    async fn game_state(&self, game_id: u64) -> Result<GameState, AppError> {
        let id = U256::from(game_id);
        let state = retry_read(|_| async move { self.contract.getGameState(id).call().await })
            .await
            .map_err(|e| call_error("getGameState", e))?;
        Ok(GameState {
            game_id,
            is_active: state.isActive,
            players: state.players,
            has_played: state.hasPlayed,
        })
    }

    async fn player_balances(&self, player: Address) -> Result<PlayerBalances, AppError> {
        let native = self.native_balance(player).await?;
        let game_balance = self.player_game_balance(player).await?;
        let usdt_game = self.player_usdt_balance(player).await?;
        let usdt_wallet = match &self.usdt {
            Some(token) => Some(token.balance_of(player).await?.to_string()),
            None => None,
        };
        Ok(PlayerBalances {
            address: player,
            native_wei: native.to_string(),
            native: format_ether(native),
            game_balance_wei: game_balance.to_string(),
            usdt_game_units: usdt_game.to_string(),
            usdt_wallet_units: usdt_wallet,
        })
    }

    async fn overview(&self) -> Result<ContractOverview, AppError> {
        Ok(ContractOverview {
            address: self.address,
            chain_id: self.chain_id,
            owner: self.owner().await?,
            next_game_id: self.next_game_id().await?.to_string(),
            contract_balance_wei: self.contract_balance().await?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::provider::ConnectionFactory;
    use alloy::primitives::address;

    #[test]
    fn zero_slots_are_filtered() {
        let a = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let b = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
        let players = vec![Address::ZERO, a, Address::ZERO, b];
        assert_eq!(active_players(players), vec![a, b]);
        assert!(active_players(vec![Address::ZERO, Address::ZERO]).is_empty());
    }

    #[test]
    fn latest_game_saturates_at_zero() {
        assert_eq!(latest_game_id(U256::ZERO), U256::ZERO);
        assert_eq!(latest_game_id(U256::from(1u64)), U256::ZERO);
        assert_eq!(latest_game_id(U256::from(5u64)), U256::from(4u64));
    }

    #[test]
    fn oversized_game_ids_are_rejected() {
        assert_eq!(game_id_u64(U256::from(9u64)).unwrap(), 9);
        assert!(matches!(
            game_id_u64(U256::MAX),
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn read_only_client_refuses_sends() {
        // Nothing listens here; the signer check must fail before any RPC.
        let provider = ConnectionFactory::http("http://127.0.0.1:9").unwrap();
        let client = FunRoundClient::read_only(Address::repeat_byte(0x42), provider, 31337);
        assert_eq!(client.signer_address(), None);

        match client.submit_game_result(Some(1), Address::repeat_byte(0x01)).await {
            Err(AppError::Config(msg)) => assert!(msg.contains("WALLET_KEYS")),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(client.withdraw_fees().await, Err(AppError::Config(_))));
        assert!(matches!(
            client.join_game(U256::from(1u64)).await,
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn submitted_result_serializes_camel_case() {
        let result = SubmittedResult {
            transaction_hash: "0xabc".into(),
            block_number: Some(12),
            contract_address: Address::repeat_byte(0x11),
            event: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["transactionHash"], "0xabc");
        assert_eq!(json["blockNumber"], 12);
        assert!(json["contractAddress"].is_string());
        assert!(json["event"].is_null());
    }
}
