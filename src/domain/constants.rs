// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::Address;

// Empty player slots in FunRound storage read back as the zero address.
pub const ZERO_ADDRESS: Address = Address::ZERO;

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_FANTOM: u64 = 250;
pub const CHAIN_FANTOM_TESTNET: u64 = 4002;
pub const CHAIN_HARDHAT: u64 = 31337;

pub const DEFAULT_HTTP_PROVIDER: &str = "https://rpc.testnet.fantom.network";

pub fn native_symbol(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_FANTOM | CHAIN_FANTOM_TESTNET => "FTM",
        _ => "ETH",
    }
}

// =============================================================================
// GAS & TRANSACTION CONSTANTS
// =============================================================================

pub const DEFAULT_GAS_PRICE_GWEI: u64 = 3;
pub const DEFAULT_GAS_LIMIT: u64 = 8_000_000;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 500;
pub const DEFAULT_RECEIPT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_RECEIPT_CONFIRM_BLOCKS: u64 = 1;
/// Headroom applied on top of `eth_estimateGas`, in basis points.
pub const GAS_ESTIMATE_HEADROOM_BPS: u64 = 12_000;
pub const READ_RETRY_ATTEMPTS: usize = 3;
pub const READ_RETRY_DELAY_MS: u64 = 100;

// =============================================================================
// GAME CONSTANTS
// =============================================================================

pub const NATIVE_DECIMALS: u8 = 18;
pub const USDT_DECIMALS: u8 = 6;
/// Stake sent with `joinGame`, in native units.
pub const DEFAULT_JOIN_DEPOSIT: &str = "0.02";
pub const DEFAULT_MOCK_USDT_SUPPLY: &str = "10000";
pub const DEFAULT_MOCK_USDT_MINT: &str = "1000";
pub const DEFAULT_USDT_APPROVAL: &str = "1000000";

// =============================================================================
// FILES & ARTIFACTS
// =============================================================================

pub const DEFAULT_DEPLOYED_ADDRESS_PATH: &str = "deployed-address.txt";
pub const DEFAULT_DEPLOYED_ADDRESSES_PATH: &str = "deployed-addresses.json";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts/contracts";
pub const FUN_ROUND_CONTRACT: &str = "FunRound";
pub const MOCK_USDT_CONTRACT: &str = "MockUSDT";

// =============================================================================
// HTTP API
// =============================================================================

pub const DEFAULT_API_BIND: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 3000;

pub const ROUTE_HEALTH: &str = "/health";
pub const ROUTE_PLAYERS: &str = "/players";
pub const ROUTE_SUBMIT_GAME_RESULT: &str = "/api/v1/game/submit-game-result";
pub const ROUTE_GAME_STATE: &str = "/api/v1/game/{id}";
pub const ROUTE_PLAYER_BALANCE: &str = "/api/v1/players/{address}/balance";
pub const ROUTE_CONTRACT: &str = "/api/v1/contract";

pub const MSG_PLAYERS_FAILED: &str = "Failed to fetch players";
pub const MSG_SUBMIT_OK: &str = "Game result submitted successfully";
pub const MSG_SUBMIT_FAILED: &str = "Failed to submit game result";
pub const MSG_GAME_STATE_FAILED: &str = "Failed to fetch game state";
pub const MSG_BALANCE_FAILED: &str = "Failed to fetch player balance";
pub const MSG_CONTRACT_FAILED: &str = "Failed to fetch contract state";
