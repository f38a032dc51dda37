// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Bindings for the deployed FunRound game contract and its MockUSDT stake token.
//!
//! Only the surface this service calls is declared. Event parameters are
//! declared non-indexed; a contract built with indexed parameters decodes
//! to no event rather than an error.

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface FunRound {
        event Deposit(uint256 gameId, address player, uint256 amount);
        event USDTDeposited(address player, uint256 amount);
        event FeeCollected(uint256 amount);
        event DepositSuccessful(address player, uint256 amount, uint256 newBalance);
        event USDTBet(uint256 gameId, address player, uint256 amount);
        event GameStarted(uint256 gameId, address player1, address player2);
        event ResultSubmitted(uint256 gameId, address player, address proposedWinner);
        event ResultAlreadySubmitted(uint256 gameId, address player);
        event GameResultSubmitted(address submitter, address winner);
        event WinningsPaid(uint256 gameId, address winner, uint256 amount);
        event GameEnded(uint256 gameId, address winner);

        function getPlayers() external view returns (address[] memory);
        function joinGame() external payable;
        function deposit() external payable;
        function depositUSDT(uint256 amount) external;
        function betUSDT(uint256 amount) external;
        function submitGameResult(uint256 gameId, address winner) external;
        function getGameState(uint256 gameId)
            external
            view
            returns (bool isActive, address[2] memory players, bool[2] memory hasPlayed);
        function getGamePlayers(uint256 gameId) external view returns (address[2] memory);
        function isGameInProgress(uint256 gameId) external view returns (bool);
        function getPlayerBalance(address player) external view returns (uint256);
        function getPlayerUSDTBalance(address player) external view returns (uint256);
        function getContractBalance() external view returns (uint256);
        function withdrawFees() external;
        function resetGame(uint256 gameId) external;
        function owner() external view returns (address);
        function nextGameId() external view returns (uint256);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface MockUSDT {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function mint(address to, uint256 amount) external;
        function decimals() external view returns (uint8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn submit_game_result_call_layout() {
        let call = FunRound::submitGameResultCall {
            gameId: U256::from(7u64),
            winner: Address::from([0xabu8; 20]),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 32 + 32);
        assert_eq!(&encoded[..4], FunRound::submitGameResultCall::SELECTOR.as_slice());
        let decoded = FunRound::submitGameResultCall::abi_decode(&encoded).expect("decode");
        assert_eq!(decoded.gameId, U256::from(7u64));
        assert_eq!(decoded.winner, Address::from([0xabu8; 20]));
    }

    #[test]
    fn selectors_match_solidity_signatures() {
        assert_eq!(FunRound::joinGameCall::SIGNATURE, "joinGame()");
        assert_eq!(FunRound::depositUSDTCall::SIGNATURE, "depositUSDT(uint256)");
        assert_eq!(
            FunRound::submitGameResultCall::SIGNATURE,
            "submitGameResult(uint256,address)"
        );
        assert_eq!(MockUSDT::approveCall::SIGNATURE, "approve(address,uint256)");
        // ERC-20 selectors are fixed by the standard.
        assert_eq!(hex::encode(MockUSDT::approveCall::SELECTOR), "095ea7b3");
        assert_eq!(hex::encode(MockUSDT::balanceOfCall::SELECTOR), "70a08231");
    }

    #[test]
    fn event_signatures() {
        assert_eq!(
            FunRound::ResultSubmitted::SIGNATURE,
            "ResultSubmitted(uint256,address,address)"
        );
        assert_eq!(FunRound::GameEnded::SIGNATURE, "GameEnded(uint256,address)");
    }
}
