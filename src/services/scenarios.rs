// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Operator walkthroughs against a live FunRound deployment.
//!
//! Each step prints what it observed. Failures are logged and the walkthrough
//! moves on, so a half-configured contract still shows its state.

use crate::common::error::AppError;
use crate::common::units::{format_ether, format_usdt};
use crate::domain::constants::native_symbol;
use crate::services::events::{GameEvent, decode_game_events};
use crate::services::game::{FunRoundClient, GameGateway, game_id_u64, latest_game_id};
use crate::services::session::Session;
use alloy::primitives::{Address, U256};

/// Signer indices for the two player slots: #1 and #2, or the owner twice
/// when fewer than three keys are configured.
pub fn player_slots(signer_count: usize) -> [usize; 2] {
    if signer_count < 3 { [0, 0] } else { [1, 2] }
}

fn signer_label(client: &FunRoundClient) -> String {
    client
        .signer_address()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "read-only".to_string())
}

/// First three signers each join a game with `deposit`; returns the ids they landed in.
pub async fn join(session: &Session, deposit: U256) -> Result<Vec<u64>, AppError> {
    let base = session.fun_round()?;
    println!("Deployed contract address: {}", base.address());

    println!("\nJoining games:");
    let mut game_ids = Vec::new();
    for idx in 0..session.signer_count().min(3) {
        let client = base.connect(session.sender(idx)?);
        match client.join_game(deposit).await {
            Ok(joined) => {
                println!("{} joined game {}", signer_label(&client), joined.game_id);
                game_ids.push(joined.game_id);
            }
            Err(e) => {
                tracing::error!(
                    target: "scenario",
                    signer = %signer_label(&client),
                    error = %e,
                    "joinGame failed"
                );
            }
        }
    }

    println!("\nChecking game states:");
    for game_id in &game_ids {
        print_players_and_progress(&base, *game_id).await;
    }
    Ok(game_ids)
}

/// Owner plus two players: join, submit results from both sides, report state.
pub async fn play(session: &Session, deposit: U256) -> Result<(), AppError> {
    let owner = session.fun_round()?;
    let symbol = native_symbol(session.chain_id);
    println!("Deployed contract address: {}", owner.address());
    println!("Contract owner: {}", owner.owner().await?);
    let owner_address = owner.signer()?.address();
    println!("Script owner address: {owner_address}");

    let [slot1, slot2] = player_slots(session.signer_count());
    if slot1 == slot2 {
        println!("Not enough signers available. Using the same signer for all operations.");
    }
    let player1 = owner.connect(session.sender(slot1)?);
    let player2 = owner.connect(session.sender(slot2)?);
    let player1_address = player1.signer()?.address();
    let player2_address = player2.signer()?.address();
    println!("Player 1 address: {player1_address}");
    println!("Player 2 address: {player2_address}");

    println!("\nChecking balances:");
    for (label, account) in [
        ("Owner", owner_address),
        ("Player 1", player1_address),
        ("Player 2", player2_address),
    ] {
        match owner.native_balance(account).await {
            Ok(balance) => println!("{label} balance: {} {symbol}", format_ether(balance)),
            Err(e) => tracing::error!(target: "scenario", error = %e, "{label} balance failed"),
        }
    }

    println!("\nCreating a new game:");
    match create_game(&player1, &player2, deposit, symbol).await {
        Ok(game_id) => {
            println!("Game created with ID: {game_id}");
            println!("\nGame state after creation:");
            print_game_state(&owner, game_id).await;

            println!("\nSubmitting game result...");
            submit_and_report(&player1, game_id, player1_address).await;
            println!("\nChecking game state after first submission:");
            print_game_state(&owner, game_id).await;

            submit_and_report(&player2, game_id, player2_address).await;
            println!("\nFinal game state:");
            print_game_state(&owner, game_id).await;
        }
        Err(e) => {
            tracing::error!(target: "scenario", error = %e, "Error during game creation or play");
        }
    }

    println!("\nContract balance:");
    match owner.contract_balance().await {
        Ok(balance) => println!("Contract balance: {} {symbol}", format_ether(balance)),
        Err(e) => tracing::error!(target: "scenario", error = %e, "Failed to get contract balance"),
    }

    println!("\nChecking contract state:");
    print_contract_state(&owner).await;
    Ok(())
}

/// Mint, approve, deposit and bet MockUSDT for two players, then show the game.
pub async fn usdt(
    session: &Session,
    mint_amount: U256,
    deposit_amount: U256,
    bet_amount: U256,
) -> Result<(), AppError> {
    let owner = session.fun_round()?;
    let Some(token) = owner.usdt() else {
        return Err(AppError::Config(
            "MockUSDT address unknown: set USDT_ADDRESS or deploy with the token".into(),
        ));
    };
    let slots = player_slots(session.signer_count());
    if slots[0] == slots[1] {
        println!("Not enough signers available. Using the owner for both players.");
    }
    let players = slots
        .iter()
        .map(|idx| Ok(owner.connect(session.sender(*idx)?)))
        .collect::<Result<Vec<FunRoundClient>, AppError>>()?;

    for player in &players {
        let who = player.signer()?.address();
        println!("\nPlayer {who}:");
        if let Err(e) = token.mint(who, mint_amount).await {
            tracing::error!(target: "scenario", player = %who, error = %e, "mint failed");
            continue;
        }
        println!("  Minted {} USDT", format_usdt(mint_amount));

        let Some(player_token) = player.usdt() else {
            continue;
        };
        if let Err(e) = player_token.approve(owner.address(), deposit_amount).await {
            tracing::error!(target: "scenario", player = %who, error = %e, "approve failed");
            continue;
        }
        match player.deposit_usdt(deposit_amount).await {
            Ok(tx) => {
                println!("  Deposited {} USDT", format_usdt(deposit_amount));
                print_events(&tx.logs);
            }
            Err(e) => {
                tracing::error!(target: "scenario", player = %who, error = %e, "depositUSDT failed");
                continue;
            }
        }
        match player.player_usdt_balance(who).await {
            Ok(balance) => println!("  Game balance: {} USDT", format_usdt(balance)),
            Err(e) => tracing::error!(target: "scenario", error = %e, "balance read failed"),
        }
        match player.bet_usdt(bet_amount).await {
            Ok(tx) => {
                println!("  Bet {} USDT", format_usdt(bet_amount));
                print_events(&tx.logs);
            }
            Err(e) => {
                tracing::error!(target: "scenario", player = %who, error = %e, "betUSDT failed");
            }
        }
    }

    let latest = latest_game_id(owner.next_game_id().await?);
    println!("\nGame state:");
    print_game_state(&owner, game_id_u64(latest)?).await;
    Ok(())
}

async fn create_game(
    player1: &FunRoundClient,
    player2: &FunRoundClient,
    deposit: U256,
    symbol: &str,
) -> Result<u64, AppError> {
    println!(
        "Attempting to join game with {} {symbol}",
        format_ether(deposit)
    );
    let first = player1.join_game(deposit).await?;
    println!(
        "Player 1 ({}) joined game {}",
        signer_label(player1),
        first.game_id
    );
    player2.join_game(deposit).await?;
    println!(
        "Player 2 ({}) joined game {}",
        signer_label(player2),
        first.game_id
    );
    Ok(first.game_id)
}

async fn submit_and_report(client: &FunRoundClient, game_id: u64, winner: Address) {
    println!(
        "Submitting result for game {game_id} by {}",
        signer_label(client)
    );
    match client.submit_result_tx(U256::from(game_id), winner).await {
        Ok(tx) => {
            println!("Transaction confirmed: {:#x}", tx.hash);
            if tx.logs.is_empty() {
                println!("No events found in the transaction receipt");
            }
            print_events(&tx.logs);
        }
        Err(e) => {
            tracing::error!(
                target: "scenario",
                game_id,
                error = %e,
                "Error submitting result"
            );
        }
    }
}

fn print_events(logs: &[alloy::primitives::Log]) {
    for event in decode_game_events(logs) {
        match &event {
            GameEvent::ResultSubmitted {
                proposed_winner, ..
            } => println!("  Result submitted. Proposed winner: {proposed_winner}"),
            GameEvent::ResultAlreadySubmitted { player, .. } => {
                println!("  Result already submitted by {player}")
            }
            GameEvent::GameEnded { winner, .. } => println!("  Game ended. Winner: {winner}"),
            other => println!("  {}", other.describe()),
        }
    }
}

async fn print_players_and_progress(client: &FunRoundClient, game_id: u64) {
    println!("Game {game_id}:");
    match client.game_players(game_id).await {
        Ok(players) => println!("  Players: [{}, {}]", players[0], players[1]),
        Err(e) => tracing::error!(target: "scenario", game_id, error = %e, "getGamePlayers failed"),
    }
    match client.is_game_in_progress(game_id).await {
        Ok(active) => println!("  Is active: {active}"),
        Err(e) => {
            tracing::error!(target: "scenario", game_id, error = %e, "isGameInProgress failed")
        }
    }
}

pub async fn print_game_state(client: &FunRoundClient, game_id: u64) {
    match client.game_state(game_id).await {
        Ok(state) => {
            println!("Game {game_id}:");
            println!("  Is active: {}", state.is_active);
            println!("  Players: [{}, {}]", state.players[0], state.players[1]);
            println!(
                "  Has played: [{}, {}]",
                state.has_played[0], state.has_played[1]
            );
        }
        Err(e) => {
            tracing::error!(
                target: "scenario",
                game_id,
                error = %e,
                "Error checking game state"
            );
        }
    }
}

pub async fn print_contract_state(client: &FunRoundClient) {
    match client.overview().await {
        Ok(overview) => {
            println!("Contract owner: {}", overview.owner);
            println!("Next game ID: {}", overview.next_game_id);
        }
        Err(e) => tracing::error!(target: "scenario", error = %e, "Contract state read failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn few_signers_put_the_owner_in_both_slots() {
        assert_eq!(player_slots(1), [0, 0]);
        assert_eq!(player_slots(2), [0, 0]);
        assert_eq!(player_slots(3), [1, 2]);
        assert_eq!(player_slots(5), [1, 2]);
    }
}
