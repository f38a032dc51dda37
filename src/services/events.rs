// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Receipt log decoding for FunRound events.

use crate::data::abi::FunRound;
use alloy::primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Deposit {
        game_id: U256,
        player: Address,
        amount: U256,
    },
    UsdtDeposited {
        player: Address,
        amount: U256,
    },
    FeeCollected {
        amount: U256,
    },
    DepositSuccessful {
        player: Address,
        amount: U256,
        new_balance: U256,
    },
    UsdtBet {
        game_id: U256,
        player: Address,
        amount: U256,
    },
    GameStarted {
        game_id: U256,
        player1: Address,
        player2: Address,
    },
    ResultSubmitted {
        game_id: U256,
        player: Address,
        proposed_winner: Address,
    },
    ResultAlreadySubmitted {
        game_id: U256,
        player: Address,
    },
    GameResultSubmitted {
        submitter: Address,
        winner: Address,
    },
    WinningsPaid {
        game_id: U256,
        winner: Address,
        amount: U256,
    },
    GameEnded {
        game_id: U256,
        winner: Address,
    },
}

fn try_decode<E: SolEvent>(log: &Log) -> Option<E> {
    if log.data.topics().first() != Some(&E::SIGNATURE_HASH) {
        return None;
    }
    match E::decode_log_data(&log.data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(
                target: "contract",
                event = E::SIGNATURE,
                error = %e,
                "Event layout mismatch; skipping log"
            );
            None
        }
    }
}

impl GameEvent {
    /// Decodes one log, `None` for foreign or malformed logs.
    pub fn decode(log: &Log) -> Option<Self> {
        if let Some(e) = try_decode::<FunRound::Deposit>(log) {
            return Some(Self::Deposit {
                game_id: e.gameId,
                player: e.player,
                amount: e.amount,
            });
        }
        if let Some(e) = try_decode::<FunRound::USDTDeposited>(log) {
            return Some(Self::UsdtDeposited {
                player: e.player,
                amount: e.amount,
            });
        }
        if let Some(e) = try_decode::<FunRound::FeeCollected>(log) {
            return Some(Self::FeeCollected { amount: e.amount });
        }
        if let Some(e) = try_decode::<FunRound::DepositSuccessful>(log) {
            return Some(Self::DepositSuccessful {
                player: e.player,
                amount: e.amount,
                new_balance: e.newBalance,
            });
        }
        if let Some(e) = try_decode::<FunRound::USDTBet>(log) {
            return Some(Self::UsdtBet {
                game_id: e.gameId,
                player: e.player,
                amount: e.amount,
            });
        }
        if let Some(e) = try_decode::<FunRound::GameStarted>(log) {
            return Some(Self::GameStarted {
                game_id: e.gameId,
                player1: e.player1,
                player2: e.player2,
            });
        }
        if let Some(e) = try_decode::<FunRound::ResultSubmitted>(log) {
            return Some(Self::ResultSubmitted {
                game_id: e.gameId,
                player: e.player,
                proposed_winner: e.proposedWinner,
            });
        }
        if let Some(e) = try_decode::<FunRound::ResultAlreadySubmitted>(log) {
            return Some(Self::ResultAlreadySubmitted {
                game_id: e.gameId,
                player: e.player,
            });
        }
        if let Some(e) = try_decode::<FunRound::GameResultSubmitted>(log) {
            return Some(Self::GameResultSubmitted {
                submitter: e.submitter,
                winner: e.winner,
            });
        }
        if let Some(e) = try_decode::<FunRound::WinningsPaid>(log) {
            return Some(Self::WinningsPaid {
                game_id: e.gameId,
                winner: e.winner,
                amount: e.amount,
            });
        }
        try_decode::<FunRound::GameEnded>(log).map(|e| Self::GameEnded {
            game_id: e.gameId,
            winner: e.winner,
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Deposit {
                game_id,
                player,
                amount,
            } => format!("Deposit game={game_id} player={player} amount={amount}"),
            Self::UsdtDeposited { player, amount } => {
                format!("USDTDeposited player={player} amount={amount}")
            }
            Self::FeeCollected { amount } => format!("FeeCollected amount={amount}"),
            Self::DepositSuccessful {
                player,
                amount,
                new_balance,
            } => format!("DepositSuccessful player={player} amount={amount} balance={new_balance}"),
            Self::UsdtBet {
                game_id,
                player,
                amount,
            } => format!("USDTBet game={game_id} player={player} amount={amount}"),
            Self::GameStarted {
                game_id,
                player1,
                player2,
            } => format!("GameStarted game={game_id} players={player1},{player2}"),
            Self::ResultSubmitted {
                game_id,
                player,
                proposed_winner,
            } => format!("ResultSubmitted game={game_id} by={player} winner={proposed_winner}"),
            Self::ResultAlreadySubmitted { game_id, player } => {
                format!("ResultAlreadySubmitted game={game_id} by={player}")
            }
            Self::GameResultSubmitted { submitter, winner } => {
                format!("GameResultSubmitted submitter={submitter} winner={winner}")
            }
            Self::WinningsPaid {
                game_id,
                winner,
                amount,
            } => format!("WinningsPaid game={game_id} winner={winner} amount={amount}"),
            Self::GameEnded { game_id, winner } => {
                format!("GameEnded game={game_id} winner={winner}")
            }
        }
    }
}

pub fn decode_game_events(logs: &[Log]) -> Vec<GameEvent> {
    logs.iter().filter_map(GameEvent::decode).collect()
}

/// Game id assigned by a `joinGame`, read from its `Deposit` log.
pub fn deposit_game_id(events: &[GameEvent], player: Address) -> Option<U256> {
    events.iter().find_map(|e| match e {
        GameEvent::Deposit {
            game_id, player: p, ..
        } if *p == player => Some(*game_id),
        _ => None,
    })
}

/// `(submitter, winner)` reported by a result submission.
///
/// Prefers `GameResultSubmitted`; deployments that only emit
/// `ResultSubmitted(gameId, player, proposedWinner)` fall back to that.
pub fn result_submission(events: &[GameEvent]) -> Option<(Address, Address)> {
    let summary = events.iter().find_map(|e| match e {
        GameEvent::GameResultSubmitted { submitter, winner } => Some((*submitter, *winner)),
        _ => None,
    });
    summary.or_else(|| {
        events.iter().find_map(|e| match e {
            GameEvent::ResultSubmitted {
                player,
                proposed_winner,
                ..
            } => Some((*player, *proposed_winner)),
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{B256, Bytes, LogData};

    fn log_of<E: SolEvent>(event: &E) -> Log {
        Log {
            address: Address::repeat_byte(0x42),
            data: event.encode_log_data(),
        }
    }

    #[test]
    fn decodes_join_deposit_and_game_id() {
        let player = Address::repeat_byte(0x11);
        let logs = vec![
            log_of(&FunRound::FeeCollected {
                amount: U256::from(10u64),
            }),
            log_of(&FunRound::Deposit {
                gameId: U256::from(3u64),
                player,
                amount: U256::from(20_000_000_000_000_000u64),
            }),
        ];
        let events = decode_game_events(&logs);
        assert_eq!(events.len(), 2);
        assert_eq!(deposit_game_id(&events, player), Some(U256::from(3u64)));
        assert_eq!(deposit_game_id(&events, Address::repeat_byte(0x22)), None);
    }

    #[test]
    fn result_submission_is_extracted() {
        let submitter = Address::repeat_byte(0x01);
        let winner = Address::repeat_byte(0x02);
        let logs = vec![
            log_of(&FunRound::ResultSubmitted {
                gameId: U256::from(1u64),
                player: submitter,
                proposedWinner: winner,
            }),
            log_of(&FunRound::GameResultSubmitted { submitter, winner }),
        ];
        let events = decode_game_events(&logs);
        assert_eq!(result_submission(&events), Some((submitter, winner)));
        assert!(events[0].describe().starts_with("ResultSubmitted game=1"));
    }

    #[test]
    fn per_player_submission_reports_proposed_winner() {
        let player = Address::repeat_byte(0x01);
        let proposed = Address::repeat_byte(0x02);
        let logs = vec![log_of(&FunRound::ResultSubmitted {
            gameId: U256::ZERO,
            player,
            proposedWinner: proposed,
        })];
        let events = decode_game_events(&logs);
        assert_eq!(events.len(), 1);
        assert_eq!(result_submission(&events), Some((player, proposed)));
    }

    #[test]
    fn aggregate_event_wins_over_per_player_event() {
        let logs = vec![
            log_of(&FunRound::ResultSubmitted {
                gameId: U256::from(4u64),
                player: Address::repeat_byte(0x03),
                proposedWinner: Address::repeat_byte(0x04),
            }),
            log_of(&FunRound::GameResultSubmitted {
                submitter: Address::repeat_byte(0x05),
                winner: Address::repeat_byte(0x06),
            }),
        ];
        let events = decode_game_events(&logs);
        assert_eq!(
            result_submission(&events),
            Some((Address::repeat_byte(0x05), Address::repeat_byte(0x06)))
        );
        assert_eq!(result_submission(&[]), None);
    }

    #[test]
    fn foreign_and_malformed_logs_are_skipped() {
        let foreign = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x99)], Bytes::new()),
        };
        let truncated = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(
                vec![FunRound::GameEnded::SIGNATURE_HASH],
                Bytes::from(vec![0u8; 4]),
            ),
        };
        assert!(decode_game_events(&[foreign, truncated]).is_empty());
    }
}
