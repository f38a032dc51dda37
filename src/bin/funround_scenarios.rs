// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use clap::{Parser, Subcommand};
use funround_gateway::app::config::GlobalSettings;
use funround_gateway::app::logging::setup_logging;
use funround_gateway::common::parsing::parse_address;
use funround_gateway::common::units::{format_ether, format_usdt, parse_ether, parse_usdt};
use funround_gateway::domain::constants::{
    DEFAULT_JOIN_DEPOSIT, DEFAULT_MOCK_USDT_MINT, DEFAULT_USDT_APPROVAL, native_symbol,
};
use funround_gateway::domain::error::AppError;
use funround_gateway::services::game::{FunRoundClient, GameGateway};
use funround_gateway::services::scenarios;
use funround_gateway::services::session::Session;
use funround_gateway::services::token::MockUsdtClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manual FunRound walkthroughs against a node")]
struct Cli {
    /// Path to config file (default: config.* detection)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Signer index in WALLET_KEYS used by single-signer commands.
    #[arg(long, global = true, default_value_t = 0)]
    signer: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// First three signers each join a game.
    Join {
        #[arg(long, default_value = DEFAULT_JOIN_DEPOSIT)]
        deposit: String,
    },
    /// Two players join one game and both submit a result.
    Play {
        #[arg(long, default_value = DEFAULT_JOIN_DEPOSIT)]
        deposit: String,
    },
    /// MockUSDT mint, approve, deposit and bet for two players.
    Usdt {
        #[arg(long, default_value = DEFAULT_MOCK_USDT_MINT)]
        mint: String,
        #[arg(long, default_value = "100")]
        deposit: String,
        #[arg(long, default_value = "10")]
        bet: String,
    },
    /// Wallet view for one signer.
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Print the state of one game.
    State { game_id: u64 },
    /// Owner collects accumulated fees.
    WithdrawFees,
    /// Owner resets a stuck game.
    ResetGame { game_id: u64 },
    /// Contract owner, next game id and balance.
    Overview,
}

#[derive(Subcommand, Debug)]
enum WalletAction {
    /// Native, in-game and token balances.
    Balances {
        #[arg(long)]
        address: Option<String>,
    },
    /// Mint MockUSDT to the signer (or `--to`).
    Mint {
        #[arg(long, default_value = DEFAULT_MOCK_USDT_MINT)]
        amount: String,
        #[arg(long)]
        to: Option<String>,
    },
    /// Approve FunRound to pull MockUSDT.
    Approve {
        #[arg(long, default_value = DEFAULT_USDT_APPROVAL)]
        amount: String,
    },
    /// Deposit MockUSDT into FunRound.
    Deposit {
        #[arg(long)]
        amount: String,
    },
}

fn token_for(client: &FunRoundClient) -> Result<&MockUsdtClient, AppError> {
    client.usdt().ok_or_else(|| {
        AppError::Config("MockUSDT address unknown: set USDT_ADDRESS or deploy with the token".into())
    })
}

async fn run_wallet(
    session: &Session,
    client: &FunRoundClient,
    action: WalletAction,
) -> Result<(), AppError> {
    let me = client.signer_address();
    match action {
        WalletAction::Balances { address } => {
            let who = match address {
                Some(raw) => parse_address(&raw)?,
                None => me.ok_or_else(AppError::no_signer)?,
            };
            let balances = client.player_balances(who).await?;
            println!("Address: {}", balances.address);
            println!(
                "Native balance: {} {}",
                balances.native,
                native_symbol(session.chain_id)
            );
            println!("Game balance (wei): {}", balances.game_balance_wei);
            let usdt_game = client.player_usdt_balance(who).await?;
            println!("Game USDT balance: {}", format_usdt(usdt_game));
            if let Some(token) = client.usdt() {
                println!("USDT balance: {}", format_usdt(token.balance_of(who).await?));
                let allowance = token.allowance(who, client.address()).await?;
                println!("USDT allowance: {}", format_usdt(allowance));
            }
        }
        WalletAction::Mint { amount, to } => {
            let to = match to {
                Some(raw) => parse_address(&raw)?,
                None => me.ok_or_else(AppError::no_signer)?,
            };
            let amount = parse_usdt(&amount)?;
            let tx = token_for(client)?.mint(to, amount).await?;
            println!("{} MockUSDT minted to {to} ({:#x})", format_usdt(amount), tx.hash);
        }
        WalletAction::Approve { amount } => {
            let amount = parse_usdt(&amount)?;
            let tx = token_for(client)?.approve(client.address(), amount).await?;
            println!("MockUSDT approved: {} ({:#x})", format_usdt(amount), tx.hash);
        }
        WalletAction::Deposit { amount } => {
            let units = parse_usdt(&amount)?;
            let tx = client.deposit_usdt(units).await?;
            println!("{} USDT deposited successfully ({:#x})", format_usdt(units), tx.hash);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), settings.log_json);

    let session = Session::open(settings).await?;
    let owner = session.fun_round()?;
    // Without keys only the read commands work; sends report the missing signer.
    let client = if session.signer_count() == 0 {
        session.fun_round()?
    } else {
        owner.connect(session.sender(cli.signer)?)
    };

    match cli.command {
        Command::Join { deposit } => {
            scenarios::join(&session, parse_ether(&deposit)?).await?;
        }
        Command::Play { deposit } => {
            scenarios::play(&session, parse_ether(&deposit)?).await?;
        }
        Command::Usdt { mint, deposit, bet } => {
            scenarios::usdt(
                &session,
                parse_usdt(&mint)?,
                parse_usdt(&deposit)?,
                parse_usdt(&bet)?,
            )
            .await?;
        }
        Command::Wallet { action } => run_wallet(&session, &client, action).await?,
        Command::State { game_id } => scenarios::print_game_state(&client, game_id).await,
        Command::WithdrawFees => {
            let before = owner.contract_balance().await?;
            let tx = owner.withdraw_fees().await?;
            let after = owner.contract_balance().await?;
            println!(
                "Fees withdrawn ({:#x}); contract balance {} -> {} {}",
                tx.hash,
                format_ether(before),
                format_ether(after),
                native_symbol(session.chain_id)
            );
        }
        Command::ResetGame { game_id } => {
            let tx = owner.reset_game(game_id).await?;
            println!("Game {game_id} reset ({:#x})", tx.hash);
            scenarios::print_game_state(&owner, game_id).await;
        }
        Command::Overview => {
            let overview = owner.overview().await?;
            println!("Contract: {}", overview.address);
            println!("Chain id: {}", overview.chain_id);
            println!("Contract owner: {}", overview.owner);
            println!("Next game ID: {}", overview.next_game_id);
            println!(
                "Contract balance: {} {}",
                format_ether(owner.contract_balance().await?),
                native_symbol(session.chain_id)
            );
        }
    }
    Ok(())
}
