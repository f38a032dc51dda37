// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy_sol_types::SolValue;
use clap::Parser;
use funround_gateway::app::config::GlobalSettings;
use funround_gateway::app::logging::setup_logging;
use funround_gateway::common::parsing::parse_address;
use funround_gateway::common::units::{format_ether, parse_usdt};
use funround_gateway::data::artifacts::ContractArtifact;
use funround_gateway::data::deployments::{
    DeployedAddresses, write_deployed_address, write_deployed_addresses,
};
use funround_gateway::domain::constants::{
    DEFAULT_MOCK_USDT_SUPPLY, FUN_ROUND_CONTRACT, MOCK_USDT_CONTRACT, native_symbol,
};
use funround_gateway::domain::error::AppError;
use funround_gateway::services::session::Session;
use funround_gateway::services::tx::TxSender;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deploy FunRound (and optionally MockUSDT)")]
struct Cli {
    /// Path to config file (default: config.* detection)
    #[arg(long)]
    config: Option<String>,

    /// Deploy a fresh MockUSDT and wire it into FunRound.
    #[arg(long, default_value_t = false)]
    with_usdt: bool,

    /// MockUSDT initial supply, in whole USDT.
    #[arg(long, default_value = DEFAULT_MOCK_USDT_SUPPLY)]
    initial_supply: String,

    /// Existing stake token to pass to the FunRound constructor.
    #[arg(long, conflicts_with = "with_usdt")]
    usdt_address: Option<String>,
}

/// Constructor arguments for `artifact`, or empty when it takes none.
fn constructor_args<T: SolValue>(
    artifact: &ContractArtifact,
    value: Option<T>,
) -> Result<Vec<u8>, AppError> {
    match (artifact.constructor_arity(), value) {
        (0, _) => Ok(Vec::new()),
        (1, Some(v)) => Ok(v.abi_encode()),
        (1, None) => Err(AppError::Config(format!(
            "{} constructor takes an argument that was not provided",
            artifact.name
        ))),
        (n, _) => Err(AppError::Config(format!(
            "{} constructor takes {} arguments; only 0 or 1 supported",
            artifact.name, n
        ))),
    }
}

async fn deploy(
    sender: &TxSender,
    artifact: &ContractArtifact,
    args: &[u8],
) -> Result<Address, AppError> {
    tracing::info!(
        target: "deploy",
        contract = %artifact.name,
        bytecode_len = artifact.bytecode.len(),
        args_len = args.len(),
        "Deploying"
    );
    let sent = sender
        .deploy(&artifact.name, artifact.init_code(args))
        .await?;
    sent.contract_address.ok_or_else(|| AppError::Transaction {
        hash: format!("{:#x}", sent.hash),
        reason: "receipt carries no contract address".into(),
    })
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), settings.log_json);

    let session = Session::open(settings).await?;
    let deployer = session.owner()?;
    let symbol = native_symbol(session.chain_id);
    println!(
        "Deploying contracts with the account: {}",
        deployer.address()
    );
    let balance = session
        .provider
        .get_balance(deployer.address())
        .await
        .map_err(|e| AppError::Connection(format!("eth_getBalance failed: {e}")))?;
    println!("Account balance: {} {symbol}", format_ether(balance));

    let usdt = if cli.with_usdt {
        let token = session.artifacts.load(MOCK_USDT_CONTRACT)?;
        let supply = parse_usdt(&cli.initial_supply)?;
        let args = constructor_args(&token, Some(supply))?;
        let address = deploy(&deployer, &token, &args).await?;
        println!("MockUSDT deployed to: {address}");
        Some(address)
    } else {
        match cli.usdt_address.as_deref() {
            Some(raw) => Some(parse_address(raw)?),
            None => session.settings.usdt_address()?,
        }
    };

    let fun_round = session.artifacts.load(FUN_ROUND_CONTRACT)?;
    let args = constructor_args(&fun_round, usdt)?;
    let address = deploy(&deployer, &fun_round, &args).await?;
    println!("FunRound deployed to: {address}");

    write_deployed_address(&session.settings.deployed_address_path, address)?;
    let merged = write_deployed_addresses(
        &session.settings.deployed_addresses_path,
        &DeployedAddresses {
            fun_round: Some(address),
            mock_usdt: usdt,
        },
    )?;
    tracing::info!(
        target: "deploy",
        fun_round = %address,
        mock_usdt = ?merged.mock_usdt,
        txt = %session.settings.deployed_address_path,
        json = %session.settings.deployed_addresses_path,
        "Deployment recorded"
    );
    Ok(())
}
