// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use clap::Parser;
use funround_gateway::app::config::GlobalSettings;
use funround_gateway::app::logging::setup_logging;
use funround_gateway::domain::error::AppError;
use funround_gateway::services::api;
use funround_gateway::services::session::Session;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(author, version, about = "FunRound HTTP gateway")]
struct Cli {
    /// Path to config file (default: config.* detection)
    #[arg(long)]
    config: Option<String>,

    /// Bind address (overrides config/env)
    #[arg(long)]
    bind: Option<String>,

    /// Listen port (overrides config/env)
    #[arg(long)]
    port: Option<u16>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(target: "api", error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(target: "api", error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!(target: "api", "Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), settings.log_json);

    let addr = settings.api_socket_addr(cli.bind.as_deref(), cli.port)?;
    let session = Session::open(settings).await?;
    let client = session.fun_round()?;
    tracing::info!(
        target: "api",
        contract = %client.address(),
        signers = ?session.signer_addresses(),
        chain_id = session.chain_id,
        usdt = ?client.usdt().map(|t| t.address()),
        "FunRound gateway starting"
    );
    if client.signer_address().is_none() {
        tracing::warn!(
            target: "api",
            "No WALLET_KEYS configured; serving reads only, result submission will fail"
        );
    }

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Connection(format!("API bind {addr} failed: {e}")))?;
    api::serve(listener, Arc::new(client), shutdown_signal()).await?;

    tracing::info!(target: "api", "Gateway stopped");
    Ok(())
}
