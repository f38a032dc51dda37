// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! HTTP surface over a [`GameGateway`].

use crate::common::error::AppError;
use crate::common::parsing::parse_address;
use crate::domain::constants::{
    MSG_BALANCE_FAILED, MSG_CONTRACT_FAILED, MSG_GAME_STATE_FAILED, MSG_PLAYERS_FAILED,
    MSG_SUBMIT_FAILED, MSG_SUBMIT_OK, ROUTE_CONTRACT, ROUTE_GAME_STATE, ROUTE_HEALTH,
    ROUTE_PLAYER_BALANCE, ROUTE_PLAYERS, ROUTE_SUBMIT_GAME_RESULT,
};
use crate::services::game::GameGateway;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGameResultRequest {
    pub winner_address: String,
    #[serde(default)]
    pub game_id: Option<u64>,
}

pub fn router<G: GameGateway>(gateway: Arc<G>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(ROUTE_HEALTH, get(health))
        .route(ROUTE_PLAYERS, get(players::<G>))
        .route(ROUTE_SUBMIT_GAME_RESULT, post(submit_game_result::<G>))
        .route(ROUTE_GAME_STATE, get(game_state::<G>))
        .route(ROUTE_PLAYER_BALANCE, get(player_balance::<G>))
        .route(ROUTE_CONTRACT, get(contract_overview::<G>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(gateway)
}

/// Serves until `shutdown` resolves.
pub async fn serve<G, F>(listener: TcpListener, gateway: Arc<G>, shutdown: F) -> Result<(), AppError>
where
    G: GameGateway,
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(target: "api", %addr, "API listening");
    }
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Connection(format!("API server failed: {e}")))
}

/// Binds and serves in the background; returns the bound address.
pub async fn spawn_api<G: GameGateway>(
    addr: SocketAddr,
    gateway: Arc<G>,
) -> Result<SocketAddr, AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Connection(format!("API bind {addr} failed: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| AppError::Connection(format!("API local_addr failed: {e}")))?;

    tokio::spawn(async move {
        if let Err(e) = serve(listener, gateway, std::future::pending()).await {
            tracing::error!(target: "api", error = %e, "API server stopped");
        }
    });
    Ok(local)
}

/// `{ error, details }` used by the read routes.
fn read_failure(message: &str, err: &AppError) -> Response {
    tracing::error!(target: "api", error = %err, "{message}");
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(json!({ "error": message, "details": err.to_string() })),
    )
        .into_response()
}

/// `{ error: true, message, details }` used by the submit route.
fn submit_failure(status: StatusCode, details: String) -> Response {
    tracing::error!(target: "api", %status, details = %details, "{MSG_SUBMIT_FAILED}");
    (
        status,
        Json(json!({
            "error": true,
            "message": MSG_SUBMIT_FAILED,
            "details": details,
        })),
    )
        .into_response()
}

async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

async fn players<G: GameGateway>(State(gateway): State<Arc<G>>) -> Response {
    match gateway.players().await {
        Ok(players) => Json(json!({ "players": players })).into_response(),
        Err(e) => read_failure(MSG_PLAYERS_FAILED, &e),
    }
}

async fn submit_game_result<G: GameGateway>(
    State(gateway): State<Arc<G>>,
    body: Result<Json<SubmitGameResultRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return submit_failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let winner = match parse_address(&request.winner_address) {
        Ok(addr) => addr,
        Err(e) => return submit_failure(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match gateway.submit_game_result(request.game_id, winner).await {
        Ok(result) => {
            tracing::info!(
                target: "api",
                hash = %result.transaction_hash,
                block = ?result.block_number,
                "Game result submitted"
            );
            Json(json!({
                "error": false,
                "message": MSG_SUBMIT_OK,
                "data": result,
            }))
            .into_response()
        }
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            submit_failure(status, e.to_string())
        }
    }
}

async fn game_state<G: GameGateway>(
    State(gateway): State<Arc<G>>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => {
            let err = AppError::validation("id", rejection.body_text());
            return read_failure(MSG_GAME_STATE_FAILED, &err);
        }
    };
    match gateway.game_state(id).await {
        Ok(state) => Json(state).into_response(),
        Err(e) => read_failure(MSG_GAME_STATE_FAILED, &e),
    }
}

async fn player_balance<G: GameGateway>(
    State(gateway): State<Arc<G>>,
    Path(address): Path<String>,
) -> Response {
    let player = match parse_address(&address) {
        Ok(addr) => addr,
        Err(e) => return read_failure(MSG_BALANCE_FAILED, &e),
    };
    match gateway.player_balances(player).await {
        Ok(balances) => Json(balances).into_response(),
        Err(e) => read_failure(MSG_BALANCE_FAILED, &e),
    }
}

async fn contract_overview<G: GameGateway>(State(gateway): State<Arc<G>>) -> Response {
    match gateway.overview().await {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => read_failure(MSG_CONTRACT_FAILED, &e),
    }
}
