// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use crate::common::retry::retry_read;
use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, AppError> {
        let url =
            Url::parse(rpc_url).map_err(|e| AppError::Config(format!("Invalid RPC URL: {}", e)))?;

        let provider = RootProvider::new_http(url);
        Ok(provider)
    }

    pub async fn chain_id(provider: &HttpProvider) -> Result<u64, AppError> {
        retry_read(|_| {
            let provider = provider.clone();
            async move { provider.get_chain_id().await }
        })
        .await
        .map_err(|e| AppError::Connection(format!("chain_id detect failed: {e}")))
    }

    /// Connects over HTTP and checks the node serves the expected chain.
    pub async fn connect(
        rpc_url: &str,
        expected_chain: Option<u64>,
    ) -> Result<(HttpProvider, u64), AppError> {
        let provider = Self::http(rpc_url)?;
        let chain_id = Self::chain_id(&provider).await?;
        if let Some(expected) = expected_chain
            && expected != chain_id
        {
            return Err(AppError::Config(format!(
                "RPC {} serves chain {} but chain_id {} is configured",
                rpc_url, chain_id, expected
            )));
        }
        tracing::info!(target: "rpc", chain_id, rpc = %rpc_url, "Connected to node");
        Ok((provider, chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_urls() {
        assert!(matches!(
            ConnectionFactory::http("not a url"),
            Err(AppError::Config(_))
        ));
        assert!(ConnectionFactory::http("http://127.0.0.1:8545").is_ok());
    }
}
