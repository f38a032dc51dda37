// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::common::retry::retry_read;
use crate::network::provider::HttpProvider;
use alloy::primitives::Address;
use alloy::providers::Provider;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tracks the next nonce for one signer across sequential sends.
#[derive(Clone)]
pub struct NonceManager {
    provider: HttpProvider,
    address: Address,
    next: Arc<Mutex<Option<u64>>>,
}

impl NonceManager {
    pub fn new(provider: HttpProvider, address: Address) -> Self {
        Self {
            provider,
            address,
            next: Arc::new(Mutex::new(None)),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<u64>> {
        self.next.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn next_nonce(&self) -> Result<u64, AppError> {
        if let Some(cached) = *self.slot() {
            return Ok(cached);
        }
        let on_chain = self.fetch_pending().await?;
        *self.slot() = Some(on_chain);
        Ok(on_chain)
    }

    /// Record a broadcast so the following send uses `nonce + 1`.
    pub fn mark_used(&self, nonce: u64) {
        let mut slot = self.slot();
        let candidate = nonce.saturating_add(1);
        *slot = Some(slot.map_or(candidate, |cur| cur.max(candidate)));
    }

    /// Forget the cached value; the next send refetches from the node.
    pub fn invalidate(&self) {
        *self.slot() = None;
    }

    pub async fn resync(&self) -> Result<u64, AppError> {
        let on_chain = self.fetch_pending().await?;
        tracing::debug!(target: "tx", address = %self.address, nonce = on_chain, "Nonce resynced");
        *self.slot() = Some(on_chain);
        Ok(on_chain)
    }

    async fn fetch_pending(&self) -> Result<u64, AppError> {
        let provider = self.provider.clone();
        let address = self.address;
        retry_read(move |_| {
            let provider = provider.clone();
            async move { provider.get_transaction_count(address).pending().await }
        })
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn manager() -> NonceManager {
        let provider = HttpProvider::new_http(Url::parse("http://127.0.0.1:1").unwrap());
        NonceManager::new(provider, Address::ZERO)
    }

    #[tokio::test]
    async fn cached_nonce_advances_without_rpc() {
        let nonces = manager();
        nonces.mark_used(4);
        assert_eq!(nonces.next_nonce().await.unwrap(), 5);
        nonces.mark_used(5);
        assert_eq!(nonces.next_nonce().await.unwrap(), 6);
        // A stale confirmation never moves the cursor backwards.
        nonces.mark_used(2);
        assert_eq!(nonces.next_nonce().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn invalidated_nonce_hits_the_node() {
        let nonces = manager();
        nonces.mark_used(1);
        nonces.invalidate();
        assert!(matches!(
            nonces.next_nonce().await,
            Err(AppError::Connection(_))
        ));
    }
}
