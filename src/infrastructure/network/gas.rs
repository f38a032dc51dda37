// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::retry::retry_read;
use crate::common::units::gwei_to_wei;
use crate::domain::constants::GAS_ESTIMATE_HEADROOM_BPS;
use crate::network::provider::HttpProvider;
use alloy::providers::Provider;
use alloy::rpc::types::BlockNumberOrTag;
use std::sync::{Arc, Mutex};

/// How fees are chosen for outgoing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPolicy {
    /// Fixed legacy gas price, as pinned in the Hardhat network config.
    Legacy { gas_price: u128 },
    /// EIP-1559 fees derived from recent fee history.
    Eip1559,
}

impl GasPolicy {
    /// `0` gwei selects EIP-1559 estimation.
    pub fn from_gwei(gas_price_gwei: u64) -> Self {
        if gas_price_gwei == 0 {
            GasPolicy::Eip1559
        } else {
            GasPolicy::Legacy {
                gas_price: gwei_to_wei(gas_price_gwei),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeQuote {
    Legacy {
        gas_price: u128,
    },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

#[derive(Clone)]
pub struct GasOracle {
    provider: HttpProvider,
    policy: GasPolicy,
    last_good: Arc<Mutex<Option<FeeQuote>>>,
}

impl GasOracle {
    pub fn new(provider: HttpProvider, policy: GasPolicy) -> Self {
        Self {
            provider,
            policy,
            last_good: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn quote(&self) -> Result<FeeQuote, AppError> {
        match self.policy {
            GasPolicy::Legacy { gas_price } => Ok(FeeQuote::Legacy { gas_price }),
            GasPolicy::Eip1559 => match self.eip1559_from_history().await {
                Ok(fees) => {
                    if let Ok(mut guard) = self.last_good.lock() {
                        *guard = Some(fees);
                    }
                    Ok(fees)
                }
                Err(e) => {
                    tracing::warn!(target: "gas", error = %e, "Fee history unavailable");
                    if let Ok(guard) = self.last_good.lock()
                        && let Some(fees) = *guard
                    {
                        return Ok(fees);
                    }
                    self.fallback_gas_price().await
                }
            },
        }
    }

    async fn eip1559_from_history(&self) -> Result<FeeQuote, AppError> {
        let provider = self.provider.clone();
        let history = retry_read(move |_| {
            let provider = provider.clone();
            async move {
                provider
                    .get_fee_history(5, BlockNumberOrTag::Latest, &[50.0f64])
                    .await
            }
        })
        .await
        .map_err(|e| AppError::Connection(format!("fee history failed: {e}")))?;

        let base_fee = history.next_block_base_fee().ok_or_else(|| {
            AppError::Connection("fee history returned no base fee (pre-London chain?)".into())
        })?;
        let rewards: Vec<u128> = history
            .reward
            .unwrap_or_default()
            .iter()
            .filter_map(|row| row.first().copied())
            .collect();
        let priority = if rewards.is_empty() {
            self.provider
                .get_max_priority_fee_per_gas()
                .await
                .map_err(|e| AppError::Connection(format!("priority fee failed: {e}")))?
        } else {
            median(rewards)
        };
        Ok(eip1559_fees(base_fee, priority))
    }

    async fn fallback_gas_price(&self) -> Result<FeeQuote, AppError> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| AppError::Connection(format!("gas price failed: {e}")))?;
        Ok(FeeQuote::Legacy { gas_price })
    }
}

/// Leaves room for two full blocks of base-fee growth.
pub fn eip1559_fees(next_base_fee: u128, priority_fee: u128) -> FeeQuote {
    FeeQuote::Eip1559 {
        max_fee_per_gas: next_base_fee.saturating_mul(2).saturating_add(priority_fee),
        max_priority_fee_per_gas: priority_fee,
    }
}

/// Pads a node gas estimate and clamps it to the configured ceiling.
pub fn gas_limit_with_headroom(estimate: u64, cap: u64) -> u64 {
    let padded = (u128::from(estimate) * u128::from(GAS_ESTIMATE_HEADROOM_BPS) / 10_000) as u64;
    padded.max(estimate).min(cap.max(1))
}

fn median(mut values: Vec<u128>) -> u128 {
    values.sort_unstable();
    values[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn zero_gwei_selects_eip1559() {
        assert_eq!(GasPolicy::from_gwei(0), GasPolicy::Eip1559);
        assert_eq!(
            GasPolicy::from_gwei(3),
            GasPolicy::Legacy {
                gas_price: 3_000_000_000
            }
        );
    }

    #[tokio::test]
    async fn legacy_quote_needs_no_rpc() {
        let provider = HttpProvider::new_http(Url::parse("http://127.0.0.1:1").unwrap());
        let oracle = GasOracle::new(provider, GasPolicy::from_gwei(3));
        assert_eq!(
            oracle.quote().await.unwrap(),
            FeeQuote::Legacy {
                gas_price: 3_000_000_000
            }
        );
    }

    #[test]
    fn eip1559_doubles_base_fee() {
        assert_eq!(
            eip1559_fees(10, 2),
            FeeQuote::Eip1559 {
                max_fee_per_gas: 22,
                max_priority_fee_per_gas: 2
            }
        );
    }

    #[test]
    fn headroom_is_capped() {
        assert_eq!(gas_limit_with_headroom(100_000, 8_000_000), 120_000);
        assert_eq!(gas_limit_with_headroom(7_500_000, 8_000_000), 8_000_000);
        assert_eq!(gas_limit_with_headroom(21_000, 0), 1);
    }

    #[test]
    fn median_picks_middle() {
        assert_eq!(median(vec![5, 1, 3]), 3);
        assert_eq!(median(vec![4]), 4);
    }
}
