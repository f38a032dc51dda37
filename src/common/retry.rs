// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::domain::constants::{READ_RETRY_ATTEMPTS, READ_RETRY_DELAY_MS};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry an async operation with exponential backoff.
pub async fn retry_async<F, Fut, T, E>(
    op: F,
    attempts: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_async_when(op, attempts, initial_delay, |_| true).await
}

/// Like [`retry_async`], but gives up at once when `retryable` says the error is final.
pub async fn retry_async_when<F, Fut, T, E, P>(
    mut op: F,
    attempts: usize,
    initial_delay: Duration,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut delay = initial_delay;
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts && retryable(&e) => {
                tracing::debug!(
                    target: "rpc",
                    attempt,
                    attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying RPC read"
                );
                sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Node wording for a deterministic EVM revert (`execution reverted`,
/// Hardhat's `reverted with reason string`).
pub fn is_revert_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("revert")
}

/// Read-only contract calls share one retry budget. Never wrap sends in this.
/// Reverts answer the same on every attempt and are returned immediately.
pub async fn retry_read<F, Fut, T, E>(op: F) -> Result<T, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_async_when(
        op,
        READ_RETRY_ATTEMPTS,
        Duration::from_millis(READ_RETRY_DELAY_MS),
        |e| !is_revert_message(&e.to_string()),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn retries_until_success() {
        let counter = AtomicUsize::new(0);
        let res: Result<u32, String> = retry_async(
            |_| {
                let current = counter.fetch_add(1, Ordering::Relaxed);
                async move {
                    if current < 2 {
                        Err("node busy".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            4,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(res.unwrap(), 7);
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let counter = AtomicUsize::new(0);
        let res: Result<(), String> = retry_async(
            |attempt| {
                counter.fetch_add(1, Ordering::Relaxed);
                async move { Err(format!("attempt {attempt} failed")) }
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(res.unwrap_err(), "attempt 2 failed");
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn reads_stop_at_first_revert() {
        let counter = AtomicUsize::new(0);
        let res: Result<(), String> = retry_read(|_| {
            counter.fetch_add(1, Ordering::Relaxed);
            async { Err("execution reverted: Game does not exist".to_string()) }
        })
        .await;

        assert!(res.unwrap_err().contains("Game does not exist"));
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn reads_retry_transport_failures() {
        let counter = AtomicUsize::new(0);
        let res: Result<(), String> = retry_read(|_| {
            counter.fetch_add(1, Ordering::Relaxed);
            async { Err("error sending request: connection reset".to_string()) }
        })
        .await;

        assert!(res.is_err());
        assert_eq!(counter.load(Ordering::Relaxed), READ_RETRY_ATTEMPTS);
    }

    #[test]
    fn revert_wording_is_recognized() {
        assert!(is_revert_message(
            "server returned an error response: error code 3: execution reverted"
        ));
        assert!(is_revert_message(
            "VM Exception while processing transaction: reverted with reason string 'Not owner'"
        ));
        assert!(!is_revert_message("connection refused"));
    }
}
