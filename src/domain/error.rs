// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Contract call {method} failed: {reason}")]
    Contract { method: String, reason: String },

    #[error("Transaction failed: {hash}, reason: {reason}")]
    Transaction { hash: String, reason: String },

    #[error("Execution reverted: {reason}")]
    Reverted { reason: String },

    #[error("Timed out waiting for {what} after {waited_ms}ms")]
    Timeout { what: String, waited_ms: u64 },

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    pub fn contract(method: &str, reason: impl std::fmt::Display) -> Self {
        AppError::Contract {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// A send attempted on a client started without signer keys.
    pub fn no_signer() -> Self {
        AppError::Config(
            "No signer configured: set WALLET_KEYS or PRIVATE_KEY to send transactions".into(),
        )
    }

    /// Caller-side mistakes, as opposed to node or contract failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation { .. } | AppError::InvalidAddress(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// For I/O failures with no useful path; prefer [`AppError::io`] when one is known.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io {
            path: "<unknown>".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Initialization(format!("JSON decode failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_errors_convert_with_and_without_path() {
        let bare: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(bare, AppError::Io { .. }));
        assert!(bare.to_string().contains("gone"));

        let located = AppError::io("deployed-address.txt", io::Error::other("denied"));
        assert_eq!(
            located.to_string(),
            "I/O error on deployed-address.txt: denied"
        );
    }

    #[test]
    fn only_input_errors_are_client_errors() {
        assert!(AppError::validation("gameId", "too big").is_client_error());
        assert!(AppError::InvalidAddress("0x12".into()).is_client_error());
        assert!(!AppError::no_signer().is_client_error());
        assert!(
            !AppError::Reverted {
                reason: "Not a player in this game".into()
            }
            .is_client_error()
        );
    }
}
