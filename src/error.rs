//! Error types for the distribution toolkit

use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, DistributionError>;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid command line or file input
    #[error("Invalid input: {0}")]
    Input(String),

    /// CSV reader error
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Contract call error
    #[error("Contract call error: {0}")]
    Contract(String),

    /// Transaction submission error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Transaction was mined but reverted
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    /// Configured signer cannot send as the contract owner
    #[error("Signer cannot send transactions as contract owner {owner}")]
    Unauthorized { owner: Address },
}
