//! CBET Distribution Toolkit
//!
//! Off-chain tooling around the CBET token distribution contract, built on Alloy.
//!
//! # Features
//!
//! - Streaming ingestion of a balances CSV (`address`, `balance_wei`, optional `balance_string`)
//! - Per-row validation against the eligibility ceiling, bad rows are skipped and logged
//! - Order-preserving partitioning into fixed-size airdrop batches
//! - Strictly sequential `airdropTokens` submissions, or a single `closeDistribution`
//! - Gas and timing accounting with partial totals reported on failure
//! - Read-only inspection of the distribution contract state
//!
//! # Example
//!
//! ```rust,no_run
//! use cbet_distribution::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let options = RunOptions {
//!         distribution_address: "0x1F434ed0A09bcE385f28527375FD3E640Fa5C341".parse().unwrap(),
//!         batch_size: 50,
//!         csv_path: "./data/cbet_balances.csv".into(),
//!         network: "development".to_string(),
//!         mode: DriverMode::Airdrop,
//!     };
//!
//!     let runner = DistributionRunner::new(options, Settings::load()?);
//!     let outcome = runner.run().await?;
//!
//!     println!("Batches processed: {}", outcome.stats.batches_processed);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod contract;
pub mod csv_processor;
pub mod driver;
pub mod error;
pub mod inspect;
pub mod provider;
pub mod report;
pub mod runner;
pub mod stats;
pub mod validation;

// Re-export commonly used types
pub use batch::{partition, Batch};
pub use config::{NetworkProfile, Settings, SignerStrategy};
pub use contract::{DistributionContract, DistributionState, OnchainDistribution, ReceiptSummary, TxOptions};
pub use csv_processor::{CsvProcessor, IngestReport};
pub use driver::{DistributionDriver, DriverMode, RunOutcome};
pub use error::{DistributionError, Result};
pub use provider::ProviderManager;
pub use runner::{DistributionRunner, RunOptions};
pub use stats::RunStats;
pub use validation::{BalanceRecord, RowRejection};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{partition, Batch};
    pub use crate::config::Settings;
    pub use crate::contract::{DistributionContract, ReceiptSummary, TxOptions};
    pub use crate::driver::{DistributionDriver, DriverMode, RunOutcome};
    pub use crate::error::{DistributionError, Result};
    pub use crate::runner::{DistributionRunner, RunOptions};
    pub use crate::stats::RunStats;
    pub use alloy::primitives::{Address, U256};
}

/// Initialise `tracing` with an `EnvFilter` (default `info`) and the fmt layer.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
