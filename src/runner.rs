//! Distribution run orchestration

use std::path::PathBuf;

use alloy::primitives::Address;
use tracing::{error, info, warn};

use crate::batch::{self, Batch};
use crate::cli::DistributionCli;
use crate::config::Settings;
use crate::constants::{ELIGIBILITY_CEILING_WEI, MIN_BATCH_SIZE};
use crate::contract::OnchainDistribution;
use crate::csv_processor::CsvProcessor;
use crate::driver::{DistributionDriver, DriverMode, RunOutcome};
use crate::error::{DistributionError, Result};
use crate::provider::ProviderManager;
use crate::report;
use crate::stats::RunStats;
use crate::validation::parse_account_address;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub distribution_address: Address,
    pub batch_size: usize,
    pub csv_path: PathBuf,
    pub network: String,
    pub mode: DriverMode,
}

impl RunOptions {
    /// Validate command line input. The distribution address must already be present.
    pub fn from_cli(cli: &DistributionCli) -> Result<Self> {
        let raw_address = cli
            .distribution_address
            .as_deref()
            .ok_or_else(|| DistributionError::Input("Distribution contract address is required".to_string()))?;

        let distribution_address = parse_account_address(raw_address)
            .ok_or_else(|| DistributionError::Input(format!("{} is not a valid address", raw_address)))?;

        if cli.batch_size < MIN_BATCH_SIZE {
            return Err(DistributionError::Input(format!(
                "Batch size must be at least {}",
                MIN_BATCH_SIZE
            )));
        }

        let mode = if cli.just_close {
            DriverMode::Close
        } else {
            DriverMode::Airdrop
        };

        Ok(Self {
            distribution_address,
            batch_size: cli.batch_size,
            csv_path: cli.csv.clone(),
            network: cli.network.clone(),
            mode,
        })
    }
}

pub struct DistributionRunner {
    options: RunOptions,
    settings: Settings,
}

impl DistributionRunner {
    pub fn new(options: RunOptions, settings: Settings) -> Self {
        Self { options, settings }
    }

    /// Read and batch the balances file. Close mode needs no batches.
    pub fn plan(&self) -> Result<Vec<Batch>> {
        if self.options.mode == DriverMode::Close {
            info!("Close mode selected, balances file is not read");
            return Ok(Vec::new());
        }

        report::print_banner(&self.options.csv_path);

        let ingest = CsvProcessor::read_balances(&self.options.csv_path, ELIGIBILITY_CEILING_WEI)?;
        for (reason, count) in &ingest.rejected {
            warn!("Skipped {} rows: {}", count, reason);
        }

        batch::partition(&ingest.records, self.options.batch_size)
    }

    /// Run the distribution end to end.
    ///
    /// Input errors (unreadable balances file) are returned before anything is sent.
    /// Failures while connecting, resolving the owner or submitting are logged and
    /// reported together with the partial totals.
    pub async fn run(&self) -> Result<RunOutcome> {
        let batches = self.plan()?;
        report::print_plan(&batches, self.options.distribution_address);

        let outcome = match self.connect().await {
            Ok(contract) => {
                let gas_price = contract.provider_manager().gas_price();
                DistributionDriver::new(&contract, gas_price)
                    .run(self.options.mode, &batches)
                    .await
            }
            Err(e) => {
                error!("Failed to set up distribution contract: {}", e);
                RunOutcome {
                    stats: RunStats::new(),
                    error: Some(e),
                }
            }
        };

        report::print_summary(&outcome.stats, self.options.batch_size);
        Ok(outcome)
    }

    async fn connect(&self) -> Result<OnchainDistribution> {
        let profile = self.settings.network(&self.options.network)?;
        info!("Using network '{}' at {}", self.options.network, profile.rpc_url);

        let provider_manager = ProviderManager::connect(profile).await?;
        Ok(OnchainDistribution::new(
            self.options.distribution_address,
            provider_manager,
        ))
    }
}
