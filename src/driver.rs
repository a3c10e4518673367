//! Sequential submission of airdrop batches or of the close call

use std::time::Instant;

use tracing::{error, info};

use crate::batch::Batch;
use crate::contract::{DistributionContract, TxOptions};
use crate::error::{DistributionError, Result};
use crate::report;
use crate::stats::RunStats;

/// What a run submits. Decided once, before any batch work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverMode {
    /// One `airdropTokens` call per batch
    Airdrop,
    /// A single `closeDistribution` call, batches are ignored
    Close,
}

/// Stats of a run together with the error that stopped it, if any.
#[derive(Debug)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub error: Option<DistributionError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct DistributionDriver<'a, C: DistributionContract + ?Sized> {
    contract: &'a C,
    gas_price: u128,
}

impl<'a, C: DistributionContract + ?Sized> DistributionDriver<'a, C> {
    pub fn new(contract: &'a C, gas_price: u128) -> Self {
        Self { contract, gas_price }
    }

    /// Resolve the contract owner and make sure the configured signer can send as it.
    pub async fn resolve_sender(&self) -> Result<TxOptions> {
        let owner = self.contract.owner().await?;
        let accounts = self.contract.sender_accounts().await?;

        if !accounts.contains(&owner) {
            return Err(DistributionError::Unauthorized { owner });
        }

        info!("Sending as distribution owner {} at gas price {} wei", owner, self.gas_price);
        Ok(TxOptions {
            from: owner,
            gas_price: self.gas_price,
        })
    }

    /// Submit the run. Each call is awaited until mined before the next one starts;
    /// the first failure stops the run and is returned, `stats` keeps what was mined.
    pub async fn execute(&self, mode: DriverMode, batches: &[Batch], stats: &mut RunStats) -> Result<()> {
        let options = self.resolve_sender().await?;

        match mode {
            DriverMode::Airdrop => self.airdrop(batches, options, stats).await,
            DriverMode::Close => self.close(options, stats).await,
        }
    }

    /// Like [`execute`](Self::execute), but the error is logged and kept in the outcome.
    pub async fn run(&self, mode: DriverMode, batches: &[Batch]) -> RunOutcome {
        let mut stats = RunStats::new();
        let error = match self.execute(mode, batches, &mut stats).await {
            Ok(()) => None,
            Err(e) => {
                error!("Distribution stopped: {}", e);
                Some(e)
            }
        };

        RunOutcome { stats, error }
    }

    async fn airdrop(&self, batches: &[Batch], options: TxOptions, stats: &mut RunStats) -> Result<()> {
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            let number = index + 1;
            report::batch_started(number, total, batch);

            let started = Instant::now();
            let receipt = self
                .contract
                .airdrop_tokens(&batch.addresses, &batch.amounts, options)
                .await?;
            let elapsed = started.elapsed();

            stats.record_batch(batch.len(), receipt.transfers, receipt.gas_used, elapsed);
            info!(
                "Batch {}/{} mined in block {:?}: tx {}, gas {}",
                number, total, receipt.block_number, receipt.transaction_hash, receipt.gas_used
            );
            report::batch_finished(number, &receipt, elapsed);
        }

        Ok(())
    }

    async fn close(&self, options: TxOptions, stats: &mut RunStats) -> Result<()> {
        report::close_started(self.contract.address());

        let started = Instant::now();
        let receipt = self.contract.close_distribution(options).await?;
        let elapsed = started.elapsed();

        stats.record_close(receipt.gas_used, elapsed);
        info!(
            "Distribution closed in block {:?}: tx {}, gas {}",
            receipt.block_number, receipt.transaction_hash, receipt.gas_used
        );
        report::close_finished(&receipt, elapsed);

        Ok(())
    }
}
