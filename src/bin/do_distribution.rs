//! Airdrop CBET balances from a CSV file through the distribution contract

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{error, info};

use cbet_distribution::cli::DistributionCli;
use cbet_distribution::{init_tracing, DistributionRunner, RunOptions, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = DistributionCli::parse();

    if cli.distribution_address.is_none() {
        DistributionCli::command().print_help()?;
        println!();
        return Ok(());
    }

    let options = match RunOptions::from_cli(&cli) {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    let runner = DistributionRunner::new(options, settings);
    match runner.run().await {
        Ok(outcome) if outcome.is_success() => info!("Distribution run completed"),
        Ok(_) => info!("Distribution run finished with errors, see the log above"),
        Err(e) => error!("{}", e),
    }

    Ok(())
}
