//! Show the state of a CBET distribution contract

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::error;

use cbet_distribution::cli::InspectCli;
use cbet_distribution::inspect::{inspect, parse_holders};
use cbet_distribution::validation::parse_account_address;
use cbet_distribution::{init_tracing, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = InspectCli::parse();

    let Some(raw_address) = cli.distribution_address.as_deref() else {
        InspectCli::command().print_help()?;
        println!();
        return Ok(());
    };

    let Some(distribution_address) = parse_account_address(raw_address) else {
        error!("{} is not a valid address", raw_address);
        return Ok(());
    };

    let holders = parse_holders(&cli.holders);
    let settings = Settings::load()?;

    if let Err(e) = inspect(&settings, &cli.network, distribution_address, &holders).await {
        error!("Failed to inspect distribution: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
