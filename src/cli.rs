//! CLI argument parsing

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};

use crate::config::DEFAULT_NETWORK;
use crate::constants::{DEFAULT_BALANCES_CSV, DEFAULT_BATCH_SIZE};

#[derive(Parser, Debug)]
#[command(name = "do-distribution")]
#[command(about = "Airdrop CBET balances from a CSV file through the distribution contract", long_about = None)]
#[command(version)]
pub struct DistributionCli {
    /// Distribution contract address
    pub distribution_address: Option<String>,

    /// Recipients per airdrop transaction (at least 10)
    #[arg(default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Balances CSV with `address` and `balance_wei` columns
    #[arg(long, default_value = DEFAULT_BALANCES_CSV)]
    pub csv: PathBuf,

    /// Named network profile
    #[arg(short, long, env = "NETWORK_NAME", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Only close the distribution, no airdrop batches are sent
    #[arg(long, env = "JUST_CLOSE_DISTRIBUTION", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub just_close: bool,
}

#[derive(Parser, Debug)]
#[command(name = "check-distribution")]
#[command(about = "Show the state of a CBET distribution contract", long_about = None)]
#[command(version)]
pub struct InspectCli {
    /// Distribution contract address
    pub distribution_address: Option<String>,

    /// Token holder whose CBET balance should be shown (repeatable)
    #[arg(long = "holder")]
    pub holders: Vec<String>,

    /// Named network profile
    #[arg(short, long, env = "NETWORK_NAME", default_value = DEFAULT_NETWORK)]
    pub network: String,
}
