//! Console reporting for distribution runs

use std::path::Path;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use chrono::{SecondsFormat, Utc};
use colored::Colorize;

use crate::batch::{self, Batch};
use crate::constants::format_token_amount;
use crate::contract::{DistributionState, ReceiptSummary};
use crate::stats::RunStats;

const RULE: &str = "---------------------------------------------";

pub fn print_banner(csv_path: &Path) {
    let file_name = csv_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| csv_path.display().to_string());

    println!("{}", RULE.bright_cyan());
    println!("{}", format!("----- Processing {} -----", file_name).bright_cyan());
    println!("{}", RULE.bright_cyan());
    println!();
}

pub fn print_plan(batches: &[Batch], contract: Address) {
    println!("{}", "Distribution plan:".bright_yellow().bold());
    println!("  Number of batches: {}", batches.len());
    match batch::last_address(batches) {
        Some(address) => println!("  Last address: {}", address),
        None => println!("  Last address: -"),
    }
    println!("  Contract address: {}", contract);
    println!("  Started at: {}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    println!();
}

pub fn batch_started(number: usize, total: usize, batch: &Batch) {
    println!(
        "{}",
        format!(
            "==> Batch {}/{}: {} recipients, {} CBET",
            number,
            total,
            batch.len(),
            format_token_amount(batch.total_amount())
        )
        .bright_green()
    );
}

pub fn batch_finished(number: usize, receipt: &ReceiptSummary, elapsed: Duration) {
    print_receipt(receipt);
    println!(
        "{}",
        format!("<== Batch {} done in {:.2}ms", number, elapsed.as_secs_f64() * 1000.0).bright_green()
    );
    println!();
}

pub fn close_started(contract: Address) {
    println!("{}", format!("==> Closing distribution {}", contract).bright_green());
}

pub fn close_finished(receipt: &ReceiptSummary, elapsed: Duration) {
    print_receipt(receipt);
    println!(
        "{}",
        format!("<== Distribution closed in {:.2}ms", elapsed.as_secs_f64() * 1000.0).bright_green()
    );
    println!();
}

pub fn print_receipt(receipt: &ReceiptSummary) {
    match serde_json::to_string_pretty(receipt) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{:?}", receipt),
    }
}

pub fn format_summary(stats: &RunStats, batch_size: usize) -> String {
    let mut lines = vec![
        format!("Batches processed: {} (batch size {})", stats.batches_processed, batch_size),
        format!("Recipients submitted: {}", stats.recipients_submitted),
        format!("Transfer events: {}", stats.transfers_emitted),
        format!("Total gas used: {}", stats.total_gas_used),
        format!("Average gas per batch: {:.2}", stats.avg_gas_per_batch()),
        format!("Total time taken: {:.2}ms", stats.total_time_taken_ms),
    ];
    if stats.closed {
        lines.push("Distribution closed: yes".to_string());
    }
    lines.join("\n")
}

pub fn print_summary(stats: &RunStats, batch_size: usize) {
    println!("{}", "═══════════════════════════════════════".bright_cyan());
    println!("{}", "Distribution Results".bright_green().bold());
    println!("{}", "═══════════════════════════════════════".bright_cyan());
    for line in format_summary(stats, batch_size).lines() {
        println!("  {}", line);
    }
    println!("{}", "═══════════════════════════════════════".bright_cyan());
}

pub fn print_state(state: &DistributionState, supply_matches: bool) {
    println!("{}", "Distribution contract state:".bright_yellow().bold());
    println!("  Owner: {}", state.owner);
    println!("  CBET token: {}", state.token_address);
    println!(
        "  Undistributed balance: {} ({} CBET)",
        state.balance,
        format_token_amount(state.balance)
    );
    println!(
        "  Allocated supply: {} ({} CBET)",
        state.allocated_supply,
        format_token_amount(state.allocated_supply)
    );
    println!("  Closed: {}", state.closed);
    if supply_matches {
        println!("  {}", "✓ balance + allocated matches expected total supply".green());
    } else {
        println!("  {}", "✗ balance + allocated does NOT match expected total supply".red());
    }
    println!();
}

pub fn print_holder_balance(holder: Address, balance: U256) {
    println!("  {}: {} ({} CBET)", holder, balance, format_token_amount(balance));
}
