//! Domain constants of the CBET token and its distribution

use alloy::primitives::{uint, U256};

/// Decimal places of the CBET token.
pub const TOKEN_DECIMALS: u8 = 18;

/// 10^18, the wei factor of one whole token.
pub const WEI_FACTOR: U256 = uint!(1000000000000000000_U256);

/// Exclusive upper bound of an eligible allocation: 10,000 tokens in wei.
pub const ELIGIBILITY_CEILING_WEI: U256 = uint!(10000000000000000000000_U256);

/// Total supply minted to the distribution contract: 950,000,000 tokens in wei.
pub const EXPECTED_TOTAL_SUPPLY_WEI: U256 =
    uint!(950000000000000000000000000_U256);

/// Smallest batch size the runner accepts.
pub const MIN_BATCH_SIZE: usize = 10;

/// Batch size used when none is given on the command line.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Balances file read by a distribution run unless overridden.
pub const DEFAULT_BALANCES_CSV: &str = "./data/cbet_balances.csv";

/// Render a wei amount as whole tokens with the fractional part trimmed.
pub fn format_token_amount(wei: U256) -> String {
    let whole = wei / WEI_FACTOR;
    let fraction = wei % WEI_FACTOR;
    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = TOKEN_DECIMALS as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
