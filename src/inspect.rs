//! Read-only inspection of a deployed distribution

use alloy::primitives::{Address, U256};
use tracing::{info, warn};

use crate::config::Settings;
use crate::constants::EXPECTED_TOTAL_SUPPLY_WEI;
use crate::contract::{DistributionContract, DistributionState, OnchainDistribution};
use crate::error::Result;
use crate::provider::ProviderManager;
use crate::report;
use crate::validation::parse_account_address;

/// Whether undistributed plus allocated tokens add up to the minted supply.
pub fn supply_is_consistent(state: &DistributionState) -> bool {
    state.balance.checked_add(state.allocated_supply) == Some(EXPECTED_TOTAL_SUPPLY_WEI)
}

/// Parse holder addresses, dropping the malformed ones with a warning.
pub fn parse_holders(raw: &[String]) -> Vec<Address> {
    raw.iter()
        .filter_map(|holder| {
            let parsed = parse_account_address(holder);
            if parsed.is_none() {
                warn!("{} is NOT a valid address. Skipping.", holder);
            }
            parsed
        })
        .collect()
}

pub async fn read_state<C: DistributionContract + ?Sized>(contract: &C) -> Result<(DistributionState, bool)> {
    let state = contract.state().await?;
    let consistent = supply_is_consistent(&state);
    Ok((state, consistent))
}

/// Print the distribution state and the token balance of each holder.
pub async fn inspect(
    settings: &Settings,
    network: &str,
    distribution_address: Address,
    holders: &[Address],
) -> Result<()> {
    let profile = settings.network(network)?;
    let provider_manager = ProviderManager::connect(profile).await?;
    let distribution = OnchainDistribution::new(distribution_address, provider_manager);

    let (state, consistent) = read_state(&distribution).await?;
    info!("Owner of CBET distribution contract: {}", state.owner);
    report::print_state(&state, consistent);

    if !holders.is_empty() {
        let token = distribution.token().await?;
        println!("CBET balances ({}):", token.address());
        for holder in holders {
            let balance: U256 = token.balance_of(*holder).await?;
            report::print_holder_balance(*holder, balance);
        }
    }

    Ok(())
}
