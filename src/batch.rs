use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::error::{DistributionError, Result};
use crate::validation::BalanceRecord;

/// One airdrop call worth of recipients. `addresses[i]` receives `amounts[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub addresses: Vec<Address>,
    pub amounts: Vec<U256>,
}

impl Batch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            addresses: Vec::with_capacity(capacity),
            amounts: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: &BalanceRecord) {
        self.addresses.push(record.address);
        self.amounts.push(record.amount_wei);
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn total_amount(&self) -> U256 {
        self.amounts.iter().fold(U256::ZERO, |acc, amount| acc.saturating_add(*amount))
    }

    pub fn last_address(&self) -> Option<Address> {
        self.addresses.last().copied()
    }
}

/// Split validated records into consecutive batches of `batch_size`.
///
/// Order is preserved within and across batches. Every batch but the last holds
/// exactly `batch_size` entries; no empty batch is produced.
pub fn partition(records: &[BalanceRecord], batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(DistributionError::Input("Batch size must be positive".to_string()));
    }

    let batches = records
        .chunks(batch_size)
        .map(|chunk| {
            let mut batch = Batch::with_capacity(chunk.len());
            chunk.iter().for_each(|record| batch.push(record));
            batch
        })
        .collect();

    Ok(batches)
}

/// Address batches and amount batches as two parallel sequences.
pub fn split_columns(batches: &[Batch]) -> (Vec<Vec<Address>>, Vec<Vec<U256>>) {
    batches
        .iter()
        .map(|batch| (batch.addresses.clone(), batch.amounts.clone()))
        .unzip()
}

/// Last recipient of the whole plan, if any.
pub fn last_address(batches: &[Batch]) -> Option<Address> {
    batches.last().and_then(Batch::last_address)
}
