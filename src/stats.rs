//! Run statistics

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub batches_processed: usize,
    pub recipients_submitted: usize,
    pub transfers_emitted: usize,
    pub total_gas_used: u128,
    pub total_time_taken_ms: f64,
    pub closed: bool,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one mined airdrop batch.
    pub fn record_batch(&mut self, recipients: usize, transfers: usize, gas_used: u64, elapsed: Duration) {
        self.batches_processed += 1;
        self.recipients_submitted += recipients;
        self.transfers_emitted += transfers;
        self.record_gas_and_time(gas_used, elapsed);
    }

    /// Account for the mined close call.
    pub fn record_close(&mut self, gas_used: u64, elapsed: Duration) {
        self.closed = true;
        self.record_gas_and_time(gas_used, elapsed);
    }

    pub fn avg_gas_per_batch(&self) -> f64 {
        if self.batches_processed == 0 {
            return 0.0;
        }
        self.total_gas_used as f64 / self.batches_processed as f64
    }

    fn record_gas_and_time(&mut self, gas_used: u64, elapsed: Duration) {
        self.total_gas_used += u128::from(gas_used);
        self.total_time_taken_ms += elapsed.as_secs_f64() * 1000.0;
    }
}
