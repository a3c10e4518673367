use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use alloy::primitives::U256;
use csv::{ErrorKind, ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{DistributionError, Result};
use crate::validation::{validate_entry, BalanceRecord, RowRejection};

pub const ADDRESS_COLUMN: &str = "address";
pub const BALANCE_WEI_COLUMN: &str = "balance_wei";

#[derive(Debug, Deserialize)]
pub struct BalanceRow {
    pub address: String,
    pub balance_wei: String,
    #[serde(default)]
    pub balance_string: Option<String>,
}

/// Outcome of reading a balances file: accepted records in file order plus
/// a tally of rejected rows by reason.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub records: Vec<BalanceRecord>,
    pub rows_read: usize,
    pub rejected: BTreeMap<&'static str, usize>,
}

impl IngestReport {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    fn reject(&mut self, line: u64, rejection: &RowRejection, label: Option<&str>) {
        match label {
            Some(label) => warn!("Line {}: {} ({}). Skipping.", line, rejection, label),
            None => warn!("Line {}: {}. Skipping.", line, rejection),
        }
        *self.rejected.entry(rejection.kind()).or_insert(0) += 1;
    }
}

pub struct CsvProcessor;

impl CsvProcessor {
    /// Stream a balances CSV and keep the rows eligible for distribution.
    ///
    /// Bad rows are logged and skipped, the stream always runs to the end of the
    /// file. Only a missing file, a missing required column or an I/O failure
    /// abort the read. The file handle is dropped on every return path.
    pub fn read_balances<P: AsRef<Path>>(path: P, ceiling: U256) -> Result<IngestReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DistributionError::Input(format!("Cannot read balances file {}: {}", path.display(), e))
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        for required in [ADDRESS_COLUMN, BALANCE_WEI_COLUMN] {
            if !headers.iter().any(|h| h == required) {
                return Err(DistributionError::Input(format!(
                    "Balances file {} has no '{}' column",
                    path.display(),
                    required
                )));
            }
        }

        let mut report = IngestReport::default();

        for result in reader.deserialize::<BalanceRow>() {
            report.rows_read += 1;
            let line = report.rows_read as u64 + 1;

            let row = match result {
                Ok(row) => row,
                Err(e) => match e.kind() {
                    ErrorKind::Deserialize { .. }
                    | ErrorKind::UnequalLengths { .. }
                    | ErrorKind::Utf8 { .. } => {
                        report.reject(line, &RowRejection::Malformed(e.to_string()), None);
                        continue;
                    }
                    _ => return Err(e.into()),
                },
            };

            match validate_entry(&row.address, &row.balance_wei, ceiling) {
                Ok(record) => {
                    debug!("Line {}: accepted {} -> {}", line, record.address, record.amount_wei);
                    report.records.push(record);
                }
                Err(rejection) => report.reject(line, &rejection, row.balance_string.as_deref()),
            }
        }

        info!(
            "Read {} rows from {}: {} accepted, {} rejected",
            report.rows_read,
            path.display(),
            report.records.len(),
            report.rejected_total()
        );

        Ok(report)
    }
}
