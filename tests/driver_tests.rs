//! Integration tests for the sequential distribution driver

use std::sync::Mutex;

use async_trait::async_trait;
use cbet_distribution::prelude::*;
use cbet_distribution::validation::BalanceRecord;
use cbet_distribution::contract::DistributionState;
use alloy::primitives::B256;

const GAS_PER_CALL: u64 = 50_000;
const GAS_PER_RECIPIENT: u64 = 25_000;
const GAS_PRICE: u128 = 14_000_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Airdrop {
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        options: TxOptions,
    },
    Close {
        options: TxOptions,
    },
}

struct MockDistribution {
    owner: Option<Address>,
    senders: Vec<Address>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl MockDistribution {
    fn new(owner: Address) -> Self {
        Self {
            owner: Some(owner),
            senders: vec![owner],
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, call_number: usize) -> Self {
        self.fail_on_call = Some(call_number);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn submit(&self, call: Call, recipients: usize) -> Result<ReceiptSummary> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        let number = calls.len();

        if self.fail_on_call == Some(number) {
            return Err(DistributionError::Transaction(format!("call {} reverted", number)));
        }

        Ok(ReceiptSummary {
            transaction_hash: B256::with_last_byte(number as u8),
            block_number: Some(100 + number as u64),
            block_hash: Some(B256::repeat_byte(number as u8)),
            transaction_index: Some(0),
            gas_used: GAS_PER_CALL + GAS_PER_RECIPIENT * recipients as u64,
            from: self.owner.unwrap_or_default(),
            to: Some(Address::repeat_byte(0xdd)),
            transfers: recipients,
        })
    }
}

#[async_trait]
impl DistributionContract for MockDistribution {
    fn address(&self) -> Address {
        Address::repeat_byte(0xdd)
    }

    async fn owner(&self) -> Result<Address> {
        self.owner
            .ok_or_else(|| DistributionError::Contract("owner() call failed: node unreachable".to_string()))
    }

    async fn token_address(&self) -> Result<Address> {
        Ok(Address::repeat_byte(0xee))
    }

    async fn balance(&self) -> Result<U256> {
        Ok(U256::ZERO)
    }

    async fn allocated_supply(&self) -> Result<U256> {
        Ok(U256::ZERO)
    }

    async fn is_closed(&self) -> Result<bool> {
        Ok(false)
    }

    async fn sender_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.senders.clone())
    }

    async fn airdrop_tokens(
        &self,
        recipients: &[Address],
        amounts: &[U256],
        options: TxOptions,
    ) -> Result<ReceiptSummary> {
        let call = Call::Airdrop {
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            options,
        };
        self.submit(call, recipients.len())
    }

    async fn close_distribution(&self, options: TxOptions) -> Result<ReceiptSummary> {
        self.submit(Call::Close { options }, 0)
    }
}

fn owner() -> Address {
    Address::repeat_byte(0x0a)
}

fn plan(records: usize, batch_size: usize) -> Vec<Batch> {
    let records: Vec<BalanceRecord> = (0..records)
        .map(|i| BalanceRecord {
            address: Address::with_last_byte(i as u8 + 1),
            amount_wei: U256::from(1_000u64 + i as u64),
        })
        .collect();
    partition(&records, batch_size).unwrap()
}

fn batch_gas(batch: &Batch) -> u128 {
    u128::from(GAS_PER_CALL + GAS_PER_RECIPIENT * batch.len() as u64)
}

#[tokio::test]
async fn test_airdrop_submits_every_batch_in_order() {
    let contract = MockDistribution::new(owner());
    let batches = plan(25, 10);

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Airdrop, &batches)
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.stats.batches_processed, 3);
    assert_eq!(outcome.stats.recipients_submitted, 25);
    assert_eq!(
        outcome.stats.total_gas_used,
        batches.iter().map(batch_gas).sum::<u128>()
    );

    let calls = contract.calls();
    assert_eq!(calls.len(), 3);
    for (call, batch) in calls.iter().zip(&batches) {
        match call {
            Call::Airdrop { recipients, amounts, options } => {
                assert_eq!(recipients, &batch.addresses);
                assert_eq!(amounts, &batch.amounts);
                assert_eq!(options.from, owner());
                assert_eq!(options.gas_price, GAS_PRICE);
            }
            Call::Close { .. } => panic!("airdrop mode must never close"),
        }
    }
}

#[tokio::test]
async fn test_failure_on_second_batch_keeps_first_batch_totals() {
    let contract = MockDistribution::new(owner()).failing_on(2);
    let batches = plan(30, 10);

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Airdrop, &batches)
        .await;

    assert!(matches!(outcome.error, Some(DistributionError::Transaction(_))));
    assert_eq!(outcome.stats.batches_processed, 1);
    assert_eq!(outcome.stats.total_gas_used, batch_gas(&batches[0]));
    assert!(outcome.stats.total_time_taken_ms >= 0.0);

    // batch 3 is never attempted
    assert_eq!(contract.calls().len(), 2);
}

#[tokio::test]
async fn test_close_mode_submits_exactly_one_call() {
    let contract = MockDistribution::new(owner());
    let batches = plan(20, 10);

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Close, &batches)
        .await;

    assert!(outcome.is_success());
    assert!(outcome.stats.closed);
    assert_eq!(outcome.stats.batches_processed, 0);
    assert_eq!(outcome.stats.total_gas_used, u128::from(GAS_PER_CALL));
    assert_eq!(
        contract.calls(),
        vec![Call::Close {
            options: TxOptions {
                from: owner(),
                gas_price: GAS_PRICE
            }
        }]
    );
}

#[tokio::test]
async fn test_failed_close_reports_no_gas() {
    let contract = MockDistribution::new(owner()).failing_on(1);

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Close, &[])
        .await;

    assert!(outcome.error.is_some());
    assert!(!outcome.stats.closed);
    assert_eq!(outcome.stats.total_gas_used, 0);
    assert_eq!(contract.calls().len(), 1);
}

#[tokio::test]
async fn test_signer_must_be_owner() {
    let mut contract = MockDistribution::new(owner());
    contract.senders = vec![Address::repeat_byte(0x0b)];

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Airdrop, &plan(10, 10))
        .await;

    assert!(matches!(
        outcome.error,
        Some(DistributionError::Unauthorized { owner: o }) if o == owner()
    ));
    assert!(contract.calls().is_empty());
    assert_eq!(outcome.stats, RunStats::new());
}

#[tokio::test]
async fn test_owner_resolution_failure_stops_before_submitting() {
    let mut contract = MockDistribution::new(owner());
    contract.owner = None;

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Airdrop, &plan(10, 10))
        .await;

    assert!(matches!(outcome.error, Some(DistributionError::Contract(_))));
    assert!(contract.calls().is_empty());
}

#[tokio::test]
async fn test_no_batches_no_submissions() {
    let contract = MockDistribution::new(owner());

    let outcome = DistributionDriver::new(&contract, GAS_PRICE)
        .run(DriverMode::Airdrop, &[])
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.stats.batches_processed, 0);
    assert!(contract.calls().is_empty());
}

#[tokio::test]
async fn test_state_reads_through_trait() {
    let contract = MockDistribution::new(owner());

    let state: DistributionState = contract.state().await.unwrap();
    assert_eq!(state.owner, owner());
    assert_eq!(state.token_address, Address::repeat_byte(0xee));
    assert!(!state.closed);
}
