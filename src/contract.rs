//! Typed bindings for the CBET distribution and token contracts

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::DynProvider;
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::{DistributionError, Result};
use crate::provider::ProviderManager;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ICBETDistribution {
        function owner() external view returns (address);
        function getCBETTokenAddress() external view returns (address);
        function setCBETTokenAddress(address tokenAddress) external;
        function getBalance() external view returns (uint256);
        function getAllocatedSupply() external view returns (uint256);
        function distributionClosed() external view returns (bool);
        function airdropTokens(address[] recipients, uint256[] amounts) external;
        function closeDistribution() external;
    }
);

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ICBETToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 value);
    }
);

/// Sender and fee settings shared by every state-changing call of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub from: Address,
    pub gas_price: u128,
}

/// The parts of a mined receipt worth logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptSummary {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub transaction_index: Option<u64>,
    pub gas_used: u64,
    pub from: Address,
    pub to: Option<Address>,
    /// Number of token `Transfer` events the transaction emitted
    pub transfers: usize,
}

impl ReceiptSummary {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        let transfers = receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.topics().first() == Some(&ICBETToken::Transfer::SIGNATURE_HASH))
            .count();

        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            transaction_index: receipt.transaction_index,
            gas_used: receipt.gas_used,
            from: receipt.from,
            to: receipt.to,
            transfers,
        }
    }
}

/// Snapshot of the distribution contract's public state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionState {
    pub owner: Address,
    pub token_address: Address,
    pub balance: U256,
    pub allocated_supply: U256,
    pub closed: bool,
}

/// Method surface of the deployed distribution contract.
#[async_trait]
pub trait DistributionContract: Send + Sync {
    fn address(&self) -> Address;

    async fn owner(&self) -> Result<Address>;

    async fn token_address(&self) -> Result<Address>;

    async fn balance(&self) -> Result<U256>;

    async fn allocated_supply(&self) -> Result<U256>;

    async fn is_closed(&self) -> Result<bool>;

    /// Accounts the configured signer is able to send from.
    async fn sender_accounts(&self) -> Result<Vec<Address>>;

    /// Submit one airdrop call and wait until it is mined.
    async fn airdrop_tokens(
        &self,
        recipients: &[Address],
        amounts: &[U256],
        options: TxOptions,
    ) -> Result<ReceiptSummary>;

    /// Submit the close call and wait until it is mined.
    async fn close_distribution(&self, options: TxOptions) -> Result<ReceiptSummary>;

    async fn state(&self) -> Result<DistributionState> {
        Ok(DistributionState {
            owner: self.owner().await?,
            token_address: self.token_address().await?,
            balance: self.balance().await?,
            allocated_supply: self.allocated_supply().await?,
            closed: self.is_closed().await?,
        })
    }
}

/// Distribution contract reached over RPC.
pub struct OnchainDistribution {
    instance: ICBETDistribution::ICBETDistributionInstance<DynProvider>,
    provider_manager: ProviderManager,
}

impl OnchainDistribution {
    pub fn new(address: Address, provider_manager: ProviderManager) -> Self {
        let instance = ICBETDistribution::new(address, provider_manager.provider());
        Self {
            instance,
            provider_manager,
        }
    }

    pub fn provider_manager(&self) -> &ProviderManager {
        &self.provider_manager
    }

    /// Binding for the token contract the distribution hands out.
    pub async fn token(&self) -> Result<TokenContract> {
        let address = self.token_address().await?;
        Ok(TokenContract::new(address, self.provider_manager.provider()))
    }
}

fn call_error(function: &str, e: impl std::fmt::Display) -> DistributionError {
    DistributionError::Contract(format!("{}() call failed: {}", function, e))
}

fn summarize(receipt: TransactionReceipt) -> Result<ReceiptSummary> {
    if !receipt.status() {
        return Err(DistributionError::Reverted {
            tx_hash: receipt.transaction_hash,
        });
    }
    Ok(ReceiptSummary::from_receipt(&receipt))
}

#[async_trait]
impl DistributionContract for OnchainDistribution {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn owner(&self) -> Result<Address> {
        self.instance
            .owner()
            .call()
            .await
            .map_err(|e| call_error("owner", e))
    }

    async fn token_address(&self) -> Result<Address> {
        self.instance
            .getCBETTokenAddress()
            .call()
            .await
            .map_err(|e| call_error("getCBETTokenAddress", e))
    }

    async fn balance(&self) -> Result<U256> {
        self.instance
            .getBalance()
            .call()
            .await
            .map_err(|e| call_error("getBalance", e))
    }

    async fn allocated_supply(&self) -> Result<U256> {
        self.instance
            .getAllocatedSupply()
            .call()
            .await
            .map_err(|e| call_error("getAllocatedSupply", e))
    }

    async fn is_closed(&self) -> Result<bool> {
        self.instance
            .distributionClosed()
            .call()
            .await
            .map_err(|e| call_error("distributionClosed", e))
    }

    async fn sender_accounts(&self) -> Result<Vec<Address>> {
        self.provider_manager.sender_accounts().await
    }

    async fn airdrop_tokens(
        &self,
        recipients: &[Address],
        amounts: &[U256],
        options: TxOptions,
    ) -> Result<ReceiptSummary> {
        debug!("Sending airdropTokens for {} recipients", recipients.len());

        let receipt = self
            .instance
            .airdropTokens(recipients.to_vec(), amounts.to_vec())
            .from(options.from)
            .gas_price(options.gas_price)
            .send()
            .await
            .map_err(|e| DistributionError::Transaction(format!("airdropTokens failed: {}", e)))?
            .get_receipt()
            .await
            .map_err(|e| DistributionError::Transaction(format!("Failed to get receipt: {}", e)))?;

        summarize(receipt)
    }

    async fn close_distribution(&self, options: TxOptions) -> Result<ReceiptSummary> {
        debug!("Sending closeDistribution");

        let receipt = self
            .instance
            .closeDistribution()
            .from(options.from)
            .gas_price(options.gas_price)
            .send()
            .await
            .map_err(|e| DistributionError::Transaction(format!("closeDistribution failed: {}", e)))?
            .get_receipt()
            .await
            .map_err(|e| DistributionError::Transaction(format!("Failed to get receipt: {}", e)))?;

        summarize(receipt)
    }
}

/// Read-only binding for the CBET token.
pub struct TokenContract {
    instance: ICBETToken::ICBETTokenInstance<DynProvider>,
}

impl TokenContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            instance: ICBETToken::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        self.instance
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| call_error("balanceOf", e))
    }

    pub async fn total_supply(&self) -> Result<U256> {
        self.instance
            .totalSupply()
            .call()
            .await
            .map_err(|e| call_error("totalSupply", e))
    }
}
