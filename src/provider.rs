//! Provider configuration and management

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::transports::http::reqwest::Url;
use tracing::{debug, info};

use crate::config::{NetworkProfile, SignerStrategy};
use crate::error::{DistributionError, Result};

/// RPC provider for one network profile, with the signer that profile names.
#[derive(Clone)]
pub struct ProviderManager {
    profile: NetworkProfile,
    provider: DynProvider,
    signer_address: Option<Address>,
}

impl ProviderManager {
    /// Build the provider for `profile` and verify the node answers on the expected chain.
    pub async fn connect(profile: NetworkProfile) -> Result<Self> {
        let rpc_url = profile.resolved_rpc_url()?;
        let http_url: Url = rpc_url
            .parse()
            .map_err(|e| DistributionError::Configuration(format!("Invalid RPC URL: {}", e)))?;

        let (provider, signer_address) = match local_signer(&profile.signer)? {
            Some(signer) => {
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(http_url)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().connect_http(http_url).erased(), None),
        };

        let manager = Self {
            profile,
            provider,
            signer_address,
        };

        let block_number = manager.check_connection().await?;
        let chain_id = manager.verify_chain_id().await?;
        info!("Connected to chain {} at block {}", chain_id, block_number);

        Ok(manager)
    }

    /// Get the provider
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    /// Get provider configuration
    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Gas price every submission on this network pays
    pub fn gas_price(&self) -> u128 {
        u128::from(self.profile.gas_price_wei)
    }

    /// Address of the local signer, `None` when the node signs
    pub fn signer_address(&self) -> Option<Address> {
        self.signer_address
    }

    /// Accounts this provider can send from: the local signer, or whatever the node has unlocked.
    pub async fn sender_accounts(&self) -> Result<Vec<Address>> {
        if let Some(address) = self.signer_address {
            return Ok(vec![address]);
        }

        self.provider
            .get_accounts()
            .await
            .map_err(|e| DistributionError::Provider(format!("Failed to list node accounts: {}", e)))
    }

    /// Check connection to the RPC endpoint
    pub async fn check_connection(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| DistributionError::Provider(format!("Failed to get block number: {}", e)))
    }

    async fn verify_chain_id(&self) -> Result<u64> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| DistributionError::Provider(format!("Failed to get chain id: {}", e)))?;

        match self.profile.chain_id {
            Some(expected) if expected != chain_id => Err(DistributionError::Configuration(format!(
                "Node reports chain id {}, network profile expects {}",
                chain_id, expected
            ))),
            _ => Ok(chain_id),
        }
    }
}

fn local_signer(strategy: &SignerStrategy) -> Result<Option<PrivateKeySigner>> {
    match strategy {
        SignerStrategy::NodeAccounts => {
            debug!("Using node managed accounts");
            Ok(None)
        }
        SignerStrategy::Mnemonic { phrase_env, index } => {
            let phrase = read_secret(phrase_env)?;
            let signer = MnemonicBuilder::<English>::default()
                .phrase(phrase.trim())
                .index(*index)
                .and_then(|builder| builder.build())
                .map_err(|e| DistributionError::Configuration(format!("Invalid mnemonic: {}", e)))?;
            debug!("Using HD wallet account {} (index {})", signer.address(), index);
            Ok(Some(signer))
        }
        SignerStrategy::PrivateKey { key_env } => {
            let key = read_secret(key_env)?;
            let signer: PrivateKeySigner = key
                .trim()
                .parse()
                .map_err(|e| DistributionError::Configuration(format!("Invalid private key: {}", e)))?;
            debug!("Using private key account {}", signer.address());
            Ok(Some(signer))
        }
    }
}

fn read_secret(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| {
        DistributionError::Configuration(format!("{} environment variable not set", var))
    })
}
