use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DistributionError, Result};

/// Network selected when `NETWORK_NAME` is not set.
pub const DEFAULT_NETWORK: &str = "development";

const GWEI: u64 = 1_000_000_000;

/// How transactions get signed on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignerStrategy {
    /// Accounts unlocked on the node itself (ganache, dev geth)
    NodeAccounts,
    /// HD wallet derived from a BIP-39 phrase read from an environment variable
    Mnemonic {
        #[serde(default = "default_mnemonic_env")]
        phrase_env: String,
        #[serde(default)]
        index: u32,
    },
    /// Raw hex private key read from an environment variable
    PrivateKey {
        #[serde(default = "default_private_key_env")]
        key_env: String,
    },
}

fn default_mnemonic_env() -> String {
    "MNEMONIC".to_string()
}

fn default_private_key_env() -> String {
    "PRIVATE_KEY".to_string()
}

/// A named network: where to connect, how to sign, what to pay for gas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// HTTP RPC endpoint, `${VAR}` placeholders are expanded from the environment
    pub rpc_url: String,
    /// Expected chain id, any chain is accepted when unset
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Fixed gas price for every submission
    pub gas_price_wei: u64,
    pub signer: SignerStrategy,
}

impl NetworkProfile {
    pub fn resolved_rpc_url(&self) -> Result<String> {
        expand_env_placeholders(&self.rpc_url)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Profiles defined in `distribution.toml` or `CBET__NETWORKS__*` variables.
    /// They take precedence over the built-in ones of the same name.
    #[serde(default)]
    pub networks: HashMap<String, NetworkProfile>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenv::dotenv().ok();

        let config_builder = config::Config::builder()
            .add_source(config::File::with_name("distribution").required(false))
            .add_source(
                config::Environment::with_prefix("CBET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DistributionError::Configuration(format!("Failed to build settings: {}", e)))?;

        let settings: Settings = config_builder
            .try_deserialize()
            .map_err(|e| DistributionError::Configuration(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Resolve a network profile by name. Names are matched ignoring case,
    /// `_` and `-`, so `privateGanache` and `private_ganache` are the same network.
    pub fn network(&self, name: &str) -> Result<NetworkProfile> {
        let wanted = normalize_network_name(name);

        self.networks
            .iter()
            .find(|(key, _)| normalize_network_name(key) == wanted)
            .map(|(_, profile)| profile.clone())
            .or_else(|| builtin_network(&wanted))
            .ok_or_else(|| DistributionError::Configuration(format!("Unknown network '{}'", name)))
    }
}

fn normalize_network_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn builtin_network(normalized: &str) -> Option<NetworkProfile> {
    let mnemonic = SignerStrategy::Mnemonic {
        phrase_env: default_mnemonic_env(),
        index: 0,
    };

    let profile = match normalized {
        "development" => NetworkProfile {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: None,
            gas_price_wei: 20 * GWEI,
            signer: SignerStrategy::NodeAccounts,
        },
        "privateganache" => NetworkProfile {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: None,
            gas_price_wei: 20 * GWEI,
            signer: mnemonic,
        },
        "mainnet" => NetworkProfile {
            rpc_url: "https://mainnet.infura.io/v3/${INFURA_PROJECT_ID}".to_string(),
            chain_id: Some(1),
            gas_price_wei: 14 * GWEI,
            signer: mnemonic,
        },
        "ropsten" => NetworkProfile {
            rpc_url: "https://ropsten.infura.io/v3/${INFURA_PROJECT_ID}".to_string(),
            chain_id: Some(3),
            gas_price_wei: 14 * GWEI,
            signer: mnemonic,
        },
        _ => return None,
    };

    Some(profile)
}

/// Replace every `${VAR}` in `template` with the value of the environment variable.
pub fn expand_env_placeholders(template: &str) -> Result<String> {
    expand_placeholders(template, |name| std::env::var(name).ok())
}

fn expand_placeholders<F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            DistributionError::Configuration(format!("Unterminated placeholder in '{}'", template))
        })?;

        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| {
            DistributionError::Configuration(format!("Environment variable {} is not set", name))
        })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
