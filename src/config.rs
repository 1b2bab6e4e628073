// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Settings for a live transfer and the wiring that turns them into a
//! [`LiveTransfer`].
//!
//! Settings come from the environment (with `.env` support), from JSON, or
//! from the builder:
//!
//! | Variable                       | Field                      | Required |
//! |--------------------------------|----------------------------|----------|
//! | `CCTP_SOURCE_NETWORK`          | `source_network`           | yes      |
//! | `CCTP_DESTINATION_NETWORK`     | `destination_network`      | yes      |
//! | `CCTP_PRIVATE_KEY`             | `private_key`              | yes      |
//! | `CCTP_SOURCE_RPC_URL`          | `source_rpc_url`           | no       |
//! | `CCTP_DESTINATION_RPC_URL`     | `destination_rpc_url`      | no       |
//! | `CCTP_DESTINATION_PRIVATE_KEY` | `destination_private_key`  | no       |
//! | `CCTP_ATTESTATION_URL`         | `attestation_url`          | no       |
//! | `CCTP_POLL_MAX_ATTEMPTS`       | `polling.max_attempts`     | no       |
//! | `CCTP_POLL_INTERVAL_MS`        | `polling.poll_interval_ms` | no       |
//! | `CCTP_HTTP_TIMEOUT_SECS`       | `http_timeout_secs`        | no       |
//!
//! Without `destination_rpc_url` the transfer has no destination client and
//! can only burn and poll.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy_network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use bon::Builder;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::attestation::{AttestationPoller, PollingConfig};
use crate::bridge::CctpTransfer;
use crate::chain::{ChainRoute, Environment, Network};
use crate::error::{CctpError, Result};
use crate::providers::{
    AlloyChainClient, IrisAttestationProvider, TokioClock, DEFAULT_HTTP_TIMEOUT,
    MAINNET_ATTESTATION_URL, SANDBOX_ATTESTATION_URL,
};

/// Transfer wired to alloy HTTP providers, Iris and the tokio clock.
pub type LiveTransfer = CctpTransfer<
    AlloyChainClient<DynProvider>,
    AlloyChainClient<DynProvider>,
    IrisAttestationProvider,
    TokioClock,
>;

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

/// Route, signing keys and endpoints for a live transfer.
#[derive(Builder, Clone, Deserialize)]
pub struct TransferConfig {
    pub source_network: Network,
    pub destination_network: Network,
    #[serde(default)]
    pub source_rpc_url: Option<Url>,
    #[serde(default)]
    pub destination_rpc_url: Option<Url>,
    /// Hex-encoded secp256k1 key that signs on the source chain.
    #[builder(into)]
    pub private_key: String,
    /// Signs on the destination chain; falls back to `private_key`.
    #[serde(default)]
    #[builder(into)]
    pub destination_private_key: Option<String>,
    /// Overrides the environment's default attestation service.
    #[serde(default)]
    pub attestation_url: Option<Url>,
    #[serde(default)]
    #[builder(default)]
    pub polling: PollingConfig,
    #[serde(default = "default_http_timeout_secs")]
    #[builder(default = default_http_timeout_secs())]
    pub http_timeout_secs: u64,
}

impl fmt::Debug for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferConfig")
            .field("source_network", &self.source_network)
            .field("destination_network", &self.destination_network)
            .field("source_rpc_url", &self.source_rpc_url.as_ref().map(Url::as_str))
            .field(
                "destination_rpc_url",
                &self.destination_rpc_url.as_ref().map(Url::as_str),
            )
            .field("private_key", &"<redacted>")
            .field(
                "destination_private_key",
                &self.destination_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("attestation_url", &self.attestation_url.as_ref().map(Url::as_str))
            .field("polling", &self.polling)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl TransferConfig {
    /// Reads `CCTP_*` variables, loading `.env` first if there is one.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| {
            var(key).ok_or_else(|| CctpError::InvalidConfig(format!("{key} is not set")))
        };
        let url = |key: &str| var(key).map(|value| Url::parse(value.trim())).transpose();

        let mut polling = PollingConfig::default();
        if let Some(attempts) = var("CCTP_POLL_MAX_ATTEMPTS") {
            polling.max_attempts = parse_number("CCTP_POLL_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(interval) = var("CCTP_POLL_INTERVAL_MS") {
            polling.poll_interval_ms = parse_number("CCTP_POLL_INTERVAL_MS", &interval)?;
        }
        let http_timeout_secs = match var("CCTP_HTTP_TIMEOUT_SECS") {
            Some(secs) => parse_number("CCTP_HTTP_TIMEOUT_SECS", &secs)?,
            None => default_http_timeout_secs(),
        };

        Ok(Self {
            source_network: Network::from_str(&required("CCTP_SOURCE_NETWORK")?)?,
            destination_network: Network::from_str(&required("CCTP_DESTINATION_NETWORK")?)?,
            source_rpc_url: url("CCTP_SOURCE_RPC_URL")?,
            destination_rpc_url: url("CCTP_DESTINATION_RPC_URL")?,
            private_key: required("CCTP_PRIVATE_KEY")?,
            destination_private_key: var("CCTP_DESTINATION_PRIVATE_KEY"),
            attestation_url: url("CCTP_ATTESTATION_URL")?,
            polling,
            http_timeout_secs,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Checks everything that can be checked without a network connection
    /// and returns the route.
    pub fn validate(&self) -> Result<ChainRoute> {
        let route = ChainRoute::new(self.source_network, self.destination_network)?;

        self.source_signer()?;
        self.destination_signer()?;

        if self.polling.max_attempts == 0 {
            return Err(CctpError::InvalidConfig(
                "polling.max_attempts must be at least 1".into(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(CctpError::InvalidConfig(
                "http_timeout_secs must be at least 1".into(),
            ));
        }

        for (name, url) in [
            ("source_rpc_url", &self.source_rpc_url),
            ("destination_rpc_url", &self.destination_rpc_url),
            ("attestation_url", &self.attestation_url),
        ] {
            if let Some(url) = url {
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(CctpError::InvalidConfig(format!(
                        "{name} must be an http(s) URL, got scheme {:?}",
                        url.scheme()
                    )));
                }
            }
        }

        Ok(route)
    }

    pub fn source_signer(&self) -> Result<PrivateKeySigner> {
        parse_signer("private_key", &self.private_key)
    }

    pub fn destination_signer(&self) -> Result<PrivateKeySigner> {
        match &self.destination_private_key {
            Some(key) => parse_signer("destination_private_key", key),
            None => self.source_signer(),
        }
    }

    /// The attestation service these settings point at.
    pub fn attestation_provider(&self) -> Result<IrisAttestationProvider> {
        let url = match &self.attestation_url {
            Some(url) => url.clone(),
            None => match self.source_network.environment() {
                Environment::Mainnet => Url::parse(MAINNET_ATTESTATION_URL)?,
                Environment::Testnet => Url::parse(SANDBOX_ATTESTATION_URL)?,
            },
        };
        IrisAttestationProvider::new(url, self.http_timeout())
    }

    /// Connects to both chains, checks their chain ids and builds the
    /// transfer.
    pub async fn connect(&self) -> Result<LiveTransfer> {
        let route = self.validate()?;

        let source_url = match &self.source_rpc_url {
            Some(url) => url.clone(),
            None => Url::parse(route.source().default_rpc_url())?,
        };
        let source_client = connect_client(source_url, self.source_signer()?, route.source()).await?;

        let destination_client = match &self.destination_rpc_url {
            Some(url) => Some(
                connect_client(url.clone(), self.destination_signer()?, route.destination())
                    .await?,
            ),
            None => None,
        };

        info!(
            route = %route,
            has_destination_client = destination_client.is_some(),
            event = "transfer_connected"
        );

        Ok(CctpTransfer::builder()
            .route(route)
            .source_client(source_client)
            .maybe_destination_client(destination_client)
            .attestation(AttestationPoller::new(self.attestation_provider()?, TokioClock))
            .polling(self.polling)
            .build())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CctpError::InvalidConfig(format!("{key} must be a non-negative integer")))
}

fn parse_signer(field: &str, key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse()
        .map_err(|_| CctpError::InvalidConfig(format!("{field} is not a valid secp256k1 key")))
}

async fn connect_client(
    url: Url,
    signer: PrivateKeySigner,
    network: Network,
) -> Result<AlloyChainClient<DynProvider>> {
    let address = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased();

    let client = AlloyChainClient::new(provider, address, network);
    client.verify_chain_id().await?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::collections::HashMap;

    // Well-known development key; never holds funds.
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn config() -> TransferConfig {
        TransferConfig::builder()
            .source_network(Network::EthereumSepolia)
            .destination_network(Network::BaseSepolia)
            .private_key(KEY)
            .build()
    }

    #[test]
    fn test_from_env_vars() {
        let config = TransferConfig::from_lookup(lookup(&[
            ("CCTP_SOURCE_NETWORK", "Ethereum-Sepolia"),
            ("CCTP_DESTINATION_NETWORK", "base-sepolia"),
            ("CCTP_PRIVATE_KEY", KEY),
            ("CCTP_DESTINATION_RPC_URL", "https://sepolia.base.org"),
            ("CCTP_POLL_MAX_ATTEMPTS", "60"),
            ("CCTP_SOURCE_RPC_URL", ""),
        ]))
        .unwrap();

        assert_eq!(config.source_network, Network::EthereumSepolia);
        assert_eq!(config.destination_network, Network::BaseSepolia);
        assert_eq!(config.source_rpc_url, None);
        assert_eq!(
            config.destination_rpc_url.as_ref().map(Url::as_str),
            Some("https://sepolia.base.org/")
        );
        assert_eq!(config.polling.max_attempts, 60);
        assert_eq!(config.polling.poll_interval_ms, 10_000);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_requires_key() {
        let err = TransferConfig::from_lookup(lookup(&[
            ("CCTP_SOURCE_NETWORK", "ethereum"),
            ("CCTP_DESTINATION_NETWORK", "base"),
        ]))
        .unwrap_err();

        insta::assert_snapshot!(err, @"Invalid configuration: CCTP_PRIVATE_KEY is not set");
    }

    #[test]
    fn test_from_env_rejects_bad_number() {
        let err = TransferConfig::from_lookup(lookup(&[
            ("CCTP_SOURCE_NETWORK", "ethereum"),
            ("CCTP_DESTINATION_NETWORK", "base"),
            ("CCTP_PRIVATE_KEY", KEY),
            ("CCTP_POLL_INTERVAL_MS", "ten seconds"),
        ]))
        .unwrap_err();

        assert!(matches!(err, CctpError::InvalidConfig(msg) if msg.contains("CCTP_POLL_INTERVAL_MS")));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("ac0974bec"));
    }

    #[test]
    fn test_validate_returns_route() {
        let route = config().validate().unwrap();
        assert_eq!(route.source(), Network::EthereumSepolia);
        assert_eq!(
            config().destination_signer().unwrap().address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_validate_rejects_cross_environment_route() {
        let mut config = config();
        config.destination_network = Network::Base;
        assert!(matches!(
            config.validate(),
            Err(CctpError::UnsupportedRoute { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut zero_attempts = config();
        zero_attempts.polling = PollingConfig::default().with_max_attempts(0);
        assert!(zero_attempts.validate().is_err());

        let mut bad_key = config();
        bad_key.destination_private_key = Some("0x1234".into());
        let err = bad_key.validate().unwrap_err();
        insta::assert_snapshot!(err, @"Invalid configuration: destination_private_key is not a valid secp256k1 key");

        let mut bad_scheme = config();
        bad_scheme.attestation_url = Some(Url::parse("ftp://iris.example").unwrap());
        assert!(bad_scheme.validate().is_err());
    }

    #[test]
    fn test_attestation_provider_follows_environment() {
        let testnet = config().attestation_provider().unwrap();
        assert_eq!(testnet.base_url().as_str(), SANDBOX_ATTESTATION_URL);

        let mut custom = config();
        custom.attestation_url = Some(Url::parse("http://localhost:8080/v1/attestations").unwrap());
        let provider = custom.attestation_provider().unwrap();
        assert_eq!(provider.base_url().host_str(), Some("localhost"));
    }

    #[test]
    fn test_json_defaults() {
        let config: TransferConfig = serde_json::from_value(serde_json::json!({
            "source_network": "avalanche-fuji",
            "destination_network": "arbitrum-sepolia",
            "private_key": KEY,
        }))
        .unwrap();

        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.destination_private_key, None);
    }

    #[tokio::test]
    async fn test_connect_fails_validation_before_dialing() {
        let mut config = config();
        config.polling = PollingConfig::default().with_max_attempts(0);

        assert!(matches!(
            config.connect().await,
            Err(CctpError::InvalidConfig(_))
        ));
    }
}
