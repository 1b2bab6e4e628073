// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Circle's Iris attestation service.

use std::time::Duration;

use alloy_primitives::B256;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, instrument, trace, Instrument};
use url::Url;

use crate::chain::Environment;
use crate::error::{CctpError, Result};
use crate::protocol::AttestationResponse;
use crate::spans;
use crate::traits::AttestationProvider;

pub const MAINNET_ATTESTATION_URL: &str = "https://iris-api.circle.com/v1/attestations";
pub const SANDBOX_ATTESTATION_URL: &str = "https://iris-api-sandbox.circle.com/v1/attestations";

/// Request timeout used unless configured otherwise.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// [`AttestationProvider`] that queries `GET {base_url}/{messageHash}`.
///
/// A 404 means the service has not seen the message yet and is reported as
/// pending. Any other non-success status is an
/// [`AttestationService`](CctpError::AttestationService) error carrying the
/// status and body.
///
/// ```rust,ignore
/// use cctp_transfer::providers::IrisAttestationProvider;
///
/// let provider = IrisAttestationProvider::sandbox()?;
/// let response = provider.get_attestation(message_hash).await?;
/// ```
#[derive(Debug, Clone)]
pub struct IrisAttestationProvider {
    base_url: Url,
    client: Client,
}

impl IrisAttestationProvider {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(CctpError::InvalidConfig(format!(
                "attestation URL {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn production() -> Result<Self> {
        Self::new(Url::parse(MAINNET_ATTESTATION_URL)?, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn sandbox() -> Result<Self> {
        Self::new(Url::parse(SANDBOX_ATTESTATION_URL)?, DEFAULT_HTTP_TIMEOUT)
    }

    /// Mainnet networks are attested by production, testnets by the sandbox.
    pub fn for_environment(environment: Environment) -> Result<Self> {
        match environment {
            Environment::Mainnet => Self::production(),
            Environment::Testnet => Self::sandbox(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn attestation_url(&self, message_hash: B256) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CctpError::InvalidConfig(format!("attestation URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push(&message_hash.to_string());
        Ok(url)
    }
}

#[async_trait]
impl AttestationProvider for IrisAttestationProvider {
    #[instrument(skip(self), fields(message_hash = %message_hash))]
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationResponse> {
        let url = self.attestation_url(message_hash)?;
        let span = spans::attestation_request(&url);

        async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            trace!(status_code = status.as_u16(), "Received response from attestation service");

            if status == StatusCode::NOT_FOUND {
                debug!(event = "attestation_not_found");
                return Ok(AttestationResponse::pending());
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(
                    status_code = status.as_u16(),
                    body = %body,
                    event = "attestation_service_error"
                );
                return Err(CctpError::AttestationService {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response.bytes().await?;
            let attestation: AttestationResponse = serde_json::from_slice(&body)?;
            debug!(status = ?attestation.status, event = "attestation_response_parsed");
            Ok(attestation)
        }
        .instrument(span)
        .await
    }
}
