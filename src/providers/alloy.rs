// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Alloy-backed chain client.

use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use tracing::{debug, error, info, instrument, trace};

use crate::chain::Network;
use crate::error::{CctpError, Result};
use crate::traits::{ChainClient, TransactionOutcome};

/// [`ChainClient`] over any alloy [`Provider`] that can sign for `signer`.
///
/// The provider must carry a wallet for `signer` (for example one built with
/// `ProviderBuilder::new().wallet(..)`); this type only sets the `from`
/// field and waits for receipts.
///
/// ```rust,ignore
/// use alloy_provider::{Provider, ProviderBuilder};
/// use cctp_transfer::{providers::AlloyChainClient, Network};
///
/// let provider = ProviderBuilder::new()
///     .wallet(wallet)
///     .connect_http("https://sepolia.base.org".parse()?)
///     .erased();
/// let client = AlloyChainClient::new(provider, signer, Network::BaseSepolia);
/// client.verify_chain_id().await?;
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainClient<P> {
    provider: P,
    signer: Address,
    network: Network,
}

impl<P> AlloyChainClient<P>
where
    P: Provider<Ethereum>,
{
    pub fn new(provider: P, signer: Address, network: Network) -> Self {
        debug!(
            signer = %signer,
            network = %network,
            event = "chain_client_initialized"
        );
        Self {
            provider,
            signer,
            network,
        }
    }

    pub fn inner(&self) -> &P {
        &self.provider
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Fails if the RPC endpoint serves a different chain than `network`.
    pub async fn verify_chain_id(&self) -> Result<()> {
        let expected = self.network.chain_id().ok_or_else(|| {
            CctpError::InvalidConfig(format!("{} is not an EVM network", self.network))
        })?;
        let actual = self.provider.get_chain_id().await?;
        if actual != expected {
            error!(
                network = %self.network,
                expected_chain_id = expected,
                actual_chain_id = actual,
                event = "chain_id_mismatch"
            );
            return Err(CctpError::InvalidConfig(format!(
                "RPC for {} reports chain id {actual}, expected {expected}",
                self.network
            )));
        }
        Ok(())
    }
}

fn outcome_from_receipt(receipt: &TransactionReceipt) -> TransactionOutcome {
    TransactionOutcome {
        tx_hash: receipt.transaction_hash,
        success: ReceiptResponse::status(receipt),
        block_number: receipt.block_number,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}

#[async_trait]
impl<P> ChainClient for AlloyChainClient<P>
where
    P: Provider<Ethereum> + Send + Sync,
{
    fn signer_address(&self) -> Address {
        self.signer
    }

    #[instrument(skip(self, tx), fields(network = %self.network, signer = %self.signer))]
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionOutcome> {
        let pending = self.provider.send_transaction(tx.from(self.signer)).await?;
        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, event = "transaction_submitted");

        let receipt = pending.get_receipt().await.map_err(|e| {
            error!(tx_hash = %tx_hash, error = %e, event = "receipt_wait_failed");
            CctpError::Provider(format!("waiting for receipt of {tx_hash}: {e}"))
        })?;

        let outcome = outcome_from_receipt(&receipt);
        info!(
            tx_hash = %tx_hash,
            success = outcome.success,
            block_number = ?outcome.block_number,
            log_count = outcome.logs.len(),
            event = "transaction_mined"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, tx), fields(network = %self.network))]
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        trace!("Executing eth_call");
        Ok(self.provider.call(tx.from(self.signer)).await?)
    }

    #[instrument(skip(self), fields(network = %self.network, tx_hash = %tx_hash))]
    async fn get_transaction_outcome(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>> {
        trace!("Fetching transaction receipt");
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;

        match &receipt {
            Some(_) => debug!(event = "transaction_receipt_found"),
            None => debug!(event = "transaction_receipt_not_found"),
        }
        Ok(receipt.as_ref().map(outcome_from_receipt))
    }
}
