// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use bon::Builder;
use tracing::{debug, error, info, warn, Instrument};

use super::state::{MintResult, TransferRecord, TransferResult, TransferState, TransferStatus};
use crate::attestation::{AttestationPoller, PollingConfig};
use crate::chain::{
    message_transmitter_address, token_address, token_messenger_address, ChainRoute, Network,
    Token,
};
use crate::codec::address::{check as check_address, to_canonical_form};
use crate::codec::{format_units, parse_units, validate_amount, AmountRules};
use crate::contracts::{BurnRequest, Erc20Contract, MessageTransmitterContract, TokenMessengerContract};
use crate::error::{CctpError, Result};
use crate::protocol::{validate_attestation, AttestationRecord, CctpMessage};
use crate::spans;
use crate::traits::{AttestationProvider, ChainClient, Clock, TransactionOutcome};

/// Source-chain contracts involved in a burn.
#[derive(Debug, Clone, Copy)]
struct SourceContracts {
    usdc: Erc20Contract,
    token_messenger: TokenMessengerContract,
    message_transmitter: MessageTransmitterContract,
    source_domain: u32,
    destination_domain: u32,
}

/// A CCTP v1 USDC transfer along one route: burn on the source chain, wait
/// for Circle's attestation, mint on the destination chain.
///
/// Each step is exposed separately so a transfer can be driven across
/// processes from a persisted [`TransferResult`]; [`transfer`](Self::transfer)
/// runs all three.
///
/// The destination client is optional. Without one the burn and attestation
/// steps work, and the steps that touch the destination chain fail with
/// [`MissingDestinationClient`](CctpError::MissingDestinationClient).
///
/// # Example
///
/// ```rust,ignore
/// use cctp_transfer::{AttestationPoller, CctpTransfer, ChainRoute, Network};
/// use cctp_transfer::providers::{IrisAttestationProvider, TokioClock};
///
/// let transfer = CctpTransfer::builder()
///     .route(ChainRoute::new(Network::EthereumSepolia, Network::BaseSepolia)?)
///     .source_client(sepolia)
///     .destination_client(base_sepolia)
///     .attestation(AttestationPoller::new(IrisAttestationProvider::sandbox()?, TokioClock))
///     .build();
///
/// let burn = transfer
///     .initiate_transfer("10.5", "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d", None)
///     .await?;
/// let attestation = transfer.wait_for_attestation(burn.message_hash).await?;
/// let mint = transfer.complete_transfer(burn.message_bytes, attestation).await?;
/// ```
#[derive(Builder, Debug, Clone)]
pub struct CctpTransfer<S, D, A, C> {
    route: ChainRoute,
    source_client: S,
    destination_client: Option<D>,
    attestation: AttestationPoller<A, C>,
    #[builder(default)]
    polling: PollingConfig,
    /// Approve the TokenMessenger first when the allowance is short.
    #[builder(default = true)]
    approve_allowance: bool,
    #[builder(default = AmountRules::transfer())]
    amount_rules: AmountRules,
}

impl<S, D, A, C> CctpTransfer<S, D, A, C>
where
    S: ChainClient,
    D: ChainClient,
    A: AttestationProvider,
    C: Clock,
{
    pub fn route(&self) -> ChainRoute {
        self.route
    }

    pub fn source_client(&self) -> &S {
        &self.source_client
    }

    pub fn destination_client(&self) -> Option<&D> {
        self.destination_client.as_ref()
    }

    pub fn attestation_poller(&self) -> &AttestationPoller<A, C> {
        &self.attestation
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// Burns `amount` USDC on the source chain for `destination_address`.
    ///
    /// Addresses, the amount and the contract registry are all checked
    /// before the first chain call. When `approve_allowance` is set and the
    /// TokenMessenger's allowance is short, an `approve` is sent first.
    ///
    /// # Errors
    ///
    /// - `InvalidAddress` / `InvalidAmount` for rejected input
    /// - `InvalidConfig` when the amount rules allow more decimal places
    ///   than USDC carries
    /// - `MissingContract` when the source network lacks a registry entry
    /// - `TransactionReverted` if the approval or the burn reverts
    /// - `ProtocolViolation` if the burn receipt lacks the expected events or
    ///   they disagree with each other or with the route
    pub async fn initiate_transfer(
        &self,
        amount: &str,
        destination_address: &str,
        destination_caller: Option<&str>,
    ) -> Result<TransferResult> {
        let span = spans::initiate_transfer(
            self.route.source(),
            self.route.destination(),
            destination_address,
            amount,
        );

        async move {
            let result = self
                .burn(amount, destination_address, destination_caller)
                .await;
            match &result {
                Ok(transfer) => info!(
                    tx_hash = %transfer.source_chain_tx_hash,
                    nonce = transfer.nonce,
                    message_hash = %transfer.message_hash,
                    event = "transfer_initiated"
                ),
                Err(e) => {
                    spans::record_error(e);
                    error!(error = %e, event = "transfer_initiation_failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn burn(
        &self,
        amount: &str,
        destination_address: &str,
        destination_caller: Option<&str>,
    ) -> Result<TransferResult> {
        let destination = self.route.destination();

        check_address(destination_address, destination)?;
        let mint_recipient = to_canonical_form(destination_address, destination)?;
        let destination_caller = destination_caller
            .map(|caller| {
                check_address(caller, destination)?;
                to_canonical_form(caller, destination)
            })
            .transpose()?;

        let token_decimals = Token::Usdc.decimals();
        if self.amount_rules.decimals > token_decimals {
            return Err(CctpError::InvalidConfig(format!(
                "amount rules allow {} decimal places, USDC has {token_decimals}",
                self.amount_rules.decimals
            )));
        }
        validate_amount(amount, &self.amount_rules)?;
        let value = parse_units(amount, token_decimals)?;

        let contracts = self.source_contracts()?;
        let signer = self.source_client.signer_address();

        if self.approve_allowance {
            self.ensure_allowance(&contracts, signer, value).await?;
        }

        let request = BurnRequest {
            amount: value,
            destination_domain: contracts.destination_domain,
            mint_recipient,
            burn_token: contracts.usdc.address(),
            destination_caller,
        };
        let span = spans::deposit_for_burn(
            &signer,
            &mint_recipient,
            request.destination_domain,
            &request.burn_token,
            &value,
        );
        let tx = contracts
            .token_messenger
            .deposit_for_burn_transaction(signer, &request);
        let outcome = self
            .source_client
            .send_transaction(tx)
            .instrument(span)
            .await?;
        ensure_success(&outcome, "burn")?;

        self.transfer_from_receipt(&contracts, &outcome)
    }

    async fn ensure_allowance(
        &self,
        contracts: &SourceContracts,
        owner: Address,
        needed: U256,
    ) -> Result<()> {
        let spender = contracts.token_messenger.address();
        let output = self
            .source_client
            .call(contracts.usdc.allowance_call(owner, spender))
            .await?;
        let allowance = Erc20Contract::decode_amount(&output)?;

        if allowance >= needed {
            debug!(
                allowance = %allowance,
                needed = %needed,
                event = "allowance_sufficient"
            );
            return Ok(());
        }

        let span = spans::approve(&contracts.usdc.address(), &spender, &needed);
        let tx = contracts.usdc.approve_transaction(owner, spender, needed);
        let outcome = self
            .source_client
            .send_transaction(tx)
            .instrument(span)
            .await?;
        ensure_success(&outcome, "approve")?;
        info!(
            tx_hash = %outcome.tx_hash,
            amount = %needed,
            event = "allowance_approved"
        );
        Ok(())
    }

    /// Rebuilds a [`TransferResult`] from a burn that is already mined.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` for an unknown hash; otherwise the same receipt
    /// checks as [`initiate_transfer`](Self::initiate_transfer).
    pub async fn recover_transfer(&self, burn_tx_hash: TxHash) -> Result<TransferResult> {
        let span = spans::recover_transfer(burn_tx_hash, self.route.source());

        async move {
            let result = async {
                let contracts = self.source_contracts()?;
                let outcome = self
                    .source_client
                    .get_transaction_outcome(burn_tx_hash)
                    .await?
                    .ok_or(CctpError::TransactionNotFound(burn_tx_hash))?;
                ensure_success(&outcome, "burn")?;
                self.transfer_from_receipt(&contracts, &outcome)
            }
            .await;

            match &result {
                Ok(transfer) => info!(
                    nonce = transfer.nonce,
                    message_hash = %transfer.message_hash,
                    event = "transfer_recovered"
                ),
                Err(e) => {
                    spans::record_error(e);
                    error!(error = %e, event = "transfer_recovery_failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Current attestation state, straight from the service.
    pub async fn get_attestation(&self, message_hash: B256) -> Result<AttestationRecord> {
        self.attestation.fetch(message_hash).await
    }

    pub async fn get_transfer_status(&self, message_hash: B256) -> Result<TransferStatus> {
        let record = self.attestation.fetch(message_hash).await?;
        let estimated_wait = if record.is_complete() {
            None
        } else {
            self.route.source().attestation_median()
        };
        Ok(TransferStatus {
            record,
            estimated_wait,
        })
    }

    /// Polls with the configured [`PollingConfig`].
    pub async fn wait_for_attestation(&self, message_hash: B256) -> Result<Bytes> {
        self.attestation.wait_for(message_hash, self.polling).await
    }

    /// Submits `receiveMessage` on the destination chain.
    ///
    /// A mined but reverted mint is reported with `success == false`, not as
    /// an error. Replays are not pre-checked; see
    /// [`check_nonce_used`](Self::check_nonce_used).
    ///
    /// # Errors
    ///
    /// - `MissingDestinationClient` without a destination client
    /// - `InvalidAttestation` for a payload that is not whole 65-byte
    ///   signatures
    /// - `InvalidMessage` if the message does not decode or targets another
    ///   domain
    pub async fn complete_transfer(
        &self,
        message_bytes: Bytes,
        attestation: Bytes,
    ) -> Result<MintResult> {
        let client = self.require_destination("complete a transfer")?;
        let destination = self.route.destination();
        let transmitter = destination_transmitter(destination)?;

        validate_attestation(&attestation)?;
        let message = CctpMessage::decode(&message_bytes)?;
        let expected_domain = domain_of(destination)?;
        if message.destination_domain != expected_domain {
            return Err(CctpError::InvalidMessage(format!(
                "message targets domain {}, but {destination} is domain {expected_domain}",
                message.destination_domain
            )));
        }

        let message_hash = keccak256(&message_bytes);
        let span = spans::complete_transfer(&message_hash, destination, attestation.len());

        async move {
            let tx = transmitter.receive_message_transaction(
                client.signer_address(),
                message_bytes,
                attestation,
            );
            let outcome = match client.send_transaction(tx).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    spans::record_error(&e);
                    error!(error = %e, event = "mint_submission_failed");
                    return Err(e);
                }
            };
            let received = match transmitter.find_message_received(&outcome.logs) {
                Ok(received) => received,
                Err(e) => {
                    warn!(
                        tx_hash = %outcome.tx_hash,
                        error = %e,
                        event = "message_received_undecodable"
                    );
                    None
                }
            };

            if outcome.success {
                info!(
                    tx_hash = %outcome.tx_hash,
                    source_domain = message.source_domain,
                    nonce = message.nonce,
                    event = "transfer_completed"
                );
            } else {
                spans::record_error_with_context(
                    "TransactionReverted",
                    &format!("receiveMessage {} reverted", outcome.tx_hash),
                    Some("the nonce may already be used"),
                );
                warn!(
                    tx_hash = %outcome.tx_hash,
                    nonce = message.nonce,
                    event = "mint_reverted"
                );
            }

            Ok(MintResult {
                tx_hash: outcome.tx_hash,
                success: outcome.success,
                received,
            })
        }
        .instrument(span)
        .await
    }

    /// Whether the destination chain already processed `nonce` from
    /// `source_domain`.
    pub async fn check_nonce_used(&self, source_domain: u32, nonce: u64) -> Result<bool> {
        let client = self.require_destination("check a nonce")?;
        let transmitter = destination_transmitter(self.route.destination())?;

        let output = client
            .call(transmitter.used_nonces_call(source_domain, nonce))
            .await?;
        let used = MessageTransmitterContract::decode_used_nonce(&output)?;
        debug!(
            source_domain = source_domain,
            nonce = nonce,
            used = used,
            event = "nonce_checked"
        );
        Ok(used)
    }

    /// The source signer's balance of `token`, as a decimal string.
    pub async fn source_balance(&self, token: Token) -> Result<String> {
        let source = self.route.source();
        let contract = token_address(source, token)
            .map(Erc20Contract::new)
            .ok_or(CctpError::MissingContract {
                network: source,
                contract: token.symbol(),
            })?;

        let output = self
            .source_client
            .call(contract.balance_of_call(self.source_client.signer_address()))
            .await?;
        let balance = Erc20Contract::decode_amount(&output)?;
        Ok(format_units(balance, token.decimals()))
    }

    /// Burn, wait for the attestation, mint.
    ///
    /// The destination client is checked before anything is burned.
    pub async fn transfer(
        &self,
        amount: &str,
        destination_address: &str,
        destination_caller: Option<&str>,
    ) -> Result<(TransferResult, MintResult)> {
        self.require_destination("complete a transfer")?;

        let burn = self
            .initiate_transfer(amount, destination_address, destination_caller)
            .await?;
        let attestation = self.wait_for_attestation(burn.message_hash).await?;
        let mint = self
            .complete_transfer(burn.message_bytes.clone(), attestation)
            .await?;

        info!(
            burn_tx_hash = %burn.source_chain_tx_hash,
            mint_tx_hash = %mint.tx_hash,
            success = mint.success,
            event = "full_transfer_finished"
        );
        Ok((burn, mint))
    }

    /// Drives a persisted record forward until it completes or fails.
    ///
    /// A `Burned` record waits for its attestation; an `Attested` one is
    /// minted. When the mint reverts, `usedNonces` decides: a used nonce
    /// means an earlier mint went through and the record completes without a
    /// mint hash, otherwise the record is marked `Failed`. Terminal records
    /// are left alone.
    pub async fn resume_transfer(&self, record: &mut TransferRecord) -> Result<TransferState> {
        if record.state == TransferState::Burned {
            let attestation = self.wait_for_attestation(record.result.message_hash).await?;
            record.record_attestation(attestation)?;
            debug!(
                message_hash = %record.result.message_hash,
                event = "transfer_record_attested"
            );
        }

        if record.state == TransferState::Attested {
            let attestation = record.attestation.clone().ok_or_else(|| {
                CctpError::InvalidAttestation("attested record carries no attestation".into())
            })?;
            let mint = self
                .complete_transfer(record.result.message_bytes.clone(), attestation)
                .await?;
            if mint.success {
                record.record_mint(mint.tx_hash)?;
            } else if self
                .check_nonce_used(record.result.source_domain, record.result.nonce)
                .await?
            {
                info!(
                    tx_hash = %mint.tx_hash,
                    nonce = record.result.nonce,
                    event = "mint_already_processed"
                );
                record.record_prior_mint()?;
            } else {
                record.fail(format!("receiveMessage {} reverted", mint.tx_hash))?;
            }
        }

        Ok(record.state)
    }

    fn require_destination(&self, operation: &'static str) -> Result<&D> {
        self.destination_client
            .as_ref()
            .ok_or(CctpError::MissingDestinationClient { operation })
    }

    fn source_contracts(&self) -> Result<SourceContracts> {
        let source = self.route.source();
        let usdc = token_address(source, Token::Usdc).ok_or(CctpError::MissingContract {
            network: source,
            contract: "USDC",
        })?;
        let token_messenger =
            token_messenger_address(source).ok_or(CctpError::MissingContract {
                network: source,
                contract: "TokenMessenger",
            })?;
        let message_transmitter =
            message_transmitter_address(source).ok_or(CctpError::MissingContract {
                network: source,
                contract: "MessageTransmitter",
            })?;

        Ok(SourceContracts {
            usdc: Erc20Contract::new(usdc),
            token_messenger: TokenMessengerContract::new(token_messenger),
            message_transmitter: MessageTransmitterContract::new(message_transmitter),
            source_domain: domain_of(source)?,
            destination_domain: domain_of(self.route.destination())?,
        })
    }

    fn transfer_from_receipt(
        &self,
        contracts: &SourceContracts,
        outcome: &TransactionOutcome,
    ) -> Result<TransferResult> {
        let tx_hash = outcome.tx_hash;
        let deposit = contracts
            .token_messenger
            .find_deposit_for_burn(&outcome.logs)?
            .ok_or_else(|| {
                CctpError::ProtocolViolation(format!("burn {tx_hash} emitted no DepositForBurn event"))
            })?;
        let message_bytes = contracts
            .message_transmitter
            .find_message_sent(&outcome.logs)?
            .ok_or_else(|| {
                CctpError::ProtocolViolation(format!("burn {tx_hash} emitted no MessageSent event"))
            })?;

        let message = CctpMessage::decode(&message_bytes).map_err(|e| {
            CctpError::ProtocolViolation(format!("MessageSent payload of {tx_hash}: {e}"))
        })?;
        if message.nonce != deposit.nonce {
            return Err(CctpError::ProtocolViolation(format!(
                "message nonce {} differs from DepositForBurn nonce {}",
                message.nonce, deposit.nonce
            )));
        }
        if message.source_domain != contracts.source_domain {
            return Err(CctpError::ProtocolViolation(format!(
                "message source domain {} differs from route source domain {}",
                message.source_domain, contracts.source_domain
            )));
        }
        if message.destination_domain != contracts.destination_domain
            || deposit.destination_domain != contracts.destination_domain
        {
            return Err(CctpError::ProtocolViolation(format!(
                "burn targets domain {}, route destination is domain {}",
                deposit.destination_domain, contracts.destination_domain
            )));
        }

        Ok(TransferResult {
            source_chain_tx_hash: tx_hash,
            nonce: deposit.nonce,
            message_hash: keccak256(&message_bytes),
            message_bytes,
            source_domain: message.source_domain,
            destination_domain: message.destination_domain,
            amount: deposit.amount,
            burn_token: deposit.burn_token,
            mint_recipient: deposit.mint_recipient,
        })
    }
}

fn ensure_success(outcome: &TransactionOutcome, step: &str) -> Result<()> {
    if outcome.success {
        return Ok(());
    }
    error!(
        tx_hash = %outcome.tx_hash,
        step = step,
        event = "transaction_reverted"
    );
    Err(CctpError::TransactionReverted {
        tx_hash: outcome.tx_hash,
    })
}

fn domain_of(network: Network) -> Result<u32> {
    network
        .domain_id()
        .map(|domain| domain.as_u32())
        .ok_or(CctpError::MissingContract {
            network,
            contract: "CCTP domain",
        })
}

fn destination_transmitter(network: Network) -> Result<MessageTransmitterContract> {
    message_transmitter_address(network)
        .map(MessageTransmitterContract::new)
        .ok_or(CctpError::MissingContract {
            network,
            contract: "MessageTransmitter",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AttestationState;
    use crate::testing::{
        fake_attestation, BurnFixture, FakeAttestationProvider, FakeChainClient, FakeClock,
    };
    use crate::contracts::token_messenger::TokenMessenger::depositForBurnCall;
    use alloy_primitives::{address, Log};
    use alloy_sol_types::{SolCall, SolValue};
    use std::time::Duration;

    const SIGNER: Address = address!("1111111111111111111111111111111111111111");
    const RECIPIENT: &str = "0x2222222222222222222222222222222222222222";
    const ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
    const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
    const USED_NONCES: [u8; 4] = [0xfe, 0xb6, 0x17, 0x24];

    type TestTransfer =
        CctpTransfer<FakeChainClient, FakeChainClient, FakeAttestationProvider, FakeClock>;

    struct Harness {
        transfer: TestTransfer,
        source: FakeChainClient,
        destination: FakeChainClient,
        attestations: FakeAttestationProvider,
        clock: FakeClock,
    }

    fn harness(approve_allowance: bool) -> Harness {
        harness_with_rules(approve_allowance, AmountRules::transfer())
    }

    fn harness_with_rules(approve_allowance: bool, amount_rules: AmountRules) -> Harness {
        let source = FakeChainClient::new(SIGNER);
        let destination = FakeChainClient::new(SIGNER);
        let attestations = FakeAttestationProvider::new();
        let clock = FakeClock::new();

        let transfer = CctpTransfer::builder()
            .route(ChainRoute::new(Network::Ethereum, Network::Base).unwrap())
            .source_client(source.clone())
            .destination_client(destination.clone())
            .attestation(AttestationPoller::new(attestations.clone(), clock.clone()))
            .approve_allowance(approve_allowance)
            .amount_rules(amount_rules)
            .build();

        Harness {
            transfer,
            source,
            destination,
            attestations,
            clock,
        }
    }

    fn fixture() -> BurnFixture {
        BurnFixture::new(
            Network::Ethereum,
            Network::Base,
            SIGNER,
            U256::from(10_500_000u64),
        )
        .with_nonce(77)
        .with_mint_recipient(RECIPIENT.parse::<Address>().unwrap().into_word())
    }

    #[tokio::test]
    async fn test_initiate_transfer_skips_approval_when_allowance_suffices() {
        let h = harness(true);
        h.source
            .set_call_result(ALLOWANCE, U256::from(u64::MAX).abi_encode());
        let fixture = fixture();
        h.source
            .push_outcome(fixture.outcome(TxHash::repeat_byte(0xb0)).unwrap());

        let result = h
            .transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap();

        let sent = h.source.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(&sent[0].input.input().unwrap()[..4], &[0x6f, 0xd3, 0x50, 0x4e]);
        assert_eq!(result.nonce, 77);
        assert_eq!(result.amount, U256::from(10_500_000u64));
        assert_eq!(result.source_domain, 0);
        assert_eq!(result.destination_domain, 6);
        assert_eq!(result.message_hash, fixture.message().unwrap().hash());
    }

    #[tokio::test]
    async fn test_initiate_transfer_approves_short_allowance() {
        let h = harness(true);
        h.source.set_call_result(ALLOWANCE, U256::ZERO.abi_encode());
        h.source.push_outcome(TransactionOutcome {
            tx_hash: TxHash::repeat_byte(0xa0),
            success: true,
            block_number: Some(1),
            logs: Vec::new(),
        });
        h.source
            .push_outcome(fixture().outcome(TxHash::repeat_byte(0xb0)).unwrap());

        h.transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap();

        let sent = h.source.sent_transactions();
        assert_eq!(sent.len(), 2);
        assert_eq!(&sent[0].input.input().unwrap()[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[tokio::test]
    async fn test_reverted_approval_stops_before_burn() {
        let h = harness(true);
        h.source.set_call_result(ALLOWANCE, U256::ZERO.abi_encode());
        h.source.push_outcome(TransactionOutcome {
            tx_hash: TxHash::repeat_byte(0xa0),
            success: false,
            block_number: Some(1),
            logs: Vec::new(),
        });

        let err = h
            .transfer
            .initiate_transfer("1", RECIPIENT, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::TransactionReverted { .. }));
        assert_eq!(h.source.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_destination_caller_selects_with_caller_variant() {
        let h = harness(false);
        h.source
            .push_outcome(fixture().outcome(TxHash::repeat_byte(0xb0)).unwrap());

        h.transfer
            .initiate_transfer("10.5", RECIPIENT, Some(RECIPIENT))
            .await
            .unwrap();

        let sent = h.source.sent_transactions();
        assert_eq!(&sent[0].input.input().unwrap()[..4], &[0xf8, 0x56, 0xdd, 0xb6]);
        assert!(h.source.call_requests().is_empty());
    }

    #[tokio::test]
    async fn test_nonce_mismatch_is_protocol_violation() {
        let h = harness(false);
        let fixture = fixture();
        let mut message = fixture.message().unwrap();
        message.nonce += 1;
        h.source.push_outcome(TransactionOutcome {
            tx_hash: TxHash::repeat_byte(0xb0),
            success: true,
            block_number: Some(1),
            logs: vec![
                fixture.message_sent_log(&message).unwrap(),
                fixture.deposit_for_burn_log().unwrap(),
            ],
        });

        let err = h
            .transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::ProtocolViolation(msg) if msg.contains("nonce")));
    }

    #[tokio::test]
    async fn test_recover_transfer_matches_initiated_result() {
        let h = harness(false);
        let tx_hash = TxHash::repeat_byte(0xb0);
        h.source.push_outcome(fixture().outcome(tx_hash).unwrap());
        let initiated = h
            .transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap();

        let recovered = h.transfer.recover_transfer(tx_hash).await.unwrap();

        assert_eq!(recovered, initiated);
    }

    #[tokio::test]
    async fn test_recover_unknown_transaction() {
        let h = harness(false);

        let err = h
            .transfer
            .recover_transfer(TxHash::repeat_byte(0xee))
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::TransactionNotFound(_)));
    }

    #[tokio::test]
    async fn test_transfer_status_estimates_wait_while_pending() {
        let h = harness(false);
        let hash = B256::repeat_byte(5);

        let pending = h.transfer.get_transfer_status(hash).await.unwrap();
        assert_eq!(pending.record.status, AttestationState::Pending);
        assert_eq!(pending.estimated_wait, Some(Duration::from_secs(19 * 60)));

        h.attestations
            .add_complete_response(hash, fake_attestation(2, 1));
        let complete = h.transfer.get_transfer_status(hash).await.unwrap();
        assert!(complete.record.is_complete());
        assert_eq!(complete.estimated_wait, None);
    }

    #[tokio::test]
    async fn test_complete_transfer_reports_received_message() {
        let h = harness(false);
        let fixture = fixture();
        h.destination
            .push_outcome(fixture.mint_outcome(TxHash::repeat_byte(0xc0)).unwrap());

        let mint = h
            .transfer
            .complete_transfer(fixture.message().unwrap().encode(), fake_attestation(2, 3))
            .await
            .unwrap();

        assert!(mint.success);
        assert_eq!(mint.received.map(|r| r.nonce), Some(77));
        let sent = h.destination.sent_transactions();
        assert_eq!(&sent[0].input.input().unwrap()[..4], &[0x57, 0xec, 0xfd, 0x28]);
    }

    #[tokio::test]
    async fn test_complete_transfer_reverted_mint_is_not_an_error() {
        let h = harness(false);
        h.destination.push_outcome(TransactionOutcome {
            tx_hash: TxHash::repeat_byte(0xc0),
            success: false,
            block_number: Some(2),
            logs: Vec::new(),
        });

        let mint = h
            .transfer
            .complete_transfer(fixture().message().unwrap().encode(), fake_attestation(1, 3))
            .await
            .unwrap();

        assert!(!mint.success);
        assert_eq!(mint.received, None);
    }

    #[tokio::test]
    async fn test_complete_transfer_rejects_wrong_destination_domain() {
        let h = harness(false);
        let mut message = fixture().message().unwrap();
        message.destination_domain = 3;

        let err = h
            .transfer
            .complete_transfer(message.encode(), fake_attestation(1, 3))
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::InvalidMessage(_)));
        assert_eq!(h.destination.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_transfer_rejects_partial_signature() {
        let h = harness(false);

        let err = h
            .transfer
            .complete_transfer(
                fixture().message().unwrap().encode(),
                Bytes::from(vec![1u8; 64]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::InvalidAttestation(_)));
    }

    #[tokio::test]
    async fn test_check_nonce_used() {
        let h = harness(false);
        h.destination
            .set_call_result(USED_NONCES, U256::from(1).abi_encode());

        assert!(h.transfer.check_nonce_used(0, 77).await.unwrap());
        assert!(h.source.call_requests().is_empty());
    }

    #[tokio::test]
    async fn test_source_balance_is_human_readable() {
        let h = harness(false);
        h.source
            .set_call_result(BALANCE_OF, U256::from(1_234_500u64).abi_encode());

        let balance = h.transfer.source_balance(Token::Usdc).await.unwrap();

        assert_eq!(balance, "1.2345");
    }

    #[tokio::test]
    async fn test_resume_transfer_completes_record() {
        let h = harness(false);
        let fixture = fixture();
        let tx_hash = TxHash::repeat_byte(0xb0);
        h.source.push_outcome(fixture.outcome(tx_hash).unwrap());
        let result = h
            .transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap();
        h.attestations
            .add_pending_then_complete(result.message_hash, 1, fake_attestation(2, 9));
        h.destination
            .push_outcome(fixture.mint_outcome(TxHash::repeat_byte(0xc0)).unwrap());

        let mut record = TransferRecord::burned(result);
        let state = h.transfer.resume_transfer(&mut record).await.unwrap();

        assert_eq!(state, TransferState::Completed);
        assert_eq!(record.mint_tx_hash, Some(TxHash::repeat_byte(0xc0)));
        assert_eq!(h.clock.sleep_count(), 1);
    }

    #[tokio::test]
    async fn test_burn_amount_uses_usdc_decimals_not_rule_precision() {
        let h = harness_with_rules(false, AmountRules::transfer().with_decimals(2));
        h.source
            .push_outcome(fixture().outcome(TxHash::repeat_byte(0xb0)).unwrap());

        h.transfer
            .initiate_transfer("10", RECIPIENT, None)
            .await
            .unwrap();

        let sent = h.source.sent_transactions();
        let call = depositForBurnCall::abi_decode(sent[0].input.input().unwrap()).unwrap();
        assert_eq!(call.amount, U256::from(10_000_000u64));
        assert_eq!(call.destinationDomain, 6);
    }

    #[tokio::test]
    async fn test_coarse_rules_still_reject_extra_precision() {
        let h = harness_with_rules(false, AmountRules::transfer().with_decimals(2));

        let err = h
            .transfer
            .initiate_transfer("10.123", RECIPIENT, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::InvalidAmount { .. }));
        assert_eq!(h.source.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_rules_finer_than_usdc_are_rejected_before_sending() {
        let h = harness_with_rules(false, AmountRules::transfer().with_decimals(8));

        let err = h
            .transfer
            .initiate_transfer("1.5", RECIPIENT, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::InvalidConfig(_)));
        assert_eq!(h.source.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_transfer_keeps_mined_mint_with_undecodable_event() {
        let h = harness(false);
        let fixture = fixture();
        let mut outcome = fixture.mint_outcome(TxHash::repeat_byte(0xc0)).unwrap();
        let log = outcome.logs.remove(0);
        outcome.logs.push(Log::new_unchecked(
            log.address,
            log.topics().to_vec(),
            Bytes::copy_from_slice(&log.data.data[..16]),
        ));
        h.destination.push_outcome(outcome);

        let mint = h
            .transfer
            .complete_transfer(fixture.message().unwrap().encode(), fake_attestation(2, 3))
            .await
            .unwrap();

        assert!(mint.success);
        assert_eq!(mint.tx_hash, TxHash::repeat_byte(0xc0));
        assert_eq!(mint.received, None);
    }

    async fn attested_record(h: &Harness) -> TransferRecord {
        h.source
            .push_outcome(fixture().outcome(TxHash::repeat_byte(0xb0)).unwrap());
        let result = h
            .transfer
            .initiate_transfer("10.5", RECIPIENT, None)
            .await
            .unwrap();
        let mut record = TransferRecord::burned(result);
        record.record_attestation(fake_attestation(1, 3)).unwrap();
        record
    }

    fn reverted_mint() -> TransactionOutcome {
        TransactionOutcome {
            tx_hash: TxHash::repeat_byte(0xc1),
            success: false,
            block_number: Some(3),
            logs: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_resume_completes_when_replayed_mint_reverts_on_used_nonce() {
        let h = harness(false);
        let mut record = attested_record(&h).await;
        h.destination.push_outcome(reverted_mint());
        h.destination
            .set_call_result(USED_NONCES, U256::from(1).abi_encode());

        let state = h.transfer.resume_transfer(&mut record).await.unwrap();

        assert_eq!(state, TransferState::Completed);
        assert_eq!(record.mint_tx_hash, None);
        assert_eq!(record.failure, None);
        assert_eq!(h.attestations.get_call_count(record.result.message_hash), 0);
    }

    #[tokio::test]
    async fn test_resume_fails_when_mint_reverts_on_unused_nonce() {
        let h = harness(false);
        let mut record = attested_record(&h).await;
        h.destination.push_outcome(reverted_mint());
        h.destination.set_call_result(USED_NONCES, U256::ZERO.abi_encode());

        let state = h.transfer.resume_transfer(&mut record).await.unwrap();

        assert_eq!(state, TransferState::Failed);
        assert_eq!(record.mint_tx_hash, None);
        assert!(record.failure.unwrap().contains("reverted"));
    }
}
