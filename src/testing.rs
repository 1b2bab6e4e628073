// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Fakes for the traits in [`crate::traits`] and builders for the receipts a
//! burn produces.
//!
//! These let a whole transfer run in-process: scripted receipts and view
//! results on the chain side, scripted response sequences on the attestation
//! side, and a clock that records sleeps instead of waiting. Every fake is
//! cheap to clone and shares its state between clones, so a test can hand one
//! copy to [`CctpTransfer`](crate::CctpTransfer) and inspect the other.

use alloy_primitives::{keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chain::{message_transmitter_address, token_address, token_messenger_address};
use crate::chain::{Network, Token};
use crate::contracts::message_transmitter::MessageTransmitter::{MessageReceived, MessageSent};
use crate::contracts::token_messenger::TokenMessenger::DepositForBurn;
use crate::error::{CctpError, Result};
use crate::protocol::{AttestationResponse, BurnMessage, CctpMessage};
use crate::traits::{AttestationProvider, ChainClient, Clock, TransactionOutcome};

// ============================================================================
// Fake Chain Client
// ============================================================================

#[derive(Debug, Clone)]
enum ScriptedSend {
    Outcome(TransactionOutcome),
    Failure(String),
}

/// A chain client that replays scripted outcomes and records every request.
///
/// - `send_transaction` pops the next scripted outcome; with none left it
///   mines a successful transaction without logs.
/// - `call` answers by the 4-byte selector of the calldata.
/// - Every mined outcome becomes visible to `get_transaction_outcome`.
#[derive(Clone, Debug)]
pub struct FakeChainClient {
    signer: Address,
    sends: Arc<Mutex<VecDeque<ScriptedSend>>>,
    call_results: Arc<Mutex<HashMap<[u8; 4], Bytes>>>,
    receipts: Arc<Mutex<HashMap<TxHash, TransactionOutcome>>>,
    sent: Arc<Mutex<Vec<TransactionRequest>>>,
    calls: Arc<Mutex<Vec<TransactionRequest>>>,
    lookups: Arc<Mutex<Vec<TxHash>>>,
}

impl FakeChainClient {
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            sends: Arc::default(),
            call_results: Arc::default(),
            receipts: Arc::default(),
            sent: Arc::default(),
            calls: Arc::default(),
            lookups: Arc::default(),
        }
    }

    /// Queue the outcome of the next `send_transaction`.
    pub fn push_outcome(&self, outcome: TransactionOutcome) {
        self.sends
            .lock()
            .unwrap()
            .push_back(ScriptedSend::Outcome(outcome));
    }

    /// Queue an RPC failure for the next `send_transaction`.
    pub fn push_send_failure(&self, message: impl Into<String>) {
        self.sends
            .lock()
            .unwrap()
            .push_back(ScriptedSend::Failure(message.into()));
    }

    /// Answer view calls whose calldata starts with `selector`.
    pub fn set_call_result(&self, selector: [u8; 4], output: impl Into<Bytes>) {
        self.call_results
            .lock()
            .unwrap()
            .insert(selector, output.into());
    }

    /// Make an already-mined transaction visible to lookups.
    pub fn add_receipt(&self, outcome: TransactionOutcome) {
        self.receipts
            .lock()
            .unwrap()
            .insert(outcome.tx_hash, outcome);
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_requests(&self) -> Vec<TransactionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of trait calls made against this client.
    pub fn invocation_count(&self) -> usize {
        self.sent.lock().unwrap().len()
            + self.calls.lock().unwrap().len()
            + self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionOutcome> {
        let index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(tx);
            sent.len()
        };

        let scripted = self.sends.lock().unwrap().pop_front();
        let outcome = match scripted {
            Some(ScriptedSend::Failure(message)) => return Err(CctpError::Provider(message)),
            Some(ScriptedSend::Outcome(outcome)) => outcome,
            None => TransactionOutcome {
                tx_hash: keccak256((index as u64).to_be_bytes()),
                success: true,
                block_number: Some(index as u64),
                logs: Vec::new(),
            },
        };

        self.add_receipt(outcome.clone());
        Ok(outcome)
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        let selector = tx
            .input
            .input()
            .and_then(|input| input.get(..4))
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok());
        self.calls.lock().unwrap().push(tx);

        let Some(selector) = selector else {
            return Err(CctpError::Provider("call without calldata".to_string()));
        };
        self.call_results
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| {
                CctpError::Provider(format!(
                    "no scripted result for selector 0x{}",
                    alloy_primitives::hex::encode(selector)
                ))
            })
    }

    async fn get_transaction_outcome(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>> {
        self.lookups.lock().unwrap().push(tx_hash);
        Ok(self.receipts.lock().unwrap().get(&tx_hash).cloned())
    }
}

// ============================================================================
// Fake Attestation Provider
// ============================================================================

#[derive(Debug, Clone)]
enum ScriptedAttestation {
    Response(AttestationResponse),
    ServiceError { status: u16, body: String },
}

/// An attestation provider that replays a response sequence per message hash.
///
/// The last scripted entry repeats once the sequence is exhausted. Unknown
/// hashes are pending, as the real service's 404 is.
#[derive(Clone, Debug, Default)]
pub struct FakeAttestationProvider {
    responses: Arc<Mutex<HashMap<B256, Vec<ScriptedAttestation>>>>,
    call_counts: Arc<Mutex<HashMap<B256, usize>>>,
}

impl FakeAttestationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response_sequence(&self, message_hash: B256, responses: Vec<AttestationResponse>) {
        let scripted = responses
            .into_iter()
            .map(ScriptedAttestation::Response)
            .collect();
        self.responses
            .lock()
            .unwrap()
            .insert(message_hash, scripted);
    }

    pub fn add_complete_response(&self, message_hash: B256, attestation: Bytes) {
        self.add_response_sequence(message_hash, vec![AttestationResponse::complete(attestation)]);
    }

    /// `pending_count` pending answers, then a complete one.
    pub fn add_pending_then_complete(
        &self,
        message_hash: B256,
        pending_count: usize,
        attestation: Bytes,
    ) {
        let mut responses = vec![AttestationResponse::pending(); pending_count];
        responses.push(AttestationResponse::complete(attestation));
        self.add_response_sequence(message_hash, responses);
    }

    /// Every lookup fails with the given HTTP status.
    pub fn add_service_error(&self, message_hash: B256, status: u16, body: impl Into<String>) {
        self.responses.lock().unwrap().insert(
            message_hash,
            vec![ScriptedAttestation::ServiceError {
                status,
                body: body.into(),
            }],
        );
    }

    pub fn get_call_count(&self, message_hash: B256) -> usize {
        self.call_counts
            .lock()
            .unwrap()
            .get(&message_hash)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl AttestationProvider for FakeAttestationProvider {
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationResponse> {
        let index = {
            let mut counts = self.call_counts.lock().unwrap();
            let count = counts.entry(message_hash).or_insert(0);
            *count += 1;
            *count - 1
        };

        let responses = self.responses.lock().unwrap();
        let Some(sequence) = responses.get(&message_hash) else {
            return Ok(AttestationResponse::pending());
        };
        let scripted = sequence.get(index).or_else(|| sequence.last());

        match scripted {
            None => Ok(AttestationResponse::pending()),
            Some(ScriptedAttestation::Response(response)) => Ok(response.clone()),
            Some(ScriptedAttestation::ServiceError { status, body }) => {
                Err(CctpError::AttestationService {
                    status: *status,
                    body: body.clone(),
                })
            }
        }
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A clock whose `sleep` returns immediately and advances fake time.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::default(),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        *self.current_time.lock().unwrap() += duration;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleep_log.lock().unwrap().clone()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }

    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}

// ============================================================================
// Burn receipts
// ============================================================================

/// A USDC burn between two EVM networks, as the source chain records it.
///
/// Contract addresses, domains and the burn token come from the registry, so
/// the logs it builds are the ones a live burn on `source` would emit.
#[derive(Debug, Clone)]
pub struct BurnFixture {
    pub source: Network,
    pub destination: Network,
    pub nonce: u64,
    pub amount: U256,
    pub depositor: Address,
    pub mint_recipient: B256,
    pub destination_caller: B256,
}

fn registered<T>(value: Option<T>, network: Network, contract: &'static str) -> Result<T> {
    value.ok_or(CctpError::MissingContract { network, contract })
}

impl BurnFixture {
    pub fn new(source: Network, destination: Network, depositor: Address, amount: U256) -> Self {
        Self {
            source,
            destination,
            nonce: 1,
            amount,
            depositor,
            mint_recipient: depositor.into_word(),
            destination_caller: B256::ZERO,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_mint_recipient(mut self, mint_recipient: B256) -> Self {
        self.mint_recipient = mint_recipient;
        self
    }

    pub fn burn_token(&self) -> Result<Address> {
        registered(token_address(self.source, Token::Usdc), self.source, "USDC")
    }

    /// The message the source MessageTransmitter would emit for this burn.
    pub fn message(&self) -> Result<CctpMessage> {
        let source_domain = registered(self.source.domain_id(), self.source, "domain")?;
        let destination_domain =
            registered(self.destination.domain_id(), self.destination, "domain")?;
        let sender = registered(
            token_messenger_address(self.source),
            self.source,
            "TokenMessenger",
        )?;
        let recipient = registered(
            token_messenger_address(self.destination),
            self.destination,
            "TokenMessenger",
        )?;

        let body = BurnMessage {
            version: 0,
            burn_token: self.burn_token()?.into_word(),
            mint_recipient: self.mint_recipient,
            amount: self.amount,
            message_sender: self.depositor.into_word(),
        };

        Ok(CctpMessage {
            version: 0,
            source_domain: source_domain.as_u32(),
            destination_domain: destination_domain.as_u32(),
            nonce: self.nonce,
            sender: sender.into_word(),
            recipient: recipient.into_word(),
            destination_caller: self.destination_caller,
            message_body: body.encode(),
        })
    }

    pub fn deposit_for_burn_log(&self) -> Result<Log> {
        let messenger = registered(
            token_messenger_address(self.source),
            self.source,
            "TokenMessenger",
        )?;
        let destination_messenger = registered(
            token_messenger_address(self.destination),
            self.destination,
            "TokenMessenger",
        )?;
        let destination_domain =
            registered(self.destination.domain_id(), self.destination, "domain")?;

        let event = DepositForBurn {
            nonce: self.nonce,
            burnToken: self.burn_token()?,
            amount: self.amount,
            depositor: self.depositor,
            mintRecipient: self.mint_recipient,
            destinationDomain: destination_domain.as_u32(),
            destinationTokenMessenger: destination_messenger.into_word(),
            destinationCaller: self.destination_caller,
        };
        Ok(Log {
            address: messenger,
            data: event.encode_log_data(),
        })
    }

    pub fn message_sent_log(&self, message: &CctpMessage) -> Result<Log> {
        let transmitter = registered(
            message_transmitter_address(self.source),
            self.source,
            "MessageTransmitter",
        )?;
        Ok(Log {
            address: transmitter,
            data: MessageSent {
                message: message.encode(),
            }
            .encode_log_data(),
        })
    }

    /// Both logs of a successful burn, in emission order.
    pub fn logs(&self) -> Result<Vec<Log>> {
        let message = self.message()?;
        Ok(vec![
            self.message_sent_log(&message)?,
            self.deposit_for_burn_log()?,
        ])
    }

    pub fn outcome(&self, tx_hash: TxHash) -> Result<TransactionOutcome> {
        Ok(TransactionOutcome {
            tx_hash,
            success: true,
            block_number: Some(1),
            logs: self.logs()?,
        })
    }

    /// Receipt of the matching `receiveMessage` on the destination chain.
    pub fn mint_outcome(&self, tx_hash: TxHash) -> Result<TransactionOutcome> {
        let transmitter = registered(
            message_transmitter_address(self.destination),
            self.destination,
            "MessageTransmitter",
        )?;
        let message = self.message()?;
        let event = MessageReceived {
            caller: self.depositor,
            sourceDomain: message.source_domain,
            nonce: message.nonce,
            sender: message.sender,
            messageBody: message.message_body,
        };
        Ok(TransactionOutcome {
            tx_hash,
            success: true,
            block_number: Some(2),
            logs: vec![Log {
                address: transmitter,
                data: event.encode_log_data(),
            }],
        })
    }
}

/// An attestation of `signers` 65-byte signatures filled with `fill`.
pub fn fake_attestation(signers: usize, fill: u8) -> Bytes {
    Bytes::from(vec![fill; signers * crate::protocol::SIGNATURE_LENGTH])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{MessageTransmitterContract, TokenMessengerContract};
    use alloy_primitives::address;

    const DEPOSITOR: Address = address!("1111111111111111111111111111111111111111");

    #[tokio::test]
    async fn test_fake_clock_tracks_sleep_calls() {
        let clock = FakeClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(10)).await;
        clock.sleep(Duration::from_secs(20)).await;

        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(30));
        assert_eq!(clock.now() - start, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_fake_attestation_provider_sequence() {
        let provider = FakeAttestationProvider::new();
        let message_hash = B256::repeat_byte(1);
        provider.add_pending_then_complete(message_hash, 1, fake_attestation(1, 7));

        let first = provider.get_attestation(message_hash).await.unwrap();
        assert_eq!(first, AttestationResponse::pending());
        let second = provider.get_attestation(message_hash).await.unwrap();
        assert_eq!(second.attestation, Some(fake_attestation(1, 7)));
        let repeated = provider.get_attestation(message_hash).await.unwrap();
        assert_eq!(repeated, second);

        assert_eq!(provider.get_call_count(message_hash), 3);
    }

    #[tokio::test]
    async fn test_fake_attestation_provider_unknown_hash_is_pending() {
        let provider = FakeAttestationProvider::new();
        let response = provider.get_attestation(B256::ZERO).await.unwrap();
        assert_eq!(response, AttestationResponse::pending());
    }

    #[tokio::test]
    async fn test_fake_chain_client_records_and_scripts() {
        let client = FakeChainClient::new(DEPOSITOR);
        client.push_send_failure("nonce too low");

        let err = client
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CctpError::Provider(msg) if msg == "nonce too low"));

        let mined = client
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap();
        assert!(mined.success);
        assert_eq!(
            client.get_transaction_outcome(mined.tx_hash).await.unwrap(),
            Some(mined)
        );

        assert!(client.call(TransactionRequest::default()).await.is_err());
        assert_eq!(client.invocation_count(), 4);
    }

    #[test]
    fn test_burn_fixture_logs_decode() {
        let fixture = BurnFixture::new(
            Network::Ethereum,
            Network::Base,
            DEPOSITOR,
            U256::from(1_000_000u64),
        )
        .with_nonce(9);
        let logs = fixture.logs().unwrap();

        let messenger =
            TokenMessengerContract::new(token_messenger_address(Network::Ethereum).unwrap());
        let event = messenger.find_deposit_for_burn(&logs).unwrap().unwrap();
        assert_eq!(event.nonce, 9);
        assert_eq!(event.destination_domain, 6);

        let transmitter =
            MessageTransmitterContract::new(message_transmitter_address(Network::Ethereum).unwrap());
        let bytes = transmitter.find_message_sent(&logs).unwrap().unwrap();
        let message = CctpMessage::decode(&bytes).unwrap();
        assert_eq!(message.nonce, 9);
        assert_eq!(message.burn_message().unwrap().amount, U256::from(1_000_000u64));
    }
}
