//! Test utilities and fake implementations
//!
//! Fakes for every trait in [`crate::traits`], so the workflow can be driven
//! through approval, deposit and failure paths without a wallet, a node or the
//! Across API.
//!
//! The fakes are cheap to clone and share their state, so a test can keep a
//! handle while the controller owns another.

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::contracts::erc20::Erc20;
use crate::contracts::spoke_pool::SpokePool;
use crate::traits::{ChainSigner, Clock, QuoteProvider, WalletGateway};
use crate::{BridgeError, Quote, QuoteRequest, Result};

// ============================================================================
// Fake Wallet
// ============================================================================

#[derive(Clone, Debug)]
enum ConnectBehavior {
    Succeed,
    NoProvider,
    Reject,
}

/// A fake wallet gateway that hands out a [`FakeSigner`].
///
/// This allows testing scenarios like:
/// - No wallet extension installed
/// - User rejecting the connection request
#[derive(Clone, Debug)]
pub struct FakeWallet {
    signer: FakeSigner,
    behavior: Arc<Mutex<ConnectBehavior>>,
    connect_calls: Arc<Mutex<usize>>,
}

impl FakeWallet {
    /// A wallet that connects successfully as `signer`.
    pub fn new(signer: FakeSigner) -> Self {
        Self {
            signer,
            behavior: Arc::new(Mutex::new(ConnectBehavior::Succeed)),
            connect_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A wallet that isn't installed.
    pub fn unavailable() -> Self {
        let wallet = Self::new(FakeSigner::new(Address::ZERO));
        *wallet.behavior.lock().unwrap() = ConnectBehavior::NoProvider;
        wallet
    }

    /// Make the next connection attempts fail with `UserRejected`.
    pub fn reject_connections(&self) {
        *self.behavior.lock().unwrap() = ConnectBehavior::Reject;
    }

    /// Make the next connection attempts succeed.
    pub fn accept_connections(&self) {
        *self.behavior.lock().unwrap() = ConnectBehavior::Succeed;
    }

    pub fn connect_count(&self) -> usize {
        *self.connect_calls.lock().unwrap()
    }
}

#[async_trait]
impl WalletGateway for FakeWallet {
    type Signer = FakeSigner;

    async fn connect(&self) -> Result<FakeSigner> {
        *self.connect_calls.lock().unwrap() += 1;
        match *self.behavior.lock().unwrap() {
            ConnectBehavior::Succeed => Ok(self.signer.clone()),
            ConnectBehavior::NoProvider => Err(BridgeError::NoProvider),
            ConnectBehavior::Reject => Err(BridgeError::UserRejected),
        }
    }
}

// ============================================================================
// Fake Signer
// ============================================================================

/// A `depositV3` call observed by [`FakeSigner`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedDeposit {
    pub spoke_pool: Address,
    pub depositor: Address,
    pub recipient: Address,
    pub input_token: Address,
    pub output_token: Address,
    pub input_amount: U256,
    pub output_amount: U256,
    pub destination_chain_id: U256,
    pub exclusive_relayer: Address,
    pub quote_timestamp: u32,
    pub fill_deadline: u32,
    pub exclusivity_deadline: u32,
    pub message_len: usize,
    pub gas_limit: Option<u64>,
}

#[derive(Debug, Default)]
struct SignerState {
    allowances: HashMap<(Address, Address), U256>,
    read_failure: Option<BridgeError>,
    reject_next_send: bool,
    revert_next: bool,
    reverting: HashSet<TxHash>,
    pending: HashMap<TxHash, TransactionRequest>,
    sent: Vec<TransactionRequest>,
    confirmed: Vec<TxHash>,
    allowance_reads: usize,
    nonce: u64,
}

/// A fake signer backed by an in-memory ERC-20 allowance table.
///
/// Confirming an `approve` transaction updates the table, so allowance only
/// changes after [`ChainSigner::wait_for_confirmation`] returns, as on chain.
///
/// This allows testing scenarios like:
/// - RPC failure on allowance reads
/// - Signer rejecting a transaction
/// - Transaction reverting on chain
/// - Allowance changing behind the controller's back
/// - Confirmations that stay pending until the test releases them
#[derive(Clone, Debug)]
pub struct FakeSigner {
    address: Address,
    state: Arc<Mutex<SignerState>>,
    confirmations_held: Arc<watch::Sender<bool>>,
}

impl FakeSigner {
    pub fn new(address: Address) -> Self {
        let (confirmations_held, _) = watch::channel(false);
        Self {
            address,
            state: Arc::default(),
            confirmations_held: Arc::new(confirmations_held),
        }
    }

    /// Keep every `wait_for_confirmation` pending until
    /// [`release_confirmations`](Self::release_confirmations) is called.
    pub fn hold_confirmations(&self) {
        self.confirmations_held.send_replace(true);
    }

    /// Let held and future confirmations resolve.
    pub fn release_confirmations(&self) {
        self.confirmations_held.send_replace(false);
    }

    /// Set the allowance this account has granted `spender` on `token`.
    pub fn set_allowance(&self, token: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, spender), amount);
    }

    pub fn allowance_of(&self, token: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Make allowance reads fail with `error` until cleared.
    pub fn fail_reads(&self, error: BridgeError) {
        self.state.lock().unwrap().read_failure = Some(error);
    }

    pub fn clear_read_failure(&self) {
        self.state.lock().unwrap().read_failure = None;
    }

    /// The next `send_transaction` fails with `TransactionRejected`.
    pub fn reject_next_transaction(&self) {
        self.state.lock().unwrap().reject_next_send = true;
    }

    /// The next sent transaction reverts when confirmed.
    pub fn revert_next_transaction(&self) {
        self.state.lock().unwrap().revert_next = true;
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn confirmed_transactions(&self) -> Vec<TxHash> {
        self.state.lock().unwrap().confirmed.clone()
    }

    pub fn allowance_read_count(&self) -> usize {
        self.state.lock().unwrap().allowance_reads
    }

    /// Every `approve` call sent, as `(token, spender, amount)`.
    pub fn approvals(&self) -> Vec<(Address, Address, U256)> {
        self.sent_transactions()
            .iter()
            .filter_map(|tx| {
                let call = Erc20::approveCall::abi_decode(tx.input.input()?).ok()?;
                Some((tx.to?.to().copied()?, call.spender, call.amount))
            })
            .collect()
    }

    /// Every `depositV3` call sent.
    pub fn deposits(&self) -> Vec<RecordedDeposit> {
        self.sent_transactions()
            .iter()
            .filter_map(|tx| {
                let call = SpokePool::depositV3Call::abi_decode(tx.input.input()?).ok()?;
                Some(RecordedDeposit {
                    spoke_pool: tx.to?.to().copied()?,
                    depositor: call.depositor,
                    recipient: call.recipient,
                    input_token: call.inputToken,
                    output_token: call.outputToken,
                    input_amount: call.inputAmount,
                    output_amount: call.outputAmount,
                    destination_chain_id: call.destinationChainId,
                    exclusive_relayer: call.exclusiveRelayer,
                    quote_timestamp: call.quoteTimestamp,
                    fill_deadline: call.fillDeadline,
                    exclusivity_deadline: call.exclusivityDeadline,
                    message_len: call.message.len(),
                    gas_limit: tx.gas,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ChainSigner for FakeSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let mut state = self.state.lock().unwrap();
        state.allowance_reads += 1;
        if let Some(error) = &state.read_failure {
            return Err(error.clone());
        }
        if owner != self.address {
            return Ok(U256::ZERO);
        }
        Ok(state
            .allowances
            .get(&(token, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.reject_next_send) {
            return Err(BridgeError::TransactionRejected {
                reason: "user denied transaction signature".to_string(),
            });
        }

        state.nonce += 1;
        let tx_hash = TxHash::from(U256::from(state.nonce).to_be_bytes::<32>());
        if std::mem::take(&mut state.revert_next) {
            state.reverting.insert(tx_hash);
        }
        state.sent.push(tx.clone());
        state.pending.insert(tx_hash, tx);
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash> {
        let mut held = self.confirmations_held.subscribe();
        if held.wait_for(|held| !*held).await.is_err() {
            return Err(BridgeError::ChainRead("confirmation gate closed".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        let tx = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| BridgeError::ChainRead(format!("unknown transaction {tx_hash}")))?;

        if state.reverting.remove(&tx_hash) {
            return Err(BridgeError::TransactionReverted {
                tx_hash,
                reason: "execution reverted".to_string(),
            });
        }

        let approval = tx
            .input
            .input()
            .and_then(|input| Erc20::approveCall::abi_decode(input).ok());
        if let (Some(call), Some(token)) = (approval, tx.to.and_then(|to| to.to().copied())) {
            state.allowances.insert((token, call.spender), call.amount);
        }

        state.confirmed.push(tx_hash);
        Ok(tx_hash)
    }
}

// ============================================================================
// Fake Quote Provider
// ============================================================================

/// A fake quote provider that replays a scripted sequence of results.
///
/// Once the sequence is exhausted the last entry repeats.
#[derive(Clone, Debug, Default)]
pub struct FakeQuoteProvider {
    responses: Arc<Mutex<Vec<Result<Quote>>>>,
    calls: Arc<Mutex<Vec<QuoteRequest>>>,
}

impl FakeQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that always quotes `fee` with no exclusive relayer.
    pub fn with_fee(fee: U256) -> Self {
        let provider = Self::new();
        provider.add_response_sequence(vec![Ok(Quote {
            total_relay_fee: fee,
            exclusive_relayer: Address::ZERO,
            timestamp: 1_700_000_000,
            exclusivity_deadline: 0,
        })]);
        provider
    }

    /// Configure the sequence of results returned by successive calls.
    pub fn add_response_sequence(&self, responses: Vec<Result<Quote>>) {
        *self.responses.lock().unwrap() = responses;
        self.calls.lock().unwrap().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<QuoteRequest> {
        self.calls.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuoteProvider {
    async fn suggested_fees(&self, request: &QuoteRequest) -> Result<Quote> {
        let responses = self.responses.lock().unwrap();
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(*request);

        match responses.get(index).or_else(|| responses.last()) {
            Some(response) => response.clone(),
            None => Err(BridgeError::QuoteService {
                status: None,
                reason: "no quote configured".to_string(),
            }),
        }
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that records sleeps instead of waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    unix_timestamp: Arc<Mutex<u64>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            unix_timestamp: Arc::new(Mutex::new(1_700_000_000)),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unix_timestamp(&self, timestamp: u64) {
        *self.unix_timestamp.lock().unwrap() = timestamp;
    }

    /// Get every duration passed to `sleep`, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleep_log.lock().unwrap().clone()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        *self.unix_timestamp.lock().unwrap() += duration.as_secs();
    }

    fn unix_timestamp(&self) -> u64 {
        *self.unix_timestamp.lock().unwrap()
    }
}
