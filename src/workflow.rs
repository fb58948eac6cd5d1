//! The allowance-gated deposit workflow
//!
//! [`WorkflowController`] owns the whole session: the connected signer, the
//! amount and token the user entered, and the [`WorkflowState`]. UI events map
//! to methods:
//!
//! | event               | method                                     |
//! |---------------------|--------------------------------------------|
//! | connect wallet      | [`connect`](WorkflowController::connect)   |
//! | edit amount         | [`set_amount`](WorkflowController::set_amount) |
//! | pick token          | [`select_token`](WorkflowController::select_token) |
//! | press submit        | [`submit`](WorkflowController::submit)     |
//! | start a new transfer| [`reset`](WorkflowController::reset)       |
//!
//! The allowance verdict is re-derived on wallet connect, on every amount or
//! token change, and again inside the deposit path right before the deposit is
//! sent. A deposit is never sent on a stale verdict.
//!
//! Every method takes `&mut self`, so at most one submission can be in flight
//! per controller. While a submission is pending the state can be watched
//! through [`subscribe`](WorkflowController::subscribe).

use alloy_primitives::{Address, TxHash, U256};
use tokio::sync::watch;
use tracing::{info, warn, Instrument};

use crate::bridge::AcrossBridge;
use crate::chain::{Token, USDC};
use crate::error::{BridgeError, Result};
use crate::spans;
use crate::traits::{ChainSigner, Clock, QuoteProvider, WalletGateway};

/// Where the workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// No wallet connected; submission is disabled.
    Disconnected,
    /// Wallet connected. `has_allowance` is the verdict for the current amount.
    Connected { has_allowance: bool },
    /// Approval sent, waiting for it to be mined.
    Approving,
    /// Deposit being quoted, sent, or waiting to be mined.
    AwaitingDeposit,
    /// Deposit mined. Call [`WorkflowController::reset`] to start another transfer.
    Complete { tx_hash: TxHash },
    /// The last operation failed. Submitting again re-derives the allowance verdict.
    Failed { reason: BridgeError },
}

impl WorkflowState {
    /// True while an approval or deposit is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Approving | WorkflowState::AwaitingDeposit)
    }
}

/// Result of a successful [`WorkflowController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The approval was mined; submit again to deposit.
    Approved { tx_hash: TxHash },
    /// The deposit was mined.
    Deposited { tx_hash: TxHash },
    /// The allowance no longer covers the amount, so nothing was sent. The
    /// verdict is now false; submit again to approve.
    AllowanceChanged,
}

/// Current state plus the channel that publishes every change.
#[derive(Debug)]
struct StateCell {
    current: WorkflowState,
    updates: watch::Sender<WorkflowState>,
}

impl StateCell {
    fn new(initial: WorkflowState) -> Self {
        let (updates, _) = watch::channel(initial.clone());
        Self {
            current: initial,
            updates,
        }
    }

    fn set(&mut self, next: WorkflowState) {
        if self.current != next {
            info!(from = ?self.current, to = ?next, event = "workflow_state_changed");
        }
        self.updates.send_replace(next.clone());
        self.current = next;
    }
}

/// Holds the state for the duration of one submission.
///
/// Dropped while still busy means the submission future was cancelled, so the
/// state moves to `Failed { Interrupted }` and submit is enabled again.
struct InFlight<'a> {
    cell: &'a mut StateCell,
}

impl InFlight<'_> {
    fn set(&mut self, next: WorkflowState) {
        self.cell.set(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let stage = match self.cell.current {
            WorkflowState::Approving => "approving",
            WorkflowState::AwaitingDeposit => "depositing",
            _ => return,
        };
        warn!(stage = stage, event = "submission_interrupted");
        self.cell.set(WorkflowState::Failed {
            reason: BridgeError::Interrupted {
                stage: stage.to_string(),
            },
        });
    }
}

/// Drives one user session through connect → approve → deposit.
pub struct WorkflowController<W, Q, C>
where
    W: WalletGateway,
    Q: QuoteProvider,
    C: Clock,
{
    wallet: W,
    bridge: AcrossBridge<Q, C>,
    signer: Option<W::Signer>,
    amount_input: String,
    amount: Option<U256>,
    token: Option<Token>,
    state: StateCell,
}

impl<W, Q, C> WorkflowController<W, Q, C>
where
    W: WalletGateway,
    Q: QuoteProvider,
    C: Clock,
{
    pub fn new(wallet: W, bridge: AcrossBridge<Q, C>) -> Self {
        Self {
            wallet,
            bridge,
            signer: None,
            amount_input: String::new(),
            amount: None,
            token: None,
            state: StateCell::new(WorkflowState::Disconnected),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state.current
    }

    /// Receives every state change, including `Approving` and
    /// `AwaitingDeposit` while [`submit`](Self::submit) is still pending.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.updates.subscribe()
    }

    pub fn bridge(&self) -> &AcrossBridge<Q, C> {
        &self.bridge
    }

    /// The connected account, if any.
    pub fn account(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }

    /// The parsed amount in base units, if a valid one was entered.
    pub fn amount(&self) -> Option<U256> {
        self.amount
    }

    /// The amount exactly as the user typed it.
    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn token(&self) -> Option<Token> {
        self.token
    }

    /// Why submission is currently disabled, or `None` if it is allowed.
    pub fn submit_disabled_reason(&self) -> Option<&'static str> {
        if self.signer.is_none() {
            return Some("wallet not connected");
        }
        match self.state.current {
            WorkflowState::Approving | WorkflowState::AwaitingDeposit => {
                return Some("a transaction is already in flight")
            }
            WorkflowState::Complete { .. } => return Some("transfer complete"),
            _ => {}
        }
        if self.token.is_none() {
            return Some("no token selected");
        }
        match self.amount {
            None => Some("no amount entered"),
            Some(amount) if amount.is_zero() => Some("amount must be greater than zero"),
            Some(_) => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.submit_disabled_reason().is_none()
    }

    /// Text for the submit button.
    pub fn submit_label(&self) -> &'static str {
        submit_label(&self.state.current)
    }

    /// Text for the wallet button: the shortened account, or a connect prompt.
    pub fn account_label(&self) -> String {
        match self.account() {
            Some(address) => {
                let full = address.to_string();
                format!("{}...{}", &full[..6], &full[full.len() - 4..])
            }
            None => "Connect Wallet".to_string(),
        }
    }

    /// Message to show under the form, if any.
    pub fn status_message(&self) -> Option<String> {
        match &self.state.current {
            WorkflowState::Complete { .. } => {
                Some("Bridge complete! Tokens transferred to Optimism.".to_string())
            }
            WorkflowState::Failed { reason } => Some(reason.to_string()),
            _ => None,
        }
    }

    /// Connects the wallet and derives the allowance verdict for the current
    /// amount (zero if none was entered).
    ///
    /// On failure the controller stays `Disconnected` and the error is returned.
    /// A failed allowance read after a successful connection leaves the
    /// controller `Failed` but connected.
    pub async fn connect(&mut self) -> Result<Address> {
        if let Some(address) = self.account() {
            return Ok(address);
        }

        let signer = match self.wallet.connect().await {
            Ok(signer) => signer,
            Err(e) => {
                warn!(error = %e, event = "wallet_connect_failed");
                return Err(e);
            }
        };
        let address = signer.address();
        self.signer = Some(signer);
        self.state.set(WorkflowState::Connected {
            has_allowance: false,
        });

        if let Err(e) = self.refresh_allowance().await {
            warn!(error = %e, account = %address, event = "allowance_refresh_failed");
        }
        Ok(address)
    }

    /// Records a new amount and re-derives the allowance verdict for it.
    ///
    /// An empty input clears the amount. An unparseable input clears it too,
    /// drops the verdict to false and returns [`BridgeError::InvalidAmount`].
    pub async fn set_amount(&mut self, input: &str) -> Result<()> {
        if self.state.current.is_busy() {
            return Err(BridgeError::SubmissionDisabled {
                reason: "a transaction is already in flight".to_string(),
            });
        }

        self.amount_input = input.to_string();
        let decimals = self.token.unwrap_or(USDC).decimals;
        let parsed = if input.trim().is_empty() {
            Ok(None)
        } else {
            crate::amount::parse_token_amount(input, decimals).map(Some)
        };

        match parsed {
            Ok(amount) => {
                self.amount = amount;
                self.refresh_allowance().await
            }
            Err(e) => {
                self.amount = None;
                if matches!(self.state.current, WorkflowState::Connected { .. }) {
                    self.state.set(WorkflowState::Connected {
                        has_allowance: false,
                    });
                }
                Err(e)
            }
        }
    }

    /// Selects the token to bridge by symbol and re-derives the verdict.
    pub async fn select_token(&mut self, symbol: &str) -> Result<()> {
        if self.state.current.is_busy() {
            return Err(BridgeError::SubmissionDisabled {
                reason: "a transaction is already in flight".to_string(),
            });
        }

        let token = Token::by_symbol(symbol)?;
        self.token = Some(token);
        info!(token = token.symbol, event = "token_selected");
        self.refresh_allowance().await
    }

    /// Re-derives the allowance verdict for the current amount.
    ///
    /// Does nothing while disconnected, busy or complete.
    async fn refresh_allowance(&mut self) -> Result<()> {
        let Some(signer) = self.signer.as_ref() else {
            return Ok(());
        };
        if matches!(
            self.state.current,
            WorkflowState::Disconnected
                | WorkflowState::Approving
                | WorkflowState::AwaitingDeposit
                | WorkflowState::Complete { .. }
        ) {
            return Ok(());
        }

        let token = self.token.unwrap_or(USDC);
        let amount = self.amount.unwrap_or_default();
        match self
            .bridge
            .check_allowance(signer, token.address, amount)
            .await
        {
            Ok(has_allowance) => {
                self.state.set(WorkflowState::Connected { has_allowance });
                Ok(())
            }
            Err(e) => {
                self.state.set(WorkflowState::Failed { reason: e.clone() });
                Err(e)
            }
        }
    }

    /// Approves or deposits, depending on the allowance verdict.
    ///
    /// - verdict false: sends an approval for exactly the entered amount and,
    ///   once mined, moves to `Connected { has_allowance: true }`
    /// - verdict true: reads the allowance again for the exact amount, then
    ///   quotes and sends the deposit, moving to `Complete`
    /// - from `Failed`: re-derives the verdict first
    ///
    /// Executor failures move the controller to `Failed` and are returned. If
    /// the returned future is dropped before it resolves, the controller moves
    /// to `Failed` with [`BridgeError::Interrupted`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SubmissionDisabled`] without touching state when
    /// [`can_submit`](Self::can_submit) is false.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if let Some(reason) = self.submit_disabled_reason() {
            return Err(BridgeError::SubmissionDisabled {
                reason: reason.to_string(),
            });
        }
        let (Some(signer), Some(amount), Some(token)) =
            (self.signer.as_ref(), self.amount, self.token)
        else {
            return Err(BridgeError::SubmissionDisabled {
                reason: "workflow not ready".to_string(),
            });
        };

        let (has_allowance, verdict_is_fresh) = match self.state.current {
            WorkflowState::Connected { has_allowance } => (has_allowance, false),
            _ => match self
                .bridge
                .check_allowance(signer, token.address, amount)
                .await
            {
                Ok(has_allowance) => {
                    self.state.set(WorkflowState::Connected { has_allowance });
                    (has_allowance, true)
                }
                Err(e) => {
                    self.state.set(WorkflowState::Failed { reason: e.clone() });
                    return Err(e);
                }
            },
        };

        let span = spans::submit(&signer.address(), &amount, has_allowance);
        let mut state = InFlight {
            cell: &mut self.state,
        };
        let bridge = &self.bridge;

        let result = async move {
            if !has_allowance {
                state.set(WorkflowState::Approving);
                return match bridge.approve_token(signer, token.address, amount).await {
                    Ok(tx_hash) => {
                        state.set(WorkflowState::Connected {
                            has_allowance: true,
                        });
                        Ok(SubmitOutcome::Approved { tx_hash })
                    }
                    Err(e) => {
                        state.set(WorkflowState::Failed { reason: e.clone() });
                        Err(e)
                    }
                };
            }

            if !verdict_is_fresh {
                match bridge.check_allowance(signer, token.address, amount).await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(amount = %amount, event = "allowance_changed_before_deposit");
                        state.set(WorkflowState::Connected {
                            has_allowance: false,
                        });
                        return Ok(SubmitOutcome::AllowanceChanged);
                    }
                    Err(e) => {
                        state.set(WorkflowState::Failed { reason: e.clone() });
                        return Err(e);
                    }
                }
            }

            state.set(WorkflowState::AwaitingDeposit);
            match bridge.initiate_deposit(signer, token.address, amount).await {
                Ok(tx_hash) => {
                    state.set(WorkflowState::Complete { tx_hash });
                    Ok(SubmitOutcome::Deposited { tx_hash })
                }
                Err(e) => {
                    state.set(WorkflowState::Failed { reason: e.clone() });
                    Err(e)
                }
            }
        }
        .instrument(span.clone())
        .await;

        if let Err(e) = &result {
            spans::record_error(&span, e);
        }
        result
    }

    /// Returns a finished or failed session to `Connected` for a new transfer.
    ///
    /// Clears the amount and re-derives the verdict for zero. Does nothing in
    /// any other state.
    pub async fn reset(&mut self) -> Result<()> {
        if !matches!(
            self.state.current,
            WorkflowState::Complete { .. } | WorkflowState::Failed { .. }
        ) {
            return Ok(());
        }

        self.amount_input.clear();
        self.amount = None;
        self.state.set(WorkflowState::Connected {
            has_allowance: false,
        });
        self.refresh_allowance().await
    }
}

/// Text for the submit button in `state`.
pub fn submit_label(state: &WorkflowState) -> &'static str {
    match state {
        WorkflowState::Approving => "Approving...",
        WorkflowState::AwaitingDeposit => "Bridging...",
        WorkflowState::Connected {
            has_allowance: true,
        }
        | WorkflowState::Complete { .. } => "Bridge to Optimism",
        _ => "Approve",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::ETHEREUM_SPOKE_POOL_ADDRESS;
    use crate::testing::{FakeClock, FakeQuoteProvider, FakeSigner, FakeWallet};
    use rstest::rstest;
    use std::time::Duration;

    type Controller = WorkflowController<FakeWallet, FakeQuoteProvider, FakeClock>;

    fn controller(signer: &FakeSigner) -> Controller {
        let bridge = AcrossBridge::builder()
            .quote_provider(FakeQuoteProvider::with_fee(U256::from(5_000_000u64)))
            .clock(FakeClock::new())
            .build();
        WorkflowController::new(FakeWallet::new(signer.clone()), bridge)
    }

    #[tokio::test]
    async fn test_starts_disconnected() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let controller = controller(&signer);

        assert_eq!(controller.state(), &WorkflowState::Disconnected);
        assert!(!controller.can_submit());
        assert_eq!(controller.account_label(), "Connect Wallet");
        assert_eq!(
            controller.submit_disabled_reason(),
            Some("wallet not connected")
        );
    }

    #[tokio::test]
    async fn test_connect_derives_verdict_for_zero() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);

        controller.connect().await.unwrap();

        // Any allowance covers zero
        assert_eq!(
            controller.state(),
            &WorkflowState::Connected {
                has_allowance: true
            }
        );
        assert_eq!(signer.allowance_read_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_twice_does_not_prompt_again() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let wallet = FakeWallet::new(signer.clone());
        let bridge = AcrossBridge::builder()
            .quote_provider(FakeQuoteProvider::new())
            .clock(FakeClock::new())
            .build();
        let mut controller = WorkflowController::new(wallet.clone(), bridge);

        controller.connect().await.unwrap();
        controller.connect().await.unwrap();

        assert_eq!(wallet.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_account_label_is_shortened() {
        let signer = FakeSigner::new(Address::repeat_byte(0x12));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();

        assert_eq!(controller.account_label(), "0x1212...1212");
    }

    #[tokio::test]
    async fn test_invalid_amount_clears_amount_and_verdict() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.select_token("USDC").await.unwrap();

        let err = controller.set_amount("12abc").await.unwrap_err();

        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
        assert_eq!(controller.amount(), None);
        assert_eq!(controller.amount_input(), "12abc");
        assert_eq!(
            controller.state(),
            &WorkflowState::Connected {
                has_allowance: false
            }
        );
        assert!(!controller.can_submit());
    }

    #[rstest]
    #[case("", Some("no amount entered"))]
    #[case("0", Some("amount must be greater than zero"))]
    #[case("1", None)]
    #[tokio::test]
    async fn test_submit_gating_on_amount(#[case] input: &str, #[case] reason: Option<&str>) {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.select_token("USDC").await.unwrap();
        controller.set_amount(input).await.unwrap();

        assert_eq!(controller.submit_disabled_reason(), reason);
    }

    #[tokio::test]
    async fn test_submit_requires_token() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.set_amount("100").await.unwrap();

        let err = controller.submit().await.unwrap_err();
        assert_eq!(
            err,
            BridgeError::SubmissionDisabled {
                reason: "no token selected".to_string()
            }
        );
        assert!(signer.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);

        let err = controller.select_token("WETH").await.unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedToken { .. }));
        assert_eq!(controller.token(), None);
    }

    #[tokio::test]
    async fn test_labels_follow_state() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.select_token("USDC").await.unwrap();
        controller.set_amount("100").await.unwrap();
        assert_eq!(controller.submit_label(), "Approve");

        controller.submit().await.unwrap();
        assert_eq!(controller.submit_label(), "Bridge to Optimism");

        controller.submit().await.unwrap();
        assert_eq!(
            controller.status_message().as_deref(),
            Some("Bridge complete! Tokens transferred to Optimism.")
        );
    }

    #[tokio::test]
    async fn test_allowance_read_failure_surfaces_as_failed() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.select_token("USDC").await.unwrap();

        signer.fail_reads(BridgeError::ChainRead("rpc down".to_string()));
        let err = controller.set_amount("100").await.unwrap_err();

        assert_eq!(err, BridgeError::ChainRead("rpc down".to_string()));
        assert_eq!(
            controller.state(),
            &WorkflowState::Failed {
                reason: BridgeError::ChainRead("rpc down".to_string())
            }
        );
        assert_eq!(controller.status_message().as_deref(), Some("Chain read failed: rpc down"));

        // Editing the amount again re-derives the verdict and clears the failure
        signer.clear_read_failure();
        controller.set_amount("100").await.unwrap();
        assert_eq!(
            controller.state(),
            &WorkflowState::Connected {
                has_allowance: false
            }
        );
    }

    #[tokio::test]
    async fn test_reset_is_noop_while_connected() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = controller(&signer);
        controller.connect().await.unwrap();
        controller.set_amount("5").await.unwrap();

        controller.reset().await.unwrap();

        assert_eq!(controller.amount(), Some(U256::from(5_000_000u64)));
    }

    async fn ready(signer: &FakeSigner, amount: &str) -> Controller {
        let mut controller = controller(signer);
        controller.connect().await.unwrap();
        controller.select_token("USDC").await.unwrap();
        controller.set_amount(amount).await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_connect_with_failing_allowance_read() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        signer.fail_reads(BridgeError::ChainRead("rpc down".to_string()));
        let mut controller = controller(&signer);

        let address = controller.connect().await.unwrap();

        assert_eq!(address, Address::repeat_byte(0x11));
        assert_eq!(controller.account(), Some(address));
        assert_eq!(
            controller.state(),
            &WorkflowState::Failed {
                reason: BridgeError::ChainRead("rpc down".to_string())
            }
        );

        // Once reads work again a submit re-derives the verdict
        signer.clear_read_failure();
        controller.select_token("USDC").await.unwrap();
        controller.set_amount("1").await.unwrap();
        assert!(matches!(
            controller.submit().await.unwrap(),
            SubmitOutcome::Approved { .. }
        ));
    }

    #[tokio::test]
    async fn test_in_flight_states_are_published() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = ready(&signer, "100").await;
        let mut updates = controller.subscribe();

        signer.hold_confirmations();
        let observe_approval = async {
            updates
                .wait_for(|state| *state == WorkflowState::Approving)
                .await
                .unwrap();
            assert_eq!(submit_label(&updates.borrow()), "Approving...");
            assert!(signer.confirmed_transactions().is_empty());
            signer.release_confirmations();
        };
        let (outcome, ()) = tokio::join!(controller.submit(), observe_approval);
        assert!(matches!(outcome.unwrap(), SubmitOutcome::Approved { .. }));

        signer.hold_confirmations();
        let observe_deposit = async {
            updates
                .wait_for(|state| *state == WorkflowState::AwaitingDeposit)
                .await
                .unwrap();
            assert_eq!(submit_label(&updates.borrow()), "Bridging...");
            assert_eq!(signer.deposits().len(), 1);
            signer.release_confirmations();
        };
        let (outcome, ()) = tokio::join!(controller.submit(), observe_deposit);
        let SubmitOutcome::Deposited { tx_hash } = outcome.unwrap() else {
            panic!("expected a deposit");
        };
        assert_eq!(
            *updates.borrow(),
            WorkflowState::Complete { tx_hash }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_approval_reenables_submit() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = ready(&signer, "100").await;
        signer.hold_confirmations();

        let cancelled = tokio::time::timeout(Duration::from_secs(30), controller.submit()).await;

        assert!(cancelled.is_err());
        assert_eq!(
            controller.state(),
            &WorkflowState::Failed {
                reason: BridgeError::Interrupted {
                    stage: "approving".to_string()
                }
            }
        );
        assert!(controller.can_submit());
        assert_eq!(controller.submit_label(), "Approve");

        // The approval never got mined, so the re-derived verdict asks for another
        signer.release_confirmations();
        let outcome = controller.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Approved { .. }));
        assert_eq!(signer.sent_transactions().len(), 2);
        assert_eq!(
            controller.state(),
            &WorkflowState::Connected {
                has_allowance: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_deposit_can_be_reset() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        signer.set_allowance(
            USDC.address,
            ETHEREUM_SPOKE_POOL_ADDRESS,
            U256::from(100_000_000u64),
        );
        let mut controller = ready(&signer, "100").await;
        signer.hold_confirmations();

        let cancelled = tokio::time::timeout(Duration::from_secs(30), controller.submit()).await;

        assert!(cancelled.is_err());
        assert_eq!(signer.deposits().len(), 1);
        assert_eq!(
            controller.status_message().as_deref(),
            Some("Submission interrupted while depositing; the transaction may still be pending")
        );

        controller.reset().await.unwrap();
        assert_eq!(controller.amount(), None);
        assert_eq!(
            controller.state(),
            &WorkflowState::Connected {
                has_allowance: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaked_submission_keeps_submit_locked() {
        let signer = FakeSigner::new(Address::repeat_byte(0x11));
        let mut controller = ready(&signer, "100").await;
        signer.hold_confirmations();

        let mut submission = Box::pin(controller.submit());
        let pending = tokio::time::timeout(Duration::from_secs(30), &mut submission).await;
        assert!(pending.is_err());
        std::mem::forget(submission);

        let in_flight = BridgeError::SubmissionDisabled {
            reason: "a transaction is already in flight".to_string(),
        };
        assert_eq!(controller.state(), &WorkflowState::Approving);
        assert_eq!(controller.submit_label(), "Approving...");
        assert!(!controller.can_submit());
        assert_eq!(controller.submit().await.unwrap_err(), in_flight);
        assert_eq!(controller.set_amount("5").await.unwrap_err(), in_flight);
        assert_eq!(controller.select_token("USDC").await.unwrap_err(), in_flight);

        controller.reset().await.unwrap();
        assert_eq!(controller.state(), &WorkflowState::Approving);
        assert_eq!(signer.sent_transactions().len(), 1);
    }
}
