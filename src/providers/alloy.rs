//! Alloy-based wallet and signer implementations.

use alloy_json_rpc::RpcError;
use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types::TransactionRequest;
use alloy_transport::TransportErrorKind;
use async_trait::async_trait;
use tracing::{debug, info, instrument, trace, warn};

use crate::contracts::erc20::Erc20Contract;
use crate::error::{BridgeError, Result};
use crate::traits::{ChainSigner, WalletGateway};

/// EIP-1193 error code for "User Rejected Request".
const USER_REJECTED_REQUEST: i64 = 4001;

fn rpc_error_code(error: &RpcError<TransportErrorKind>) -> Option<i64> {
    error.as_error_resp().map(|payload| payload.code)
}

/// Wallet gateway backed by an Alloy [`Provider`].
///
/// The provider plays the role of the injected wallet: accounts are requested
/// with `eth_requestAccounts` and transactions are sent with
/// `eth_sendTransaction`, so whatever sits behind the provider (a wallet RPC
/// endpoint, or a provider with a local signer filler) does the signing.
///
/// # Examples
///
/// ```rust,no_run
/// use across_bridge::providers::AlloyWallet;
/// use across_bridge::traits::{ChainSigner, WalletGateway};
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("http://localhost:1248").await?;
/// let wallet = AlloyWallet::new(provider);
/// let signer = wallet.connect().await?;
/// println!("connected {}", signer.address());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlloyWallet<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: Option<P>,
    account: Option<Address>,
}

impl<P> AlloyWallet<P>
where
    P: Provider<Ethereum> + Clone,
{
    /// Creates a wallet gateway that requests accounts from `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
            account: None,
        }
    }

    /// A gateway with no wallet behind it; `connect` fails with
    /// [`BridgeError::NoProvider`].
    pub fn unavailable() -> Self {
        Self {
            provider: None,
            account: None,
        }
    }

    /// Uses a fixed account instead of prompting with `eth_requestAccounts`.
    ///
    /// Meant for providers built with a local signer, which can't answer the
    /// account request.
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    async fn request_account(provider: &P) -> Result<Address> {
        let accounts: Vec<Address> = provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(|e| match rpc_error_code(&e) {
                Some(USER_REJECTED_REQUEST) => BridgeError::UserRejected,
                _ => {
                    warn!(error = %e, event = "account_request_failed");
                    BridgeError::NoProvider
                }
            })?;

        accounts.into_iter().next().ok_or(BridgeError::NoProvider)
    }
}

#[async_trait]
impl<P> WalletGateway for AlloyWallet<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync + 'static,
{
    type Signer = AlloySigner<P>;

    #[instrument(skip(self))]
    async fn connect(&self) -> Result<AlloySigner<P>> {
        let provider = self.provider.as_ref().ok_or(BridgeError::NoProvider)?;

        let address = match self.account {
            Some(account) => account,
            None => Self::request_account(provider).await?,
        };

        info!(account = %address, event = "wallet_connected");
        Ok(AlloySigner::new(provider.clone(), address))
    }
}

/// Signer bound to one account of an Alloy [`Provider`].
#[derive(Debug, Clone)]
pub struct AlloySigner<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
    address: Address,
}

impl<P> AlloySigner<P>
where
    P: Provider<Ethereum> + Clone,
{
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> ChainSigner for AlloySigner<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync + 'static,
{
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip(self))]
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        trace!("Reading ERC20 allowance");
        Erc20Contract::new(token, self.provider.clone())
            .allowance(owner, spender)
            .await
            .map_err(|e| BridgeError::ChainRead(e.to_string()))
    }

    #[instrument(skip(self, tx), fields(from = %self.address))]
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| {
                let reason = match rpc_error_code(&e) {
                    Some(USER_REJECTED_REQUEST) => "user denied transaction signature".to_string(),
                    _ => e.to_string(),
                };
                BridgeError::TransactionRejected { reason }
            })?;

        let tx_hash = *pending.tx_hash();
        debug!(tx_hash = %tx_hash, "Transaction broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<TxHash> {
        trace!("Waiting for transaction receipt");
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| BridgeError::ChainRead(format!("failed to get receipt: {e}")))?;

        if !receipt.status() {
            return Err(BridgeError::TransactionReverted {
                tx_hash,
                reason: "receipt status is failure".to_string(),
            });
        }

        debug!(
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(receipt.transaction_hash)
    }
}
