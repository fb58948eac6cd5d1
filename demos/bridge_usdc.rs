// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Bridge USDC from Ethereum to Optimism
//!
//! This example drives the full workflow against a live node: connect,
//! check allowance, approve if needed, quote and deposit.
//!
//! Required environment variables (can be set in .env file):
//! - ETH_RPC_URL: Ethereum mainnet RPC endpoint, or a wallet RPC that signs
//!   (e.g. Frame at http://127.0.0.1:1248)
//! - BRIDGE_AMOUNT: Amount of USDC to bridge, as a decimal string (e.g. "100")
//!
//! Optional:
//! - PRIVATE_KEY: Sign locally with this key instead of asking the wallet
//! - ACROSS_API_URL: Override the suggested-fees endpoint
//!
//! Run with: `cargo run --example bridge_usdc`

use across_bridge::providers::{AcrossQuoteProvider, AlloyWallet, TokioClock};
use across_bridge::{
    format_token_amount, AcrossBridge, SubmitOutcome, WorkflowController, WorkflowState,
    ACROSS_SUGGESTED_FEES_URL, QUOTE_REQUEST_TIMEOUT, USDC,
};
use alloy_network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🌉 Across USDC Bridge: Ethereum → Optimism");
    println!("==========================================\n");

    let rpc_url = std::env::var("ETH_RPC_URL")?;
    let amount = std::env::var("BRIDGE_AMOUNT")?;
    let api_url =
        std::env::var("ACROSS_API_URL").unwrap_or_else(|_| ACROSS_SUGGESTED_FEES_URL.to_string());

    // With a local key the provider signs; without one the RPC endpoint is the wallet
    let wallet = match std::env::var("PRIVATE_KEY") {
        Ok(key) => {
            let signer: PrivateKeySigner = key.parse()?;
            let account = signer.address();
            println!("🔑 Signing locally as {account}");
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(rpc_url.parse()?)
                .erased();
            AlloyWallet::new(provider).with_account(account)
        }
        Err(_) => {
            println!("👛 Requesting account from {rpc_url}");
            AlloyWallet::new(ProviderBuilder::new().connect_http(rpc_url.parse()?).erased())
        }
    };

    let bridge = AcrossBridge::builder()
        .quote_provider(AcrossQuoteProvider::new(&api_url, QUOTE_REQUEST_TIMEOUT)?)
        .clock(TokioClock::new())
        .build();
    let mut controller = WorkflowController::new(wallet, bridge);

    // Step 1: connect
    controller.connect().await?;
    println!("1️⃣ Connected: {}", controller.account_label());

    // Step 2: amount and token
    controller.select_token(USDC.symbol).await?;
    controller.set_amount(&amount).await?;
    let base_units = controller.amount().unwrap_or_default();
    println!(
        "2️⃣ Bridging {} {} ({base_units} base units)",
        format_token_amount(base_units, USDC.decimals),
        USDC.symbol
    );

    // Step 3: approve and deposit
    while controller.can_submit() {
        println!("   ▶ {}", controller.submit_label());
        match controller.submit().await? {
            SubmitOutcome::Approved { tx_hash } => println!("   ✅ Approval mined: {tx_hash}"),
            SubmitOutcome::Deposited { tx_hash } => println!("   ✅ Deposit mined: {tx_hash}"),
            SubmitOutcome::AllowanceChanged => println!("   ⚠️ Allowance changed, approving again"),
        }
    }

    if let WorkflowState::Complete { .. } = controller.state() {
        if let Some(message) = controller.status_message() {
            println!("\n🎉 {message}");
        }
    }

    Ok(())
}
