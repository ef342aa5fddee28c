use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use navpool_core::contracts::{INavEngine, IVault, IERC20};
use navpool_core::types::{PlanStep, PlannedCall};
use navpool_core::{Result, SetupError};
use navpool_pricing::sqrt_price::MAX_DECIMALS;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::client::{ChainClient, TransactionOutcome};

/// Boxed provider trait for HTTP connections
pub type BoxedProvider = Arc<dyn Provider<Ethereum> + Send + Sync>;

/// HTTP chain client signing with a single local key
pub struct AlloyChainClient {
    provider: BoxedProvider,
    sender: Address,
    tx_timeout: Duration,
}

impl AlloyChainClient {
    pub fn new(rpc_url: &str, private_key: &str, tx_timeout: Duration) -> Result<Self> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| SetupError::Rpc(format!("Invalid RPC URL: {}", e)))?;

        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| SetupError::Signer(format!("Invalid private key: {}", e)))?;
        let sender = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        info!(sender = %sender, "Chain client ready");

        Ok(Self {
            provider: Arc::new(provider),
            sender,
            tx_timeout,
        })
    }

    /// Get HTTP provider reference
    pub fn provider(&self) -> &BoxedProvider {
        &self.provider
    }

    async fn view<C: SolCall + Send>(&self, to: Address, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(call.abi_encode());

        let output = self
            .provider
            .call(tx)
            .await
            .map_err(|e| SetupError::Rpc(format!("eth_call to {} failed: {}", to, e)))?;

        C::abi_decode_returns(&output).map_err(|e| SetupError::AbiDecode(e.to_string()))
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| SetupError::Rpc(e.to_string()))
    }

    async fn read_nav(&self, nav_engine: Address, vault: Address) -> Result<U256> {
        self.view(nav_engine, INavEngine::getCurrentNAVCall { vault })
            .await
            .map_err(|e| SetupError::OracleUnavailable(e.to_string()))
    }

    async fn read_token_decimals(&self, token: Address) -> Result<u8> {
        let decimals = self.view(token, IERC20::decimalsCall {}).await?;
        if decimals > MAX_DECIMALS {
            return Err(SetupError::UnsupportedDecimals(decimals));
        }
        Ok(decimals)
    }

    async fn read_share_token(&self, vault: Address) -> Result<Address> {
        self.view(vault, IVault::shareTokenCall {}).await
    }

    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256> {
        self.view(token, IERC20::balanceOfCall { account: owner }).await
    }

    async fn submit_transaction(&self, call: &PlannedCall) -> Result<TransactionOutcome> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(call.target)
            .with_input(call.calldata.clone());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| {
                let response = e.as_error_resp().map(|resp| (resp.code, resp.message.to_string()));
                send_error(call.step, response, &e.to_string())
            })?;
        let tx_hash = *pending.tx_hash();
        debug!(step = %call.step, tx_hash = %tx_hash, "Transaction broadcast");

        let receipt = match timeout(self.tx_timeout, pending.get_receipt()).await {
            Ok(receipt) => receipt.map_err(|e| SetupError::Rpc(e.to_string()))?,
            Err(_) => return Err(SetupError::TransactionTimeout { step: call.step }),
        };

        if !receipt.status() {
            return Err(SetupError::TransactionReverted {
                step: call.step,
                tx_hash: Some(tx_hash),
            });
        }

        Ok(TransactionOutcome {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

/// JSON-RPC error code nodes return for `execution reverted`
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Map a failed `eth_sendTransaction`. The default fillers estimate gas first, so a
/// call that would revert fails here with no transaction hash.
fn send_error(step: PlanStep, response: Option<(i64, String)>, display: &str) -> SetupError {
    let reverted = match &response {
        Some((code, message)) => {
            *code == EXECUTION_REVERTED_CODE || message.to_lowercase().contains("execution reverted")
        }
        None => display.to_lowercase().contains("execution reverted"),
    };

    if reverted {
        let error_text = display;
        warn!(step = %step, error = %error_text, "Transaction reverted in gas estimation");
        SetupError::TransactionReverted {
            step,
            tx_hash: None,
        }
    } else {
        SetupError::Rpc(format!("{} submission failed: {}", step, display))
    }
}
