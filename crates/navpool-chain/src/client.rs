use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use navpool_core::types::PlannedCall;
use navpool_core::Result;

/// Receipt summary of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Chain access needed by the setup flow
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account that signs submitted transactions
    fn sender(&self) -> Address;

    async fn chain_id(&self) -> Result<u64>;

    /// Current NAV of `vault` as reported by the NAV engine
    async fn read_nav(&self, nav_engine: Address, vault: Address) -> Result<U256>;

    async fn read_token_decimals(&self, token: Address) -> Result<u8>;

    async fn read_share_token(&self, vault: Address) -> Result<Address>;

    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256>;

    /// Sign, broadcast and wait for the receipt of `call`
    async fn submit_transaction(&self, call: &PlannedCall) -> Result<TransactionOutcome>;
}
