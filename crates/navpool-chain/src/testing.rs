//! In-memory chain client for executor and NAV tests

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use navpool_core::types::{PlanStep, PlannedCall};
use navpool_core::{Result, SetupError};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::{ChainClient, TransactionOutcome};

#[derive(Debug, Clone, Copy)]
pub enum FailureMode {
    Revert,
    Timeout,
}

#[derive(Default)]
pub struct MockChainClient {
    chain_id: u64,
    nav: Option<U256>,
    share_token: Option<Address>,
    decimals: HashMap<Address, u8>,
    balances: HashMap<Address, U256>,
    /// Index of the submission that fails
    fail_at: Option<(usize, FailureMode)>,
    pub submitted: Mutex<Vec<PlannedCall>>,
}

impl MockChainClient {
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_nav(mut self, nav: U256) -> Self {
        self.nav = Some(nav);
        self
    }

    pub fn with_share_token(mut self, token: Address) -> Self {
        self.share_token = Some(token);
        self
    }

    pub fn with_decimals(mut self, token: Address, decimals: u8) -> Self {
        self.decimals.insert(token, decimals);
        self
    }

    pub fn with_balance(mut self, token: Address, balance: U256) -> Self {
        self.balances.insert(token, balance);
        self
    }

    pub fn failing_at(mut self, index: usize, mode: FailureMode) -> Self {
        self.fail_at = Some((index, mode));
        self
    }

    pub fn submitted_steps(&self) -> Vec<PlanStep> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.step)
            .collect()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn sender(&self) -> Address {
        Address::with_last_byte(0xee)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn read_nav(&self, _nav_engine: Address, _vault: Address) -> Result<U256> {
        self.nav
            .ok_or_else(|| SetupError::OracleUnavailable("eth_call reverted".to_string()))
    }

    async fn read_token_decimals(&self, token: Address) -> Result<u8> {
        self.decimals
            .get(&token)
            .copied()
            .ok_or_else(|| SetupError::Rpc(format!("unknown token {}", token)))
    }

    async fn read_share_token(&self, _vault: Address) -> Result<Address> {
        self.share_token
            .ok_or_else(|| SetupError::Rpc("vault has no share token".to_string()))
    }

    async fn read_balance(&self, token: Address, _owner: Address) -> Result<U256> {
        Ok(self.balances.get(&token).copied().unwrap_or_default())
    }

    async fn submit_transaction(&self, call: &PlannedCall) -> Result<TransactionOutcome> {
        let mut submitted = self.submitted.lock().unwrap();
        let index = submitted.len();
        submitted.push(call.clone());

        let tx_hash = B256::with_last_byte(index as u8 + 1);
        match self.fail_at {
            Some((at, FailureMode::Revert)) if at == index => {
                Err(SetupError::TransactionReverted {
                    step: call.step,
                    tx_hash: Some(tx_hash),
                })
            }
            Some((at, FailureMode::Timeout)) if at == index => {
                Err(SetupError::TransactionTimeout { step: call.step })
            }
            _ => Ok(TransactionOutcome {
                tx_hash,
                block_number: Some(100 + index as u64),
                gas_used: 50_000,
            }),
        }
    }
}
