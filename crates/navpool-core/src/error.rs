use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

use crate::types::PlanStep;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },

    #[error("Deployment file not found: {0}")]
    DeploymentFileNotFound(String),

    #[error("Failed to parse deployment file: {0}")]
    DeploymentParseError(String),

    #[error("Invalid NAV: {0}")]
    InvalidNAV(String),

    #[error("Sqrt price {0} is outside the allowed bounds")]
    PriceOutOfBounds(U256),

    #[error("Tick {0} is outside the allowed bounds")]
    TickOutOfBounds(i32),

    #[error("Invalid tick spacing: {0}")]
    InvalidTickSpacing(i32),

    #[error("Invalid allocation: {0} bps (must be 0-10000)")]
    InvalidAllocation(u32),

    #[error("Invalid pool fee: {0} (must be <= 1000000)")]
    InvalidFee(u32),

    #[error("Pool currencies must differ, got {0} twice")]
    IdenticalCurrencies(Address),

    #[error("Unsupported token decimals: {0} (must be 0-18)")]
    UnsupportedDecimals(u8),

    #[error("Liquidity does not fit in uint128")]
    LiquidityOverflow,

    #[error("Arithmetic overflow in {0}")]
    MathOverflow(&'static str),

    #[error("Invalid deposit amount: {0}")]
    InvalidAmount(String),

    #[error("RPC reports chain id {actual}, expected {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("Insufficient balance of {token}: required {required}, available {available}")]
    InsufficientBalance {
        token: Address,
        required: U256,
        available: U256,
    },

    #[error("NAV oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// `tx_hash` is `None` when the revert surfaced during gas estimation, before broadcast
    #[error("Transaction reverted at step {step}: tx={tx_hash:?}")]
    TransactionReverted {
        step: PlanStep,
        tx_hash: Option<B256>,
    },

    #[error("Transaction timed out at step {step}")]
    TransactionTimeout { step: PlanStep },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("ABI decode error: {0}")]
    AbiDecode(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SetupError {
    /// True for errors raised before anything is submitted on-chain
    pub fn is_compute_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidNAV(_)
                | Self::PriceOutOfBounds(_)
                | Self::TickOutOfBounds(_)
                | Self::InvalidTickSpacing(_)
                | Self::InvalidAllocation(_)
                | Self::InvalidFee(_)
                | Self::IdenticalCurrencies(_)
                | Self::UnsupportedDecimals(_)
                | Self::LiquidityOverflow
                | Self::MathOverflow(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
