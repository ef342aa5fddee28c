use alloy_primitives::{Address, Bytes, U160, U256};
use std::fmt;

use super::pool::PoolKey;
use super::range::LiquidityRange;

/// One step of the setup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanStep {
    ApproveDeposit,
    Deposit,
    InitializePool,
    ApproveLiquidity,
    AddLiquidity,
}

impl PlanStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApproveDeposit => "approve_deposit",
            Self::Deposit => "deposit",
            Self::InitializePool => "initialize_pool",
            Self::ApproveLiquidity => "approve_liquidity",
            Self::AddLiquidity => "add_liquidity",
        }
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prepared contract call, ready to sign and broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCall {
    pub step: PlanStep,
    pub target: Address,
    pub calldata: Bytes,
    pub description: String,
}

/// Initial pool price in `currency1 / currency0` orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialPrice {
    pub sqrt_price_x96: U160,
    pub tick: i32,
}

/// Ordered calls for depositing, initializing the pool and seeding liquidity.
///
/// Building a plan has no side effects; the chain client executes it.
#[derive(Debug, Clone)]
pub struct InitializationPlan {
    pub pool_key: PoolKey,
    pub price: InitialPrice,
    pub range: LiquidityRange,
    pub deposit_amount: U256,
    pub liquidity: u128,
    /// Upper bound of currency0 pulled by the liquidity add
    pub amount0_max: U256,
    /// Upper bound of currency1 pulled by the liquidity add
    pub amount1_max: U256,
    pub calls: Vec<PlannedCall>,
}

impl InitializationPlan {
    /// First call for the given step
    pub fn call(&self, step: PlanStep) -> Option<&PlannedCall> {
        self.calls.iter().find(|call| call.step == step)
    }

    pub fn steps(&self) -> Vec<PlanStep> {
        self.calls.iter().map(|call| call.step).collect()
    }
}
