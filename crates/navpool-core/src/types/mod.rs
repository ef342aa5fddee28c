mod plan;
mod pool;
mod range;

pub use plan::{InitialPrice, InitializationPlan, PlanStep, PlannedCall};
pub use pool::{to_int24, PoolKey, MAX_LP_FEE, MAX_TICK_SPACING, MIN_TICK_SPACING};
pub use range::LiquidityRange;
