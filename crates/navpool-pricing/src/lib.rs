pub mod full_math;
pub mod initializer;
pub mod liquidity;
pub mod plan;
pub mod range;
pub mod sqrt_price;
pub mod tick_math;

pub use initializer::PriceInitializer;
pub use liquidity::{amounts_for_liquidity, liquidity_for_amounts};
pub use plan::{build_initialization_plan, PlanAccounts, PlanRequest};
pub use range::{compute_liquidity_range, validate_tick_spacing, ALLOWED_TICK_SPACINGS};
pub use sqrt_price::{
    compute_initial_sqrt_price, compute_inverse_sqrt_price, nav_from_sqrt_price,
    sqrt_price_x96_from_ratio,
};
pub use tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, MAX_TICK, MIN_TICK};
