use alloy_primitives::{Address, Bytes, B256, I256, U160, U256};
use alloy_sol_types::SolCall;
use navpool_core::contracts::{ILiquidityRouter, IPoolManager, IVault, ModifyLiquidityParams, IERC20};
use navpool_core::types::{
    to_int24, InitialPrice, InitializationPlan, PlanStep, PlannedCall, PoolKey,
};
use navpool_core::{Result, SetupError};
use tracing::debug;

use crate::full_math::{mul_div, Q96};
use crate::liquidity::{amounts_for_liquidity, liquidity_for_amounts};
use crate::range::compute_liquidity_range;
use crate::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, max_usable_tick, min_usable_tick};

pub const MAX_BPS: u32 = 10_000;

/// Contracts the plan interacts with
#[derive(Debug, Clone, Copy)]
pub struct PlanAccounts {
    pub vault: Address,
    pub share_token: Address,
    pub quote_token: Address,
    pub pool_manager: Address,
    pub liquidity_router: Address,
}

/// Inputs to [`build_initialization_plan`]
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Canonically ordered key of the share/quote pool
    pub pool_key: PoolKey,
    /// Initial sqrt price as `currency1 / currency0`
    pub sqrt_price_x96: U160,
    /// Quote currency deposited into the vault, in raw units
    pub deposit_amount: U256,
    /// Share of the deposit value seeded as liquidity
    pub allocation_bps: u32,
    pub spread_ticks: u32,
    pub accounts: PlanAccounts,
}

/// Compose the ordered setup calls: approve and deposit into the vault, initialize the
/// pool, approve both currencies to the router, and add liquidity.
///
/// The liquidity budget is `deposit_amount * allocation_bps / 10000` quote units,
/// split evenly in value between the quote currency and shares at the initial price.
pub fn build_initialization_plan(request: &PlanRequest) -> Result<InitializationPlan> {
    if request.allocation_bps > MAX_BPS {
        return Err(SetupError::InvalidAllocation(request.allocation_bps));
    }

    let key = request.pool_key;
    let accounts = request.accounts;
    let sqrt_price = U256::from(request.sqrt_price_x96);

    let tick = get_tick_at_sqrt_ratio(request.sqrt_price_x96)?;
    check_usable_price(sqrt_price, key.tick_spacing)?;
    let range = compute_liquidity_range(tick, key.tick_spacing, request.spread_ticks)?;

    let share_is_currency0 = key.is_currency0(accounts.share_token);
    let budget = mul_div(
        request.deposit_amount,
        U256::from(request.allocation_bps),
        U256::from(MAX_BPS),
    )
    .ok_or(SetupError::MathOverflow("liquidity budget"))?;
    let quote_amount = budget / U256::from(2u8);
    let share_amount = quote_to_shares(quote_amount, sqrt_price, share_is_currency0)?;

    let (budget0, budget1) = if share_is_currency0 {
        (share_amount, quote_amount)
    } else {
        (quote_amount, share_amount)
    };

    let sqrt_lower = U256::from(get_sqrt_ratio_at_tick(range.tick_lower)?);
    let sqrt_upper = U256::from(get_sqrt_ratio_at_tick(range.tick_upper)?);
    let liquidity = liquidity_for_amounts(sqrt_price, sqrt_lower, sqrt_upper, budget0, budget1)?;
    let (amount0_max, amount1_max) = if liquidity == 0 {
        (U256::ZERO, U256::ZERO)
    } else {
        amounts_for_liquidity(sqrt_price, sqrt_lower, sqrt_upper, liquidity)?
    };

    debug!(
        tick = tick,
        tick_lower = range.tick_lower,
        tick_upper = range.tick_upper,
        budget = %budget,
        liquidity = liquidity,
        amount0_max = %amount0_max,
        amount1_max = %amount1_max,
        "Liquidity position sized"
    );

    let abi_key = key.to_abi()?;
    let liquidity_delta = I256::try_from(liquidity).map_err(|_| SetupError::LiquidityOverflow)?;

    let calls = vec![
        PlannedCall {
            step: PlanStep::ApproveDeposit,
            target: accounts.quote_token,
            calldata: encode(IERC20::approveCall {
                spender: accounts.vault,
                amount: request.deposit_amount,
            }),
            description: format!("approve {} quote to vault {}", request.deposit_amount, accounts.vault),
        },
        PlannedCall {
            step: PlanStep::Deposit,
            target: accounts.vault,
            calldata: encode(IVault::depositCall {
                amount: request.deposit_amount,
                minShares: U256::ZERO,
            }),
            description: format!("deposit {} quote into vault", request.deposit_amount),
        },
        PlannedCall {
            step: PlanStep::InitializePool,
            target: accounts.pool_manager,
            calldata: encode(IPoolManager::initializeCall {
                key: abi_key.clone(),
                sqrtPriceX96: request.sqrt_price_x96,
            }),
            description: format!(
                "initialize pool at sqrtPriceX96={} (tick {})",
                request.sqrt_price_x96, tick
            ),
        },
        PlannedCall {
            step: PlanStep::ApproveLiquidity,
            target: key.currency0,
            calldata: encode(IERC20::approveCall {
                spender: accounts.liquidity_router,
                amount: amount0_max,
            }),
            description: format!("approve {} of {} to router", amount0_max, key.currency0),
        },
        PlannedCall {
            step: PlanStep::ApproveLiquidity,
            target: key.currency1,
            calldata: encode(IERC20::approveCall {
                spender: accounts.liquidity_router,
                amount: amount1_max,
            }),
            description: format!("approve {} of {} to router", amount1_max, key.currency1),
        },
        PlannedCall {
            step: PlanStep::AddLiquidity,
            target: accounts.liquidity_router,
            calldata: encode(ILiquidityRouter::modifyLiquidityCall {
                key: abi_key,
                params: ModifyLiquidityParams {
                    tickLower: to_int24(range.tick_lower)?,
                    tickUpper: to_int24(range.tick_upper)?,
                    liquidityDelta: liquidity_delta,
                    salt: B256::ZERO,
                },
                hookData: Bytes::new(),
            }),
            description: format!(
                "add {} liquidity in [{}, {}]",
                liquidity, range.tick_lower, range.tick_upper
            ),
        },
    ];

    Ok(InitializationPlan {
        pool_key: key,
        price: InitialPrice {
            sqrt_price_x96: request.sqrt_price_x96,
            tick,
        },
        range,
        deposit_amount: request.deposit_amount,
        liquidity,
        amount0_max,
        amount1_max,
        calls,
    })
}

/// The initial price must sit strictly inside the usable ticks for the spacing,
/// otherwise no range can be placed around it.
pub fn check_usable_price(sqrt_price: U256, tick_spacing: i32) -> Result<()> {
    let lower = U256::from(get_sqrt_ratio_at_tick(min_usable_tick(tick_spacing))?);
    let upper = U256::from(get_sqrt_ratio_at_tick(max_usable_tick(tick_spacing))?);
    if sqrt_price <= lower || sqrt_price >= upper {
        return Err(SetupError::PriceOutOfBounds(sqrt_price));
    }
    Ok(())
}

/// Convert quote units into shares of equal value at `sqrt_price` (`currency1 / currency0`)
fn quote_to_shares(quote_amount: U256, sqrt_price: U256, share_is_currency0: bool) -> Result<U256> {
    let overflow = || SetupError::MathOverflow("share amount");
    if share_is_currency0 {
        // price = quote per share: shares = quote / price
        let partial = mul_div(quote_amount, Q96, sqrt_price).ok_or_else(overflow)?;
        mul_div(partial, Q96, sqrt_price).ok_or_else(overflow)
    } else {
        // price = shares per quote: shares = quote * price
        let partial = mul_div(quote_amount, sqrt_price, Q96).ok_or_else(overflow)?;
        mul_div(partial, sqrt_price, Q96).ok_or_else(overflow)
    }
}

fn encode<C: SolCall>(call: C) -> Bytes {
    Bytes::from(call.abi_encode())
}
