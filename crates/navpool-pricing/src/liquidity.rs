use alloy_primitives::U256;
use navpool_core::{Result, SetupError};

use crate::full_math::{div_rounding_up, mul_div, mul_div_rounding_up, Q96};

fn sorted(sqrt_a: U256, sqrt_b: U256) -> (U256, U256) {
    if sqrt_a > sqrt_b {
        (sqrt_b, sqrt_a)
    } else {
        (sqrt_a, sqrt_b)
    }
}

fn to_liquidity(value: U256) -> Result<u128> {
    u128::try_from(value).map_err(|_| SetupError::LiquidityOverflow)
}

fn overflow(context: &'static str) -> SetupError {
    SetupError::MathOverflow(context)
}

/// Liquidity supported by `amount0` of currency0 across `[sqrt_a, sqrt_b]`
pub fn liquidity_for_amount0(sqrt_a: U256, sqrt_b: U256, amount0: U256) -> Result<u128> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    let intermediate = mul_div(sqrt_a, sqrt_b, Q96).ok_or_else(|| overflow("liquidity0"))?;
    let liquidity =
        mul_div(amount0, intermediate, sqrt_b - sqrt_a).ok_or_else(|| overflow("liquidity0"))?;
    to_liquidity(liquidity)
}

/// Liquidity supported by `amount1` of currency1 across `[sqrt_a, sqrt_b]`
pub fn liquidity_for_amount1(sqrt_a: U256, sqrt_b: U256, amount1: U256) -> Result<u128> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    let liquidity = mul_div(amount1, Q96, sqrt_b - sqrt_a).ok_or_else(|| overflow("liquidity1"))?;
    to_liquidity(liquidity)
}

/// Maximum liquidity for the given budgets at the current price.
///
/// Below the range only currency0 counts, above it only currency1; inside it the
/// scarcer side bounds the result.
pub fn liquidity_for_amounts(
    sqrt_price: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);

    if sqrt_price <= sqrt_a {
        liquidity_for_amount0(sqrt_a, sqrt_b, amount0)
    } else if sqrt_price < sqrt_b {
        let liquidity0 = liquidity_for_amount0(sqrt_price, sqrt_b, amount0)?;
        let liquidity1 = liquidity_for_amount1(sqrt_a, sqrt_price, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(sqrt_a, sqrt_b, amount1)
    }
}

/// currency0 owed for `liquidity` across `[sqrt_a, sqrt_b]`
pub fn amount0_for_liquidity(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    if sqrt_a.is_zero() {
        return Err(overflow("amount0"));
    }
    let numerator = U256::from(liquidity) << 96;
    let diff = sqrt_b - sqrt_a;

    if round_up {
        let partial = mul_div_rounding_up(numerator, diff, sqrt_b).ok_or_else(|| overflow("amount0"))?;
        div_rounding_up(partial, sqrt_a).ok_or_else(|| overflow("amount0"))
    } else {
        let partial = mul_div(numerator, diff, sqrt_b).ok_or_else(|| overflow("amount0"))?;
        Ok(partial / sqrt_a)
    }
}

/// currency1 owed for `liquidity` across `[sqrt_a, sqrt_b]`
pub fn amount1_for_liquidity(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    let diff = sqrt_b - sqrt_a;
    let amount = if round_up {
        mul_div_rounding_up(U256::from(liquidity), diff, Q96)
    } else {
        mul_div(U256::from(liquidity), diff, Q96)
    };
    amount.ok_or_else(|| overflow("amount1"))
}

/// Token amounts a position of `liquidity` pulls at the current price, rounded up
pub fn amounts_for_liquidity(
    sqrt_price: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
) -> Result<(U256, U256)> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);

    if sqrt_price <= sqrt_a {
        Ok((amount0_for_liquidity(sqrt_a, sqrt_b, liquidity, true)?, U256::ZERO))
    } else if sqrt_price < sqrt_b {
        Ok((
            amount0_for_liquidity(sqrt_price, sqrt_b, liquidity, true)?,
            amount1_for_liquidity(sqrt_a, sqrt_price, liquidity, true)?,
        ))
    } else {
        Ok((U256::ZERO, amount1_for_liquidity(sqrt_a, sqrt_b, liquidity, true)?))
    }
}
