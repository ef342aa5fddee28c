//! NAV to Q64.96 sqrt price conversion.
//!
//! Prices are raw-unit ratios: units of the quote currency's smallest denomination per
//! unit of the share token's smallest denomination. All math is integer so the same
//! NAV always produces the same `initialize` call.

use alloy_primitives::{U160, U256, U512};
use navpool_core::{Result, SetupError};

use crate::full_math::{isqrt, narrow, pow10};
use crate::tick_math::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};

/// Largest token decimals the conversion accepts
pub const MAX_DECIMALS: u8 = 18;

/// Sqrt price of a share token (currency A) in the quote currency (currency B).
///
/// `nav` is the price of one whole share in whole quote units, fixed-point with scale
/// `nav_scale`. The result is `floor(sqrt(ratio) * 2^96)` where
/// `ratio = nav * 10^decimals_b / (nav_scale * 10^decimals_a)`.
///
/// A zero `nav` is the oracle's "unset" value and is rejected rather than replaced.
pub fn compute_initial_sqrt_price(
    nav: U256,
    decimals_a: u8,
    decimals_b: u8,
    nav_scale: U256,
) -> Result<U160> {
    let (numerator, denominator) = share_price_ratio(nav, decimals_a, decimals_b, nav_scale)?;
    sqrt_price_from_wide_ratio(numerator, denominator)
}

/// Same as [`compute_initial_sqrt_price`] but expressed as shares per quote unit,
/// for pools where the quote currency sorts first.
pub fn compute_inverse_sqrt_price(
    nav: U256,
    decimals_a: u8,
    decimals_b: u8,
    nav_scale: U256,
) -> Result<U160> {
    let (numerator, denominator) = share_price_ratio(nav, decimals_a, decimals_b, nav_scale)?;
    sqrt_price_from_wide_ratio(denominator, numerator)
}

/// `floor(sqrt(numerator / denominator) * 2^96)`, computed as
/// `isqrt(floor(numerator * 2^192 / denominator))`.
pub fn sqrt_price_x96_from_ratio(numerator: U256, denominator: U256) -> Result<U160> {
    sqrt_price_from_wide_ratio(U512::from(numerator), U512::from(denominator))
}

/// Operands must stay below 2^320 so the shifted numerator fits in 512 bits.
/// The result lies strictly between `MIN_SQRT_RATIO` and `MAX_SQRT_RATIO`.
fn sqrt_price_from_wide_ratio(numerator: U512, denominator: U512) -> Result<U160> {
    if denominator.is_zero() {
        return Err(SetupError::MathOverflow("sqrt price ratio"));
    }

    let scaled = (numerator << 192) / denominator;
    let root = isqrt(scaled);

    // numerator < 2^320 so the root is < 2^256 and always narrows
    let root = narrow(root).ok_or(SetupError::MathOverflow("sqrt price"))?;
    if root <= MIN_SQRT_RATIO || root >= MAX_SQRT_RATIO {
        return Err(SetupError::PriceOutOfBounds(root));
    }
    Ok(U160::from(root))
}

/// Inverse of [`compute_initial_sqrt_price`], rounding down.
///
/// `floor(p^2 * nav_scale * 10^decimals_a / (2^192 * 10^decimals_b))`; recovers the
/// input NAV to within one unit.
pub fn nav_from_sqrt_price(
    sqrt_price_x96: U160,
    decimals_a: u8,
    decimals_b: u8,
    nav_scale: U256,
) -> Result<U256> {
    check_decimals(decimals_a)?;
    check_decimals(decimals_b)?;

    let price = U512::from(sqrt_price_x96);
    let scale = U512::from(nav_scale) * U512::from(pow10(decimals_a));
    let numerator = (price * price)
        .checked_mul(scale)
        .ok_or(SetupError::MathOverflow("nav from sqrt price"))?;
    let denominator = U512::from(pow10(decimals_b)) << 192;

    narrow(numerator / denominator).ok_or(SetupError::MathOverflow("nav from sqrt price"))
}

/// Numerator and denominator of the raw quote-per-share price, each below 2^316
fn share_price_ratio(
    nav: U256,
    decimals_a: u8,
    decimals_b: u8,
    nav_scale: U256,
) -> Result<(U512, U512)> {
    if nav.is_zero() {
        return Err(SetupError::InvalidNAV(
            "NAV is zero (oracle reports unset)".to_string(),
        ));
    }
    if nav_scale.is_zero() {
        return Err(SetupError::InvalidNAV("NAV scale must be positive".to_string()));
    }
    check_decimals(decimals_a)?;
    check_decimals(decimals_b)?;

    let numerator = U512::from(nav) * U512::from(pow10(decimals_b));
    let denominator = U512::from(nav_scale) * U512::from(pow10(decimals_a));
    Ok((numerator, denominator))
}

fn check_decimals(decimals: u8) -> Result<()> {
    if decimals > MAX_DECIMALS {
        return Err(SetupError::UnsupportedDecimals(decimals));
    }
    Ok(())
}
