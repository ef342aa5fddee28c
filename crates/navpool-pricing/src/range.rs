use navpool_core::types::LiquidityRange;
use navpool_core::{Result, SetupError};

use crate::tick_math::{max_usable_tick, min_usable_tick, MAX_TICK, MIN_TICK};

/// Tick spacings of the standard fee tiers (0.01%, 0.05%, 0.30%, 1.00%)
pub const ALLOWED_TICK_SPACINGS: [i32; 4] = [1, 10, 60, 200];

pub fn validate_tick_spacing(tick_spacing: i32) -> Result<()> {
    if ALLOWED_TICK_SPACINGS.contains(&tick_spacing) {
        Ok(())
    } else {
        Err(SetupError::InvalidTickSpacing(tick_spacing))
    }
}

/// Range of `spread_ticks` on each side of `current_tick`, widened outward to the
/// tick grid and clamped to the usable ticks for `tick_spacing`.
///
/// The result always has `tick_lower < tick_upper`, both multiples of
/// `tick_spacing`, and a width of at least one spacing.
pub fn compute_liquidity_range(
    current_tick: i32,
    tick_spacing: i32,
    spread_ticks: u32,
) -> Result<LiquidityRange> {
    validate_tick_spacing(tick_spacing)?;
    if !(MIN_TICK..=MAX_TICK).contains(&current_tick) {
        return Err(SetupError::TickOutOfBounds(current_tick));
    }

    // i64 so that tick +- spread cannot overflow
    let tick = i64::from(current_tick);
    let spread = i64::from(spread_ticks);
    let spacing = i64::from(tick_spacing);
    let min_tick = i64::from(min_usable_tick(tick_spacing));
    let max_tick = i64::from(max_usable_tick(tick_spacing));

    let mut lower = (tick - spread).div_euclid(spacing) * spacing;
    let mut upper = -(-(tick + spread)).div_euclid(spacing) * spacing;
    if upper == lower {
        upper += spacing;
    }

    lower = lower.max(min_tick);
    upper = upper.min(max_tick);
    if lower >= upper {
        if upper == max_tick {
            lower = upper - spacing;
        } else {
            upper = lower + spacing;
        }
    }

    Ok(LiquidityRange {
        tick_lower: lower as i32,
        tick_upper: upper as i32,
    })
}
