//! 512-bit intermediate arithmetic for Q64.96 price math.

use alloy_primitives::{U256, U512};

/// 2^96
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// `floor(a * b / denominator)` without intermediate overflow.
///
/// Returns `None` if `denominator` is zero or the result exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let product = U512::from(a) * U512::from(b);
    narrow(product / U512::from(denominator))
}

/// `ceil(a * b / denominator)` without intermediate overflow.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let product = U512::from(a) * U512::from(b);
    let denominator = U512::from(denominator);
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        narrow(quotient)
    } else {
        narrow(quotient + U512::from(1u8))
    }
}

/// `ceil(a / b)`; `b` must be non-zero
pub fn div_rounding_up(a: U256, b: U256) -> Option<U256> {
    if b.is_zero() {
        return None;
    }
    let quotient = a / b;
    if (a % b).is_zero() {
        Some(quotient)
    } else {
        Some(quotient + U256::from(1u8))
    }
}

/// Integer square root, `floor(sqrt(value))`, by Newton's method.
pub fn isqrt(value: U512) -> U512 {
    if value < U512::from(2u8) {
        return value;
    }

    // 2^ceil(bits/2) is always >= sqrt(value), so the iteration decreases monotonically
    let mut x = U512::from(1u8) << value.bit_len().div_ceil(2);
    loop {
        let y = (x + value / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Narrow a 512-bit value, `None` if it does not fit in 256 bits
pub fn narrow(value: U512) -> Option<U256> {
    if value > U512::from(U256::MAX) {
        None
    } else {
        Some(U256::from(value))
    }
}

/// `10^exp`
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}
