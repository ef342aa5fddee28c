use alloy_primitives::aliases::{I24, U24};
use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::SolValue;

use crate::contracts;
use crate::error::{Result, SetupError};

/// Largest static LP fee accepted by the pool manager (100%)
pub const MAX_LP_FEE: u32 = 1_000_000;
pub const MIN_TICK_SPACING: i32 = 1;
pub const MAX_TICK_SPACING: i32 = i16::MAX as i32;

/// Canonically ordered pool key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    /// Numerically lower currency
    pub currency0: Address,
    /// Numerically higher currency
    pub currency1: Address,
    /// Fee in hundredths of a basis point
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// Build a key from an unordered currency pair.
    pub fn new(
        currency_a: Address,
        currency_b: Address,
        fee: u32,
        tick_spacing: i32,
        hooks: Address,
    ) -> Result<Self> {
        if currency_a == currency_b {
            return Err(SetupError::IdenticalCurrencies(currency_a));
        }
        if fee > MAX_LP_FEE {
            return Err(SetupError::InvalidFee(fee));
        }
        if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
            return Err(SetupError::InvalidTickSpacing(tick_spacing));
        }

        let (currency0, currency1) = if currency_a < currency_b {
            (currency_a, currency_b)
        } else {
            (currency_b, currency_a)
        };

        Ok(Self {
            currency0,
            currency1,
            fee,
            tick_spacing,
            hooks,
        })
    }

    /// True if `token` is `currency0` of this pool
    pub fn is_currency0(&self, token: Address) -> bool {
        self.currency0 == token
    }

    pub fn to_abi(&self) -> Result<contracts::PoolKey> {
        Ok(contracts::PoolKey {
            currency0: self.currency0,
            currency1: self.currency1,
            fee: U24::from(self.fee),
            tickSpacing: to_int24(self.tick_spacing)?,
            hooks: self.hooks,
        })
    }

    /// `keccak256(abi.encode(key))`, the id the pool manager stores the pool under
    pub fn pool_id(&self) -> Result<B256> {
        Ok(keccak256(self.to_abi()?.abi_encode()))
    }
}

/// Convert to the ABI `int24` type
pub fn to_int24(value: i32) -> Result<I24> {
    I24::try_from(value).map_err(|_| SetupError::TickOutOfBounds(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const SHARE: Address = address!("9999999999999999999999999999999999999999");
    const USDC: Address = address!("1111111111111111111111111111111111111111");

    #[test]
    fn test_new_sorts_currencies() {
        let key = PoolKey::new(SHARE, USDC, 3000, 60, Address::ZERO).unwrap();
        assert_eq!(key.currency0, USDC);
        assert_eq!(key.currency1, SHARE);
        assert!(key.is_currency0(USDC));

        let flipped = PoolKey::new(USDC, SHARE, 3000, 60, Address::ZERO).unwrap();
        assert_eq!(key, flipped);
        assert_eq!(key.pool_id().unwrap(), flipped.pool_id().unwrap());
    }

    #[test]
    fn test_new_rejects_identical_currencies() {
        let err = PoolKey::new(USDC, USDC, 3000, 60, Address::ZERO).unwrap_err();
        assert!(matches!(err, SetupError::IdenticalCurrencies(a) if a == USDC));
    }

    #[test]
    fn test_new_rejects_bad_fee_and_spacing() {
        assert!(matches!(
            PoolKey::new(SHARE, USDC, 1_000_001, 60, Address::ZERO),
            Err(SetupError::InvalidFee(1_000_001))
        ));
        assert!(matches!(
            PoolKey::new(SHARE, USDC, 3000, 0, Address::ZERO),
            Err(SetupError::InvalidTickSpacing(0))
        ));
        assert!(matches!(
            PoolKey::new(SHARE, USDC, 3000, 40_000, Address::ZERO),
            Err(SetupError::InvalidTickSpacing(40_000))
        ));
    }

    #[test]
    fn test_to_abi_keeps_fields() {
        let key = PoolKey::new(SHARE, USDC, 500, 10, SHARE).unwrap();
        let abi = key.to_abi().unwrap();
        assert_eq!(abi.currency0, USDC);
        assert_eq!(abi.fee, U24::from(500u32));
        assert_eq!(abi.tickSpacing, I24::try_from(10).unwrap());
        assert_eq!(abi.hooks, SHARE);
    }

    #[test]
    fn test_pool_id_depends_on_fee() {
        let a = PoolKey::new(SHARE, USDC, 500, 10, Address::ZERO).unwrap();
        let b = PoolKey::new(SHARE, USDC, 3000, 10, Address::ZERO).unwrap();
        assert_ne!(a.pool_id().unwrap(), b.pool_id().unwrap());
    }

    #[test]
    fn test_to_int24_bounds() {
        assert!(to_int24(887272).is_ok());
        assert!(to_int24(-887272).is_ok());
        assert!(matches!(
            to_int24(1 << 23),
            Err(SetupError::TickOutOfBounds(_))
        ));
    }
}
