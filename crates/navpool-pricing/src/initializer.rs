use alloy_primitives::{Address, U160, U256};
use navpool_core::types::{InitializationPlan, PoolKey};
use navpool_core::{PoolSettings, Result};
use tracing::info;

use crate::plan::{build_initialization_plan, check_usable_price, PlanAccounts, PlanRequest};
use crate::range::validate_tick_spacing;
use crate::sqrt_price::{compute_initial_sqrt_price, compute_inverse_sqrt_price};

/// Turns a NAV reading into a ready-to-submit initialization plan
#[derive(Debug, Clone)]
pub struct PriceInitializer {
    settings: PoolSettings,
    hooks: Address,
}

impl PriceInitializer {
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            settings,
            hooks: Address::ZERO,
        }
    }

    /// Attach a hooks contract to the pool key
    pub fn with_hooks(mut self, hooks: Address) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Canonical key of the share/quote pool
    pub fn pool_key(&self, share_token: Address, quote_token: Address) -> Result<PoolKey> {
        validate_tick_spacing(self.settings.tick_spacing)?;
        PoolKey::new(
            share_token,
            quote_token,
            self.settings.fee_tier,
            self.settings.tick_spacing,
            self.hooks,
        )
    }

    /// Sqrt price for `key` in pool orientation (`currency1 / currency0`)
    pub fn pool_sqrt_price(
        &self,
        key: &PoolKey,
        share_token: Address,
        nav: U256,
        share_decimals: u8,
        quote_decimals: u8,
    ) -> Result<U160> {
        let nav_scale = self.settings.nav_scale();
        let sqrt_price = if key.is_currency0(share_token) {
            compute_initial_sqrt_price(nav, share_decimals, quote_decimals, nav_scale)?
        } else {
            compute_inverse_sqrt_price(nav, share_decimals, quote_decimals, nav_scale)?
        };
        check_usable_price(U256::from(sqrt_price), key.tick_spacing)?;
        Ok(sqrt_price)
    }

    /// Build the full setup plan for one vault.
    ///
    /// Fails before producing any call when the NAV, price, spacing or allocation
    /// are invalid.
    pub fn prepare(
        &self,
        nav: U256,
        share_decimals: u8,
        quote_decimals: u8,
        deposit_amount: U256,
        accounts: PlanAccounts,
    ) -> Result<InitializationPlan> {
        let key = self.pool_key(accounts.share_token, accounts.quote_token)?;
        let sqrt_price_x96 =
            self.pool_sqrt_price(&key, accounts.share_token, nav, share_decimals, quote_decimals)?;

        let plan = build_initialization_plan(&PlanRequest {
            pool_key: key,
            sqrt_price_x96,
            deposit_amount,
            allocation_bps: self.settings.allocation_bps,
            spread_ticks: self.settings.spread_ticks,
            accounts,
        })?;

        info!(
            vault = %accounts.vault,
            nav = %nav,
            sqrt_price_x96 = %plan.price.sqrt_price_x96,
            tick = plan.price.tick,
            tick_lower = plan.range.tick_lower,
            tick_upper = plan.range.tick_upper,
            liquidity = plan.liquidity,
            "Initialization plan prepared"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqrt_price::nav_from_sqrt_price;
    use alloy_primitives::address;
    use navpool_core::types::PlanStep;
    use navpool_core::SetupError;

    const SHARE: Address = address!("9999999999999999999999999999999999999999");
    const USDC: Address = address!("1111111111111111111111111111111111111111");

    fn accounts() -> PlanAccounts {
        PlanAccounts {
            vault: address!("3333333333333333333333333333333333333333"),
            share_token: SHARE,
            quote_token: USDC,
            pool_manager: address!("4444444444444444444444444444444444444444"),
            liquidity_router: address!("5555555555555555555555555555555555555555"),
        }
    }

    #[test]
    fn test_prepare_default_settings() {
        let initializer = PriceInitializer::new(PoolSettings::default());
        let plan = initializer
            .prepare(
                U256::from(10_000u64),
                18,
                6,
                U256::from(1_000_000_000u64),
                accounts(),
            )
            .unwrap();

        assert_eq!(plan.pool_key.currency0, USDC);
        assert_eq!(plan.pool_key.fee, 3000);
        assert_eq!(plan.pool_key.tick_spacing, 60);
        assert_eq!(plan.steps().len(), 6);
        assert_eq!(plan.steps()[2], PlanStep::InitializePool);
        assert!(plan.range.contains(plan.price.tick));
    }

    #[test]
    fn test_pool_price_orientation() {
        let initializer = PriceInitializer::new(PoolSettings::default());
        let nav = U256::from(10_000u64);

        // Share sorts after USDC: pool price is shares per quote unit
        let key = initializer.pool_key(SHARE, USDC).unwrap();
        let inverse = initializer.pool_sqrt_price(&key, SHARE, nav, 18, 6).unwrap();

        let low_share = address!("0000000000000000000000000000000000000001");
        let key = initializer.pool_key(low_share, USDC).unwrap();
        let direct = initializer.pool_sqrt_price(&key, low_share, nav, 18, 6).unwrap();

        assert!(inverse > direct);
        let recovered = nav_from_sqrt_price(direct, 18, 6, initializer.settings().nav_scale()).unwrap();
        assert!(nav - recovered <= U256::from(1u8));
    }

    #[test]
    fn test_prepare_rejects_zero_nav() {
        let initializer = PriceInitializer::new(PoolSettings::default());
        let err = initializer
            .prepare(U256::ZERO, 18, 6, U256::from(1u8), accounts())
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidNAV(_)));
    }

    #[test]
    fn test_prepare_rejects_bad_settings() {
        let settings = PoolSettings {
            tick_spacing: 0,
            ..PoolSettings::default()
        };
        let err = PriceInitializer::new(settings)
            .prepare(U256::from(10_000u64), 18, 6, U256::from(1u8), accounts())
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidTickSpacing(0)));

        let settings = PoolSettings {
            allocation_bps: 10_001,
            ..PoolSettings::default()
        };
        let err = PriceInitializer::new(settings)
            .prepare(U256::from(10_000u64), 18, 6, U256::from(1u8), accounts())
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidAllocation(10_001)));
    }

    #[test]
    fn test_hooks_are_part_of_the_key() {
        let hooks = address!("6666666666666666666666666666666666666666");
        let initializer = PriceInitializer::new(PoolSettings::default()).with_hooks(hooks);
        let key = initializer.pool_key(SHARE, USDC).unwrap();
        assert_eq!(key.hooks, hooks);
    }
}
