use alloy_primitives::utils::{parse_units, ParseUnits};
use alloy_primitives::{Address, U256};
use navpool_core::types::InitializationPlan;
use navpool_core::{Result, SetupConfig, SetupError};
use navpool_pricing::{PlanAccounts, PriceInitializer};
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::ChainClient;
use crate::executor::{log_report, total_gas_used, ExecutionReport, PlanExecutor};
use crate::nav::resolve_nav;

/// One `setup` invocation
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub vault: Address,
    /// Whole quote units; `PoolSettings::default_deposit_amount` when absent
    pub amount: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum SetupOutcome {
    /// Plan built and logged, nothing sent
    DryRun { plan: InitializationPlan },
    Executed {
        plan: InitializationPlan,
        report: ExecutionReport,
    },
}

impl SetupOutcome {
    pub fn plan(&self) -> &InitializationPlan {
        match self {
            Self::DryRun { plan } | Self::Executed { plan, .. } => plan,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::DryRun { .. } => true,
            Self::Executed { report, .. } => report.is_success(),
        }
    }

    /// Process exit code: 0 only when every submitted step landed
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Read chain state for `request.vault`, build the plan and, unless dry-running,
/// execute it.
///
/// Every `Err` is raised before the first transaction is sent. Failures during
/// execution come back as `SetupOutcome::Executed` with a failed report.
pub async fn run_setup<C: ChainClient + ?Sized>(
    client: Arc<C>,
    config: &SetupConfig,
    request: &SetupRequest,
) -> Result<SetupOutcome> {
    let chain_id = client.chain_id().await?;
    if chain_id != config.chain_id {
        return Err(SetupError::ChainIdMismatch {
            expected: config.chain_id,
            actual: chain_id,
        });
    }

    let vault = request.vault;
    let share_token = client.read_share_token(vault).await?;
    let share_decimals = client.read_token_decimals(share_token).await?;
    let quote_decimals = client.read_token_decimals(config.quote_token).await?;

    let amount = request
        .amount
        .as_deref()
        .unwrap_or(&config.pool.default_deposit_amount);
    let deposit_amount = parse_deposit_amount(amount, quote_decimals)?;

    info!(
        vault = %vault,
        share_token = %share_token,
        share_decimals = share_decimals,
        quote_decimals = quote_decimals,
        deposit = %amount,
        "Vault resolved"
    );

    let nav = resolve_nav(
        client.as_ref(),
        config.nav_engine,
        config.pool.default_nav,
        vault,
    )
    .await?;

    let initializer = PriceInitializer::new(config.pool.clone()).with_hooks(config.hooks);
    let plan = initializer.prepare(
        nav,
        share_decimals,
        quote_decimals,
        deposit_amount,
        PlanAccounts {
            vault,
            share_token,
            quote_token: config.quote_token,
            pool_manager: config.pool_manager,
            liquidity_router: config.liquidity_router,
        },
    )?;
    log_plan(&plan)?;

    if request.dry_run {
        warn!("Dry run, no transactions sent");
        return Ok(SetupOutcome::DryRun { plan });
    }

    let executor = PlanExecutor::new(client);
    executor.preflight(&plan, config.quote_token).await?;

    let report = executor.execute(&plan).await;
    log_report(&report);
    info!(gas_used = %total_gas_used(&report), "Execution finished");

    Ok(SetupOutcome::Executed { plan, report })
}

/// Parse a positive decimal amount of whole units into raw units
pub fn parse_deposit_amount(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| SetupError::InvalidAmount(format!("{}: {}", amount, e)))?;

    let value = match parsed {
        ParseUnits::U256(value) => value,
        ParseUnits::I256(value) if !value.is_negative() => value.into_raw(),
        ParseUnits::I256(_) => {
            return Err(SetupError::InvalidAmount(format!("{} is negative", amount)))
        }
    };

    if value.is_zero() {
        return Err(SetupError::InvalidAmount(format!("{} must be positive", amount)));
    }
    Ok(value)
}

fn log_plan(plan: &InitializationPlan) -> Result<()> {
    let pool_id = plan.pool_key.pool_id()?;
    info!(
        pool_id = %pool_id,
        currency0 = %plan.pool_key.currency0,
        currency1 = %plan.pool_key.currency1,
        fee = plan.pool_key.fee,
        tick_spacing = plan.pool_key.tick_spacing,
        sqrt_price_x96 = %plan.price.sqrt_price_x96,
        tick = plan.price.tick,
        tick_lower = plan.range.tick_lower,
        tick_upper = plan.range.tick_upper,
        liquidity = plan.liquidity,
        amount0_max = %plan.amount0_max,
        amount1_max = %plan.amount1_max,
        "Initialization plan"
    );
    for (index, call) in plan.calls.iter().enumerate() {
        info!(
            index = index + 1,
            step = %call.step,
            target = %call.target,
            "{}",
            call.description
        );
    }
    Ok(())
}
