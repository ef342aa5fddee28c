use alloy_primitives::{Address, U256};
use navpool_core::types::{InitializationPlan, PlanStep, PlannedCall};
use navpool_core::{Result, SetupError};
use std::sync::Arc;
use tracing::{error, info};

use crate::client::{ChainClient, TransactionOutcome};

/// A step that landed on chain
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: PlanStep,
    pub description: String,
    pub outcome: TransactionOutcome,
}

/// The step that stopped execution
#[derive(Debug)]
pub struct StepFailure {
    pub index: usize,
    pub step: PlanStep,
    pub error: SetupError,
}

/// Result of executing a plan.
///
/// `completed` lists every step already applied on chain, so a failure after the
/// deposit still shows that funds moved.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub completed: Vec<StepOutcome>,
    pub failure: Option<StepFailure>,
    /// Steps never attempted because an earlier one failed
    pub skipped: Vec<PlanStep>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn completed_steps(&self) -> Vec<PlanStep> {
        self.completed.iter().map(|outcome| outcome.step).collect()
    }
}

/// Submits plan calls one at a time, in order
pub struct PlanExecutor<C: ChainClient + ?Sized> {
    client: Arc<C>,
}

impl<C: ChainClient + ?Sized> PlanExecutor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fail early if the sender cannot cover the deposit plus the quote side of the
    /// liquidity add. Shares come from the deposit itself.
    pub async fn preflight(&self, plan: &InitializationPlan, quote_token: Address) -> Result<()> {
        let quote_for_liquidity = if plan.pool_key.currency0 == quote_token {
            plan.amount0_max
        } else {
            plan.amount1_max
        };
        let required = plan
            .deposit_amount
            .checked_add(quote_for_liquidity)
            .ok_or(SetupError::MathOverflow("required quote balance"))?;

        let sender = self.client.sender();
        let available = self.client.read_balance(quote_token, sender).await?;
        info!(
            sender = %sender,
            required = %required,
            available = %available,
            "Quote balance checked"
        );

        if available < required {
            return Err(SetupError::InsufficientBalance {
                token: quote_token,
                required,
                available,
            });
        }
        Ok(())
    }

    /// Execute every call of `plan`, stopping at the first failure. No retries.
    pub async fn execute(&self, plan: &InitializationPlan) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        let total = plan.calls.len();

        for (index, call) in plan.calls.iter().enumerate() {
            info!(
                step = %call.step,
                index = index + 1,
                total = total,
                target = %call.target,
                "{}",
                call.description
            );

            match self.submit(call).await {
                Ok(outcome) => {
                    info!(
                        step = %call.step,
                        tx_hash = %outcome.tx_hash,
                        block = ?outcome.block_number,
                        gas_used = outcome.gas_used,
                        "Step confirmed"
                    );
                    report.completed.push(StepOutcome {
                        step: call.step,
                        description: call.description.clone(),
                        outcome,
                    });
                }
                Err(e) => {
                    error!(step = %call.step, error = %e, "Step failed");
                    report.skipped = plan.calls[index + 1..].iter().map(|c| c.step).collect();
                    report.failure = Some(StepFailure {
                        index,
                        step: call.step,
                        error: e,
                    });
                    break;
                }
            }
        }

        report
    }

    async fn submit(&self, call: &PlannedCall) -> Result<TransactionOutcome> {
        self.client.submit_transaction(call).await
    }
}

/// Log a summary of `report`
pub fn log_report(report: &ExecutionReport) {
    for outcome in &report.completed {
        info!(step = %outcome.step, tx_hash = %outcome.outcome.tx_hash, "Applied");
    }
    match &report.failure {
        None => info!(steps = report.completed.len(), "All steps completed"),
        Some(failure) => {
            error!(
                step = %failure.step,
                index = failure.index,
                error = %failure.error,
                applied = report.completed.len(),
                skipped = report.skipped.len(),
                "Setup stopped; completed steps remain applied on chain"
            );
        }
    }
}

/// Sum of gas used by completed steps
pub fn total_gas_used(report: &ExecutionReport) -> U256 {
    report
        .completed
        .iter()
        .map(|outcome| U256::from(outcome.outcome.gas_used))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailureMode, MockChainClient};
    use alloy_primitives::address;
    use navpool_core::PoolSettings;
    use navpool_pricing::{PlanAccounts, PriceInitializer};

    const SHARE: Address = address!("9999999999999999999999999999999999999999");
    const USDC: Address = address!("1111111111111111111111111111111111111111");

    fn plan() -> InitializationPlan {
        let accounts = PlanAccounts {
            vault: address!("3333333333333333333333333333333333333333"),
            share_token: SHARE,
            quote_token: USDC,
            pool_manager: address!("4444444444444444444444444444444444444444"),
            liquidity_router: address!("5555555555555555555555555555555555555555"),
        };
        PriceInitializer::new(PoolSettings::default())
            .prepare(
                U256::from(10_000u64),
                18,
                6,
                U256::from(1_000_000_000u64),
                accounts,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_executes_all_steps_in_order() {
        let client = Arc::new(MockChainClient::default());
        let executor = PlanExecutor::new(client.clone());
        let plan = plan();

        let report = executor.execute(&plan).await;

        assert!(report.is_success());
        assert!(report.skipped.is_empty());
        assert_eq!(report.completed_steps(), plan.steps());
        assert_eq!(client.submitted_steps(), plan.steps());
        assert_eq!(total_gas_used(&report), U256::from(300_000u64));
    }

    #[tokio::test]
    async fn test_stops_at_first_revert() {
        // Deposit lands, initialize reverts
        let client = Arc::new(MockChainClient::default().failing_at(2, FailureMode::Revert));
        let executor = PlanExecutor::new(client.clone());

        let report = executor.execute(&plan()).await;

        assert!(!report.is_success());
        assert_eq!(
            report.completed_steps(),
            vec![PlanStep::ApproveDeposit, PlanStep::Deposit]
        );
        let failure = report.failure.as_ref().unwrap();
        assert_eq!(failure.index, 2);
        assert_eq!(failure.step, PlanStep::InitializePool);
        assert!(matches!(
            failure.error,
            SetupError::TransactionReverted {
                step: PlanStep::InitializePool,
                ..
            }
        ));
        assert_eq!(
            report.skipped,
            vec![
                PlanStep::ApproveLiquidity,
                PlanStep::ApproveLiquidity,
                PlanStep::AddLiquidity
            ]
        );
        // Nothing submitted after the failure
        assert_eq!(client.submitted_steps().len(), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let client = Arc::new(MockChainClient::default().failing_at(5, FailureMode::Timeout));
        let report = PlanExecutor::new(client).execute(&plan()).await;

        assert_eq!(report.completed.len(), 5);
        assert!(matches!(
            report.failure.as_ref().map(|f| &f.error),
            Some(SetupError::TransactionTimeout {
                step: PlanStep::AddLiquidity
            })
        ));
    }

    #[tokio::test]
    async fn test_preflight_requires_deposit_plus_quote_side() {
        let plan = plan();
        let quote_side = plan.amount0_max;
        let required = plan.deposit_amount + quote_side;

        let short = Arc::new(
            MockChainClient::default().with_balance(USDC, required - U256::from(1u8)),
        );
        let err = PlanExecutor::new(short).preflight(&plan, USDC).await.unwrap_err();
        assert!(matches!(err, SetupError::InsufficientBalance { .. }));

        let funded = Arc::new(MockChainClient::default().with_balance(USDC, required));
        PlanExecutor::new(funded).preflight(&plan, USDC).await.unwrap();
    }
}
