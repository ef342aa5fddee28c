mod client;
mod executor;
mod nav;
mod provider;
mod setup;
#[cfg(test)]
mod testing;

pub use client::{ChainClient, TransactionOutcome};
pub use executor::{
    log_report, total_gas_used, ExecutionReport, PlanExecutor, StepFailure, StepOutcome,
};
pub use nav::resolve_nav;
pub use provider::{AlloyChainClient, BoxedProvider};
pub use setup::{parse_deposit_amount, run_setup, SetupOutcome, SetupRequest};
