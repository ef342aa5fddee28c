use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use navpool_chain::{run_setup, AlloyChainClient, SetupRequest};
use navpool_core::SetupConfig;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navpool-setup", version, about = "Bootstrap a NAV-priced share/USDC pool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deposit into a vault, initialize its share pool at NAV and seed liquidity
    Setup {
        /// Vault address
        vault: Address,

        /// Quote currency to deposit, in whole units (e.g. 1000 or 12.5)
        #[arg(long)]
        amount: Option<String>,

        /// Read chain state and print the plan without sending transactions
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("navpool_chain=info".parse()?)
                .add_directive("navpool_pricing=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match SetupConfig::load() {
        Ok(config) => {
            info!(
                chain_id = config.chain_id,
                pool_manager = %config.pool_manager,
                nav_engine = ?config.nav_engine,
                quote_token = %config.quote_token,
                liquidity_router = %config.liquidity_router,
                "Configuration loaded from deployment"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let Command::Setup {
        vault,
        amount,
        dry_run,
    } = cli.command;

    let client = match AlloyChainClient::new(
        &config.rpc_url,
        &config.private_key,
        config.execution.tx_timeout,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to create chain client");
            std::process::exit(1);
        }
    };

    let request = SetupRequest {
        vault,
        amount,
        dry_run,
    };

    match run_setup(client, &config, &request).await {
        Ok(outcome) if outcome.is_success() => {
            info!(vault = %vault, "Setup complete");
            Ok(())
        }
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            if e.is_compute_error() {
                error!(error = %e, "Pricing inputs rejected, nothing was sent");
            } else {
                error!(error = %e, "Setup failed before any transaction was sent");
            }
            std::process::exit(1);
        }
    }
}
