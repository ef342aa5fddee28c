use crate::error::{Result, SetupError};
use alloy_primitives::{Address, U256};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Contract addresses loaded from `deployments/<chain_id>.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DeploymentConfig {
    pub pool_manager: Address,
    /// Absent on local networks without a NAV engine deployment
    #[serde(default)]
    pub nav_engine: Option<Address>,
    pub usdc: Address,
    pub liquidity_router: Address,
    #[serde(default)]
    pub hooks: Option<Address>,
}

/// Connection settings from environment variables
#[derive(Clone)]
pub struct EnvConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub private_key: String,
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Pool and liquidity parameters
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Pool fee in hundredths of a basis point (3000 = 0.30%)
    pub fee_tier: u32,
    pub tick_spacing: i32,
    /// Half-width of the seeded liquidity range, in ticks
    pub spread_ticks: u32,
    /// Share of the deposit added as liquidity, in basis points
    pub allocation_bps: u32,
    /// Decimal scale of NAV values reported by the NAV engine
    pub nav_decimals: u8,
    /// Non-production NAV used only when no NAV engine is deployed
    pub default_nav: Option<U256>,
    /// Deposit amount in quote units when `--amount` is not given
    pub default_deposit_amount: String,
}

impl PoolSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_nav = match env::var("DEFAULT_NAV") {
            Ok(raw) => Some(parse_var::<U256>("DEFAULT_NAV", &raw)?),
            Err(_) => None,
        };

        Ok(Self {
            fee_tier: env_or("FEE_TIER", defaults.fee_tier)?,
            tick_spacing: env_or("TICK_SPACING", defaults.tick_spacing)?,
            spread_ticks: env_or("SPREAD_TICKS", defaults.spread_ticks)?,
            allocation_bps: env_or("ALLOCATION_BPS", defaults.allocation_bps)?,
            nav_decimals: env_or("NAV_DECIMALS", defaults.nav_decimals)?,
            default_nav,
            default_deposit_amount: env::var("DEFAULT_DEPOSIT_AMOUNT")
                .unwrap_or(defaults.default_deposit_amount),
        })
    }

    /// `10^nav_decimals`
    pub fn nav_scale(&self) -> U256 {
        U256::from(10u8).pow(U256::from(self.nav_decimals))
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            fee_tier: 3000,
            tick_spacing: 60,
            spread_ticks: 1000,
            allocation_bps: 5000,
            nav_decimals: 6,
            default_nav: None,
            default_deposit_amount: "1000".to_string(),
        }
    }
}

/// Transaction submission settings
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    /// How long to wait for each receipt before giving up
    pub tx_timeout: Duration,
}

impl ExecutionSettings {
    pub fn from_env() -> Result<Self> {
        let secs: u64 = env_or("TX_TIMEOUT_SECS", 120)?;
        Ok(Self {
            tx_timeout: Duration::from_secs(secs),
        })
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            tx_timeout: Duration::from_secs(120),
        }
    }
}

impl EnvConfig {
    /// Load connection settings from environment variables.
    pub fn load() -> Result<Self> {
        let chain_id = env::var("CHAIN_ID")
            .map_err(|_| SetupError::MissingEnvVar("CHAIN_ID".to_string()))?;
        let chain_id = parse_var::<u64>("CHAIN_ID", &chain_id)?;

        let rpc_url = sanitize_value(
            env::var("RPC_URL").unwrap_or_else(|_| "http://localhost:8545".to_string()),
        );

        let private_key = sanitize_value(
            env::var("PRIVATE_KEY")
                .map_err(|_| SetupError::MissingEnvVar("PRIVATE_KEY".to_string()))?,
        );

        Ok(Self {
            chain_id,
            rpc_url,
            private_key,
        })
    }
}

impl DeploymentConfig {
    /// Load deployment addresses from JSON file
    pub fn load(chain_id: u64) -> Result<Self> {
        let path = Self::deployment_path(chain_id);
        let content = fs::read_to_string(&path)
            .map_err(|_| SetupError::DeploymentFileNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| SetupError::DeploymentParseError(e.to_string()))
    }

    fn deployment_path(chain_id: u64) -> PathBuf {
        let dir = env::var("DEPLOYMENTS_DIR").unwrap_or_else(|_| "deployments".to_string());
        PathBuf::from(format!("{}/{}.json", dir, chain_id))
    }
}

/// Complete, immutable configuration for one setup run
#[derive(Clone)]
pub struct SetupConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub private_key: String,
    pub pool_manager: Address,
    pub nav_engine: Option<Address>,
    pub quote_token: Address,
    pub liquidity_router: Address,
    pub hooks: Address,
    pub pool: PoolSettings,
    pub execution: ExecutionSettings,
}

impl fmt::Debug for SetupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupConfig")
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("pool_manager", &self.pool_manager)
            .field("nav_engine", &self.nav_engine)
            .field("quote_token", &self.quote_token)
            .field("liquidity_router", &self.liquidity_router)
            .field("hooks", &self.hooks)
            .field("pool", &self.pool)
            .field("execution", &self.execution)
            .finish()
    }
}

impl SetupConfig {
    /// Load complete configuration from environment and deployment file
    pub fn load() -> Result<Self> {
        let env_config = EnvConfig::load()?;
        let deployment = DeploymentConfig::load(env_config.chain_id)?;

        Ok(Self::assemble(
            env_config,
            deployment,
            PoolSettings::from_env()?,
            ExecutionSettings::from_env()?,
        ))
    }

    pub fn assemble(
        env_config: EnvConfig,
        deployment: DeploymentConfig,
        pool: PoolSettings,
        execution: ExecutionSettings,
    ) -> Self {
        Self {
            chain_id: env_config.chain_id,
            rpc_url: env_config.rpc_url,
            private_key: env_config.private_key,
            pool_manager: deployment.pool_manager,
            nav_engine: deployment.nav_engine,
            quote_token: deployment.usdc,
            liquidity_router: deployment.liquidity_router,
            hooks: deployment.hooks.unwrap_or(Address::ZERO),
            pool,
            execution,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => parse_var(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    let value = sanitize_value(raw.to_string());
    value.parse().map_err(|_| SetupError::InvalidEnvVar {
        name: name.to_string(),
        value,
    })
}

/// Strip whitespace and surrounding quotes left over from `.env` files
fn sanitize_value(value: String) -> String {
    let trimmed = value.trim();
    let without_quotes = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    without_quotes.to_string()
}
