pub mod config;
pub mod contracts;
pub mod error;
pub mod types;

pub use config::{DeploymentConfig, EnvConfig, ExecutionSettings, PoolSettings, SetupConfig};
pub use error::{Result, SetupError};
