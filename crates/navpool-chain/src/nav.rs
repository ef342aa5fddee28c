use alloy_primitives::{Address, U256};
use navpool_core::{Result, SetupError};
use tracing::{info, warn};

use crate::client::ChainClient;

/// Fetch the NAV for `vault`.
///
/// A configured NAV engine is always authoritative, and a zero reading is an error.
/// `default_nav` only applies when no engine is deployed.
pub async fn resolve_nav<C: ChainClient + ?Sized>(
    client: &C,
    nav_engine: Option<Address>,
    default_nav: Option<U256>,
    vault: Address,
) -> Result<U256> {
    match (nav_engine, default_nav) {
        (Some(engine), _) => {
            let nav = client.read_nav(engine, vault).await?;
            if nav.is_zero() {
                return Err(SetupError::InvalidNAV(format!(
                    "NAV engine {} reports zero for vault {}",
                    engine, vault
                )));
            }
            info!(vault = %vault, nav_engine = %engine, nav = %nav, "NAV read from engine");
            Ok(nav)
        }
        (None, Some(nav)) => {
            warn!(
                vault = %vault,
                nav = %nav,
                "No NAV engine configured, using DEFAULT_NAV. NOT FOR PRODUCTION"
            );
            Ok(nav)
        }
        (None, None) => Err(SetupError::OracleUnavailable(
            "no NAV engine deployed and DEFAULT_NAV not set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChainClient;
    use alloy_primitives::address;

    const VAULT: Address = address!("3333333333333333333333333333333333333333");
    const ENGINE: Address = address!("4444444444444444444444444444444444444444");

    #[tokio::test]
    async fn test_engine_value_is_used() {
        let client = MockChainClient::default().with_nav(U256::from(12_345u64));
        let nav = resolve_nav(&client, Some(ENGINE), Some(U256::from(1u8)), VAULT)
            .await
            .unwrap();
        assert_eq!(nav, U256::from(12_345u64));
    }

    #[tokio::test]
    async fn test_zero_from_engine_never_falls_back() {
        let client = MockChainClient::default().with_nav(U256::ZERO);
        let err = resolve_nav(&client, Some(ENGINE), Some(U256::from(10_000u64)), VAULT)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidNAV(_)));
    }

    #[tokio::test]
    async fn test_engine_failure_is_oracle_unavailable() {
        let client = MockChainClient::default();
        let err = resolve_nav(&client, Some(ENGINE), None, VAULT)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::OracleUnavailable(_)));
    }

    #[tokio::test]
    async fn test_default_nav_without_engine() {
        let client = MockChainClient::default();
        let nav = resolve_nav(&client, None, Some(U256::from(10_000u64)), VAULT)
            .await
            .unwrap();
        assert_eq!(nav, U256::from(10_000u64));

        let err = resolve_nav(&client, None, None, VAULT).await.unwrap_err();
        assert!(matches!(err, SetupError::OracleUnavailable(_)));
    }
}
