use alloy_sol_types::sol;

sol! {
    /// NAV oracle. Returns 0 for vaults it has no NAV for.
    #[derive(Debug)]
    interface INavEngine {
        function getCurrentNAV(address vault) external view returns (uint256);
    }
}
