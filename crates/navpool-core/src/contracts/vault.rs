use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface IVault {
        /// Deposits quote currency and mints at least `minShares` share tokens
        function deposit(uint256 amount, uint256 minShares) external returns (uint256);

        function shareToken() external view returns (address);
    }
}
