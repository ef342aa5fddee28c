use alloy_sol_types::sol;

sol! {
    /// Pool identifier. `currency0` must sort below `currency1`.
    #[derive(Debug, PartialEq, Eq)]
    struct PoolKey {
        address currency0;
        address currency1;
        uint24 fee;
        int24 tickSpacing;
        address hooks;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ModifyLiquidityParams {
        int24 tickLower;
        int24 tickUpper;
        int256 liquidityDelta;
        bytes32 salt;
    }

    #[derive(Debug)]
    interface IPoolManager {
        function initialize(PoolKey key, uint160 sqrtPriceX96) external returns (int24 tick);
    }

    /// Router that settles deltas on behalf of the caller inside the unlock callback
    #[derive(Debug)]
    interface ILiquidityRouter {
        function modifyLiquidity(
            PoolKey key,
            ModifyLiquidityParams params,
            bytes hookData
        ) external payable returns (int256 delta);
    }
}
