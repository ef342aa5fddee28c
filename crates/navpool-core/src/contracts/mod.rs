pub mod erc20;
pub mod nav_engine;
pub mod pool_manager;
pub mod vault;

pub use erc20::*;
pub use nav_engine::*;
pub use pool_manager::*;
pub use vault::*;
