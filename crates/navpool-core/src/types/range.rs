/// Tick bounds of the seeded liquidity position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl LiquidityRange {
    /// Width of the range in ticks
    pub fn width(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }

    pub fn contains(&self, tick: i32) -> bool {
        self.tick_lower <= tick && tick < self.tick_upper
    }
}
