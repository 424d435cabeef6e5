// 4.0: one Position per trader, last-write-wins on explicit position updates.
// 4.1 has the liquidation netting rule.

use crate::types::{Address, Amount, Price, SignedSize};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub trader: Address,
    pub size: SignedSize,
    pub entry_price: Price,
}

impl Position {
    pub fn new(trader: Address, size: SignedSize, entry_price: Price) -> Self {
        Self {
            trader,
            size,
            entry_price,
        }
    }

    /// Liquidation netting: shrink this position's magnitude by `amount`,
    /// carrying every other field over unchanged.
    #[must_use]
    pub fn liquidate(&self, amount: Amount) -> Position {
        Position {
            size: reduce_toward_zero(self.size, amount),
            ..self.clone()
        }
    }
}

// 4.1: magnitude reduction, clamped at zero. a liquidated amount larger than
// the open size closes the position flat; the sign never flips. longs shrink
// downward, shorts (and flat) shrink upward.
pub fn reduce_toward_zero(size: SignedSize, amount: Amount) -> SignedSize {
    let reduced = if size.is_long() {
        (size.value() - amount.value()).max(Decimal::ZERO)
    } else {
        (size.value() + amount.value()).min(Decimal::ZERO)
    };
    SignedSize::new(reduced)
}
