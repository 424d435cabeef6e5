// 3.0: the Order entity. created on placement, decremented by fills, closed by
// removal. once status leaves Open the row is immutable; `status` is the sole
// source of truth for lifecycle classification. `amount` is zeroed on close so
// open-order views can filter on amount alone (see store.rs).

use crate::types::{Address, Amount, OrderId, Price, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    /// Remaining amount reached zero through trading.
    Filled,
    /// Closed with amount still outstanding; amount forced to zero afterwards.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub trader: Address,
    pub is_buy: bool,
    pub price: Price,
    /// Immutable size at placement. `0 <= amount <= initial_amount` always.
    pub initial_amount: Amount,
    /// Remaining size, monotonically non-increasing.
    pub amount: Amount,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
}

impl Order {
    pub fn open(
        id: OrderId,
        trader: Address,
        is_buy: bool,
        price: Price,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            trader,
            is_buy,
            price,
            initial_amount: amount,
            amount,
            status: OrderStatus::Open,
            timestamp,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Consume `fill` from the remaining amount. Flips to Filled at exactly
    /// zero. None when the fill exceeds what remains; the caller treats that
    /// as a consistency fault, never a clamp.
    #[must_use]
    pub fn apply_fill(&self, fill: Amount) -> Option<Order> {
        let remaining = self.amount.checked_sub(fill)?;
        let status = if remaining.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::Open
        };
        Some(Order {
            amount: remaining,
            status,
            ..self.clone()
        })
    }

    /// Close on an order-removed event. Filled when already fully consumed,
    /// Cancelled otherwise; amount is zeroed either way so downstream
    /// open-order filters exclude the row.
    #[must_use]
    pub fn close(&self) -> Order {
        let status = if self.amount.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::Cancelled
        };
        Order {
            amount: Amount::zero(),
            status,
            ..self.clone()
        }
    }
}
