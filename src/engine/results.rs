// 9.0.2: result and error types for projection operations.

use crate::candle::CandleKey;
use crate::store::StoreError;
use crate::types::{Amount, OrderId};

/// What happened to an event handed to `Projection::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event advanced the projection.
    Applied,
    /// The event's log position was at or behind the cursor: an at-least-once
    /// redelivery. State untouched.
    Replayed,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    // arithmetic-invariant violations. never clamped: they mean either a bug
    // or an ordering violation upstream, and the host has to know.
    #[error("order {order_id}: fill of {fill} exceeds remaining amount {remaining}")]
    NegativeRemaining {
        order_id: OrderId,
        remaining: Amount,
        fill: Amount,
    },

    #[error("candle {} bucket {} violates high/low ordering", .key.resolution, .key.bucket_start)]
    CandleInvariant { key: CandleKey },
}
