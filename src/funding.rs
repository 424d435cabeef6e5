// 5.1: funding ledger rows. two shapes share one collection: global cumulative
// rate updates and per-trader payments. the enum makes exactly one payload
// legal per row, where a flat record would need two nullable columns.

use crate::types::{Address, Amount, EventId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FundingDetail {
    /// Exchange-wide cumulative funding rate moved.
    GlobalUpdate { cumulative_rate: Decimal },
    /// One trader paid (or received) funding. Not folded into Position;
    /// the ledger row is the only record of it here.
    UserPaid { trader: Address, payment: Amount },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingEvent {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub detail: FundingDetail,
}
