// 5.0: margin ledger rows. one append-only row per deposit or withdrawal,
// keyed by the originating event so replays overwrite in place.

use crate::types::{Address, Amount, EventId, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginAction {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginEvent {
    pub id: EventId,
    pub trader: Address,
    pub amount: Amount,
    pub action: MarginAction,
    pub timestamp: Timestamp,
    pub tx_hash: TxHash,
}
