// 5.2: liquidation ledger rows. append-only; the position netting that
// follows each one lives in position.rs and engine/liquidations.rs.

use crate::types::{Address, Amount, EventId, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquidation {
    pub id: EventId,
    pub trader: Address,
    pub liquidator: Address,
    pub amount: Amount,
    pub fee: Amount,
    pub timestamp: Timestamp,
    pub tx_hash: TxHash,
}
