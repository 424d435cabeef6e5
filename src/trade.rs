// 3.1: the Trade entity. append-only, never mutated after creation. keyed by
// the originating (tx hash, log index) so a replayed event overwrites the same
// row with identical content.

use crate::types::{Address, Amount, EventId, OrderId, Price, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: EventId,
    pub buyer: Address,
    pub seller: Address,
    pub price: Price,
    pub amount: Amount,
    pub timestamp: Timestamp,
    pub tx_hash: TxHash,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
}
