// 2.0: the input side of the projection: typed settlement events as decoded
// from the exchange contract's log. every event carries chain metadata
// (block, log index, transaction, timestamp) plus a typed payload. the
// upstream source delivers these at-least-once in non-decreasing
// (block, log index) order; the engine never sees raw log data.

use crate::types::{Address, Amount, EventId, LogPosition, OrderId, Price, SignedSize, Timestamp, TxHash};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 2.1: where and when the event happened on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub block_number: u64,
    pub log_index: u32,
    pub tx_hash: TxHash,
    pub timestamp: Timestamp,
}

impl EventMeta {
    pub fn new(block_number: u64, log_index: u32, tx_hash: TxHash, timestamp: Timestamp) -> Self {
        Self {
            block_number,
            log_index,
            tx_hash,
            timestamp,
        }
    }

    /// Deterministic id for ledger rows produced by this event.
    pub fn ledger_id(&self) -> EventId {
        EventId::new(self.tx_hash.clone(), self.log_index)
    }

    pub fn position(&self) -> LogPosition {
        LogPosition::new(self.block_number, self.log_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginDeposited {
    pub trader: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginWithdrawn {
    pub trader: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub id: OrderId,
    pub trader: Address,
    pub is_buy: bool,
    pub price: Price,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRemoved {
    pub id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeExecuted {
    pub buyer: Address,
    pub seller: Address,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Price,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdated {
    pub trader: Address,
    pub size: SignedSize,
    pub entry_price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingUpdated {
    pub cumulative_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingPaid {
    pub trader: Address,
    pub payment: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquidated {
    pub trader: Address,
    pub liquidator: Address,
    pub amount: Amount,
    pub fee: Amount,
}

// 2.2: one variant per contract event the projection consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExchangePayload {
    MarginDeposited(MarginDeposited),
    MarginWithdrawn(MarginWithdrawn),
    OrderPlaced(OrderPlaced),
    OrderRemoved(OrderRemoved),
    TradeExecuted(TradeExecuted),
    PositionUpdated(PositionUpdated),
    FundingUpdated(FundingUpdated),
    FundingPaid(FundingPaid),
    Liquidated(Liquidated),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeEvent {
    pub meta: EventMeta,
    pub payload: ExchangePayload,
}

impl ExchangeEvent {
    pub fn new(meta: EventMeta, payload: ExchangePayload) -> Self {
        Self { meta, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn meta() -> EventMeta {
        EventMeta::new(17, 3, TxHash::new("0xfeed"), Timestamp::from_secs(1_000))
    }

    #[test]
    fn ledger_id_is_tx_plus_log_index() {
        assert_eq!(meta().ledger_id().to_string(), "0xfeed-3");
        assert_eq!(meta().position(), LogPosition::new(17, 3));
    }

    #[test]
    fn event_json_round_trip() {
        let event = ExchangeEvent::new(
            meta(),
            ExchangePayload::TradeExecuted(TradeExecuted {
                buyer: Address::new_unchecked("0xa"),
                seller: Address::new_unchecked("0xb"),
                buy_order_id: OrderId(1),
                sell_order_id: OrderId(2),
                price: Price::new_unchecked(dec!(100)),
                amount: Amount::new_unchecked(dec!(10)),
            }),
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: ExchangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
