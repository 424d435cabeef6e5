// 7.0: the entity store contract the engine projects into. get/set by key per
// collection, upsert-with-full-replace semantics. the engine performs all of
// an event's reads before its writes and expects the store to commit one
// event's writes atomically; no cross-entity transactions beyond that.
// 7.2 has MemoryStore, the reference implementation used by the sim and tests.

use crate::candle::{Candle, CandleKey, LatestCandle, Resolution};
use crate::funding::FundingEvent;
use crate::liquidation::Liquidation;
use crate::margin::MarginEvent;
use crate::order::Order;
use crate::position::Position;
use crate::trade::Trade;
use crate::types::{Address, EventId, LogPosition, OrderId};
use std::collections::{BTreeMap, HashMap};

/// Store failures are host-side (connection lost, write refused). They
/// propagate out of the engine untouched; the event can be re-delivered after
/// recovery because every handler is idempotent under exact replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// 7.1: one get/set pair per collection, plus the two singletons
// (LatestCandle pointer, replay checkpoint).
pub trait ProjectionStore {
    fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
    fn put_order(&mut self, order: Order) -> Result<(), StoreError>;

    fn trade(&self, id: &EventId) -> Result<Option<Trade>, StoreError>;
    fn put_trade(&mut self, trade: Trade) -> Result<(), StoreError>;

    fn position(&self, trader: &Address) -> Result<Option<Position>, StoreError>;
    fn put_position(&mut self, position: Position) -> Result<(), StoreError>;

    fn put_margin_event(&mut self, event: MarginEvent) -> Result<(), StoreError>;
    fn put_funding_event(&mut self, event: FundingEvent) -> Result<(), StoreError>;
    fn put_liquidation(&mut self, liquidation: Liquidation) -> Result<(), StoreError>;

    fn candle(&self, key: &CandleKey) -> Result<Option<Candle>, StoreError>;
    fn put_candle(&mut self, candle: Candle) -> Result<(), StoreError>;

    fn latest_candle(&self) -> Result<Option<LatestCandle>, StoreError>;
    fn put_latest_candle(&mut self, latest: LatestCandle) -> Result<(), StoreError>;

    fn checkpoint(&self) -> Result<Option<LogPosition>, StoreError>;
    fn put_checkpoint(&mut self, position: LogPosition) -> Result<(), StoreError>;
}

// 7.2: in-memory store. ledger collections use BTreeMap so iteration comes
// back in (tx hash, log index) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    orders: HashMap<OrderId, Order>,
    trades: BTreeMap<EventId, Trade>,
    positions: HashMap<Address, Position>,
    margin_events: BTreeMap<EventId, MarginEvent>,
    funding_events: BTreeMap<EventId, FundingEvent>,
    liquidations: BTreeMap<EventId, Liquidation>,
    candles: BTreeMap<CandleKey, Candle>,
    latest_candle: Option<LatestCandle>,
    checkpoint: Option<LogPosition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // 7.3: downstream query views. open orders filter on amount, not status:
    // closed orders have amount forced to zero, so `amount != 0` is exactly
    // the open set.
    pub fn open_orders(&self) -> Vec<&Order> {
        let mut open: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| !o.amount.is_zero())
            .collect();
        open.sort_by_key(|o| o.id);
        open
    }

    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.values()
    }

    pub fn margin_events(&self) -> impl Iterator<Item = &MarginEvent> {
        self.margin_events.values()
    }

    pub fn funding_events(&self) -> impl Iterator<Item = &FundingEvent> {
        self.funding_events.values()
    }

    pub fn liquidations(&self) -> impl Iterator<Item = &Liquidation> {
        self.liquidations.values()
    }

    /// Candle series for one resolution, ascending by bucket start.
    pub fn candles(&self, resolution: Resolution) -> impl Iterator<Item = &Candle> {
        self.candles
            .values()
            .filter(move |c| c.resolution == resolution)
    }
}

impl ProjectionStore for MemoryStore {
    fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.get(&id).cloned())
    }

    fn put_order(&mut self, order: Order) -> Result<(), StoreError> {
        self.orders.insert(order.id, order);
        Ok(())
    }

    fn trade(&self, id: &EventId) -> Result<Option<Trade>, StoreError> {
        Ok(self.trades.get(id).cloned())
    }

    fn put_trade(&mut self, trade: Trade) -> Result<(), StoreError> {
        self.trades.insert(trade.id.clone(), trade);
        Ok(())
    }

    fn position(&self, trader: &Address) -> Result<Option<Position>, StoreError> {
        Ok(self.positions.get(trader).cloned())
    }

    fn put_position(&mut self, position: Position) -> Result<(), StoreError> {
        self.positions.insert(position.trader.clone(), position);
        Ok(())
    }

    fn put_margin_event(&mut self, event: MarginEvent) -> Result<(), StoreError> {
        self.margin_events.insert(event.id.clone(), event);
        Ok(())
    }

    fn put_funding_event(&mut self, event: FundingEvent) -> Result<(), StoreError> {
        self.funding_events.insert(event.id.clone(), event);
        Ok(())
    }

    fn put_liquidation(&mut self, liquidation: Liquidation) -> Result<(), StoreError> {
        self.liquidations.insert(liquidation.id.clone(), liquidation);
        Ok(())
    }

    fn candle(&self, key: &CandleKey) -> Result<Option<Candle>, StoreError> {
        Ok(self.candles.get(key).cloned())
    }

    fn put_candle(&mut self, candle: Candle) -> Result<(), StoreError> {
        self.candles.insert(candle.key(), candle);
        Ok(())
    }

    fn latest_candle(&self) -> Result<Option<LatestCandle>, StoreError> {
        Ok(self.latest_candle.clone())
    }

    fn put_latest_candle(&mut self, latest: LatestCandle) -> Result<(), StoreError> {
        self.latest_candle = Some(latest);
        Ok(())
    }

    fn checkpoint(&self) -> Result<Option<LogPosition>, StoreError> {
        Ok(self.checkpoint)
    }

    fn put_checkpoint(&mut self, position: LogPosition) -> Result<(), StoreError> {
        self.checkpoint = Some(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Amount, Price, Timestamp};
    use rust_decimal_macros::dec;

    fn order(id: u64, amount: rust_decimal::Decimal) -> Order {
        Order::open(
            OrderId(id),
            Address::new_unchecked("0xa"),
            true,
            Price::new_unchecked(dec!(100)),
            Amount::new_unchecked(amount),
            Timestamp::from_secs(0),
        )
    }

    #[test]
    fn open_order_filter_excludes_zero_amount() {
        let mut store = MemoryStore::new();
        store.put_order(order(1, dec!(10))).unwrap();
        store.put_order(order(2, dec!(5)).close()).unwrap();
        store
            .put_order(
                order(3, dec!(4))
                    .apply_fill(Amount::new_unchecked(dec!(4)))
                    .unwrap(),
            )
            .unwrap();

        let open: Vec<OrderId> = store.open_orders().iter().map(|o| o.id).collect();
        assert_eq!(open, vec![OrderId(1)]);
    }

    #[test]
    fn put_order_is_full_replace() {
        let mut store = MemoryStore::new();
        store.put_order(order(1, dec!(10))).unwrap();
        store.put_order(order(1, dec!(7))).unwrap();

        let stored = store.order(OrderId(1)).unwrap().unwrap();
        assert_eq!(stored.amount.value(), dec!(7));
    }
}
