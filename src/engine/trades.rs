//! Trade execution handler: trade row, candle aggregation, and the remaining
//! amounts of both counter-orders.

use super::core::Projection;
use super::results::ProjectionError;
use crate::candle::{Candle, CandleKey, LatestCandle};
use crate::events::{EventMeta, TradeExecuted};
use crate::order::Order;
use crate::store::ProjectionStore;
use crate::trade::Trade;
use crate::types::{Amount, OrderId, Price, Timestamp};
use tracing::{debug, warn};

impl<S: ProjectionStore> Projection<S> {
    // all reads and fallible arithmetic happen before the first write: a
    // consistency fault or store failure partway through must leave no
    // partial state, so host re-delivery of the same event cannot
    // double-count candle volume or order decrements.
    pub(super) fn on_trade_executed(
        &mut self,
        meta: &EventMeta,
        params: &TradeExecuted,
    ) -> Result<(), ProjectionError> {
        let buy_order = self.settled_order(params.buy_order_id, params.amount)?;
        let sell_order = self.settled_order(params.sell_order_id, params.amount)?;
        let (candle, latest) = self.next_candle(meta.timestamp, params.price, params.amount)?;

        // a trade is recorded even when a counter-order is unknown; only the
        // dependent order mutation is skipped.
        self.store.put_trade(Trade {
            id: meta.ledger_id(),
            buyer: params.buyer.clone(),
            seller: params.seller.clone(),
            price: params.price,
            amount: params.amount,
            timestamp: meta.timestamp,
            tx_hash: meta.tx_hash.clone(),
            buy_order_id: params.buy_order_id,
            sell_order_id: params.sell_order_id,
        })?;
        self.store.put_candle(candle)?;
        self.store.put_latest_candle(latest)?;
        if let Some(order) = buy_order {
            self.store.put_order(order)?;
        }
        if let Some(order) = sell_order {
            self.store.put_order(order)?;
        }
        Ok(())
    }

    // 9.3: candle state machine. bucket selection is a pure function of the
    // trade timestamp. a fresh bucket opens at the previous close taken from
    // the LatestCandle pointer; the pointer itself is overwritten after every
    // trade regardless of which bucket the trade landed in. read-only: the
    // caller performs the writes once the whole event is known good.
    fn next_candle(
        &self,
        trade_ts: Timestamp,
        price: Price,
        amount: Amount,
    ) -> Result<(Candle, LatestCandle), ProjectionError> {
        let key = CandleKey::for_trade(self.config.resolution, trade_ts);

        let candle = match self.store.candle(&key)? {
            Some(existing) => {
                if !existing.bounds_ok() {
                    return Err(ProjectionError::CandleInvariant { key });
                }
                existing.absorb(price, amount)
            }
            None => {
                let open = self
                    .store
                    .latest_candle()?
                    .map(|latest| latest.close_price)
                    .unwrap_or(price);
                Candle::open_bucket(key, open, price, amount)
            }
        };
        let latest = LatestCandle {
            close_price: price,
            timestamp: trade_ts,
        };
        Ok((candle, latest))
    }

    /// Compute one side's decremented order without writing it. Unknown
    /// orders are skipped (already removed, or outside observed history). A
    /// nonzero fill against any order that cannot absorb it — closed orders
    /// hold amount zero — is a negative remaining amount: a consistency
    /// fault, never a clamp or a silent skip.
    fn settled_order(
        &self,
        order_id: OrderId,
        fill: Amount,
    ) -> Result<Option<Order>, ProjectionError> {
        let Some(order) = self.store.order(order_id)? else {
            debug!(%order_id, "trade references unknown order, skipping");
            return Ok(None);
        };
        if !order.is_open() {
            if fill.is_zero() {
                warn!(%order_id, status = ?order.status, "zero fill on closed order, skipping");
                return Ok(None);
            }
            return Err(ProjectionError::NegativeRemaining {
                order_id,
                remaining: order.amount,
                fill,
            });
        }
        let remaining = order.amount;
        let updated = order
            .apply_fill(fill)
            .ok_or(ProjectionError::NegativeRemaining {
                order_id,
                remaining,
                fill,
            })?;
        Ok(Some(updated))
    }
}
