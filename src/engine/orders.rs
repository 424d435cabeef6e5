//! Order placement and removal handlers.

use super::core::Projection;
use super::results::ProjectionError;
use crate::events::{EventMeta, OrderPlaced, OrderRemoved};
use crate::order::Order;
use crate::store::ProjectionStore;
use tracing::{debug, warn};

impl<S: ProjectionStore> Projection<S> {
    pub(super) fn on_order_placed(
        &mut self,
        meta: &EventMeta,
        params: &OrderPlaced,
    ) -> Result<(), ProjectionError> {
        let order = Order::open(
            params.id,
            params.trader.clone(),
            params.is_buy,
            params.price,
            params.amount,
            meta.timestamp,
        );
        self.store.put_order(order)?;
        Ok(())
    }

    /// Removal of an unknown order is a no-op: the id may reference state
    /// outside the observed history. Closed orders are immutable, so a
    /// removal landing on one is skipped too.
    pub(super) fn on_order_removed(
        &mut self,
        _meta: &EventMeta,
        params: &OrderRemoved,
    ) -> Result<(), ProjectionError> {
        let Some(order) = self.store.order(params.id)? else {
            debug!(order_id = %params.id, "removal of unknown order ignored");
            return Ok(());
        };
        if !order.is_open() {
            warn!(order_id = %params.id, status = ?order.status, "removal of closed order ignored");
            return Ok(());
        }
        self.store.put_order(order.close())?;
        Ok(())
    }
}
