//! Liquidation handler: ledger row plus position netting.

use super::core::Projection;
use super::results::ProjectionError;
use crate::events::{EventMeta, Liquidated};
use crate::liquidation::Liquidation;
use crate::store::ProjectionStore;
use tracing::debug;

impl<S: ProjectionStore> Projection<S> {
    pub(super) fn on_liquidated(
        &mut self,
        meta: &EventMeta,
        params: &Liquidated,
    ) -> Result<(), ProjectionError> {
        self.store.put_liquidation(Liquidation {
            id: meta.ledger_id(),
            trader: params.trader.clone(),
            liquidator: params.liquidator.clone(),
            amount: params.amount,
            fee: params.fee,
            timestamp: meta.timestamp,
            tx_hash: meta.tx_hash.clone(),
        })?;

        // magnitude reduction clamped at zero; a missing position means the
        // liquidation predates observed history and only the row is kept.
        match self.store.position(&params.trader)? {
            Some(position) => {
                self.store.put_position(position.liquidate(params.amount))?;
            }
            None => {
                debug!(trader = %params.trader, "liquidation for unknown position, row kept");
            }
        }
        Ok(())
    }
}
