//! Margin deposit and withdrawal handlers.
//!
//! Pure appends: one ledger row per event, no reads, no interaction with any
//! other entity. The deterministic row id makes replay a same-content
//! overwrite.

use super::core::Projection;
use super::results::ProjectionError;
use crate::events::{EventMeta, MarginDeposited, MarginWithdrawn};
use crate::margin::{MarginAction, MarginEvent};
use crate::store::ProjectionStore;
use crate::types::{Address, Amount};

impl<S: ProjectionStore> Projection<S> {
    pub(super) fn on_margin_deposited(
        &mut self,
        meta: &EventMeta,
        params: &MarginDeposited,
    ) -> Result<(), ProjectionError> {
        self.append_margin_event(meta, &params.trader, params.amount, MarginAction::Deposit)
    }

    pub(super) fn on_margin_withdrawn(
        &mut self,
        meta: &EventMeta,
        params: &MarginWithdrawn,
    ) -> Result<(), ProjectionError> {
        self.append_margin_event(meta, &params.trader, params.amount, MarginAction::Withdraw)
    }

    fn append_margin_event(
        &mut self,
        meta: &EventMeta,
        trader: &Address,
        amount: Amount,
        action: MarginAction,
    ) -> Result<(), ProjectionError> {
        self.store.put_margin_event(MarginEvent {
            id: meta.ledger_id(),
            trader: trader.clone(),
            amount,
            action,
            timestamp: meta.timestamp,
            tx_hash: meta.tx_hash.clone(),
        })?;
        Ok(())
    }
}
