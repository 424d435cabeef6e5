//! Position update and funding handlers.

use super::core::Projection;
use super::results::ProjectionError;
use crate::events::{EventMeta, FundingPaid, FundingUpdated, PositionUpdated};
use crate::funding::{FundingDetail, FundingEvent};
use crate::position::Position;
use crate::store::ProjectionStore;

impl<S: ProjectionStore> Projection<S> {
    /// Last-write-wins overwrite of the trader's position; no merge with
    /// prior state.
    pub(super) fn on_position_updated(
        &mut self,
        _meta: &EventMeta,
        params: &PositionUpdated,
    ) -> Result<(), ProjectionError> {
        self.store.put_position(Position::new(
            params.trader.clone(),
            params.size,
            params.entry_price,
        ))?;
        Ok(())
    }

    pub(super) fn on_funding_updated(
        &mut self,
        meta: &EventMeta,
        params: &FundingUpdated,
    ) -> Result<(), ProjectionError> {
        self.store.put_funding_event(FundingEvent {
            id: meta.ledger_id(),
            timestamp: meta.timestamp,
            detail: FundingDetail::GlobalUpdate {
                cumulative_rate: params.cumulative_rate,
            },
        })?;
        Ok(())
    }

    /// Funding payments are ledger rows only; they do not touch Position.
    pub(super) fn on_funding_paid(
        &mut self,
        meta: &EventMeta,
        params: &FundingPaid,
    ) -> Result<(), ProjectionError> {
        self.store.put_funding_event(FundingEvent {
            id: meta.ledger_id(),
            timestamp: meta.timestamp,
            detail: FundingDetail::UserPaid {
                trader: params.trader.clone(),
                payment: params.payment,
            },
        })?;
        Ok(())
    }
}
