// 9.0 engine/core.rs: the projection engine. one instance per exchange
// deployment, strictly sequential: an event is fully applied (all reads and
// writes done) before the next begins. deterministic fold, no external I/O of
// its own; all state goes through the injected store.

use super::config::EngineConfig;
use super::results::{ApplyOutcome, ProjectionError};
use crate::events::{ExchangeEvent, ExchangePayload};
use crate::store::ProjectionStore;
use crate::types::LogPosition;
use tracing::debug;

// 9.1: engine struct. the cursor is the exactly-once guard: it is restored
// from the store's checkpoint at construction and advanced (and persisted)
// after every applied event, so redeliveries at or behind it are no-ops both
// in memory and across restarts.
#[derive(Debug)]
pub struct Projection<S: ProjectionStore> {
    pub(super) config: EngineConfig,
    pub(super) store: S,
    pub(super) cursor: Option<LogPosition>,
}

impl<S: ProjectionStore> Projection<S> {
    pub fn new(config: EngineConfig, store: S) -> Result<Self, ProjectionError> {
        let cursor = store.checkpoint()?;
        Ok(Self {
            config,
            store,
            cursor,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Log position of the last applied event, if any.
    pub fn cursor(&self) -> Option<LogPosition> {
        self.cursor
    }

    // 9.2: the reducer. (priorState, event) -> newState, exactly once per
    // distinct log position.
    pub fn apply(&mut self, event: &ExchangeEvent) -> Result<ApplyOutcome, ProjectionError> {
        let position = event.meta.position();
        if let Some(cursor) = self.cursor {
            if position <= cursor {
                debug!(%position, %cursor, "replayed event skipped");
                return Ok(ApplyOutcome::Replayed);
            }
        }

        let meta = &event.meta;
        match &event.payload {
            ExchangePayload::MarginDeposited(p) => self.on_margin_deposited(meta, p)?,
            ExchangePayload::MarginWithdrawn(p) => self.on_margin_withdrawn(meta, p)?,
            ExchangePayload::OrderPlaced(p) => self.on_order_placed(meta, p)?,
            ExchangePayload::OrderRemoved(p) => self.on_order_removed(meta, p)?,
            ExchangePayload::TradeExecuted(p) => self.on_trade_executed(meta, p)?,
            ExchangePayload::PositionUpdated(p) => self.on_position_updated(meta, p)?,
            ExchangePayload::FundingUpdated(p) => self.on_funding_updated(meta, p)?,
            ExchangePayload::FundingPaid(p) => self.on_funding_paid(meta, p)?,
            ExchangePayload::Liquidated(p) => self.on_liquidated(meta, p)?,
        }

        self.cursor = Some(position);
        self.store.put_checkpoint(position)?;
        Ok(ApplyOutcome::Applied)
    }

    /// Apply an ordered batch. Returns how many events actually advanced the
    /// projection (replays are skipped, not counted).
    pub fn apply_batch(&mut self, events: &[ExchangeEvent]) -> Result<usize, ProjectionError> {
        let mut applied = 0;
        for event in events {
            if self.apply(event)? == ApplyOutcome::Applied {
                applied += 1;
            }
        }
        Ok(applied)
    }
}
