// perps-indexer: settlement-event projection engine for an on-chain
// perpetual futures exchange.
// the engine is a deterministic fold: (priorState, event) -> newState, applied
// in (block, log index) order, idempotent under at-least-once redelivery.
// all computation is in-memory plus store reads/writes; no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Address, TxHash, OrderId, EventId, LogPosition,
//        Timestamp, Price, Amount, SignedSize
//   2.x  events.rs: typed settlement events consumed from the exchange log
//   3.x  order.rs / trade.rs: order lifecycle entity + append-only trade rows
//   4.x  position.rs: per-trader position, liquidation netting rule
//   5.x  margin.rs / funding.rs / liquidation.rs: append-only ledger rows
//   6.x  candle.rs: 60-second OHLCV bucketing + LatestCandle pointer
//   7.x  store.rs: entity store contract + in-memory reference store
//   8.x  config.rs: host configuration, address + capability validation
//   9.x  engine/: the projection itself: one handler per event type

// derived entities
pub mod candle;
pub mod funding;
pub mod liquidation;
pub mod margin;
pub mod order;
pub mod position;
pub mod trade;
pub mod types;

// input and machinery
pub mod config;
pub mod engine;
pub mod events;
pub mod store;

// re exports for convenience
pub use candle::*;
pub use engine::*;
pub use events::*;
pub use funding::*;
pub use liquidation::*;
pub use margin::*;
pub use order::*;
pub use position::*;
pub use store::*;
pub use trade::*;
pub use types::*;
pub use config::{ConfigError, IndexerConfig, validate_capabilities, REQUIRED_EVENTS};
