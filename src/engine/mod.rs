// 9.0: the projection engine. folds typed settlement events into derived
// entities, one event at a time, in (block, log index) order. deterministic
// and idempotent under exact redelivery.

mod config;
mod core;
mod liquidations;
mod margin;
mod orders;
mod positions;
mod results;
mod trades;

pub use config::EngineConfig;
pub use core::Projection;
pub use results::{ApplyOutcome, ProjectionError};
