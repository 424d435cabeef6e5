//! Projection engine configuration options.

use crate::candle::Resolution;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Candle bucket width maintained by this engine instance.
    pub resolution: Resolution,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::ONE_MINUTE,
        }
    }
}
