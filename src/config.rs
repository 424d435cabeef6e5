// 8.0: host-side configuration. built exactly once at startup and handed to
// the pipeline; projection logic never reads ambient globals or environment
// variables. address shape and event-source capabilities are validated here,
// up front, so failures are typed errors instead of call-time surprises.

use crate::types::Address;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("environment variable {0} is not a valid integer")]
    InvalidVar(&'static str),

    #[error("invalid exchange address: {0}")]
    InvalidAddress(String),

    #[error("event source does not expose required event {0}")]
    MissingCapability(&'static str),
}

// 8.1: everything the host needs to wire the pipeline to one exchange
// deployment. independent deployments get independent configs; their entity
// keyspaces never intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub rpc_url: String,
    pub exchange_address: Address,
    pub start_block: u64,
}

impl IndexerConfig {
    pub fn new(rpc_url: impl Into<String>, exchange_address: Address, start_block: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            exchange_address,
            start_block,
        }
    }

    /// Read `RPC_URL`, `EXCHANGE_ADDRESS` and `START_BLOCK` once. The host
    /// calls this at process start; nothing else touches the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url =
            env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());

        let raw_address =
            env::var("EXCHANGE_ADDRESS").map_err(|_| ConfigError::MissingVar("EXCHANGE_ADDRESS"))?;
        let exchange_address =
            Address::parse(&raw_address).ok_or(ConfigError::InvalidAddress(raw_address))?;

        let start_block = match env::var("START_BLOCK") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidVar("START_BLOCK"))?,
            Err(_) => 0,
        };

        Ok(Self {
            rpc_url,
            exchange_address,
            start_block,
        })
    }
}

// 8.2: the contract events the projection cannot run without. validated once
// against what the host's decoder advertises; a missing event is a startup
// error, never a call-time shape check.
pub const REQUIRED_EVENTS: [&str; 9] = [
    "MarginDeposited",
    "MarginWithdrawn",
    "OrderPlaced",
    "OrderRemoved",
    "TradeExecuted",
    "PositionUpdated",
    "FundingUpdated",
    "FundingPaid",
    "Liquidated",
];

pub fn validate_capabilities<S: AsRef<str>>(advertised: &[S]) -> Result<(), ConfigError> {
    for required in REQUIRED_EVENTS {
        if !advertised.iter().any(|a| a.as_ref() == required) {
            return Err(ConfigError::MissingCapability(required));
        }
    }
    Ok(())
}
