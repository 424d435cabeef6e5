// 6.0: OHLCV candle aggregation. trades are bucketed by flooring their block
// timestamp to the resolution width; the bucket a trade lands in is a pure
// function of its timestamp, never of arrival order. a bucket's open price is
// seeded from the LatestCandle pointer (the previous close), so candles chain
// even across empty minutes.

use crate::types::{Amount, Price, Timestamp};
use serde::{Deserialize, Serialize};

// 6.1: bucket width in seconds. the engine maintains one resolution; a
// multi-resolution deployment runs one state machine per resolution with no
// cross-resolution coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resolution(u32);

impl Resolution {
    pub const ONE_MINUTE: Resolution = Resolution(60);

    pub fn new(secs: u32) -> Option<Self> {
        if secs > 0 {
            Some(Self(secs))
        } else {
            None
        }
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// Floor a timestamp to the start of its bucket.
    pub fn bucket_start(&self, ts: Timestamp) -> Timestamp {
        let width = i64::from(self.0);
        Timestamp::from_secs(ts.as_secs().div_euclid(width) * width)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// 6.2: candle collection key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandleKey {
    pub resolution: Resolution,
    pub bucket_start: Timestamp,
}

impl CandleKey {
    pub fn for_trade(resolution: Resolution, trade_ts: Timestamp) -> Self {
        Self {
            resolution,
            bucket_start: resolution.bucket_start(trade_ts),
        }
    }
}

// 6.3: one OHLCV bucket. mutated in place while its bucket is current,
// immutable once a later trade opens a newer bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub resolution: Resolution,
    pub bucket_start: Timestamp,
    pub open_price: Price,
    pub high_price: Price,
    pub low_price: Price,
    pub close_price: Price,
    pub volume: Amount,
}

impl Candle {
    /// First trade of a bucket. `open_price` is the previous bucket's close
    /// (from the LatestCandle pointer) or the trade's own price for the very
    /// first trade in history.
    pub fn open_bucket(
        key: CandleKey,
        open_price: Price,
        trade_price: Price,
        trade_amount: Amount,
    ) -> Self {
        Self {
            resolution: key.resolution,
            bucket_start: key.bucket_start,
            open_price,
            high_price: open_price.max(trade_price),
            low_price: open_price.min(trade_price),
            close_price: trade_price,
            volume: trade_amount,
        }
    }

    pub fn key(&self) -> CandleKey {
        CandleKey {
            resolution: self.resolution,
            bucket_start: self.bucket_start,
        }
    }

    /// Fold another trade of the same bucket into the candle.
    #[must_use]
    pub fn absorb(&self, trade_price: Price, trade_amount: Amount) -> Candle {
        Candle {
            high_price: self.high_price.max(trade_price),
            low_price: self.low_price.min(trade_price),
            close_price: trade_price,
            volume: self.volume.add(trade_amount),
            ..self.clone()
        }
    }

    /// High/low must bracket open and close. A stored candle failing this is
    /// corrupt and must be surfaced, not repaired.
    pub fn bounds_ok(&self) -> bool {
        self.high_price >= self.open_price.max(self.close_price)
            && self.low_price <= self.open_price.min(self.close_price)
    }
}

// 6.4: singleton pointer to the most recent trade's close. only ever
// overwritten; its sole purpose is seeding the next bucket's open price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCandle {
    pub close_price: Price,
    pub timestamp: Timestamp,
}
