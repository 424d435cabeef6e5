//! End-to-end projection scenarios: scripted event logs applied in order,
//! derived state asserted afterwards.

use perps_indexer::*;
use rust_decimal_macros::dec;

fn addr(name: &str) -> Address {
    Address::new_unchecked(name)
}

fn price(v: rust_decimal::Decimal) -> Price {
    Price::new_unchecked(v)
}

fn amt(v: rust_decimal::Decimal) -> Amount {
    Amount::new_unchecked(v)
}

/// Builds events with strictly increasing (block, log index) positions.
struct EventLog {
    block: u64,
    log_index: u32,
}

impl EventLog {
    fn new() -> Self {
        Self {
            block: 0,
            log_index: 0,
        }
    }

    fn next(&mut self, timestamp: i64, payload: ExchangePayload) -> ExchangeEvent {
        self.log_index += 1;
        ExchangeEvent::new(
            EventMeta::new(
                self.block,
                self.log_index,
                TxHash::new(format!("0xtx-{}-{}", self.block, self.log_index)),
                Timestamp::from_secs(timestamp),
            ),
            payload,
        )
    }

    fn next_block(&mut self) {
        self.block += 1;
        self.log_index = 0;
    }
}

fn place_order(id: u64, trader: &str, is_buy: bool, p: rust_decimal::Decimal, a: rust_decimal::Decimal) -> ExchangePayload {
    ExchangePayload::OrderPlaced(OrderPlaced {
        id: OrderId(id),
        trader: addr(trader),
        is_buy,
        price: price(p),
        amount: amt(a),
    })
}

fn trade(buy: u64, sell: u64, p: rust_decimal::Decimal, a: rust_decimal::Decimal) -> ExchangePayload {
    ExchangePayload::TradeExecuted(TradeExecuted {
        buyer: addr("0xbuyer"),
        seller: addr("0xseller"),
        buy_order_id: OrderId(buy),
        sell_order_id: OrderId(sell),
        price: price(p),
        amount: amt(a),
    })
}

fn new_projection() -> Projection<MemoryStore> {
    Projection::new(EngineConfig::default(), MemoryStore::new()).unwrap()
}

#[test]
fn full_fill_scenario() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10))),
        log.next(1_000, place_order(2, "0xbob", false, dec!(100), dec!(10))),
        log.next(1_000, trade(1, 2, dec!(100), dec!(10))),
    ];
    assert_eq!(projection.apply_batch(&events).unwrap(), 3);

    let store = projection.store();
    for id in [OrderId(1), OrderId(2)] {
        let order = store.order(id).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.amount.is_zero());
        assert_eq!(order.initial_amount, amt(dec!(10)));
    }
    assert_eq!(store.trades().count(), 1);

    let key = CandleKey::for_trade(Resolution::ONE_MINUTE, Timestamp::from_secs(1_000));
    let candle = store.candle(&key).unwrap().unwrap();
    assert_eq!(candle.bucket_start.as_secs(), 960);
    assert_eq!(candle.open_price, price(dec!(100)));
    assert_eq!(candle.high_price, price(dec!(100)));
    assert_eq!(candle.low_price, price(dec!(100)));
    assert_eq!(candle.close_price, price(dec!(100)));
    assert_eq!(candle.volume, amt(dec!(10)));
}

#[test]
fn partial_fills_conserve_initial_amount() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let mut events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10))),
        log.next(1_000, place_order(2, "0xbob", false, dec!(100), dec!(20))),
    ];
    for fill in [dec!(4), dec!(3), dec!(3)] {
        log.next_block();
        events.push(log.next(1_000, trade(1, 2, dec!(100), fill)));
    }
    projection.apply_batch(&events).unwrap();

    let store = projection.store();
    let buy = store.order(OrderId(1)).unwrap().unwrap();
    assert_eq!(buy.status, OrderStatus::Filled);
    assert!(buy.amount.is_zero());

    let sell = store.order(OrderId(2)).unwrap().unwrap();
    assert_eq!(sell.status, OrderStatus::Open);
    assert_eq!(sell.amount, amt(dec!(10)));

    // consumed + remaining = initial
    let consumed: rust_decimal::Decimal = store.trades().map(|t| t.amount.value()).sum();
    assert_eq!(consumed + sell.amount.value(), sell.initial_amount.value());
}

#[test]
fn overfill_surfaces_negative_remaining() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    projection
        .apply(&log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(5))))
        .unwrap();
    let err = projection
        .apply(&log.next(1_000, trade(1, 99, dec!(100), dec!(6))))
        .unwrap_err();

    assert!(matches!(
        err,
        ProjectionError::NegativeRemaining {
            order_id: OrderId(1),
            ..
        }
    ));
}

#[test]
fn trade_with_unknown_orders_still_recorded() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    projection
        .apply(&log.next(1_000, trade(7, 8, dec!(50), dec!(2))))
        .unwrap();

    let store = projection.store();
    assert_eq!(store.trades().count(), 1);
    assert!(store.order(OrderId(7)).unwrap().is_none());
    assert!(store.order(OrderId(8)).unwrap().is_none());
}

#[test]
fn removal_of_unknown_order_is_noop() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let outcome = projection
        .apply(&log.next(1_000, ExchangePayload::OrderRemoved(OrderRemoved { id: OrderId(42) })))
        .unwrap();

    assert_eq!(outcome, ApplyOutcome::Applied);
    assert!(projection.store().order(OrderId(42)).unwrap().is_none());
}

#[test]
fn cancelled_order_zeroed_and_excluded_from_open_view() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10))),
        log.next(1_010, ExchangePayload::OrderRemoved(OrderRemoved { id: OrderId(1) })),
    ];
    projection.apply_batch(&events).unwrap();

    let store = projection.store();
    let order = store.order(OrderId(1)).unwrap().unwrap();
    // status keeps the lifecycle distinction; amount zeroing is only the
    // open-order filter convenience.
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.amount.is_zero());
    assert!(store.open_orders().is_empty());
}

#[test]
fn fill_after_removal_is_a_consistency_fault() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10))),
        log.next(1_010, ExchangePayload::OrderRemoved(OrderRemoved { id: OrderId(1) })),
    ];
    projection.apply_batch(&events).unwrap();

    // a closed order holds amount zero, so any nonzero fill against it is a
    // negative remaining amount and must surface, not pass silently
    let err = projection
        .apply(&log.next(1_020, trade(1, 99, dec!(100), dec!(3))))
        .unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::NegativeRemaining {
            order_id: OrderId(1),
            ..
        }
    ));

    let store = projection.store();
    let order = store.order(OrderId(1)).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.amount.is_zero());
    // the faulted event committed nothing
    assert_eq!(store.trades().count(), 0);
}

#[test]
fn zero_fill_on_closed_order_is_skipped() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10))),
        log.next(1_010, ExchangePayload::OrderRemoved(OrderRemoved { id: OrderId(1) })),
        log.next(1_020, trade(1, 99, dec!(100), dec!(0))),
    ];
    projection.apply_batch(&events).unwrap();

    let store = projection.store();
    let order = store.order(OrderId(1)).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.amount.is_zero());
    assert_eq!(store.trades().count(), 1);
}

#[test]
fn failed_trade_commits_nothing_and_redelivery_does_not_double_count() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(5))),
        log.next(1_000, trade(1, 99, dec!(100), dec!(2))),
    ];
    projection.apply_batch(&events).unwrap();

    let key = CandleKey::for_trade(Resolution::ONE_MINUTE, Timestamp::from_secs(1_000));
    let volume_before = projection.store().candle(&key).unwrap().unwrap().volume;
    assert_eq!(volume_before, amt(dec!(2)));
    let cursor_before = projection.cursor();

    // fill of 9 exceeds the remaining 3: the event faults before any write
    let overfill = log.next(1_000, trade(1, 99, dec!(100), dec!(9)));
    let err = projection.apply(&overfill).unwrap_err();
    assert!(matches!(err, ProjectionError::NegativeRemaining { .. }));

    let store = projection.store();
    assert_eq!(store.candle(&key).unwrap().unwrap().volume, volume_before);
    assert_eq!(store.trades().count(), 1);
    assert_eq!(store.order(OrderId(1)).unwrap().unwrap().amount, amt(dec!(3)));
    assert_eq!(projection.cursor(), cursor_before);

    // host re-delivery of the identical event after recovery: same fault,
    // still no partial state, candle volume never double-counts
    let err = projection.apply(&overfill).unwrap_err();
    assert!(matches!(err, ProjectionError::NegativeRemaining { .. }));
    let store = projection.store();
    assert_eq!(store.candle(&key).unwrap().unwrap().volume, amt(dec!(2)));
    assert_eq!(store.order(OrderId(1)).unwrap().unwrap().amount, amt(dec!(3)));
}

#[test]
fn candle_opens_at_previous_close() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    // first trade in history opens at its own price
    projection
        .apply(&log.next(1_000, trade(1, 2, dec!(100), dec!(1))))
        .unwrap();
    log.next_block();
    projection
        .apply(&log.next(1_010, trade(1, 2, dec!(120), dec!(2))))
        .unwrap();
    // next bucket opens at 120, the previous close
    log.next_block();
    projection
        .apply(&log.next(1_070, trade(1, 2, dec!(90), dec!(4))))
        .unwrap();

    let store = projection.store();
    let first = store
        .candle(&CandleKey::for_trade(Resolution::ONE_MINUTE, Timestamp::from_secs(1_000)))
        .unwrap()
        .unwrap();
    assert_eq!(first.open_price, price(dec!(100)));
    assert_eq!(first.high_price, price(dec!(120)));
    assert_eq!(first.low_price, price(dec!(100)));
    assert_eq!(first.close_price, price(dec!(120)));
    assert_eq!(first.volume, amt(dec!(3)));

    let second = store
        .candle(&CandleKey::for_trade(Resolution::ONE_MINUTE, Timestamp::from_secs(1_070)))
        .unwrap()
        .unwrap();
    assert_eq!(second.open_price, price(dec!(120)));
    assert_eq!(second.high_price, price(dec!(120)));
    assert_eq!(second.low_price, price(dec!(90)));
    assert_eq!(second.close_price, price(dec!(90)));
    assert_eq!(second.volume, amt(dec!(4)));

    let latest = store.latest_candle().unwrap().unwrap();
    assert_eq!(latest.close_price, price(dec!(90)));
    assert_eq!(latest.timestamp.as_secs(), 1_070);
}

#[test]
fn duplicate_event_is_replayed_not_reapplied() {
    let mut events = EventLog::new();
    let placed = events.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10)));
    let fill = events.next(1_000, trade(1, 99, dec!(100), dec!(4)));

    let mut once = new_projection();
    once.apply(&placed).unwrap();
    once.apply(&fill).unwrap();

    let mut twice = new_projection();
    twice.apply(&placed).unwrap();
    twice.apply(&fill).unwrap();
    assert_eq!(twice.apply(&fill).unwrap(), ApplyOutcome::Replayed);
    assert_eq!(twice.apply(&placed).unwrap(), ApplyOutcome::Replayed);

    assert_eq!(once.into_store(), twice.into_store());
}

#[test]
fn checkpoint_survives_engine_restart() {
    let mut events = EventLog::new();
    let placed = events.next(1_000, place_order(1, "0xalice", true, dec!(100), dec!(10)));
    let fill = events.next(1_000, trade(1, 99, dec!(100), dec!(4)));

    let mut projection = new_projection();
    projection.apply(&placed).unwrap();
    projection.apply(&fill).unwrap();
    let store = projection.into_store();

    // re-delivery from the start of the log after a restart must be a no-op
    let mut restarted = Projection::new(EngineConfig::default(), store).unwrap();
    assert_eq!(restarted.cursor(), Some(LogPosition::new(0, 2)));
    assert_eq!(restarted.apply(&placed).unwrap(), ApplyOutcome::Replayed);
    assert_eq!(restarted.apply(&fill).unwrap(), ApplyOutcome::Replayed);

    let order = restarted.store().order(OrderId(1)).unwrap().unwrap();
    assert_eq!(order.amount, amt(dec!(6)));
}

#[test]
fn margin_events_append_ledger_rows() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(
            1_000,
            ExchangePayload::MarginDeposited(MarginDeposited {
                trader: addr("0xalice"),
                amount: amt(dec!(500)),
            }),
        ),
        log.next(
            1_050,
            ExchangePayload::MarginWithdrawn(MarginWithdrawn {
                trader: addr("0xalice"),
                amount: amt(dec!(200)),
            }),
        ),
    ];
    projection.apply_batch(&events).unwrap();

    let rows: Vec<&MarginEvent> = projection.store().margin_events().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].action, MarginAction::Deposit);
    assert_eq!(rows[0].amount, amt(dec!(500)));
    assert_eq!(rows[1].action, MarginAction::Withdraw);
    assert_eq!(rows[1].amount, amt(dec!(200)));
}

#[test]
fn funding_rows_carry_exactly_one_payload() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(
            1_000,
            ExchangePayload::FundingUpdated(FundingUpdated {
                cumulative_rate: dec!(0.0075),
            }),
        ),
        log.next(
            1_000,
            ExchangePayload::FundingPaid(FundingPaid {
                trader: addr("0xalice"),
                payment: amt(dec!(12)),
            }),
        ),
    ];
    projection.apply_batch(&events).unwrap();

    let rows: Vec<&FundingEvent> = projection.store().funding_events().collect();
    assert_eq!(rows.len(), 2);
    assert!(matches!(
        rows[0].detail,
        FundingDetail::GlobalUpdate { cumulative_rate } if cumulative_rate == dec!(0.0075)
    ));
    assert!(matches!(
        &rows[1].detail,
        FundingDetail::UserPaid { trader, payment }
            if *trader == addr("0xalice") && *payment == amt(dec!(12))
    ));
}

#[test]
fn liquidation_reduces_long_toward_zero() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(
            1_000,
            ExchangePayload::PositionUpdated(PositionUpdated {
                trader: addr("0xalice"),
                size: SignedSize::new(dec!(8)),
                entry_price: price(dec!(100)),
            }),
        ),
        log.next(
            1_060,
            ExchangePayload::Liquidated(Liquidated {
                trader: addr("0xalice"),
                liquidator: addr("0xkeeper"),
                amount: amt(dec!(5)),
                fee: amt(dec!(1)),
            }),
        ),
    ];
    projection.apply_batch(&events).unwrap();

    let store = projection.store();
    let position = store.position(&addr("0xalice")).unwrap().unwrap();
    assert_eq!(position.size.value(), dec!(3));
    assert_eq!(position.entry_price, price(dec!(100)));
    assert_eq!(store.liquidations().count(), 1);
}

#[test]
fn liquidation_overshoot_clamps_at_zero() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(
            1_000,
            ExchangePayload::PositionUpdated(PositionUpdated {
                trader: addr("0xshorty"),
                size: SignedSize::new(dec!(-3)),
                entry_price: price(dec!(100)),
            }),
        ),
        log.next(
            1_060,
            ExchangePayload::Liquidated(Liquidated {
                trader: addr("0xshorty"),
                liquidator: addr("0xkeeper"),
                amount: amt(dec!(5)),
                fee: amt(dec!(0)),
            }),
        ),
    ];
    projection.apply_batch(&events).unwrap();

    let position = projection
        .store()
        .position(&addr("0xshorty"))
        .unwrap()
        .unwrap();
    assert!(position.size.is_zero());
}

#[test]
fn liquidation_without_position_keeps_row_only() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    projection
        .apply(&log.next(
            1_000,
            ExchangePayload::Liquidated(Liquidated {
                trader: addr("0xghost"),
                liquidator: addr("0xkeeper"),
                amount: amt(dec!(5)),
                fee: amt(dec!(1)),
            }),
        ))
        .unwrap();

    let store = projection.store();
    assert_eq!(store.liquidations().count(), 1);
    assert!(store.position(&addr("0xghost")).unwrap().is_none());
}

#[test]
fn position_update_is_last_write_wins() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(
            1_000,
            ExchangePayload::PositionUpdated(PositionUpdated {
                trader: addr("0xalice"),
                size: SignedSize::new(dec!(8)),
                entry_price: price(dec!(100)),
            }),
        ),
        log.next(
            1_010,
            ExchangePayload::PositionUpdated(PositionUpdated {
                trader: addr("0xalice"),
                size: SignedSize::new(dec!(-2)),
                entry_price: price(dec!(110)),
            }),
        ),
    ];
    projection.apply_batch(&events).unwrap();

    let position = projection
        .store()
        .position(&addr("0xalice"))
        .unwrap()
        .unwrap();
    assert_eq!(position.size.value(), dec!(-2));
    assert_eq!(position.entry_price, price(dec!(110)));
}

#[test]
fn zero_amount_trade_flows_through_arithmetic() {
    let mut projection = new_projection();
    let mut log = EventLog::new();

    let events = vec![
        log.next(1_000, place_order(1, "0xalice", true, dec!(0), dec!(10))),
        log.next(1_000, trade(1, 99, dec!(0), dec!(0))),
    ];
    projection.apply_batch(&events).unwrap();

    let store = projection.store();
    let order = store.order(OrderId(1)).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.amount, amt(dec!(10)));
    assert_eq!(store.trades().count(), 1);

    let candle = store
        .candle(&CandleKey::for_trade(Resolution::ONE_MINUTE, Timestamp::from_secs(1_000)))
        .unwrap()
        .unwrap();
    assert_eq!(candle.close_price, price(dec!(0)));
    assert!(candle.volume.is_zero());
}
