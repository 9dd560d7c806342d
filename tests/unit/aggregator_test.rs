// Property-based tests for transaction aggregation
//
// Covers grouping completeness, sum conservation, null-key bucketing and
// first-encounter ordering of aggregate_by.

use maxpay_reports::reports::models::{ReportDimension, TransactionRecord, MISSING_KEY};
use maxpay_reports::reports::services::{aggregate_by, aggregate_by_dimension};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const CHANNELS: [&str; 3] = ["Gasolineras", "Flotillas", "Lealtad"];
const FUELS: [&str; 3] = ["Magna", "Premium", "Diesel"];

fn record(
    channel: Option<&str>,
    fuel: Option<&str>,
    amount: Decimal,
    discount: Decimal,
    volume: Option<Decimal>,
) -> TransactionRecord {
    TransactionRecord {
        amount,
        discount,
        volume_units: volume,
        fuel_type: fuel.map(str::to_string),
        channel: channel.map(str::to_string),
        subchannel: None,
        customer: "Cliente General".to_string(),
        odometer: None,
        vehicle_id: None,
        vehicle: None,
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

/// Amounts in cents, so sums are exact and comparable
fn arb_record() -> impl Strategy<Value = TransactionRecord> {
    (
        prop::option::of(0usize..CHANNELS.len()),
        prop::option::of(0usize..FUELS.len()),
        0i64..10_000_000,
        0i64..100_000,
        prop::option::of(0i64..1_000_000),
    )
        .prop_map(|(channel, fuel, amount, discount, volume)| {
            record(
                channel.map(|i| CHANNELS[i]),
                fuel.map(|i| FUELS[i]),
                Decimal::new(amount, 2),
                Decimal::new(discount, 2),
                volume.map(|v| Decimal::new(v, 3)),
            )
        })
}

proptest! {
    #[test]
    fn test_grouping_completeness(txs in prop::collection::vec(arb_record(), 0..200)) {
        for dimension in [ReportDimension::Channel, ReportDimension::Subchannel, ReportDimension::FuelType] {
            let buckets = aggregate_by_dimension(&txs, dimension);
            let counted: i64 = buckets.iter().map(|b| b.transaction_count).sum();
            prop_assert_eq!(counted, txs.len() as i64);
        }
    }

    #[test]
    fn test_sum_conservation(txs in prop::collection::vec(arb_record(), 0..200)) {
        let buckets = aggregate_by(&txs, |t| t.channel.as_deref());

        let amount: Decimal = txs.iter().map(|t| t.amount).sum();
        let discount: Decimal = txs.iter().map(|t| t.discount).sum();
        let volume: Decimal = txs.iter().map(|t| t.volume_units.unwrap_or(Decimal::ZERO)).sum();

        prop_assert_eq!(buckets.iter().map(|b| b.total_amount).sum::<Decimal>(), amount);
        prop_assert_eq!(buckets.iter().map(|b| b.total_discount).sum::<Decimal>(), discount);
        prop_assert_eq!(buckets.iter().map(|b| b.total_volume).sum::<Decimal>(), volume);
    }

    #[test]
    fn test_null_keys_share_one_bucket(txs in prop::collection::vec(arb_record(), 0..200)) {
        let buckets = aggregate_by(&txs, |t| t.channel.as_deref());
        let missing = txs.iter().filter(|t| t.channel.is_none()).count() as i64;

        let na_buckets: Vec<_> = buckets.iter().filter(|b| b.key == MISSING_KEY).collect();
        if missing == 0 {
            prop_assert!(na_buckets.is_empty());
        } else {
            prop_assert_eq!(na_buckets.len(), 1);
            prop_assert_eq!(na_buckets[0].transaction_count, missing);
        }
    }

    #[test]
    fn test_keys_are_unique_and_in_first_encounter_order(txs in prop::collection::vec(arb_record(), 0..200)) {
        let buckets = aggregate_by(&txs, |t| t.fuel_type.as_deref());

        let mut expected: Vec<&str> = Vec::new();
        for t in &txs {
            let key = t.fuel_type.as_deref().unwrap_or(MISSING_KEY);
            if !expected.contains(&key) {
                expected.push(key);
            }
        }

        let actual: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn test_end_to_end_by_channel() {
    let txs = vec![
        record(Some("A"), Some("Gasoline"), dec!(100), dec!(5), Some(dec!(10))),
        record(Some("A"), Some("Diesel"), dec!(50), dec!(0), Some(dec!(5))),
        record(None, Some("Gasoline"), dec!(20), dec!(2), Some(dec!(2))),
    ];

    let buckets = aggregate_by_dimension(&txs, ReportDimension::Channel);
    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].key, "A");
    assert_eq!(buckets[0].total_amount, dec!(150));
    assert_eq!(buckets[0].total_discount, dec!(5));
    assert_eq!(buckets[0].total_volume, dec!(15));
    assert_eq!(buckets[0].transaction_count, 2);

    assert_eq!(buckets[1].key, "N/A");
    assert_eq!(buckets[1].total_amount, dec!(20));
    assert_eq!(buckets[1].total_discount, dec!(2));
    assert_eq!(buckets[1].total_volume, dec!(2));
    assert_eq!(buckets[1].transaction_count, 1);
}

#[test]
fn test_end_to_end_by_fuel_type() {
    let txs = vec![
        record(Some("A"), Some("Gasoline"), dec!(100), dec!(5), Some(dec!(10))),
        record(Some("A"), Some("Diesel"), dec!(50), dec!(0), Some(dec!(5))),
        record(None, Some("Gasoline"), dec!(20), dec!(2), Some(dec!(2))),
    ];

    let buckets = aggregate_by_dimension(&txs, ReportDimension::FuelType);
    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].key, "Gasoline");
    assert_eq!(buckets[0].total_amount, dec!(120));
    assert_eq!(buckets[0].total_discount, dec!(7));
    assert_eq!(buckets[0].total_volume, dec!(12));
    assert_eq!(buckets[0].transaction_count, 2);

    assert_eq!(buckets[1].key, "Diesel");
    assert_eq!(buckets[1].total_amount, dec!(50));
    assert_eq!(buckets[1].total_discount, dec!(0));
    assert_eq!(buckets[1].total_volume, dec!(5));
    assert_eq!(buckets[1].transaction_count, 1);
}

#[test]
fn test_custom_key_extractor() {
    let mut txs = vec![
        record(Some("A"), None, dec!(10), dec!(0), None),
        record(Some("B"), None, dec!(10), dec!(0), None),
    ];
    txs[0].customer = "Transportes Lopez".to_string();
    txs[1].customer = "Transportes Lopez".to_string();

    let buckets = aggregate_by(&txs, |t| Some(t.customer.as_str()));
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].key, "Transportes Lopez");
    assert_eq!(buckets[0].total_amount, dec!(20));
}
