// Tests for per-vehicle fuel efficiency ("rendimiento")
//
// Covers the zero-volume, single-reading and no-reading edge cases, signed
// efficiency on odometer regressions, and a non-crash property over random
// fleet windows.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use maxpay_reports::reports::models::{TransactionRecord, VehicleDescriptor};
use maxpay_reports::reports::services::compute_rendimiento;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(step: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
        + Duration::minutes(step)
}

fn fleet_tx(
    vehicle_id: i64,
    step: i64,
    odometer: Option<Decimal>,
    volume: Option<Decimal>,
    amount: Decimal,
) -> TransactionRecord {
    TransactionRecord {
        amount,
        discount: Decimal::ZERO,
        volume_units: volume,
        fuel_type: Some("Diesel".to_string()),
        channel: Some("Flotillas".to_string()),
        subchannel: Some("Carga".to_string()),
        customer: "Fletes Bajio".to_string(),
        odometer,
        vehicle_id: Some(vehicle_id),
        vehicle: Some(VehicleDescriptor {
            plate: Some(format!("GTO-{:03}", vehicle_id)),
            make: Some("Kenworth".to_string()),
            model: Some("T680".to_string()),
        }),
        timestamp: at(step),
    }
}

#[test]
fn test_vehicle_performance_example() {
    let txs = vec![
        fleet_tx(1, 0, Some(dec!(1000)), Some(dec!(10)), dec!(100)),
        fleet_tx(1, 1, Some(dec!(1200)), Some(dec!(15)), dec!(150)),
    ];

    let result = compute_rendimiento(&txs);
    assert_eq!(result.len(), 1);

    let v1 = &result[0];
    assert_eq!(v1.vehicle_id, 1);
    assert_eq!(v1.odometer_initial, Some(dec!(1000)));
    assert_eq!(v1.odometer_final, Some(dec!(1200)));
    assert_eq!(v1.total_volume, dec!(25));
    assert_eq!(v1.total_amount, dec!(250));
    assert_eq!(v1.efficiency, Some(dec!(8.0)));
    assert_eq!(v1.plate.as_deref(), Some("GTO-001"));
    assert_eq!(v1.channel.as_deref(), Some("Flotillas"));
    assert_eq!(v1.subchannel.as_deref(), Some("Carga"));
}

#[test]
fn test_zero_volume_has_no_efficiency() {
    let txs = vec![
        fleet_tx(2, 0, Some(dec!(500)), Some(dec!(0)), dec!(0)),
        fleet_tx(2, 1, Some(dec!(800)), None, dec!(0)),
    ];

    let v = &compute_rendimiento(&txs)[0];
    assert_eq!(v.total_volume, Decimal::ZERO);
    assert_eq!(v.distance, Some(dec!(300)));
    assert_eq!(v.efficiency, None);
    assert_eq!(v.display_efficiency(), None);
}

#[test]
fn test_single_reading_vehicle() {
    let txs = vec![
        fleet_tx(3, 0, None, Some(dec!(20)), dec!(400)),
        fleet_tx(3, 1, Some(dec!(7350)), Some(dec!(18)), dec!(360)),
        fleet_tx(3, 2, None, Some(dec!(12)), dec!(240)),
    ];

    let v = &compute_rendimiento(&txs)[0];
    assert_eq!(v.odometer_initial, Some(dec!(7350)));
    assert_eq!(v.odometer_final, Some(dec!(7350)));
    assert_eq!(v.odometer_readings, 1);
    assert_eq!(v.efficiency, None);
    assert_eq!(v.total_volume, dec!(50));
    assert_eq!(v.total_amount, dec!(1000));
}

#[test]
fn test_vehicle_without_readings() {
    let txs = vec![
        fleet_tx(4, 0, None, Some(dec!(20)), dec!(400)),
        fleet_tx(4, 1, None, Some(dec!(10)), dec!(200)),
    ];

    let v = &compute_rendimiento(&txs)[0];
    assert_eq!(v.odometer_initial, None);
    assert_eq!(v.odometer_final, None);
    assert_eq!(v.distance, None);
    assert_eq!(v.efficiency, None);
}

#[test]
fn test_odometer_regression_keeps_sign() {
    let txs = vec![
        fleet_tx(5, 0, Some(dec!(90000)), Some(dec!(40)), dec!(900)),
        fleet_tx(5, 1, Some(dec!(89800)), Some(dec!(10)), dec!(225)),
    ];

    let v = &compute_rendimiento(&txs)[0];
    assert_eq!(v.distance, Some(dec!(-200)));
    assert_eq!(v.efficiency, Some(dec!(-4)));
    assert_eq!(v.display_efficiency(), Some(dec!(4.00)));
    assert!(v.has_odometer_regression());
}

#[test]
fn test_multiple_vehicles_are_independent() {
    let txs = vec![
        fleet_tx(10, 0, Some(dec!(100)), Some(dec!(5)), dec!(100)),
        fleet_tx(20, 1, Some(dec!(5000)), Some(dec!(30)), dec!(600)),
        fleet_tx(10, 2, Some(dec!(160)), Some(dec!(5)), dec!(100)),
        fleet_tx(20, 3, Some(dec!(5300)), Some(dec!(30)), dec!(600)),
    ];

    let result = compute_rendimiento(&txs);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].vehicle_id, 10);
    assert_eq!(result[0].efficiency, Some(dec!(6)));
    assert_eq!(result[1].vehicle_id, 20);
    assert_eq!(result[1].efficiency, Some(dec!(5)));
}

#[test]
fn test_empty_window() {
    assert!(compute_rendimiento(&[]).is_empty());
}

fn arb_fleet_tx() -> impl Strategy<Value = (i64, Option<i64>, Option<i64>, i64)> {
    (
        1i64..5,
        prop::option::of(0i64..1_000_000),
        prop::option::weighted(0.8, 0i64..20_000),
        0i64..1_000_000,
    )
}

proptest! {
    #[test]
    fn test_never_panics_and_totals_conserve(
        rows in prop::collection::vec(arb_fleet_tx(), 0..100)
    ) {
        let txs: Vec<TransactionRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (vehicle, odo, vol, amount))| {
                fleet_tx(
                    *vehicle,
                    i as i64,
                    odo.map(Decimal::from),
                    vol.map(|v| Decimal::new(v, 2)),
                    Decimal::new(*amount, 2),
                )
            })
            .collect();

        let result = compute_rendimiento(&txs);

        let total_amount: Decimal = txs.iter().map(|t| t.amount).sum();
        prop_assert_eq!(result.iter().map(|v| v.total_amount).sum::<Decimal>(), total_amount);

        for v in &result {
            if v.total_volume.is_zero() || v.odometer_readings < 2 {
                prop_assert!(v.efficiency.is_none());
            } else {
                prop_assert!(v.efficiency.is_some());
            }
            if v.odometer_readings == 1 {
                prop_assert_eq!(v.odometer_initial, v.odometer_final);
            }
        }
    }
}
