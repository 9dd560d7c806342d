use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::modules::reports::models::{TransactionRecord, VehicleDescriptor, VehiclePerformance};

/// Running state for one vehicle while walking the window
#[derive(Debug, Default)]
struct VehicleAccumulator {
    odometer_initial: Option<Decimal>,
    odometer_final: Option<Decimal>,
    readings: usize,
    total_volume: Decimal,
    total_amount: Decimal,
    vehicle: Option<VehicleDescriptor>,
    channel: Option<String>,
    subchannel: Option<String>,
}

impl VehicleAccumulator {
    fn absorb(&mut self, tx: &TransactionRecord) {
        if let Some(reading) = tx.odometer {
            if self.odometer_initial.is_none() {
                self.odometer_initial = Some(reading);
            }
            self.odometer_final = Some(reading);
            self.readings += 1;
        }

        self.total_volume += tx.volume_units.unwrap_or(Decimal::ZERO);
        self.total_amount += tx.amount;

        // Most recent row wins for pass-through fields
        if tx.vehicle.is_some() {
            self.vehicle = tx.vehicle.clone();
        }
        self.channel = tx.channel.clone();
        self.subchannel = tx.subchannel.clone();
    }

    fn finish(self, vehicle_id: i64) -> VehiclePerformance {
        let distance = match (self.odometer_initial, self.odometer_final) {
            (Some(initial), Some(fin)) if self.readings >= 2 => Some(fin - initial),
            _ => None,
        };

        let efficiency = distance.and_then(|d| {
            if self.total_volume.is_zero() {
                None
            } else {
                d.checked_div(self.total_volume)
            }
        });

        let vehicle = self.vehicle.unwrap_or(VehicleDescriptor {
            plate: None,
            make: None,
            model: None,
        });

        VehiclePerformance {
            vehicle_id,
            plate: vehicle.plate,
            make: vehicle.make,
            model: vehicle.model,
            odometer_initial: self.odometer_initial,
            odometer_final: self.odometer_final,
            odometer_readings: self.readings,
            distance,
            total_volume: self.total_volume,
            total_amount: self.total_amount,
            efficiency,
            channel: self.channel,
            subchannel: self.subchannel,
        }
    }
}

/// Compute per-vehicle fuel efficiency over a window
///
/// `transactions` must already be scoped to one channel/subchannel and sorted
/// by timestamp ascending; "initial" and "final" odometer readings follow that
/// order. Transactions without a vehicle are not fleet activity and are
/// skipped. One record is produced per vehicle, in first-encounter order.
///
/// Distance is `final - initial` and is not clamped: an odometer that went
/// backwards yields a negative efficiency, kept as-is for diagnostics.
/// Efficiency is `None` below two readings or when total volume is zero.
pub fn compute_rendimiento(transactions: &[TransactionRecord]) -> Vec<VehiclePerformance> {
    let mut order: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, VehicleAccumulator> = HashMap::new();

    for tx in transactions {
        let Some(vehicle_id) = tx.vehicle_id else {
            continue;
        };

        groups
            .entry(vehicle_id)
            .or_insert_with(|| {
                order.push(vehicle_id);
                VehicleAccumulator::default()
            })
            .absorb(tx);
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id).map(|acc| acc.finish(id)))
        .collect()
}
