use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::round_for_display;

/// Fuel efficiency ("rendimiento") of one fleet vehicle over a report window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePerformance {
    pub vehicle_id: i64,
    pub plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    /// Odometer of the earliest transaction carrying a reading
    pub odometer_initial: Option<Decimal>,
    /// Odometer of the latest transaction carrying a reading
    pub odometer_final: Option<Decimal>,
    /// Number of transactions that carried an odometer reading
    pub odometer_readings: usize,
    /// `odometer_final - odometer_initial`, signed; `None` below two readings
    pub distance: Option<Decimal>,
    pub total_volume: Decimal,
    pub total_amount: Decimal,
    /// Raw signed distance per volume unit; negative values point at bad odometer data
    pub efficiency: Option<Decimal>,
    pub channel: Option<String>,
    pub subchannel: Option<String>,
}

impl VehiclePerformance {
    /// Efficiency as shown to users: absolute value, two decimals
    pub fn display_efficiency(&self) -> Option<Decimal> {
        self.efficiency.map(|e| round_for_display(e.abs()))
    }

    /// True when the odometer went backwards inside the window
    pub fn has_odometer_regression(&self) -> bool {
        self.distance.is_some_and(|d| d.is_sign_negative() && !d.is_zero())
    }
}
