use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Descriptive fields of the vehicle a fleet transaction was charged to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    pub plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
}

/// One fuel purchase or fleet-card swipe, as consumed by the aggregation code
///
/// Optional dimensions stay `None`; the `"N/A"` label is only introduced when
/// a bucket key is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub amount: Decimal,
    pub discount: Decimal,
    pub volume_units: Option<Decimal>,
    pub fuel_type: Option<String>,
    pub channel: Option<String>,
    pub subchannel: Option<String>,
    pub customer: String,
    pub odometer: Option<Decimal>,
    pub vehicle_id: Option<i64>,
    pub vehicle: Option<VehicleDescriptor>,
    pub timestamp: NaiveDateTime,
}

/// Raw row as read from storage, before coercion
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub monto: Option<Decimal>,
    pub descuento: Option<Decimal>,
    pub unidades: Option<Decimal>,
    pub tipo_combustible: Option<String>,
    pub canal: Option<String>,
    pub subcanal: Option<String>,
    pub cliente: Option<String>,
    pub odometro: Option<Decimal>,
    pub vehiculo_id: Option<i64>,
    pub placa: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub fecha: NaiveDateTime,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = AppError;

    /// Coerce a storage row into a record
    ///
    /// A missing or negative amount, or a negative discount, means the row is
    /// corrupt and the whole read fails. Volume and odometer pass through
    /// untouched; inconsistent readings surface in the fleet figures.
    fn try_from(row: TransactionRow) -> Result<Self> {
        let amount = row.monto.ok_or_else(|| {
            AppError::storage(format!("Transaction {} has no amount", row.id))
        })?;
        let discount = row.descuento.unwrap_or(Decimal::ZERO);

        ensure_non_negative(row.id, "amount", amount)?;
        ensure_non_negative(row.id, "discount", discount)?;

        let vehicle = row.vehiculo_id.map(|_| VehicleDescriptor {
            plate: row.placa,
            make: row.marca,
            model: row.modelo,
        });

        Ok(TransactionRecord {
            amount,
            discount,
            volume_units: row.unidades,
            fuel_type: row.tipo_combustible,
            channel: row.canal,
            subchannel: row.subcanal,
            customer: row.cliente.unwrap_or_default(),
            odometer: row.odometro,
            vehicle_id: row.vehiculo_id,
            vehicle,
            timestamp: row.fecha,
        })
    }
}

fn ensure_non_negative(id: i64, field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::storage(format!(
            "Transaction {} has negative {}: {}",
            id, field, value
        )));
    }
    Ok(())
}
