use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::core::{display_amount, AppError, Result};
use crate::modules::reports::models::{AggregationBucket, ReportDimension};

/// One spreadsheet row of a summary export
#[derive(Debug, Serialize)]
struct BucketCsvRow<'a> {
    clave: &'a str,
    monto_total: String,
    descuento_total: String,
    unidades_total: String,
    transacciones: i64,
}

/// Render summary buckets as CSV, one header row plus one row per bucket
///
/// Values are rounded to two decimals here, the same presentation rule the
/// JSON responses follow.
pub fn buckets_to_csv(dimension: ReportDimension, buckets: &[AggregationBucket]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    for bucket in buckets {
        writer
            .serialize(BucketCsvRow {
                clave: &bucket.key,
                monto_total: display_amount(bucket.total_amount),
                descuento_total: display_amount(bucket.total_discount),
                unidades_total: display_amount(bucket.total_volume),
                transacciones: bucket.transaction_count,
            })
            .map_err(|e| AppError::internal(format!("Failed to write CSV row: {}", e)))?;
    }

    // Serialize never runs on an empty report, so the header is written by hand
    if buckets.is_empty() {
        writer
            .write_record([
                "clave",
                "monto_total",
                "descuento_total",
                "unidades_total",
                "transacciones",
            ])
            .map_err(|e| AppError::internal(format!("Failed to write CSV header: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush CSV export: {}", e)))?;

    debug!(
        "Exported {} {} buckets as CSV ({} bytes)",
        buckets.len(),
        dimension,
        bytes.len()
    );

    Ok(bytes)
}
