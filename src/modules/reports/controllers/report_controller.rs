use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::core::{display_amount, format_iso8601, AppError, Result};
use crate::middleware::log_error;
use crate::modules::reports::models::{
    AggregationBucket, ReportDimension, ReportRequest, ReportTotals, TransactionRecord,
    VehiclePerformance,
};
use crate::modules::reports::services::{buckets_to_csv, ReportService, SummaryReport};

/// Shown by the front-end instead of an empty table
pub const NO_DATA_MESSAGE: &str = "No hay datos para los criterios seleccionados";

/// Query parameters of the summary endpoints
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Grouping dimension: canal, subcanal or tipo_combustible (default canal)
    #[serde(default)]
    pub agrupar: Option<String>,
}

impl SummaryQuery {
    fn dimension(&self) -> Result<ReportDimension> {
        match self.agrupar.as_deref() {
            None | Some("") => Ok(ReportDimension::default()),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }
}

/// Transaction row of the simple station report
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub canal: Option<String>,
    pub monto: String, // Decimal as string for JSON precision
    pub descuento: String,
    pub tipo_combustible: Option<String>,
    pub unidades: Option<String>,
    pub cliente: String,
    pub fecha: String, // ISO 8601
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(tx: TransactionRecord) -> Self {
        Self {
            canal: tx.channel,
            monto: tx.amount.to_string(),
            descuento: tx.discount.to_string(),
            tipo_combustible: tx.fuel_type,
            unidades: tx.volume_units.map(|v| v.to_string()),
            cliente: tx.customer,
            fecha: format_iso8601(tx.timestamp),
        }
    }
}

/// Bucket of a summary report, rounded for display
#[derive(Debug, Serialize)]
pub struct BucketResponse {
    pub clave: String,
    pub monto_total: String,
    pub descuento_total: String,
    pub unidades_total: String,
    pub transacciones: i64,
}

impl From<AggregationBucket> for BucketResponse {
    fn from(bucket: AggregationBucket) -> Self {
        Self {
            clave: bucket.key,
            monto_total: display_amount(bucket.total_amount),
            descuento_total: display_amount(bucket.total_discount),
            unidades_total: display_amount(bucket.total_volume),
            transacciones: bucket.transaction_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub monto_total: String,
    pub descuento_total: String,
    pub unidades_total: String,
    pub transacciones: i64,
}

impl From<ReportTotals> for TotalsResponse {
    fn from(totals: ReportTotals) -> Self {
        Self {
            monto_total: display_amount(totals.total_amount),
            descuento_total: display_amount(totals.total_discount),
            unidades_total: display_amount(totals.total_volume),
            transacciones: totals.transaction_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub agrupacion: String,
    pub buckets: Vec<BucketResponse>,
    pub totales: TotalsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl From<SummaryReport> for SummaryResponse {
    fn from(report: SummaryReport) -> Self {
        let mensaje = report.is_empty().then(|| NO_DATA_MESSAGE.to_string());
        Self {
            agrupacion: report.dimension.to_string(),
            buckets: report.buckets.into_iter().map(BucketResponse::from).collect(),
            totales: TotalsResponse::from(report.totals),
            mensaje,
        }
    }
}

/// Fleet vehicle row
///
/// `rendimiento` is the raw signed ratio; `rendimiento_display` is what the
/// tables and exports show.
#[derive(Debug, Serialize)]
pub struct VehiclePerformanceResponse {
    pub vehiculo_id: i64,
    pub placa: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub odometro_inicial: Option<String>,
    pub odometro_final: Option<String>,
    pub distancia: Option<String>,
    pub unidades_total: String,
    pub monto_total: String,
    pub rendimiento: Option<String>,
    pub rendimiento_display: Option<String>,
    pub canal: Option<String>,
    pub subcanal: Option<String>,
}

impl From<VehiclePerformance> for VehiclePerformanceResponse {
    fn from(v: VehiclePerformance) -> Self {
        let rendimiento_display = v.display_efficiency().map(display_amount);
        Self {
            vehiculo_id: v.vehicle_id,
            placa: v.plate,
            marca: v.make,
            modelo: v.model,
            odometro_inicial: v.odometer_initial.map(|d| d.to_string()),
            odometro_final: v.odometer_final.map(|d| d.to_string()),
            distancia: v.distance.map(|d| d.to_string()),
            unidades_total: display_amount(v.total_volume),
            monto_total: display_amount(v.total_amount),
            rendimiento: v.efficiency.map(|e| e.normalize().to_string()),
            rendimiento_display,
            canal: v.channel,
            subcanal: v.subchannel,
        }
    }
}

/// POST /api/reportes/transacciones
///
/// Transactions of an establishment (or channel/subchannel) inside the window.
pub async fn post_transactions_report(
    service: web::Data<ReportService>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    match service.transactions_report(&body).await {
        Ok(transactions) => HttpResponse::Ok().json(
            transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            log_error("transactions report", &e);
            e.error_response()
        }
    }
}

/// POST /api/reportes/resumen?agrupar=canal|subcanal|tipo_combustible
pub async fn post_summary_report(
    service: web::Data<ReportService>,
    query: web::Query<SummaryQuery>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    match handle_summary(&service, &query, &body).await {
        Ok(report) => HttpResponse::Ok().json(SummaryResponse::from(report)),
        Err(e) => {
            log_error("summary report", &e);
            e.error_response()
        }
    }
}

/// POST /api/reportes/resumen/csv?agrupar=...
///
/// Same buckets as the JSON summary, as a CSV attachment for spreadsheets.
pub async fn post_summary_csv(
    service: web::Data<ReportService>,
    query: web::Query<SummaryQuery>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    let result = match handle_summary(&service, &query, &body).await {
        Ok(report) => buckets_to_csv(report.dimension, &report.buckets)
            .map(|bytes| (report.dimension, bytes)),
        Err(e) => Err(e),
    };

    match result {
        Ok((dimension, bytes)) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"resumen_{}.csv\"", dimension),
            ))
            .body(bytes),
        Err(e) => {
            log_error("summary export", &e);
            e.error_response()
        }
    }
}

/// POST /api/reportes/rendimiento
///
/// Per-vehicle fuel efficiency for a channel/subchannel window.
pub async fn post_fleet_report(
    service: web::Data<ReportService>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    match service.fleet_report(&body).await {
        Ok(vehicles) => HttpResponse::Ok().json(
            vehicles
                .into_iter()
                .map(VehiclePerformanceResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => {
            log_error("fleet report", &e);
            e.error_response()
        }
    }
}

async fn handle_summary(
    service: &ReportService,
    query: &SummaryQuery,
    body: &ReportRequest,
) -> Result<SummaryReport> {
    let dimension = query.dimension()?;
    service.summary_report(body, dimension).await
}

/// Configure routes for reports module
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reportes")
            .route("/transacciones", web::post().to(post_transactions_report))
            .route("/resumen", web::post().to(post_summary_report))
            .route("/resumen/csv", web::post().to(post_summary_csv))
            .route("/rendimiento", web::post().to(post_fleet_report)),
    );
}
