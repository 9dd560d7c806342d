use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::reports::models::{
    AggregationBucket, ReportDimension, ReportQuery, ReportRequest, ReportScope, ReportTotals,
    TransactionRecord, VehiclePerformance,
};
use crate::modules::reports::services::aggregator::aggregate_by_dimension;
use crate::modules::reports::services::query_gateway::QueryGateway;
use crate::modules::reports::services::vehicle_performance::compute_rendimiento;

/// Summary report grouped by one dimension
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub dimension: ReportDimension,
    pub buckets: Vec<AggregationBucket>,
    pub totals: ReportTotals,
}

impl SummaryReport {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Service for generating transaction, summary and fleet reports
///
/// Holds no per-request state; every call validates, reads once through the
/// gateway and reduces the rows in memory.
pub struct ReportService {
    gateway: QueryGateway,
}

impl ReportService {
    /// Create a new report service
    pub fn new(gateway: QueryGateway) -> Self {
        Self { gateway }
    }

    /// Raw transactions of a window, ordered by timestamp
    ///
    /// # Errors
    /// Validation, not-found and storage errors from the gateway
    pub async fn transactions_report(
        &self,
        request: &ReportRequest,
    ) -> Result<Vec<TransactionRecord>> {
        let query = QueryGateway::validate(request)?;
        let transactions = self.gateway.fetch(&query).await?;

        if transactions.is_empty() {
            warn_empty("transactions", &query);
        }

        Ok(transactions)
    }

    /// Transactions of a window grouped by `dimension`
    pub async fn summary_report(
        &self,
        request: &ReportRequest,
        dimension: ReportDimension,
    ) -> Result<SummaryReport> {
        let query = QueryGateway::validate(request)?;
        let transactions = self.gateway.fetch(&query).await?;

        let buckets = aggregate_by_dimension(&transactions, dimension);
        let totals = ReportTotals::from_buckets(&buckets);
        let report = SummaryReport {
            dimension,
            buckets,
            totals,
        };

        if report.is_empty() {
            warn_empty("summary", &query);
        } else {
            info!(
                "Summary report by {} generated: {} buckets from {} transactions",
                dimension,
                report.buckets.len(),
                report.totals.transaction_count
            );
        }

        Ok(report)
    }

    /// Per-vehicle efficiency for a channel/subchannel window
    ///
    /// # Errors
    /// `Validation` when the request is scoped to an establishment instead of
    /// a channel/subchannel pair.
    pub async fn fleet_report(&self, request: &ReportRequest) -> Result<Vec<VehiclePerformance>> {
        let query = QueryGateway::validate(request)?;
        if !matches!(query.scope, ReportScope::Channel { .. }) {
            return Err(AppError::validation(
                "Fleet reports require canalId and subcanalId",
            ));
        }

        let transactions = self.gateway.fetch(&query).await?;
        let vehicles = compute_rendimiento(&transactions);

        if vehicles.is_empty() {
            warn_empty("fleet", &query);
        } else {
            let regressions = vehicles
                .iter()
                .filter(|v| v.has_odometer_regression())
                .count();
            if regressions > 0 {
                warn!(
                    "{} of {} vehicles have odometer readings going backwards for {}",
                    regressions,
                    vehicles.len(),
                    query.scope
                );
            }
            info!(
                "Fleet report generated: {} vehicles from {} transactions",
                vehicles.len(),
                transactions.len()
            );
        }

        Ok(vehicles)
    }

    /// Storage liveness check used by the readiness probe
    pub async fn check_storage(&self) -> Result<()> {
        self.gateway.check_storage().await
    }
}

fn warn_empty(kind: &str, query: &ReportQuery) {
    warn!(
        "Empty {} report for {} between {} and {}",
        kind, query.scope, query.window.start, query.window.end
    );
}

// Service-level behaviour over an in-memory repository is covered in
// tests/integration/report_generation_test.rs
