use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::core::{parse_datetime_local, AppError, Result};
use crate::modules::reports::models::{
    ReportQuery, ReportRequest, ReportScope, ReportWindow, TransactionRecord,
};
use crate::modules::reports::repositories::ReportRepository;

/// Validates report parameters and performs the single storage read of a report
pub struct QueryGateway {
    repo: Arc<dyn ReportRepository>,
    timeout: Duration,
}

impl QueryGateway {
    /// Create a gateway over a repository
    ///
    /// # Arguments
    /// * `repo` - Storage collaborator
    /// * `timeout` - Upper bound for each storage call of a request
    pub fn new(repo: Arc<dyn ReportRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    /// Validate raw request parameters
    ///
    /// # Errors
    /// `Validation` when a date is missing or malformed, when the window is
    /// inverted, or when the scope is missing, ambiguous or non-positive.
    pub fn validate(request: &ReportRequest) -> Result<ReportQuery> {
        let start = parse_required_datetime("fechaInicio", request.fecha_inicio.as_deref())?;
        let end = parse_required_datetime("fechaFinal", request.fecha_final.as_deref())?;

        if start > end {
            return Err(AppError::validation(format!(
                "fechaInicio ({}) must be before or equal to fechaFinal ({})",
                start, end
            )));
        }

        let scope = match (
            request.establecimiento_id,
            request.canal_id,
            request.subcanal_id,
        ) {
            (Some(establishment_id), None, None) => {
                ReportScope::Establishment(positive_id("establecimientoId", establishment_id)?)
            }
            (None, Some(channel_id), Some(subchannel_id)) => ReportScope::Channel {
                channel_id: positive_id("canalId", channel_id)?,
                subchannel_id: positive_id("subcanalId", subchannel_id)?,
            },
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(AppError::validation(
                    "canalId and subcanalId must be provided together",
                ))
            }
            (None, None, None) => {
                return Err(AppError::validation(
                    "Either establecimientoId or canalId and subcanalId is required",
                ))
            }
            (Some(_), _, _) => {
                return Err(AppError::validation(
                    "establecimientoId cannot be combined with canalId/subcanalId",
                ))
            }
        };

        Ok(ReportQuery {
            window: ReportWindow { start, end },
            scope,
        })
    }

    /// Confirm the scope exists, then read its transactions in the window
    ///
    /// Rows come back ordered by timestamp ascending with numeric fields
    /// coerced; an empty window yields an empty vector.
    ///
    /// # Errors
    /// `NotFound` for an unknown establishment, channel or subchannel;
    /// `Storage`/`Database` when the read fails, times out, or returns rows
    /// that cannot be coerced.
    pub async fn fetch(&self, query: &ReportQuery) -> Result<Vec<TransactionRecord>> {
        self.ensure_scope_exists(&query.scope).await?;

        let rows = self
            .bounded(self.repo.fetch_transactions(&query.scope, &query.window))
            .await?;

        debug!("Fetched {} raw rows for {}", rows.len(), query.scope);

        let mut records = rows
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        records.retain(|r| query.window.contains(r.timestamp));
        records.sort_by_key(|r| r.timestamp);

        info!(
            "Query gateway returned {} transactions for {} between {} and {}",
            records.len(),
            query.scope,
            query.window.start,
            query.window.end
        );

        Ok(records)
    }

    /// Storage liveness check
    pub async fn check_storage(&self) -> Result<()> {
        self.bounded(self.repo.ping()).await
    }

    async fn ensure_scope_exists(&self, scope: &ReportScope) -> Result<()> {
        match *scope {
            ReportScope::Establishment(establishment_id) => {
                if !self
                    .bounded(self.repo.establishment_exists(establishment_id))
                    .await?
                {
                    return Err(AppError::not_found(format!(
                        "Establishment {} not found",
                        establishment_id
                    )));
                }
            }
            ReportScope::Channel {
                channel_id,
                subchannel_id,
            } => {
                if !self.bounded(self.repo.channel_exists(channel_id)).await? {
                    return Err(AppError::not_found(format!(
                        "Channel {} not found",
                        channel_id
                    )));
                }
                if !self
                    .bounded(self.repo.subchannel_exists(channel_id, subchannel_id))
                    .await?
                {
                    return Err(AppError::not_found(format!(
                        "Subchannel {} not found in channel {}",
                        subchannel_id, channel_id
                    )));
                }
            }
        }

        Ok(())
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                AppError::storage(format!(
                    "Storage read exceeded {}s timeout",
                    self.timeout.as_secs()
                ))
            })?
    }
}

fn parse_required_datetime(
    field: &str,
    value: Option<&str>,
) -> Result<chrono::NaiveDateTime> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_datetime_local(field, v),
        _ => Err(AppError::validation(format!("{} is required", field))),
    }
}

fn positive_id(field: &str, value: i64) -> Result<i64> {
    if value <= 0 {
        return Err(AppError::validation(format!(
            "{} must be a positive integer, got {}",
            field, value
        )));
    }
    Ok(value)
}
