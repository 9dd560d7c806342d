use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{ReportScope, ReportWindow, TransactionRow};

/// Storage seam for report reads
///
/// Implementations return rows inside the inclusive window, ordered by
/// timestamp ascending. Existence checks are separate so callers can tell a
/// missing scope apart from an empty window.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Check that an establishment exists
    async fn establishment_exists(&self, establishment_id: i64) -> Result<bool>;

    /// Check that a channel exists
    async fn channel_exists(&self, channel_id: i64) -> Result<bool>;

    /// Check that a subchannel exists and belongs to the channel
    async fn subchannel_exists(&self, channel_id: i64, subchannel_id: i64) -> Result<bool>;

    /// Fetch transactions for a scope inside a window
    async fn fetch_transactions(
        &self,
        scope: &ReportScope,
        window: &ReportWindow,
    ) -> Result<Vec<TransactionRow>>;

    /// Round-trip to storage for readiness probes
    async fn ping(&self) -> Result<()>;
}

const TRANSACTION_COLUMNS: &str = r#"
    SELECT
        t.id,
        t.monto,
        t.descuento,
        t.unidades,
        tc.nombre AS tipo_combustible,
        c.nombre AS canal,
        s.nombre AS subcanal,
        cl.nombre AS cliente,
        t.odometro,
        t.vehiculo_id,
        v.placa,
        v.marca,
        v.modelo,
        t.fecha
    FROM transacciones t
    LEFT JOIN tipos_combustible tc ON tc.id = t.tipo_combustible_id
    LEFT JOIN canales c ON c.id = t.canal_id
    LEFT JOIN subcanales s ON s.id = t.subcanal_id
    LEFT JOIN clientes cl ON cl.id = t.cliente_id
    LEFT JOIN vehiculos v ON v.id = t.vehiculo_id
"#;

/// MySQL-backed report repository
pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, ids: &[i64]) -> Result<bool> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for id in ids {
            query = query.bind(*id);
        }

        let count = query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Existence check failed: {}", e);
            AppError::Database(e)
        })?;

        Ok(count > 0)
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn establishment_exists(&self, establishment_id: i64) -> Result<bool> {
        self.exists(
            "SELECT COUNT(*) FROM establecimientos WHERE id = ?",
            &[establishment_id],
        )
        .await
    }

    async fn channel_exists(&self, channel_id: i64) -> Result<bool> {
        self.exists("SELECT COUNT(*) FROM canales WHERE id = ?", &[channel_id])
            .await
    }

    async fn subchannel_exists(&self, channel_id: i64, subchannel_id: i64) -> Result<bool> {
        self.exists(
            "SELECT COUNT(*) FROM subcanales WHERE id = ? AND canal_id = ?",
            &[subchannel_id, channel_id],
        )
        .await
    }

    async fn fetch_transactions(
        &self,
        scope: &ReportScope,
        window: &ReportWindow,
    ) -> Result<Vec<TransactionRow>> {
        let rows = match scope {
            ReportScope::Establishment(establishment_id) => {
                let sql = format!(
                    "{} WHERE t.establecimiento_id = ? AND t.fecha >= ? AND t.fecha <= ? \
                     ORDER BY t.fecha ASC, t.id ASC",
                    TRANSACTION_COLUMNS
                );
                sqlx::query_as::<_, TransactionRow>(&sql)
                    .bind(*establishment_id)
                    .bind(window.start)
                    .bind(window.end)
                    .fetch_all(&self.pool)
                    .await
            }
            ReportScope::Channel {
                channel_id,
                subchannel_id,
            } => {
                let sql = format!(
                    "{} WHERE t.canal_id = ? AND t.subcanal_id = ? AND t.fecha >= ? AND t.fecha <= ? \
                     ORDER BY t.fecha ASC, t.id ASC",
                    TRANSACTION_COLUMNS
                );
                sqlx::query_as::<_, TransactionRow>(&sql)
                    .bind(*channel_id)
                    .bind(*subchannel_id)
                    .bind(window.start)
                    .bind(window.end)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            tracing::error!("Failed to fetch transactions for {}: {}", scope, e);
            AppError::Database(e)
        })?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
