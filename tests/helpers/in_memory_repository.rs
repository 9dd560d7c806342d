// In-memory ReportRepository
//
// Mirrors the MySQL repository's contract: rows scoped to the requested
// establishment or channel/subchannel, inside the inclusive window, ordered
// by timestamp then id.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use maxpay_reports::core::{AppError, Result};
use maxpay_reports::reports::models::{ReportScope, ReportWindow, TransactionRow};
use maxpay_reports::reports::{QueryGateway, ReportRepository, ReportService};

#[derive(Debug, Clone)]
struct StoredRow {
    establishment_id: i64,
    channel_id: Option<i64>,
    subchannel_id: Option<i64>,
    row: TransactionRow,
}

#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    establishments: HashSet<i64>,
    subchannels: HashMap<i64, HashSet<i64>>,
    rows: Vec<StoredRow>,
    ignore_window: bool,
    fail_reads: bool,
    read_delay: Option<Duration>,
    reads: AtomicUsize,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_establishment(mut self, establishment_id: i64) -> Self {
        self.establishments.insert(establishment_id);
        self
    }

    pub fn with_channel(mut self, channel_id: i64, subchannel_id: i64) -> Self {
        self.subchannels
            .entry(channel_id)
            .or_default()
            .insert(subchannel_id);
        self
    }

    /// Store a row for an establishment, optionally tagged with a channel pair
    pub fn with_row(
        mut self,
        establishment_id: i64,
        channel: Option<(i64, i64)>,
        row: TransactionRow,
    ) -> Self {
        self.rows.push(StoredRow {
            establishment_id,
            channel_id: channel.map(|c| c.0),
            subchannel_id: channel.map(|c| c.1),
            row,
        });
        self
    }

    /// Return every scoped row regardless of the window
    pub fn ignoring_window(mut self) -> Self {
        self.ignore_window = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn into_service(self) -> ReportService {
        into_service(Arc::new(self), Duration::from_secs(5))
    }
}

pub fn into_service(repo: Arc<dyn ReportRepository>, timeout: Duration) -> ReportService {
    ReportService::new(QueryGateway::new(repo, timeout))
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn establishment_exists(&self, establishment_id: i64) -> Result<bool> {
        Ok(self.establishments.contains(&establishment_id))
    }

    async fn channel_exists(&self, channel_id: i64) -> Result<bool> {
        Ok(self.subchannels.contains_key(&channel_id))
    }

    async fn subchannel_exists(&self, channel_id: i64, subchannel_id: i64) -> Result<bool> {
        Ok(self
            .subchannels
            .get(&channel_id)
            .is_some_and(|subs| subs.contains(&subchannel_id)))
    }

    async fn fetch_transactions(
        &self,
        scope: &ReportScope,
        window: &ReportWindow,
    ) -> Result<Vec<TransactionRow>> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reads {
            return Err(AppError::storage("connection refused"));
        }

        let mut rows: Vec<TransactionRow> = self
            .rows
            .iter()
            .filter(|stored| match *scope {
                ReportScope::Establishment(id) => stored.establishment_id == id,
                ReportScope::Channel {
                    channel_id,
                    subchannel_id,
                } => {
                    stored.channel_id == Some(channel_id)
                        && stored.subchannel_id == Some(subchannel_id)
                }
            })
            .filter(|stored| self.ignore_window || window.contains(stored.row.fecha))
            .map(|stored| stored.row.clone())
            .collect();

        if !self.ignore_window {
            rows.sort_by(|a, b| a.fecha.cmp(&b.fecha).then(a.id.cmp(&b.id)));
        }

        Ok(rows)
    }

    async fn ping(&self) -> Result<()> {
        if self.fail_reads {
            return Err(AppError::storage("connection refused"));
        }
        Ok(())
    }
}
