use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report parameters as posted by the admin front-end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Window start, `YYYY-MM-DDThh:mm` (inclusive)
    pub fecha_inicio: Option<String>,
    /// Window end, `YYYY-MM-DDThh:mm` (inclusive)
    pub fecha_final: Option<String>,
    pub establecimiento_id: Option<i64>,
    pub canal_id: Option<i64>,
    pub subcanal_id: Option<i64>,
}

/// Inclusive timestamp window of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Dimension a report is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Station-scoped report
    Establishment(i64),
    /// Channel-scoped fleet report
    Channel { channel_id: i64, subchannel_id: i64 },
}

impl fmt::Display for ReportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportScope::Establishment(id) => write!(f, "establishment {}", id),
            ReportScope::Channel {
                channel_id,
                subchannel_id,
            } => write!(f, "channel {} / subchannel {}", channel_id, subchannel_id),
        }
    }
}

/// Validated report parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub window: ReportWindow,
    pub scope: ReportScope,
}
