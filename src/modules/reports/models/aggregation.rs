use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionRecord;

/// Bucket key used when a transaction has no value for the grouping dimension
pub const MISSING_KEY: &str = "N/A";

/// Per-key summary produced by one aggregation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub key: String,
    pub total_amount: Decimal,
    pub total_discount: Decimal,
    pub total_volume: Decimal,
    pub transaction_count: i64,
}

impl AggregationBucket {
    /// Create an empty bucket for a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            total_amount: Decimal::ZERO,
            total_discount: Decimal::ZERO,
            total_volume: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    /// Fold one transaction into the running sums
    pub fn absorb(&mut self, tx: &TransactionRecord) {
        self.total_amount += tx.amount;
        self.total_discount += tx.discount;
        self.total_volume += tx.volume_units.unwrap_or(Decimal::ZERO);
        self.transaction_count += 1;
    }
}

/// Grand totals across every bucket of a summary report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_amount: Decimal,
    pub total_discount: Decimal,
    pub total_volume: Decimal,
    pub transaction_count: i64,
}

impl ReportTotals {
    pub fn from_buckets(buckets: &[AggregationBucket]) -> Self {
        buckets.iter().fold(Self::default(), |mut acc, b| {
            acc.total_amount += b.total_amount;
            acc.total_discount += b.total_discount;
            acc.total_volume += b.total_volume;
            acc.transaction_count += b.transaction_count;
            acc
        })
    }
}

/// Categorical dimensions a summary report can be grouped by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportDimension {
    #[default]
    #[serde(rename = "canal")]
    Channel,
    #[serde(rename = "subcanal")]
    Subchannel,
    #[serde(rename = "tipo_combustible")]
    FuelType,
}

impl ReportDimension {
    /// Extract this dimension's value from a transaction
    pub fn key_of<'a>(&self, tx: &'a TransactionRecord) -> Option<&'a str> {
        match self {
            ReportDimension::Channel => tx.channel.as_deref(),
            ReportDimension::Subchannel => tx.subchannel.as_deref(),
            ReportDimension::FuelType => tx.fuel_type.as_deref(),
        }
    }
}

impl fmt::Display for ReportDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportDimension::Channel => write!(f, "canal"),
            ReportDimension::Subchannel => write!(f, "subcanal"),
            ReportDimension::FuelType => write!(f, "tipo_combustible"),
        }
    }
}

impl std::str::FromStr for ReportDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canal" | "channel" => Ok(ReportDimension::Channel),
            "subcanal" | "subchannel" => Ok(ReportDimension::Subchannel),
            "tipo_combustible" | "combustible" | "fuel_type" => Ok(ReportDimension::FuelType),
            _ => Err(format!("Invalid grouping dimension: {}", s)),
        }
    }
}
