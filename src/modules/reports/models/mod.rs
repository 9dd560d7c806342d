pub mod aggregation;
pub mod report_query;
pub mod transaction;
pub mod vehicle_performance;

pub use aggregation::{AggregationBucket, ReportDimension, ReportTotals, MISSING_KEY};
pub use report_query::{ReportQuery, ReportRequest, ReportScope, ReportWindow};
pub use transaction::{TransactionRecord, TransactionRow, VehicleDescriptor};
pub use vehicle_performance::VehiclePerformance;
