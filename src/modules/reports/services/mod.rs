pub mod aggregator;
pub mod export;
pub mod query_gateway;
pub mod report_service;
pub mod vehicle_performance;

pub use aggregator::{aggregate_by, aggregate_by_dimension};
pub use export::buckets_to_csv;
pub use query_gateway::QueryGateway;
pub use report_service::{ReportService, SummaryReport};
pub use vehicle_performance::compute_rendimiento;
