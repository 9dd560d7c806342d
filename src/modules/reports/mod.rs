pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AggregationBucket, TransactionRecord, VehiclePerformance};
pub use repositories::{MySqlReportRepository, ReportRepository};
pub use services::{QueryGateway, ReportService};
