mod report_controller;

pub use report_controller::{
    post_fleet_report, post_summary_csv, post_summary_report, post_transactions_report,
    BucketResponse, SummaryResponse, TransactionResponse, VehiclePerformanceResponse,
    NO_DATA_MESSAGE,
};

// Re-export configure for the application factory
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    report_controller::configure_routes(cfg);
}
