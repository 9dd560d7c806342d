use actix_web::web;

use crate::middleware::{json_error_handler, query_error_handler};

pub mod health;
pub mod reports;

/// Register every route plus the extractor error handlers
///
/// Expects `web::Data<reports::ReportService>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .configure(health::configure)
        .configure(reports::controllers::configure);
}
