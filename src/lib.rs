//! Max Loyalty / Max Pay reporting service
//!
//! Reads fuel and fleet-card transactions for a date window and reduces them
//! into per-dimension summaries and per-vehicle fuel efficiency.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::reports;
