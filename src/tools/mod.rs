//! Plateful tools module
//!
//! MCP tool implementations for Plateful.

pub mod catalog;
pub mod plate;
pub mod profile;
pub mod status;

/// Validate an ISO date string (YYYY-MM-DD)
pub(crate) fn validate_date(date: &str) -> Result<(), String> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", date))
}
