pub mod assign;
pub mod away;
pub mod catalog;
pub mod config;
pub mod history;
pub mod member;

use chrono::{NaiveDate, NaiveDateTime};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

/// Parse `YYYY-MM-DDTHH:MM` (seconds optional).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("invalid date-time '{s}': {e}"))
}
