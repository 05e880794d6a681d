pub mod calendar;
pub mod coach;
pub mod config;
pub mod flow;
pub mod profile;
pub mod rate;
pub mod todo;
pub mod weather;

use chrono::{Local, NaiveDate};

/// `YYYY-MM-DD`, or today when absent.
pub fn parse_day(raw: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}").into()),
        None => Ok(Local::now().date_naive()),
    }
}
