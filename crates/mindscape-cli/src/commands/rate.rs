use clap::Args;
use mindscape_core::calendar::{DailyRatingLedger, BEST_DAY_SENTINEL, WORST_DAY_SENTINEL};
use mindscape_core::storage::Database;

use super::parse_day;

#[derive(Args)]
pub struct RateArgs {
    /// 0 (Terrible) to 6 (Awesome), "best" or "worst"
    #[arg(allow_hyphen_values = true)]
    value: String,
    /// Day to rate (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<String>,
}

fn parse_value(raw: &str) -> Result<i64, Box<dyn std::error::Error>> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "best" => Ok(BEST_DAY_SENTINEL),
        "worst" => Ok(WORST_DAY_SENTINEL),
        other => other
            .parse::<i64>()
            .map_err(|_| format!("invalid rating '{raw}'").into()),
    }
}

pub fn run(args: RateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let day = parse_day(args.date.as_deref())?;
    let value = parse_value(&args.value)?;

    let db = Database::open()?;
    let mut calendar = DailyRatingLedger::load(&db);
    match calendar.set_raw_rating(day, value)? {
        Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
        None => eprintln!("rating {value} is out of range, nothing changed"),
    }
    Ok(())
}
