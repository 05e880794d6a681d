use chrono::{Datelike, Local};
use clap::Subcommand;
use mindscape_core::calendar::{month_range, DailyRatingLedger, Pin};
use mindscape_core::storage::{Database, KeyValueStore};

use super::parse_day;

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show every day of a month with its rating
    Month {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last seven days
    Week,
    /// Show the best and worst day of a year
    Pins {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Average rating over an inclusive date range
    Average {
        /// First day (YYYY-MM-DD)
        from: String,
        /// Last day (YYYY-MM-DD)
        to: String,
    },
    /// Erase every rating and pinned day
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

fn pin_marker<S: KeyValueStore>(calendar: &DailyRatingLedger<S>, day: chrono::NaiveDate) -> &'static str {
    match calendar.pin_for(day) {
        Some(Pin::Best) => "  [best day]",
        Some(Pin::Worst) => "  [worst day]",
        None => "",
    }
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut calendar = DailyRatingLedger::load(&db);
    let today = Local::now().date_naive();

    match action {
        CalendarAction::Month { year, month, json } => {
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let range = month_range(year, month).ok_or_else(|| format!("invalid month: {month}"))?;

            if json {
                let days: Vec<serde_json::Value> = range
                    .start()
                    .iter_days()
                    .take_while(|d| d <= range.end())
                    .map(|day| {
                        serde_json::json!({
                            "date": day,
                            "rating": calendar.rating_for(day),
                            "pin": calendar.pin_for(day),
                        })
                    })
                    .collect();
                let out = serde_json::json!({
                    "year": year,
                    "month": month,
                    "average": calendar.average_for(range.clone()),
                    "days": days,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "{}  average {}",
                    range.start().format("%B %Y"),
                    calendar.month_average_label(year, month)
                );
                for day in range.start().iter_days().take_while(|d| d <= range.end()) {
                    match calendar.rating_for(day) {
                        Some(rating) => println!(
                            "{}  {} {:<8}{}",
                            day.format("%a %d"),
                            rating.value(),
                            rating.label(),
                            pin_marker(&calendar, day)
                        ),
                        None => println!("{}  -", day.format("%a %d")),
                    }
                }
            }
        }
        CalendarAction::Week => {
            for cell in calendar.week_strip(today) {
                let rating = cell
                    .rating
                    .map_or_else(|| "-".to_string(), |r| format!("{} {}", r.value(), r.label()));
                println!("{}  {rating}", cell.date.format("%a %Y-%m-%d"));
            }
        }
        CalendarAction::Pins { year } => {
            let year = year.unwrap_or(today.year());
            let show = |day: Option<chrono::NaiveDate>| {
                day.map_or_else(|| "not set".to_string(), |d| d.to_string())
            };
            println!("best day {year}:  {}", show(calendar.best_day(year)));
            println!("worst day {year}: {}", show(calendar.worst_day(year)));
        }
        CalendarAction::Average { from, to } => {
            let from = parse_day(Some(&from))?;
            let to = parse_day(Some(&to))?;
            if from > to {
                return Err(format!("range start {from} is after end {to}").into());
            }
            println!("{}", calendar.average_label(from..=to));
        }
        CalendarAction::Reset { yes } => {
            if !yes {
                return Err("refusing to erase the calendar without --yes".into());
            }
            let event = calendar.reset_all()?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
