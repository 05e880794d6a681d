//! Daily mood calendar: one rating per local calendar day, plus a best and
//! a worst day pinned per year.

mod ledger;
mod rating;

pub use ledger::{month_range, DailyRatingLedger, WeekDay, YearPins, NO_DATA};
pub use rating::{Pin, Rating, RatingCommand, BEST_DAY_SENTINEL, WORST_DAY_SENTINEL};
