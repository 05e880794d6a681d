//! Rating ledger with per-year best/worst pins.
//!
//! ## Persisted layout
//!
//! ```text
//! dailyRatings      {"2025-03-01": 4, "2025-03-02": 6, ...}
//! bestDay2025       "2025-03-02"
//! worstDay2025      "2025-01-17"
//! ```
//!
//! Every mutation rewrites `dailyRatings` first and then the pin keys of
//! the affected year. Loading is lenient: anything unparsable is dropped.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::Serialize;

use super::rating::{Pin, Rating, RatingCommand, BEST_DAY_SENTINEL, WORST_DAY_SENTINEL};
use crate::error::Result;
use crate::events::{Event, SubscriptionId, Subscribers};
use crate::storage::{KeyValueStore, KeyValueStoreExt};

/// Shown instead of an average when a range has no ratings.
pub const NO_DATA: &str = "—";

const RATINGS_KEY: &str = "dailyRatings";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// The pinned days of one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearPins {
    pub best: Option<NaiveDate>,
    pub worst: Option<NaiveDate>,
}

impl YearPins {
    pub fn get(&self, pin: Pin) -> Option<NaiveDate> {
        match pin {
            Pin::Best => self.best,
            Pin::Worst => self.worst,
        }
    }

    fn slot(&mut self, pin: Pin) -> &mut Option<NaiveDate> {
        match pin {
            Pin::Best => &mut self.best,
            Pin::Worst => &mut self.worst,
        }
    }

    fn is_empty(&self) -> bool {
        self.best.is_none() && self.worst.is_none()
    }
}

/// One cell of the dashboard week strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub rating: Option<Rating>,
}

/// Maps local calendar days to ratings and tracks each year's pinned days.
pub struct DailyRatingLedger<S: KeyValueStore> {
    store: S,
    ratings: BTreeMap<NaiveDate, Rating>,
    pins: BTreeMap<i32, YearPins>,
    subscribers: Subscribers,
}

impl<S: KeyValueStore> DailyRatingLedger<S> {
    /// Rehydrate from `store`. Missing or corrupt data yields an empty ledger.
    pub fn load(store: S) -> Self {
        let mut ledger = Self {
            store,
            ratings: BTreeMap::new(),
            pins: BTreeMap::new(),
            subscribers: Subscribers::new(),
        };
        ledger.reload();
        ledger
    }

    /// Discard in-memory state and read everything back from the store.
    pub fn reload(&mut self) {
        self.ratings = read_ratings(&self.store);
        self.pins = read_pins(&self.store, &self.ratings);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rating_for(&self, day: NaiveDate) -> Option<Rating> {
        self.ratings.get(&day).copied()
    }

    pub fn ratings(&self) -> &BTreeMap<NaiveDate, Rating> {
        &self.ratings
    }

    pub fn pins(&self) -> &BTreeMap<i32, YearPins> {
        &self.pins
    }

    pub fn best_day(&self, year: i32) -> Option<NaiveDate> {
        self.pins.get(&year).and_then(|p| p.best)
    }

    pub fn worst_day(&self, year: i32) -> Option<NaiveDate> {
        self.pins.get(&year).and_then(|p| p.worst)
    }

    pub fn pin_for(&self, day: NaiveDate) -> Option<Pin> {
        let pins = self.pins.get(&day.year())?;
        if pins.best == Some(day) {
            Some(Pin::Best)
        } else if pins.worst == Some(day) {
            Some(Pin::Worst)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Mean of the ratings present in `range`, or `None` when there are none.
    /// A reversed range holds no days.
    pub fn average_for(&self, range: RangeInclusive<NaiveDate>) -> Option<f64> {
        if range.start() > range.end() {
            return None;
        }
        let (sum, count) = self
            .ratings
            .range(range)
            .fold((0_u32, 0_u32), |(sum, count), (_, r)| {
                (sum + u32::from(r.value()), count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(f64::from(sum) / f64::from(count))
    }

    /// Average formatted to one decimal place, or [`NO_DATA`].
    pub fn average_label(&self, range: RangeInclusive<NaiveDate>) -> String {
        match self.average_for(range) {
            Some(avg) => format!("{avg:.1}"),
            None => NO_DATA.to_string(),
        }
    }

    pub fn month_average_label(&self, year: i32, month: u32) -> String {
        match month_range(year, month) {
            Some(range) => self.average_label(range),
            None => NO_DATA.to_string(),
        }
    }

    /// The seven days ending at `today`, oldest first.
    pub fn week_strip(&self, today: NaiveDate) -> Vec<WeekDay> {
        (0..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                WeekDay {
                    date,
                    rating: self.rating_for(date),
                }
            })
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Rate `day`, applying the pin rules, then persist.
    ///
    /// Pinning a day displaces the year's previous holder of that pin: it
    /// is reset to the pin's boundary rating and unpinned. A plain rating
    /// on a pinned day unpins it.
    ///
    /// If the write fails the ledger is reloaded from the store, so memory
    /// never holds a change the store rejected.
    pub fn set_rating(&mut self, day: NaiveDate, command: RatingCommand) -> Result<Event> {
        let year = day.year();
        let pins = self.pins.entry(year).or_default();
        let mut displaced = None;

        match command.pin() {
            Some(pin) => {
                if let Some(previous) = pins.get(pin).filter(|prev| *prev != day) {
                    self.ratings.insert(previous, pin.boundary());
                    displaced = Some(previous);
                }
                *pins.slot(pin) = Some(day);
                let other = pins.slot(pin.other());
                if *other == Some(day) {
                    *other = None;
                }
            }
            None => {
                for pin in [Pin::Best, Pin::Worst] {
                    let slot = pins.slot(pin);
                    if *slot == Some(day) {
                        *slot = None;
                    }
                }
            }
        }
        if pins.is_empty() {
            self.pins.remove(&year);
        }

        self.ratings.insert(day, command.rating());
        if let Err(e) = self.persist_year(year) {
            tracing::warn!(%day, error = %e, "rating not saved, reloading");
            self.reload();
            return Err(e);
        }

        tracing::debug!(%day, rating = %command.rating(), pin = ?command.pin(), ?displaced, "day rated");
        let event = Event::RatingChanged {
            day,
            rating: command.rating(),
            pin: command.pin(),
            displaced,
            at: Utc::now(),
        };
        self.subscribers.notify(&event);
        Ok(event)
    }

    /// Rate `day` from a raw slider value (0..=6, or ±15 to pin).
    ///
    /// Any other value is ignored and yields `Ok(None)`.
    pub fn set_raw_rating(&mut self, day: NaiveDate, value: i64) -> Result<Option<Event>> {
        match RatingCommand::from_raw(value) {
            Some(command) => self.set_rating(day, command).map(Some),
            None => {
                tracing::debug!(%day, value, "ignoring out-of-range rating");
                Ok(None)
            }
        }
    }

    /// Erase every rating and every year's pins. Irreversible.
    ///
    /// A failed removal reloads whatever the store still holds.
    pub fn reset_all(&mut self) -> Result<Event> {
        self.ratings.clear();
        self.pins.clear();

        if let Err(e) = self.remove_all_keys() {
            tracing::warn!(error = %e, "calendar reset incomplete, reloading");
            self.reload();
            return Err(e);
        }

        tracing::info!("calendar reset");
        let event = Event::CalendarReset { at: Utc::now() };
        self.subscribers.notify(&event);
        Ok(event)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn remove_all_keys(&self) -> Result<()> {
        self.store.remove(RATINGS_KEY)?;
        for key in self.store.keys()? {
            if parse_pin_key(&key).is_some() {
                self.store.remove(&key)?;
            }
        }
        Ok(())
    }

    fn persist_year(&self, year: i32) -> Result<()> {
        let encoded: BTreeMap<String, u8> = self
            .ratings
            .iter()
            .map(|(day, rating)| (day.format(DAY_FORMAT).to_string(), rating.value()))
            .collect();
        self.store.set_json(RATINGS_KEY, &encoded)?;

        let pins = self.pins.get(&year).copied().unwrap_or_default();
        for pin in [Pin::Best, Pin::Worst] {
            let key = pin_key(pin, year);
            match pins.get(pin) {
                Some(day) => self
                    .store
                    .set_json(&key, &day.format(DAY_FORMAT).to_string())?,
                None => self.store.remove(&key)?,
            }
        }
        Ok(())
    }
}

/// First through last day of a month, or `None` for an invalid month.
pub fn month_range(year: i32, month: u32) -> Option<RangeInclusive<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first..=next.pred_opt()?)
}

fn pin_key(pin: Pin, year: i32) -> String {
    format!("{}{year}", pin.key_prefix())
}

fn parse_pin_key(key: &str) -> Option<(Pin, i32)> {
    [Pin::Best, Pin::Worst].into_iter().find_map(|pin| {
        let year = key.strip_prefix(pin.key_prefix())?;
        if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        year.parse().ok().map(|y| (pin, y))
    })
}

/// Accepts plain dates and full RFC 3339 timestamps (reduced to the local day).
fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Local).date_naive())
}

fn parse_stored_rating(value: &serde_json::Value) -> Option<Rating> {
    match value.as_i64()? {
        BEST_DAY_SENTINEL => Some(Rating::Awesome),
        WORST_DAY_SENTINEL => Some(Rating::Terrible),
        other => Rating::from_value(other),
    }
}

/// When a timestamp key and a plain-date key land on the same day, the
/// plain-date entry wins.
fn read_ratings<S: KeyValueStore>(store: &S) -> BTreeMap<NaiveDate, Rating> {
    let Some(raw) = store.get_json::<BTreeMap<String, serde_json::Value>>(RATINGS_KEY) else {
        return BTreeMap::new();
    };
    let mut ratings = BTreeMap::new();
    for (key, value) in &raw {
        let Some((day, rating)) = parse_day(key).zip(parse_stored_rating(value)) else {
            tracing::debug!(key = %key, %value, "dropping unreadable rating");
            continue;
        };
        let is_plain = NaiveDate::parse_from_str(key, DAY_FORMAT).is_ok();
        if !is_plain && ratings.contains_key(&day) {
            tracing::debug!(key = %key, %day, "dropping duplicate timestamp rating");
            continue;
        }
        ratings.insert(day, rating);
    }
    ratings
}

fn read_pins<S: KeyValueStore>(
    store: &S,
    ratings: &BTreeMap<NaiveDate, Rating>,
) -> BTreeMap<i32, YearPins> {
    let keys = match store.keys() {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!(error = %e, "cannot list store keys, pins treated as absent");
            return BTreeMap::new();
        }
    };

    let mut sorted: Vec<(Pin, i32, String)> = keys
        .into_iter()
        .filter_map(|key| parse_pin_key(&key).map(|(pin, year)| (pin, year, key)))
        .collect();
    // Best before worst, so a day stored under both keys stays best.
    sorted.sort_by_key(|(pin, year, _)| (*year, *pin == Pin::Worst));

    let mut pins: BTreeMap<i32, YearPins> = BTreeMap::new();
    for (pin, year, key) in sorted {
        let Some(day) = store.get_json::<String>(&key).as_deref().and_then(parse_day) else {
            tracing::debug!(key = %key, "dropping unreadable pin");
            continue;
        };
        let entry = pins.entry(year).or_default();
        let valid = day.year() == year
            && ratings.contains_key(&day)
            && entry.get(pin.other()) != Some(day);
        if valid {
            *entry.slot(pin) = Some(day);
        } else {
            tracing::debug!(key = %key, %day, "dropping inconsistent pin");
        }
    }
    pins.retain(|_, p| !p.is_empty());
    pins
}
