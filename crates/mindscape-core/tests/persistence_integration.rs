//! Integration tests for ledgers persisted through the SQLite store.
//!
//! Each test opens a fresh database file in a temp dir, mutates through
//! one connection and reads back through another.

use chrono::NaiveDate;
use mindscape_core::calendar::{DailyRatingLedger, Pin, Rating, RatingCommand, NO_DATA};
use mindscape_core::flow::{FlowPhase, FlowTimer};
use mindscape_core::storage::{Database, KeyValueStore, KeyValueStoreExt};
use mindscape_core::todo::TodoLedger;
use mindscape_core::{profile, Event};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(dir: &TempDir) -> Database {
    Database::open_at(dir.path().join("mindscape.db")).unwrap()
}

#[test]
fn test_ratings_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let db = open(&dir);
        let mut calendar = DailyRatingLedger::load(&db);
        calendar.set_rating(day(2025, 3, 1), RatingCommand::rate(Rating::Good)).unwrap();
        calendar.set_rating(day(2025, 3, 2), RatingCommand::mark(Pin::Worst)).unwrap();
    }

    let db = open(&dir);
    let calendar = DailyRatingLedger::load(&db);
    assert_eq!(calendar.rating_for(day(2025, 3, 1)), Some(Rating::Good));
    assert_eq!(calendar.rating_for(day(2025, 3, 2)), Some(Rating::Terrible));
    assert_eq!(calendar.worst_day(2025), Some(day(2025, 3, 2)));
    assert_eq!(calendar.best_day(2025), None);
}

#[test]
fn test_new_best_day_displaces_previous_on_disk() {
    let dir = TempDir::new().unwrap();
    let d1 = day(2025, 4, 10);
    let d2 = day(2025, 4, 20);
    {
        let db = open(&dir);
        let mut calendar = DailyRatingLedger::load(&db);
        calendar.set_raw_rating(d1, 15).unwrap();
        let event = calendar.set_raw_rating(d2, 15).unwrap().unwrap();
        match event {
            Event::RatingChanged { displaced, pin, .. } => {
                assert_eq!(displaced, Some(d1));
                assert_eq!(pin, Some(Pin::Best));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    let db = open(&dir);
    let calendar = DailyRatingLedger::load(&db);
    assert_eq!(calendar.rating_for(d1), Some(Rating::Awesome));
    assert_eq!(calendar.pin_for(d1), None);
    assert_eq!(calendar.best_day(2025), Some(d2));
    assert_eq!(calendar.pin_for(d2), Some(Pin::Best));
}

#[test]
fn test_calendar_reset_clears_every_year() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let mut calendar = DailyRatingLedger::load(&db);
    calendar.set_raw_rating(day(2024, 12, 31), 15).unwrap();
    calendar.set_raw_rating(day(2025, 1, 1), -15).unwrap();
    profile::set_user_name(&db, "Robin").unwrap();

    calendar.reset_all().unwrap();

    let reloaded = DailyRatingLedger::load(&db);
    assert!(reloaded.is_empty());
    assert!(reloaded.pins().is_empty());
    assert_eq!(
        reloaded.average_label(day(2025, 1, 1)..=day(2025, 1, 31)),
        NO_DATA
    );
    // Only calendar keys are swept.
    assert_eq!(db.keys().unwrap(), vec!["userName".to_string()]);
}

#[test]
fn test_todo_reset_then_reload_is_empty() {
    let dir = TempDir::new().unwrap();
    {
        let db = open(&dir);
        let mut todos = TodoLedger::load(&db);
        todos.add("Walk dog").unwrap();
        todos.add("Buy milk").unwrap();
        todos.set_goal(4).unwrap();
        todos.reset_all().unwrap();
    }

    let db = open(&dir);
    let todos = TodoLedger::load(&db);
    assert!(todos.is_empty());
    assert_eq!(todos.goal(), 4);
}

#[test]
fn test_todos_and_calendar_share_one_store() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let mut calendar = DailyRatingLedger::load(&db);
    let mut todos = TodoLedger::load(&db);

    calendar.set_rating(day(2025, 5, 5), RatingCommand::rate(Rating::Great)).unwrap();
    todos.add("Stretch").unwrap();
    let id = todos.items()[0].id;
    todos.toggle(id).unwrap();

    let todos = TodoLedger::load(&db);
    assert_eq!(todos.completed_count(), 1);
    assert_eq!(
        DailyRatingLedger::load(&db).rating_for(day(2025, 5, 5)),
        Some(Rating::Great)
    );
}

#[test]
fn test_legacy_sentinel_values_load_as_boundaries() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.set(
        "dailyRatings",
        br#"{"2025-06-01": 15, "2025-06-02": -15, "2025-06-03": 42, "garbage": 3}"#,
    )
    .unwrap();

    let calendar = DailyRatingLedger::load(&db);
    assert_eq!(calendar.rating_for(day(2025, 6, 1)), Some(Rating::Awesome));
    assert_eq!(calendar.rating_for(day(2025, 6, 2)), Some(Rating::Terrible));
    assert_eq!(calendar.rating_for(day(2025, 6, 3)), None);
    assert_eq!(calendar.len(), 2);
}

#[test]
fn test_flow_timer_state_roundtrip() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let mut timer = FlowTimer::new(60, 30, 2);
    timer.set_break_duration(45);
    db.set_json("flowTimer", &timer).unwrap();

    let restored: FlowTimer = db.get_json("flowTimer").unwrap();
    assert_eq!(restored.phase(), FlowPhase::Flow);
    assert_eq!(restored.break_secs(), 45);
    assert_eq!(restored.sets_remaining(), 2);
}
