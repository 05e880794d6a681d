//! # Mindscape Core Library
//!
//! Core logic for Mindscape, a personal mood and productivity tracker. The
//! `mindscape` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Calendar**: one mood rating per day, plus a best and worst day pinned
//!   per year
//! - **Todos**: ordered list with a completion goal
//! - **Storage**: SQLite-backed key-value store and TOML configuration
//! - **Flow timer**: wall-clock interval timer; the caller drives `tick()`
//! - **Coach** and **Weather**: async HTTP clients whose failures degrade to
//!   fallback text
//!
//! ## Key Components
//!
//! - [`DailyRatingLedger`]: mood calendar
//! - [`TodoLedger`]: todo list and goal
//! - [`KeyValueStore`]: persistence contract both ledgers write through
//! - [`Coach`]: motivation and chat session
//! - [`WeatherClient`]: current conditions

pub mod calendar;
pub mod coach;
pub mod credentials;
pub mod error;
pub mod events;
pub mod flow;
pub mod profile;
pub mod storage;
pub mod todo;
pub mod weather;

pub use calendar::{DailyRatingLedger, Pin, Rating, RatingCommand};
pub use coach::{ChatMessage, Coach, CoachClient, DayContext, FailureClass, Motivation};
pub use error::{CoachError, ConfigError, CoreError, StorageError, WeatherError};
pub use events::{Event, Subscribers, SubscriptionId};
pub use flow::{FlowPhase, FlowState, FlowTimer};
pub use storage::{Config, Database, KeyValueStore, KeyValueStoreExt, MemoryStore};
pub use todo::{TodoItem, TodoLedger};
pub use weather::{Coordinates, LocationProvider, WeatherClient, WeatherReport};
