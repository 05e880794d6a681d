//! Current conditions for the dashboard weather card.

mod client;
mod condition;
mod location;

pub use client::{WeatherClient, WeatherReport};
pub use condition::{is_night_hour, WeatherCondition};
pub use location::{
    resolve_location, Coordinates, DeniedLocation, FixedLocation, LocationError, LocationProvider,
    ResolvedLocation,
};
