use std::time::Duration;

use clap::Subcommand;
use mindscape_core::storage::{Config, WeatherConfig};
use mindscape_core::weather::{
    resolve_location, Coordinates, DeniedLocation, FixedLocation, LocationProvider, WeatherClient,
};

#[derive(Subcommand)]
pub enum WeatherAction {
    /// Show current conditions
    Now {
        /// Latitude (overrides config)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude (overrides config)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Explicit flags, then the configured position, else nothing (fallback).
fn provider(config: &WeatherConfig, lat: Option<f64>, lon: Option<f64>) -> Box<dyn LocationProvider> {
    match (lat.or(config.latitude), lon.or(config.longitude)) {
        (Some(lat), Some(lon)) => Box::new(FixedLocation(Coordinates::new(lat, lon))),
        _ => Box::new(DeniedLocation),
    }
}

pub fn run(action: WeatherAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match action {
        WeatherAction::Now { lat, lon, json } => {
            let provider = provider(&config.weather, lat, lon);
            let wait = Duration::from_secs(config.weather.location_wait_secs);
            let client = WeatherClient::from_config(&config.weather);

            let (location, report) = rt.block_on(async {
                let location = resolve_location(
                    provider.as_ref(),
                    wait,
                    Coordinates::fallback(&config.weather),
                )
                .await;
                let report = client.current_conditions(location.coordinates()).await;
                (location, report)
            });
            let report = report?;

            if json {
                let coords = location.coordinates();
                let out = serde_json::json!({
                    "latitude": coords.latitude,
                    "longitude": coords.longitude,
                    "fallback_location": location.is_fallback(),
                    "temperature": report.temperature,
                    "unit": report.unit,
                    "windspeed": report.windspeed,
                    "code": report.code,
                    "description": report.description(),
                    "icon": report.icon(),
                    "is_night": report.is_night,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", report.summary());
                if location.is_fallback() {
                    eprintln!("(no location configured, showing the fallback location)");
                }
            }
        }
    }
    Ok(())
}
