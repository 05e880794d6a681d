//! Forecast endpoint client.

use chrono::{DateTime, NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::condition::{is_night_hour, WeatherCondition};
use super::location::Coordinates;
use crate::error::WeatherError;
use crate::storage::{TemperatureUnit, WeatherConfig};

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
    #[serde(default)]
    current_weather_time: Option<String>,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    #[serde(default)]
    windspeed: Option<f64>,
    weathercode: i64,
    #[serde(default)]
    time: Option<String>,
}

/// Current conditions, already in the requested unit family.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature: i64,
    pub windspeed: i64,
    pub unit: TemperatureUnit,
    pub code: i64,
    pub condition: WeatherCondition,
    pub is_night: bool,
}

impl WeatherReport {
    pub fn description(&self) -> &'static str {
        self.condition.description()
    }

    pub fn icon(&self) -> &'static str {
        self.condition.icon(self.is_night)
    }

    pub fn wind_unit(&self) -> &'static str {
        match self.unit {
            TemperatureUnit::Fahrenheit => "mph",
            TemperatureUnit::Celsius => "km/h",
        }
    }

    /// "72°F Partly Cloudy, wind 8 mph"
    pub fn summary(&self) -> String {
        format!(
            "{}{} {}, wind {} {}",
            self.temperature,
            self.unit.symbol(),
            self.description(),
            self.windspeed,
            self.wind_unit()
        )
    }
}

pub struct WeatherClient {
    http: Client,
    endpoint: String,
    unit: TemperatureUnit,
}

impl WeatherClient {
    pub fn new(endpoint: impl Into<String>, unit: TemperatureUnit) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            unit,
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(config.endpoint.clone(), config.unit)
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn request_url(&self, coords: Coordinates) -> Result<Url, WeatherError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
                ("temperature_unit", self.unit.temperature_param().to_string()),
                ("windspeed_unit", self.unit.windspeed_param().to_string()),
            ],
        )?;
        Ok(url)
    }

    pub async fn current_conditions(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        let url = self.request_url(coords)?;
        tracing::debug!(%url, "fetching current weather");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        let decoded: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))?;
        Ok(self.report(decoded))
    }

    fn report(&self, decoded: ForecastResponse) -> WeatherReport {
        let current = decoded.current_weather;
        let time = current
            .time
            .or(decoded.current_weather_time)
            .or(decoded.time);
        let is_night = time
            .as_deref()
            .and_then(local_hour)
            .is_some_and(is_night_hour);
        WeatherReport {
            temperature: current.temperature.round() as i64,
            windspeed: current.windspeed.unwrap_or(0.0).round() as i64,
            unit: self.unit,
            code: current.weathercode,
            condition: WeatherCondition::from_code(current.weathercode),
            is_night,
        }
    }
}

/// Hour of a local ISO-8601 timestamp, with or without an offset.
fn local_hour(iso: &str) -> Option<u32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.hour());
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(iso, fmt).ok())
        .map(|dt| dt.hour())
}
