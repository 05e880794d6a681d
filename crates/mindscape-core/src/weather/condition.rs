//! WMO weather interpretation codes.

/// Grouped WMO code, as shown on the weather card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    Showers,
    SnowShowers,
    Thunderstorm,
    ThunderHail,
    Unknown,
}

impl WeatherCondition {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::Showers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderHail,
            _ => Self::Unknown,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow Grains",
            Self::Showers => "Showers",
            Self::SnowShowers => "Snow Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderHail => "Thunder + Hail",
            Self::Unknown => "Weather",
        }
    }

    /// Icon name. Only clear and partly cloudy skies have night variants.
    pub fn icon(self, is_night: bool) -> &'static str {
        match self {
            Self::Clear if is_night => "moon.stars.fill",
            Self::Clear => "sun.max.fill",
            Self::PartlyCloudy if is_night => "cloud.moon.fill",
            Self::PartlyCloudy => "cloud.sun.fill",
            Self::Overcast | Self::Unknown => "cloud.fill",
            Self::Fog => "cloud.fog.fill",
            Self::Drizzle => "cloud.drizzle.fill",
            Self::Rain => "cloud.rain.fill",
            Self::FreezingRain => "cloud.hail.fill",
            Self::Snow | Self::SnowShowers => "cloud.snow.fill",
            Self::SnowGrains => "cloud.sleet.fill",
            Self::Showers => "cloud.heavyrain.fill",
            Self::Thunderstorm => "cloud.bolt.fill",
            Self::ThunderHail => "cloud.bolt.rain.fill",
        }
    }
}

/// Night is before 06:00 or from 20:00 local time.
pub fn is_night_hour(hour: u32) -> bool {
    hour < 6 || hour >= 20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_group_as_expected() {
        assert_eq!(WeatherCondition::from_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_code(81), WeatherCondition::Showers);
        assert_eq!(WeatherCondition::from_code(99), WeatherCondition::ThunderHail);
        assert_eq!(WeatherCondition::from_code(4), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_code(-1).description(), "Weather");
    }

    #[test]
    fn night_icons_only_for_clear_and_partly_cloudy() {
        assert_eq!(WeatherCondition::Clear.icon(true), "moon.stars.fill");
        assert_eq!(WeatherCondition::Clear.icon(false), "sun.max.fill");
        assert_eq!(WeatherCondition::PartlyCloudy.icon(true), "cloud.moon.fill");
        assert_eq!(WeatherCondition::Rain.icon(true), "cloud.rain.fill");
    }

    #[test]
    fn night_boundaries() {
        assert!(is_night_hour(0));
        assert!(is_night_hour(5));
        assert!(!is_night_hour(6));
        assert!(!is_night_hour(19));
        assert!(is_night_hour(20));
    }
}
