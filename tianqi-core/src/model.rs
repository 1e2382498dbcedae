use serde::{Deserialize, Serialize};

/// Standard sea-level pressure; AMap does not report pressure.
pub const STANDARD_PRESSURE_HPA: f64 = 1013.0;

/// Default number of synthesized hourly points.
pub const DEFAULT_HOURLY_COUNT: usize = 24;

/// Placeholder UV index; AMap does not report one.
pub const DEFAULT_UV_INDEX: u8 = 5;

/// A city produced by resolution. Immutable once returned; unique by adcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    /// AMap administrative-division code, the stable key for weather lookups.
    pub adcode: String,
    /// Primary display name (district over city, municipality suffix stripped).
    pub name: String,
    pub province: String,
    pub city: String,
    pub district: String,
    /// Administrative level as reported by AMap, e.g. "市" or "区".
    pub level: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Current conditions in internal (Celsius-based) units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub observed_at: i64,
    pub temperature_c: f64,
    /// AMap has no feels-like reading; set equal to the actual temperature.
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    /// Degrees in [0, 360), 0 = north.
    pub wind_direction_deg: f64,
    pub condition: String,
    pub icon: String,
    /// AMap has no sunrise/sunset data; fixed display strings.
    pub sunrise: String,
    pub sunset: String,
}

/// One synthesized hourly point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourPoint {
    pub epoch_secs: i64,
    pub temperature_c: f64,
    pub condition: String,
    pub icon: String,
}

/// One daily forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPoint {
    pub epoch_secs: i64,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub condition: String,
    pub icon: String,
    /// AMap does not supply precipitation probability.
    pub precipitation_probability: f64,
    /// AMap does not supply a UV index; mid-scale placeholder.
    pub uv_index: u8,
}

/// A complete normalized weather record for one city.
///
/// Constructed fresh per successful fetch cycle and never mutated in place;
/// a new snapshot replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub adcode: String,
    pub city_name: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourPoint>,
    pub daily: Vec<DayPoint>,
}

/// Temperature unit preference. Internal values stay Celsius; conversion
/// happens only when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert an internal Celsius value into this unit.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_fahrenheit_roundtrip() {
        for temp in [-40.0, -10.5, 0.0, 21.3, 37.0, 100.0] {
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(temp));
            assert!((back - temp).abs() < 1.0, "roundtrip drifted for {temp}: {back}");
        }
    }

    #[test]
    fn known_conversion_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn unit_conversion_at_render_time() {
        assert_eq!(TemperatureUnit::Celsius.from_celsius(20.0), 20.0);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(20.0), 68.0);
        assert_eq!(TemperatureUnit::Fahrenheit.symbol(), "°F");
    }
}
