//! Normalization of raw AMap payloads into the internal weather schema.
//!
//! AMap only exposes an instantaneous observation and daily min/max values,
//! so the hourly series is synthesized: the first six points ramp linearly
//! from the live reading toward the matching daily extreme, later points sit
//! on the extreme itself.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};

use crate::amap::{DayCast, ForecastRaw, LiveWeatherRaw};
use crate::error::{Error, Result};
use crate::icons::icon_for;
use crate::model::{
    CurrentConditions, DayPoint, HourPoint, WeatherSnapshot, DEFAULT_UV_INDEX,
    STANDARD_PRESSURE_HPA,
};

/// Wind-force scale (0–12) to meters per second.
pub const WIND_SPEED_BY_FORCE: [f64; 13] =
    [0.0, 0.5, 2.0, 3.5, 5.5, 8.0, 10.5, 13.5, 16.5, 20.0, 23.5, 27.5, 32.0];

/// Blend window: hourly points in `0..BLEND_HOURS` interpolate between the
/// live reading and the daily extreme.
const BLEND_HOURS: usize = 6;

const SUNRISE_DISPLAY: &str = "06:00";
const SUNSET_DISPLAY: &str = "18:00";

/// Convert a wind-force token ("4", "≤3", ...) to a speed in m/s.
///
/// Non-digit characters are stripped first, so "≤3" reads as force 3: the
/// comparison operator is dropped, matching longstanding behavior. Empty or
/// out-of-range tokens read as calm.
pub fn wind_force_to_mps(windpower: &str) -> f64 {
    let cleaned: String = windpower
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let Ok(force) = cleaned.parse::<f64>() else {
        return 0.0;
    };
    if force < 0.0 {
        return 0.0;
    }

    WIND_SPEED_BY_FORCE.get(force as usize).copied().unwrap_or(0.0)
}

/// Compass phrases, compound directions first so "东北" is not shadowed by
/// the bare "北".
const COMPASS: [(&str, f64); 8] = [
    ("东北", 45.0),
    ("东南", 135.0),
    ("西南", 225.0),
    ("西北", 315.0),
    ("北", 0.0),
    ("东", 90.0),
    ("南", 180.0),
    ("西", 270.0),
];

/// Map a wind-direction phrase to degrees; first substring match wins,
/// north when nothing matches.
pub fn wind_direction_to_degrees(direction: &str) -> f64 {
    for (name, degrees) in COMPASS {
        if direction.contains(name) {
            return degrees;
        }
    }
    0.0
}

const DIRECTION_LABELS: [&str; 8] =
    ["北风", "东北风", "东风", "东南风", "南风", "西南风", "西风", "西北风"];

/// Human label for a wind direction in degrees.
pub fn wind_direction_label(degrees: f64) -> &'static str {
    let index = ((degrees / 45.0).round() as usize) % 8;
    DIRECTION_LABELS[index]
}

/// Daytime for icon purposes is 08:00–17:59 local wall clock; AMap supplies
/// no sunrise/sunset data.
pub fn is_daytime_hour(hour: u32) -> bool {
    (8..18).contains(&hour)
}

/// Merge a live observation and a daily forecast into one snapshot.
///
/// Fails with `InvalidPayload` when the forecast carries no day entries or a
/// numeric field does not parse.
pub fn normalize(
    live: &LiveWeatherRaw,
    forecast: &ForecastRaw,
    city_name: &str,
    adcode: &str,
    hourly_count: usize,
    now: DateTime<Local>,
) -> Result<WeatherSnapshot> {
    if forecast.casts.is_empty() {
        return Err(Error::invalid_payload("forecast has no day entries"));
    }

    let is_day = is_daytime_hour(now.hour());
    let temperature = parse_measure("temperature", &live.temperature)?;

    let current = CurrentConditions {
        observed_at: now.timestamp(),
        temperature_c: temperature,
        feels_like_c: temperature,
        humidity_pct: parse_measure("humidity", &live.humidity)?,
        pressure_hpa: STANDARD_PRESSURE_HPA,
        wind_speed_mps: wind_force_to_mps(&live.windpower),
        wind_direction_deg: wind_direction_to_degrees(&live.winddirection),
        condition: live.weather.clone(),
        icon: icon_for(&live.weather, is_day).to_string(),
        sunrise: SUNRISE_DISPLAY.to_string(),
        sunset: SUNSET_DISPLAY.to_string(),
    };

    let daily = forecast
        .casts
        .iter()
        .map(to_day_point)
        .collect::<Result<Vec<DayPoint>>>()?;

    let hourly = synthesize_hourly(&daily, current.temperature_c, now, hourly_count);

    Ok(WeatherSnapshot {
        adcode: adcode.to_string(),
        city_name: city_name.to_string(),
        current,
        hourly,
        daily,
    })
}

fn to_day_point(cast: &DayCast) -> Result<DayPoint> {
    let date = NaiveDate::parse_from_str(&cast.date, "%Y-%m-%d")
        .map_err(|e| Error::invalid_payload(format!("bad cast date '{}': {e}", cast.date)))?;
    let epoch_secs = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_default();

    Ok(DayPoint {
        epoch_secs,
        temp_max_c: parse_measure("daytemp", &cast.daytemp)?,
        temp_min_c: parse_measure("nighttemp", &cast.nighttemp)?,
        condition: cast.dayweather.clone(),
        icon: icon_for(&cast.dayweather, true).to_string(),
        precipitation_probability: 0.0,
        uv_index: DEFAULT_UV_INDEX,
    })
}

fn parse_measure(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_payload(format!("non-numeric {field} '{value}'")))
}

/// Invent an hourly series starting at the current local hour.
///
/// Night hours (before 06:00, from 18:00) target the day's minimum, day
/// hours the maximum. Condition and icon come from the selected day's
/// daytime entry even at night, faithfully kept from the original dashboard.
fn synthesize_hourly(
    daily: &[DayPoint],
    current_temp: f64,
    now: DateTime<Local>,
    count: usize,
) -> Vec<HourPoint> {
    let today = &daily[0];
    let tomorrow = daily.get(1).unwrap_or(today);

    let current_hour = i64::from(now.hour());
    let hour_start =
        now.timestamp() - i64::from(now.minute()) * 60 - i64::from(now.second());

    let mut hourly = Vec::with_capacity(count);
    for i in 0..count {
        let offset = i as i64;
        let forecast_hour = (current_hour + offset) % 24;
        let day_boundary_crossed = (current_hour + offset) / 24 >= 1;
        let cast = if day_boundary_crossed { tomorrow } else { today };
        let is_night = forecast_hour < 6 || forecast_hour >= 18;

        let target = if is_night { cast.temp_min_c } else { cast.temp_max_c };
        let temp = if i == 0 {
            current_temp
        } else if i < BLEND_HOURS {
            let weight = i as f64 / BLEND_HOURS as f64;
            current_temp * (1.0 - weight) + target * weight
        } else {
            target
        };

        hourly.push(HourPoint {
            epoch_secs: hour_start + offset * 3600,
            temperature_c: (temp * 10.0).round() / 10.0,
            condition: cast.condition.clone(),
            icon: icon_for(&cast.condition, !is_night).to_string(),
        });
    }

    hourly
}
