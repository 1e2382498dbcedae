//! Terminal rendering of weather snapshots. All temperature conversion
//! happens here; the core hands over Celsius values.

use chrono::{DateTime, Datelike, Local, TimeZone, Weekday};
use tianqi_core::normalize::wind_direction_label;
use tianqi_core::{indices, TemperatureUnit, WeatherSnapshot};

/// Hourly entries shown in the preview row.
const HOURLY_PREVIEW: usize = 8;

pub fn snapshot(snapshot: &WeatherSnapshot, unit: TemperatureUnit) {
    let current = &snapshot.current;

    println!();
    println!("{}  {}", snapshot.city_name, current.condition);
    println!(
        "{}  体感 {}",
        temperature(current.temperature_c, unit),
        temperature(current.feels_like_c, unit)
    );
    println!(
        "{} {:.1} m/s | 湿度 {:.0}% | 气压 {:.0} hPa",
        wind_direction_label(current.wind_direction_deg),
        current.wind_speed_mps,
        current.humidity_pct,
        current.pressure_hpa
    );
    println!("日出 {} | 日落 {}", current.sunrise, current.sunset);

    if !snapshot.hourly.is_empty() {
        println!();
        for point in snapshot.hourly.iter().take(HOURLY_PREVIEW) {
            print!("{} {}  ", clock(point.epoch_secs), temperature(point.temperature_c, unit));
        }
        println!();
    }

    if !snapshot.daily.is_empty() {
        println!();
        for day in &snapshot.daily {
            println!(
                "{}  {:<4} {} ~ {}",
                weekday(day.epoch_secs),
                day.condition,
                temperature(day.temp_min_c, unit),
                temperature(day.temp_max_c, unit)
            );
        }
    }

    println!();
    let clothing = indices::clothing_index(current.feels_like_c);
    let sport = indices::sport_index(&current.condition, current.temperature_c, current.wind_speed_mps);
    let car_wash = indices::car_wash_index(&current.condition);
    let uv = indices::uv_index_advice(snapshot.daily.first().map_or(5, |d| d.uv_index));
    println!("穿衣: {} — {}", clothing.level, clothing.suggestion);
    println!("运动: {} — {}", sport.level, sport.suggestion);
    println!("洗车: {} — {}", car_wash.level, car_wash.suggestion);
    println!("紫外线: {} — {}", uv.level, uv.suggestion);
}

fn temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.0}{}", unit.from_celsius(celsius), unit.symbol())
}

fn clock(epoch_secs: i64) -> String {
    local_time(epoch_secs).map_or_else(|| "--:--".to_string(), |dt| dt.format("%H:%M").to_string())
}

fn weekday(epoch_secs: i64) -> &'static str {
    match local_time(epoch_secs).map(|dt| dt.weekday()) {
        Some(Weekday::Mon) => "周一",
        Some(Weekday::Tue) => "周二",
        Some(Weekday::Wed) => "周三",
        Some(Weekday::Thu) => "周四",
        Some(Weekday::Fri) => "周五",
        Some(Weekday::Sat) => "周六",
        Some(Weekday::Sun) => "周日",
        None => "--",
    }
}

fn local_time(epoch_secs: i64) -> Option<DateTime<Local>> {
    Local.timestamp_opt(epoch_secs, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_formatting_converts_units() {
        assert_eq!(temperature(20.0, TemperatureUnit::Celsius), "20°C");
        assert_eq!(temperature(20.0, TemperatureUnit::Fahrenheit), "68°F");
        assert_eq!(temperature(20.6, TemperatureUnit::Celsius), "21°C");
    }
}
