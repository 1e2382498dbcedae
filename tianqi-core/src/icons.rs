//! Mapping from AMap condition phrases to internal icon keys.

/// (condition, day icon, night icon)
const ICON_MAP: &[(&str, &str, &str)] = &[
    ("晴", "CLEAR_DAY", "CLEAR_NIGHT"),
    ("多云", "PARTLY_CLOUDY_DAY", "PARTLY_CLOUDY_NIGHT"),
    ("阴", "CLOUDY", "CLOUDY"),
    ("小雨", "RAIN", "RAIN"),
    ("中雨", "RAIN", "RAIN"),
    ("大雨", "RAIN", "RAIN"),
    ("暴雨", "RAIN", "RAIN"),
    ("雷阵雨", "THUNDERSTORM", "THUNDERSTORM"),
    ("雷电", "THUNDERSTORM", "THUNDERSTORM"),
    ("阵雨", "RAIN_DAY", "RAIN_NIGHT"),
    ("小雪", "SNOW", "SNOW"),
    ("中雪", "SNOW", "SNOW"),
    ("大雪", "SNOW", "SNOW"),
    ("暴雪", "SNOW", "SNOW"),
    ("阵雪", "SNOW", "SNOW"),
    ("雨夹雪", "SNOW", "SNOW"),
    ("雾", "FOG", "FOG"),
    ("霾", "FOG", "FOG"),
    ("沙尘暴", "FOG", "FOG"),
    ("浮尘", "FOG", "FOG"),
    ("扬沙", "FOG", "FOG"),
    ("强沙尘暴", "FOG", "FOG"),
    ("热", "CLOUDY", "CLOUDY"),
    ("冷", "CLOUDY", "CLOUDY"),
    ("未知", "CLOUDY", "CLOUDY"),
];

/// Icon key for a condition phrase. Unmapped conditions fall back to CLOUDY.
pub fn icon_for(condition: &str, is_day: bool) -> &'static str {
    for (name, day, night) in ICON_MAP {
        if *name == condition {
            return if is_day { day } else { night };
        }
    }
    "CLOUDY"
}
