//! Life-style indices derived from current conditions: dressing, outdoor
//! sport, car washing and UV exposure. Pure lookups, rendered alongside the
//! weather cards.

/// One piece of advice: a short level label plus a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexAdvice {
    pub level: &'static str,
    pub suggestion: &'static str,
}

const fn advice(level: &'static str, suggestion: &'static str) -> IndexAdvice {
    IndexAdvice { level, suggestion }
}

/// Dressing advice from the feels-like temperature.
pub fn clothing_index(feels_like_c: f64) -> IndexAdvice {
    if feels_like_c >= 30.0 {
        advice("炎热", "轻薄透气的短袖短裤，防晒措施必不可少")
    } else if feels_like_c >= 25.0 {
        advice("热", "短袖短裤，薄外套可选")
    } else if feels_like_c >= 20.0 {
        advice("温暖", "短袖长裤或长袖短裤")
    } else if feels_like_c >= 15.0 {
        advice("舒适", "长袖衬衫，薄长裤或薄夹克")
    } else if feels_like_c >= 10.0 {
        advice("凉爽", "长袖衬衫加薄毛衣，薄夹克")
    } else if feels_like_c >= 5.0 {
        advice("微冷", "毛衣，夹克或轻薄羽绒服")
    } else if feels_like_c >= 0.0 {
        advice("冷", "毛衣，厚外套，围巾")
    } else if feels_like_c >= -5.0 {
        advice("寒冷", "厚羽绒服，厚围巾，手套")
    } else if feels_like_c >= -10.0 {
        advice("极冷", "厚羽绒服，冬帽，手套，厚围巾")
    } else {
        advice("极寒", "多层保暖衣物，尽量减少户外活动")
    }
}

/// Outdoor-sport advice from condition text, temperature and wind speed.
pub fn sport_index(condition: &str, temp_c: f64, wind_speed_mps: f64) -> IndexAdvice {
    const BAD_WEATHER: [&str; 8] = ["雨", "雪", "雷", "暴", "冰雹", "雾", "霾", "沙尘"];

    if BAD_WEATHER.iter().any(|text| condition.contains(text)) {
        return advice("不宜", "当前天气不适合户外运动");
    }
    if temp_c >= 35.0 {
        return advice("不宜", "温度过高，避免户外运动");
    }
    if temp_c <= 0.0 {
        return advice("不宜", "温度过低，避免户外运动");
    }
    if wind_speed_mps >= 10.0 {
        return advice("较不宜", "风速较大，户外运动请注意安全");
    }
    if temp_c >= 28.0 {
        return advice("较不宜", "温度较高，建议清晨或傍晚运动，补充水分");
    }
    if temp_c <= 5.0 {
        return advice("较不宜", "温度较低，建议室内运动或做好保暖");
    }

    advice("适宜", "天气适宜运动，注意补充水分")
}

/// Car-wash advice from condition text.
pub fn car_wash_index(condition: &str) -> IndexAdvice {
    const RAIN: [&str; 5] = ["雨", "雪", "雷", "暴", "冰雹"];
    const DUST: [&str; 3] = ["尘", "沙", "霾"];

    if RAIN.iter().any(|text| condition.contains(text)) {
        return advice("不宜", "有降水，不建议洗车");
    }
    if DUST.iter().any(|text| condition.contains(text)) {
        return advice("不宜", "天气多尘，洗车后易脏");
    }
    if condition.contains("多云") {
        return advice("较不宜", "天气多变，建议观察天气变化");
    }

    advice("适宜", "天气适宜洗车，较少灰尘和降水")
}

/// UV advice by index value; values past the scale clamp to the top band.
pub fn uv_index_advice(uv: u8) -> IndexAdvice {
    match uv {
        0 => advice("最弱", "无需防晒"),
        1 | 2 => advice("弱", "涂抹SPF15防晒霜"),
        3 | 4 => advice("中等", "涂抹SPF30防晒霜，戴帽子"),
        5 | 6 => advice("强", "涂抹SPF50防晒霜，避免长时间户外活动"),
        7 | 8 => advice("很强", "涂抹SPF50+防晒霜，尽量避免户外活动"),
        _ => advice("极强", "避免户外活动"),
    }
}
