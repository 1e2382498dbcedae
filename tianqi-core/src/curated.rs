//! Hand-maintained table of major cities, checked before any remote call.
//!
//! Covers the four province-level municipalities, the two special
//! administrative regions and the most commonly searched prefecture cities.
//! Adcodes and coordinates follow AMap's administrative-division data.

/// One curated entry. `key` is the short name users actually type.
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedCity {
    pub key: &'static str,
    pub adcode: &'static str,
    /// Official city name, e.g. "北京市" or "香港特别行政区".
    pub city: &'static str,
    pub province: &'static str,
    pub level: &'static str,
    pub longitude: f64,
    pub latitude: f64,
    /// Province-level municipality or special administrative region.
    pub municipality: bool,
}

pub const CURATED_CITIES: &[CuratedCity] = &[
    CuratedCity { key: "北京", adcode: "110000", city: "北京市", province: "北京市", level: "市", longitude: 116.407394, latitude: 39.904211, municipality: true },
    CuratedCity { key: "上海", adcode: "310000", city: "上海市", province: "上海市", level: "市", longitude: 121.473667, latitude: 31.230525, municipality: true },
    CuratedCity { key: "天津", adcode: "120000", city: "天津市", province: "天津市", level: "市", longitude: 117.190186, latitude: 39.125595, municipality: true },
    CuratedCity { key: "重庆", adcode: "500000", city: "重庆市", province: "重庆市", level: "市", longitude: 106.504959, latitude: 29.533155, municipality: true },
    CuratedCity { key: "香港", adcode: "810000", city: "香港特别行政区", province: "香港特别行政区", level: "特别行政区", longitude: 114.173355, latitude: 22.320047, municipality: true },
    CuratedCity { key: "澳门", adcode: "820000", city: "澳门特别行政区", province: "澳门特别行政区", level: "特别行政区", longitude: 113.549088, latitude: 22.198952, municipality: true },
    CuratedCity { key: "广州", adcode: "440100", city: "广州市", province: "广东省", level: "市", longitude: 113.280637, latitude: 23.125178, municipality: false },
    CuratedCity { key: "深圳", adcode: "440300", city: "深圳市", province: "广东省", level: "市", longitude: 114.085947, latitude: 22.547, municipality: false },
    CuratedCity { key: "杭州", adcode: "330100", city: "杭州市", province: "浙江省", level: "市", longitude: 120.153576, latitude: 30.287459, municipality: false },
    CuratedCity { key: "南京", adcode: "320100", city: "南京市", province: "江苏省", level: "市", longitude: 118.767413, latitude: 32.041544, municipality: false },
    CuratedCity { key: "成都", adcode: "510100", city: "成都市", province: "四川省", level: "市", longitude: 104.065735, latitude: 30.659462, municipality: false },
    CuratedCity { key: "武汉", adcode: "420100", city: "武汉市", province: "湖北省", level: "市", longitude: 114.298572, latitude: 30.584355, municipality: false },
    CuratedCity { key: "西安", adcode: "610100", city: "西安市", province: "陕西省", level: "市", longitude: 108.948024, latitude: 34.263161, municipality: false },
    CuratedCity { key: "苏州", adcode: "320500", city: "苏州市", province: "江苏省", level: "市", longitude: 120.619585, latitude: 31.299379, municipality: false },
    CuratedCity { key: "长沙", adcode: "430100", city: "长沙市", province: "湖南省", level: "市", longitude: 112.982279, latitude: 28.19409, municipality: false },
    CuratedCity { key: "沈阳", adcode: "210100", city: "沈阳市", province: "辽宁省", level: "市", longitude: 123.429096, latitude: 41.796767, municipality: false },
    CuratedCity { key: "青岛", adcode: "370200", city: "青岛市", province: "山东省", level: "市", longitude: 120.355173, latitude: 36.082982, municipality: false },
    CuratedCity { key: "郑州", adcode: "410100", city: "郑州市", province: "河南省", level: "市", longitude: 113.665412, latitude: 34.757975, municipality: false },
    CuratedCity { key: "大连", adcode: "210200", city: "大连市", province: "辽宁省", level: "市", longitude: 121.618622, latitude: 38.91459, municipality: false },
    CuratedCity { key: "宁波", adcode: "330200", city: "宁波市", province: "浙江省", level: "市", longitude: 121.549792, latitude: 29.868388, municipality: false },
    CuratedCity { key: "厦门", adcode: "350200", city: "厦门市", province: "福建省", level: "市", longitude: 118.11022, latitude: 24.490474, municipality: false },
    CuratedCity { key: "福州", adcode: "350100", city: "福州市", province: "福建省", level: "市", longitude: 119.306239, latitude: 26.075302, municipality: false },
    CuratedCity { key: "济南", adcode: "370100", city: "济南市", province: "山东省", level: "市", longitude: 117.000923, latitude: 36.675807, municipality: false },
    CuratedCity { key: "哈尔滨", adcode: "230100", city: "哈尔滨市", province: "黑龙江省", level: "市", longitude: 126.642464, latitude: 45.756967, municipality: false },
    CuratedCity { key: "长春", adcode: "220100", city: "长春市", province: "吉林省", level: "市", longitude: 125.3245, latitude: 43.886841, municipality: false },
];

/// Short names of the municipalities/SARs, for containment checks against
/// remote results.
pub const MUNICIPALITY_KEYS: [&str; 6] = ["北京", "上海", "天津", "重庆", "香港", "澳门"];

/// Full official names of the municipalities/SARs, for display-name stripping.
pub const MUNICIPALITY_CITY_NAMES: [&str; 6] =
    ["北京市", "上海市", "天津市", "重庆市", "香港特别行政区", "澳门特别行政区"];

/// True when `text` mentions any municipality/SAR short name.
pub fn contains_municipality(text: &str) -> bool {
    MUNICIPALITY_KEYS.iter().any(|key| text.contains(key))
}

/// True when `name` is exactly a municipality/SAR official name.
pub fn is_municipality_city(name: &str) -> bool {
    MUNICIPALITY_CITY_NAMES.contains(&name)
}

/// Exact curated lookup by short key, with a trailing "市" tolerated.
pub fn by_key(query: &str) -> Option<&'static CuratedCity> {
    let clean = query.strip_suffix('市').unwrap_or(query);
    CURATED_CITIES.iter().find(|entry| entry.key == clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_25_unique_adcodes() {
        assert_eq!(CURATED_CITIES.len(), 25);
        let mut adcodes: Vec<_> = CURATED_CITIES.iter().map(|c| c.adcode).collect();
        adcodes.sort_unstable();
        adcodes.dedup();
        assert_eq!(adcodes.len(), 25);
    }

    #[test]
    fn six_municipalities_flagged() {
        let count = CURATED_CITIES.iter().filter(|c| c.municipality).count();
        assert_eq!(count, 6);
    }

    #[test]
    fn by_key_strips_city_suffix() {
        assert_eq!(by_key("北京").unwrap().adcode, "110000");
        assert_eq!(by_key("北京市").unwrap().adcode, "110000");
        assert_eq!(by_key("伦敦"), None);
    }

    #[test]
    fn municipality_containment() {
        assert!(contains_municipality("北京市朝阳区"));
        assert!(!contains_municipality("广州市"));
        assert!(is_municipality_city("香港特别行政区"));
        assert!(!is_municipality_city("香港"));
    }
}
