//! HTTP client for the AMap (高德地图) web-service REST APIs.
//!
//! Four endpoints are used: forward geocoding, weather (live + forecast),
//! reverse geocoding and IP location. They all share the same failure
//! signalling: HTTP non-2xx, `status != "1"` in the body, or a missing
//! expected array/object.

use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://restapi.amap.com/v3";

#[derive(Debug, Clone)]
pub struct AmapClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl AmapClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different base URL (used by tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn fetch_body(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(endpoint, url = %url, "AMap request");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| Error::network(endpoint, e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::network(endpoint, e.to_string()))?;

        if !status.is_success() {
            return Err(Error::network(
                endpoint,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        Ok(body)
    }

    /// Forward geocoding: free-text address to candidate records.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeoRecord>> {
        let body = self
            .fetch_body("geocode", "/geocode/geo", &[("address", address)])
            .await?;

        let parsed: GeoEnvelope = parse_json("geocode", &body)?;
        if parsed.status != "1" {
            return Err(Error::upstream("geocode", failure_info(&parsed.info)));
        }
        if parsed.geocodes.is_empty() {
            return Err(Error::upstream("geocode", "empty geocode list"));
        }

        Ok(parsed.geocodes)
    }

    /// Live observation for an adcode (`extensions=base`).
    pub async fn live_weather(&self, adcode: &str) -> Result<LiveWeatherRaw> {
        let body = self
            .fetch_body(
                "live weather",
                "/weather/weatherInfo",
                &[("city", adcode), ("extensions", "base")],
            )
            .await?;

        let parsed: WeatherEnvelope = parse_json("live weather", &body)?;
        if parsed.status != "1" {
            return Err(Error::upstream("live weather", failure_info(&parsed.info)));
        }

        parsed
            .lives
            .into_iter()
            .next()
            .ok_or_else(|| Error::upstream("live weather", "empty lives list"))
    }

    /// Daily forecast for an adcode (`extensions=all`).
    pub async fn forecast_weather(&self, adcode: &str) -> Result<ForecastRaw> {
        let body = self
            .fetch_body(
                "forecast",
                "/weather/weatherInfo",
                &[("city", adcode), ("extensions", "all")],
            )
            .await?;

        let parsed: WeatherEnvelope = parse_json("forecast", &body)?;
        if parsed.status != "1" {
            return Err(Error::upstream("forecast", failure_info(&parsed.info)));
        }

        parsed
            .forecasts
            .into_iter()
            .next()
            .ok_or_else(|| Error::upstream("forecast", "empty forecasts list"))
    }

    /// Reverse geocoding: coordinates to an address component.
    pub async fn reverse_geocode(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<AddressComponent> {
        let location = format!("{longitude},{latitude}");
        let body = self
            .fetch_body("regeo", "/geocode/regeo", &[("location", &location)])
            .await?;

        let parsed: RegeoEnvelope = parse_json("regeo", &body)?;
        if parsed.status != "1" {
            return Err(Error::upstream("regeo", failure_info(&parsed.info)));
        }

        parsed
            .regeocode
            .and_then(|r| r.address_component)
            .ok_or_else(|| Error::upstream("regeo", "missing addressComponent"))
    }

    /// Best-effort display address for a bare adcode.
    ///
    /// Queries the regeo endpoint with an `address` parameter, which AMap
    /// answers loosely; `Ok(None)` when nothing usable comes back.
    pub async fn region_label(&self, adcode: &str) -> Result<Option<String>> {
        let body = self
            .fetch_body(
                "regeo",
                "/geocode/regeo",
                &[("extensions", "base"), ("output", "json"), ("address", adcode)],
            )
            .await?;

        let parsed: RegeoEnvelope = parse_json("regeo", &body)?;
        if parsed.status != "1" {
            return Ok(None);
        }

        Ok(parsed
            .regeocode
            .map(|r| r.formatted_address)
            .filter(|addr| !addr.is_empty()))
    }

    /// Locate the caller by requesting IP.
    pub async fn ip_location(&self) -> Result<IpLocation> {
        let body = self.fetch_body("ip location", "/ip", &[]).await?;

        let parsed: IpEnvelope = parse_json("ip location", &body)?;
        if parsed.status != "1" {
            return Err(Error::upstream("ip location", failure_info(&parsed.info)));
        }
        if parsed.adcode.is_empty() {
            return Err(Error::upstream("ip location", "no adcode for this IP"));
        }

        Ok(IpLocation {
            adcode: parsed.adcode,
            city: parsed.city,
            province: parsed.province,
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::upstream(endpoint, format!("unparseable response: {e}")))
}

fn failure_info(info: &str) -> String {
    if info.is_empty() {
        "provider reported failure".to_string()
    } else {
        format!("provider reported failure: {info}")
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

/// AMap returns `[]` instead of a string for absent fields (notably `city`
/// for municipalities); fold anything that is not a string into "".
fn flexible_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Text(String),
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flex::deserialize(deserializer)? {
        Flex::Text(s) => s,
        Flex::Number(n) => n.to_string(),
        Flex::Other(_) => String::new(),
    })
}

#[derive(Debug, Deserialize)]
struct GeoEnvelope {
    #[serde(default, deserialize_with = "flexible_string")]
    status: String,
    #[serde(default, deserialize_with = "flexible_string")]
    info: String,
    #[serde(default)]
    geocodes: Vec<GeoRecord>,
}

/// One forward-geocoding record, as delivered by AMap.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoRecord {
    #[serde(default, deserialize_with = "flexible_string")]
    pub adcode: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub province: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub city: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub district: String,
    /// Administrative level ("市", "区", "县", ...); empty when AMap omits it.
    #[serde(default, deserialize_with = "flexible_string")]
    pub level: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub formatted_address: String,
    /// "longitude,latitude"
    #[serde(default, deserialize_with = "flexible_string")]
    pub location: String,
}

#[derive(Debug, Deserialize)]
struct WeatherEnvelope {
    #[serde(default, deserialize_with = "flexible_string")]
    status: String,
    #[serde(default, deserialize_with = "flexible_string")]
    info: String,
    #[serde(default)]
    lives: Vec<LiveWeatherRaw>,
    #[serde(default)]
    forecasts: Vec<ForecastRaw>,
}

/// Raw live observation (`lives[0]`). Every field arrives as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveWeatherRaw {
    #[serde(default, deserialize_with = "flexible_string")]
    pub province: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub city: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub adcode: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub weather: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub temperature: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub humidity: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub winddirection: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub windpower: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub reporttime: String,
}

/// Raw forecast (`forecasts[0]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastRaw {
    #[serde(default, deserialize_with = "flexible_string")]
    pub province: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub city: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub adcode: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub reporttime: String,
    #[serde(default)]
    pub casts: Vec<DayCast>,
}

/// One daily cast inside a forecast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayCast {
    #[serde(default, deserialize_with = "flexible_string")]
    pub date: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub week: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub dayweather: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub nightweather: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub daytemp: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub nighttemp: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub daywind: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub nightwind: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub daypower: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub nightpower: String,
}

#[derive(Debug, Deserialize)]
struct RegeoEnvelope {
    #[serde(default, deserialize_with = "flexible_string")]
    status: String,
    #[serde(default, deserialize_with = "flexible_string")]
    info: String,
    #[serde(default)]
    regeocode: Option<Regeocode>,
}

#[derive(Debug, Deserialize)]
struct Regeocode {
    #[serde(default, rename = "addressComponent")]
    address_component: Option<AddressComponent>,
    #[serde(default, deserialize_with = "flexible_string")]
    formatted_address: String,
}

/// Reverse-geocoding address component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default, deserialize_with = "flexible_string")]
    pub adcode: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub city: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub district: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub province: String,
}

impl AddressComponent {
    /// The municipality quirk again: `city` is `[]` there, so fall back to
    /// the district.
    pub fn city_or_district(&self) -> &str {
        if self.city.is_empty() { &self.district } else { &self.city }
    }
}

/// IP-based location answer.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub adcode: String,
    pub city: String,
    pub province: String,
}

#[derive(Debug, Deserialize)]
struct IpEnvelope {
    #[serde(default, deserialize_with = "flexible_string")]
    status: String,
    #[serde(default, deserialize_with = "flexible_string")]
    info: String,
    #[serde(default, deserialize_with = "flexible_string")]
    adcode: String,
    #[serde(default, deserialize_with = "flexible_string")]
    city: String,
    #[serde(default, deserialize_with = "flexible_string")]
    province: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_envelope_parses() {
        let body = r#"{
            "status": "1", "count": "1", "info": "OK", "infocode": "10000",
            "lives": [{
                "province": "北京", "city": "北京市", "adcode": "110000",
                "weather": "晴", "temperature": "25", "winddirection": "东南",
                "windpower": "≤3", "humidity": "40", "reporttime": "2024-05-01 10:00:00"
            }]
        }"#;
        let parsed: WeatherEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "1");
        assert_eq!(parsed.lives[0].temperature, "25");
        assert_eq!(parsed.lives[0].windpower, "≤3");
        assert!(parsed.forecasts.is_empty());
    }

    #[test]
    fn municipality_city_array_folds_to_empty() {
        // AMap sends "city": [] inside municipalities.
        let body = r#"{
            "status": "1", "info": "OK",
            "regeocode": {
                "formatted_address": "北京市朝阳区望京街道",
                "addressComponent": {
                    "province": "北京市", "city": [], "district": "朝阳区",
                    "adcode": "110105"
                }
            }
        }"#;
        let parsed: RegeoEnvelope = serde_json::from_str(body).unwrap();
        let component = parsed.regeocode.unwrap().address_component.unwrap();
        assert_eq!(component.city, "");
        assert_eq!(component.city_or_district(), "朝阳区");
    }

    #[test]
    fn geo_record_defaults_missing_fields() {
        let body = r#"{
            "status": "1", "info": "OK",
            "geocodes": [{"adcode": "110105", "province": "北京市"}]
        }"#;
        let parsed: GeoEnvelope = serde_json::from_str(body).unwrap();
        let record = &parsed.geocodes[0];
        assert_eq!(record.adcode, "110105");
        assert_eq!(record.level, "");
        assert_eq!(record.location, "");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "天".repeat(200);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
