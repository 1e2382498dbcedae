//! End-to-end tests against a mocked AMap server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tianqi_core::service::{Position, PositionSource, WeatherService};
use tianqi_core::{AmapClient, CityResolver, Error};

fn client_for(server: &MockServer) -> AmapClient {
    AmapClient::with_base_url("TESTKEY", server.uri())
}

async fn mount_weather(server: &MockServer, city: &str, adcode: &str) {
    Mock::given(method("GET"))
        .and(path("/weather/weatherInfo"))
        .and(query_param("extensions", "base"))
        .and(query_param("city", adcode))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "count": "1", "info": "OK", "infocode": "10000",
            "lives": [{
                "province": "测试省", "city": city, "adcode": adcode,
                "weather": "多云", "temperature": "21.5", "humidity": "55",
                "winddirection": "西北", "windpower": "4",
                "reporttime": "2024-05-01 10:00:00"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather/weatherInfo"))
        .and(query_param("extensions", "all"))
        .and(query_param("city", adcode))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "count": "1", "info": "OK", "infocode": "10000",
            "forecasts": [{
                "province": "测试省", "city": city, "adcode": adcode,
                "reporttime": "2024-05-01 10:00:00",
                "casts": [
                    {"date": "2024-05-01", "week": "3", "dayweather": "多云",
                     "nightweather": "晴", "daytemp": "26", "nighttemp": "14",
                     "daywind": "西北", "nightwind": "西北", "daypower": "4", "nightpower": "4"},
                    {"date": "2024-05-02", "week": "4", "dayweather": "晴",
                     "nightweather": "晴", "daytemp": "28", "nighttemp": "16",
                     "daywind": "西北", "nightwind": "西北", "daypower": "4", "nightpower": "4"}
                ]
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_weather_for_curated_city() {
    let server = MockServer::start().await;
    mount_weather(&server, "北京市", "110000").await;

    let service = WeatherService::new(client_for(&server));
    let snapshot = service.get_full_weather_data("北京").await.unwrap();

    assert_eq!(snapshot.adcode, "110000");
    // Live payload's city name wins, municipality suffix stripped.
    assert_eq!(snapshot.city_name, "北京");
    assert_eq!(snapshot.current.temperature_c, 21.5);
    assert_eq!(snapshot.current.humidity_pct, 55.0);
    assert_eq!(snapshot.current.wind_speed_mps, 5.5);
    assert_eq!(snapshot.current.wind_direction_deg, 315.0);
    assert_eq!(snapshot.daily.len(), 2);
    assert_eq!(snapshot.hourly.len(), 24);
    assert_eq!(snapshot.hourly[0].temperature_c, 21.5);
}

#[tokio::test]
async fn live_city_name_overrides_resolved_name() {
    let server = MockServer::start().await;
    mount_weather(&server, "苏州市", "320500").await;

    let service = WeatherService::new(client_for(&server));
    let snapshot = service.get_full_weather_data("320500").await.unwrap();

    // Numeric adcode path; regeo label lookup is unmocked, but the live
    // record still names the city.
    assert_eq!(snapshot.city_name, "苏州市");
}

#[tokio::test]
async fn hourly_count_is_configurable() {
    let server = MockServer::start().await;
    mount_weather(&server, "北京市", "110000").await;

    let service = WeatherService::new(client_for(&server)).with_hourly_count(12);
    let snapshot = service.get_full_weather_data("北京").await.unwrap();
    assert_eq!(snapshot.hourly.len(), 12);
}

#[tokio::test]
async fn provider_failure_status_propagates_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/weatherInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0", "info": "INVALID_USER_KEY", "infocode": "10001"
        })))
        .mount(&server)
        .await;

    let service = WeatherService::new(client_for(&server));
    let err = service.get_full_weather_data("北京").await.unwrap_err();

    assert!(matches!(err, Error::Upstream { .. }));
    assert!(err.to_string().contains("INVALID_USER_KEY"));
}

#[tokio::test]
async fn http_error_fails_the_whole_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/weatherInfo"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let service = WeatherService::new(client_for(&server));
    let err = service.get_full_weather_data("北京").await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

#[tokio::test]
async fn remote_search_filters_and_orders_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/geo"))
        .and(query_param("address", "朝阳"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "info": "OK", "count": "3",
            "geocodes": [
                {"adcode": "110105", "province": "北京市", "city": "北京市",
                 "district": "朝阳区", "level": "区县",
                 "formatted_address": "北京市朝阳区", "location": "116.443205,39.921530"},
                {"adcode": "211300", "province": "辽宁省", "city": "朝阳市",
                 "district": [], "level": "市",
                 "formatted_address": "辽宁省朝阳市", "location": "120.450372,41.573734"},
                {"adcode": "100000", "province": "某省", "city": [],
                 "district": [], "formatted_address": "某省", "location": ""}
            ]
        })))
        .mount(&server)
        .await;

    let resolver = CityResolver::new(client_for(&server));
    let results = resolver.search("朝阳").await;

    // The level-less record is dropped; municipality first, then 市, then 区县.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].adcode, "110105");
    assert_eq!(results[0].name, "朝阳区");
    assert_eq!(results[1].adcode, "211300");
    assert_eq!(results[1].name, "朝阳市");
    assert_eq!(results[1].longitude, 120.450372);
}

#[tokio::test]
async fn resolve_one_prefers_district_level_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/geo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "info": "OK",
            "geocodes": [
                {"adcode": "110105", "province": "北京市", "city": "北京市",
                 "district": "朝阳区", "level": "区县",
                 "formatted_address": "北京市朝阳区", "location": "116.443205,39.921530"}
            ]
        })))
        .mount(&server)
        .await;

    let resolver = CityResolver::new(client_for(&server));
    let city = resolver.resolve_one("朝阳").await.unwrap();
    assert_eq!(city.adcode, "110105");
    assert_eq!(city.name, "朝阳区");
}

#[tokio::test]
async fn geocode_failure_degrades_search_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/geo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0", "info": "DAILY_QUERY_OVER_LIMIT", "infocode": "10003"
        })))
        .mount(&server)
        .await;

    let resolver = CityResolver::new(client_for(&server));
    assert!(resolver.search("朝阳").await.is_empty());
}

#[tokio::test]
async fn ip_fallback_without_position_source() {
    let server = MockServer::start().await;
    mount_weather(&server, "北京市", "110000").await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "info": "OK", "infocode": "10000",
            "province": "北京市", "city": "北京市", "adcode": "110000",
            "rectangle": "116.0119343,39.66127144;116.7829835,40.2164962"
        })))
        .mount(&server)
        .await;

    let service = WeatherService::new(client_for(&server));
    let snapshot = service.get_weather_by_current_location().await.unwrap();
    assert_eq!(snapshot.adcode, "110000");
    assert_eq!(snapshot.city_name, "北京");
}

#[derive(Debug)]
struct FixedPosition(Position);

#[async_trait::async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> anyhow::Result<Position> {
        Ok(self.0)
    }
}

#[derive(Debug)]
struct DeniedPosition;

#[async_trait::async_trait]
impl PositionSource for DeniedPosition {
    async fn current_position(&self) -> anyhow::Result<Position> {
        Err(anyhow::anyhow!("permission denied"))
    }
}

#[tokio::test]
async fn device_position_resolves_through_reverse_geocode() {
    let server = MockServer::start().await;
    mount_weather(&server, "杭州市", "330100").await;
    Mock::given(method("GET"))
        .and(path("/geocode/regeo"))
        .and(query_param("location", "120.153576,30.287459"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "info": "OK", "infocode": "10000",
            "regeocode": {
                "formatted_address": "浙江省杭州市西湖区",
                "addressComponent": {
                    "province": "浙江省", "city": "杭州市",
                    "district": "西湖区", "adcode": "330100"
                }
            }
        })))
        .mount(&server)
        .await;

    let service = WeatherService::new(client_for(&server)).with_position_source(Box::new(
        FixedPosition(Position { latitude: 30.287459, longitude: 120.153576 }),
    ));

    let snapshot = service.get_weather_by_current_location().await.unwrap();
    assert_eq!(snapshot.adcode, "330100");
    assert_eq!(snapshot.city_name, "杭州市");
}

#[tokio::test]
async fn denied_position_falls_back_to_ip() {
    let server = MockServer::start().await;
    mount_weather(&server, "北京市", "110000").await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1", "info": "OK",
            "province": "北京市", "city": "北京市", "adcode": "110000"
        })))
        .mount(&server)
        .await;

    let service = WeatherService::new(client_for(&server))
        .with_position_source(Box::new(DeniedPosition));

    let snapshot = service.get_weather_by_current_location().await.unwrap();
    assert_eq!(snapshot.adcode, "110000");
}
