//! High-level operations tying resolution, fetching and normalization
//! together. This is the surface rendering layers call into.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;

use crate::amap::AmapClient;
use crate::error::{Error, Result};
use crate::model::{CityCandidate, WeatherSnapshot, DEFAULT_HOURLY_COUNT};
use crate::normalize;
use crate::resolver::CityResolver;

/// How long to wait for a device position before falling back to IP location.
const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Municipalities whose live-weather city name carries a 市 suffix that the
/// display name should not.
const MUNICIPALITY_LIVE_NAMES: [&str; 4] = ["北京市", "上海市", "天津市", "重庆市"];

/// A device position, in WGS-ish degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A source of device positions (GPS, system location service, ...).
///
/// The core ships none; callers plug one in via
/// [`WeatherService::with_position_source`]. Failures are never fatal; the
/// service falls back to IP location.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> anyhow::Result<Position>;
}

#[derive(Debug)]
pub struct WeatherService {
    client: AmapClient,
    resolver: CityResolver,
    hourly_count: usize,
    position_source: Option<Box<dyn PositionSource>>,
}

impl WeatherService {
    pub fn new(client: AmapClient) -> Self {
        Self {
            resolver: CityResolver::new(client.clone()),
            client,
            hourly_count: DEFAULT_HOURLY_COUNT,
            position_source: None,
        }
    }

    /// Override the number of synthesized hourly points.
    pub fn with_hourly_count(mut self, count: usize) -> Self {
        self.hourly_count = count;
        self
    }

    pub fn with_position_source(mut self, source: Box<dyn PositionSource>) -> Self {
        self.position_source = Some(source);
        self
    }

    /// Ranked city suggestions for a partial query. Never fails.
    pub async fn search_suggestions(&self, query: &str) -> Vec<CityCandidate> {
        self.resolver.search(query).await
    }

    /// Resolve free text or an adcode to a single canonical city.
    pub async fn resolve_one(&self, query_or_code: &str) -> Result<CityCandidate> {
        self.resolver.resolve_one(query_or_code).await
    }

    /// Fetch and normalize a full snapshot for a city name or adcode.
    ///
    /// The live and forecast calls run concurrently; both must succeed.
    pub async fn get_full_weather_data(&self, query_or_code: &str) -> Result<WeatherSnapshot> {
        let city = self.resolver.resolve_one(query_or_code).await?;

        let (live, forecast) = tokio::join!(
            self.client.live_weather(&city.adcode),
            self.client.forecast_weather(&city.adcode),
        );
        let (live, forecast) = (live?, forecast?);

        // The live record knows the official city name; prefer it, minus the
        // municipality suffix.
        let name = if live.city.is_empty() {
            city.name.clone()
        } else if MUNICIPALITY_LIVE_NAMES.contains(&live.city.as_str()) {
            live.city.strip_suffix('市').unwrap_or(&live.city).to_string()
        } else {
            live.city.clone()
        };

        tracing::debug!(adcode = %city.adcode, city = %name, "weather snapshot fetched");

        normalize::normalize(
            &live,
            &forecast,
            &name,
            &city.adcode,
            self.hourly_count,
            Local::now(),
        )
    }

    /// Snapshot for wherever the caller currently is.
    ///
    /// Tries the device position source first (bounded by a 10 s timeout),
    /// falling back to IP location on any failure along that path.
    pub async fn get_weather_by_current_location(&self) -> Result<WeatherSnapshot> {
        if let Some(source) = &self.position_source {
            match self.locate_by_device(source.as_ref()).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) => {
                    tracing::warn!(error = %err, "device position failed, falling back to IP location");
                }
            }
        }

        let location = self.client.ip_location().await?;
        tracing::debug!(adcode = %location.adcode, city = %location.city, "located by IP");
        self.get_full_weather_data(&location.adcode).await
    }

    async fn locate_by_device(&self, source: &dyn PositionSource) -> Result<WeatherSnapshot> {
        let position = tokio::time::timeout(POSITION_TIMEOUT, source.current_position())
            .await
            .map_err(|_| Error::network("device position", "position request timed out"))?
            .map_err(|e| Error::network("device position", e.to_string()))?;

        let component = self
            .client
            .reverse_geocode(position.longitude, position.latitude)
            .await?;

        self.get_full_weather_data(&component.adcode).await
    }
}
