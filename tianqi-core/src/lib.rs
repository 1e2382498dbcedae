//! Core library for the `tianqi` weather CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - An HTTP client for the AMap (高德地图) web-service APIs
//! - City resolution: a curated table with a remote geocoding fallback
//! - Normalization of AMap payloads into a unit-agnostic weather schema,
//!   including a synthesized hourly series
//! - Life-style indices (dressing, sport, car wash, UV)
//!
//! It is used by `tianqi-cli`, but can also be reused by other binaries or services.

pub mod amap;
pub mod config;
pub mod curated;
pub mod error;
pub mod icons;
pub mod indices;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod service;

pub use amap::AmapClient;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    CityCandidate, CurrentConditions, DayPoint, HourPoint, TemperatureUnit, WeatherSnapshot,
};
pub use resolver::CityResolver;
pub use service::{Position, PositionSource, WeatherService};
