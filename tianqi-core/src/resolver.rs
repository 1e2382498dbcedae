//! City resolution: free text (or a bare adcode) to a canonical city.
//!
//! Resolution walks an ordered fallback chain. The curated table is always
//! consulted before the network: an exact hit short-circuits, a partial hit
//! wins over the remote geocoder even when the remote call would succeed.

use crate::amap::{AmapClient, GeoRecord};
use crate::curated::{self, CuratedCity, CURATED_CITIES};
use crate::error::{Error, Result};
use crate::model::CityCandidate;

/// At most this many candidates per search.
pub const MAX_CANDIDATES: usize = 8;

/// Which tier of the fallback chain produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Exact curated-table hit.
    Exact,
    /// Curated-table substring hit.
    Partial,
    /// Remote geocoding.
    Remote,
}

#[derive(Debug)]
struct Resolution {
    tier: MatchTier,
    records: Vec<GeoRecord>,
}

#[derive(Debug, Clone)]
pub struct CityResolver {
    client: AmapClient,
}

impl CityResolver {
    pub fn new(client: AmapClient) -> Self {
        Self { client }
    }

    /// Ranked candidate search. Infallible: remote failures are logged and
    /// degrade to an empty list, so suggestion UIs simply show nothing.
    pub async fn search(&self, query: &str) -> Vec<CityCandidate> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let resolution = self.search_tiered(query).await;
        tracing::debug!(query, tier = ?resolution.tier, hits = resolution.records.len(), "city search");

        resolution.records.iter().map(to_candidate).collect()
    }

    /// Resolve to exactly one city, or fail with `CityNotFound`.
    pub async fn resolve_one(&self, query_or_code: &str) -> Result<CityCandidate> {
        let input = query_or_code.trim();

        // Curated key (with a trailing 市 tolerated) maps straight to its adcode.
        if let Some(entry) = curated::by_key(input) {
            let mut candidate = to_candidate(&entry.to_record());
            candidate.name = input.strip_suffix('市').unwrap_or(input).to_string();
            return Ok(candidate);
        }

        // Purely numeric input is already an adcode.
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            let name = self.adcode_display_name(input).await;
            return Ok(CityCandidate {
                adcode: input.to_string(),
                name,
                province: String::new(),
                city: String::new(),
                district: String::new(),
                level: String::new(),
                longitude: 0.0,
                latitude: 0.0,
            });
        }

        self.search(input)
            .await
            .into_iter()
            .next()
            .ok_or_else(|| Error::CityNotFound { query: input.to_string() })
    }

    async fn search_tiered(&self, query: &str) -> Resolution {
        // Tier 1: exact curated match.
        for entry in CURATED_CITIES {
            if query == entry.key
                || query == format!("{}市", entry.key)
                || query == entry.city
            {
                return Resolution { tier: MatchTier::Exact, records: vec![entry.to_record()] };
            }
        }

        // Tier 2: partial curated match, bidirectional containment.
        let mut partial: Vec<&CuratedCity> = CURATED_CITIES
            .iter()
            .filter(|entry| {
                entry.key.contains(query)
                    || query.contains(entry.key)
                    || entry.city.contains(query)
                    || query.contains(entry.city)
            })
            .collect();

        if !partial.is_empty() {
            rank_partial_matches(&mut partial, query);
            partial.truncate(MAX_CANDIDATES);
            return Resolution {
                tier: MatchTier::Partial,
                records: partial.iter().map(|entry| entry.to_record()).collect(),
            };
        }

        // Tier 3: remote geocoding.
        let sanitized = sanitize_query(query);
        let records = match self.client.geocode(&sanitized).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(query, error = %err, "geocode fallback failed, retrying curated table");
                return Resolution {
                    tier: MatchTier::Partial,
                    records: curated_retry(query),
                };
            }
        };

        Resolution { tier: MatchTier::Remote, records: shape_remote_records(records) }
    }

    /// Best-effort display name for a bare adcode; the code itself is the
    /// placeholder when the lookup yields nothing.
    async fn adcode_display_name(&self, adcode: &str) -> String {
        match self.client.region_label(adcode).await {
            Ok(Some(address)) => region_display_name(&address, adcode),
            Ok(None) => adcode.to_string(),
            Err(err) => {
                tracing::warn!(adcode, error = %err, "adcode name lookup failed, using code as name");
                adcode.to_string()
            }
        }
    }
}

/// Rank a partial-match set: display-name matches (exact, or exact after
/// stripping the 市 suffix) first, then closer string-length match.
///
/// The length ratio `max(qlen/clen, clen/qlen)` is 1.0 for equal lengths and
/// grows with the mismatch, so closer matches sort with the smaller ratio.
fn rank_partial_matches(matches: &mut [&CuratedCity], query: &str) {
    let ratio = |entry: &CuratedCity| {
        let q = query.chars().count() as f64;
        let c = entry.city.chars().count() as f64;
        (q / c).max(c / q)
    };
    let exact = |entry: &CuratedCity| {
        entry.city == query || entry.city.strip_suffix('市').unwrap_or(entry.city) == query
    };

    matches.sort_by(|a, b| {
        exact(b)
            .cmp(&exact(a))
            .then_with(|| ratio(a).total_cmp(&ratio(b)))
    });
}

/// The post-failure curated pass: key containment only.
fn curated_retry(query: &str) -> Vec<GeoRecord> {
    CURATED_CITIES
        .iter()
        .filter(|entry| entry.key.contains(query) || query.contains(entry.key))
        .map(|entry| entry.to_record())
        .collect()
}

/// Filter and order remote geocoding records.
///
/// Keeps city/district/county-level entries (anything without a level
/// classification is dropped), always keeps records naming a municipality,
/// and orders municipality > city > district/county.
fn shape_remote_records(records: Vec<GeoRecord>) -> Vec<GeoRecord> {
    let mut kept: Vec<GeoRecord> = records
        .into_iter()
        .filter(|record| {
            if record.level.is_empty() {
                return false;
            }
            if curated::contains_municipality(&record.city) {
                return true;
            }
            record.level.contains('市')
                || record.level.contains('区')
                || record.level.contains('县')
                || !record.city.is_empty()
        })
        .collect();

    kept.sort_by_key(|record| {
        let municipality = curated::contains_municipality(&record.city);
        let city = record.level.contains('市');
        let district = record.level.contains('区') || record.level.contains('县');
        (!municipality, !city, !district)
    });
    kept.truncate(MAX_CANDIDATES);
    kept
}

/// Strip everything outside letters/digits/whitespace and cap the length,
/// before the query goes into a URL.
fn sanitize_query(query: &str) -> String {
    query
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .take(50)
        .collect()
}

/// Map a raw record to the canonical candidate shape, picking the display
/// name: district (when distinct) > city > address fragment > 未知地区.
fn to_candidate(record: &GeoRecord) -> CityCandidate {
    let (longitude, latitude) = parse_location(&record.location);

    let name = if !record.district.is_empty() && record.district != record.city {
        record.district.clone()
    } else if !record.city.is_empty() {
        if curated::is_municipality_city(&record.city) {
            strip_municipality_suffix(&record.city).to_string()
        } else {
            record.city.clone()
        }
    } else if !record.district.is_empty() {
        record.district.clone()
    } else if !record.formatted_address.is_empty() {
        address_fragment(&record.formatted_address)
    } else {
        "未知地区".to_string()
    };

    CityCandidate {
        adcode: record.adcode.clone(),
        name,
        province: record.province.clone(),
        city: record.city.clone(),
        district: record.district.clone(),
        level: record.level.clone(),
        longitude,
        latitude,
    }
}

fn strip_municipality_suffix(city: &str) -> &str {
    city.strip_suffix('市')
        .or_else(|| city.strip_suffix("特别行政区"))
        .unwrap_or(city)
}

fn address_fragment(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').collect();
    if parts.len() > 1 && parts[0].contains('省') {
        parts[1].to_string()
    } else {
        parts[0].to_string()
    }
}

/// Derive a short name out of a regeo formatted address, e.g.
/// "浙江省杭州市西湖区..." → "杭州".
fn region_display_name(formatted: &str, adcode: &str) -> String {
    let after_province = formatted.rsplit('省').next().unwrap_or(formatted);
    let name = after_province.split('市').next().unwrap_or("");
    if name.is_empty() || name == adcode {
        formatted.to_string()
    } else {
        name.to_string()
    }
}

fn parse_location(location: &str) -> (f64, f64) {
    let mut parts = location.split(',');
    let longitude = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0.0);
    let latitude = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0.0);
    (longitude, latitude)
}

impl CuratedCity {
    pub(crate) fn to_record(&self) -> GeoRecord {
        GeoRecord {
            adcode: self.adcode.to_string(),
            province: self.province.to_string(),
            city: self.city.to_string(),
            district: String::new(),
            level: self.level.to_string(),
            formatted_address: String::new(),
            location: format!("{},{}", self.longitude, self.latitude),
        }
    }
}
