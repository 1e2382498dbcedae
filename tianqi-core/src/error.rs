use thiserror::Error;

/// Errors produced by the core.
///
/// The suggestion-search path never surfaces these: it degrades to an empty
/// result list so callers can show "no matches" instead of an error. All
/// other paths propagate them with a human-readable message.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure or a non-2xx HTTP status from AMap.
    #[error("AMap {endpoint} request failed: {message}")]
    Network {
        endpoint: &'static str,
        message: String,
    },

    /// AMap answered, but with a failure status or without the expected data.
    #[error("AMap {endpoint} returned no usable data: {message}")]
    Upstream {
        endpoint: &'static str,
        message: String,
    },

    /// Every resolution tier (curated table, remote geocoding) came up empty.
    #[error("no city found for '{query}'")]
    CityNotFound { query: String },

    /// The combined live/forecast payload cannot be turned into a snapshot.
    #[error("invalid weather payload: {reason}")]
    InvalidPayload { reason: String },
}

impl Error {
    pub(crate) fn network(endpoint: &'static str, message: impl Into<String>) -> Self {
        Error::Network { endpoint, message: message.into() }
    }

    pub(crate) fn upstream(endpoint: &'static str, message: impl Into<String>) -> Self {
        Error::Upstream { endpoint, message: message.into() }
    }

    pub(crate) fn invalid_payload(reason: impl Into<String>) -> Self {
        Error::InvalidPayload { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
