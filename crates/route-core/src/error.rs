//! Errors raised while ingesting route data and filter input.

/// Rejected coordinate at the data ingestion boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PositionError {
    #[error("coordinate is not a finite number (lat {lat}, lon {lon})")]
    NonFinite { lat: f64, lon: f64 },

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// Rejected filter form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid ICAO code {0:?} (expected up to 4 alphanumeric characters)")]
    InvalidIcao(String),

    #[error("invalid runway length {0:?} (expected digits with an optional '<' or '>' prefix)")]
    InvalidRunwayLength(String),

    #[error("unknown airport type {0:?}")]
    UnknownAirportType(String),
}
