//! Shared command line argument types.

use clap::{Args, ValueEnum};
use route_core::{FilterCriteria, FilterError};
use route_map::{Endpoint, RouteSortKey};

/// Search filters, as typed into the filter form.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// ICAO code or prefix, up to 4 characters
    #[arg(long, default_value = "")]
    pub icao: String,

    /// Airport size: large, medium or small
    #[arg(long, default_value = "")]
    pub airport_type: String,

    /// Runway length in feet, optionally prefixed with `>` or `<`
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub runway_length: String,

    /// Comma separated country names
    #[arg(long, default_value = "")]
    pub countries: String,
}

impl FilterArgs {
    pub fn is_empty(&self) -> bool {
        [&self.icao, &self.airport_type, &self.runway_length, &self.countries]
            .iter()
            .all(|field| field.trim().is_empty())
    }

    pub fn to_criteria(&self) -> Result<FilterCriteria, FilterError> {
        FilterCriteria::from_input(
            &self.icao,
            &self.airport_type,
            &self.runway_length,
            &self.countries,
        )
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Departure,
    Arrival,
    Distance,
    Time,
}

impl From<SortArg> for RouteSortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Departure => RouteSortKey::Departure,
            SortArg::Arrival => RouteSortKey::Arrival,
            SortArg::Distance => RouteSortKey::Distance,
            SortArg::Time => RouteSortKey::Time,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointArg {
    Departure,
    Arrival,
}

impl From<EndpointArg> for Endpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Departure => Endpoint::Departure,
            EndpointArg::Arrival => Endpoint::Arrival,
        }
    }
}
