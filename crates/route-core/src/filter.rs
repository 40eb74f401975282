//! Route search filter criteria and validation of raw form input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::FilterError;

const MAX_ICAO_LEN: usize = 4;
const MAX_RUNWAY_LENGTH_INPUT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirportType {
    /// Any airport type
    #[default]
    #[serde(rename = "")]
    None,
    Large,
    Medium,
    Small,
}

impl FromStr for AirportType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "any" => Ok(Self::None),
            "large" => Ok(Self::Large),
            "medium" => Ok(Self::Medium),
            "small" => Ok(Self::Small),
            _ => Err(FilterError::UnknownAirportType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthSelector {
    #[default]
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
}

/// Runway length predicate in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayLengthFilter {
    pub selector: LengthSelector,
    pub value: u32,
}

impl RunwayLengthFilter {
    /// Parse form text such as `5000`, `>5000` or `<3000`.
    ///
    /// Blank input means no predicate.
    pub fn parse(input: &str) -> Result<Option<Self>, FilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if input.len() > MAX_RUNWAY_LENGTH_INPUT {
            return Err(FilterError::InvalidRunwayLength(input.to_string()));
        }

        let (selector, digits) = match input.as_bytes()[0] {
            b'>' => (LengthSelector::GreaterThan, &input[1..]),
            b'<' => (LengthSelector::LessThan, &input[1..]),
            _ => (LengthSelector::Equal, input),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FilterError::InvalidRunwayLength(input.to_string()));
        }
        let value = digits
            .parse()
            .map_err(|_| FilterError::InvalidRunwayLength(input.to_string()))?;

        Ok(Some(Self { selector, value }))
    }

    pub fn matches(&self, length_ft: u32) -> bool {
        match self.selector {
            LengthSelector::Equal => length_ft == self.value,
            LengthSelector::GreaterThan => length_ft > self.value,
            LengthSelector::LessThan => length_ft < self.value,
        }
    }
}

/// Validated criteria handed to the route search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// ICAO substring, upper case
    pub icao: String,
    pub airport_type: AirportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway_length: Option<RunwayLengthFilter>,
    #[serde(default)]
    pub countries: BTreeSet<String>,
}

impl FilterCriteria {
    /// Build criteria from raw form fields.
    pub fn from_input(
        icao: &str,
        airport_type: &str,
        runway_length: &str,
        countries: &str,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            icao: parse_icao(icao)?,
            airport_type: airport_type.parse()?,
            runway_length: RunwayLengthFilter::parse(runway_length)?,
            countries: parse_countries(countries),
        })
    }
}

/// Upper-case and validate an ICAO substring.
pub fn parse_icao(input: &str) -> Result<String, FilterError> {
    let icao = input.trim().to_ascii_uppercase();
    if icao.len() > MAX_ICAO_LEN || !icao.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FilterError::InvalidIcao(input.to_string()));
    }
    Ok(icao)
}

/// Split a comma separated country list, dropping blanks.
pub fn parse_countries(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|country| !country.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn icao_is_uppercased_and_bounded() {
        assert_eq!(parse_icao("egll").unwrap(), "EGLL");
        assert_eq!(parse_icao("k1").unwrap(), "K1");
        assert_eq!(parse_icao("").unwrap(), "");
        assert!(matches!(parse_icao("EGLLX"), Err(FilterError::InvalidIcao(_))));
        assert!(parse_icao("EG-L").is_err());
        assert!(parse_icao("ÉGLL").is_err());
    }

    #[test]
    fn runway_length_selectors() {
        assert_eq!(RunwayLengthFilter::parse("").unwrap(), None);
        assert_eq!(
            RunwayLengthFilter::parse("5000").unwrap(),
            Some(RunwayLengthFilter {
                selector: LengthSelector::Equal,
                value: 5000
            })
        );
        assert_eq!(
            RunwayLengthFilter::parse(">8000").unwrap().unwrap().selector,
            LengthSelector::GreaterThan
        );
        assert_eq!(
            RunwayLengthFilter::parse("<300").unwrap().unwrap().selector,
            LengthSelector::LessThan
        );
    }

    #[test]
    fn runway_length_rejects_garbage() {
        for input in [">", "5k", ">>10", "1234567", "-100", "<1 2"] {
            assert!(
                RunwayLengthFilter::parse(input).is_err(),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn runway_length_matching() {
        let gt = RunwayLengthFilter::parse(">5000").unwrap().unwrap();
        assert!(gt.matches(5001));
        assert!(!gt.matches(5000));

        let lt = RunwayLengthFilter::parse("<5000").unwrap().unwrap();
        assert!(lt.matches(4999));
        assert!(!lt.matches(5000));

        let eq = RunwayLengthFilter::parse("5000").unwrap().unwrap();
        assert!(eq.matches(5000));
        assert!(!eq.matches(5001));
    }

    #[test]
    fn countries_are_trimmed_and_deduplicated() {
        let countries = parse_countries(" France,Germany , ,France,");
        assert_eq!(
            countries.into_iter().collect::<Vec<_>>(),
            vec!["France".to_string(), "Germany".to_string()]
        );
        assert!(parse_countries("").is_empty());
    }

    #[test]
    fn criteria_serialize_to_search_payload() {
        let criteria = FilterCriteria::from_input("kj", "Large", ">9000", "United States").unwrap();
        assert_eq!(
            serde_json::to_value(&criteria).unwrap(),
            json!({
                "icao": "KJ",
                "airportType": "Large",
                "runwayLength": { "selector": "gt", "value": 9000 },
                "countries": ["United States"]
            })
        );

        let any = FilterCriteria::default();
        assert_eq!(
            serde_json::to_value(&any).unwrap(),
            json!({ "icao": "", "airportType": "", "countries": [] })
        );
    }

    #[test]
    fn unknown_airport_type_is_rejected() {
        assert_eq!("medium".parse::<AirportType>().unwrap(), AirportType::Medium);
        assert!(matches!(
            FilterCriteria::from_input("", "huge", "", ""),
            Err(FilterError::UnknownAirportType(_))
        ));
    }
}
