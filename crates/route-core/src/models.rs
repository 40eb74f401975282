//! Core data models for route search results.
//!
//! The wire shape matches the JSON returned by the route search endpoint.
//! Optional fields are omitted when unknown, never serialized as `null`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PositionError;

/// A point on the globe in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Values coming off the wire are validated during deserialization so
/// that NaN never reaches the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPosition")]
pub struct GeoPosition {
    latitude_deg: f64,
    longitude_deg: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosition {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl TryFrom<RawPosition> for GeoPosition {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        GeoPosition::new(raw.latitude_deg, raw.longitude_deg)
    }
}

impl GeoPosition {
    /// Validate a coordinate pair, wrapping longitude into [-180, 180].
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, PositionError> {
        if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
            return Err(PositionError::NonFinite {
                lat: latitude_deg,
                lon: longitude_deg,
            });
        }
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(PositionError::LatitudeOutOfRange(latitude_deg));
        }
        Ok(Self::wrapped(latitude_deg, longitude_deg))
    }

    /// Build from values computed in `geo`. Latitude is clamped rather
    /// than rejected to absorb floating point drift at the poles.
    pub(crate) fn wrapped(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg: latitude_deg.clamp(-90.0, 90.0),
            longitude_deg: wrap_longitude(longitude_deg),
        }
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }
}

/// Wrap a longitude in degrees into [-180, 180]. Both edges of the
/// antimeridian are kept as given; anything beyond wraps into [-180, 180).
pub fn wrap_longitude(longitude_deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude_deg) {
        return longitude_deg;
    }
    (longitude_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// One physical end of a runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayMarker {
    pub name: String,
    /// Unsurveyed ends have no position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPosition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runway {
    #[serde(rename = "lengthFT", default, skip_serializing_if = "Option::is_none")]
    pub length_ft: Option<u32>,
    #[serde(rename = "widthFT", default, skip_serializing_if = "Option::is_none")]
    pub width_ft: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north_marker: Option<RunwayMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub south_marker: Option<RunwayMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
}

impl Runway {
    /// Both runway ends when both have a surveyed position.
    pub fn surveyed_ends(&self) -> Option<((&str, GeoPosition), (&str, GeoPosition))> {
        let north = self.north_marker.as_ref()?;
        let south = self.south_marker.as_ref()?;
        Some((
            (north.name.as_str(), north.position?),
            (south.name.as_str(), south.position?),
        ))
    }

    /// Human readable designator such as `09 / 27`.
    pub fn designator(&self) -> String {
        let side = |marker: &Option<RunwayMarker>| {
            marker
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "n/a".to_string())
        };
        format!("{} / {}", side(&self.north_marker), side(&self.south_marker))
    }
}

/// Radio frequencies published for an airport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frequencies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_departure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub icao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: GeoPosition,
    #[serde(default)]
    pub runways: Vec<Runway>,
    #[serde(default)]
    pub frequencies: Frequencies,
    pub country_name: String,
}

/// Estimated flight time, carried on the wire as fractional hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTime {
    hours: f64,
}

impl RouteTime {
    pub fn from_hours(hours: f64) -> Self {
        Self { hours }
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self {
            hours: duration.num_milliseconds() as f64 / 3_600_000.0,
        }
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn as_duration(&self) -> Duration {
        Duration::milliseconds((self.hours * 3_600_000.0).round() as i64)
    }
}

impl fmt::Display for RouteTime {
    /// `H:MM`, minutes truncated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.hours.floor();
        let minutes = ((self.hours - hours) * 60.0).floor();
        write!(f, "{}:{:02}", hours as i64, minutes as i64)
    }
}

/// A candidate route between two airports.
///
/// `distance` is informational (nautical miles); renderers derive all
/// geometry from the airport positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: Airport,
    pub to: Airport,
    pub distance: f64,
    pub time: RouteTime,
}

impl Route {
    pub fn rounded_distance_nm(&self) -> i64 {
        self.distance.round() as i64
    }

    pub fn formatted_time(&self) -> String {
        self.time.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_wraps_longitude() {
        let pos = GeoPosition::new(10.0, 190.0).unwrap();
        assert!((pos.longitude_deg() - -170.0).abs() < 1e-9);

        let pos = GeoPosition::new(10.0, -180.0).unwrap();
        assert_eq!(pos.longitude_deg(), -180.0);

        let pos = GeoPosition::new(10.0, 180.0).unwrap();
        assert_eq!(pos.longitude_deg(), 180.0);

        let pos = GeoPosition::new(10.0, 540.0).unwrap();
        assert_eq!(pos.longitude_deg(), -180.0);
    }

    #[test]
    fn position_rejects_bad_input() {
        assert_eq!(
            GeoPosition::new(91.0, 0.0),
            Err(PositionError::LatitudeOutOfRange(91.0))
        );
        assert!(matches!(
            GeoPosition::new(f64::NAN, 0.0),
            Err(PositionError::NonFinite { .. })
        ));
        assert!(GeoPosition::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn position_deserialization_validates() {
        let ok: GeoPosition =
            serde_json::from_value(json!({ "latitudeDeg": 51.47, "longitudeDeg": -0.45 })).unwrap();
        assert_eq!(ok.latitude_deg(), 51.47);

        let err = serde_json::from_value::<GeoPosition>(
            json!({ "latitudeDeg": 120.0, "longitudeDeg": 0.0 }),
        );
        assert!(err.is_err());
    }

    #[test]
    fn runway_optional_fields_are_omitted() {
        let runway = Runway {
            length_ft: Some(12_000),
            north_marker: Some(RunwayMarker {
                name: "09".into(),
                position: None,
            }),
            ..Runway::default()
        };

        let value = serde_json::to_value(&runway).unwrap();
        assert_eq!(value, json!({ "lengthFT": 12000, "northMarker": { "name": "09" } }));
    }

    #[test]
    fn runway_surveyed_ends_needs_both_positions() {
        let mut runway = Runway {
            north_marker: Some(RunwayMarker {
                name: "18".into(),
                position: Some(GeoPosition::new(1.0, 0.0).unwrap()),
            }),
            south_marker: Some(RunwayMarker {
                name: "36".into(),
                position: None,
            }),
            ..Runway::default()
        };
        assert!(runway.surveyed_ends().is_none());
        assert_eq!(runway.designator(), "18 / 36");

        runway.south_marker.as_mut().unwrap().position = Some(GeoPosition::new(0.0, 0.0).unwrap());
        let ((north, _), (south, _)) = runway.surveyed_ends().unwrap();
        assert_eq!((north, south), ("18", "36"));
    }

    #[test]
    fn route_time_formats_hours_and_minutes() {
        assert_eq!(RouteTime::from_hours(1.5).to_string(), "1:30");
        assert_eq!(RouteTime::from_hours(0.1).to_string(), "0:06");
        assert_eq!(RouteTime::from_hours(12.0).to_string(), "12:00");
        assert_eq!(
            RouteTime::from_duration(Duration::minutes(135)).hours(),
            2.25
        );
        assert_eq!(RouteTime::from_hours(2.25).as_duration(), Duration::minutes(135));
    }

    #[test]
    fn route_round_trips_through_json() {
        let value = json!({
            "from": {
                "icao": "EGLL",
                "position": { "latitudeDeg": 51.4706, "longitudeDeg": -0.461941 },
                "runways": [{
                    "lengthFT": 12799,
                    "widthFT": 164,
                    "northMarker": { "name": "09L", "position": { "latitudeDeg": 51.4775, "longitudeDeg": -0.4849 } },
                    "southMarker": { "name": "27R" }
                }],
                "frequencies": { "atis": "128.075", "arrivalDeparture": "119.725" },
                "countryName": "United Kingdom"
            },
            "to": {
                "icao": "KJFK",
                "position": { "latitudeDeg": 40.6398, "longitudeDeg": -73.7789 },
                "runways": [],
                "frequencies": {},
                "countryName": "United States"
            },
            "distance": 2999.4,
            "time": 6.75
        });

        let route: Route = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(route.rounded_distance_nm(), 2999);
        assert_eq!(route.formatted_time(), "6:45");
        assert_eq!(route.from.frequencies.arrival_departure.as_deref(), Some("119.725"));
        assert_eq!(serde_json::to_value(&route).unwrap(), value);
    }
}
