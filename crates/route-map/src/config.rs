//! Map configuration from environment.

use std::env;

const DEFAULT_RUNWAY_MIN_SCALE: f64 = 200_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Basemap shown on load
    pub basemap: String,
    /// Alternative basemap offered by the basemap toggle
    pub toggle_basemap: String,
    pub initial_zoom: u8,
    /// The runway layer is only visible at this scale or closer
    pub runway_min_scale: f64,
    /// Scale used when centering the view on an airport
    pub airport_view_scale: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            basemap: "gray-vector".to_string(),
            toggle_basemap: "hybrid".to_string(),
            initial_zoom: 2,
            runway_min_scale: DEFAULT_RUNWAY_MIN_SCALE,
            airport_view_scale: DEFAULT_RUNWAY_MIN_SCALE,
        }
    }
}

impl MapConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let runway_min_scale = env::var("ROUTE_MAP_RUNWAY_MIN_SCALE")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|scale| scale.is_finite() && *scale > 0.0)
            .unwrap_or(defaults.runway_min_scale);

        Self {
            basemap: env::var("ROUTE_MAP_BASEMAP").unwrap_or(defaults.basemap),
            toggle_basemap: env::var("ROUTE_MAP_TOGGLE_BASEMAP").unwrap_or(defaults.toggle_basemap),
            initial_zoom: env::var("ROUTE_MAP_INITIAL_ZOOM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.initial_zoom),
            runway_min_scale,
            airport_view_scale: env::var("ROUTE_MAP_AIRPORT_SCALE")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|scale| scale.is_finite() && *scale > 0.0)
                .unwrap_or(runway_min_scale),
        }
    }
}
