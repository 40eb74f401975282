//! Seam between the map surface and the mapping SDK that draws pixels.

use route_core::{DrawablePrimitive, GeoPosition};
use serde::{Deserialize, Serialize};

/// Independent graphic layers owned by the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    /// Hovered route: endpoint markers and great-circle line
    Route,
    /// Runways of the selected route's airports
    Runways,
}

impl MapLayer {
    pub const ALL: [MapLayer; 2] = [MapLayer::Route, MapLayer::Runways];

    pub fn name(&self) -> &'static str {
        match self {
            MapLayer::Route => "route",
            MapLayer::Runways => "runways",
        }
    }
}

/// Where the view should be centered and at which map scale (1:scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTarget {
    pub center: GeoPosition,
    pub scale: f64,
}

/// Minimal drawing interface a mapping SDK has to provide.
pub trait MapBackend {
    /// Add one primitive to `layer`.
    fn add(&mut self, layer: MapLayer, primitive: &DrawablePrimitive);

    /// Remove every primitive from `layer`. Clearing an empty layer is a no-op.
    fn clear(&mut self, layer: MapLayer);

    /// Move the view.
    fn go_to(&mut self, target: ViewTarget);
}
