//! Pure conversion of routes and runways into drawable primitives.
//!
//! Renderers never touch a map. They return fresh primitives on every call
//! and keep no state between calls, so the map surface can discard and
//! regenerate them on each selection change.

use serde::{Deserialize, Serialize};

use crate::geo::{densify_great_circle, initial_bearing, normalize_bearing};
use crate::models::{Airport, GeoPosition, Route, Runway};
use crate::style::{LineSymbol, MarkerSymbol, RenderStyle, TextSymbol};

/// A geometry plus its symbol, ready to hand to a map backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawablePrimitive {
    Marker {
        position: GeoPosition,
        symbol: MarkerSymbol,
    },
    Polyline {
        path: Vec<GeoPosition>,
        symbol: LineSymbol,
    },
    Text {
        position: GeoPosition,
        symbol: TextSymbol,
    },
}

impl DrawablePrimitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Marker { .. } => "marker",
            Self::Polyline { .. } => "polyline",
            Self::Text { .. } => "text",
        }
    }
}

/// Builds the centerline and end labels of runways.
#[derive(Debug, Clone, Copy)]
pub struct RunwayRenderer<'a> {
    style: &'a RenderStyle,
}

impl<'a> RunwayRenderer<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self { style }
    }

    /// Primitives for one runway.
    ///
    /// Returns nothing unless both ends have a surveyed position. The north
    /// label is rotated to the north-to-south bearing and the south label
    /// to its reciprocal, so each identifier reads upright from its own
    /// approach direction.
    pub fn render(&self, runway: &Runway) -> Vec<DrawablePrimitive> {
        let Some(((north_name, north), (south_name, south))) = runway.surveyed_ends() else {
            return Vec::new();
        };

        let bearing = initial_bearing(north, south);
        let reciprocal = normalize_bearing(bearing + 180.0);

        let mut primitives = Vec::with_capacity(5);
        primitives.push(DrawablePrimitive::Polyline {
            path: vec![north, south],
            symbol: self.style.runway_line.clone(),
        });

        if let Some(marker) = &self.style.runway_end_marker {
            for position in [north, south] {
                primitives.push(DrawablePrimitive::Marker {
                    position,
                    symbol: marker.clone(),
                });
            }
        }

        primitives.push(DrawablePrimitive::Text {
            position: north,
            symbol: self.style.runway_label(north_name, bearing),
        });
        primitives.push(DrawablePrimitive::Text {
            position: south,
            symbol: self.style.runway_label(south_name, reciprocal),
        });

        primitives
    }

    /// Primitives for every drawable runway of an airport, in runway order.
    pub fn render_airport(&self, airport: &Airport) -> Vec<DrawablePrimitive> {
        airport
            .runways
            .iter()
            .flat_map(|runway| self.render(runway))
            .collect()
    }
}

/// Builds the endpoint markers and great-circle line of a route.
#[derive(Debug, Clone, Copy)]
pub struct RoutePathRenderer<'a> {
    style: &'a RenderStyle,
}

impl<'a> RoutePathRenderer<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self { style }
    }

    /// Two airport markers followed by the densified path between them.
    /// Only the airport positions are used.
    pub fn render(&self, route: &Route) -> Vec<DrawablePrimitive> {
        self.render_between(route.from.position, route.to.position)
    }

    pub fn render_between(&self, from: GeoPosition, to: GeoPosition) -> Vec<DrawablePrimitive> {
        vec![
            DrawablePrimitive::Marker {
                position: from,
                symbol: self.style.airport_marker.clone(),
            },
            DrawablePrimitive::Marker {
                position: to,
                symbol: self.style.airport_marker.clone(),
            },
            DrawablePrimitive::Polyline {
                path: densify_great_circle(from, to, self.style.densify_spacing_m),
                symbol: self.style.route_line.clone(),
            },
        ]
    }
}
