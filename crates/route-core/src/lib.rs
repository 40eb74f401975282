//! Route Core - geometry and rendering for the flight route viewer
//!
//! Turns route search results into map-ready primitives: great-circle
//! route lines and oriented runway labels. Everything here is pure and
//! synchronous; drawing onto an actual map happens in `route-map`.

pub mod error;
pub mod filter;
pub mod geo;
pub mod models;
pub mod render;
pub mod style;

pub use error::{FilterError, PositionError};
pub use filter::{AirportType, FilterCriteria, LengthSelector, RunwayLengthFilter};
pub use geo::{densify_great_circle, haversine_distance_m, initial_bearing, split_at_antimeridian};
pub use models::{Airport, Frequencies, GeoPosition, Route, RouteTime, Runway, RunwayMarker};
pub use render::{DrawablePrimitive, RoutePathRenderer, RunwayRenderer};
pub use style::{LineSymbol, MarkerShape, MarkerSymbol, RenderStyle, TextSymbol};
