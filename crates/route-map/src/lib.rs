//! Route Map - map surface and route selection for the flight route viewer
//!
//! Wraps an asynchronously loaded map backend behind [`MapSurface`], which
//! owns the route and runway layers, and tracks hovered and selected
//! routes in [`RouteSelectionStore`].

pub mod backend;
pub mod config;
pub mod error;
pub mod scene;
pub mod selection;
pub mod surface;

pub use backend::{MapBackend, MapLayer, ViewTarget};
pub use config::MapConfig;
pub use error::MapError;
pub use scene::SceneBackend;
pub use selection::{Endpoint, RouteSelectionStore, RouteSortKey, SortOrder};
pub use surface::{ErrorSink, MapSurface, SurfaceStatus};
