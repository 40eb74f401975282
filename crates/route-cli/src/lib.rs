//! Route CLI - command line front end for the flight route viewer.
//!
//! The `route-viewer` binary lists search results and renders a selected
//! route to GeoJSON. Argument types and output formatting live here so
//! they can be tested without a terminal.

pub mod args;
pub mod input;
pub mod table;

pub use args::{EndpointArg, FilterArgs, SortArg};
pub use input::{load_routes, parse_routes};
pub use table::format_route_table;
