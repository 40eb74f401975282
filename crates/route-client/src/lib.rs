//! Route Client - search the route service
//!
//! Sends [`FilterCriteria`](route_core::FilterCriteria) to the
//! `search_routes` endpoint and returns the candidate routes.

pub mod client;

pub use client::{parse_search_response, SearchClient};
