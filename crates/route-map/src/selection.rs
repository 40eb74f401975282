//! Current route result set and the hovered/selected route.
//!
//! Hovering a route draws its great-circle path; selecting one draws the
//! runways of both of its airports.

use std::cmp::Ordering;

use route_core::Route;
use serde::{Deserialize, Serialize};

use crate::backend::MapBackend;
use crate::error::MapError;
use crate::surface::MapSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSortKey {
    Departure,
    Arrival,
    Distance,
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Which airport of the selected route to center on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Departure,
    Arrival,
}

#[derive(Debug, Default)]
pub struct RouteSelectionStore {
    routes: Vec<Route>,
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl RouteSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `routes` with nothing hovered or selected. Nothing is
    /// drawn until a surface is passed to one of the mutating calls.
    pub fn with_routes(routes: Vec<Route>) -> Self {
        Self {
            routes,
            ..Self::default()
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn hovered(&self) -> Option<&Route> {
        self.hovered.and_then(|i| self.routes.get(i))
    }

    pub fn selected(&self) -> Option<&Route> {
        self.selected.and_then(|i| self.routes.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Install a new result set. Both map layers are cleared first, so
    /// nothing from the previous set stays drawn, then hover and selection
    /// are reset. If the surface rejects the clear, the store keeps its
    /// previous routes.
    pub fn replace_routes<B: MapBackend>(
        &mut self,
        routes: Vec<Route>,
        surface: &mut MapSurface<B>,
    ) -> Result<(), MapError> {
        surface.clear_route()?;
        surface.clear_runways()?;

        tracing::debug!(count = routes.len(), "route result set replaced");
        self.routes = routes;
        self.hovered = None;
        self.selected = None;
        Ok(())
    }

    /// Draw the route at `index` on the route layer.
    pub fn hover<B: MapBackend>(
        &mut self,
        index: usize,
        surface: &mut MapSurface<B>,
    ) -> Result<(), MapError> {
        let route = self.routes.get(index).ok_or(MapError::UnknownRoute(index))?;
        self.hovered = Some(index);
        surface.draw_route(route)
    }

    /// Select the route at `index` and draw the runways of both airports.
    pub fn select<B: MapBackend>(
        &mut self,
        index: usize,
        surface: &mut MapSurface<B>,
    ) -> Result<(), MapError> {
        let route = self.routes.get(index).ok_or(MapError::UnknownRoute(index))?;
        self.selected = Some(index);
        surface.draw_runways_of(&[&route.from, &route.to])
    }

    /// Center the view on one airport of the selected route. Without a
    /// selection this does nothing.
    pub fn teleport<B: MapBackend>(
        &self,
        endpoint: Endpoint,
        surface: &mut MapSurface<B>,
    ) -> Result<(), MapError> {
        let Some(route) = self.selected() else {
            return Ok(());
        };
        let airport = match endpoint {
            Endpoint::Departure => &route.from,
            Endpoint::Arrival => &route.to,
        };
        let scale = surface.config().airport_view_scale;
        surface.center_on(airport.position, scale)
    }

    /// Stable sort of the result set. Hover and selection keep pointing at
    /// the same routes.
    pub fn sort_by(&mut self, key: RouteSortKey, order: SortOrder) {
        let mut indexed: Vec<(usize, Route)> = std::mem::take(&mut self.routes)
            .into_iter()
            .enumerate()
            .collect();

        indexed.sort_by(|(_, a), (_, b)| {
            let ordering = compare_routes(a, b, key);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        let remap = |old: Option<usize>| {
            old.and_then(|old| indexed.iter().position(|(i, _)| *i == old))
        };
        self.hovered = remap(self.hovered);
        self.selected = remap(self.selected);
        self.routes = indexed.into_iter().map(|(_, route)| route).collect();
    }
}

fn compare_routes(a: &Route, b: &Route, key: RouteSortKey) -> Ordering {
    match key {
        RouteSortKey::Departure => a.from.icao.cmp(&b.from.icao),
        RouteSortKey::Arrival => a.to.icao.cmp(&b.to.icao),
        RouteSortKey::Distance => a
            .distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal),
        RouteSortKey::Time => a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal),
    }
}
