//! Map surface: owns the backend and its two graphic layers.
//!
//! The surface starts `Uninitialized`, moves to `Loading` once the backend
//! future is spawned and becomes `Ready` when that future resolves.
//!
//! Drawing calls made while `Loading` are queued, coalesced per layer: only
//! the most recent content requested for each layer and the most recent
//! `center_on` are replayed when the surface becomes `Ready`. Calls made
//! while `Uninitialized`, or after the backend failed to load, are
//! rejected with [`MapError::NotReady`].

use std::collections::BTreeMap;
use std::future::Future;

use route_core::{
    Airport, DrawablePrimitive, GeoPosition, RenderStyle, Route, RoutePathRenderer, RunwayRenderer,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::backend::{MapBackend, MapLayer, ViewTarget};
use crate::config::MapConfig;
use crate::error::MapError;

/// Lifecycle of a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStatus {
    Uninitialized,
    /// Backend not yet available, or failed to load
    Loading,
    Ready,
}

type LoadResult<B> = anyhow::Result<B>;

/// Receives backend load failures.
pub type ErrorSink = Box<dyn FnMut(&MapError) + Send>;

#[derive(Debug, Default)]
struct PendingOps {
    layers: BTreeMap<MapLayer, Vec<DrawablePrimitive>>,
    view: Option<ViewTarget>,
}

enum SurfaceState<B> {
    Uninitialized,
    Loading {
        backend: oneshot::Receiver<LoadResult<B>>,
        pending: PendingOps,
    },
    Failed,
    Ready(B),
}

pub struct MapSurface<B> {
    config: MapConfig,
    style: RenderStyle,
    state: SurfaceState<B>,
    error_sink: ErrorSink,
}

impl<B: MapBackend> MapSurface<B> {
    /// A surface that has not started loading its backend.
    pub fn uninitialized(config: MapConfig) -> Self {
        Self {
            config,
            style: RenderStyle::default(),
            state: SurfaceState::Uninitialized,
            error_sink: Box::new(|err: &MapError| {
                tracing::error!(error = %err, "map surface error")
            }),
        }
    }

    /// A surface wrapping an already loaded backend.
    pub fn with_backend(config: MapConfig, backend: B) -> Self {
        let mut surface = Self::uninitialized(config);
        surface.state = SurfaceState::Ready(backend);
        surface
    }

    /// Spawn `load` on the Tokio runtime and start in `Loading`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<F>(config: MapConfig, load: F) -> Self
    where
        B: Send + 'static,
        F: Future<Output = LoadResult<B>> + Send + 'static,
    {
        let mut surface = Self::uninitialized(config);
        surface.start_loading(load);
        surface
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the default sink, which logs through `tracing`.
    pub fn with_error_sink(mut self, sink: impl FnMut(&MapError) + Send + 'static) -> Self {
        self.error_sink = Box::new(sink);
        self
    }

    /// Begin acquiring the backend. Only valid while `Uninitialized`.
    pub fn start_loading<F>(&mut self, load: F)
    where
        B: Send + 'static,
        F: Future<Output = LoadResult<B>> + Send + 'static,
    {
        if !matches!(self.state, SurfaceState::Uninitialized) {
            tracing::warn!(status = ?self.status(), "map backend already requested");
            return;
        }

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            // The surface may have been dropped while loading.
            let _ = tx.send(load.await);
        });

        tracing::info!(basemap = %self.config.basemap, "loading map backend");
        self.state = SurfaceState::Loading {
            backend: rx,
            pending: PendingOps::default(),
        };
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn status(&self) -> SurfaceStatus {
        match self.state {
            SurfaceState::Uninitialized => SurfaceStatus::Uninitialized,
            SurfaceState::Loading { .. } | SurfaceState::Failed => SurfaceStatus::Loading,
            SurfaceState::Ready(_) => SurfaceStatus::Ready,
        }
    }

    /// Check for a finished backend load without blocking.
    pub fn is_ready(&mut self) -> bool {
        self.poll_load();
        matches!(self.state, SurfaceState::Ready(_))
    }

    /// True once the backend failed to load. The surface stays
    /// non-interactive for the rest of its life.
    pub fn load_failed(&self) -> bool {
        matches!(self.state, SurfaceState::Failed)
    }

    pub fn backend(&self) -> Option<&B> {
        match &self.state {
            SurfaceState::Ready(backend) => Some(backend),
            _ => None,
        }
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        match &mut self.state {
            SurfaceState::Ready(backend) => Some(backend),
            _ => None,
        }
    }

    /// Wait for the backend load to finish.
    pub async fn ready(&mut self) -> Result<(), MapError> {
        if let SurfaceState::Loading { backend, .. } = &mut self.state {
            let result = match backend.await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("backend loader was dropped")),
            };
            self.finish_load(result);
        }

        match self.state {
            SurfaceState::Ready(_) => Ok(()),
            SurfaceState::Failed => Err(MapError::SdkLoad("backend failed to load".to_string())),
            _ => Err(MapError::NotReady(self.status())),
        }
    }

    /// Replace the route layer with the given route.
    pub fn draw_route(&mut self, route: &Route) -> Result<(), MapError> {
        let primitives = RoutePathRenderer::new(&self.style).render(route);
        tracing::debug!(
            from = %route.from.icao,
            to = %route.to.icao,
            "drawing route"
        );
        self.replace_layer(MapLayer::Route, primitives)
    }

    pub fn clear_route(&mut self) -> Result<(), MapError> {
        self.replace_layer(MapLayer::Route, Vec::new())
    }

    /// Replace the runway layer with one airport's runways.
    pub fn draw_runways(&mut self, airport: &Airport) -> Result<(), MapError> {
        self.draw_runways_of(&[airport])
    }

    /// Replace the runway layer with the runways of several airports.
    pub fn draw_runways_of(&mut self, airports: &[&Airport]) -> Result<(), MapError> {
        let renderer = RunwayRenderer::new(&self.style);
        let mut primitives = Vec::new();

        for airport in airports {
            let before = primitives.len();
            primitives.extend(renderer.render_airport(airport));
            let drawn = airport
                .runways
                .iter()
                .filter(|runway| runway.surveyed_ends().is_some())
                .count();
            tracing::debug!(
                icao = %airport.icao,
                runways = airport.runways.len(),
                drawn,
                primitives = primitives.len() - before,
                "drawing runways"
            );
        }

        self.replace_layer(MapLayer::Runways, primitives)
    }

    pub fn clear_runways(&mut self) -> Result<(), MapError> {
        self.replace_layer(MapLayer::Runways, Vec::new())
    }

    /// Recenter the view on `position` at map scale `scale`.
    pub fn center_on(&mut self, position: GeoPosition, scale: f64) -> Result<(), MapError> {
        let target = ViewTarget {
            center: position,
            scale,
        };
        self.poll_load();

        match &mut self.state {
            SurfaceState::Ready(backend) => {
                backend.go_to(target);
                Ok(())
            }
            SurfaceState::Loading { pending, .. } => {
                pending.view = Some(target);
                Ok(())
            }
            SurfaceState::Uninitialized => Err(MapError::NotReady(SurfaceStatus::Uninitialized)),
            SurfaceState::Failed => Err(MapError::NotReady(SurfaceStatus::Loading)),
        }
    }

    fn replace_layer(
        &mut self,
        layer: MapLayer,
        primitives: Vec<DrawablePrimitive>,
    ) -> Result<(), MapError> {
        self.poll_load();

        match &mut self.state {
            SurfaceState::Ready(backend) => {
                apply_layer(backend, layer, &primitives);
                Ok(())
            }
            SurfaceState::Loading { pending, .. } => {
                tracing::debug!(layer = layer.name(), "map not ready, queueing layer update");
                pending.layers.insert(layer, primitives);
                Ok(())
            }
            SurfaceState::Uninitialized => Err(MapError::NotReady(SurfaceStatus::Uninitialized)),
            SurfaceState::Failed => Err(MapError::NotReady(SurfaceStatus::Loading)),
        }
    }

    fn poll_load(&mut self) {
        let SurfaceState::Loading { backend, .. } = &mut self.state else {
            return;
        };

        let result = match backend.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(anyhow::anyhow!("backend loader was dropped"))
            }
        };
        self.finish_load(result);
    }

    fn finish_load(&mut self, result: LoadResult<B>) {
        let pending = match std::mem::replace(&mut self.state, SurfaceState::Failed) {
            SurfaceState::Loading { pending, .. } => pending,
            other => {
                self.state = other;
                return;
            }
        };

        match result {
            Ok(mut backend) => {
                let queued = pending.layers.len() + usize::from(pending.view.is_some());
                for (layer, primitives) in &pending.layers {
                    apply_layer(&mut backend, *layer, primitives);
                }
                if let Some(target) = pending.view {
                    backend.go_to(target);
                }
                tracing::info!(replayed = queued, "map backend ready");
                self.state = SurfaceState::Ready(backend);
            }
            Err(err) => {
                let dropped = pending.layers.len() + usize::from(pending.view.is_some());
                if dropped > 0 {
                    tracing::warn!(dropped, "discarding queued map updates");
                }
                let err = MapError::SdkLoad(format!("{err:#}"));
                (self.error_sink)(&err);
            }
        }
    }
}

fn apply_layer<B: MapBackend>(backend: &mut B, layer: MapLayer, primitives: &[DrawablePrimitive]) {
    backend.clear(layer);
    for primitive in primitives {
        backend.add(layer, primitive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBackend;
    use route_core::{Frequencies, RouteTime, Runway, RunwayMarker};
    use std::sync::{Arc, Mutex};

    fn pos(lat: f64, lon: f64) -> GeoPosition {
        GeoPosition::new(lat, lon).unwrap()
    }

    fn airport(icao: &str, position: GeoPosition) -> Airport {
        Airport {
            icao: icao.to_string(),
            name: None,
            position,
            runways: vec![Runway {
                north_marker: Some(RunwayMarker {
                    name: "09".into(),
                    position: Some(position),
                }),
                south_marker: Some(RunwayMarker {
                    name: "27".into(),
                    position: Some(pos(position.latitude_deg(), position.longitude_deg() + 0.02)),
                }),
                ..Runway::default()
            }],
            frequencies: Frequencies::default(),
            country_name: "Testland".into(),
        }
    }

    fn route(from: (f64, f64), to: (f64, f64)) -> Route {
        Route {
            from: airport("AAAA", pos(from.0, from.1)),
            to: airport("BBBB", pos(to.0, to.1)),
            distance: 100.0,
            time: RouteTime::from_hours(1.0),
        }
    }

    fn ready_surface() -> MapSurface<SceneBackend> {
        let config = MapConfig::default();
        MapSurface::with_backend(config.clone(), SceneBackend::new(&config))
    }

    #[test]
    fn draw_route_replaces_previous_route() {
        let mut surface = ready_surface();
        surface.draw_route(&route((0.0, 0.0), (10.0, 10.0))).unwrap();
        surface.draw_route(&route((20.0, 20.0), (30.0, 30.0))).unwrap();

        let layer = surface.backend().unwrap().layer(MapLayer::Route);
        assert_eq!(layer.len(), 3);
        assert!(matches!(
            &layer[0],
            DrawablePrimitive::Marker { position, .. } if *position == pos(20.0, 20.0)
        ));
    }

    #[test]
    fn route_and_runway_layers_are_independent() {
        let mut surface = ready_surface();
        let selected = route((0.0, 0.0), (10.0, 10.0));
        surface.draw_runways_of(&[&selected.from, &selected.to]).unwrap();
        surface.draw_route(&route((20.0, 20.0), (30.0, 30.0))).unwrap();
        surface.clear_route().unwrap();

        let scene = surface.backend().unwrap();
        assert!(scene.layer(MapLayer::Route).is_empty());
        assert_eq!(scene.layer(MapLayer::Runways).len(), 6);
    }

    #[test]
    fn draw_runways_replaces_previous_airport() {
        let mut surface = ready_surface();
        let first = airport("AAAA", pos(0.0, 0.0));
        let second = airport("BBBB", pos(5.0, 5.0));
        surface.draw_runways(&first).unwrap();
        surface.draw_runways(&second).unwrap();

        let layer = surface.backend().unwrap().layer(MapLayer::Runways);
        assert_eq!(layer.len(), 3);
        assert!(matches!(
            &layer[1],
            DrawablePrimitive::Text { position, .. } if *position == pos(5.0, 5.0)
        ));
    }

    #[test]
    fn clearing_is_idempotent() {
        let mut surface = ready_surface();
        surface.clear_route().unwrap();
        surface.clear_route().unwrap();
        surface.clear_runways().unwrap();
        surface.clear_runways().unwrap();
        let scene = surface.backend().unwrap();
        assert!(scene.layer(MapLayer::Route).is_empty());
        assert!(scene.layer(MapLayer::Runways).is_empty());
    }

    #[test]
    fn uninitialized_surface_rejects_calls() {
        let mut surface: MapSurface<SceneBackend> = MapSurface::uninitialized(MapConfig::default());
        assert_eq!(surface.status(), SurfaceStatus::Uninitialized);
        assert!(!surface.is_ready());
        assert_eq!(
            surface.draw_route(&route((0.0, 0.0), (1.0, 1.0))),
            Err(MapError::NotReady(SurfaceStatus::Uninitialized))
        );
        assert_eq!(
            surface.center_on(pos(0.0, 0.0), 1000.0),
            Err(MapError::NotReady(SurfaceStatus::Uninitialized))
        );
    }

    #[tokio::test]
    async fn queued_calls_replay_latest_state_on_ready() {
        let config = MapConfig::default();
        let (release, gate) = oneshot::channel::<()>();
        let scene_config = config.clone();
        let mut surface = MapSurface::new(config, async move {
            gate.await.ok();
            SceneBackend::load(scene_config).await
        });

        assert_eq!(surface.status(), SurfaceStatus::Loading);
        assert!(!surface.is_ready());

        surface.draw_route(&route((0.0, 0.0), (10.0, 10.0))).unwrap();
        surface.draw_route(&route((20.0, 20.0), (30.0, 30.0))).unwrap();
        surface.draw_runways(&airport("CCCC", pos(1.0, 1.0))).unwrap();
        surface.clear_runways().unwrap();
        surface.center_on(pos(1.0, 2.0), 5000.0).unwrap();
        surface.center_on(pos(3.0, 4.0), 2000.0).unwrap();

        release.send(()).unwrap();
        surface.ready().await.unwrap();
        assert!(surface.is_ready());

        let scene = surface.backend().unwrap();
        let route_layer = scene.layer(MapLayer::Route);
        assert_eq!(route_layer.len(), 3);
        assert!(matches!(
            &route_layer[0],
            DrawablePrimitive::Marker { position, .. } if *position == pos(20.0, 20.0)
        ));
        assert!(scene.layer(MapLayer::Runways).is_empty());
        assert_eq!(
            scene.view(),
            Some(ViewTarget {
                center: pos(3.0, 4.0),
                scale: 2000.0
            })
        );
    }

    #[tokio::test]
    async fn load_failure_is_reported_once_and_blocks_drawing() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = reported.clone();
        let mut surface: MapSurface<SceneBackend> =
            MapSurface::new(MapConfig::default(), async {
                Err(anyhow::anyhow!("modules unavailable"))
            })
                .with_error_sink(move |err| sink.lock().unwrap().push(err.clone()));

        surface.draw_route(&route((0.0, 0.0), (1.0, 1.0))).ok();
        assert!(matches!(surface.ready().await, Err(MapError::SdkLoad(_))));
        assert!(surface.load_failed());
        assert_eq!(surface.status(), SurfaceStatus::Loading);
        assert!(!surface.is_ready());

        assert_eq!(
            surface.draw_route(&route((0.0, 0.0), (1.0, 1.0))),
            Err(MapError::NotReady(SurfaceStatus::Loading))
        );
        surface.ready().await.ok();

        let reported = reported.lock().unwrap();
        assert_eq!(reported.len(), 1);
        assert!(matches!(
            &reported[0],
            MapError::SdkLoad(msg) if msg.contains("modules unavailable")
        ));
    }
}
