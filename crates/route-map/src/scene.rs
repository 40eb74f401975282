//! In-memory map backend that can be exported as GeoJSON.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use route_core::{split_at_antimeridian, DrawablePrimitive, GeoPosition};
use serde_json::json;

use crate::backend::{MapBackend, MapLayer, ViewTarget};
use crate::config::MapConfig;

/// A headless map: keeps the primitives of each layer and the current view.
#[derive(Debug, Clone)]
pub struct SceneBackend {
    basemap: String,
    toggle_basemap: String,
    initial_zoom: u8,
    runway_min_scale: f64,
    layers: BTreeMap<MapLayer, Vec<DrawablePrimitive>>,
    view: Option<ViewTarget>,
}

impl SceneBackend {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            basemap: config.basemap.clone(),
            toggle_basemap: config.toggle_basemap.clone(),
            initial_zoom: config.initial_zoom,
            runway_min_scale: config.runway_min_scale,
            layers: MapLayer::ALL.iter().map(|layer| (*layer, Vec::new())).collect(),
            view: None,
        }
    }

    /// Backend loader for [`MapSurface::new`](crate::MapSurface::new).
    pub async fn load(config: MapConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(!config.basemap.trim().is_empty(), "no basemap configured");
        anyhow::ensure!(
            config.runway_min_scale.is_finite() && config.runway_min_scale > 0.0,
            "invalid runway layer scale {}",
            config.runway_min_scale
        );
        Ok(Self::new(&config))
    }

    pub fn basemap(&self) -> &str {
        &self.basemap
    }

    /// Swap the active basemap with the alternative one.
    pub fn toggle_basemap(&mut self) {
        std::mem::swap(&mut self.basemap, &mut self.toggle_basemap);
        tracing::debug!(basemap = %self.basemap, "basemap toggled");
    }

    pub fn layer(&self, layer: MapLayer) -> &[DrawablePrimitive] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn view(&self) -> Option<ViewTarget> {
        self.view
    }

    /// The runway layer only shows once the view is zoomed in to
    /// `runway_min_scale` or closer.
    pub fn is_layer_visible(&self, layer: MapLayer) -> bool {
        match layer {
            MapLayer::Route => true,
            MapLayer::Runways => self
                .view
                .is_some_and(|view| view.scale <= self.runway_min_scale),
        }
    }

    /// Export every layer as a GeoJSON feature collection.
    ///
    /// Polylines crossing the antimeridian become `MultiLineString`s so
    /// flat-map clients do not draw a stroke across the whole world.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();
        for (layer, primitives) in &self.layers {
            let visible = self.is_layer_visible(*layer);
            for primitive in primitives {
                features.push(primitive_feature(*layer, visible, primitive));
            }
        }

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("basemap".to_string(), json!(self.basemap));
        foreign_members.insert("initialZoom".to_string(), json!(self.initial_zoom));
        if let Some(view) = self.view {
            foreign_members.insert(
                "view".to_string(),
                json!({
                    "center": [view.center.longitude_deg(), view.center.latitude_deg()],
                    "scale": view.scale,
                }),
            );
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }
}

impl MapBackend for SceneBackend {
    fn add(&mut self, layer: MapLayer, primitive: &DrawablePrimitive) {
        self.layers.entry(layer).or_default().push(primitive.clone());
    }

    fn clear(&mut self, layer: MapLayer) {
        if let Some(primitives) = self.layers.get_mut(&layer) {
            primitives.clear();
        }
    }

    fn go_to(&mut self, target: ViewTarget) {
        self.view = Some(target);
    }
}

/// GeoJSON positions are `[longitude, latitude]`.
fn coordinates(position: &GeoPosition) -> Vec<f64> {
    vec![position.longitude_deg(), position.latitude_deg()]
}

fn primitive_feature(layer: MapLayer, visible: bool, primitive: &DrawablePrimitive) -> Feature {
    let mut props = JsonObject::new();
    props.insert("layer".to_string(), json!(layer.name()));
    props.insert("kind".to_string(), json!(primitive.kind()));
    props.insert("visible".to_string(), json!(visible));

    let value = match primitive {
        DrawablePrimitive::Marker { position, symbol } => {
            props.insert("shape".to_string(), json!(symbol.shape));
            props.insert("size".to_string(), json!(symbol.size_px));
            Value::Point(coordinates(position))
        }
        DrawablePrimitive::Polyline { path, symbol } => {
            props.insert("width".to_string(), json!(symbol.width_px));
            let mut parts: Vec<Vec<Vec<f64>>> = split_at_antimeridian(path)
                .iter()
                .map(|part| part.iter().map(coordinates).collect())
                .collect();
            if parts.len() == 1 {
                Value::LineString(parts.remove(0))
            } else {
                Value::MultiLineString(parts)
            }
        }
        DrawablePrimitive::Text { position, symbol } => {
            props.insert("text".to_string(), json!(symbol.text));
            props.insert("angle".to_string(), json!(symbol.angle_deg));
            props.insert("yOffset".to_string(), json!(symbol.y_offset_px));
            props.insert("fontSize".to_string(), json!(symbol.font_size_pt));
            props.insert("fontFamily".to_string(), json!(symbol.font_family));
            props.insert("color".to_string(), json!(symbol.color));
            Value::Point(coordinates(position))
        }
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_core::{LineSymbol, RenderStyle, RoutePathRenderer};

    fn pos(lat: f64, lon: f64) -> GeoPosition {
        GeoPosition::new(lat, lon).unwrap()
    }

    #[test]
    fn runway_layer_hidden_until_zoomed_in() {
        let mut scene = SceneBackend::new(&MapConfig::default());
        assert!(scene.is_layer_visible(MapLayer::Route));
        assert!(!scene.is_layer_visible(MapLayer::Runways));

        scene.go_to(ViewTarget {
            center: pos(0.0, 0.0),
            scale: 1_000_000.0,
        });
        assert!(!scene.is_layer_visible(MapLayer::Runways));

        scene.go_to(ViewTarget {
            center: pos(0.0, 0.0),
            scale: 200_000.0,
        });
        assert!(scene.is_layer_visible(MapLayer::Runways));
    }

    #[test]
    fn toggle_swaps_basemaps() {
        let mut scene = SceneBackend::new(&MapConfig::default());
        assert_eq!(scene.basemap(), "gray-vector");
        scene.toggle_basemap();
        assert_eq!(scene.basemap(), "hybrid");
        scene.toggle_basemap();
        assert_eq!(scene.basemap(), "gray-vector");
    }

    #[test]
    fn geojson_uses_lon_lat_order() {
        let style = RenderStyle::default();
        let mut scene = SceneBackend::new(&MapConfig::default());
        let primitives =
            RoutePathRenderer::new(&style).render_between(pos(10.0, 20.0), pos(11.0, 21.0));
        for primitive in primitives {
            scene.add(MapLayer::Route, &primitive);
        }

        let collection = scene.to_geojson();
        assert_eq!(collection.features.len(), 3);

        let first = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(first.value, Value::Point(vec![20.0, 10.0]));

        let props = collection.features[2].properties.as_ref().unwrap();
        assert_eq!(props["kind"], json!("polyline"));
        assert_eq!(props["layer"], json!("route"));
        assert_eq!(
            collection.foreign_members.as_ref().unwrap()["basemap"],
            json!("gray-vector")
        );
    }

    #[test]
    fn geojson_splits_antimeridian_lines() {
        let mut scene = SceneBackend::new(&MapConfig::default());
        let path = route_core::densify_great_circle(pos(0.0, 170.0), pos(0.0, -170.0), 10_000.0);
        scene.add(
            MapLayer::Route,
            &DrawablePrimitive::Polyline {
                path,
                symbol: LineSymbol { width_px: 2.0 },
            },
        );

        let collection = scene.to_geojson();
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        let Value::MultiLineString(parts) = &geometry.value else {
            panic!("expected MultiLineString, got {:?}", geometry.value);
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].last().unwrap()[0], 180.0);
        assert_eq!(parts[1].first().unwrap()[0], -180.0);
    }

    #[tokio::test]
    async fn load_rejects_empty_basemap() {
        let config = MapConfig {
            basemap: " ".to_string(),
            ..MapConfig::default()
        };
        assert!(SceneBackend::load(config).await.is_err());
        assert!(SceneBackend::load(MapConfig::default()).await.is_ok());
    }
}
