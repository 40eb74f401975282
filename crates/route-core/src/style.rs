//! Symbol settings used by the renderers.

use serde::{Deserialize, Serialize};

/// Default spacing between densified route vertices.
pub const DEFAULT_DENSIFY_SPACING_M: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Circle,
    Diamond,
    Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSymbol {
    pub shape: MarkerShape,
    pub size_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    pub width_px: f32,
}

/// Text symbol for a label. `angle_deg` is a compass rotation
/// (0 = north-up, clockwise); `y_offset_px` is positive upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSymbol {
    pub text: String,
    pub angle_deg: f64,
    pub y_offset_px: f32,
    pub font_size_pt: f32,
    pub font_family: String,
    pub color: String,
}

/// Configuration for rendered symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Marker drawn at each route endpoint
    pub airport_marker: MarkerSymbol,
    /// Stroke of the great-circle route line
    pub route_line: LineSymbol,
    /// Maximum distance between densified route vertices in meters
    pub densify_spacing_m: f64,
    /// Stroke of the runway centerline
    pub runway_line: LineSymbol,
    /// Optional marker at each surveyed runway end
    pub runway_end_marker: Option<MarkerSymbol>,
    pub label_font_size_pt: f32,
    pub label_font_family: String,
    pub label_color: String,
    /// Label displacement above its runway end
    pub label_y_offset_px: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            airport_marker: MarkerSymbol {
                shape: MarkerShape::Diamond,
                size_px: 10.0,
            },
            route_line: LineSymbol { width_px: 2.0 },
            densify_spacing_m: DEFAULT_DENSIFY_SPACING_M,
            runway_line: LineSymbol { width_px: 3.0 },
            runway_end_marker: None,
            label_font_size_pt: 8.0,
            label_font_family: "sans-serif".into(),
            label_color: "black".into(),
            label_y_offset_px: 10.0,
        }
    }
}

impl RenderStyle {
    /// Runway label with this style's font settings.
    pub fn runway_label(&self, text: &str, angle_deg: f64) -> TextSymbol {
        TextSymbol {
            text: text.to_string(),
            angle_deg,
            y_offset_px: self.label_y_offset_px,
            font_size_pt: self.label_font_size_pt,
            font_family: self.label_font_family.clone(),
            color: self.label_color.clone(),
        }
    }
}
