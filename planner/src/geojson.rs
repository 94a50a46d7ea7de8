use serde_json::{Value, json};
use shared::{
    Bounds, Coordinate,
    render::{MapCanvas, MarkerSpec, PathSpec},
};

/// A [`MapCanvas`] that records what it is asked to draw as a GeoJSON
/// `FeatureCollection`, for viewing a planned day outside the browser.
#[derive(Debug, Default)]
pub struct GeoJsonCanvas {
    features: Vec<Value>,
    bbox: Option<Bounds>,
}

impl GeoJsonCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn to_value(&self) -> Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });
        if let Some(b) = self.bbox {
            collection["bbox"] = json!([b.min_lng, b.min_lat, b.max_lng, b.max_lat]);
        }
        collection
    }
}

// GeoJSON positions are [lng, lat].
fn position(coord: &Coordinate) -> Value {
    json!([coord.lng, coord.lat])
}

impl MapCanvas for GeoJsonCanvas {
    fn clear(&mut self) {
        self.features.clear();
        self.bbox = None;
    }

    fn draw_marker(&mut self, marker: &MarkerSpec) {
        self.features.push(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": position(&marker.position)},
            "properties": {
                "name": marker.title,
                "label": marker.label,
                "kind": marker.kind,
            },
        }));
    }

    fn draw_path(&mut self, path: &PathSpec) {
        let coordinates: Vec<Value> = path.points.iter().map(position).collect();
        self.features.push(json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": coordinates},
            "properties": {
                "from": path.from,
                "to": path.to,
                "stroke": path.color,
                "stroke-opacity": 0.8,
                "stroke-width": 3,
            },
        }));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.bbox = Some(bounds);
    }
}
