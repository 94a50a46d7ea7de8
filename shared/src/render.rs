//! Drawing one day of an itinerary onto a map.
//!
//! The map is never reached through global state: callers hand a [`MapCanvas`]
//! to [`render_day`], which lets the browser widget, a GeoJSON writer or a test
//! recorder sit behind the same rendering logic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Bounds, Coordinate, DayItinerary, PolylineError};

/// Stroke colours for route segments, cycled by segment index.
pub const ROUTE_COLORS: [&str; 10] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500", "#800080",
    "#008000", "#000080",
];

pub const LODGING_LABEL: &str = "H";

/// Capability handle for whatever draws the map.
pub trait MapCanvas {
    /// Remove every marker and path drawn so far.
    fn clear(&mut self);
    fn draw_marker(&mut self, marker: &MarkerSpec);
    fn draw_path(&mut self, path: &PathSpec);
    fn fit_bounds(&mut self, bounds: Bounds);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Lodging,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub label: String,
    pub title: String,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub from: String,
    pub to: String,
    pub color: String,
    pub points: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSummary {
    pub markers: usize,
    pub paths: usize,
    pub points: usize,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("route segment {index} ({from} -> {to}) has a malformed path: {source}")]
    Segment {
        index: usize,
        from: String,
        to: String,
        #[source]
        source: PolylineError,
    },
}

pub fn route_color(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}

/// Markers for a day's stops. The first stop is the hotel; a last stop equal
/// to the first is the return to the hotel and gets the same label.
pub fn stop_markers(day: &DayItinerary) -> Vec<MarkerSpec> {
    let first = day.route.first();
    let last_idx = day.route.len().saturating_sub(1);

    day.route
        .iter()
        .enumerate()
        .map(|(idx, place)| {
            let lodging = idx == 0 || (idx == last_idx && Some(place) == first);
            MarkerSpec {
                position: place.coordinates,
                label: if lodging {
                    LODGING_LABEL.to_string()
                } else {
                    idx.to_string()
                },
                title: place.name.clone(),
                kind: if lodging {
                    MarkerKind::Lodging
                } else {
                    MarkerKind::Stop
                },
            }
        })
        .collect()
}

/// Redraw `canvas` with the given day.
///
/// Segment paths are decoded up front; if one is malformed the canvas is left
/// exactly as it was.
pub fn render_day<C>(canvas: &mut C, day: &DayItinerary) -> Result<RenderSummary, RenderError>
where
    C: MapCanvas + ?Sized,
{
    let decoded = day.decoded_segments().map_err(|(index, source)| {
        let segment = &day.route_segments[index];
        RenderError::Segment {
            index,
            from: segment.from.clone(),
            to: segment.to.clone(),
            source,
        }
    })?;

    canvas.clear();

    let markers = stop_markers(day);
    for marker in &markers {
        canvas.draw_marker(marker);
    }

    let mut points = 0;
    for (idx, (segment, path)) in day.route_segments.iter().zip(decoded).enumerate() {
        points += path.len();
        canvas.draw_path(&PathSpec {
            from: segment.from.clone(),
            to: segment.to.clone(),
            color: route_color(idx).to_string(),
            points: path,
        });
    }

    let bounds = Bounds::from_points(day.route.iter().map(|place| place.coordinates));
    if let Some(bounds) = bounds {
        canvas.fit_bounds(bounds);
    }

    Ok(RenderSummary {
        markers: markers.len(),
        paths: day.route_segments.len(),
        points,
        bounds,
    })
}
