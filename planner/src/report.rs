use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use shared::{DayItinerary, Itinerary, render::render_day};

use crate::{
    distance::day_length_km, error::PlannerError, geojson::GeoJsonCanvas,
    gpx_export::encode_day_as_gpx,
};

/// Plain-text listing of each selected day's stops, followed by the driving
/// distance when the day has route segments.
pub fn format_itinerary(itinerary: &Itinerary, only_day: Option<&str>) -> String {
    let mut out = String::new();
    for (key, day) in selected_days(itinerary, only_day) {
        let _ = writeln!(out, "{key} Route:");
        for place in &day.route {
            let _ = writeln!(
                out,
                "  - {} ({:.5}, {:.5})",
                place.name, place.coordinates.lat, place.coordinates.lng
            );
        }
        if !day.route_segments.is_empty() {
            match day_length_km(day) {
                Some(km) => {
                    let _ = writeln!(out, "  Distance: {km:.1} km");
                }
                None => {
                    let _ = writeln!(out, "  Distance: unavailable (malformed route path)");
                }
            }
        }
    }
    out
}

pub fn selected_days<'a>(
    itinerary: &'a Itinerary,
    only_day: Option<&'a str>,
) -> impl Iterator<Item = (&'a str, &'a DayItinerary)> + 'a {
    itinerary
        .days()
        .filter(move |(key, _)| only_day.is_none_or(|wanted| wanted == *key))
}

/// `"Day 1"` becomes `day_1`.
pub fn file_stem(day_key: &str) -> String {
    let stem: String = day_key
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "day".to_string()
    } else {
        stem
    }
}

pub fn write_geojson(dir: &Path, day_key: &str, day: &DayItinerary) -> Result<PathBuf, PlannerError> {
    let mut canvas = GeoJsonCanvas::new();
    let summary = render_day(&mut canvas, day)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.geojson", file_stem(day_key)));
    fs::write(&path, serde_json::to_vec_pretty(&canvas.to_value())?)?;
    tracing::info!(
        "{day_key}: wrote {} marker(s) and {} path(s) to {}",
        summary.markers,
        summary.paths,
        path.display()
    );
    Ok(path)
}

pub fn write_gpx(dir: &Path, day_key: &str, day: &DayItinerary) -> Result<PathBuf, PlannerError> {
    let xml = encode_day_as_gpx(day_key, day)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.gpx", file_stem(day_key)));
    fs::write(&path, xml)?;
    tracing::info!("{day_key}: wrote GPX to {}", path.display());
    Ok(path)
}
