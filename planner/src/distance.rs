use shared::{Coordinate, DayItinerary};

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Length of a day's decoded route segments, or `None` if one of them is
/// malformed.
pub fn day_length_km(day: &DayItinerary) -> Option<f64> {
    let paths = day.decoded_segments().ok()?;
    Some(paths.iter().map(|path| path_length_km(path)).sum())
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}
