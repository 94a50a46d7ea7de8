use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use shared::{Coordinate, DayItinerary};

use crate::error::PlannerError;

const CREATOR: &str = "trip-planner";

/// One waypoint per stop plus a track whose segments are the decoded route
/// segments, in visiting order.
pub fn encode_day_as_gpx(day_key: &str, day: &DayItinerary) -> Result<String, PlannerError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    for place in &day.route {
        let mut waypoint = to_waypoint(&place.coordinates);
        waypoint.name = Some(place.name.clone());
        gpx.waypoints.push(waypoint);
    }

    let mut track = Track {
        name: Some(day_key.to_string()),
        ..Default::default()
    };
    for (segment, path) in day.route_segments.iter().zip(decode_all(day_key, day)?) {
        let mut track_segment = TrackSegment::new();
        track_segment.points.extend(path.iter().map(to_waypoint));
        tracing::debug!(
            "{day_key}: {} -> {} with {} point(s)",
            segment.from,
            segment.to,
            track_segment.points.len()
        );
        track.segments.push(track_segment);
    }
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn decode_all(day_key: &str, day: &DayItinerary) -> Result<Vec<Vec<Coordinate>>, PlannerError> {
    day.decoded_segments().map_err(|(index, source)| {
        let segment = &day.route_segments[index];
        PlannerError::Polyline {
            day: day_key.to_string(),
            index,
            from: segment.from.clone(),
            to: segment.to.clone(),
            source,
        }
    })
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lng, coord.lat))
}
