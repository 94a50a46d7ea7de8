use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod polyline;
pub mod render;

pub use polyline::PolylineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A named location: the hotel, a point of interest or a stop of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinate,
}

impl Place {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinate { lat, lng },
        }
    }
}

/// Body of `POST /generate-itinerary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub hotel: Place,
    pub places: Vec<Place>,
    #[serde(default = "default_days")]
    pub days: u32,
}

pub fn default_days() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    pub polyline: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayItinerary {
    pub route: Vec<Place>,
    #[serde(rename = "routeSegments", default)]
    pub route_segments: Vec<RouteSegment>,
}

impl DayItinerary {
    /// Decodes every segment path, stopping at the first malformed one.
    pub fn decoded_segments(&self) -> Result<Vec<Vec<Coordinate>>, (usize, PolylineError)> {
        self.route_segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| polyline::decode(&segment.polyline).map_err(|err| (idx, err)))
            .collect()
    }
}

/// Day key (`"Day 1"`, `"Day 2"`, ...) to that day's plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(pub BTreeMap<String, DayItinerary>);

impl Itinerary {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn day(&self, key: &str) -> Option<&DayItinerary> {
        self.0.get(key)
    }

    /// Keys in day order: `Day 2` before `Day 10`, unnumbered keys last.
    pub fn day_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_by_key(|key| (day_ordinal(key).unwrap_or(u32::MAX), *key));
        keys
    }

    pub fn first_day(&self) -> Option<&str> {
        self.day_keys().into_iter().next()
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &DayItinerary)> {
        self.day_keys()
            .into_iter()
            .filter_map(|key| self.0.get(key).map(|day| (key, day)))
    }
}

fn day_ordinal(key: &str) -> Option<u32> {
    key.rsplit(|c: char| !c.is_ascii_digit())
        .next()
        .filter(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok())
}

/// Error body returned by the planning service with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn around(point: Coordinate) -> Self {
        Self {
            min_lat: point.lat,
            max_lat: point.lat,
            min_lng: point.lng,
            max_lng: point.lng,
        }
    }

    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::around(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lng = self.max_lng.max(point.lng);
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}
