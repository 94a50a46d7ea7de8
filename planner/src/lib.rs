pub mod client;
pub mod config;
pub mod distance;
pub mod error;
pub mod geojson;
pub mod gpx_export;
pub mod report;
pub mod validation;

pub use client::PlannerClient;
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use shared::{DayItinerary, Itinerary, ItineraryRequest, Place, RouteSegment};
