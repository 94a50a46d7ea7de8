use reqwest::StatusCode;
use shared::{PolylineError, render::RenderError};
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid itinerary request: {0}")]
    Invalid(#[from] ValidationError),
    #[error("request to planning service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("planning service answered {status}: {detail}")]
    Service { status: StatusCode, detail: String },
    #[error("planning service returned an empty itinerary")]
    EmptyItinerary,
    #[error("{day}: route segment {index} ({from} -> {to}) has a malformed path: {source}")]
    Polyline {
        day: String,
        index: usize,
        from: String,
        to: String,
        #[source]
        source: PolylineError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
