use shared::{Itinerary, ItineraryRequest, ServiceError};

use crate::{config::PlannerConfig, error::PlannerError, validation::validate_request};

/// HTTP client for the remote `/generate-itinerary` endpoint.
#[derive(Debug, Clone)]
pub struct PlannerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PlannerClient {
    pub fn new(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validates `req`, asks the service for a plan and checks that every
    /// returned segment path decodes.
    pub async fn generate_itinerary(
        &self,
        req: &ItineraryRequest,
    ) -> Result<Itinerary, PlannerError> {
        validate_request(req)?;
        tracing::info!(
            "requesting {} day(s) for {} place(s) from {}",
            req.days,
            req.places.len(),
            self.endpoint
        );

        let response = self.http.post(&self.endpoint).json(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ServiceError>(&body)
                .map(|err| err.detail)
                .unwrap_or(body);
            tracing::warn!("planning service answered {status}: {detail}");
            return Err(PlannerError::Service { status, detail });
        }

        let itinerary: Itinerary = response.json().await?;
        if itinerary.is_empty() {
            tracing::warn!("planning service returned an empty itinerary");
            return Err(PlannerError::EmptyItinerary);
        }
        check_segments(&itinerary)?;

        tracing::info!("received itinerary with {} day(s)", itinerary.len());
        Ok(itinerary)
    }
}

/// Fails on the first route segment whose path does not decode.
pub fn check_segments(itinerary: &Itinerary) -> Result<(), PlannerError> {
    for (key, day) in itinerary.days() {
        if let Err((index, source)) = day.decoded_segments() {
            let segment = &day.route_segments[index];
            return Err(PlannerError::Polyline {
                day: key.to_string(),
                index,
                from: segment.from.clone(),
                to: segment.to.clone(),
                source,
            });
        }
        tracing::debug!(
            "{key}: {} stop(s), {} segment(s)",
            day.route.len(),
            day.route_segments.len()
        );
    }
    Ok(())
}
