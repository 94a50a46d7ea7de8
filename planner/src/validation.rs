use shared::{ItineraryRequest, Place};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("hotel name is required")]
    MissingHotel,
    #[error("at least one place to visit is required")]
    NoPlaces,
    #[error("number of days must be at least 1")]
    NoDays,
    #[error("{days} days requested but only {locations} locations to split between them")]
    TooManyDays { days: u32, locations: usize },
    #[error("place #{index} has no name")]
    UnnamedPlace { index: usize },
    #[error("{name}: coordinates ({lat}, {lng}) are out of range")]
    InvalidCoordinates { name: String, lat: f64, lng: f64 },
}

/// Checks a request before it is sent.
///
/// The service splits the hotel and the places into `days` clusters, so it
/// needs at least as many locations as days.
pub fn validate_request(req: &ItineraryRequest) -> Result<(), ValidationError> {
    if req.hotel.name.trim().is_empty() {
        return Err(ValidationError::MissingHotel);
    }
    if req.places.is_empty() {
        return Err(ValidationError::NoPlaces);
    }
    if req.days == 0 {
        return Err(ValidationError::NoDays);
    }
    let locations = req.places.len() + 1;
    if req.days as usize > locations {
        return Err(ValidationError::TooManyDays {
            days: req.days,
            locations,
        });
    }

    check_coordinates(&req.hotel)?;
    for (index, place) in req.places.iter().enumerate() {
        if place.name.trim().is_empty() {
            return Err(ValidationError::UnnamedPlace { index });
        }
        check_coordinates(place)?;
    }
    Ok(())
}

fn check_coordinates(place: &Place) -> Result<(), ValidationError> {
    if place.coordinates.is_valid() {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoordinates {
            name: place.name.clone(),
            lat: place.coordinates.lat,
            lng: place.coordinates.lng,
        })
    }
}
