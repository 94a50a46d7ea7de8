use std::{collections::BTreeMap, time::Duration};

use axum::{Json, Router, http::StatusCode, routing::post};
use planner::{
    DayItinerary, Itinerary, ItineraryRequest, Place, PlannerClient, PlannerConfig, PlannerError,
    RouteSegment, validation::ValidationError,
};
use serde_json::json;
use shared::{PolylineError, polyline::encode};

async fn spawn_service(app: Router) -> PlannerConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    PlannerConfig {
        api_root: format!("http://{addr}"),
        timeout: Duration::from_secs(5),
    }
}

fn request(days: u32) -> ItineraryRequest {
    ItineraryRequest {
        hotel: Place::new("Hotel Name", 13.7285038, 100.5656622),
        places: vec![
            Place::new("Little Zoo Café", 13.7113324, 100.6060409),
            Place::new("Cielo Sky Bar", 13.7092345, 100.5975182),
            Place::new("Masaru Anime", 13.713339, 100.5920146),
            Place::new("Safari World", 13.7635309, 100.633975),
        ],
        days,
    }
}

/// Round-robins the places over the days; each day leaves from and returns
/// to the hotel with straight-line segments.
fn plan(req: &ItineraryRequest) -> Itinerary {
    let mut days = BTreeMap::new();
    for day in 0..req.days as usize {
        let mut route = vec![req.hotel.clone()];
        route.extend(
            req.places
                .iter()
                .skip(day)
                .step_by(req.days as usize)
                .cloned(),
        );
        route.push(req.hotel.clone());
        let route_segments = route
            .windows(2)
            .map(|pair| RouteSegment {
                from: pair[0].name.clone(),
                to: pair[1].name.clone(),
                polyline: encode(&[pair[0].coordinates, pair[1].coordinates]),
            })
            .collect();
        days.insert(
            format!("Day {}", day + 1),
            DayItinerary {
                route,
                route_segments,
            },
        );
    }
    Itinerary(days)
}

fn planning_service() -> Router {
    Router::new().route(
        "/generate-itinerary",
        post(|Json(req): Json<ItineraryRequest>| async move { Json(plan(&req)) }),
    )
}

#[tokio::test]
async fn generate_itinerary_returns_every_day() {
    let config = spawn_service(planning_service()).await;
    let client = PlannerClient::new(&config).unwrap();

    let itinerary = client.generate_itinerary(&request(2)).await.unwrap();

    assert_eq!(itinerary.day_keys(), vec!["Day 1", "Day 2"]);
    let day = itinerary.day("Day 1").unwrap();
    assert_eq!(day.route.first(), day.route.last());
    assert_eq!(day.route[1].name, "Little Zoo Café");
    assert_eq!(day.route_segments.len(), day.route.len() - 1);

    let decoded = day.decoded_segments().unwrap();
    assert!((decoded[0][1].lat - 13.71133).abs() < 1e-9);
}

#[tokio::test]
async fn service_error_detail_is_surfaced() {
    let app = Router::new().route(
        "/generate-itinerary",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Failed to generate itinerary"})),
            )
        }),
    );
    let client = PlannerClient::new(&spawn_service(app).await).unwrap();

    let err = client.generate_itinerary(&request(1)).await.unwrap_err();
    match err {
        PlannerError::Service { status, detail } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(detail, "Failed to generate itinerary");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let app = Router::new().route(
        "/generate-itinerary",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let client = PlannerClient::new(&spawn_service(app).await).unwrap();

    let err = client.generate_itinerary(&request(1)).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Service { ref detail, .. } if detail == "upstream down"
    ));
}

#[tokio::test]
async fn empty_itinerary_is_rejected() {
    let app = Router::new().route(
        "/generate-itinerary",
        post(|| async { Json(json!({})) }),
    );
    let client = PlannerClient::new(&spawn_service(app).await).unwrap();

    let err = client.generate_itinerary(&request(1)).await.unwrap_err();
    assert!(matches!(err, PlannerError::EmptyItinerary));
}

#[tokio::test]
async fn malformed_segment_path_is_rejected() {
    let app = Router::new().route(
        "/generate-itinerary",
        post(|| async {
            Json(json!({
                "Day 1": {
                    "route": [
                        {"name": "Hotel", "coordinates": {"lat": 38.5, "lng": -120.2}},
                        {"name": "Museum", "coordinates": {"lat": 40.7, "lng": -120.95}}
                    ],
                    "routeSegments": [
                        {"from": "Hotel", "to": "Museum", "polyline": "_p~iF~ps|U_ulL"}
                    ]
                }
            }))
        }),
    );
    let client = PlannerClient::new(&spawn_service(app).await).unwrap();

    let err = client.generate_itinerary(&request(1)).await.unwrap_err();
    match err {
        PlannerError::Polyline {
            day,
            index,
            to,
            source,
            ..
        } => {
            assert_eq!(day, "Day 1");
            assert_eq!(index, 0);
            assert_eq!(to, "Museum");
            assert_eq!(source, PolylineError::Truncated { offset: 14 });
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_request_is_not_sent() {
    let config = PlannerConfig {
        api_root: "http://127.0.0.1:9".into(),
        timeout: Duration::from_secs(1),
    };
    let client = PlannerClient::new(&config).unwrap();

    let err = client.generate_itinerary(&request(9)).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Invalid(ValidationError::TooManyDays { days: 9, locations: 5 })
    ));
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = PlannerConfig {
        api_root: format!("http://{addr}"),
        timeout: Duration::from_secs(2),
    };
    let client = PlannerClient::new(&config).unwrap();

    let err = client.generate_itinerary(&request(1)).await.unwrap_err();
    assert!(matches!(err, PlannerError::Http(_)));
}
