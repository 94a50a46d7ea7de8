use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use planner::{
    ItineraryRequest, Place, PlannerClient, PlannerConfig,
    config::{DEFAULT_API_ROOT, DEFAULT_TIMEOUT_SECS},
    report::{format_itinerary, selected_days, write_geojson, write_gpx},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Plan a multi-day trip with the remote itinerary service"
)]
struct Args {
    /// JSON file holding a full request ({"hotel": .., "places": [..], "days": N})
    #[arg(long, conflicts_with_all = ["hotel", "place"])]
    request: Option<PathBuf>,

    /// Hotel as "Name@lat,lng"
    #[arg(long, required_unless_present = "request")]
    hotel: Option<PlaceArg>,

    /// Place to visit as "Name@lat,lng" (repeatable)
    #[arg(long = "place")]
    place: Vec<PlaceArg>,

    /// Number of days to spread the places over
    #[arg(long, default_value_t = 1)]
    days: u32,

    /// Base URL of the planning service
    #[arg(long, env = "PLANNER_API_ROOT", default_value = DEFAULT_API_ROOT)]
    api_root: String,

    /// Request timeout in seconds
    #[arg(long, env = "PLANNER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Only print and export this day (e.g. "Day 2")
    #[arg(long)]
    day: Option<String>,

    /// Directory where one GeoJSON file per day is written
    #[arg(long)]
    geojson_dir: Option<PathBuf>,

    /// Directory where one GPX file per day is written
    #[arg(long)]
    gpx_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct PlaceArg(Place);

impl FromStr for PlaceArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, coords) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected Name@lat,lng, got {s:?}"))?;
        let (lat, lng) = coords
            .split_once(',')
            .ok_or_else(|| format!("expected lat,lng after '@', got {coords:?}"))?;
        let parse = |field: &str, label: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid {label} {field:?}"))
        };
        Ok(Self(Place::new(
            name.trim(),
            parse(lat, "latitude")?,
            parse(lng, "longitude")?,
        )))
    }
}

impl Args {
    fn itinerary_request(&self) -> Result<ItineraryRequest, Box<dyn std::error::Error>> {
        if let Some(path) = &self.request {
            let raw = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&raw)?);
        }
        let hotel = self
            .hotel
            .clone()
            .ok_or("either --request or --hotel is required")?;
        Ok(ItineraryRequest {
            hotel: hotel.0,
            places: self.place.iter().map(|p| p.0.clone()).collect(),
            days: self.days,
        })
    }

    fn config(&self) -> PlannerConfig {
        PlannerConfig {
            api_root: self.api_root.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planner=info,plan_trip=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let request = args.itinerary_request()?;
    let client = PlannerClient::new(&args.config())?;

    let itinerary = client.generate_itinerary(&request).await?;
    if let Some(day) = &args.day {
        if itinerary.day(day).is_none() {
            return Err(format!(
                "{day:?} is not in the itinerary (available: {})",
                itinerary.day_keys().join(", ")
            )
            .into());
        }
    }

    print!("{}", format_itinerary(&itinerary, args.day.as_deref()));

    for (key, day) in selected_days(&itinerary, args.day.as_deref()) {
        if let Some(dir) = &args.geojson_dir {
            write_geojson(dir, key, day)?;
        }
        if let Some(dir) = &args.gpx_dir {
            write_gpx(dir, key, day)?;
        }
    }

    Ok(())
}
