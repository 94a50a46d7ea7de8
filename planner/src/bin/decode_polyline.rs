use std::io::Read;

use clap::Parser;
use shared::{Coordinate, polyline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Decode an encoded polyline to coordinates, or encode coordinates back"
)]
struct Args {
    /// Encode a JSON array of {"lat", "lng"} objects instead of decoding
    #[arg(long)]
    encode: bool,

    /// Input value; read from stdin when omitted
    input: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let input = match args.input {
        Some(input) => input,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let input = input.trim();

    if args.encode {
        let path: Vec<Coordinate> = serde_json::from_str(input)?;
        tracing::debug!("encoding {} coordinate(s)", path.len());
        println!("{}", polyline::encode(&path));
    } else {
        let path = polyline::decode(input)?;
        tracing::debug!("decoded {} coordinate(s)", path.len());
        println!("{}", serde_json::to_string_pretty(&path)?);
    }

    Ok(())
}
