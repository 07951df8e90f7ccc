#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the safe-route toolchain.
//!
//! `ingest` builds the incident store from a downloaded feed snapshot;
//! `score` scores a walking route against a store; `feeds` lists the
//! configured feed definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use safe_route_incident_models::RoutePoint;
use safe_route_scoring::RouteScorer;
use safe_route_scoring::score::DEFAULT_CORRIDOR_RADIUS_M;
use safe_route_store::DuckDbStore;

#[derive(Parser)]
#[command(name = "safe_route", about = "Pedestrian route safety scoring tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build (replace) the incident store from a feed CSV snapshot
    Ingest {
        /// Feed identifier (e.g., "`chicago_crimes`")
        feed: String,
        /// Path to the downloaded CSV snapshot
        #[arg(long)]
        input: PathBuf,
        /// Path to the incident store file to (re)build
        #[arg(long, default_value = "data/incidents.duckdb")]
        db: PathBuf,
    },
    /// Score a walking route against the incident store
    Score {
        /// Route points as "lat,lng;lat,lng;..."
        #[arg(long)]
        points: String,
        /// Corridor radius in meters
        #[arg(long, default_value_t = DEFAULT_CORRIDOR_RADIUS_M)]
        radius: f64,
        /// Path to the incident store file
        #[arg(long, default_value = "data/incidents.duckdb")]
        db: PathBuf,
    },
    /// List all configured feed definitions
    Feeds,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { feed, input, db } => {
            let Some(def) = safe_route_feed::registry::find_feed(&feed) else {
                return Err(format!(
                    "unknown feed {feed:?}; available: {}",
                    safe_route_feed::registry::all_feeds()
                        .iter()
                        .map(|f| f.id.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
                .into());
            };

            let written = safe_route_feed::build_store(&def, &input, &db)?;
            println!("Wrote {written} incidents to {}", db.display());
        }
        Commands::Score { points, radius, db } => {
            let route = parse_route(&points)?;
            let store = DuckDbStore::open(&db)?;

            let scorer = RouteScorer::with_default_config();
            let result = scorer.score(&store, &route, radius)?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Feeds => {
            for def in safe_route_feed::registry::all_feeds() {
                println!("{}: {}", def.id, def.name);
            }
        }
    }

    Ok(())
}

/// Parses a route string of the form `"lat,lng;lat,lng;..."`.
fn parse_route(input: &str) -> Result<Vec<RoutePoint>, String> {
    let mut points = Vec::new();

    for (i, pair) in input.split(';').enumerate() {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let Some((lat_str, lng_str)) = pair.split_once(',') else {
            return Err(format!("point {i}: expected \"lat,lng\", got {pair:?}"));
        };

        let latitude: f64 = lat_str
            .trim()
            .parse()
            .map_err(|_| format!("point {i}: invalid latitude {lat_str:?}"))?;
        let longitude: f64 = lng_str
            .trim()
            .parse()
            .map_err(|_| format!("point {i}: invalid longitude {lng_str:?}"))?;

        points.push(RoutePoint::new(latitude, longitude));
    }

    if points.is_empty() {
        return Err("route must contain at least one point".to_string());
    }

    Ok(points)
}
