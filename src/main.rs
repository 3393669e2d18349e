use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

use kadasrouting::config::FileConfig;
use kadasrouting::domain::{AreaPolygon, Coordinate};
use kadasrouting::geometry::{Crs, GeometryReprojector};
use kadasrouting::polyline::PolylineOptions;
use kadasrouting::valhalla::{AvoidPolygons, RouteResponse, format_distance};

/// Decode Valhalla route shapes and prepare avoid areas in WGS84
///
/// Examples:
///   # Decode a Google-style precision 5 polyline
///   kadasrouting decode --precision 5 '_p~iF~ps|U_ulLnnqC_mqNvxq`@'
///
///   # Decode a precision 6 shape with elevation from stdin
///   cat shape.txt | kadasrouting decode --three-d
///
///   # Reproject Swiss LV95 GeoJSON polygons into one avoid_polygons payload
///   kadasrouting avoid --crs EPSG:2056 patrol_area.geojson drawn.geojson
///
///   # Decode every leg of a saved /route response
///   kadasrouting route-shape response.json
///
///   # Decode the whole trip as one line
///   kadasrouting route-shape --merged response.json
#[derive(Parser, Debug)]
#[command(name = "kadasrouting")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches kadasrouting.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an encoded polyline into a JSON coordinate array
    Decode {
        /// Encoded polyline (read from stdin when omitted)
        encoded: Option<String>,

        /// Coordinate precision used by the encoder (defaults to 6)
        #[arg(short = 'p', long, value_parser = clap::value_parser!(u32).range(1..=15))]
        precision: Option<u32>,

        /// Values carry an elevation component
        #[arg(long)]
        three_d: bool,
    },
    /// Reproject GeoJSON polygons to a WGS84 avoid_polygons payload
    Avoid {
        /// GeoJSON files, combined into one payload (stdin when omitted)
        files: Vec<PathBuf>,

        /// CRS of the input coordinates, e.g. EPSG:2056
        #[arg(long)]
        crs: Option<Crs>,
    },
    /// Decode the leg shapes of a Valhalla route response
    RouteShape {
        /// Response JSON file (read from stdin when omitted)
        file: Option<PathBuf>,

        /// Join the legs into a single trip shape
        #[arg(long)]
        merged: bool,
    },
}

#[derive(Serialize)]
struct LegOutput {
    distance: String,
    shape: Vec<Coordinate>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref config_path) => {
            if !config_path.exists() {
                bail!("Config file not found: {:?}", config_path);
            }
            FileConfig::from_path(config_path)?
        }
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Decode {
            encoded,
            precision,
            three_d,
        } => {
            let options = PolylineOptions::new(precision.unwrap_or(file_config.precision))
                .with_3d(three_d || file_config.three_d);
            let encoded = match encoded {
                Some(s) => s,
                None => read_input(None)?,
            };
            let coordinates = options
                .decode(encoded.trim())
                .context("Failed to decode polyline")?;
            info!(points = coordinates.len(), "decoded polyline");
            print_json(&coordinates)
        }
        Command::Avoid { files, crs } => {
            let Some(crs) = crs.or_else(|| file_config.source_crs()) else {
                bail!("No source CRS: pass --crs or set source_crs in the config file");
            };
            let inputs: Vec<Option<&Path>> = if files.is_empty() {
                vec![None]
            } else {
                files.iter().map(|f| Some(f.as_path())).collect()
            };

            let reprojector = GeometryReprojector::builtin();
            let mut avoid = AvoidPolygons::default();
            let mut polygons = 0;
            for input in inputs {
                let contents = read_input(input)?;
                let areas = AreaPolygon::parse_geojson(&contents)
                    .with_context(|| format!("Failed to read polygons from {}", describe(input)))?;
                polygons += areas.len();
                avoid.extend(
                    AvoidPolygons::from_areas(&reprojector, &crs, &areas)
                        .with_context(|| format!("Failed to reproject areas from {}", crs))?,
                );
            }
            if polygons == 0 {
                bail!("Input contains no polygons");
            }

            info!(
                polygons,
                rings = avoid.avoid_polygons.len(),
                "reprojected avoid areas"
            );
            print_json(&avoid)
        }
        Command::RouteShape { file, merged } => {
            let contents = read_input(file.as_deref())?;
            let response =
                RouteResponse::from_json(&contents).context("Failed to parse route response")?;

            if merged {
                let shape = response
                    .route_shape()
                    .context("Failed to decode route shape")?;
                let trip = &response.trip;
                let output = LegOutput {
                    distance: format_distance(
                        trip.summary.as_ref().map(|s| trip.length_meters(s)),
                    ),
                    shape,
                };
                info!(points = output.shape.len(), "decoded merged route");
                return print_json(&output);
            }

            let shapes = response
                .leg_shapes()
                .context("Failed to decode route leg shape")?;

            let legs: Vec<LegOutput> = response
                .trip
                .legs
                .iter()
                .zip(shapes)
                .map(|(leg, shape)| LegOutput {
                    distance: format_distance(
                        leg.summary.as_ref().map(|s| response.trip.length_meters(s)),
                    ),
                    shape,
                })
                .collect();
            info!(legs = legs.len(), "decoded route");
            print_json(&legs)
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).context(format!("Failed to read {:?}", p)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "stdin".to_string(), |p| format!("{:?}", p))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
