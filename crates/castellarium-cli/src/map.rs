use clap::Subcommand;

use castellarium_core::geo::{bounds, nearby};
use castellarium_core::{select, Coordinates};

use crate::app::AppContext;

/// Sub-commands available under `map`.
#[derive(Debug, Subcommand)]
pub enum MapCommands {
    /// Positions of visited castles and the box enclosing them
    Visited,
    /// Castles around a position, closest first
    Near {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius; defaults to `CASTELLARIUM_NEARBY_RADIUS_KM`
        #[arg(long)]
        radius_km: Option<f64>,
    },
}

/// # Errors
///
/// Returns an error if the position or radius is out of range.
pub(crate) fn run_map(ctx: &AppContext, command: MapCommands) -> anyhow::Result<()> {
    match command {
        MapCommands::Visited => {
            run_map_visited(ctx);
            Ok(())
        }
        MapCommands::Near {
            lat,
            lon,
            radius_km,
        } => run_map_near(
            ctx,
            lat,
            lon,
            radius_km.unwrap_or(ctx.config.nearby_radius_km),
        ),
    }
}

fn run_map_visited(ctx: &AppContext) {
    let ids = ctx.tracker.ids();
    let visited = select(&ctx.castles, |id| ids.is_visited(id));
    let placed: Vec<_> = visited
        .iter()
        .filter_map(|castle| castle.coordinates.map(|position| (*castle, position)))
        .collect();

    if placed.is_empty() {
        println!("no visited castle has a known position");
        return;
    }

    for (castle, position) in &placed {
        println!(
            "{:>9.5} {:>10.5}  {}",
            position.latitude, position.longitude, castle.name
        );
    }
    let unplaced = visited.len() - placed.len();
    if unplaced > 0 {
        println!("({unplaced} visited castles have no position)");
    }
    if let Some(area) = bounds(placed.iter().map(|(_, position)| *position)) {
        println!();
        println!(
            "bounds: {:.5},{:.5} .. {:.5},{:.5}",
            area.south_west.latitude,
            area.south_west.longitude,
            area.north_east.latitude,
            area.north_east.longitude
        );
    }
}

fn run_map_near(ctx: &AppContext, lat: f64, lon: f64, radius_km: f64) -> anyhow::Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        anyhow::bail!("position {lat}, {lon} is outside valid latitude/longitude ranges");
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        anyhow::bail!("radius must be a positive number of kilometers, got {radius_km}");
    }

    let origin = Coordinates {
        latitude: lat,
        longitude: lon,
    };
    let hits = nearby(&ctx.castles, origin, radius_km * 1000.0);
    if hits.is_empty() {
        println!("no castle within {radius_km} km");
        return Ok(());
    }

    let ids = ctx.tracker.ids();
    for hit in &hits {
        let flag = if ids.is_visited(&hit.castle.id) {
            "V"
        } else {
            "-"
        };
        println!(
            "{:>7.1} km  {flag}  {:<14}{}",
            hit.distance_m / 1000.0,
            hit.castle.id,
            hit.castle.name
        );
    }
    Ok(())
}
