#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line orchestrator for the park proximity valuation pipeline.
//!
//! Wires the pipeline in its required order: fetch datasets, generate
//! valuation buffers and the boundary index, then answer area, parcel,
//! and hover queries. Dataset fetches go through the on-disk cache, so
//! repeated invocations stay off the network within the TTL windows.

use clap::{Parser, Subcommand};
use geo::Point;
use parkside_cache::CacheStore;
use parkside_datasets::{load, registry};
use parkside_valuation::context::AnalysisContext;
use parkside_valuation::parcel::VALUATION_ZONE_MILES;

/// Browser-like User-Agent for the open data portal.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; Parkside/1.0; +https://github.com)";

#[derive(Parser)]
#[command(name = "parkside", about = "Park proximity valuation toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch (or refresh from cache) all datasets and report counts.
    Fetch,
    /// Coverage report for one community area.
    Area {
        /// Community area code (e.g. "22").
        code: String,
    },
    /// Evaluate a single point: nearest park, premium, simulated value.
    Parcel {
        /// Longitude in degrees.
        lng: f64,
        /// Latitude in degrees.
        lat: f64,
    },
    /// Distance from a point to the nearest park boundary.
    Hover {
        /// Longitude in degrees.
        lng: f64,
        /// Latitude in degrees.
        lat: f64,
        /// Search radius in miles.
        #[arg(long, default_value_t = VALUATION_ZONE_MILES)]
        max_miles: f64,
    },
    /// Export the valuation buffer overlay as GeoJSON.
    Buffers {
        /// Output file path.
        #[arg(long)]
        out: std::path::PathBuf,
    },
    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Entry count, size, and hit/miss counters.
    Stats,
    /// Remove every cache entry.
    Clear,
    /// Remove expired entries only.
    ClearExpired,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let cache = CacheStore::open(parkside_cache::paths::cache_dir())?;

    match cli.command {
        Command::Fetch => fetch(cache).await?,
        Command::Area { code } => area(cache, &code).await?,
        Command::Parcel { lng, lat } => parcel(cache, Point::new(lng, lat)).await?,
        Command::Hover {
            lng,
            lat,
            max_miles,
        } => hover(cache, Point::new(lng, lat), max_miles).await?,
        Command::Buffers { out } => export_buffers(cache, &out).await?,
        Command::Cache { command } => cache_admin(&cache, &command),
    }

    Ok(())
}

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

async fn fetch(cache: CacheStore) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client()?;
    let config = registry::chicago();

    // The two primary datasets are independent; start both and join.
    let (areas, parks) = tokio::try_join!(
        load::load_community_areas(&client, &cache, &config),
        load::load_parks(&client, &cache, &config),
    )?;
    let waterways = load::load_waterways(&client, &cache, &config).await?;

    println!("Community areas: {}", areas.len());
    println!("Parks:           {}", parks.len());
    println!("Waterways:       {}", waterways.len());
    Ok(())
}

async fn area(cache: CacheStore, code: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client()?;
    let config = registry::chicago();

    let (areas, parks) = tokio::try_join!(
        load::load_community_areas(&client, &cache, &config),
        load::load_parks(&client, &cache, &config),
    )?;

    let Some(area) = areas.iter().find(|a| a.area_code == code) else {
        return Err(format!("No community area with code {code}").into());
    };

    let mut context = AnalysisContext::new(cache);
    context.load_parks(&parks);

    let report = context.area_coverage(area)?;
    println!("{} ({})", area.name, area.area_code);
    println!("  Inside valuation buffers: {:.1}%", report.inside_pct);
    println!("  Outside:                  {:.1}%", report.outside_pct);
    println!("  Average premium:          {:.1}%", report.average_premium);
    Ok(())
}

async fn parcel(cache: CacheStore, point: Point<f64>) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client()?;
    let config = registry::chicago();

    let parks = load::load_parks(&client, &cache, &config).await?;

    // Property lookup failures degrade to "not found"; they never block
    // the geometric evaluation.
    let property = match load::lookup_property(&client, &cache, &config, point).await {
        Ok(property) => property,
        Err(e) => {
            log::warn!("Property lookup failed: {e}");
            None
        }
    };

    let mut context = AnalysisContext::new(cache);
    context.load_parks(&parks);

    let report = context.evaluate_parcel(point)?;

    match property {
        Some(property) => println!("Parcel {} ({})", property.pin, property.address),
        None => println!("Parcel not found at ({:.5}, {:.5})", point.x(), point.y()),
    }

    if report.in_valuation_zone {
        if let Some(nearest) = &report.nearest {
            println!(
                "  Nearest park: {} ({:.2} mi to boundary)",
                nearest.name, nearest.distance_miles
            );
        }
        if let Some(valuation) = &report.valuation {
            println!("  Premium:      {:.1}%", valuation.premium_pct);
            println!("  Base value:   ${:.0}", valuation.base_value);
            println!("  With premium: ${:.0}", valuation.valuated_value);
        }
    } else {
        println!(
            "  Outside the valuation zone (no park within {VALUATION_ZONE_MILES} mi)"
        );
    }
    Ok(())
}

async fn hover(
    cache: CacheStore,
    point: Point<f64>,
    max_miles: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client()?;
    let config = registry::chicago();

    let parks = load::load_parks(&client, &cache, &config).await?;

    let mut context = AnalysisContext::new(cache);
    context.load_parks(&parks);

    match context.boundary_distance(point, max_miles)? {
        Some(distance) => println!("{distance:.3} mi to the nearest park boundary"),
        None => println!("No park boundary within {max_miles} mi"),
    }
    Ok(())
}

async fn export_buffers(
    cache: CacheStore,
    out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client()?;
    let config = registry::chicago();

    let parks = load::load_parks(&client, &cache, &config).await?;

    let mut context = AnalysisContext::new(cache);
    context.load_parks(&parks);

    let buffers = context.buffers()?;
    let features: Vec<geojson::Feature> = buffers
        .buffers()
        .iter()
        .map(|buffer| geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(
                &buffer.geometry,
            ))),
            id: Some(geojson::feature::Id::String(buffer.id.clone())),
            properties: serde_json::json!({
                "parkId": buffer.park_id,
                "parkName": buffer.park_name,
                "zone": buffer.zone_label,
                "premium": buffer.premium_pct,
            })
            .as_object()
            .cloned(),
            foreign_members: None,
        })
        .collect();

    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    std::fs::write(out, serde_json::to_string(&collection)?)?;
    println!("Wrote {} buffers to {}", buffers.len(), out.display());
    Ok(())
}

fn cache_admin(cache: &CacheStore, command: &CacheCommand) {
    match command {
        CacheCommand::Stats => {
            let stats = cache.stats();
            println!("Entries:   {}", stats.entry_count);
            println!("Size:      ~{} KB", stats.approx_size_kb);
            println!(
                "Hit rate:  {:.1}% ({} hits / {} misses)",
                stats.hit_rate, stats.hits, stats.misses
            );
        }
        CacheCommand::Clear => {
            cache.clear();
            println!("Cache cleared");
        }
        CacheCommand::ClearExpired => {
            let removed = cache.clear_expired();
            println!("Removed {removed} expired entries");
        }
    }
}
