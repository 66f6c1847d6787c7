//! sofia: end-to-end dispatch run over central Sofia.
//!
//! 1. Preload road tiles into an in-memory cache.
//! 2. Load restaurants and refresh their pending orders.
//! 3. Spawn drivers near random restaurants with the chosen position strategy.
//! 4. Distribute drivers and commit the assignment.
//! 5. Write `report.json`, `restaurants.csv`, and `drivers.csv`.
//!
//! Without `--roads` / `--restaurants` a small embedded dataset is used.
//! Log level comes from `RUST_LOG` (default `info`).

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use fd_core::{FleetConfig, SimRng};
use fd_dispatch::{
    DistributorKind, FleetStore, MemoryFleetStore, load_restaurants_file, load_restaurants_json,
    refresh_orders, run_distribution, spawn_drivers,
};
use fd_report::{
    CsvReportWriter, JsonReportWriter, ReportWriter, generate_report, orders_snapshot,
};
use fd_roads::{
    IndexerConfig, MemoryTileCache, PositionStrategy, RadiusUnit, SamplerConfig, SegmentStream,
    TileIndexer,
};

// ── Embedded dataset ──────────────────────────────────────────────────────────

// Polylines as [lng, lat] pairs.
const ROADS_JSON: &str = r#"[
  [[23.3206, 42.6955], [23.3195, 42.6905], [23.3180, 42.6860], [23.3165, 42.6820]],
  [[23.3230, 42.6965], [23.3290, 42.6945], [23.3350, 42.6930], [23.3400, 42.6915]],
  [[23.3300, 42.6990], [23.3310, 42.6920], [23.3270, 42.6870]],
  [[23.3000, 42.6800], [23.3060, 42.6850], [23.3100, 42.6890], [23.3150, 42.6930]],
  [[23.3150, 42.6900], [23.3220, 42.6890], [23.3290, 42.6885]],
  [[23.3350, 42.6990], [23.3400, 42.6960], [23.3450, 42.6940]]
]"#;

const RESTAURANTS_JSON: &str = r#"[
  {"title": "Happy Bar & Grill",     "coordinates": [42.6886, 23.308027]},
  {"title": "Skaptobara Oborishte",  "coordinates": [42.6951, 23.3353]},
  {"title": "Made in Home",          "coordinates": [42.6925, 23.3206]},
  {"title": "Raketa Rakia Bar",      "coordinates": [42.6960, 23.3381]},
  {"title": "Cosmos",                "coordinates": [42.6920, 23.3260]},
  {"title": "Shtastliveca",          "coordinates": [42.6975, 23.3220]}
]"#;

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Preload roads, spawn a fleet, distribute drivers, and write a report.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Road polylines JSON (`[[[lng, lat], ...], ...]`).
    #[arg(long)]
    roads: Option<PathBuf>,

    /// Restaurants JSON (`[{"title", "coordinates": [lat, lng]}, ...]`).
    #[arg(long)]
    restaurants: Option<PathBuf>,

    /// Driver positioning: roads|random-offset
    #[arg(long, default_value_t = PositionStrategy::Roads)]
    strategy: PositionStrategy,

    /// Assignment algorithm: greedy|sorted-cost
    #[arg(long, default_value_t = DistributorKind::Greedy)]
    distributor: DistributorKind,

    /// Master RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of drivers to spawn
    #[arg(long, default_value_t = 100)]
    drivers: u32,

    /// Placement radius around a restaurant
    #[arg(long, default_value_t = 5.0)]
    radius: f64,

    /// Treat the road sampler radius as kilometres instead of degrees
    #[arg(long, default_value_t = false)]
    km: bool,

    /// Directory for report files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let t0 = Instant::now();

    let cfg = FleetConfig {
        seed:                args.seed,
        driver_count:        args.drivers,
        placement_radius_km: args.radius,
        ..FleetConfig::default()
    };
    cfg.validate()?;
    let mut rng = SimRng::new(cfg.seed);

    // 1. Road tiles.
    let cache = Arc::new(MemoryTileCache::new());
    let indexer = TileIndexer::new(Arc::clone(&cache), IndexerConfig::default());
    let stats = match &args.roads {
        Some(path) => indexer
            .preload_file(path)
            .with_context(|| format!("preloading {}", path.display()))?,
        None => indexer.preload(SegmentStream::new(Cursor::new(ROADS_JSON)))?,
    };
    println!(
        "Road tiles: {} entries in {} tiles ({} flushes)",
        stats.entries,
        cache.len(),
        stats.flushes
    );

    // 2. Restaurants and orders.
    let restaurants = match &args.restaurants {
        Some(path) => load_restaurants_file(path, &mut rng)
            .with_context(|| format!("loading {}", path.display()))?,
        None => load_restaurants_json(Cursor::new(RESTAURANTS_JSON), &mut rng)?,
    };
    let store = MemoryFleetStore::new(restaurants);
    store.set_orders(&refresh_orders(&store.restaurants()?, &mut rng))?;

    // 3. Fleet.
    let sampler_config = SamplerConfig {
        radius_unit: if args.km { RadiusUnit::Kilometres } else { RadiusUnit::Degrees },
        ..SamplerConfig::default()
    };
    let sampler = args.strategy.build(Arc::clone(&cache), sampler_config);
    let drivers = spawn_drivers(&cfg, &store.restaurants()?, sampler.as_ref(), &mut rng);
    store.place_drivers(drivers)?;

    // 4. Distribution.
    let before = orders_snapshot(&store.restaurants()?);
    let distributor = args.distributor.build();
    let assignment = run_distribution(&store, &distributor)?;

    // 5. Report.
    let report = generate_report(&store.drivers()?, &store.restaurants()?, &before);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut json = JsonReportWriter::new(&args.output.join("report.json"))?;
    json.write_report(&report)?;
    json.finish()?;
    let mut csv = CsvReportWriter::new(&args.output)?;
    csv.write_report(&report)?;
    csv.finish()?;

    println!();
    println!("{:<24} {:>8} {:>8}", "restaurant", "before", "after");
    for r in &report.restaurants {
        println!("{:<24} {:>8} {:>8}", r.title, r.orders_before, r.orders_after);
    }
    println!();
    println!(
        "Assigned {} of {} drivers with {} ({} unassigned, {} orders left)",
        assignment.len(),
        report.drivers.len(),
        args.distributor,
        report.unassigned_count(),
        report.remaining_orders()
    );
    println!("Average distance to assigned restaurant: {} km", report.average_distance_km);
    println!("Report written to {}", args.output.display());

    info!("Done in {:.2?}", t0.elapsed());
    Ok(())
}
