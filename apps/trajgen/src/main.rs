//! trajgen — synthesize vehicle telemetry inside a city.
//!
//! Samples random points inside the city's boundary, routes between them
//! with OpenRouteService and writes the timestamped points, grouped into
//! rides, to CSV files (or an SQLite database with `--sqlite`).
//!
//! ```text
//! # five rides for vehicle 1, as fast as possible, starting now
//! ORS_API_KEY=... trajgen -v 1 -c Berlin -r 5 --register-vehicle
//!
//! # a week of history ending today
//! trajgen -v 1 -c Berlin -r 40 -o -7
//!
//! # live feed, one point per pacing interval, until interrupted
//! trajgen -v 1 -c Berlin --realtime
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use env_logger::{Builder, Env};

use tg_core::{GeneratorConfig, VehicleId};
use tg_engine::{FleetRequest, GeneratorBuilder, RunMode, RunRequest};
use tg_output::{CsvSink, SharedSink, TelemetrySink};
use tg_routing::OrsRouter;
use tg_spatial::{BoundaryResolver, FileResolver, NominatimResolver};

/// Environment variable holding the routing API key.
const API_KEY_VAR: &str = "ORS_API_KEY";

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Generate synthetic vehicle trajectories inside a city")]
struct Args {
    /// Vehicle id; repeat to run a fleet.
    #[arg(short = 'v', long = "vehicle-id", required = true)]
    vehicle_ids: Vec<u32>,

    /// City to drive in, as understood by Nominatim.
    #[arg(short, long)]
    city: String,

    /// Rides to generate per vehicle (ignored with --realtime).
    #[arg(short, long, default_value_t = 1)]
    rides: u32,

    /// Shift timestamps by this many days; negative generates history.
    #[arg(short, long, allow_negative_numbers = true)]
    offset_days: Option<f64>,

    /// Emit points at wall-clock pace until interrupted.
    #[arg(long)]
    realtime: bool,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Write to SQLite instead of CSV.
    #[arg(long)]
    sqlite: bool,

    /// RNG seed, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Read `<city>.geojson` boundaries from this directory instead of
    /// querying Nominatim.
    #[arg(long)]
    boundary_dir: Option<PathBuf>,

    /// Register the vehicle ids in the store before running.
    #[arg(long)]
    register_vehicle: bool,
}

impl Args {
    fn mode(&self) -> RunMode {
        match (self.realtime, self.offset_days) {
            (true, offset) => RunMode::Realtime { offset_days: offset.unwrap_or(0.0) },
            (false, Some(days)) => RunMode::Offset { days },
            (false, None) => RunMode::batch_now(),
        }
    }

    fn vehicles(&self) -> Vec<VehicleId> {
        self.vehicle_ids.iter().copied().map(VehicleId).collect()
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if config.routing.api_key.is_none() {
        config.routing.api_key = std::env::var(API_KEY_VAR).ok();
    }
    Ok(config)
}

fn open_resolver(args: &Args, config: &GeneratorConfig) -> Result<Box<dyn BoundaryResolver>> {
    Ok(match &args.boundary_dir {
        Some(dir) => Box::new(FileResolver::new(dir)),
        None => Box::new(NominatimResolver::new(&config.boundary)?),
    })
}

fn open_sink(args: &Args) -> Result<Box<dyn TelemetrySink>> {
    if args.sqlite {
        #[cfg(feature = "sqlite")]
        {
            let mut sink = tg_output::SqliteSink::open(&args.out)?;
            if args.register_vehicle {
                for vehicle in args.vehicles() {
                    sink.add_vehicle(vehicle)?;
                }
            }
            return Ok(Box::new(sink));
        }
        #[cfg(not(feature = "sqlite"))]
        anyhow::bail!("--sqlite needs a build with the `sqlite` feature");
    }

    let mut sink = CsvSink::open(&args.out)?;
    if args.register_vehicle {
        for vehicle in args.vehicles() {
            sink.add_vehicle(vehicle)?;
        }
    }
    Ok(Box::new(sink))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let api_key = config
        .routing
        .api_key
        .clone()
        .with_context(|| format!("no routing API key: set routing.api_key or {API_KEY_VAR}"))?;
    let router = OrsRouter::new(&config.routing, api_key)?;
    let resolver = open_resolver(&args, &config)?;
    let sink = SharedSink::new(open_sink(&args)?);

    let mut generator = GeneratorBuilder::new(config, resolver, router, sink).build()?;

    let vehicles = args.vehicles();
    let mode = args.mode();
    if let &[vehicle] = vehicles.as_slice() {
        let report = generator.run(&RunRequest {
            vehicle,
            city: args.city.clone(),
            rides: args.rides,
            mode,
        })?;
        log::info!("{report}");
    } else {
        let reports = generator.run_fleet(&FleetRequest {
            vehicles,
            city: args.city.clone(),
            rides: args.rides,
            mode,
        })?;
        for report in &reports {
            log::info!("{report}");
        }
    }

    let mut sink = generator
        .into_sink()
        .try_into_inner()
        .map_err(|_| anyhow!("sink still in use"))?;
    sink.finish()?;
    log::info!("output written to {}", args.out.display());
    Ok(())
}
