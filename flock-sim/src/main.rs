use anyhow::{Context, Result};
use clap::Parser;
use flock_core::{FlockController, UniformGrid};
use flock_shared::{FlockSettings, FrameStatus};
use flock_sim::{config_from_settings, load_settings, run, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless 3D flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; omitted fields keep their defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of boids (overrides the settings file)
    #[arg(short, long)]
    boids: Option<usize>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Time step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print a status line every n ticks (0 = only at the end)
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Seed for boid placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Use the uniform grid neighbor search instead of the O(n^2) scan
    #[arg(short, long)]
    grid: bool,

    /// Pace ticks in real time and advance by the measured frame time
    #[arg(long)]
    realtime: bool,

    /// Print status as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn print_status(status: &FrameStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(status)?);
    } else {
        let centroid = status
            .centroid
            .map(|c| format!("({:.2}, {:.2}, {:.2})", c[0], c[1], c[2]))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "tick {:>6}  boids {:>4}  centroid {}  mean speed {:.3}  order {:.3}",
            status.tick, status.boid_count, centroid, status.mean_speed, status.order
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => FlockSettings::default(),
    };
    if let Some(count) = args.boids {
        settings.boid_count = count;
    }

    let config = config_from_settings(&settings).context("Invalid settings")?;
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    log::info!("Seed: {}", seed);

    let options = RunOptions {
        ticks: args.ticks,
        dt: args.dt,
        report_every: args.report_every,
        realtime: args.realtime,
    };
    let json = args.json;

    if args.grid {
        let grid = UniformGrid::new(config.perception_radius);
        let mut flock = FlockController::with_search(settings.boid_count, config, seed, grid);
        run(&mut flock, &options, |status| print_status(status, json)).context("Simulation error")?;
    } else {
        let mut flock = FlockController::with_seed(settings.boid_count, config, seed);
        run(&mut flock, &options, |status| print_status(status, json)).context("Simulation error")?;
    }

    Ok(())
}
