//! yo-mission — run a JSON-configured glider mission and write CSV telemetry.
//!
//! ```text
//! cargo run -p yo-mission -- demos/yo-mission/missions/yo.json --out output/yo
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use gs_core::Field;
use gs_output::{CsvWriter, TelemetryRecorder};
use gs_sim::{MissionBuilder, MissionConfig};
use log::info;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_OUT_DIR: &str = "output/yo-mission";

// ── Command line ──────────────────────────────────────────────────────────────

/// Command line arguments for the mission runner
#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate a glider mission from a JSON configuration")]
struct Args {
    /// Mission configuration (JSON)
    mission: PathBuf,

    /// Directory for telemetry.csv and summary.csv
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    out: PathBuf,

    /// Override the configured RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the configured telemetry period, s
    #[arg(long)]
    store_period: Option<f64>,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // 1. Configuration.
    let text = fs::read_to_string(&args.mission)
        .with_context(|| format!("reading {}", args.mission.display()))?;
    let mut config = MissionConfig::from_json(&text)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(period) = args.store_period {
        config.store_period = period;
    }
    let store_period = config.store_period;
    println!("=== yo-mission: {} ===", config.name);
    println!(
        "Start {} {} at {}  |  dt {} s  |  cycle {} s  |  seed {}",
        config.start_date,
        config.start_time.as_deref().unwrap_or("00:00"),
        config.start_position(),
        config.dt,
        config.cpu_cycle,
        config.seed,
    );

    // 2. Build.
    let mut mission = MissionBuilder::new(config).build()?;
    let names: Vec<&str> = mission.control().behaviors().map(|b| b.name()).collect();
    println!("Behaviors (highest priority first): {}", names.iter().rev().copied().collect::<Vec<_>>().join(", "));

    // 3. Output.
    fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    let writer = CsvWriter::new(&args.out)?;
    let mut recorder = TelemetryRecorder::new(writer, store_period);

    // 4. Run.
    let t0 = Instant::now();
    let report = mission.run(&mut recorder)?;
    let elapsed = t0.elapsed();
    if let Some(e) = recorder.take_error() {
        eprintln!("telemetry error: {e}");
    }
    info!("simulated {:.0} s in {:.3} s wall time", report.seconds, elapsed.as_secs_f64());

    // 5. Summary.
    let state = mission.state();
    println!();
    println!("{report}");
    println!("  telemetry rows : {}", recorder.samples());
    println!("  final position : {}", state.position());
    println!(
        "  dead reckoned  : x {:.1} m, y {:.1} m (true x {:.1} m, y {:.1} m)",
        state.get(Field::LmcX),
        state.get(Field::LmcY),
        state.get(Field::XLmcX),
        state.get(Field::XLmcY),
    );
    println!("  output         : {}", args.out.display());
    Ok(())
}
