//! holding: CLI for holding-pattern detection over trajectory files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use holding_core::config::{self, Config};
use holding_core::geodesic::{vincenty_nm, DEFAULT_PRECISION};
use holding_core::{load_trajectory, DetectionEngine, HoldingResult, NavDb, Position};

#[derive(Parser)]
#[command(name = "holding", version, about = "Holding-pattern detection for aircraft trajectories")]
struct Cli {
    /// Log debug events to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze trajectory files and report holding patterns
    Analyze {
        /// JSON trajectory files (array of positions)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSON navigation catalog with airports and waypoints
        #[arg(long, env = "HOLDING_CATALOG")]
        catalog: Option<PathBuf>,

        /// Cleaning window around the last position, degrees
        #[arg(long)]
        check_distance: Option<f64>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the cleaned part of a trajectory as JSON
    Clean {
        /// JSON trajectory file
        file: PathBuf,

        /// JSON navigation catalog with airports and waypoints
        #[arg(long, env = "HOLDING_CATALOG")]
        catalog: Option<PathBuf>,

        /// Cleaning window around the last position, degrees
        #[arg(long)]
        check_distance: Option<f64>,
    },

    /// Geodesic distance between two points in nautical miles
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            files,
            catalog,
            check_distance,
            json,
        } => cmd_analyze(&files, catalog, check_distance, json),
        Commands::Clean {
            file,
            catalog,
            check_distance,
        } => cmd_clean(&file, catalog, check_distance),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let nm = vincenty_nm(lat1, lon1, lat2, lon2, DEFAULT_PRECISION);
            println!("{nm:.3} NM");
        }
        Commands::Config { init } => cmd_config(init),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Engine from the config file, with command-line overrides applied.
fn build_engine(catalog: Option<PathBuf>, check_distance: Option<f64>) -> DetectionEngine {
    let cfg = config::load_config();

    let mut engine_cfg = cfg.engine.clone();
    if let Some(d) = check_distance {
        engine_cfg.check_distance = d;
    }

    tracing::debug!(
        check_distance = engine_cfg.check_distance,
        filters = %engine_cfg.filters,
        "engine configuration"
    );

    let mut engine = DetectionEngine::from_config(&engine_cfg).unwrap_or_else(|e| {
        eprintln!("Error in configuration {}: {e}", config::config_file().display());
        std::process::exit(1);
    });

    let catalog_path = catalog.or_else(|| cfg.catalog.path.map(PathBuf::from));
    if let Some(path) = catalog_path {
        let db = NavDb::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error loading catalog {}: {e}", path.display());
            std::process::exit(1);
        });
        engine = engine.with_catalog(Arc::new(db));
    }

    engine
}

fn read_flight(file: &Path) -> Vec<Position> {
    load_trajectory(file).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", file.display());
        std::process::exit(1);
    })
}

/// One analyzed file, as printed by `analyze --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file: String,
    flight_id: Option<i64>,
    points: usize,
    cleaned: usize,
    result: HoldingResult,
}

fn cmd_analyze(files: &[PathBuf], catalog: Option<PathBuf>, check_distance: Option<f64>, json: bool) {
    let engine = build_engine(catalog, check_distance);

    let reports: Vec<FileReport> = files
        .iter()
        .map(|file| {
            let flight = read_flight(file);
            let analysis = engine.analyse(&flight);
            FileReport {
                file: file.display().to_string(),
                flight_id: flight.first().map(|p| p.flight_id),
                points: flight.len(),
                cleaned: analysis.cleaned_points,
                result: analysis.result,
            }
        })
        .collect();

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error encoding results: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&reports);
    }
}

fn cmd_clean(file: &Path, catalog: Option<PathBuf>, check_distance: Option<f64>) {
    let engine = build_engine(catalog, check_distance);
    let flight = read_flight(file);
    let cleaned = engine.remove_unnecessary_points(&flight);

    match serde_json::to_string_pretty(&cleaned) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error encoding positions: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config(init: bool) {
    let path = config::config_file();

    if init {
        let written = config::save_config(&Config::default()).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", path.display());
            std::process::exit(1);
        });
        println!("Wrote default configuration to {}", written.display());
        return;
    }

    let cfg = config::load_config();
    let source = if path.exists() { "" } else { " (not found, defaults)" };
    println!("# {}{source}", path.display());
    print!("{}", config::serialize_config(&cfg));
}

fn print_summary(reports: &[FileReport]) {
    let holdings = reports.iter().filter(|r| r.result.is_holding).count();
    println!();
    println!("Flights: {} analyzed, {holdings} holding", reports.len());
    println!();

    if reports.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "File", "Flight", "Points", "Cleaned", "Holding", "Direction", "Alt (ft)", "Laps", "Fix",
        "Time (ms)",
    ]);

    for r in reports {
        let res = &r.result;
        let dash = || Cell::new("-");
        table.add_row(vec![
            Cell::new(&r.file),
            Cell::new(
                r.flight_id
                    .map(|id| id.to_string())
                    .unwrap_or("-".into()),
            ),
            Cell::new(r.points),
            Cell::new(r.cleaned),
            Cell::new(if res.is_holding { "yes" } else { "no" }),
            if res.is_holding { Cell::new(res.direction) } else { dash() },
            if res.is_holding { Cell::new(res.altitude_ft) } else { dash() },
            if res.is_holding { Cell::new(res.laps) } else { dash() },
            Cell::new(
                res.fix_point
                    .as_ref()
                    .map(|f| f.identifier.clone())
                    .unwrap_or("-".into()),
            ),
            Cell::new(format!("{:.3}", res.detection_time.as_secs_f64() * 1000.0)),
        ]);
    }

    println!("{table}");
}
