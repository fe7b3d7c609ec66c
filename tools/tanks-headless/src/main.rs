//! tanks-headless: run tank battles without a window, and generate arenas.
//!
//! Usage:
//!   tanks-headless run --level demos/levels/duel.json --seed 7 --snapshot
//!   tanks-headless arena --output arena.json --width 20 --height 12 --turret 4,3 --turret 15,3

mod bot;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;

use clap::{Parser, Subcommand};
use tanks_core::events::GameEvent;
use tanks_core::types::UVec2;
use tanks_level::{decode_map, generate_arena, write_map, ArenaSpec};
use tanks_sim::{SimConfig, SimulationEngine};
use tracing::{error, info};

use crate::bot::Bot;

/// Headless driver for the tank battle simulation.
#[derive(Parser, Debug)]
#[command(name = "tanks-headless")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a level with a scripted player until the game ends
    Run {
        /// Level map (Tiled JSON). Defaults to a generated arena.
        #[arg(short, long)]
        level: Option<PathBuf>,

        /// Maximum ticks to simulate
        #[arg(short, long, default_value = "5000")]
        ticks: u64,

        /// Seed for the scripted player
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Simulation config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    },

    /// Write a generated arena level
    Arena {
        /// Output map path
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value = "16")]
        width: u32,

        #[arg(long, default_value = "10")]
        height: u32,

        /// Tile size in pixels
        #[arg(long, default_value = "64")]
        cell_size: u32,

        /// Player cell as x,y (default: bottom centre)
        #[arg(long, value_parser = parse_cell)]
        player: Option<UVec2>,

        /// Turret cell as x,y (repeatable; default: three along the top)
        #[arg(long = "turret", value_parser = parse_cell)]
        turrets: Vec<UVec2>,

        /// Leave out the border walls
        #[arg(long)]
        no_border: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            level,
            ticks,
            seed,
            config,
            snapshot,
        } => cmd_run(level.as_deref(), ticks, seed, config.as_deref(), snapshot),
        Commands::Arena {
            output,
            width,
            height,
            cell_size,
            player,
            turrets,
            no_border,
        } => {
            let default = ArenaSpec::default();
            let spec = ArenaSpec {
                width,
                height,
                cell_size,
                player: player.unwrap_or(UVec2::new(width / 2, height.saturating_sub(2))),
                towers: if turrets.is_empty() {
                    default.towers
                } else {
                    turrets
                },
                border: !no_border,
            };
            cmd_arena(&spec, &output)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "tanks-headless failed");
            ExitCode::FAILURE
        }
    }
}

fn parse_cell(s: &str) -> Result<UVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(UVec2::new(x, y))
}

fn load_config(path: Option<&Path>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))
}

fn cmd_run(
    level: Option<&Path>,
    max_ticks: u64,
    seed: u64,
    config: Option<&Path>,
    print_snapshot: bool,
) -> Result<(), String> {
    let mut engine = SimulationEngine::new(load_config(config)?);

    match level {
        Some(path) => engine.load_level(path).map_err(|e| e.to_string())?,
        None => {
            let map = generate_arena(&ArenaSpec::default());
            let level = decode_map(&map, Path::new("arena.json")).map_err(|e| e.to_string())?;
            engine.start_level(level);
        }
    }

    let (tx, rx) = mpsc::channel();
    engine.add_observer(Box::new(tx));
    let mut bot = Bot::new(seed);

    for _ in 0..max_ticks {
        let input = bot.next_input(engine.state(), engine.player(), engine.cell_size());
        let phase = engine.tick(&input).map_err(|e| e.to_string())?;

        for GameEvent::UnitDestroyed(event) in rx.try_iter() {
            info!(unit = %event.unit, x = event.position.x, y = event.position.y, epoch = event.epoch, "unit destroyed");
        }
        if phase.is_over() {
            break;
        }
    }

    let phase = engine.phase();
    info!(?phase, epoch = engine.state().epoch, seed, "run finished");

    if print_snapshot {
        let json = serde_json::to_string_pretty(&engine.snapshot())
            .map_err(|e| format!("cannot serialize snapshot: {e}"))?;
        println!("{json}");
    }
    Ok(())
}

fn cmd_arena(spec: &ArenaSpec, output: &Path) -> Result<(), String> {
    if spec.width == 0 || spec.height == 0 {
        return Err("arena must be at least 1×1".to_string());
    }
    if spec.player.x >= spec.width || spec.player.y >= spec.height {
        return Err(format!(
            "player cell {},{} is outside the {}×{} arena",
            spec.player.x, spec.player.y, spec.width, spec.height
        ));
    }

    let map = generate_arena(spec);
    // Refuse to write a map the loader would reject.
    decode_map(&map, output).map_err(|e| e.to_string())?;
    write_map(&map, output).map_err(|e| format!("cannot write {}: {e}", output.display()))?;

    info!(
        path = %output.display(),
        width = spec.width,
        height = spec.height,
        towers = spec.towers.len(),
        "arena written"
    );
    Ok(())
}
