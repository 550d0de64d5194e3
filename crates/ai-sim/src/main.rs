//! Headless enemy AI simulation.
//!
//! Runs one stalker against a scripted player in a walled arena and reports
//! what it did:
//! - `ai-sim --scenario hunt` - player walks into view, gets chased and attacked
//! - `ai-sim --scenario noise` - player sneaks, then fires behind a wall
//! - `ai-sim --scenario patrol` - player hides, enemy patrols

mod arena;
mod scenario;

use std::path::PathBuf;

use ai_core::Vec3;
use ai_enemy::{stalker_tree, AiDispatcher, EnemyTuning};
use ai_perception::NoiseManager;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::arena::Arena;
use crate::scenario::Scenario;

const ENEMY: u64 = 1;

#[derive(Parser)]
#[command(name = "ai-sim")]
#[command(about = "Run enemy AI against a scripted arena", version)]
struct Cli {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Seed for randomized decisions
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Enemy tuning YAML
    #[arg(long)]
    tuning: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Scenario::Hunt)]
    scenario: Scenario,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Outcome {
    scenario: String,
    ticks: u64,
    seconds: f32,
    player_health: f32,
    player_killed: bool,
    enemy_position: Option<Vec3>,
    enemy_attacks: u32,
    scans: u64,
    last_status: Option<ai_core::NodeState>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let tuning = match &cli.tuning {
        Some(path) => EnemyTuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => EnemyTuning::default(),
    };

    let outcome = run(&cli, &tuning)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        tracing::info!(
            ticks = outcome.ticks,
            seconds = outcome.seconds,
            health = outcome.player_health,
            killed = outcome.player_killed,
            attacks = outcome.enemy_attacks,
            scans = outcome.scans,
            "simulation finished"
        );
    }
    Ok(())
}

fn run(cli: &Cli, tuning: &EnemyTuning) -> Result<Outcome> {
    anyhow::ensure!(cli.dt > 0.0, "--dt must be positive, got {}", cli.dt);

    let mut arena = Arena::walled(cli.scenario.player_start());
    arena.spawn(ENEMY, Vec3::ZERO, Vec3::Z);

    let noise = NoiseManager::default();
    let mut ai = AiDispatcher::new(arena, noise, cli.seed);
    ai.register_root(
        ENEMY,
        tuning.sensor,
        stalker_tree(tuning, cli.scenario.waypoints()),
    )
    .context("registering enemy")?;
    tracing::info!(scenario = ?cli.scenario, ticks = cli.ticks, dt = cli.dt, "simulation started");

    let per_second = (1.0 / cli.dt).round().max(1.0) as u64;
    let mut ran = 0;
    for frame in 0..cli.ticks {
        let time = frame as f32 * cli.dt;
        cli.scenario.drive(time, cli.dt, &mut ai);
        ai.tick(cli.dt);
        ai.game_mut().step(cli.dt);
        ran = frame + 1;

        if ran % per_second == 0 {
            let body = ai.game().body(ENEMY);
            tracing::info!(
                time = ran as f32 * cli.dt,
                status = ai.status(ENEMY).map(|s| s.as_str()).unwrap_or("-"),
                enemy = ?body.map(|b| b.position),
                player = ?ai.game().player.position,
                health = ai.game().player.health,
                "tick"
            );
        }
        if ai.game().player_dead() {
            tracing::info!(time, "player killed");
            break;
        }
    }

    let game = ai.game();
    Ok(Outcome {
        scenario: format!("{:?}", cli.scenario).to_lowercase(),
        ticks: ran,
        seconds: ran as f32 * cli.dt,
        player_health: game.player.health,
        player_killed: game.player_dead(),
        enemy_position: game.body(ENEMY).map(|b| b.position),
        enemy_attacks: game.body(ENEMY).map_or(0, |b| b.attacks),
        scans: ai.world().sensor(ENEMY).map_or(0, |s| s.scans()),
        last_status: ai.status(ENEMY),
    })
}
