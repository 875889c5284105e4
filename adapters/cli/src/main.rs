#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Stone Defence experience.

mod settings;
mod simulation;

use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use stone_defence_rendering::{Color, Presentation, RenderingBackend};
use stone_defence_rendering_macroquad::MacroquadBackend;
use stone_defence_system_spawning::Config as SpawningConfig;
use stone_defence_world::{query, World};

use self::{
    settings::{PlacementOrder, SettingsFile},
    simulation::{FixedStep, Simulation, StepInput},
};

/// Tower defence on a winding stone path.
#[derive(Debug, Parser)]
#[command(name = "stone-defence", version)]
struct Cli {
    /// TOML settings file overriding the stock match parameters.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for wave generation; drawn from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window for `--ticks` ticks and print a summary.
    #[arg(long)]
    headless: bool,

    /// Number of ticks simulated by a headless run.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,

    /// Tower to build before the first tick, e.g. `basic@3,2`. Repeatable.
    #[arg(long = "place", value_name = "KIND@COL,ROW")]
    placements: Vec<PlacementOrder>,

    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,

    /// Draw primitive shapes even when sprites are available.
    #[arg(long)]
    no_sprites: bool,

    /// Sprite manifest consulted by the windowed renderer.
    #[arg(long, value_name = "PATH", default_value = "assets/manifest.toml")]
    manifest: PathBuf,
}

/// Entry point for the Stone Defence command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };

    let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::info!("rolling waves from seed {seed}");

    let world =
        World::from_config(settings.match_config).context("invalid match configuration")?;
    let mut simulation = Simulation::new(world, SpawningConfig::new(seed));

    for order in &cli.placements {
        let (column, row) = (order.cell.column(), order.cell.row());
        match simulation.place(order.kind, order.cell) {
            Ok(tower) => log::info!(
                "placed {} tower {} at ({column}, {row})",
                order.kind.label(),
                tower.get()
            ),
            Err(reason) => log::warn!(
                "could not place {} tower at ({column}, {row}): {reason}",
                order.kind.label()
            ),
        }
    }

    if cli.headless {
        run_headless(&mut simulation, cli.ticks);
        Ok(())
    } else {
        run_windowed(simulation, &cli)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn run_headless(simulation: &mut Simulation, ticks: u64) {
    let mut simulated = 0;
    while simulated < ticks && !simulation.status().is_over() {
        simulation.step(StepInput::default());
        simulated += 1;
    }

    let status = simulation.status();
    let towers = query::tower_view(simulation.world()).iter().count();
    let enemies = query::enemy_count(simulation.world());
    log::info!(
        "simulated {simulated} ticks: wave {}, money {}, lives {}, {towers} towers, {enemies} enemies alive",
        status.wave,
        status.money,
        status.lives.get(),
    );
    if status.is_over() {
        println!("Game over on wave {} after {} ticks", status.wave, status.tick);
    } else {
        println!(
            "Holding at wave {} after {} ticks with {} lives and {} gold",
            status.wave, status.tick, status.lives.get(), status.money
        );
    }
}

fn run_windowed(mut simulation: Simulation, cli: &Cli) -> Result<()> {
    let scene = simulation.initial_scene()?;
    let presentation = Presentation::new("Stone Defence", Color::from_rgb_u8(0, 0, 0), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(!cli.no_vsync)
        .with_show_fps(cli.show_fps)
        .with_sprite_loading(!cli.no_sprites)
        .with_manifest_path(cli.manifest.clone());

    let mut clock = FixedStep::default();
    backend.run(presentation, move |frame_dt, input, scene| {
        let cursor_cell = input
            .cursor_world_space
            .and_then(|position| scene.field.cell_at(position));
        let ticks = clock.advance(frame_dt);
        simulation.frame(
            StepInput {
                cursor_cell,
                confirm_action: input.confirm_action,
                select_tower: input.select_tower,
                pause_toggle: input.pause_toggle,
            },
            ticks,
        );
        simulation.populate_scene(scene, cursor_cell);
    })
}
