//! Per-tick driver composing the world with the spawning and builder systems.

use std::time::Duration;

use anyhow::Result;
use stone_defence_core::{
    CellCoord, Command, Event, MatchStatus, PlacementError, PlayMode, TowerId, TowerKind,
    TICKS_PER_SECOND,
};
use stone_defence_rendering::{
    Color, EnemyPresentation, FieldPresentation, PathPresentation, ProjectilePresentation, Scene,
    SoundCue, TowerPresentation, TowerPreview,
};
use stone_defence_system_builder::{Builder, BuilderInput, PlacementPreview};
use stone_defence_system_spawning::{Config as SpawningConfig, Spawning};
use stone_defence_world::{self as world, query, World};

/// Upper bound on ticks simulated for a single rendered frame.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Player input distilled for one simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StepInput {
    /// Cell under the cursor, if the cursor hovers the field.
    pub(crate) cursor_cell: Option<CellCoord>,
    /// Whether the player clicked to build on this step.
    pub(crate) confirm_action: bool,
    /// Tower kind picked through a hotkey or panel button.
    pub(crate) select_tower: Option<TowerKind>,
    /// Whether the player pressed the pause toggle.
    pub(crate) pause_toggle: bool,
}

/// Owns the world and the systems observing it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    builder: Builder,
    commands: Vec<Command>,
    events: Vec<Event>,
    pending_cues: Vec<SoundCue>,
}

impl Simulation {
    /// Creates a driver over `world`, rolling waves from the configured seed.
    pub(crate) fn new(world: World, spawning: SpawningConfig) -> Self {
        Self {
            world,
            spawning: Spawning::new(spawning),
            builder: Builder::new(),
            commands: Vec::new(),
            events: Vec::new(),
            pending_cues: Vec::new(),
        }
    }

    /// Applies input and advances the simulation by exactly one tick.
    pub(crate) fn step(&mut self, input: StepInput) {
        self.frame(input, 1);
    }

    /// Applies input once, then advances the simulation by `ticks` ticks.
    ///
    /// Placement commands are applied before pause toggles, which are applied
    /// before any spawning or tick.
    pub(crate) fn frame(&mut self, input: StepInput, ticks: u32) {
        self.events.clear();
        self.handle_builder(input);

        if input.pause_toggle {
            let mode = query::play_mode(&self.world).toggled();
            self.commands.push(Command::SetPlayMode { mode });
            self.apply_commands();
        }

        for _ in 0..ticks {
            let status = self.status();
            if status.play_mode != PlayMode::Running || status.is_over() {
                break;
            }

            self.spawning.handle(
                status.play_mode,
                query::enemy_count(&self.world),
                status.wave,
                &mut self.commands,
            );
            self.commands.push(Command::Tick);
            self.apply_commands();
        }

        self.collect_sound_cues();
    }

    /// Places a tower directly, bypassing the selection state.
    pub(crate) fn place(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<TowerId, PlacementError> {
        self.events.clear();
        self.commands.push(Command::PlaceTower { kind, cell });
        self.apply_commands();
        self.collect_sound_cues();

        self.events
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::NotBuildable))
    }

    /// Current wave, money, lives, tick and play mode.
    pub(crate) fn status(&self) -> MatchStatus {
        query::match_status(&self.world)
    }

    /// Read access to the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Builds the static part of the scene: field, path and buildable cells.
    pub(crate) fn initial_scene(&mut self) -> Result<Scene> {
        let config = query::config(&self.world);
        let field = FieldPresentation::new(
            config.field_width,
            config.field_height,
            config.cell_size,
            Color::from_rgb_u8(100, 200, 100),
        )?;
        let path = query::path(&self.world);
        let path = PathPresentation::new(
            path.points().to_vec(),
            path.width(),
            Color::from_rgb_u8(150, 150, 150),
        );

        let mut scene = Scene::new(field, path, query::buildable_rects(&self.world));
        self.populate_scene(&mut scene, None);
        Ok(scene)
    }

    /// Refreshes the dynamic part of the scene and hands over pending sound cues.
    pub(crate) fn populate_scene(&mut self, scene: &mut Scene, cursor_cell: Option<CellCoord>) {
        let cell_size = query::config(&self.world).cell_size;

        scene.towers.clear();
        scene.towers.extend(
            query::tower_view(&self.world)
                .iter()
                .map(|tower| TowerPresentation::from_snapshot(tower, cell_size)),
        );
        scene.enemies.clear();
        scene.enemies.extend(
            query::enemy_view(&self.world)
                .iter()
                .map(EnemyPresentation::from_snapshot),
        );
        scene.projectiles.clear();
        scene.projectiles.extend(
            query::projectile_view(&self.world)
                .iter()
                .filter(|projectile| projectile.active)
                .map(ProjectilePresentation::from_snapshot),
        );

        let status = self.status();
        scene.hud = status.into();
        scene.play_mode = status.play_mode;
        scene.match_over = status.is_over();
        scene.selected_tower = self.builder.selected();
        scene.tower_preview = self
            .preview(cursor_cell)
            .map(|preview| TowerPreview::new(preview.kind, preview.rect, preview.rejection));
        scene.sound_cues.append(&mut self.pending_cues);
    }

    fn preview(&self, cursor_cell: Option<CellCoord>) -> Option<PlacementPreview> {
        let cell_size = query::config(&self.world).cell_size;
        self.builder.preview(cursor_cell, cell_size, |kind, cell| {
            query::placement_check(&self.world, kind, cell)
        })
    }

    fn handle_builder(&mut self, input: StepInput) {
        let preview = self.preview(input.cursor_cell);
        self.builder.handle(
            &[],
            preview,
            BuilderInput {
                confirm_action: input.confirm_action,
                select_tower: input.select_tower,
                cursor_cell: input.cursor_cell,
            },
            &mut self.commands,
        );
        if self.commands.is_empty() {
            return;
        }

        let placed_from = self.events.len();
        self.apply_commands();
        self.builder.handle(
            &self.events[placed_from..],
            None,
            BuilderInput::default(),
            &mut self.commands,
        );
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn collect_sound_cues(&mut self) {
        for event in &self.events {
            match event {
                Event::TowerPlaced { .. } => self.pending_cues.push(SoundCue::Build),
                Event::ProjectileFired { .. } => self.pending_cues.push(SoundCue::Explosion),
                _ => {}
            }
        }
    }
}

/// Converts wall-clock frame time into a whole number of 60 Hz ticks.
#[derive(Debug, Default)]
pub(crate) struct FixedStep {
    accumulator: Duration,
}

impl FixedStep {
    /// Duration of one simulation tick.
    pub(crate) const TICK: Duration =
        Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64);

    /// Adds `frame` to the accumulator and returns the ticks that became due.
    ///
    /// Backlog beyond a few ticks is dropped so a stalled window does not
    /// fast-forward the match.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;
        let mut ticks = 0;
        while self.accumulator >= Self::TICK {
            self.accumulator -= Self::TICK;
            ticks += 1;
        }
        if ticks > MAX_TICKS_PER_FRAME {
            log::debug!("dropping {} late ticks", ticks - MAX_TICKS_PER_FRAME);
            ticks = MAX_TICKS_PER_FRAME;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };
    use stone_defence_core::{Gold, Lives, MatchConfig, WaveNumber};

    fn simulation(seed: u64) -> Simulation {
        Simulation::new(World::new(), SpawningConfig::new(seed))
    }

    fn fingerprint(simulation: &Simulation) -> u64 {
        let mut hasher = DefaultHasher::new();
        simulation.status().hash(&mut hasher);
        for enemy in query::enemy_view(simulation.world()).iter() {
            enemy.id.hash(&mut hasher);
            enemy.position.x.to_bits().hash(&mut hasher);
            enemy.position.y.to_bits().hash(&mut hasher);
            enemy.health.hash(&mut hasher);
        }
        for projectile in query::projectile_view(simulation.world()).iter() {
            projectile.id.hash(&mut hasher);
            projectile.position.x.to_bits().hash(&mut hasher);
            projectile.position.y.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    fn replay(seed: u64, ticks: usize) -> Vec<u64> {
        let mut simulation = simulation(seed);
        for (kind, cell) in [
            (TowerKind::Cannon, CellCoord::new(3, 6)),
            (TowerKind::Archer, CellCoord::new(7, 2)),
            (TowerKind::Basic, CellCoord::new(12, 9)),
        ] {
            let _ = simulation.place(kind, cell);
        }

        (0..ticks)
            .map(|_| {
                simulation.step(StepInput::default());
                fingerprint(&simulation)
            })
            .collect()
    }

    #[test]
    fn first_step_spawns_and_advances_the_first_wave() {
        let mut simulation = simulation(11);

        simulation.step(StepInput::default());

        let status = simulation.status();
        assert_eq!(status.tick, 1);
        assert_eq!(status.wave, WaveNumber::new(2));
        assert_eq!(query::enemy_count(simulation.world()), 7);
    }

    #[test]
    fn selecting_then_clicking_builds_and_requests_build_sound() {
        let mut simulation = simulation(3);
        let cell = CellCoord::new(1, 1);

        simulation.step(StepInput {
            select_tower: Some(TowerKind::Archer),
            cursor_cell: Some(cell),
            ..StepInput::default()
        });
        simulation.step(StepInput {
            confirm_action: true,
            cursor_cell: Some(cell),
            ..StepInput::default()
        });

        assert_eq!(query::tower_at(simulation.world(), cell), Some(TowerId::new(0)));
        assert_eq!(simulation.status().money, Gold::new(850));

        let mut scene = simulation.initial_scene().expect("stock field is valid");
        assert_eq!(scene.selected_tower, None, "selection clears after building");
        assert_eq!(scene.towers.len(), 1);
        assert!(scene.sound_cues.contains(&SoundCue::Build));

        simulation.populate_scene(&mut scene, Some(cell));
        assert!(
            scene.sound_cues.iter().filter(|cue| **cue == SoundCue::Build).count() == 1,
            "cues are handed over once",
        );
    }

    #[test]
    fn clicks_on_blocked_cells_do_not_build() {
        let mut simulation = simulation(3);
        let path_cell = CellCoord::new(2, 7);

        simulation.step(StepInput {
            select_tower: Some(TowerKind::Basic),
            ..StepInput::default()
        });
        simulation.step(StepInput {
            confirm_action: true,
            cursor_cell: Some(path_cell),
            ..StepInput::default()
        });

        assert_eq!(query::tower_at(simulation.world(), path_cell), None);
        assert_eq!(simulation.status().money, Gold::new(1_000));

        let mut scene = simulation.initial_scene().expect("stock field is valid");
        simulation.populate_scene(&mut scene, Some(path_cell));
        let preview = scene.tower_preview.expect("selection and cursor present");
        assert_eq!(preview.rejection, Some(PlacementError::NotBuildable));
        assert_eq!(scene.selected_tower, Some(TowerKind::Basic));
    }

    #[test]
    fn pause_toggle_freezes_and_resumes_ticks() {
        let mut simulation = simulation(5);
        simulation.step(StepInput::default());

        simulation.step(StepInput {
            pause_toggle: true,
            ..StepInput::default()
        });
        let paused = simulation.status();
        assert_eq!(paused.play_mode, PlayMode::Paused);
        assert_eq!(paused.tick, 1);

        simulation.frame(StepInput::default(), 3);
        assert_eq!(simulation.status().tick, 1);

        simulation.step(StepInput {
            pause_toggle: true,
            ..StepInput::default()
        });
        assert_eq!(simulation.status().play_mode, PlayMode::Running);
        assert_eq!(simulation.status().tick, 2);
    }

    #[test]
    fn placement_is_allowed_while_paused() {
        let mut simulation = simulation(5);
        simulation.step(StepInput {
            pause_toggle: true,
            ..StepInput::default()
        });

        assert_eq!(
            simulation.place(TowerKind::Basic, CellCoord::new(0, 0)),
            Ok(TowerId::new(0))
        );
        assert_eq!(
            simulation.place(TowerKind::Basic, CellCoord::new(0, 0)),
            Err(PlacementError::Occupied)
        );
    }

    #[test]
    fn towers_request_explosion_sounds_when_firing() {
        let mut simulation = simulation(9);
        let _ = simulation.place(TowerKind::Basic, CellCoord::new(0, 6));
        let mut scene = simulation.initial_scene().expect("stock field is valid");
        scene.sound_cues.clear();

        for _ in 0..5 {
            simulation.step(StepInput::default());
        }
        simulation.populate_scene(&mut scene, None);

        assert!(scene.sound_cues.contains(&SoundCue::Explosion));
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let first = replay(0x5eed, 900);
        let second = replay(0x5eed, 900);
        assert_eq!(first, second);

        let other = replay(0x5eee, 900);
        assert_ne!(first, other, "a different seed should roll different waves");
    }

    #[test]
    fn undefended_match_ends_and_stops_ticking() {
        let world = World::from_config(MatchConfig {
            starting_lives: Lives::new(1),
            ..MatchConfig::default()
        })
        .expect("valid config");
        let mut simulation = Simulation::new(world, SpawningConfig::new(1));

        let mut ticks = 0;
        while !simulation.status().is_over() && ticks < 2_000 {
            simulation.step(StepInput::default());
            ticks += 1;
        }

        let status = simulation.status();
        assert!(status.is_over(), "an enemy should leak within {ticks} ticks");
        simulation.step(StepInput::default());
        assert_eq!(simulation.status().tick, status.tick, "finished matches stay frozen");

        let scene = simulation.initial_scene().expect("stock field is valid");
        assert!(scene.match_over);
    }

    #[test]
    fn fixed_step_converts_frame_time_into_ticks() {
        let mut clock = FixedStep::default();

        assert_eq!(clock.advance(Duration::from_millis(8)), 0);
        assert_eq!(clock.advance(Duration::from_millis(9)), 1);
        assert_eq!(clock.advance(FixedStep::TICK * 2), 2);
        assert_eq!(clock.advance(Duration::from_secs(2)), MAX_TICKS_PER_FRAME);
    }
}
