#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Stone Defence.

mod buildable;
mod enemy;
mod projectile;
mod towers;

use stone_defence_core::{
    CellCoord, Command, ConfigError, EnemyId, EnemySpawn, Event, Gold, Lives, MatchConfig, Path,
    PlacementError, PlayMode, ProjectileId, TowerKind, WaveNumber,
};

use buildable::BuildableArea;
use enemy::{Enemy, EnemyStep};
use projectile::ProjectileIds;
use towers::TowerRegistry;

/// Represents the authoritative Stone Defence world state.
#[derive(Debug)]
pub struct World {
    config: MatchConfig,
    path: Path,
    buildable: BuildableArea,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectile_ids: ProjectileIds,
    next_enemy_id: EnemyId,
    wave: WaveNumber,
    money: Gold,
    lives: Lives,
    play_mode: PlayMode,
    tick_index: u64,
    match_lost: bool,
    step_outcomes: Vec<EnemyStep>,
    expired_projectiles: Vec<ProjectileId>,
}

impl World {
    /// Creates a world populated with the stock match parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(MatchConfig::default(), Path::serpentine())
    }

    /// Creates a world from a validated match configuration.
    pub fn from_config(config: MatchConfig) -> Result<Self, ConfigError> {
        let path = config.resolve_path()?;
        Ok(Self::with_path(config, path))
    }

    fn with_path(config: MatchConfig, path: Path) -> Self {
        let (columns, rows) = config.grid_dimensions();
        let buildable =
            BuildableArea::compute(&path, config.cell_size, columns, rows, config.path_margin);
        log::debug!(
            "world grid {columns}x{rows} with {} buildable cells",
            buildable.cells().count()
        );

        Self {
            money: config.starting_money,
            lives: config.starting_lives,
            config,
            path,
            buildable,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectile_ids: ProjectileIds::default(),
            next_enemy_id: EnemyId::new(0),
            wave: WaveNumber::FIRST,
            play_mode: PlayMode::Running,
            tick_index: 0,
            match_lost: false,
            step_outcomes: Vec::new(),
            expired_projectiles: Vec::new(),
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.play_mode == PlayMode::Paused {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.advance_enemies(out_events);
        self.resolve_towers(out_events);
        self.sweep_defeated(out_events);

        if self.lives.is_depleted() && !self.match_lost {
            self.match_lost = true;
            log::info!("match lost during wave {}", self.wave);
            out_events.push(Event::MatchLost { wave: self.wave });
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.step_outcomes.clear();
        for enemy in &mut self.enemies {
            let step = enemy.update(&self.path, &mut self.lives);
            match step {
                EnemyStep::Continuing => {}
                EnemyStep::Defeated => out_events.push(Event::EnemyDefeated { enemy: enemy.id() }),
                EnemyStep::Leaked => {
                    log::debug!("enemy {} leaked, {} lives left", enemy.id().get(), self.lives.get());
                    out_events.push(Event::EnemyLeaked {
                        enemy: enemy.id(),
                        lives: self.lives,
                    });
                }
            }
            self.step_outcomes.push(step);
        }

        // `retain` visits elements in order exactly once.
        let mut outcomes = self.step_outcomes.iter();
        self.enemies
            .retain(|_| matches!(outcomes.next(), Some(EnemyStep::Continuing)));
    }

    fn resolve_towers(&mut self, out_events: &mut Vec<Event>) {
        for tower in self.towers.iter_mut() {
            if let Some(shot) = tower.attack(&self.enemies, &mut self.projectile_ids) {
                out_events.push(Event::ProjectileFired {
                    tower: tower.id(),
                    projectile: shot.projectile,
                    target: shot.target,
                });
            }

            self.expired_projectiles.clear();
            let killed = tower.update_projectiles(&mut self.enemies, &mut self.expired_projectiles);
            for projectile in self.expired_projectiles.drain(..) {
                out_events.push(Event::ProjectileExpired {
                    tower: tower.id(),
                    projectile,
                });
            }

            if let Some(enemy) = killed {
                self.money = self.money.saturating_add(self.config.bounty);
                out_events.push(Event::BountyAwarded {
                    tower: tower.id(),
                    enemy,
                    amount: self.config.bounty,
                    balance: self.money,
                });
            }
        }
    }

    fn sweep_defeated(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            out_events.push(Event::EnemyDefeated { enemy: enemy.id() });
            false
        });
    }

    fn spawn_wave(&mut self, spawns: Vec<EnemySpawn>, out_events: &mut Vec<Event>) {
        if spawns.is_empty() {
            log::debug!("ignoring empty wave request");
            return;
        }

        let enemy_count = u32::try_from(spawns.len()).unwrap_or(u32::MAX);
        for spawn in spawns {
            let id = self.next_enemy_id;
            self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
            self.enemies
                .push(Enemy::spawn(id, spawn.kind, &self.path, spawn.speed));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind: spawn.kind,
            });
        }

        log::info!("wave {} spawned with {enemy_count} enemies", self.wave);
        out_events.push(Event::WaveSpawned {
            wave: self.wave,
            enemy_count,
        });
        self.wave = self.wave.next();
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.check_placement(kind, cell) {
            log::debug!(
                "rejected {} at ({}, {}): {reason}",
                kind.label(),
                cell.column(),
                cell.row()
            );
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        let cost = kind.cost();
        self.money = self.money.checked_sub(cost).unwrap_or_default();
        let position = cell.rect(self.config.cell_size).center();
        let tower = self.towers.insert(kind, cell, position);
        log::info!(
            "placed {} at ({}, {}), {} gold left",
            kind.label(),
            cell.column(),
            cell.row(),
            self.money
        );
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            cell,
            cost,
        });
    }

    fn check_placement(&self, kind: TowerKind, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.buildable.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if !self.buildable.contains(cell) {
            return Err(PlacementError::NotBuildable);
        }
        if self.towers.tower_at(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        let cost = kind.cost();
        if self.money < cost {
            return Err(PlacementError::InsufficientFunds {
                cost,
                available: self.money,
            });
        }
        Ok(())
    }

    fn set_play_mode(&mut self, mode: PlayMode, out_events: &mut Vec<Event>) {
        if self.play_mode == mode {
            return;
        }
        self.play_mode = mode;
        log::info!("play mode changed to {mode:?}");
        out_events.push(Event::PlayModeChanged { mode });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::SpawnWave { enemies } => world.spawn_wave(enemies, out_events),
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::SetPlayMode { mode } => world.set_play_mode(mode, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use stone_defence_core::{
        CellCoord, CellRect, EnemySnapshot, EnemyView, MatchConfig, MatchStatus, Path,
        PlacementError, PlayMode, ProjectileView, TowerId, TowerKind, TowerView,
    };

    use super::World;

    /// Reports the counters displayed in the heads-up display.
    #[must_use]
    pub fn match_status(world: &World) -> MatchStatus {
        MatchStatus {
            wave: world.wave,
            money: world.money,
            lives: world.lives,
            tick: world.tick_index,
            play_mode: world.play_mode,
        }
    }

    /// Reports whether the simulation is currently advancing.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Route walked by every enemy.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Number of enemies in the live set.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the live enemies ordered by identifier.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world.enemies.iter().map(|enemy| enemy.snapshot()).collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures every projectile still owned by a tower, grouped by tower.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .towers
            .iter()
            .flat_map(|tower| {
                tower
                    .projectiles()
                    .iter()
                    .map(move |projectile| projectile.snapshot(tower.id()))
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Cells that may host a tower, in row-major order.
    #[must_use]
    pub fn buildable_cells(world: &World) -> Vec<CellCoord> {
        world.buildable.cells().collect()
    }

    /// World-space rectangles of the buildable cells.
    #[must_use]
    pub fn buildable_rects(world: &World) -> Vec<CellRect> {
        let cell_size = world.config.cell_size;
        world
            .buildable
            .cells()
            .map(|cell| cell.rect(cell_size))
            .collect()
    }

    /// Reports whether the cell passed the path clearance test.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.buildable.contains(cell)
    }

    /// Identifier of the tower occupying the cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.tower_at(cell)
    }

    /// Evaluates a placement request without mutating the world.
    pub fn placement_check(
        world: &World,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Result<(), PlacementError> {
        world.check_placement(kind, cell)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use stone_defence_core::{EnemyKind, Health, TowerId, TowerStats};

    use super::*;

    fn line_world() -> World {
        let config = MatchConfig {
            field_width: 400.0,
            field_height: 200.0,
            path: stone_defence_core::PathConfig {
                waypoints: vec![[0.0, 100.0], [400.0, 100.0]],
                width: 40.0,
            },
            ..MatchConfig::default()
        };
        World::from_config(config).expect("valid config")
    }

    #[test]
    fn single_projectile_kill_credits_bounty_once() {
        let mut world = line_world();
        let mut stats = TowerKind::Basic.stats();
        stats.damage = 15;
        let tower = world.towers.insert(TowerKind::Basic, CellCoord::new(2, 0), Vec2::new(100.0, 20.0));
        for candidate in world.towers.iter_mut() {
            *candidate = candidate.clone().with_stats(stats);
        }
        world.enemies.push(Enemy::placed(
            EnemyId::new(0),
            EnemyKind::Scout,
            Vec2::new(100.0, 40.0),
            1,
            Health::new(10),
        ));

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        let bounties: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::BountyAwarded { .. }))
            .collect();
        assert_eq!(
            bounties,
            vec![&Event::BountyAwarded {
                tower,
                enemy: EnemyId::new(0),
                amount: Gold::new(20),
                balance: Gold::new(1_020),
            }]
        );
        assert!(events.contains(&Event::EnemyDefeated {
            enemy: EnemyId::new(0)
        }));
        assert!(world.enemies.is_empty());
        assert_eq!(query::match_status(&world).money, Gold::new(1_020));
    }

    #[test]
    fn simultaneous_kills_credit_only_the_last() {
        let mut world = line_world();
        let stats = TowerStats {
            cooldown_ticks: 0,
            damage: 50,
            ..TowerKind::Basic.stats()
        };
        let tower = world.towers.insert(TowerKind::Basic, CellCoord::new(2, 0), Vec2::new(100.0, 20.0));
        let above = Enemy::placed(EnemyId::new(0), EnemyKind::Scout, Vec2::new(100.0, 44.0), 1, Health::new(10));
        let below = Enemy::placed(EnemyId::new(1), EnemyKind::Scout, Vec2::new(100.0, -4.0), 1, Health::new(10));

        // Put one projectile in flight toward each enemy before the tick.
        for candidate in world.towers.iter_mut() {
            *candidate = candidate.clone().with_stats(stats);
            let _ = candidate.attack(&[above.clone()], &mut world.projectile_ids);
            let _ = candidate.attack(&[below.clone()], &mut world.projectile_ids);
        }
        world.enemies = vec![above, below];

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        let bounties: Vec<&Event> = events
            .iter()
            .filter(|event| matches!(event, Event::BountyAwarded { .. }))
            .collect();
        assert_eq!(
            bounties,
            vec![&Event::BountyAwarded {
                tower,
                enemy: EnemyId::new(1),
                amount: Gold::new(20),
                balance: Gold::new(1_020),
            }]
        );
        assert!(events.contains(&Event::EnemyDefeated { enemy: EnemyId::new(0) }));
        assert!(events.contains(&Event::EnemyDefeated { enemy: EnemyId::new(1) }));
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn enemy_on_last_waypoint_leaks_during_tick() {
        let mut world = line_world();
        world.enemies.push(Enemy::placed(
            EnemyId::new(3),
            EnemyKind::Brute,
            Vec2::new(398.0, 100.0),
            1,
            Health::new(100),
        ));

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { tick: 1 },
                Event::EnemyLeaked {
                    enemy: EnemyId::new(3),
                    lives: Lives::new(9),
                },
            ]
        );
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn tower_ids_follow_placement_order() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Archer,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: CellCoord::new(1, 0),
            },
            &mut events,
        );

        let ids: Vec<TowerId> = query::tower_view(&world).iter().map(|tower| tower.id).collect();
        assert_eq!(ids, vec![TowerId::new(0), TowerId::new(1)]);
    }
}
