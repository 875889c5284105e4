use stone_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, EnemySpawn, Event, Gold, Lives, MatchConfig,
    PathConfig, PlacementError, PlayMode, ProjectileId, TowerId, TowerKind, WaveNumber,
};
use stone_defence_world::{self as world, query, World};

fn place(world: &mut World, kind: TowerKind, cell: CellCoord) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::PlaceTower { kind, cell }, &mut events);
    events
}

#[test]
fn placement_deducts_cost_and_occupies_cell() {
    let mut world = World::new();
    let cell = CellCoord::new(0, 0);

    let events = place(&mut world, TowerKind::Basic, cell);

    assert_eq!(
        events,
        vec![Event::TowerPlaced {
            tower: TowerId::new(0),
            kind: TowerKind::Basic,
            cell,
            cost: Gold::new(100),
        }]
    );
    assert_eq!(query::match_status(&world).money, Gold::new(900));
    assert_eq!(query::tower_at(&world, cell), Some(TowerId::new(0)));

    let tower = query::tower_view(&world).into_vec().remove(0);
    assert_eq!(tower.position, glam::Vec2::new(20.0, 20.0));
}

#[test]
fn placement_rejections_leave_world_untouched() {
    let mut world = World::new();
    let _ = place(&mut world, TowerKind::Cannon, CellCoord::new(0, 0));

    let cases = [
        (CellCoord::new(20, 0), PlacementError::OutOfBounds),
        (CellCoord::new(2, 7), PlacementError::NotBuildable),
        (CellCoord::new(0, 0), PlacementError::Occupied),
    ];

    for (cell, reason) in cases {
        let events = place(&mut world, TowerKind::Basic, cell);
        assert_eq!(
            events,
            vec![Event::TowerPlacementRejected {
                kind: TowerKind::Basic,
                cell,
                reason,
            }]
        );
    }

    assert_eq!(query::match_status(&world).money, Gold::new(800));
    assert_eq!(query::tower_view(&world).iter().count(), 1);
}

#[test]
fn cannot_build_without_funds() {
    let mut world = World::new();
    let cells = [
        CellCoord::new(0, 0),
        CellCoord::new(1, 0),
        CellCoord::new(2, 0),
        CellCoord::new(3, 0),
        CellCoord::new(0, 1),
    ];
    for cell in cells {
        let events = place(&mut world, TowerKind::Cannon, cell);
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
    }
    assert_eq!(query::match_status(&world).money, Gold::new(0));

    let cell = CellCoord::new(1, 1);
    assert_eq!(
        query::placement_check(&world, TowerKind::Basic, cell),
        Err(PlacementError::InsufficientFunds {
            cost: Gold::new(100),
            available: Gold::new(0),
        })
    );
    let events = place(&mut world, TowerKind::Basic, cell);
    assert!(matches!(
        events.as_slice(),
        [Event::TowerPlacementRejected {
            reason: PlacementError::InsufficientFunds { .. },
            ..
        }]
    ));
}

#[test]
fn waves_advance_the_counter() {
    let mut world = World::new();
    let mut events = Vec::new();
    let spawns = vec![EnemySpawn::new(EnemyKind::Scout, 1.5); 7];

    world::apply(&mut world, Command::SpawnWave { enemies: spawns }, &mut events);

    assert_eq!(events.len(), 8);
    assert_eq!(
        events.last(),
        Some(&Event::WaveSpawned {
            wave: WaveNumber::FIRST,
            enemy_count: 7,
        })
    );
    assert_eq!(query::enemy_count(&world), 7);
    assert_eq!(query::match_status(&world).wave, WaveNumber::new(2));

    let start = query::path(&world).start();
    assert!(query::enemy_view(&world)
        .iter()
        .all(|enemy| enemy.position == start && enemy.health.get() == 100));
}

#[test]
fn tower_near_spawn_fires_on_first_tick() {
    let mut world = World::new();
    let _ = place(&mut world, TowerKind::Basic, CellCoord::new(0, 6));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnWave {
            enemies: vec![EnemySpawn::new(EnemyKind::Brute, 2.0)],
        },
        &mut events,
    );

    events.clear();
    world::apply(&mut world, Command::Tick, &mut events);

    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced { tick: 1 },
            Event::ProjectileFired {
                tower: TowerId::new(0),
                projectile: ProjectileId::new(0),
                target: EnemyId::new(0),
            },
        ]
    );
    assert_eq!(query::projectile_view(&world).iter().count(), 1);
}

#[test]
fn paused_world_ignores_ticks() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Paused,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Paused,
        },
        &mut events,
    );
    world::apply(&mut world, Command::Tick, &mut events);

    assert_eq!(
        events,
        vec![Event::PlayModeChanged {
            mode: PlayMode::Paused
        }]
    );
    assert_eq!(query::match_status(&world).tick, 0);
}

#[test]
fn final_leak_loses_the_match() {
    let config = MatchConfig {
        starting_lives: Lives::new(1),
        path: PathConfig {
            waypoints: vec![[0.0, 100.0], [20.0, 100.0]],
            width: 40.0,
        },
        ..MatchConfig::default()
    };
    let mut world = World::from_config(config).expect("valid config");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnWave {
            enemies: vec![EnemySpawn::new(EnemyKind::Scout, 3.0)],
        },
        &mut events,
    );

    let mut ticks = 0;
    while !query::match_status(&world).is_over() {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        ticks += 1;
        assert!(ticks < 50, "enemy never leaked");
    }

    assert_eq!(
        &events[1..],
        &[
            Event::EnemyLeaked {
                enemy: EnemyId::new(0),
                lives: Lives::new(0),
            },
            Event::MatchLost {
                wave: WaveNumber::new(2),
            },
        ]
    );
    assert_eq!(query::enemy_count(&world), 0);
}
