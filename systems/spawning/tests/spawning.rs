use stone_defence_core::{Command, EnemyKind, EnemySpawn, Event, PlayMode, WaveNumber};
use stone_defence_system_spawning::{Config, Spawning};
use stone_defence_world::{self as world, query, World};

fn spawns(command: &Command) -> &[EnemySpawn] {
    match command {
        Command::SpawnWave { enemies } => enemies,
        other => panic!("unexpected command emitted: {other:?}"),
    }
}

#[test]
fn empty_field_requests_next_wave() {
    let mut spawning = Spawning::new(Config::new(0x1234_5678));
    let mut commands = Vec::new();

    spawning.handle(PlayMode::Running, 0, WaveNumber::new(3), &mut commands);

    assert_eq!(commands.len(), 1);
    let enemies = spawns(&commands[0]);
    assert_eq!(enemies.len(), 11);
    assert!(enemies
        .iter()
        .all(|enemy| (1.0..3.0).contains(&enemy.speed)));
}

#[test]
fn live_enemies_or_pause_suppress_spawning() {
    let mut spawning = Spawning::new(Config::new(0x4d59_5df4_d0f3_3173));
    let mut commands = Vec::new();

    spawning.handle(PlayMode::Running, 3, WaveNumber::FIRST, &mut commands);
    assert!(commands.is_empty(), "wave in progress should not spawn");

    spawning.handle(PlayMode::Paused, 0, WaveNumber::FIRST, &mut commands);
    assert!(commands.is_empty(), "paused simulation should not spawn");
}

#[test]
fn identical_seeds_roll_identical_waves() {
    let mut first = Spawning::new(Config::new(42));
    let mut second = Spawning::new(Config::new(42));

    for wave in 1..6 {
        let mut left = Vec::new();
        let mut right = Vec::new();
        first.handle(PlayMode::Running, 0, WaveNumber::new(wave), &mut left);
        second.handle(PlayMode::Running, 0, WaveNumber::new(wave), &mut right);
        assert_eq!(left, right, "wave {wave} diverged");
    }
}

#[test]
fn scouts_make_up_most_of_the_field() {
    let mut spawning = Spawning::new(Config::new(0xdead_beef));
    let mut scouts = 0usize;
    let mut total = 0usize;

    for _ in 0..200 {
        let mut commands = Vec::new();
        spawning.handle(PlayMode::Running, 0, WaveNumber::new(10), &mut commands);
        for enemy in spawns(&commands[0]) {
            total += 1;
            if enemy.kind == EnemyKind::Scout {
                scouts += 1;
            }
        }
    }

    let share = scouts as f64 / total as f64;
    assert!((0.65..0.75).contains(&share), "scout share was {share}");
}

#[test]
fn first_tick_populates_the_first_wave() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(1));
    let mut commands = Vec::new();
    let status = query::match_status(&world);

    spawning.handle(
        status.play_mode,
        query::enemy_count(&world),
        status.wave,
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    world::apply(&mut world, Command::Tick, &mut events);

    assert_eq!(query::enemy_count(&world), 7);
    assert_eq!(query::match_status(&world).wave, WaveNumber::new(2));
    assert!(events.contains(&Event::WaveSpawned {
        wave: WaveNumber::FIRST,
        enemy_count: 7,
    }));
}
