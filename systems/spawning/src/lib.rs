#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting wave commands.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stone_defence_core::{Command, EnemyKind, EnemySpawn, PlayMode, WaveNumber};

const SCOUT_PROBABILITY: f64 = 0.7;
const SPEED_RANGE: Range<f32> = 1.0..3.0;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits a new wave whenever the field is clear.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits a spawn command for `wave` when no enemies remain alive.
    ///
    /// Nothing is emitted while the simulation is paused, so the random
    /// stream only advances for waves that actually enter the field.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        live_enemies: usize,
        wave: WaveNumber,
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Running || live_enemies > 0 {
            return;
        }

        let enemies = self.roll_wave(wave);
        log::debug!("rolled {} enemies for wave {wave}", enemies.len());
        out.push(Command::SpawnWave { enemies });
    }

    fn roll_wave(&mut self, wave: WaveNumber) -> Vec<EnemySpawn> {
        (0..wave.enemy_count())
            .map(|_| {
                let kind = if self.rng.gen_bool(SCOUT_PROBABILITY) {
                    EnemyKind::Scout
                } else {
                    EnemyKind::Brute
                };
                let speed = self.rng.gen_range(SPEED_RANGE);
                EnemySpawn::new(kind, speed)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolled_waves_match_wave_size() {
        let mut spawning = Spawning::new(Config::new(7));
        assert_eq!(spawning.roll_wave(WaveNumber::FIRST).len(), 7);
        assert_eq!(spawning.roll_wave(WaveNumber::new(7)).len(), 19);
        assert_eq!(spawning.roll_wave(WaveNumber::new(8)).len(), 20);
        assert_eq!(spawning.roll_wave(WaveNumber::new(40)).len(), 20);
    }
}
