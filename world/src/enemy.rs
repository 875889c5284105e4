//! Enemy movement along the path and damage bookkeeping.

use glam::Vec2;
use stone_defence_core::{
    EnemyId, EnemyKind, EnemySnapshot, Health, Lives, Path, WAYPOINT_ARRIVAL_RADIUS,
};

/// Outcome of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyStep {
    /// The enemy stays in the live set.
    Continuing,
    /// The enemy's health is depleted; no lives are deducted.
    Defeated,
    /// The enemy walked past the final waypoint and cost a life.
    Leaked,
}

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    waypoint: usize,
    speed: f32,
    health: Health,
    max_health: Health,
}

impl Enemy {
    /// Places a fresh enemy on the first waypoint of the path.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, path: &Path, speed: f32) -> Self {
        let max_health = kind.max_health();
        Self {
            id,
            kind,
            position: path.start(),
            waypoint: 0,
            speed,
            health: max_health,
            max_health,
        }
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    /// Enemies with depleted health are ignored by targeting and collision.
    pub(crate) const fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Moves the enemy one tick along the path and resolves death or escape.
    ///
    /// Depleted health is checked before the end of the path so an enemy that
    /// dies on its final step is never counted as a leak.
    pub(crate) fn update(&mut self, path: &Path, lives: &mut Lives) -> EnemyStep {
        if let Some(target) = path.waypoint(self.waypoint) {
            let offset = target - self.position;
            let distance = offset.length();
            if distance < WAYPOINT_ARRIVAL_RADIUS {
                self.waypoint += 1;
            } else {
                self.position += offset / distance * self.speed;
            }
        }

        if self.health.is_depleted() {
            return EnemyStep::Defeated;
        }

        if self.waypoint >= path.len() {
            lives.lose_one();
            return EnemyStep::Leaked;
        }

        EnemyStep::Continuing
    }

    /// Applies damage, returning the enemy's identifier when this hit killed it.
    ///
    /// Only the hit that crosses the zero boundary reports a kill.
    pub(crate) fn take_damage(&mut self, amount: u32) -> Option<EnemyId> {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        (was_alive && self.health.is_depleted()).then_some(self.id)
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            waypoint: self.waypoint,
        }
    }

    #[cfg(test)]
    pub(crate) fn placed(
        id: EnemyId,
        kind: EnemyKind,
        position: Vec2,
        waypoint: usize,
        health: Health,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            waypoint,
            speed: 0.0,
            health,
            max_health: kind.max_health(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn health(&self) -> Health {
        self.health
    }
}
