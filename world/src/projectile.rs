//! Projectiles fired by towers.

use glam::Vec2;
use stone_defence_core::{
    ProjectileId, ProjectileSnapshot, RgbColor, TowerId, TowerStats, PROJECTILE_ARRIVAL_RADIUS,
};

/// Allocates monotonically increasing projectile identifiers.
#[derive(Debug, Default)]
pub(crate) struct ProjectileIds {
    next: u32,
}

impl ProjectileIds {
    pub(crate) fn allocate(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// A point moving with constant velocity toward the aim point captured at launch.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: Vec2,
    target: Vec2,
    velocity: Vec2,
    damage: u32,
    radius: f32,
    color: RgbColor,
    active: bool,
}

impl Projectile {
    /// Velocity of a projectile launched from `origin` toward `target`.
    ///
    /// Returns `None` when the two points coincide or the speed is not positive,
    /// since no direction can be derived.
    pub(crate) fn launch_velocity(origin: Vec2, target: Vec2, speed: f32) -> Option<Vec2> {
        if !(speed > 0.0) {
            return None;
        }
        let offset = target - origin;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return None;
        }
        Some(offset / distance * speed)
    }

    pub(crate) fn new(
        id: ProjectileId,
        origin: Vec2,
        target: Vec2,
        velocity: Vec2,
        stats: &TowerStats,
    ) -> Self {
        Self {
            id,
            position: origin,
            target,
            velocity,
            damage: stats.damage,
            radius: stats.projectile_radius,
            color: stats.projectile_color,
            active: true,
        }
    }

    pub(crate) const fn id(&self) -> ProjectileId {
        self.id
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn damage(&self) -> u32 {
        self.damage
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn advance(&mut self) {
        self.position += self.velocity;
    }

    /// Reports whether the projectile arrived at, or flew past, its aim point.
    pub(crate) fn reached_aim_point(&self) -> bool {
        let remaining = self.target - self.position;
        remaining.length() < PROJECTILE_ARRIVAL_RADIUS || remaining.dot(self.velocity) < 0.0
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn snapshot(&self, tower: TowerId) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower,
            position: self.position,
            target: self.target,
            velocity: self.velocity,
            radius: self.radius,
            color: self.color,
            active: self.active,
        }
    }
}
