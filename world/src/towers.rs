//! Authoritative tower state, targeting and projectile ownership.

use std::collections::BTreeMap;

use glam::Vec2;
use stone_defence_core::{
    CellCoord, EnemyId, ProjectileId, TowerId, TowerKind, TowerSnapshot, TowerStats, HIT_RADIUS,
};

use crate::{
    enemy::Enemy,
    projectile::{Projectile, ProjectileIds},
};

/// Projectile launched by a tower during an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shot {
    pub(crate) projectile: ProjectileId,
    pub(crate) target: EnemyId,
}

/// A tower together with the projectiles it owns.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    kind: TowerKind,
    cell: CellCoord,
    position: Vec2,
    stats: TowerStats,
    cooldown: u32,
    projectiles: Vec<Projectile>,
}

impl Tower {
    /// Builds a ready-to-fire tower of the provided kind centred on `position`.
    pub(crate) fn new(id: TowerId, kind: TowerKind, cell: CellCoord, position: Vec2) -> Self {
        Self {
            id,
            kind,
            cell,
            position,
            stats: kind.stats(),
            cooldown: 0,
            projectiles: Vec::new(),
        }
    }

    pub(crate) const fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Fires at the first live enemy in range when the cooldown has elapsed.
    ///
    /// Candidates are considered in the order of `enemies`. An enemy sitting
    /// exactly on the tower offers no direction to aim along and is skipped.
    /// While cooling down the counter drops by one per call instead.
    pub(crate) fn attack(&mut self, enemies: &[Enemy], ids: &mut ProjectileIds) -> Option<Shot> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        for enemy in enemies.iter().filter(|enemy| enemy.is_alive()) {
            let aim_point = enemy.position();
            if self.position.distance(aim_point) > self.stats.range {
                continue;
            }
            let Some(velocity) =
                Projectile::launch_velocity(self.position, aim_point, self.stats.projectile_speed)
            else {
                continue;
            };

            let projectile = ids.allocate();
            self.projectiles.push(Projectile::new(
                projectile,
                self.position,
                aim_point,
                velocity,
                &self.stats,
            ));
            self.cooldown = self.stats.cooldown_ticks;
            return Some(Shot {
                projectile,
                target: enemy.id(),
            });
        }

        None
    }

    /// Advances every owned projectile and resolves contact with enemies.
    ///
    /// Projectiles that went inactive during the previous call are discarded
    /// first. A projectile damages the first live enemy within [`HIT_RADIUS`]
    /// and goes inactive; otherwise it goes inactive on reaching its aim point
    /// and its identifier is appended to `expired`. Returns the last enemy
    /// killed during this call.
    pub(crate) fn update_projectiles(
        &mut self,
        enemies: &mut [Enemy],
        expired: &mut Vec<ProjectileId>,
    ) -> Option<EnemyId> {
        self.projectiles.retain(Projectile::is_active);

        let mut killed = None;
        for projectile in &mut self.projectiles {
            projectile.advance();

            let hit = enemies.iter_mut().find(|enemy| {
                enemy.is_alive() && enemy.position().distance(projectile.position()) < HIT_RADIUS
            });

            if let Some(enemy) = hit {
                if let Some(enemy_id) = enemy.take_damage(projectile.damage()) {
                    killed = Some(enemy_id);
                }
                projectile.deactivate();
            } else if projectile.reached_aim_point() {
                projectile.deactivate();
                expired.push(projectile.id());
            }
        }

        killed
    }

    pub(crate) fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            stats: self.stats,
            cooldown: self.cooldown,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_stats(mut self, stats: TowerStats) -> Self {
        self.stats = stats;
        self
    }

    #[cfg(test)]
    pub(crate) const fn cooldown(&self) -> u32 {
        self.cooldown
    }
}

/// Registry that stores towers in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a tower and returns the identifier assigned to it.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, Tower::new(id, kind, cell, position));
        id
    }

    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell() == cell)
            .map(Tower::id)
    }

    /// Towers ordered by identifier, which matches placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stone_defence_core::{EnemyKind, Health};

    fn enemy_at(id: u32, position: Vec2, health: i32) -> Enemy {
        Enemy::placed(
            EnemyId::new(id),
            EnemyKind::Scout,
            position,
            1,
            Health::new(health),
        )
    }

    fn tower_at_origin(kind: TowerKind) -> Tower {
        Tower::new(TowerId::new(0), kind, CellCoord::new(0, 0), Vec2::ZERO)
    }

    #[test]
    fn fires_at_first_enemy_in_range_and_resets_cooldown() {
        let mut tower = tower_at_origin(TowerKind::Basic);
        let mut ids = ProjectileIds::default();
        let enemies = vec![
            enemy_at(0, Vec2::new(400.0, 0.0), 100),
            enemy_at(1, Vec2::new(100.0, 0.0), 100),
            enemy_at(2, Vec2::new(50.0, 0.0), 100),
        ];

        let shot = tower.attack(&enemies, &mut ids).expect("enemy in range");

        assert_eq!(shot.target, EnemyId::new(1));
        assert_eq!(tower.cooldown(), 30);
        assert_eq!(tower.projectiles().len(), 1);
    }

    #[test]
    fn cooldown_blocks_fire_for_exactly_its_length() {
        let mut tower = tower_at_origin(TowerKind::Archer);
        let mut ids = ProjectileIds::default();
        let enemies = vec![enemy_at(0, Vec2::new(60.0, 0.0), 1_000)];

        assert!(tower.attack(&enemies, &mut ids).is_some());
        for _ in 0..20 {
            assert!(tower.attack(&enemies, &mut ids).is_none());
        }
        assert_eq!(tower.cooldown(), 0);
        assert!(tower.attack(&enemies, &mut ids).is_some());
    }

    #[test]
    fn ignores_enemies_outside_range() {
        let mut tower = tower_at_origin(TowerKind::Basic);
        let mut ids = ProjectileIds::default();
        let enemies = vec![enemy_at(0, Vec2::new(150.5, 0.0), 100)];

        assert!(tower.attack(&enemies, &mut ids).is_none());
        assert_eq!(tower.cooldown(), 0);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut tower = tower_at_origin(TowerKind::Basic);
        let mut ids = ProjectileIds::default();
        let enemies = vec![enemy_at(0, Vec2::new(150.0, 0.0), 100)];

        assert!(tower.attack(&enemies, &mut ids).is_some());
    }

    #[test]
    fn skips_downed_and_coincident_enemies() {
        let mut tower = tower_at_origin(TowerKind::Basic);
        let mut ids = ProjectileIds::default();
        let enemies = vec![
            enemy_at(0, Vec2::new(30.0, 0.0), 0),
            enemy_at(1, Vec2::ZERO, 100),
            enemy_at(2, Vec2::new(90.0, 0.0), 100),
        ];

        let shot = tower.attack(&enemies, &mut ids).expect("live enemy in range");
        assert_eq!(shot.target, EnemyId::new(2));
    }

    #[test]
    fn contact_damages_first_enemy_and_reports_kill() {
        let mut stats = TowerKind::Archer.stats();
        stats.damage = 15;
        let mut tower = tower_at_origin(TowerKind::Archer).with_stats(stats);
        let mut ids = ProjectileIds::default();
        let mut enemies = vec![enemy_at(7, Vec2::new(20.0, 0.0), 10)];

        let _ = tower.attack(&enemies, &mut ids).expect("in range");
        let mut expired = Vec::new();
        let killed = tower.update_projectiles(&mut enemies, &mut expired);

        assert_eq!(killed, Some(EnemyId::new(7)));
        assert!(expired.is_empty());
        assert!(!tower.projectiles()[0].is_active());

        let _ = tower.update_projectiles(&mut enemies, &mut expired);
        assert!(tower.projectiles().is_empty(), "inactive projectiles are swept");
    }

    #[test]
    fn missed_projectile_expires_at_aim_point() {
        let mut tower = tower_at_origin(TowerKind::Basic);
        let mut ids = ProjectileIds::default();
        let enemies = vec![enemy_at(0, Vec2::new(100.0, 0.0), 100)];
        let shot = tower.attack(&enemies, &mut ids).expect("in range");

        // The enemy moved away before the projectile arrived.
        let mut enemies = vec![enemy_at(0, Vec2::new(100.0, 300.0), 100)];
        let mut expired = Vec::new();
        let mut calls = 0;
        while expired.is_empty() {
            assert_eq!(tower.update_projectiles(&mut enemies, &mut expired), None);
            calls += 1;
            assert!(calls < 40, "projectile never expired");
        }

        assert_eq!(expired, vec![shot.projectile]);
        assert_eq!(enemies[0].health(), Health::new(100));
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Basic, CellCoord::new(0, 0), Vec2::new(20.0, 20.0));
        let second = registry.insert(TowerKind::Cannon, CellCoord::new(3, 1), Vec2::new(140.0, 60.0));

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tower_at(CellCoord::new(3, 1)), Some(second));
        assert_eq!(registry.tower_at(CellCoord::new(4, 1)), None);
    }
}
