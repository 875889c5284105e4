#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Stone Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Read-only views expose entity state without
//! granting mutable access.

mod config;
mod path;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, MatchConfig, PathConfig};
pub use path::{perpendicular_distance, Path, PathError};

/// Number of simulation ticks executed per second of wall-clock time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distance below which a projectile collides with an enemy.
pub const HIT_RADIUS: f32 = 20.0;

/// Distance below which an enemy considers its current waypoint reached.
pub const WAYPOINT_ARRIVAL_RADIUS: f32 = 5.0;

/// Distance below which a projectile considers its aim point reached.
pub const PROJECTILE_ARRIVAL_RADIUS: f32 = 5.0;

/// Upper bound on the number of enemies contained in a single wave.
pub const MAX_WAVE_SIZE: u32 = 20;

/// Describes whether the simulation clock is advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayMode {
    /// Ticks advance enemies, towers and projectiles.
    #[default]
    Running,
    /// Ticks are ignored; tower placement remains available.
    Paused,
}

impl PlayMode {
    /// Returns the opposite mode, used by pause toggles.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Appends a new wave of enemies at the start of the path.
    SpawnWave {
        /// Enemies composing the wave, in spawn order.
        enemies: Vec<EnemySpawn>,
    },
    /// Requests construction of a tower centred on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Grid cell that hosts the tower.
        cell: CellCoord,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick: u64,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a wave was spawned.
    WaveSpawned {
        /// Wave number the spawned enemies belong to.
        wave: WaveNumber,
        /// Number of enemies created for the wave.
        enemy_count: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that was created.
        kind: EnemyKind,
    },
    /// Reports that an enemy walked past the final waypoint.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives remaining after the leak was deducted.
        lives: Lives,
    },
    /// Reports that an enemy left the live set because its health was depleted.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that owns the projectile.
        tower: TowerId,
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Enemy whose position was used as the aim point.
        target: EnemyId,
    },
    /// Reports that a projectile became inactive without hitting anything.
    ProjectileExpired {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a kill was credited to the player.
    BountyAwarded {
        /// Tower whose projectile produced the kill.
        tower: TowerId,
        /// Enemy that was killed.
        enemy: EnemyId,
        /// Amount of gold credited.
        amount: Gold,
        /// Balance after the credit.
        balance: Gold,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell hosting the tower.
        cell: CellCoord,
        /// Gold deducted for the construction.
        cost: Gold,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that the lives counter reached zero.
    MatchLost {
        /// Wave counter at the moment the match was lost.
        wave: WaveNumber,
    },
}

/// Parameters for a single enemy requested by [`Command::SpawnWave`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Kind of enemy to create.
    pub kind: EnemyKind,
    /// Distance travelled per tick, fixed for the enemy's lifetime.
    pub speed: f32,
}

impl EnemySpawn {
    /// Creates a new spawn descriptor.
    #[must_use]
    pub const fn new(kind: EnemyKind, speed: f32) -> Self {
        Self { kind, speed }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Amount of money held by the player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Gold(u32);

impl Gold {
    /// Creates a new gold amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds the provided amount, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Gold) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts the provided amount, returning `None` when funds are insufficient.
    #[must_use]
    pub const fn checked_sub(self, other: Gold) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of leaks the player can absorb before the match ends.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lives(u32);

impl Lives {
    /// Creates a new lives counter.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Deducts a single life, never dropping below zero.
    pub fn lose_one(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    /// Reports whether the counter reached the terminal value.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// One-based wave counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Wave counter value at the start of a match.
    pub const FIRST: Self = Self(1);

    /// Creates a new wave counter.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the counter that follows this wave.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number of enemies spawned for this wave: `min(5 + 2 * wave, 20)`.
    #[must_use]
    pub const fn enemy_count(self) -> u32 {
        let count = 5_u32.saturating_add(self.0.saturating_mul(2));
        if count < MAX_WAVE_SIZE {
            count
        } else {
            MAX_WAVE_SIZE
        }
    }
}

impl Default for WaveNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for WaveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hit points of an enemy. Damage may push the value below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health left after absorbing `amount` damage.
    #[must_use]
    pub fn saturating_sub(self, amount: u32) -> Self {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether the value is at or below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }

    /// Fraction of `max` that remains, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn fraction_of(self, max: Health) -> f32 {
        if max.0 <= 0 {
            return 0.0;
        }
        (self.0 as f32 / max.0 as f32).clamp(0.0, 1.0)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the cell containing the provided world-space point.
    ///
    /// Points with negative coordinates, or a non-positive cell size, have no cell.
    #[must_use]
    pub fn containing(point: Vec2, cell_size: f32) -> Option<Self> {
        if cell_size <= 0.0 || !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / cell_size).floor();
        let row = (point.y / cell_size).floor();
        if column > u32::MAX as f32 || row > u32::MAX as f32 {
            return None;
        }
        Some(Self::new(column as u32, row as u32))
    }

    /// World-space rectangle covered by the cell.
    #[must_use]
    pub fn rect(self, cell_size: f32) -> CellRect {
        CellRect::new(
            Vec2::new(self.column as f32 * cell_size, self.row as f32 * cell_size),
            cell_size,
        )
    }
}

/// Axis-aligned square covering a grid cell in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    origin: Vec2,
    size: f32,
}

impl CellRect {
    /// Constructs a rectangle from its upper-left corner and edge length.
    #[must_use]
    pub const fn new(origin: Vec2, size: f32) -> Self {
        Self { origin, size }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Edge length of the square.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::splat(self.size * 0.5)
    }

    /// Reports whether the point lies inside the rectangle (right/bottom edges excluded).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size
            && point.y < self.origin.y + self.size
    }
}

/// Opaque colour expressed as byte RGB components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Kinds of enemies that walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Small, common enemy. Rolled for 70% of spawns.
    Scout,
    /// Larger, rarer enemy. Rolled for 30% of spawns.
    Brute,
}

impl EnemyKind {
    /// Health every enemy of this kind starts with.
    #[must_use]
    pub const fn max_health(self) -> Health {
        match self {
            Self::Scout | Self::Brute => Health::new(100),
        }
    }

    /// Asset identifier used to look up the enemy's sprite.
    #[must_use]
    pub const fn visual_key(self) -> &'static str {
        match self {
            Self::Scout => "enemy1",
            Self::Brute => "enemy2",
        }
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced tower with moderate range and damage.
    Basic,
    /// Long-range tower firing slow, heavy shells.
    Cannon,
    /// Fast-firing tower with light arrows.
    Archer,
}

impl TowerKind {
    /// Every constructible tower kind in menu order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Cannon, TowerKind::Archer];

    /// Constant stat bundle associated with the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                range: 150.0,
                damage: 10,
                cooldown_ticks: 30,
                projectile_speed: 5.0,
                projectile_radius: 4.0,
                projectile_color: RgbColor::from_rgb(0, 150, 255),
                body_color: RgbColor::from_rgb(0, 100, 200),
            },
            Self::Cannon => TowerStats {
                range: 200.0,
                damage: 20,
                cooldown_ticks: 30,
                projectile_speed: 4.0,
                projectile_radius: 6.0,
                projectile_color: RgbColor::from_rgb(255, 100, 0),
                body_color: RgbColor::from_rgb(200, 100, 50),
            },
            Self::Archer => TowerStats {
                range: 180.0,
                damage: 15,
                cooldown_ticks: 20,
                projectile_speed: 7.0,
                projectile_radius: 3.0,
                projectile_color: RgbColor::from_rgb(100, 255, 100),
                body_color: RgbColor::from_rgb(50, 200, 50),
            },
        }
    }

    /// Gold deducted when the tower is built.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::Basic => Gold::new(100),
            Self::Cannon => Gold::new(200),
            Self::Archer => Gold::new(150),
        }
    }

    /// Asset identifier used to look up the tower's sprite.
    #[must_use]
    pub const fn visual_key(self) -> &'static str {
        match self {
            Self::Basic => "basic_tower",
            Self::Cannon => "cannon_tower",
            Self::Archer => "archer_tower",
        }
    }

    /// Human readable name shown in menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Cannon => "Cannon",
            Self::Archer => "Archer",
        }
    }
}

/// Combat parameters shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Maximum straight-line distance at which an enemy can be targeted.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Ticks the tower waits after firing before it may fire again.
    pub cooldown_ticks: u32,
    /// Distance travelled by projectiles per tick.
    pub projectile_speed: f32,
    /// Radius used when drawing projectiles.
    pub projectile_radius: f32,
    /// Colour used when drawing projectiles.
    pub projectile_color: RgbColor,
    /// Colour used when drawing the tower and its range indicator.
    pub body_color: RgbColor,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the playing field.
    #[error("cell lies outside the playing field")]
    OutOfBounds,
    /// The requested cell is too close to the enemy path.
    #[error("cell is too close to the enemy path")]
    NotBuildable,
    /// The requested cell already hosts a tower.
    #[error("cell already hosts a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("tower costs {cost} gold but only {available} gold is available")]
    InsufficientFunds {
        /// Price of the requested tower.
        cost: Gold,
        /// Gold held when the request was evaluated.
        available: Gold,
    },
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// World-space position.
    pub position: Vec2,
    /// Current health.
    pub health: Health,
    /// Health the enemy spawned with.
    pub max_health: Health,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Index of the waypoint the enemy is walking toward.
    pub waypoint: usize,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell hosting the tower.
    pub cell: CellCoord,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Stat bundle in effect for the tower.
    pub stats: TowerStats,
    /// Ticks remaining until the tower may fire.
    pub cooldown: u32,
}

/// Read-only snapshot describing all towers placed on the field.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that owns the projectile.
    pub tower: TowerId,
    /// Current world-space position.
    pub position: Vec2,
    /// Aim point captured at launch.
    pub target: Vec2,
    /// Constant per-tick displacement.
    pub velocity: Vec2,
    /// Drawing radius.
    pub radius: f32,
    /// Drawing colour.
    pub color: RgbColor,
    /// Whether the projectile is still in flight.
    pub active: bool,
}

/// Read-only snapshot describing every projectile owned by any tower.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots grouped by owning tower.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Plain values describing match progress for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchStatus {
    /// Wave counter; names the wave that spawns next.
    pub wave: WaveNumber,
    /// Gold available for construction.
    pub money: Gold,
    /// Leaks the player can still absorb.
    pub lives: Lives,
    /// Number of ticks simulated so far.
    pub tick: u64,
    /// Whether ticks currently advance the simulation.
    pub play_mode: PlayMode,
}

impl MatchStatus {
    /// Reports whether the match reached its terminal condition.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.lives.is_depleted()
    }
}
