#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Stone Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use stone_defence_core::{
    CellCoord, CellRect, EnemyId, EnemyKind, EnemySnapshot, MatchStatus, PlacementError, PlayMode,
    ProjectileSnapshot, RgbColor, TowerId, TowerKind, TowerSnapshot,
};
use std::{error::Error, fmt, time::Duration};

/// Cursor distance from a tower centre within which its range is displayed.
pub const RANGE_HOVER_RADIUS: f32 = 30.0;

/// Fraction of a cell edge covered by a tower sprite.
const TOWER_SPRITE_SCALE: f32 = 0.9;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<RgbColor> for Color {
    fn from(color: RgbColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units while it hovers the field.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the adapter detected a placement confirmation on this frame.
    pub confirm_action: bool,
    /// Tower kind chosen through a hotkey or panel button on this frame.
    pub select_tower: Option<TowerKind>,
    /// Whether the adapter detected a pause toggle press on this frame.
    pub pause_toggle: bool,
}

/// Describes the playing field and its placement grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Field width in world units.
    pub width: f32,
    /// Field height in world units.
    pub height: f32,
    /// Edge length of a placement cell.
    pub cell_size: f32,
    /// Color used when no background sprite is available.
    pub background: Color,
}

impl FieldPresentation {
    /// Creates a new field descriptor.
    ///
    /// Returns an error when the field or its cells have no area.
    pub fn new(
        width: f32,
        height: f32,
        cell_size: f32,
        background: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidFieldSize { width, height });
        }

        Ok(Self {
            width,
            height,
            cell_size,
            background,
        })
    }

    /// Reports whether a world-space position lies inside the field.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0 && position.y >= 0.0 && position.x < self.width && position.y < self.height
    }

    /// Cell under a world-space position, if the position lies inside the field.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if !self.contains(position) {
            return None;
        }
        CellCoord::containing(position, self.cell_size)
    }
}

/// Polyline walked by the enemies.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoints in walking order.
    pub points: Vec<Vec2>,
    /// Stroke width of the corridor.
    pub width: f32,
    /// Stroke color of the corridor.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a new path descriptor.
    #[must_use]
    pub fn new(points: Vec<Vec2>, width: f32, color: Color) -> Self {
        Self {
            points,
            width,
            color,
        }
    }
}

/// Immutable snapshot describing a tower placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Radius of the attack range circle.
    pub range: f32,
    /// Body color used for primitives and the range overlay.
    pub color: Color,
    /// Edge length of the tower sprite.
    pub sprite_size: f32,
}

impl TowerPresentation {
    /// Builds the descriptor from a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &TowerSnapshot, cell_size: f32) -> Self {
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            position: snapshot.position,
            range: snapshot.stats.range,
            color: snapshot.stats.body_color.into(),
            sprite_size: cell_size * TOWER_SPRITE_SCALE,
        }
    }

    /// Sprite key under which the tower's image is registered.
    #[must_use]
    pub const fn visual_key(&self) -> &'static str {
        self.kind.visual_key()
    }

    /// Reports whether the cursor is close enough to reveal the range circle.
    #[must_use]
    pub fn is_hovered(&self, cursor: Vec2) -> bool {
        self.position.distance(cursor) < RANGE_HOVER_RADIUS
    }
}

/// Enemy drawn with its health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Remaining health as a fraction of the maximum.
    pub health_fraction: f32,
}

impl EnemyPresentation {
    /// Builds the descriptor from a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &EnemySnapshot) -> Self {
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            position: snapshot.position,
            health_fraction: snapshot.health.fraction_of(snapshot.max_health),
        }
    }

    /// Sprite key under which the enemy's image is registered.
    #[must_use]
    pub const fn visual_key(&self) -> &'static str {
        self.kind.visual_key()
    }

    /// Edge length of the enemy sprite.
    #[must_use]
    pub const fn sprite_size(&self) -> f32 {
        match self.kind {
            EnemyKind::Scout => 35.0,
            EnemyKind::Brute => 45.0,
        }
    }
}

/// Projectile drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the projectile.
    pub position: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

impl ProjectilePresentation {
    /// Builds the descriptor from a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &ProjectileSnapshot) -> Self {
        Self {
            position: snapshot.position,
            radius: snapshot.radius,
            color: snapshot.color.into(),
        }
    }
}

/// Counters shown in the heads-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Wave counter.
    pub wave: u32,
    /// Gold available.
    pub money: u32,
    /// Lives remaining.
    pub lives: u32,
}

impl From<MatchStatus> for HudPresentation {
    fn from(status: MatchStatus) -> Self {
        Self {
            wave: status.wave.get(),
            money: status.money.get(),
            lives: status.lives.get(),
        }
    }
}

/// Declarative placement preview emitted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell rectangle that would host the tower.
    pub region: CellRect,
    /// Reason reported by the world for rejecting the placement attempt, if any.
    pub rejection: Option<PlacementError>,
}

impl TowerPreview {
    /// Creates a new tower preview descriptor.
    #[must_use]
    pub const fn new(kind: TowerKind, region: CellRect, rejection: Option<PlacementError>) -> Self {
        Self {
            kind,
            region,
            rejection,
        }
    }

    /// Indicates whether the preview location is valid for placement.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Sound effects requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A tower was constructed.
    Build,
    /// A tower fired a projectile.
    Explosion,
}

impl SoundCue {
    /// Key under which the sound is registered in an asset catalog.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Explosion => "explode",
        }
    }
}

/// Lookup of optional media assets by key.
///
/// Missing assets are never an error: callers fall back to primitives or silence.
pub trait AssetCatalog {
    /// Reports whether a sprite is registered under `key`.
    fn has_sprite(&self, key: &str) -> bool;

    /// Reports whether a sound is registered under `key`.
    fn has_sound(&self, key: &str) -> bool;
}

/// Scene description combining the field, the path and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playing field and placement grid.
    pub field: FieldPresentation,
    /// Route walked by the enemies.
    pub path: PathPresentation,
    /// Cells that may host towers.
    pub buildable_cells: Vec<CellRect>,
    /// Towers currently placed.
    pub towers: Vec<TowerPresentation>,
    /// Enemies currently alive.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles currently in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Wave, money and lives counters.
    pub hud: HudPresentation,
    /// Tower kind the next click will construct.
    pub selected_tower: Option<TowerKind>,
    /// Placement preview under the cursor.
    pub tower_preview: Option<TowerPreview>,
    /// Active play mode for the simulation.
    pub play_mode: PlayMode,
    /// Whether the match reached its terminal condition.
    pub match_over: bool,
    /// Sounds requested since the previous frame.
    pub sound_cues: Vec<SoundCue>,
}

impl Scene {
    /// Creates an empty scene over the provided field and path.
    #[must_use]
    pub fn new(
        field: FieldPresentation,
        path: PathPresentation,
        buildable_cells: Vec<CellRect>,
    ) -> Self {
        Self {
            field,
            path,
            buildable_cells,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hud: HudPresentation::default(),
            selected_tower: None,
            tower_preview: None,
            play_mode: PlayMode::Running,
            match_over: false,
            sound_cues: Vec::new(),
        }
    }

    /// Towers whose range circle should be drawn for the given cursor.
    pub fn hovered_towers(&self, cursor: Option<Vec2>) -> impl Iterator<Item = &TowerPresentation> {
        self.towers
            .iter()
            .filter(move |tower| cursor.map_or(false, |cursor| tower.is_hovered(cursor)))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Stone Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered. Backends stop once the scene reports `match_over`.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell size must be positive to avoid a zero-sized grid.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// Field dimensions must be positive.
    InvalidFieldSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
            Self::InvalidFieldSize { width, height } => {
                write!(f, "field must have positive size (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
