#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Stone Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature, so sound cues requested by the scene are drained
//! and logged instead of played.
//!
//! The adapter uses Macroquad's immediate-mode UI module for the side panel.
//! All UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

mod sprites;
mod ui;

use self::{
    sprites::{SpriteAtlas, KNOWN_SPRITE_KEYS},
    ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult},
};
use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::BLACK,
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
};
use stone_defence_core::{CellRect, EnemyKind, PlayMode, TowerKind};
use stone_defence_rendering::{
    AssetCatalog, Color, EnemyPresentation, FieldPresentation, FrameInput, PathPresentation,
    Presentation, ProjectilePresentation, RenderingBackend, Scene, TowerPresentation,
    TowerPreview,
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Width of the side panel hosting the HUD and tower buttons.
const PANEL_WIDTH: f32 = 160.0;
const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 600;

const HEALTH_BAR_WIDTH: f32 = 30.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;
const HEALTH_BAR_LIFT: f32 = 25.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    pause_toggle_latched: bool,
    tower_selection_latched: Option<TowerKind>,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a pause toggle and clears the latch so the
    /// action fires only once.
    pub fn take_pause_toggle(&mut self) -> bool {
        let latched = self.pause_toggle_latched;
        self.pause_toggle_latched = false;
        latched
    }

    /// Records that the control-panel button requested a pause toggle this frame.
    pub fn register_pause_toggle(&mut self) {
        self.pause_toggle_latched = true;
    }

    /// Returns the latched tower selection, clearing it so the action fires once.
    pub fn take_tower_selection(&mut self) -> Option<TowerKind> {
        self.tower_selection_latched.take()
    }

    /// Records that a tower button was pressed this frame.
    pub fn register_tower_selection(&mut self, kind: TowerKind) {
        self.tower_selection_latched = Some(kind);
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `Space` pauses or resumes the simulation.
    pause_toggle: bool,
    /// `1`, `2` and `3` pick Basic, Cannon and Archer towers.
    select_tower: Option<TowerKind>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape);
        let pause_toggle = is_key_pressed(KeyCode::Space);
        let select_tower = if is_key_pressed(KeyCode::Key1) {
            Some(TowerKind::Basic)
        } else if is_key_pressed(KeyCode::Key2) {
            Some(TowerKind::Cannon)
        } else if is_key_pressed(KeyCode::Key3) {
            Some(TowerKind::Archer)
        } else {
            None
        };

        Self {
            quit_requested,
            pause_toggle,
            select_tower,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: PathBuf::from("assets/manifest.toml"),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the location of the sprite manifest.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        if seconds <= f32::EPSILON {
            return None;
        }
        Some(frames as f32 / seconds)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                SpriteAtlas::load_or_empty(&manifest_path)
            } else {
                SpriteAtlas::empty()
            };
            report_missing_sprites(&sprite_atlas, &manifest_path);

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let pause_toggle = control_panel_input.take_pause_toggle();
                let select_tower = control_panel_input.take_tower_selection();
                let frame_input = gather_frame_input(
                    &scene,
                    &metrics_before,
                    pause_toggle,
                    select_tower,
                    keyboard,
                );
                let cursor = frame_input.cursor_world_space;

                update_scene(frame_dt, frame_input, &mut scene);
                drain_sound_cues(&mut scene, &sprite_atlas);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_field(&scene.field, &metrics, &sprite_atlas);
                draw_path(&scene.path, &metrics);
                draw_buildable_cells(&scene.buildable_cells, &metrics);
                for tower in scene.hovered_towers(cursor) {
                    draw_tower_range(tower, &metrics);
                }
                draw_towers(&scene.towers, &metrics, &sprite_atlas);
                draw_enemies(&scene.enemies, &metrics, &sprite_atlas);
                draw_enemy_health_bars(&scene.enemies, &metrics);
                draw_projectiles(&scene.projectiles, &metrics);
                if let Some(preview) = scene.tower_preview {
                    draw_tower_preview(preview, &metrics);
                }
                if scene.play_mode == PlayMode::Paused {
                    draw_pause_banner(&metrics);
                }

                let panel_context = draw_control_panel(&scene, screen_width, screen_height);
                {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    let ControlPanelUiResult {
                        select_tower,
                        pause_toggle,
                    } = draw_control_panel_ui(&mut control_panel_ui, panel_context);
                    if pause_toggle {
                        control_panel_input.register_pause_toggle();
                    }
                    if let Some(kind) = select_tower {
                        control_panel_input.register_tower_selection(kind);
                    }
                }

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                if scene.match_over {
                    log::info!("game over: lives depleted on wave {}", scene.hud.wave);
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn report_missing_sprites(atlas: &SpriteAtlas, manifest_path: &Path) {
    let missing = KNOWN_SPRITE_KEYS
        .into_iter()
        .filter(|key| !atlas.has_sprite(key))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        log::warn!(
            "no sprite for {} in {}; using primitive shapes",
            missing.join(", "),
            manifest_path.display()
        );
    }
}

fn drain_sound_cues(scene: &mut Scene, catalog: &impl AssetCatalog) {
    for cue in scene.sound_cues.drain(..) {
        if catalog.has_sound(cue.key()) {
            log::debug!("playing sound `{}`", cue.key());
        } else {
            log::debug!("sound `{}` requested; audio is disabled", cue.key());
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let field = scene.field;
        let panel_width = PANEL_WIDTH.min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);
        let scale = if field.width <= f32::EPSILON || field.height <= f32::EPSILON {
            1.0
        } else {
            (available_width / field.width).min(screen_height / field.height)
        };

        let offset_x = ((available_width - field.width * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - field.height * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_world(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.x - self.offset_x) / self.scale,
            (position.y - self.offset_y) / self.scale,
        )
    }

    fn rect(&self, rect: CellRect) -> (f32, f32, f32) {
        let top_left = self.to_screen(rect.origin());
        (top_left.x, top_left.y, rect.size() * self.scale)
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    ui_pause_toggle: bool,
    ui_select_tower: Option<TowerKind>,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let confirm_click = is_mouse_button_pressed(MouseButton::Left);
    gather_frame_input_from_observations(
        &scene.field,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        confirm_click,
        ui_pause_toggle || keyboard.pause_toggle,
        ui_select_tower.or(keyboard.select_tower),
    )
}

fn gather_frame_input_from_observations(
    field: &FieldPresentation,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    confirm_click: bool,
    pause_toggle: bool,
    select_tower: Option<TowerKind>,
) -> FrameInput {
    let mut input = FrameInput {
        pause_toggle,
        select_tower,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON {
        return input;
    }

    let world_position = metrics.to_world(cursor_position);
    if field.contains(world_position) {
        input.cursor_world_space = Some(world_position);
        input.confirm_action = confirm_click;
    }

    input
}

fn draw_control_panel(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> ControlPanelUiContext {
    let width = PANEL_WIDTH.min(screen_width);
    let left = (screen_width - width).max(0.0);
    let background_color = macroquad::color::Color::from_rgba(30, 30, 30, 255);
    macroquad::shapes::draw_rectangle(left, 0.0, width, screen_height, background_color);

    ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(width, screen_height),
        background: background_color,
        hud: scene.hud,
        selected_tower: scene.selected_tower,
        play_mode: scene.play_mode,
    }
}

fn draw_field(field: &FieldPresentation, metrics: &SceneMetrics, sprite_atlas: &SpriteAtlas) {
    let top_left = metrics.to_screen(Vec2::ZERO);
    let size = Vec2::new(field.width, field.height) * metrics.scale;
    if sprite_atlas.draw("background", top_left, size) {
        return;
    }

    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        to_macroquad_color(field.background),
    );
}

fn draw_path(path: &PathPresentation, metrics: &SceneMetrics) {
    let thickness = path.width * metrics.scale;
    let color = to_macroquad_color(path.color);

    for segment in path.points.windows(2) {
        let start = metrics.to_screen(segment[0]);
        let end = metrics.to_screen(segment[1]);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }

    // Square joints so corners stay filled at full width.
    for point in &path.points {
        let centre = metrics.to_screen(*point);
        let half = thickness * 0.5;
        macroquad::shapes::draw_rectangle(
            centre.x - half,
            centre.y - half,
            thickness,
            thickness,
            color,
        );
    }
}

fn draw_buildable_cells(cells: &[CellRect], metrics: &SceneMetrics) {
    let outline = to_macroquad_color(Color::from_rgb_u8(100, 255, 100));
    for cell in cells {
        let (x, y, size) = metrics.rect(*cell);
        macroquad::shapes::draw_rectangle_lines(x, y, size, size, 1.0, outline);
    }
}

fn draw_tower_range(tower: &TowerPresentation, metrics: &SceneMetrics) {
    let radius = tower.range * metrics.scale;
    if radius <= f32::EPSILON {
        return;
    }

    let centre = metrics.to_screen(tower.position);
    let fill = tower.color.with_alpha(50.0 / 255.0);
    macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(fill));
    macroquad::shapes::draw_circle_lines(
        centre.x,
        centre.y,
        radius,
        1.0,
        to_macroquad_color(tower.color),
    );
}

fn draw_towers(towers: &[TowerPresentation], metrics: &SceneMetrics, sprite_atlas: &SpriteAtlas) {
    for tower in towers {
        let size = tower.sprite_size * metrics.scale;
        let centre = metrics.to_screen(tower.position);
        let top_left = centre - Vec2::splat(size * 0.5);
        if sprite_atlas.draw(tower.visual_key(), top_left, Vec2::splat(size)) {
            continue;
        }

        macroquad::shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            size,
            size,
            to_macroquad_color(tower.color),
        );
        macroquad::shapes::draw_rectangle_lines(top_left.x, top_left.y, size, size, 2.0, BLACK);
    }
}

fn draw_enemies(enemies: &[EnemyPresentation], metrics: &SceneMetrics, sprite_atlas: &SpriteAtlas) {
    for enemy in enemies {
        let size = enemy.sprite_size() * metrics.scale;
        let centre = metrics.to_screen(enemy.position);
        let top_left = centre - Vec2::splat(size * 0.5);
        if sprite_atlas.draw(enemy.visual_key(), top_left, Vec2::splat(size)) {
            continue;
        }

        let radius = size * 0.5;
        let body = match enemy.kind {
            EnemyKind::Scout => Color::from_rgb_u8(200, 60, 60),
            EnemyKind::Brute => Color::from_rgb_u8(120, 40, 140),
        };
        macroquad::shapes::draw_circle(centre.x, centre.y, radius, to_macroquad_color(body));
        macroquad::shapes::draw_circle_lines(
            centre.x,
            centre.y,
            radius,
            (radius * 0.1).max(1.0),
            BLACK,
        );
    }
}

fn draw_enemy_health_bars(enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    let background = to_macroquad_color(Color::from_rgb_u8(255, 0, 0));
    let fill = to_macroquad_color(Color::from_rgb_u8(0, 255, 0));

    for enemy in enemies {
        let (left, top, width, height) = health_bar_rectangle(enemy.position, metrics);
        macroquad::shapes::draw_rectangle(left, top, width, height, background);

        let fill_width = width * enemy.health_fraction.clamp(0.0, 1.0);
        if fill_width > f32::EPSILON {
            macroquad::shapes::draw_rectangle(left, top, fill_width, height, fill);
        }
    }
}

/// Screen rectangle of the health bar floating above an enemy.
fn health_bar_rectangle(position: Vec2, metrics: &SceneMetrics) -> (f32, f32, f32, f32) {
    let top_left = metrics.to_screen(Vec2::new(
        position.x - HEALTH_BAR_WIDTH * 0.5,
        position.y - HEALTH_BAR_LIFT,
    ));
    (
        top_left.x,
        top_left.y,
        HEALTH_BAR_WIDTH * metrics.scale,
        HEALTH_BAR_HEIGHT * metrics.scale,
    )
}

fn draw_projectiles(projectiles: &[ProjectilePresentation], metrics: &SceneMetrics) {
    for projectile in projectiles {
        let centre = metrics.to_screen(projectile.position);
        macroquad::shapes::draw_circle(
            centre.x,
            centre.y,
            (projectile.radius * metrics.scale).max(1.0),
            to_macroquad_color(projectile.color),
        );
    }
}

fn draw_tower_preview(preview: TowerPreview, metrics: &SceneMetrics) {
    let (x, y, size) = metrics.rect(preview.region);
    let outline = if preview.placeable() {
        Color::from_rgb_u8(100, 255, 100)
    } else {
        Color::from_rgb_u8(255, 60, 60)
    };

    macroquad::shapes::draw_rectangle(
        x,
        y,
        size,
        size,
        to_macroquad_color(outline.with_alpha(0.3)),
    );
    macroquad::shapes::draw_rectangle_lines(x, y, size, size, 2.0, to_macroquad_color(outline));
}

fn draw_pause_banner(metrics: &SceneMetrics) {
    let anchor = metrics.to_screen(Vec2::new(20.0, 40.0));
    let _ = macroquad::text::draw_text(
        "PAUSED",
        anchor.x,
        anchor.y,
        32.0 * metrics.scale.max(0.5),
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
