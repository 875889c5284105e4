//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use stone_defence_core::{PlayMode, TowerKind};
use stone_defence_rendering::HudPresentation;

/// Outcome of rendering the control panel UI for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Tower kind whose button was pressed during this frame.
    pub(crate) select_tower: Option<TowerKind>,
    /// Whether the pause button was pressed during this frame.
    pub(crate) pause_toggle: bool,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Wave, money and lives counters.
    pub(crate) hud: HudPresentation,
    /// Tower kind the next click will construct.
    pub(crate) selected_tower: Option<TowerKind>,
    /// Current play mode, displayed as a status label.
    pub(crate) play_mode: PlayMode,
}

/// Renders the HUD labels and the selection/pause buttons.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let hud = context.hud;
        ui.label(None, format!("Wave: {}", hud.wave).as_str());
        ui.label(None, format!("Money: {}", hud.money).as_str());
        ui.label(None, format!("Lives: {}", hud.lives).as_str());

        let selected = match context.selected_tower {
            Some(kind) => format!("Building: {}", kind.label()),
            None => "Building: -".to_string(),
        };
        ui.label(None, selected.as_str());

        for (index, kind) in TowerKind::ALL.into_iter().enumerate() {
            let caption = format!("{} ({}) {}g", kind.label(), index + 1, kind.cost().get());
            if ui.button(None, caption.as_str()) {
                result.select_tower = Some(kind);
            }
        }

        let (status, action) = match context.play_mode {
            PlayMode::Running => ("Status: Running", "Pause (Space)"),
            PlayMode::Paused => ("Status: Paused", "Resume (Space)"),
        };
        ui.label(None, status);
        result.pause_toggle = ui.button(None, action);
    });

    ui.pop_skin();

    result
}
