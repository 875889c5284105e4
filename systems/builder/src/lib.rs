#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system responsible for emitting tower construction commands.

use stone_defence_core::{CellCoord, CellRect, Command, Event, PlacementError, TowerKind};

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell that would host the tower.
    pub cell: CellCoord,
    /// World-space rectangle covered by the cell.
    pub rect: CellRect,
    /// Reason the world would reject the placement, if any.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(
        kind: TowerKind,
        cell: CellCoord,
        rect: CellRect,
        rejection: Option<PlacementError>,
    ) -> Self {
        Self {
            kind,
            cell,
            rect,
            rejection,
        }
    }

    /// Indicates whether the preview represents a valid placement location.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Tower kind picked through a hotkey or panel button on this frame.
    pub select_tower: Option<TowerKind>,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
}

/// Placement system that tracks the selected tower and emits build commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selected: Option<TowerKind>,
}

impl Builder {
    /// Creates a builder with no tower selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Tower kind the next confirmed click will construct.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerKind> {
        self.selected
    }

    /// Describes what confirming a placement on `cursor_cell` would do.
    ///
    /// The `check` closure should mirror the semantics of the world's
    /// `query::placement_check` helper.
    pub fn preview<F>(
        &self,
        cursor_cell: Option<CellCoord>,
        cell_size: f32,
        check: F,
    ) -> Option<PlacementPreview>
    where
        F: FnOnce(TowerKind, CellCoord) -> Result<(), PlacementError>,
    {
        let kind = self.selected?;
        let cell = cursor_cell?;
        Some(PlacementPreview::new(
            kind,
            cell,
            cell.rect(cell_size),
            check(kind, cell).err(),
        ))
    }

    /// Consumes world events and adapter-derived input to emit placement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TowerPlaced { kind, .. } = event {
                if self.selected == Some(*kind) {
                    self.selected = None;
                }
            }
        }

        if let Some(kind) = input.select_tower {
            self.selected = Some(kind);
            return;
        }

        if !input.confirm_action {
            return;
        }

        let Some(selected) = self.selected else {
            return;
        };

        if let Some(preview) = preview {
            if preview.kind == selected && preview.placeable() {
                out.push(Command::PlaceTower {
                    kind: preview.kind,
                    cell: preview.cell,
                });
            }
        }
    }
}
