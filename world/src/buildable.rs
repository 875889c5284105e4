//! Grid cells far enough from the path to host towers.

use std::collections::BTreeSet;

use stone_defence_core::{perpendicular_distance, CellCoord, Path};

/// Placement grid plus the subset of cells cleared for construction.
#[derive(Clone, Debug)]
pub(crate) struct BuildableArea {
    columns: u32,
    rows: u32,
    cells: BTreeSet<CellCoord>,
}

impl BuildableArea {
    /// Classifies every cell of a `columns` by `rows` grid.
    ///
    /// A cell is buildable when its centre lies farther than half the corridor
    /// width plus `margin` from the infinite line through every path segment.
    pub(crate) fn compute(path: &Path, cell_size: f32, columns: u32, rows: u32, margin: f32) -> Self {
        let clearance = path.width() / 2.0 + margin;
        let mut cells = BTreeSet::new();

        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let center = cell.rect(cell_size).center();
                let clear = path
                    .segments()
                    .all(|(start, end)| perpendicular_distance(center, start, end) > clearance);
                if clear {
                    let _ = cells.insert(cell);
                }
            }
        }

        Self {
            columns,
            rows,
            cells,
        }
    }

    pub(crate) const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Buildable cells in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn stock_layout_excludes_the_corridor() {
        let area = BuildableArea::compute(&Path::serpentine(), 40.0, 20, 15, 15.0);

        // Centre (100, 300) sits on the first segment.
        assert!(!area.contains(CellCoord::new(2, 7)));
        // Centre (20, 20) is far from every infinite segment line.
        assert!(area.contains(CellCoord::new(0, 0)));
        assert!(area.cells().all(|cell| area.in_bounds(cell)));
    }

    #[test]
    fn clearance_is_strict() {
        // Horizontal path at y = -15, width 20 and margin 10: clearance is 20.
        let path = Path::new(vec![Vec2::new(-100.0, -15.0), Vec2::new(100.0, -15.0)], 20.0)
            .expect("valid path");
        // Row 0 centres sit at y = 5, exactly 20 units away.
        let area = BuildableArea::compute(&path, 10.0, 2, 2, 10.0);

        assert!(!area.contains(CellCoord::new(0, 0)), "distance equal to clearance");
        assert!(area.contains(CellCoord::new(0, 1)));
    }

    #[test]
    fn out_of_bounds_cells_are_reported() {
        let area = BuildableArea::compute(&Path::serpentine(), 40.0, 20, 15, 15.0);
        assert!(!area.in_bounds(CellCoord::new(20, 0)));
        assert!(!area.in_bounds(CellCoord::new(0, 15)));
        assert!(area.in_bounds(CellCoord::new(19, 14)));
    }
}
