//! Match parameters that adapters may override from configuration files.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Gold, Lives, Path, PathError};

/// Reasons a [`MatchConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cell edge is not a positive finite number.
    #[error("cell size must be positive, got {cell_size}")]
    InvalidCellSize {
        /// Cell size supplied.
        cell_size: f32,
    },
    /// The playing field has no area.
    #[error("field dimensions must be positive, got {width}x{height}")]
    InvalidField {
        /// Field width supplied.
        width: f32,
        /// Field height supplied.
        height: f32,
    },
    /// The clearance added around the path corridor is negative or not finite.
    #[error("path margin must be zero or positive, got {margin}")]
    InvalidPathMargin {
        /// Margin supplied.
        margin: f32,
    },
    /// The configured path is invalid.
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
}

/// Tunable match parameters. Every field falls back to the stock game's value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Width of the playing field in world units.
    pub field_width: f32,
    /// Height of the playing field in world units.
    pub field_height: f32,
    /// Edge length of a placement cell in world units.
    pub cell_size: f32,
    /// Clearance added to half the corridor width when excluding cells near the path.
    pub path_margin: f32,
    /// Gold held at the start of the match.
    pub starting_money: Gold,
    /// Lives held at the start of the match.
    pub starting_lives: Lives,
    /// Gold credited for each confirmed kill.
    pub bounty: Gold,
    /// Route walked by enemies.
    pub path: PathConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            cell_size: 40.0,
            path_margin: 15.0,
            starting_money: Gold::new(1_000),
            starting_lives: Lives::new(10),
            bounty: Gold::new(20),
            path: PathConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Validates the configuration and builds the path it describes.
    pub fn resolve_path(&self) -> Result<Path, ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize {
                cell_size: self.cell_size,
            });
        }

        let field_valid = self.field_width.is_finite()
            && self.field_height.is_finite()
            && self.field_width > 0.0
            && self.field_height > 0.0;
        if !field_valid {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }

        if !self.path_margin.is_finite() || self.path_margin < 0.0 {
            return Err(ConfigError::InvalidPathMargin {
                margin: self.path_margin,
            });
        }

        self.path.build().map_err(ConfigError::from)
    }

    /// Number of cell columns and rows covering the field; partial cells count.
    #[must_use]
    pub fn grid_dimensions(&self) -> (u32, u32) {
        if self.cell_size <= 0.0 {
            return (0, 0);
        }
        let columns = (self.field_width / self.cell_size).ceil().max(0.0);
        let rows = (self.field_height / self.cell_size).ceil().max(0.0);
        (columns as u32, rows as u32)
    }
}

/// Serializable description of a [`Path`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Waypoints as `[x, y]` pairs.
    pub waypoints: Vec<[f32; 2]>,
    /// Corridor width.
    pub width: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        let path = Path::serpentine();
        Self {
            waypoints: path.points().iter().map(|point| point.to_array()).collect(),
            width: path.width(),
        }
    }
}

impl PathConfig {
    /// Builds and validates the described path.
    pub fn build(&self) -> Result<Path, PathError> {
        let points = self.waypoints.iter().copied().map(Vec2::from).collect();
        Path::new(points, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_describes_stock_match() {
        let config = MatchConfig::default();
        assert_eq!(config.grid_dimensions(), (20, 15));
        assert_eq!(config.resolve_path(), Ok(Path::serpentine()));
        assert_eq!(config.starting_money, Gold::new(1_000));
        assert_eq!(config.starting_lives, Lives::new(10));
    }

    #[test]
    fn partial_cells_extend_the_grid() {
        let config = MatchConfig {
            field_width: 810.0,
            ..MatchConfig::default()
        };
        assert_eq!(config.grid_dimensions(), (21, 15));
    }

    #[test]
    fn rejects_zero_cell_size() {
        let config = MatchConfig {
            cell_size: 0.0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.resolve_path(),
            Err(ConfigError::InvalidCellSize { .. })
        ));
    }

    #[test]
    fn surfaces_path_errors() {
        let config = MatchConfig {
            path: PathConfig {
                waypoints: vec![[0.0, 0.0]],
                width: 40.0,
            },
            ..MatchConfig::default()
        };
        assert_eq!(
            config.resolve_path(),
            Err(ConfigError::Path(PathError::TooFewWaypoints { count: 1 }))
        );
    }
}
