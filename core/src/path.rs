//! Fixed polyline walked by every enemy.

use glam::Vec2;
use thiserror::Error;

const SERPENTINE_WAYPOINTS: [Vec2; 8] = [
    Vec2::new(0.0, 300.0),
    Vec2::new(200.0, 300.0),
    Vec2::new(200.0, 150.0),
    Vec2::new(400.0, 150.0),
    Vec2::new(400.0, 450.0),
    Vec2::new(600.0, 450.0),
    Vec2::new(600.0, 300.0),
    Vec2::new(800.0, 300.0),
];
const SERPENTINE_WIDTH: f32 = 40.0;

/// Reasons a path description may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PathError {
    /// Fewer than two waypoints were supplied.
    #[error("a path needs at least two waypoints, found {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// A waypoint repeats its predecessor, producing a zero-length segment.
    #[error("waypoint {index} repeats the previous waypoint")]
    DuplicateWaypoint {
        /// Index of the offending waypoint.
        index: usize,
    },
    /// A waypoint coordinate is NaN or infinite.
    #[error("waypoint {index} is not a finite point")]
    NonFiniteWaypoint {
        /// Index of the offending waypoint.
        index: usize,
    },
    /// The corridor width is not a positive finite number.
    #[error("path width must be positive, got {width}")]
    InvalidWidth {
        /// Width supplied.
        width: f32,
    },
}

/// Immutable ordered list of waypoints plus the corridor width around them.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    width: f32,
}

impl Path {
    /// Validates and constructs a path.
    pub fn new(points: Vec<Vec2>, width: f32) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: points.len(),
            });
        }

        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(PathError::NonFiniteWaypoint { index });
            }
        }

        for (offset, pair) in points.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(PathError::DuplicateWaypoint { index: offset + 1 });
            }
        }

        if !width.is_finite() || width <= 0.0 {
            return Err(PathError::InvalidWidth { width });
        }

        Ok(Self { points, width })
    }

    /// S-shaped route crossing an 800x600 field from left to right.
    #[must_use]
    pub fn serpentine() -> Self {
        Self {
            points: SERPENTINE_WAYPOINTS.to_vec(),
            width: SERPENTINE_WIDTH,
        }
    }

    /// Ordered waypoints.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Corridor width around the polyline.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Number of waypoints; an enemy whose waypoint index reaches it has arrived.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: validation guarantees at least two waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// First waypoint, where enemies spawn.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.points.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// Uses `|cross(end - start, point - start)| / |end - start|`. A degenerate
/// segment falls back to the distance between `point` and `start`.
#[must_use]
pub fn perpendicular_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let line = end - start;
    let offset = point - start;
    let length = line.length();
    if length <= f32::EPSILON {
        return offset.length();
    }
    line.perp_dot(offset).abs() / length
}
