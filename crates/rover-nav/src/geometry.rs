//! Coordinate geometry helpers shared by both navigation strategies.
//!
//! Everything here is a pure, stateless function. Angles are degrees in
//! `[0, 360)`; lengths are world units (meters).

use crate::error::NavError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset (deg) between the mathematical angle convention and the robot's
/// forward-sensor axis. Bearings carry this offset so they can be compared
/// directly against a heading expressed in the same frame.
pub const FORWARD_AXIS_OFFSET: f64 = 90.0;

/// Default tolerance (world units) for [`on_line`] membership tests.
///
/// Control-sensitive tunable: too tight chatters between goal-seek and
/// boundary-follow, too loose switches modes prematurely.
pub const DEFAULT_LINE_TOLERANCE: f64 = 0.02;

/// A 2-D point in world coordinates (meters).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// World-frame x (m).
    pub x: f64,
    /// World-frame y (m).
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Slope and intercept of the line through `a` and `b`.
///
/// # Errors
///
/// Returns `NavError::DegenerateLine` when `a` and `b` share the same x
/// coordinate (vertical line, slope undefined).
pub fn line_params(a: Point, b: Point) -> Result<(f64, f64), NavError> {
    if a.x == b.x {
        return Err(NavError::DegenerateLine(
            "points share the same x coordinate",
        ));
    }
    let slope = (b.y - a.y) / (b.x - a.x);
    let intercept = a.y - slope * a.x;
    Ok((slope, intercept))
}

/// Euclidean distance between `a` and `b`.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Bearing from `a` to `b` in degrees, normalized to `[0, 360)`.
///
/// Carries the [`FORWARD_AXIS_OFFSET`] so the result is comparable against a
/// heading in the forward-sensor-axis frame.
pub fn bearing(a: Point, b: Point) -> f64 {
    ((b.y - a.y).atan2(b.x - a.x).to_degrees() + FORWARD_AXIS_OFFSET).rem_euclid(360.0)
}

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Deliberately the line, not the segment: this measures drift off a
/// reference line, not arrival at `b`.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let length_ab = distance(a, b);
    let cross = ((b.y - a.y) * (a.x - p.x) - (b.x - a.x) * (a.y - p.y)).abs();
    cross / length_ab
}

/// Whether `p` lies within `tolerance` of the infinite line through `a` and `b`.
pub fn on_line(p: Point, a: Point, b: Point, tolerance: f64) -> bool {
    perpendicular_distance(p, a, b) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_line_params_simple() {
        let (m, c) = line_params(Point::new(0.0, 1.0), Point::new(2.0, 5.0)).unwrap();
        assert!((m - 2.0).abs() < EPSILON);
        assert!((c - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_line_params_degenerate_vertical() {
        let result = line_params(Point::new(1.0, 0.0), Point::new(1.0, 5.0));
        assert!(matches!(result, Err(NavError::DegenerateLine(_))));
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < EPSILON);
        assert!(distance(Point::new(1.0, 1.0), Point::new(1.0, 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_bearing_cardinals() {
        let origin = Point::new(0.0, 0.0);
        // atan2 angle plus the +90 forward-axis offset
        assert!((bearing(origin, Point::new(1.0, 0.0)) - 90.0).abs() < EPSILON);
        assert!((bearing(origin, Point::new(0.0, 1.0)) - 180.0).abs() < EPSILON);
        assert!((bearing(origin, Point::new(-1.0, 0.0)) - 270.0).abs() < EPSILON);
        assert!((bearing(origin, Point::new(0.0, -1.0)) - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_perpendicular_distance_is_to_line_not_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        // Beyond the segment's end, still on the line's axis
        let p = Point::new(5.0, 2.0);
        assert!((perpendicular_distance(p, a, b) - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_perpendicular_distance_diagonal() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 1.0);
        let p = Point::new(1.0, 0.0);
        let expected = (2.0_f64).sqrt() / 2.0;
        assert!((perpendicular_distance(p, a, b) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_on_line_tolerance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(on_line(Point::new(5.0, 0.015), a, b, DEFAULT_LINE_TOLERANCE));
        assert!(!on_line(Point::new(5.0, 0.05), a, b, DEFAULT_LINE_TOLERANCE));
    }
}
