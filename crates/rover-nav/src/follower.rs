//! Discrete path follower.
//!
//! Consumes the planner's cell sequence and drives the robot cell-by-cell
//! from position and heading feedback. This is a rotate-then-advance
//! controller layered over continuous motion; it never computes a smooth
//! trajectory, which is sufficient under the bounded cell size the grids are
//! generated with.

use std::collections::VecDeque;

use rover_kinematics::{DriveIntent, Pose, TurnDirection, WheelCommand};
use tracing::{debug, info};

use crate::grid::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning parameters for the path follower.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerParams {
    /// Arrival margin around a target cell center, in cell units.
    pub arrival_margin: f64,
    /// Heading error (deg) under which the robot is considered aligned.
    pub angle_tolerance: f64,
    /// Heading error (deg) under which rotation slows down to avoid
    /// overshooting the alignment window.
    pub slow_turn_threshold: f64,
    /// Wheel speed (rad/s) for the slow rotation band.
    pub slow_speed: f64,
    /// Full wheel speed (rad/s).
    pub max_speed: f64,
}

impl Default for FollowerParams {
    fn default() -> Self {
        FollowerParams {
            arrival_margin: 0.1,
            angle_tolerance: 1.0,
            slow_turn_threshold: 20.0,
            slow_speed: 1.0,
            max_speed: 6.28,
        }
    }
}

/// Outcome of one follower control period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowerOutput {
    /// Wheel command to apply this period.
    Drive(WheelCommand),
    /// The remaining path is down to the goal cell; the caller should stop
    /// the motors.
    GoalReached,
}

/// Per-run follower context: the remaining path and its tuning.
///
/// The remaining path is consumed destructively, front first; the front cell
/// is the last one reached and the second entry is the active target.
#[derive(Debug, Clone)]
pub struct PathFollower {
    remaining: VecDeque<Cell>,
    cell_size: f64,
    params: FollowerParams,
}

impl PathFollower {
    /// Wrap a planned path. `cell_size` must match the grid the path was
    /// planned on.
    pub fn new(path: Vec<Cell>, cell_size: f64, params: FollowerParams) -> Self {
        PathFollower {
            remaining: path.into(),
            cell_size,
            params,
        }
    }

    /// Cells not yet consumed, the active target second.
    pub fn remaining(&self) -> &VecDeque<Cell> {
        &self.remaining
    }

    /// One control period: pop any cells whose center the robot has reached,
    /// then steer toward the next target.
    pub fn step(&mut self, pose: &Pose) -> FollowerOutput {
        loop {
            if self.remaining.len() <= 1 {
                info!("goal cell reached, stopping");
                return FollowerOutput::GoalReached;
            }
            let target = self.remaining[1];

            // Position in cell units, compared against the target center.
            let fx = pose.x / self.cell_size;
            let fy = pose.y / self.cell_size;
            let arrived = (target.row as f64 + 0.5 - fx).abs() < self.params.arrival_margin
                && (target.col as f64 + 0.5 - fy).abs() < self.params.arrival_margin;
            if arrived {
                let reached = self.remaining.pop_front();
                debug!(?reached, target = %target, "cell reached, advancing along path");
                // Re-evaluate against the new target in the same period.
                continue;
            }

            let current = Cell::new(
                (fx.floor()) as i32,
                (fy.floor()) as i32,
            );
            let target_heading = if target.col > current.col {
                90.0
            } else if target.col < current.col {
                270.0
            } else if target.row < current.row {
                180.0
            } else if target.row > current.row {
                0.0
            } else {
                // Inside the target cell but outside the center margin:
                // creep forward onto the center.
                return FollowerOutput::Drive(
                    DriveIntent::Forward {
                        speed: self.params.slow_speed,
                    }
                    .command(),
                );
            };

            let error = Pose::heading_error(pose.heading, target_heading);
            let intent = if error.abs() > self.params.angle_tolerance {
                let speed = if error.abs() < self.params.slow_turn_threshold {
                    self.params.slow_speed
                } else {
                    self.params.max_speed
                };
                let direction = if error < 0.0 {
                    TurnDirection::Left
                } else {
                    TurnDirection::Right
                };
                DriveIntent::Rotate { direction, speed }
            } else {
                DriveIntent::Forward {
                    speed: self.params.max_speed,
                }
            };
            return FollowerOutput::Drive(intent.command());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 0.25;

    fn follower(cells: &[(i32, i32)]) -> PathFollower {
        let path = cells.iter().map(|&(r, c)| Cell::new(r, c)).collect();
        PathFollower::new(path, CELL, FollowerParams::default())
    }

    fn center(row: i32, col: i32) -> (f64, f64) {
        ((row as f64 + 0.5) * CELL, (col as f64 + 0.5) * CELL)
    }

    #[test]
    fn test_pops_one_cell_per_arrival() {
        let mut f = follower(&[(0, 0), (0, 1), (0, 2)]);
        let (x, y) = center(0, 1);
        let out = f.step(&Pose::new(x, y, 90.0));
        // One pop, then a command toward the new target
        assert_eq!(f.remaining().len(), 2);
        assert!(matches!(out, FollowerOutput::Drive(_)));

        let (x, y) = center(0, 2);
        let out = f.step(&Pose::new(x, y, 90.0));
        // Final pop leaves only the goal cell
        assert_eq!(f.remaining().len(), 1);
        assert_eq!(out, FollowerOutput::GoalReached);
    }

    #[test]
    fn test_goal_reached_is_stable() {
        let mut f = follower(&[(0, 0)]);
        let pose = Pose::new(0.0, 0.0, 0.0);
        assert_eq!(f.step(&pose), FollowerOutput::GoalReached);
        assert_eq!(f.step(&pose), FollowerOutput::GoalReached);
    }

    #[test]
    fn test_rotates_toward_target_heading() {
        let mut f = follower(&[(0, 0), (0, 1)]);
        let (x, y) = center(0, 0);
        // Target is col+, so target heading is 90; facing 0 means error -90
        let out = f.step(&Pose::new(x, y, 0.0));
        assert_eq!(
            out,
            FollowerOutput::Drive(WheelCommand::rotate_left(6.28))
        );
        // Facing 180 means error +90, so rotate the other way
        let out = f.step(&Pose::new(x, y, 180.0));
        assert_eq!(
            out,
            FollowerOutput::Drive(WheelCommand::rotate_right(6.28))
        );
    }

    #[test]
    fn test_slow_turn_band_near_alignment() {
        let mut f = follower(&[(0, 0), (0, 1)]);
        let (x, y) = center(0, 0);
        let out = f.step(&Pose::new(x, y, 80.0)); // 10 deg short of 90
        assert_eq!(out, FollowerOutput::Drive(WheelCommand::rotate_left(1.0)));
    }

    #[test]
    fn test_drives_forward_when_aligned() {
        let mut f = follower(&[(0, 0), (0, 1)]);
        let (x, y) = center(0, 0);
        let out = f.step(&Pose::new(x, y, 90.5)); // within the 1 deg tolerance
        assert_eq!(out, FollowerOutput::Drive(WheelCommand::forward(6.28)));
    }

    #[test]
    fn test_cardinal_headings_all_directions() {
        let cases = [
            ((1, 1), (1, 2), 90.0),  // col+
            ((1, 1), (1, 0), 270.0), // col-
            ((1, 1), (0, 1), 180.0), // row-
            ((1, 1), (2, 1), 0.0),   // row+
        ];
        for ((cr, cc), (tr, tc), heading) in cases {
            let mut f = follower(&[(cr, cc), (tr, tc)]);
            let (x, y) = center(cr, cc);
            // Already aligned with the expected cardinal: must drive forward
            let out = f.step(&Pose::new(x, y, heading));
            assert_eq!(
                out,
                FollowerOutput::Drive(WheelCommand::forward(6.28)),
                "target ({tr},{tc}) from ({cr},{cc})"
            );
        }
    }

    #[test]
    fn test_creeps_to_center_inside_target_cell() {
        let mut f = follower(&[(0, 0), (0, 1)]);
        // Inside cell (0,1) but short of its center margin
        let out = f.step(&Pose::new(0.125, 0.30, 90.0));
        assert_eq!(out, FollowerOutput::Drive(WheelCommand::forward(1.0)));
        assert_eq!(f.remaining().len(), 2);
    }
}
