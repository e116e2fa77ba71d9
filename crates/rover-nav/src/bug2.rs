//! Bug2 reactive controller.
//!
//! A finite-state machine that alternates between driving toward the goal
//! along the start-goal line and following an obstacle boundary until the
//! line is reacquired. It never consults the grid; everything it knows comes
//! from the proximity ring and the pose. As with the whole Bug family, there
//! is no guarantee of reaching the goal if the obstacle boundary never
//! re-intersects the start-goal line.

use rover_kinematics::{Pose, WheelCommand};
use tracing::{debug, info};

use crate::geometry::{self, FORWARD_AXIS_OFFSET, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One period's worth of proximity readings, ordered by the e-puck sensor
/// ring: ps0 front-right, ps1/ps2 right, ps3/ps4 rear, ps5/ps6 left,
/// ps7 front-left. Never mutated after capture within a period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorFrame(pub [f64; 8]);

impl SensorFrame {
    /// Front-right sensor (ps0).
    pub fn front_right(&self) -> f64 {
        self.0[0]
    }

    /// Front-left sensor (ps7).
    pub fn front_left(&self) -> f64 {
        self.0[7]
    }

    /// Right side sensor (ps2), the one expected to track the boundary.
    pub fn right_side(&self) -> f64 {
        self.0[2]
    }

    /// Strongest of the right-front pair (ps0, ps1).
    pub fn right_front_max(&self) -> f64 {
        self.0[0].max(self.0[1])
    }

    /// Strongest of the left-front pair (ps5, ps6).
    pub fn left_front_max(&self) -> f64 {
        self.0[5].max(self.0[6])
    }
}

/// Tuning parameters for the Bug2 controller.
///
/// Empirically tuned against the generated arenas; no claim is made that
/// they generalize to other obstacle geometry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bug2Params {
    /// Full wheel speed (rad/s); most maneuvers run at half of it.
    pub max_speed: f64,
    /// Distance to the goal (world units) counted as arrival.
    pub arrival_tolerance: f64,
    /// Proximity reading above which an obstacle is considered detected.
    pub proximity_threshold: f64,
    /// Heading band (deg) around the line heading inside which no steering
    /// correction is applied, to avoid chatter.
    pub angle_tolerance: f64,
    /// `on_line` tolerance (world units) while moving toward the goal.
    pub line_tolerance: f64,
    /// Relative band (fraction) for the initial goal alignment test.
    pub alignment_ratio: f64,
}

impl Default for Bug2Params {
    fn default() -> Self {
        Bug2Params {
            max_speed: 6.28,
            arrival_tolerance: 0.07,
            proximity_threshold: 100.0,
            angle_tolerance: 0.05,
            line_tolerance: 0.02,
            alignment_ratio: 0.02,
        }
    }
}

/// Bug2 controller state. A closed set of variants; the reference line and
/// hit point travel with the states that need them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bug2State {
    /// Rotating in place until the heading points at the goal.
    Init,
    /// Driving toward the goal along the line from `line_start`.
    MoveToGoal {
        /// Where the current reference line was seeded.
        line_start: Point,
    },
    /// Hugging an obstacle boundary until the reference line is reacquired.
    FollowObstacle {
        /// Reference line origin at the moment of contact.
        line_start: Point,
        /// Pose at first obstacle contact; guards against re-exiting at the
        /// same edge.
        hit_point: Point,
    },
    /// Terminal; motors are commanded to zero.
    Done,
}

/// Per-run Bug2 context: goal, parameters, and the state machine.
#[derive(Debug, Clone)]
pub struct Bug2 {
    goal: Point,
    params: Bug2Params,
    state: Bug2State,
}

impl Bug2 {
    /// Build a controller for one navigation attempt toward `goal`.
    pub fn new(goal: Point, params: Bug2Params) -> Self {
        Bug2 {
            goal,
            params,
            state: Bug2State::Init,
        }
    }

    /// Current state.
    pub fn state(&self) -> &Bug2State {
        &self.state
    }

    /// Whether the terminal state has been reached.
    pub fn is_done(&self) -> bool {
        matches!(self.state, Bug2State::Done)
    }

    /// One control period. Returns the wheel command for this period, or
    /// `None` when a line-reacquisition transition deliberately skips
    /// actuation so no spurious command precedes the new policy.
    pub fn step(&mut self, pose: &Pose, frame: &SensorFrame) -> Option<WheelCommand> {
        let position = Point::new(pose.x, pose.y);
        // Bearings carry the forward-sensor-axis offset; shift the compass
        // heading into the same frame before comparing.
        let heading = Pose::normalize_heading(pose.heading + FORWARD_AXIS_OFFSET);
        let p = self.params;
        let half = 0.5 * p.max_speed;

        match self.state {
            Bug2State::Init => {
                let goal_bearing = geometry::bearing(position, self.goal);
                let aligned = goal_bearing > (1.0 - p.alignment_ratio) * heading
                    && goal_bearing < (1.0 + p.alignment_ratio) * heading;
                if !aligned {
                    debug!(goal_bearing, heading, "aligning with the goal");
                    Some(WheelCommand::rotate_left(half))
                } else {
                    info!(line_start = ?position, "aligned with the goal, moving out");
                    self.state = Bug2State::MoveToGoal {
                        line_start: position,
                    };
                    Some(WheelCommand::forward(half))
                }
            }

            Bug2State::MoveToGoal { line_start } => {
                // Checked in priority order: contact, arrival, line drift.
                let obstacle = frame.front_right() > p.proximity_threshold
                    && frame.front_left() > p.proximity_threshold;
                if obstacle {
                    info!(hit_point = ?position, "obstacle contact, following its boundary");
                    self.state = Bug2State::FollowObstacle {
                        line_start,
                        hit_point: position,
                    };
                    return Some(WheelCommand::forward(half));
                }

                if geometry::distance(position, self.goal) <= p.arrival_tolerance {
                    info!("goal reached");
                    self.state = Bug2State::Done;
                    return Some(WheelCommand::stop());
                }

                if !geometry::on_line(position, line_start, self.goal, p.line_tolerance) {
                    let line_heading = geometry::bearing(line_start, self.goal);
                    let drift = Pose::heading_error(heading, line_heading);
                    debug!(drift, "off the reference line, steering back");
                    if drift > p.angle_tolerance {
                        return Some(WheelCommand::new(half, 0.1 * p.max_speed));
                    } else if drift < -p.angle_tolerance {
                        return Some(WheelCommand::new(0.1 * p.max_speed, half));
                    }
                }

                Some(WheelCommand::forward(half))
            }

            Bug2State::FollowObstacle {
                line_start,
                hit_point,
            } => {
                let back_on_line =
                    geometry::on_line(position, line_start, self.goal, p.arrival_tolerance);
                let clear_of_hit = geometry::distance(position, hit_point)
                    > 1.5 * p.arrival_tolerance;
                if back_on_line && clear_of_hit {
                    info!(line_start = ?position, "reference line reacquired, goal reachable");
                    self.state = Bug2State::MoveToGoal {
                        line_start: position,
                    };
                    // Skip actuation this period; the new policy takes over
                    // on the next one.
                    return None;
                }

                if frame.right_side() <= p.proximity_threshold {
                    // Lost the boundary: turn toward the obstacle.
                    return Some(WheelCommand::rotate_left(half));
                }
                let right = frame.right_front_max();
                let left = frame.left_front_max();
                if right > 2.0 * p.proximity_threshold {
                    // Too close ahead on the tracking side: steer away.
                    Some(WheelCommand::new(0.2 * p.max_speed, half))
                } else if right < p.proximity_threshold && left < p.proximity_threshold {
                    // Contact fading: steer back toward the boundary.
                    Some(WheelCommand::new(half, 0.2 * p.max_speed))
                } else {
                    Some(WheelCommand::forward(half))
                }
            }

            Bug2State::Done => Some(WheelCommand::stop()),
        }
    }
}
