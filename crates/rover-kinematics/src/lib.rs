#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D differential-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides the pose and wheel-command types shared by the"]
#![doc = "navigation stack, a drive abstraction mapping motion intents onto wheel"]
#![doc = "velocities, and forward/inverse kinematics for pose integration."]

use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A 2-D pose `(x, y, heading)` in meters and degrees.
///
/// The heading is measured counter-clockwise in the world frame and kept
/// normalized to `[0, 360)`, the convention the grid controllers compare
/// cardinal targets (0°/90°/180°/270°) against.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World-frame x position (m).
    pub x: f64,
    /// World-frame y position (m).
    pub y: f64,
    /// Heading (deg), normalized to `[0, 360)`.
    pub heading: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `heading`: Heading in degrees.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose {
            x,
            y,
            heading: Self::normalize_heading(heading),
        }
    }

    /// Normalize an angle in degrees to `[0, 360)`.
    pub fn normalize_heading(angle: f64) -> f64 {
        angle.rem_euclid(360.0)
    }

    /// Signed difference `a - b` between two headings in degrees,
    /// normalized to `[-180, 180)`.
    ///
    /// Negative means `a` lies clockwise of `b`.
    pub fn heading_error(a: f64, b: f64) -> f64 {
        let mut d = (a - b).rem_euclid(360.0);
        if d >= 180.0 {
            d -= 360.0;
        }
        d
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.1}°)", self.x, self.y, self.heading)
    }
}

/// A pair of signed wheel angular velocities (rad/s), the sole output of a
/// control period. Consumed immediately by the actuators, never persisted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    /// Left wheel angular velocity (rad/s).
    pub left: f64,
    /// Right wheel angular velocity (rad/s).
    pub right: f64,
}

impl WheelCommand {
    /// Construct a wheel command from raw left/right velocities.
    pub const fn new(left: f64, right: f64) -> Self {
        WheelCommand { left, right }
    }

    /// Both wheels stopped.
    pub const fn stop() -> Self {
        WheelCommand::new(0.0, 0.0)
    }

    /// Both wheels forward at `speed`.
    pub const fn forward(speed: f64) -> Self {
        WheelCommand::new(speed, speed)
    }

    /// Rotate in place, counter-clockwise.
    pub const fn rotate_left(speed: f64) -> Self {
        WheelCommand::new(-speed, speed)
    }

    /// Rotate in place, clockwise.
    pub const fn rotate_right(speed: f64) -> Self {
        WheelCommand::new(speed, -speed)
    }
}

impl fmt::Display for WheelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ωL: {:.2} rad/s, ωR: {:.2} rad/s)", self.left, self.right)
    }
}

/// Direction of an in-place rotation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

/// A motion intent for one control period.
///
/// The drive abstraction is a pure mapping from intent to [`WheelCommand`];
/// it carries no internal state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveIntent {
    /// Rotate in place.
    Rotate {
        /// Which way to rotate.
        direction: TurnDirection,
        /// Wheel speed magnitude (rad/s).
        speed: f64,
    },
    /// Drive straight ahead.
    Forward {
        /// Wheel speed (rad/s).
        speed: f64,
    },
    /// Command both wheels to zero velocity.
    Stop,
}

impl DriveIntent {
    /// Map the intent onto left/right wheel velocities.
    ///
    /// Rotate-left → `(-s, +s)`, rotate-right → `(+s, -s)`,
    /// forward → `(s, s)`, stop → `(0, 0)`.
    pub const fn command(self) -> WheelCommand {
        match self {
            DriveIntent::Rotate {
                direction: TurnDirection::Left,
                speed,
            } => WheelCommand::rotate_left(speed),
            DriveIntent::Rotate {
                direction: TurnDirection::Right,
                speed,
            } => WheelCommand::rotate_right(speed),
            DriveIntent::Forward { speed } => WheelCommand::forward(speed),
            DriveIntent::Stop => WheelCommand::stop(),
        }
    }
}

/// Linear and angular chassis velocities.
/// These represent the overall motion of the robot's chassis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (m/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential-drive kinematics helper.
///
/// Encapsulates the physical parameters of a differential-drive robot
/// (wheel radius and axle length) and provides methods for kinematic
/// calculations and pose integration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Axle length (m).
    axle_length: f64,
}

impl DifferentialDrive {
    /// Construct a new differential-drive kinematics helper.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelRadius)` if `wheel_radius` is not positive.
    /// Returns `Err(KinematicsError::InvalidAxleLength)` if `axle_length` is not positive.
    pub const fn new(wheel_radius: f64, axle_length: f64) -> Result<Self, KinematicsError> {
        if wheel_radius <= 0.0 {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        if axle_length <= 0.0 {
            return Err(KinematicsError::InvalidAxleLength("must be positive"));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            axle_length,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the axle length.
    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Calculates the robot's chassis speeds (linear and angular velocity)
    /// from a wheel command. This is the forward kinematics problem.
    pub fn forward_kinematics(&self, command: WheelCommand) -> ChassisSpeeds {
        let v_l = command.left * self.wheel_radius;
        let v_r = command.right * self.wheel_radius;

        let v = (v_r + v_l) / 2.0;
        let omega = (v_r - v_l) / self.axle_length;

        ChassisSpeeds::new(v, omega)
    }

    /// Calculates the wheel command required to achieve the given chassis
    /// speeds. This is the inverse kinematics problem.
    pub fn inverse_kinematics(&self, chassis_speeds: ChassisSpeeds) -> WheelCommand {
        let v_r = chassis_speeds.v + chassis_speeds.omega * (self.axle_length / 2.0);
        let v_l = chassis_speeds.v - chassis_speeds.omega * (self.axle_length / 2.0);

        WheelCommand::new(v_l / self.wheel_radius, v_r / self.wheel_radius)
    }

    /// Updates the robot's pose given its current pose, chassis speeds, and time delta.
    ///
    /// Integrates the chassis speeds over `dt` assuming they are constant over
    /// the interval. The final heading is normalized to `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let heading_rad = current_pose.heading.to_radians();
        let delta_x = chassis_speeds.v * cos(heading_rad) * dt;
        let delta_y = chassis_speeds.v * sin(heading_rad) * dt;
        let delta_heading = (chassis_speeds.omega * dt).to_degrees();

        Ok(Pose {
            x: current_pose.x + delta_x,
            y: current_pose.y + delta_y,
            heading: Pose::normalize_heading(current_pose.heading + delta_heading),
        })
    }

    /// Convenience function to update pose directly from a wheel command and dt.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative
    /// (propagated from `update_pose`).
    pub fn update_pose_from_command(
        &self,
        current_pose: Pose,
        command: WheelCommand,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        let chassis_speeds = self.forward_kinematics(command);
        self.update_pose(current_pose, chassis_speeds, dt)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DifferentialDrive (r: {:.2} m, L: {:.2} m)",
            self.wheel_radius, self.axle_length
        )
    }
}
