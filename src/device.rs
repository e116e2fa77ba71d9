use rover_kinematics::{Pose, WheelCommand};
use rover_nav::SensorFrame;

/// Hardware-facing surface of the robot. Everything the control loop needs
/// from a platform, real or simulated, passes through this trait so the
/// navigation code never touches the simulator directly.
pub trait RobotDevice {
    /// Advance the platform by one control period. Returns `false` when the
    /// platform has shut down and the loop should stop.
    fn step(&mut self) -> bool;

    /// Latest readings of the eight proximity sensors.
    fn proximity(&self) -> SensorFrame;

    /// World position as `[x, y, z]` in meters.
    fn position(&self) -> [f64; 3];

    /// Unit vector pointing at magnetic north in the robot frame.
    fn compass(&self) -> [f64; 3];

    /// Apply wheel velocities, held until the next call.
    fn set_wheel_velocity(&mut self, command: WheelCommand);
}

/// Converts a compass north vector into a heading in degrees on `[0, 360)`.
pub fn heading_from_compass(north: [f64; 3]) -> f64 {
    north[0].atan2(north[1]).to_degrees().rem_euclid(360.0)
}

/// Reads the device's position and compass into a planar pose.
pub fn pose_of<D: RobotDevice + ?Sized>(device: &D) -> Pose {
    let p = device.position();
    Pose::new(p[0], p[1], heading_from_compass(device.compass()))
}

#[cfg(test)]
pub mod scripted {
    use super::*;

    /// One tick of pre-recorded sensor data.
    #[derive(Debug, Clone, Copy)]
    pub struct ScriptedFrame {
        pub position: [f64; 3],
        pub compass: [f64; 3],
        pub proximity: SensorFrame,
    }

    impl ScriptedFrame {
        pub fn at(x: f64, y: f64, heading_deg: f64) -> Self {
            Self {
                position: [x, y, 0.0],
                compass: compass_for_heading(heading_deg),
                proximity: SensorFrame([0.0; 8]),
            }
        }

        pub fn with_proximity(mut self, readings: [f64; 8]) -> Self {
            self.proximity = SensorFrame(readings);
            self
        }
    }

    /// Builds the north vector a device would report at the given heading.
    pub fn compass_for_heading(heading_deg: f64) -> [f64; 3] {
        let rad = heading_deg.to_radians();
        [rad.sin(), rad.cos(), 0.0]
    }

    /// Test double that replays a fixed sensor script and records every
    /// wheel command the controller issues.
    pub struct ScriptedRobot {
        frames: Vec<ScriptedFrame>,
        index: usize,
        started: bool,
        pub commands: Vec<WheelCommand>,
    }

    impl ScriptedRobot {
        pub fn new(frames: Vec<ScriptedFrame>) -> Self {
            Self {
                frames,
                index: 0,
                started: false,
                commands: Vec::new(),
            }
        }

        fn current(&self) -> ScriptedFrame {
            self.frames[self.index]
        }
    }

    impl RobotDevice for ScriptedRobot {
        fn step(&mut self) -> bool {
            if !self.started {
                self.started = true;
                return !self.frames.is_empty();
            }
            if self.index + 1 < self.frames.len() {
                self.index += 1;
                true
            } else {
                false
            }
        }

        fn proximity(&self) -> SensorFrame {
            self.current().proximity
        }

        fn position(&self) -> [f64; 3] {
            self.current().position
        }

        fn compass(&self) -> [f64; 3] {
            self.current().compass
        }

        fn set_wheel_velocity(&mut self, command: WheelCommand) {
            self.commands.push(command);
        }
    }
}
