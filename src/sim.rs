//! Kinematic simulator backing the [`RobotDevice`] trait.
//!
//! Integrates the differential-drive model at a fixed control period and
//! synthesizes proximity readings by ray-casting against the arena grid.
//! No dynamics, no slip: the simulator exists to exercise the controllers,
//! not to model physics.

use std::time::Duration;

use rover_kinematics::{DifferentialDrive, Pose, WheelCommand};
use rover_nav::{Grid, SensorFrame};
use spin_sleep::SpinSleeper;
use tracing::info;

use crate::config::AppConfig;
use crate::device::RobotDevice;

/// Angle of each proximity sensor relative to the travel direction, in
/// degrees. Index order matches `SensorFrame`: ps0 front-right around the
/// right side to ps7 front-left.
const SENSOR_OFFSETS_DEG: [f64; 8] = [
    -15.0, -45.0, -90.0, -150.0, 150.0, 90.0, 45.0, 15.0,
];

/// Ray-march step for obstacle probing, in meters.
const RAY_STEP: f64 = 0.01;

pub struct SimRobot {
    grid: Grid,
    drive: DifferentialDrive,
    pose: Pose,
    command: WheelCommand,
    dt: f64,
    steps_left: u64,
    sensor_range: f64,
    max_reading: f64,
    sleeper: Option<(SpinSleeper, Duration)>,
}

impl SimRobot {
    pub fn new(cfg: &AppConfig, grid: Grid) -> anyhow::Result<Self> {
        let drive = DifferentialDrive::new(cfg.robot.wheel_radius, cfg.robot.axle_length)?;
        let period = Duration::from_millis(cfg.run.period_ms);
        let sleeper = cfg
            .run
            .real_time
            .then(|| (SpinSleeper::default(), period));
        info!(
            %drive,
            period_ms = cfg.run.period_ms,
            real_time = cfg.run.real_time,
            "simulator ready"
        );
        Ok(Self {
            grid,
            drive,
            pose: Pose::new(cfg.run.start.x, cfg.run.start.y, cfg.run.start.heading),
            command: WheelCommand::stop(),
            dt: period.as_secs_f64(),
            steps_left: cfg.run.max_steps,
            sensor_range: cfg.sim.sensor_range,
            max_reading: cfg.sim.max_reading,
            sleeper,
        })
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Marches a ray out from the robot and reports a reading that grows as
    /// the first blocked cell gets closer, `0.0` if none is in range.
    fn ray_reading(&self, angle_deg: f64) -> f64 {
        let rad = angle_deg.to_radians();
        let (dx, dy) = (rad.cos(), rad.sin());
        let mut travelled = RAY_STEP;
        while travelled <= self.sensor_range {
            let cell = self
                .grid
                .world_to_cell(self.pose.x + travelled * dx, self.pose.y + travelled * dy);
            if !self.grid.is_free(cell) {
                return self.max_reading * (1.0 - travelled / self.sensor_range);
            }
            travelled += RAY_STEP;
        }
        0.0
    }
}

impl RobotDevice for SimRobot {
    fn step(&mut self) -> bool {
        if self.steps_left == 0 {
            info!("simulation step budget exhausted");
            return false;
        }
        self.steps_left -= 1;
        if let Some((sleeper, period)) = &self.sleeper {
            sleeper.sleep(*period);
        }
        // dt is fixed and non-negative by construction
        if let Ok(next) = self.drive.update_pose_from_command(self.pose, self.command, self.dt) {
            self.pose = next;
        }
        true
    }

    fn proximity(&self) -> SensorFrame {
        let mut readings = [0.0; 8];
        for (reading, offset) in readings.iter_mut().zip(SENSOR_OFFSETS_DEG) {
            *reading = self.ray_reading(self.pose.heading + offset);
        }
        SensorFrame(readings)
    }

    fn position(&self) -> [f64; 3] {
        [self.pose.x, self.pose.y, 0.0]
    }

    fn compass(&self) -> [f64; 3] {
        let rad = self.pose.heading.to_radians();
        [rad.sin(), rad.cos(), 0.0]
    }

    fn set_wheel_velocity(&mut self, command: WheelCommand) {
        self.command = command;
    }
}
