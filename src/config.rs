use config::{Config, ConfigError, File, FileFormat};
use rover_nav::{Bug2Params, FollowerParams, DEFAULT_CELL_SIZE};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Top-level application configuration, deserialized from `config/default.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub robot: RobotConfig,
    pub arena: ArenaConfig,
    pub run: RunConfig,
    #[serde(default)]
    pub follower: FollowerParams,
    #[serde(default)]
    pub bug2: Bug2Params,
    #[serde(default)]
    pub sim: SimConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RobotConfig {
    pub wheel_radius: f64,
    pub axle_length: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    pub grid_path: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunConfig {
    pub mode: Mode,
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    /// Pace the control loop in real time instead of running as fast as possible.
    #[serde(default)]
    pub real_time: bool,
    pub start: StartPose,
    pub goal: GoalPoint,
}

/// Which navigation strategy drives the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A* over the arena grid, then discrete waypoint following.
    Planner,
    /// Reactive Bug2 with proximity sensing only.
    Bug2,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub heading: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GoalPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum distance a proximity sensor can see, in meters.
    pub sensor_range: f64,
    /// Reading reported when an obstacle touches the sensor.
    pub max_reading: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sensor_range: 0.3,
            max_reading: 1000.0,
        }
    }
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_period_ms() -> u64 {
    64
}

fn default_max_steps() -> u64 {
    20_000
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .build()
        .and_then(Config::try_deserialize::<AppConfig>);

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let toml = r#"
            [robot]
            wheel_radius = 0.0205
            axle_length = 0.052

            [arena]
            grid_path = "maps/arena.csv"

            [run]
            mode = "planner"
            start = { x = 0.375, y = 0.375 }
            goal = { x = 2.625, y = 2.625 }
        "#;
        let cfg: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .unwrap();
        assert_eq!(cfg.run.mode, Mode::Planner);
        assert_eq!(cfg.run.period_ms, 64);
        assert_eq!(cfg.arena.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(cfg.run.start.heading, 0.0);
        assert_eq!(cfg.follower.max_speed, 6.28);
        assert_eq!(cfg.bug2.proximity_threshold, 100.0);
        assert_eq!(cfg.sim.max_reading, 1000.0);
    }

    #[test]
    fn overrides_take_precedence() {
        let toml = r#"
            [robot]
            wheel_radius = 0.0205
            axle_length = 0.052

            [arena]
            grid_path = "maps/arena.csv"
            cell_size = 0.5

            [run]
            mode = "bug2"
            period_ms = 32
            start = { x = 0.0, y = 0.0, heading = 90.0 }
            goal = { x = 1.0, y = 1.0 }

            [bug2]
            arrival_tolerance = 0.2
        "#;
        let cfg: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .unwrap();
        assert_eq!(cfg.run.mode, Mode::Bug2);
        assert_eq!(cfg.run.period_ms, 32);
        assert_eq!(cfg.arena.cell_size, 0.5);
        assert_eq!(cfg.run.start.heading, 90.0);
        assert_eq!(cfg.bug2.arrival_tolerance, 0.2);
        // untouched fields still come from Default
        assert_eq!(cfg.bug2.max_speed, 6.28);
    }
}
