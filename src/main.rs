mod config;
mod device;
mod sim;

use anyhow::Context;
use rover_kinematics::WheelCommand;
use rover_nav::{
    astar, geometry, Bug2, Bug2Params, FollowerOutput, FollowerParams, Grid, PathFollower, Point,
};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

use crate::config::Mode;
use crate::device::RobotDevice;
use crate::sim::SimRobot;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cfg = crate::config::load_config()?;
    let grid = Grid::load(&cfg.arena.grid_path, cfg.arena.cell_size)
        .with_context(|| format!("loading arena grid from {}", cfg.arena.grid_path))?;
    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        cell_size = grid.cell_size(),
        "arena grid loaded"
    );

    let mut robot = SimRobot::new(&cfg, grid.clone())?;
    match cfg.run.mode {
        Mode::Planner => run_planner(
            &mut robot,
            &grid,
            (cfg.run.start.x, cfg.run.start.y),
            (cfg.run.goal.x, cfg.run.goal.y),
            cfg.follower,
        ),
        Mode::Bug2 => run_bug2(
            &mut robot,
            Point::new(cfg.run.start.x, cfg.run.start.y),
            Point::new(cfg.run.goal.x, cfg.run.goal.y),
            cfg.bug2,
        ),
    }
}

/// Plans a grid path with A*, then follows it waypoint by waypoint until the
/// follower reports arrival or the device shuts down.
fn run_planner<D: RobotDevice>(
    robot: &mut D,
    grid: &Grid,
    start: (f64, f64),
    goal: (f64, f64),
    params: FollowerParams,
) -> anyhow::Result<()> {
    let start_cell = grid.world_to_cell(start.0, start.1);
    let goal_cell = grid.world_to_cell(goal.0, goal.1);
    let path = astar::plan(grid, start_cell, goal_cell)?;
    info!(cells = path.len(), %start_cell, %goal_cell, "path planned");

    let mut follower = PathFollower::new(path, grid.cell_size(), params);
    while robot.step() {
        let pose = device::pose_of(robot);
        match follower.step(&pose) {
            FollowerOutput::Drive(command) => robot.set_wheel_velocity(command),
            FollowerOutput::GoalReached => {
                robot.set_wheel_velocity(WheelCommand::stop());
                info!(x = pose.x, y = pose.y, "goal reached");
                return Ok(());
            }
        }
    }
    warn!("device stopped before the goal was reached");
    Ok(())
}

/// Runs the reactive Bug2 controller until it reports arrival or the device
/// shuts down. The start-goal line is validated before the first actuation.
fn run_bug2<D: RobotDevice>(
    robot: &mut D,
    start: Point,
    goal: Point,
    params: Bug2Params,
) -> anyhow::Result<()> {
    // Surfaces a vertical start-goal line as a configuration error up front
    // instead of mid-run.
    geometry::line_params(start, goal).context("start-goal line is not followable")?;

    let mut controller = Bug2::new(goal, params);
    while robot.step() {
        let pose = device::pose_of(robot);
        let frame = robot.proximity();
        if let Some(command) = controller.step(&pose, &frame) {
            robot.set_wheel_velocity(command);
        }
        if controller.is_done() {
            info!(x = pose.x, y = pose.y, "goal reached");
            return Ok(());
        }
    }
    warn!("device stopped before the goal was reached");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::scripted::{ScriptedFrame, ScriptedRobot};

    #[test]
    fn planner_stops_the_robot_on_arrival() {
        // Two free cells in one row; the robot is already at the center of
        // the target cell, so the first tick reports arrival.
        let grid = Grid::parse("0,0", 0.25).unwrap();
        let mut robot = ScriptedRobot::new(vec![ScriptedFrame::at(0.125, 0.375, 90.0)]);
        run_planner(
            &mut robot,
            &grid,
            (0.125, 0.125),
            (0.125, 0.375),
            FollowerParams::default(),
        )
        .unwrap();
        assert_eq!(robot.commands.last(), Some(&WheelCommand::stop()));
    }

    #[test]
    fn planner_drives_toward_the_next_cell() {
        let grid = Grid::parse("0,0", 0.25).unwrap();
        // Centered in the start cell, already facing the target cell (+y).
        let mut robot = ScriptedRobot::new(vec![ScriptedFrame::at(0.125, 0.125, 90.0)]);
        run_planner(
            &mut robot,
            &grid,
            (0.125, 0.125),
            (0.125, 0.375),
            FollowerParams::default(),
        )
        .unwrap();
        let params = FollowerParams::default();
        assert_eq!(
            robot.commands.first(),
            Some(&WheelCommand::forward(params.max_speed))
        );
    }

    #[test]
    fn planner_surfaces_unreachable_goals() {
        let grid = Grid::parse("0,1,0", 0.25).unwrap();
        let mut robot = ScriptedRobot::new(vec![ScriptedFrame::at(0.125, 0.125, 0.0)]);
        let result = run_planner(
            &mut robot,
            &grid,
            (0.125, 0.125),
            (0.125, 0.625),
            FollowerParams::default(),
        );
        assert!(result.is_err());
        assert!(robot.commands.is_empty(), "no actuation before planning");
    }

    #[test]
    fn bug2_rejects_a_vertical_start_goal_line() {
        let mut robot = ScriptedRobot::new(vec![]);
        let result = run_bug2(
            &mut robot,
            Point::new(1.0, 0.0),
            Point::new(1.0, 2.0),
            Bug2Params::default(),
        );
        assert!(result.is_err());
        assert!(robot.commands.is_empty());
    }

    #[test]
    fn bug2_rotates_to_align_before_moving_out() {
        // Facing away from the goal: the controller must rotate in place.
        let mut robot = ScriptedRobot::new(vec![ScriptedFrame::at(0.0, 0.0, 180.0)]);
        run_bug2(
            &mut robot,
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Bug2Params::default(),
        )
        .unwrap();
        let params = Bug2Params::default();
        assert_eq!(
            robot.commands.first(),
            Some(&WheelCommand::rotate_left(0.5 * params.max_speed))
        );
    }
}
