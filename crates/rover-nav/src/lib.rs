//! Grid navigation for a differential-drive robot.
//!
//! Two strategies toward a fixed goal pose share this crate: an A* planner
//! ([`astar::plan`]) whose path a [`follower::PathFollower`] consumes
//! cell-by-cell, and the map-free [`bug2::Bug2`] reactive controller. The
//! [`grid::Grid`] occupancy field and the [`geometry`] helpers underneath are
//! common to both.

pub mod astar;
pub mod bug2;
pub mod error;
pub mod follower;
pub mod geometry;
pub mod grid;

pub use bug2::{Bug2, Bug2Params, Bug2State, SensorFrame};
pub use error::NavError;
pub use follower::{FollowerOutput, FollowerParams, PathFollower};
pub use geometry::Point;
pub use grid::{Cell, DEFAULT_CELL_SIZE, Grid};
