//! This module defines the error types used by the `rover-nav` crate.

use thiserror::Error;

/// Error type for navigation operations.
///
/// Planning-phase errors (`DegenerateLine`, `NoPathFound`) are terminal for a
/// run and must be surfaced before any actuation begins; per-period control
/// errors are avoided by construction rather than recovered at runtime.
#[derive(Debug, Error, PartialEq)]
pub enum NavError {
    /// The two points defining a reference line share the same x coordinate,
    /// so the line's slope is undefined. Callers must pick an alternate
    /// reference or fail the navigation attempt outright.
    #[error("degenerate reference line: {0}")]
    DegenerateLine(&'static str),

    /// The planner exhausted its frontier without reaching the goal. No path
    /// reconstruction is attempted; there is no replanning fallback.
    #[error("no path found: {0}")]
    NoPathFound(&'static str),

    /// A cell outside the grid dimensions was referenced. Checked defensively
    /// at the grid's neighbor query; never expected with a well-formed grid
    /// and path.
    #[error("grid access out of bounds: {0}")]
    OutOfBounds(&'static str),

    /// The grid file's text table is not a rectangular table of `0`/`1`
    /// values.
    #[error("malformed grid at line {line}: {reason}")]
    MalformedGrid {
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The grid file could not be read.
    #[error("grid file I/O: {0}")]
    Io(String),
}

impl From<std::io::Error> for NavError {
    fn from(e: std::io::Error) -> Self {
        NavError::Io(e.to_string())
    }
}
