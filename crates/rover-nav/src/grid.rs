//! Static occupancy grid loaded from a text table.
//!
//! The file format is one row per line, cells separated by commas, each cell
//! `0` (free) or `1` (blocked). Generators conventionally close the perimeter
//! with walls, but nothing here assumes that beyond treating `1` as
//! impassable.

use std::fmt;
use std::path::Path;

use crate::error::NavError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid cell edge length in world units: 4 cells per meter.
pub const DEFAULT_CELL_SIZE: f64 = 0.25;

/// A discrete grid coordinate (row, column).
///
/// Value equality; usable as a map key. The row axis runs along world x and
/// the column axis along world y.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index (world x axis).
    pub row: i32,
    /// Column index (world y axis).
    pub col: i32,
}

impl Cell {
    /// Construct a cell.
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Immutable rectangular occupancy field.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: f64,
    blocked: Vec<bool>,
}

impl Grid {
    /// Parse a grid from its text-table form.
    ///
    /// # Errors
    ///
    /// Returns `NavError::MalformedGrid` on an empty table, ragged rows, or a
    /// cell value outside `{0, 1}`.
    pub fn parse(text: &str, cell_size: f64) -> Result<Self, NavError> {
        let mut rows = 0usize;
        let mut cols = 0usize;
        let mut blocked = Vec::new();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut width = 0usize;
            for token in line.split(',') {
                match token.trim() {
                    "0" => blocked.push(false),
                    "1" => blocked.push(true),
                    _ => {
                        return Err(NavError::MalformedGrid {
                            line: i + 1,
                            reason: "cell value must be 0 or 1",
                        });
                    }
                }
                width += 1;
            }
            if rows == 0 {
                cols = width;
            } else if width != cols {
                return Err(NavError::MalformedGrid {
                    line: i + 1,
                    reason: "row width differs from the first row",
                });
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(NavError::MalformedGrid {
                line: 1,
                reason: "grid table is empty",
            });
        }

        Ok(Grid {
            rows,
            cols,
            cell_size,
            blocked,
        })
    }

    /// Load a grid from a file.
    ///
    /// # Errors
    ///
    /// `NavError::Io` on read failure, otherwise as [`Grid::parse`].
    pub fn load<P: AsRef<Path>>(path: P, cell_size: f64) -> Result<Self, NavError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, cell_size)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell edge length in world units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Whether `cell` lies within `[0, rows) x [0, cols)`.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && (cell.row as usize) < self.rows
            && cell.col >= 0
            && (cell.col as usize) < self.cols
    }

    /// Whether `cell` is in bounds and free.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.blocked[cell.row as usize * self.cols + cell.col as usize]
    }

    /// The free 4-connected neighbors of `cell`.
    ///
    /// # Errors
    ///
    /// Returns `NavError::OutOfBounds` if `cell` itself is outside the grid,
    /// which is a precondition violation with a well-formed grid and path.
    pub fn neighbors(&self, cell: Cell) -> Result<Vec<Cell>, NavError> {
        if !self.in_bounds(cell) {
            return Err(NavError::OutOfBounds(
                "neighbor query for a cell outside the grid",
            ));
        }
        // Up, Left, Right, Down
        const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        let mut result = Vec::with_capacity(4);
        for (dr, dc) in DIRECTIONS {
            let neighbor = Cell::new(cell.row + dr, cell.col + dc);
            if self.is_free(neighbor) {
                result.push(neighbor);
            }
        }
        Ok(result)
    }

    /// Map a continuous world position onto the cell containing it:
    /// `cell = floor(position / cell_size)` per axis.
    pub fn world_to_cell(&self, x: f64, y: f64) -> Cell {
        Cell::new(
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// World coordinates of the center of `cell`.
    pub fn cell_center(&self, cell: Cell) -> (f64, f64) {
        (
            (cell.row as f64 + 0.5) * self.cell_size,
            (cell.col as f64 + 0.5) * self.cell_size,
        )
    }
}
