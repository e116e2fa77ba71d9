//! A* grid planner.
//!
//! Classic A* over 4-connected neighbors with uniform step cost 1 and the
//! Manhattan-distance heuristic, which is admissible and consistent on this
//! grid class, so the returned path cost is optimal. Which of several
//! equal-cost paths comes back depends on insertion order; callers must not
//! assume a unique cell sequence.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::error::NavError;
use crate::grid::{Cell, Grid};

/// Manhattan distance between two cells.
fn manhattan_distance(a: Cell, b: Cell) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

/// Frontier entry: estimated total cost, insertion sequence for tie-breaking,
/// the cell, and its g at push time for the stale check at pop.
#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f: i32,
    seq: u64,
    cell: Cell,
    g: i32,
}

// The priority queue depends on `Ord`. Flip the ordering on cost so the
// max-heap becomes a min-heap, breaking ties by insertion order.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct_path(came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Compute a minimal-cost cell sequence from `start` to `goal`.
///
/// The result starts at `start`, ends at `goal`, and every consecutive pair
/// is 4-adjacent with both cells free.
///
/// # Errors
///
/// * `NavError::OutOfBounds` if `start` or `goal` lies outside the grid.
/// * `NavError::NoPathFound` if either endpoint is blocked or no connected
///   free region joins them. No reconstruction is attempted in that case.
pub fn plan(grid: &Grid, start: Cell, goal: Cell) -> Result<Vec<Cell>, NavError> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return Err(NavError::OutOfBounds("start or goal outside the grid"));
    }
    if !grid.is_free(start) || !grid.is_free(goal) {
        return Err(NavError::NoPathFound("start or goal cell is blocked"));
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut g_score: HashMap<Cell, i32> = HashMap::new();
    let mut seq: u64 = 0;
    let mut expanded: u64 = 0;

    g_score.insert(start, 0);
    frontier.push(State {
        f: manhattan_distance(start, goal),
        seq,
        cell: start,
        g: 0,
    });

    while let Some(State { cell: current, g, .. }) = frontier.pop() {
        // Lazy deletion: skip entries superseded by a cheaper route.
        if g > *g_score.get(&current).unwrap_or(&i32::MAX) {
            continue;
        }

        if current == goal {
            let path = reconstruct_path(&came_from, current);
            debug!(
                cost = g,
                cells = path.len(),
                expanded,
                "planner reached the goal"
            );
            return Ok(path);
        }
        expanded += 1;

        for neighbor in grid.neighbors(current)? {
            let tentative_g = g + 1; // Cost between adjacent cells is 1
            if tentative_g < *g_score.get(&neighbor).unwrap_or(&i32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g);
                seq += 1;
                frontier.push(State {
                    f: tentative_g + manhattan_distance(neighbor, goal),
                    seq,
                    cell: neighbor,
                    g: tentative_g,
                });
            }
        }
    }

    debug!(expanded, "planner exhausted the frontier");
    Err(NavError::NoPathFound("goal unreachable from start"))
}
