// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use port_coord_core::prelude::Cell;
use port_coord_model::prelude::ResistanceGrid;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Resistance assumed for cruise hours no route information covers.
pub const DEFAULT_RESISTANCE: f64 = 0.2;

/// Accumulated resistance as a totally ordered heap key.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedCost(f64);

impl Eq for OrderedCost {}

impl PartialOrd for OrderedCost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Least-resistance path between two chart cells.
///
/// An unreachable goal yields an empty path with infinite cost; callers
/// continue with the default resistance profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    path: Vec<Cell>,
    total_cost: f64,
}

impl RouteResult {
    #[inline]
    fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            total_cost: f64::INFINITY,
        }
    }

    #[inline]
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    #[inline]
    pub fn is_unreachable(&self) -> bool {
        self.path.is_empty()
    }

    /// Mean resistance per cruise hour, sampled along the route in `hours`
    /// contiguous chunks. Without a route every hour gets the default.
    pub fn resistance_profile(&self, grid: &ResistanceGrid, hours: usize) -> Vec<f64> {
        if hours == 0 {
            return Vec::new();
        }
        if self.path.is_empty() {
            return vec![DEFAULT_RESISTANCE; hours];
        }

        let chunk = self.path.len().div_ceil(hours);
        let mut profile = Vec::with_capacity(hours);
        for cells in self.path.chunks(chunk) {
            let mean = cells.iter().map(|&c| grid.cell(c)).sum::<f64>() / cells.len() as f64;
            profile.push(mean);
        }
        // A short path fills fewer chunks than hours; repeat the tail.
        let tail = *profile.last().unwrap_or(&DEFAULT_RESISTANCE);
        profile.resize(hours, tail);
        profile
    }
}

/// 8-directional uniform-cost search over the resistance grid.
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner;

impl RoutePlanner {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Entering a cell costs that cell's resistance; the start cell is free.
    /// Equal accumulated costs break ties by `(row, col)` order, so the
    /// result is deterministic across runs.
    pub fn find_route(&self, grid: &ResistanceGrid, start: Cell, goal: Cell) -> RouteResult {
        if !grid.contains(start) || !grid.contains(goal) {
            return RouteResult::unreachable();
        }

        let (rows, cols) = (grid.rows(), grid.cols());
        let idx = |c: Cell| c.row * cols + c.col;

        let mut dist = vec![f64::INFINITY; rows * cols];
        let mut prev: Vec<Option<Cell>> = vec![None; rows * cols];
        let mut heap = BinaryHeap::new();

        dist[idx(start)] = 0.0;
        heap.push(Reverse((OrderedCost(0.0), start)));

        while let Some(Reverse((OrderedCost(cost), cell))) = heap.pop() {
            if cell == goal {
                break;
            }
            if cost > dist[idx(cell)] {
                continue; // stale entry
            }
            for neighbor in cell.neighbors8(rows, cols) {
                let next = cost + grid.cell(neighbor);
                if next < dist[idx(neighbor)] {
                    dist[idx(neighbor)] = next;
                    prev[idx(neighbor)] = Some(cell);
                    heap.push(Reverse((OrderedCost(next), neighbor)));
                }
            }
        }

        if dist[idx(goal)].is_infinite() {
            return RouteResult::unreachable();
        }

        let mut path = vec![goal];
        let mut current = goal;
        while let Some(p) = prev[idx(current)] {
            path.push(p);
            current = p;
        }
        path.reverse();

        RouteResult {
            path,
            total_cost: dist[idx(goal)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use port_coord_model::prelude::{ResistanceGrid, WindField};

    /// Cost of a hand-built path under the search's cost model.
    fn path_cost(grid: &ResistanceGrid, path: &[Cell]) -> f64 {
        path.iter().skip(1).map(|&c| grid.cell(c)).sum()
    }

    #[test]
    fn test_uniform_grid_takes_diagonal() {
        let grid = ResistanceGrid::uniform(10, 10, 0.1);
        let route = RoutePlanner::new().find_route(&grid, Cell::new(0, 0), Cell::new(9, 9));
        assert!(!route.is_unreachable());
        // Nine diagonal steps at 0.1 each.
        assert!((route.total_cost() - 0.9).abs() < 1e-9);
        assert_eq!(route.path().len(), 10);
        assert_eq!(route.path().first(), Some(&Cell::new(0, 0)));
        assert_eq!(route.path().last(), Some(&Cell::new(9, 9)));
    }

    #[test]
    fn test_route_avoids_high_resistance_ridge() {
        // Column 1 is stormy except the top row.
        let levels = vec![
            0, 0, 0, //
            0, 6, 0, //
            0, 6, 0, //
        ];
        let wind = WindField::new(3, 3, levels).unwrap();
        let grid = ResistanceGrid::from_wind(&wind);
        let route = RoutePlanner::new().find_route(&grid, Cell::new(2, 0), Cell::new(2, 2));

        // Through the ridge: one 0.40 cell. Around the top: all calm cells.
        let through = path_cost(&grid, &[Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)]);
        assert!(route.total_cost() < through);
        assert!(!route.path().contains(&Cell::new(2, 1)));
        assert!(!route.path().contains(&Cell::new(1, 1)));
    }

    #[test]
    fn test_found_cost_is_no_worse_than_manual_alternatives() {
        let levels = vec![
            1, 3, 0, 2, //
            2, 6, 6, 1, //
            0, 1, 2, 0, //
        ];
        let wind = WindField::new(3, 4, levels).unwrap();
        let grid = ResistanceGrid::from_wind(&wind);
        let start = Cell::new(0, 0);
        let goal = Cell::new(2, 3);
        let route = RoutePlanner::new().find_route(&grid, start, goal);

        let alternatives = [
            vec![start, Cell::new(1, 0), Cell::new(2, 1), Cell::new(2, 2), goal],
            vec![start, Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 3), goal],
            vec![start, Cell::new(1, 1), Cell::new(2, 2), goal],
        ];
        for alt in &alternatives {
            assert!(route.total_cost() <= path_cost(&grid, alt) + 1e-12);
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = ResistanceGrid::uniform(4, 4, 0.3);
        let route = RoutePlanner::new().find_route(&grid, Cell::new(2, 2), Cell::new(2, 2));
        assert_eq!(route.path(), &[Cell::new(2, 2)]);
        assert_eq!(route.total_cost(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_goal_is_unreachable() {
        let grid = ResistanceGrid::uniform(4, 4, 0.1);
        let route = RoutePlanner::new().find_route(&grid, Cell::new(0, 0), Cell::new(9, 9));
        assert!(route.is_unreachable());
        assert!(route.total_cost().is_infinite());
        assert!(route.path().is_empty());
    }

    #[test]
    fn test_unreachable_profile_uses_default() {
        let grid = ResistanceGrid::uniform(4, 4, 0.1);
        let route = RouteResult::unreachable();
        assert_eq!(route.resistance_profile(&grid, 3), vec![DEFAULT_RESISTANCE; 3]);
    }

    #[test]
    fn test_profile_means_follow_route() {
        let grid = ResistanceGrid::uniform(10, 10, 0.25);
        let route = RoutePlanner::new().find_route(&grid, Cell::new(0, 0), Cell::new(9, 9));
        let profile = route.resistance_profile(&grid, 4);
        assert_eq!(profile.len(), 4);
        for f in profile {
            assert!((f - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_under_cost_ties() {
        let grid = ResistanceGrid::uniform(6, 6, 0.2);
        let planner = RoutePlanner::new();
        let a = planner.find_route(&grid, Cell::new(0, 0), Cell::new(5, 5));
        let b = planner.find_route(&grid, Cell::new(0, 0), Cell::new(5, 5));
        assert_eq!(a, b);
    }
}
