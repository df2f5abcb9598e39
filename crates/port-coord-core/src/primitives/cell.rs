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

/// A sea-chart grid coordinate, row-major.
///
/// `Ord` is lexical `(row, col)`; the route search relies on this as a
/// deterministic tie-break between equal-cost frontier entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The up-to-eight neighbors of this cell inside a `rows x cols` grid.
    pub fn neighbors8(self, rows: usize, cols: usize) -> impl Iterator<Item = Cell> {
        const OFFSETS: [(i64, i64); 8] = [
            (0, 1),
            (1, 0),
            (0, -1),
            (-1, 0),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        let (r, c) = (self.row as i64, self.col as i64);
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let (nr, nc) = (r + dr, c + dc);
            if nr >= 0 && nc >= 0 && (nr as usize) < rows && (nc as usize) < cols {
                Some(Cell::new(nr as usize, nc as usize))
            } else {
                None
            }
        })
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_cell_has_eight_neighbors() {
        assert_eq!(Cell::new(1, 1).neighbors8(3, 3).count(), 8);
    }

    #[test]
    fn test_corner_cell_has_three_neighbors() {
        let n: Vec<Cell> = Cell::new(0, 0).neighbors8(3, 3).collect();
        assert_eq!(n.len(), 3);
        assert!(n.contains(&Cell::new(0, 1)));
        assert!(n.contains(&Cell::new(1, 0)));
        assert!(n.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        assert_eq!(Cell::new(0, 0).neighbors8(1, 1).count(), 0);
    }

    #[test]
    fn test_ord_is_row_major() {
        assert!(Cell::new(0, 9) < Cell::new(1, 0));
        assert!(Cell::new(2, 3) < Cell::new(2, 4));
    }
}
