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

use crate::problem::err::{DimensionMismatchError, EnvError, FractionOutOfRangeError};
use port_coord_core::prelude::{Cell, Hour};

/// Added hull resistance per Beaufort level 0..=6.
const BEAUFORT_RESISTANCE: [f64; 7] = [0.00, 0.06, 0.13, 0.20, 0.26, 0.33, 0.40];

/// Discrete wind intensities over the sea chart, row-major.
///
/// Levels above 6 are clamped to 6 at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindField {
    rows: usize,
    cols: usize,
    levels: Vec<u8>,
}

impl WindField {
    pub fn new(rows: usize, cols: usize, levels: Vec<u8>) -> Result<Self, EnvError> {
        if levels.len() != rows * cols {
            return Err(DimensionMismatchError::new(rows, cols, levels.len()).into());
        }
        let levels = levels.into_iter().map(|l| l.min(6)).collect();
        Ok(Self { rows, cols, levels })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn level(&self, cell: Cell) -> u8 {
        self.levels[cell.row * self.cols + cell.col]
    }
}

/// Per-cell traversal resistance derived from the wind field.
///
/// Built once, read-only afterwards. Entering a cell costs that cell's
/// resistance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl ResistanceGrid {
    pub fn from_wind(wind: &WindField) -> Self {
        let cells = wind
            .levels
            .iter()
            .map(|&l| BEAUFORT_RESISTANCE[l as usize])
            .collect();
        Self {
            rows: wind.rows,
            cols: wind.cols,
            cells,
        }
    }

    /// A grid with the same resistance in every cell. Negative values are
    /// clamped to zero, cells must carry non-negative cost.
    pub fn uniform(rows: usize, cols: usize, resistance: f64) -> Self {
        Self {
            rows,
            cols,
            cells: vec![resistance.max(0.0); rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    #[inline]
    pub fn cell(&self, cell: Cell) -> f64 {
        self.cells[cell.row * self.cols + cell.col]
    }
}

fn check_fractions(values: &[f64]) -> Result<(), EnvError> {
    for (i, &v) in values.iter().enumerate() {
        if !(0.0..=1.0).contains(&v) {
            return Err(FractionOutOfRangeError::new(i, v).into());
        }
    }
    Ok(())
}

/// Forecast photovoltaic output per hour, as a fraction of installed peak.
#[derive(Debug, Clone, PartialEq)]
pub struct PvForecast(Vec<f64>);

impl PvForecast {
    pub fn new(values: Vec<f64>) -> Result<Self, EnvError> {
        check_fractions(&values)?;
        Ok(Self(values))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn at(&self, hour: Hour) -> Option<f64> {
        usize::try_from(hour.value()).ok().and_then(|i| self.0.get(i)).copied()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

/// Forecast shore-side load per hour, as a fraction of the port base load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadForecast(Vec<f64>);

impl LoadForecast {
    pub fn new(values: Vec<f64>) -> Result<Self, EnvError> {
        check_fractions(&values)?;
        Ok(Self(values))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn at(&self, hour: Hour) -> Option<f64> {
        usize::try_from(hour.value()).ok().and_then(|i| self.0.get(i)).copied()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_field_rejects_bad_dimensions() {
        let err = WindField::new(2, 3, vec![0; 5]).unwrap_err();
        assert!(matches!(err, EnvError::DimensionMismatch(_)));
    }

    #[test]
    fn test_wind_levels_clamp_to_beaufort_table() {
        let wind = WindField::new(1, 3, vec![0, 6, 9]).unwrap();
        assert_eq!(wind.level(Cell::new(0, 2)), 6);
        let grid = ResistanceGrid::from_wind(&wind);
        assert_eq!(grid.cell(Cell::new(0, 0)), 0.00);
        assert_eq!(grid.cell(Cell::new(0, 1)), 0.40);
        assert_eq!(grid.cell(Cell::new(0, 2)), 0.40);
    }

    #[test]
    fn test_resistance_mapping_matches_scale() {
        let wind = WindField::new(1, 7, (0..7).collect()).unwrap();
        let grid = ResistanceGrid::from_wind(&wind);
        let got: Vec<f64> = (0..7).map(|c| grid.cell(Cell::new(0, c))).collect();
        assert_eq!(got, vec![0.00, 0.06, 0.13, 0.20, 0.26, 0.33, 0.40]);
    }

    #[test]
    fn test_uniform_grid() {
        let grid = ResistanceGrid::uniform(4, 5, 0.2);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.cell(Cell::new(3, 4)), 0.2);
        assert!(grid.contains(Cell::new(3, 4)));
        assert!(!grid.contains(Cell::new(4, 0)));
    }

    #[test]
    fn test_forecast_rejects_out_of_range() {
        let err = PvForecast::new(vec![0.0, 1.2]).unwrap_err();
        assert!(matches!(err, EnvError::FractionOutOfRange(_)));
    }

    #[test]
    fn test_forecast_lookup_by_hour() {
        let pv = PvForecast::new(vec![0.0, 0.5, 1.0]).unwrap();
        assert_eq!(pv.at(Hour::new(1)), Some(0.5));
        assert_eq!(pv.at(Hour::new(3)), None);
        assert_eq!(pv.at(Hour::new(-1)), None);
    }
}
