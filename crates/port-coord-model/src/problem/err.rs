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

use port_coord_core::prelude::Hour;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonPositiveValueError {
    what: &'static str,
    value: f64,
}

impl NonPositiveValueError {
    pub fn new(what: &'static str, value: f64) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for NonPositiveValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must be positive, got {}", self.what, self.value)
    }
}

impl std::error::Error for NonPositiveValueError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidBoundsError {
    what: &'static str,
    lower: f64,
    upper: f64,
}

impl InvalidBoundsError {
    pub fn new(what: &'static str, lower: f64, upper: f64) -> Self {
        Self { what, lower, upper }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl std::fmt::Display for InvalidBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} bounds: lower {} exceeds upper {} (or negative)",
            self.what, self.lower, self.upper
        )
    }
}

impl std::error::Error for InvalidBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidFractionError {
    what: &'static str,
    value: f64,
}

impl InvalidFractionError {
    pub fn new(what: &'static str, value: f64) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for InvalidFractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must lie in the unit interval, got {}", self.what, self.value)
    }
}

impl std::error::Error for InvalidFractionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidArrivalWindowError {
    earliest: Hour,
    latest: Hour,
}

impl InvalidArrivalWindowError {
    pub fn new(earliest: Hour, latest: Hour) -> Self {
        Self { earliest, latest }
    }

    pub fn earliest(&self) -> Hour {
        self.earliest
    }

    pub fn latest(&self) -> Hour {
        self.latest
    }
}

impl std::fmt::Display for InvalidArrivalWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "arrival window is empty: earliest {} after latest {}",
            self.earliest, self.latest
        )
    }
}

impl std::error::Error for InvalidArrivalWindowError {}

#[derive(Debug, Clone, PartialEq)]
pub enum VesselProfileError {
    NonPositiveValue(NonPositiveValueError),
    InvalidBounds(InvalidBoundsError),
    InvalidFraction(InvalidFractionError),
    InvalidArrivalWindow(InvalidArrivalWindowError),
}

impl std::fmt::Display for VesselProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VesselProfileError::NonPositiveValue(e) => write!(f, "{}", e),
            VesselProfileError::InvalidBounds(e) => write!(f, "{}", e),
            VesselProfileError::InvalidFraction(e) => write!(f, "{}", e),
            VesselProfileError::InvalidArrivalWindow(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VesselProfileError {}

impl From<NonPositiveValueError> for VesselProfileError {
    fn from(err: NonPositiveValueError) -> Self {
        VesselProfileError::NonPositiveValue(err)
    }
}

impl From<InvalidBoundsError> for VesselProfileError {
    fn from(err: InvalidBoundsError) -> Self {
        VesselProfileError::InvalidBounds(err)
    }
}

impl From<InvalidFractionError> for VesselProfileError {
    fn from(err: InvalidFractionError) -> Self {
        VesselProfileError::InvalidFraction(err)
    }
}

impl From<InvalidArrivalWindowError> for VesselProfileError {
    fn from(err: InvalidArrivalWindowError) -> Self {
        VesselProfileError::InvalidArrivalWindow(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoBerthsError;

impl std::fmt::Display for NoBerthsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The port has no berths.")
    }
}

impl std::error::Error for NoBerthsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyHorizonError;

impl std::fmt::Display for EmptyHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "The planning horizon is empty.")
    }
}

impl std::error::Error for EmptyHorizonError {}

#[derive(Debug, Clone, PartialEq)]
pub enum PortProfileError {
    NoBerths(NoBerthsError),
    EmptyHorizon(EmptyHorizonError),
    NonPositiveValue(NonPositiveValueError),
    InvalidBounds(InvalidBoundsError),
    InvalidFraction(InvalidFractionError),
}

impl std::fmt::Display for PortProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortProfileError::NoBerths(e) => write!(f, "{}", e),
            PortProfileError::EmptyHorizon(e) => write!(f, "{}", e),
            PortProfileError::NonPositiveValue(e) => write!(f, "{}", e),
            PortProfileError::InvalidBounds(e) => write!(f, "{}", e),
            PortProfileError::InvalidFraction(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PortProfileError {}

impl From<NoBerthsError> for PortProfileError {
    fn from(err: NoBerthsError) -> Self {
        PortProfileError::NoBerths(err)
    }
}

impl From<EmptyHorizonError> for PortProfileError {
    fn from(err: EmptyHorizonError) -> Self {
        PortProfileError::EmptyHorizon(err)
    }
}

impl From<NonPositiveValueError> for PortProfileError {
    fn from(err: NonPositiveValueError) -> Self {
        PortProfileError::NonPositiveValue(err)
    }
}

impl From<InvalidBoundsError> for PortProfileError {
    fn from(err: InvalidBoundsError) -> Self {
        PortProfileError::InvalidBounds(err)
    }
}

impl From<InvalidFractionError> for PortProfileError {
    fn from(err: InvalidFractionError) -> Self {
        PortProfileError::InvalidFraction(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionMismatchError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl DimensionMismatchError {
    pub fn new(rows: usize, cols: usize, len: usize) -> Self {
        Self { rows, cols, len }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl std::fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "grid data length {} does not match {} x {}",
            self.len, self.rows, self.cols
        )
    }
}

impl std::error::Error for DimensionMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionOutOfRangeError {
    index: usize,
    value: f64,
}

impl FractionOutOfRangeError {
    pub fn new(index: usize, value: f64) -> Self {
        Self { index, value }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for FractionOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "forecast value {} at hour {} lies outside [0, 1]",
            self.value, self.index
        )
    }
}

impl std::error::Error for FractionOutOfRangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastTooShortError {
    need: usize,
    got: usize,
}

impl ForecastTooShortError {
    pub fn new(need: usize, got: usize) -> Self {
        Self { need, got }
    }

    pub fn need(&self) -> usize {
        self.need
    }

    pub fn got(&self) -> usize {
        self.got
    }
}

impl std::fmt::Display for ForecastTooShortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "forecast covers {} hours but the horizon needs {}",
            self.got, self.need
        )
    }
}

impl std::error::Error for ForecastTooShortError {}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    DimensionMismatch(DimensionMismatchError),
    FractionOutOfRange(FractionOutOfRangeError),
    ForecastTooShort(ForecastTooShortError),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::DimensionMismatch(e) => write!(f, "{}", e),
            EnvError::FractionOutOfRange(e) => write!(f, "{}", e),
            EnvError::ForecastTooShort(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EnvError {}

impl From<DimensionMismatchError> for EnvError {
    fn from(err: DimensionMismatchError) -> Self {
        EnvError::DimensionMismatch(err)
    }
}

impl From<FractionOutOfRangeError> for EnvError {
    fn from(err: FractionOutOfRangeError) -> Self {
        EnvError::FractionOutOfRange(err)
    }
}

impl From<ForecastTooShortError> for EnvError {
    fn from(err: ForecastTooShortError) -> Self {
        EnvError::ForecastTooShort(err)
    }
}
