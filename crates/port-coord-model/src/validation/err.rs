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

use crate::common::{BerthIdentifier, VesselIdentifier};
use port_coord_core::prelude::Hour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BerthOverbookedError {
    berth: BerthIdentifier,
    hour: Hour,
}

impl BerthOverbookedError {
    pub fn new(berth: BerthIdentifier, hour: Hour) -> Self {
        Self { berth, hour }
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }
}

impl std::fmt::Display for BerthOverbookedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hosts more than one vessel at {}", self.berth, self.hour)
    }
}

impl std::error::Error for BerthOverbookedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VesselOverbookedError {
    vessel: VesselIdentifier,
    hour: Hour,
}

impl VesselOverbookedError {
    pub fn new(vessel: VesselIdentifier, hour: Hour) -> Self {
        Self { vessel, hour }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }
}

impl std::fmt::Display for VesselOverbookedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} occupies more than one berth at {}", self.vessel, self.hour)
    }
}

impl std::error::Error for VesselOverbookedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingChoiceError {
    vessel: VesselIdentifier,
}

impl MissingChoiceError {
    pub fn new(vessel: VesselIdentifier) -> Self {
        Self { vessel }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for MissingChoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no arrival candidate was chosen for {}", self.vessel)
    }
}

impl std::error::Error for MissingChoiceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOutOfRangeError {
    vessel: VesselIdentifier,
    index: usize,
    available: usize,
}

impl ChoiceOutOfRangeError {
    pub fn new(vessel: VesselIdentifier, index: usize, available: usize) -> Self {
        Self {
            vessel,
            index,
            available,
        }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn available(&self) -> usize {
        self.available
    }
}

impl std::fmt::Display for ChoiceOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chosen candidate {} for {} is out of range ({} available)",
            self.index, self.vessel, self.available
        )
    }
}

impl std::error::Error for ChoiceOutOfRangeError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargingWithoutOccupancyError {
    berth: BerthIdentifier,
    vessel: VesselIdentifier,
    hour: Hour,
    power_kw: f64,
}

impl ChargingWithoutOccupancyError {
    pub fn new(berth: BerthIdentifier, vessel: VesselIdentifier, hour: Hour, power_kw: f64) -> Self {
        Self {
            berth,
            vessel,
            hour,
            power_kw,
        }
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }

    pub fn power_kw(&self) -> f64 {
        self.power_kw
    }
}

impl std::fmt::Display for ChargingWithoutOccupancyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} draws {} kW at {} on {} without occupying it",
            self.vessel, self.power_kw, self.hour, self.berth
        )
    }
}

impl std::error::Error for ChargingWithoutOccupancyError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargingOutOfRatingError {
    berth: BerthIdentifier,
    hour: Hour,
    power_kw: f64,
    rating_kw: f64,
}

impl ChargingOutOfRatingError {
    pub fn new(berth: BerthIdentifier, hour: Hour, power_kw: f64, rating_kw: f64) -> Self {
        Self {
            berth,
            hour,
            power_kw,
            rating_kw,
        }
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }

    pub fn power_kw(&self) -> f64 {
        self.power_kw
    }

    pub fn rating_kw(&self) -> f64 {
        self.rating_kw
    }
}

impl std::fmt::Display for ChargingOutOfRatingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "charging power {} kW at {} on {} lies outside [0, {}]",
            self.power_kw, self.hour, self.berth, self.rating_kw
        )
    }
}

impl std::error::Error for ChargingOutOfRatingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BerthClosedError {
    berth: BerthIdentifier,
    hour: Hour,
}

impl BerthClosedError {
    pub fn new(berth: BerthIdentifier, hour: Hour) -> Self {
        Self { berth, hour }
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }
}

impl std::fmt::Display for BerthClosedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is closed at {} but assigned", self.berth, self.hour)
    }
}

impl std::error::Error for BerthClosedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyBeforeArrivalError {
    vessel: VesselIdentifier,
    hour: Hour,
    arrival: Hour,
}

impl OccupancyBeforeArrivalError {
    pub fn new(vessel: VesselIdentifier, hour: Hour, arrival: Hour) -> Self {
        Self {
            vessel,
            hour,
            arrival,
        }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn hour(&self) -> Hour {
        self.hour
    }

    pub fn arrival(&self) -> Hour {
        self.arrival
    }
}

impl std::fmt::Display for OccupancyBeforeArrivalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is berthed at {} before its arrival at {}",
            self.vessel, self.hour, self.arrival
        )
    }
}

impl std::error::Error for OccupancyBeforeArrivalError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownBerthError {
    berth: BerthIdentifier,
}

impl UnknownBerthError {
    pub fn new(berth: BerthIdentifier) -> Self {
        Self { berth }
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }
}

impl std::fmt::Display for UnknownBerthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assignment references unknown {}", self.berth)
    }
}

impl std::error::Error for UnknownBerthError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionError {
    BerthOverbooked(BerthOverbookedError),
    VesselOverbooked(VesselOverbookedError),
    MissingChoice(MissingChoiceError),
    ChoiceOutOfRange(ChoiceOutOfRangeError),
    ChargingWithoutOccupancy(ChargingWithoutOccupancyError),
    ChargingOutOfRating(ChargingOutOfRatingError),
    BerthClosed(BerthClosedError),
    OccupancyBeforeArrival(OccupancyBeforeArrivalError),
    UnknownBerth(UnknownBerthError),
}

impl std::fmt::Display for SolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionError::BerthOverbooked(e) => write!(f, "{}", e),
            SolutionError::VesselOverbooked(e) => write!(f, "{}", e),
            SolutionError::MissingChoice(e) => write!(f, "{}", e),
            SolutionError::ChoiceOutOfRange(e) => write!(f, "{}", e),
            SolutionError::ChargingWithoutOccupancy(e) => write!(f, "{}", e),
            SolutionError::ChargingOutOfRating(e) => write!(f, "{}", e),
            SolutionError::BerthClosed(e) => write!(f, "{}", e),
            SolutionError::OccupancyBeforeArrival(e) => write!(f, "{}", e),
            SolutionError::UnknownBerth(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SolutionError {}

impl From<BerthOverbookedError> for SolutionError {
    fn from(err: BerthOverbookedError) -> Self {
        SolutionError::BerthOverbooked(err)
    }
}

impl From<VesselOverbookedError> for SolutionError {
    fn from(err: VesselOverbookedError) -> Self {
        SolutionError::VesselOverbooked(err)
    }
}

impl From<MissingChoiceError> for SolutionError {
    fn from(err: MissingChoiceError) -> Self {
        SolutionError::MissingChoice(err)
    }
}

impl From<ChoiceOutOfRangeError> for SolutionError {
    fn from(err: ChoiceOutOfRangeError) -> Self {
        SolutionError::ChoiceOutOfRange(err)
    }
}

impl From<ChargingWithoutOccupancyError> for SolutionError {
    fn from(err: ChargingWithoutOccupancyError) -> Self {
        SolutionError::ChargingWithoutOccupancy(err)
    }
}

impl From<ChargingOutOfRatingError> for SolutionError {
    fn from(err: ChargingOutOfRatingError) -> Self {
        SolutionError::ChargingOutOfRating(err)
    }
}

impl From<BerthClosedError> for SolutionError {
    fn from(err: BerthClosedError) -> Self {
        SolutionError::BerthClosed(err)
    }
}

impl From<OccupancyBeforeArrivalError> for SolutionError {
    fn from(err: OccupancyBeforeArrivalError) -> Self {
        SolutionError::OccupancyBeforeArrival(err)
    }
}

impl From<UnknownBerthError> for SolutionError {
    fn from(err: UnknownBerthError) -> Self {
        SolutionError::UnknownBerth(err)
    }
}
