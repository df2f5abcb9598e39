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

pub mod err;

use crate::problem::port::PortProfile;
use crate::solution::candidate::CandidateSet;
use crate::solution::coordination::CoordinationSolution;
use crate::validation::err::{
    BerthClosedError, BerthOverbookedError, ChargingOutOfRatingError,
    ChargingWithoutOccupancyError, ChoiceOutOfRangeError, MissingChoiceError,
    OccupancyBeforeArrivalError, SolutionError, UnknownBerthError, VesselOverbookedError,
};
use port_coord_core::prelude::Hour;
use std::collections::BTreeSet;

const POWER_TOLERANCE_KW: f64 = 1e-6;

/// Structural checks applied to every solver-returned coordination
/// assignment before it leaves the coordination stage.
#[derive(Debug, Clone)]
pub struct SolutionValidator;

impl SolutionValidator {
    /// Exactly one chosen candidate per vessel, inside the candidate list.
    pub fn validate_choices(
        candidates: &CandidateSet,
        solution: &CoordinationSolution,
    ) -> Result<(), SolutionError> {
        for (vessel, list) in candidates.iter() {
            match solution.chosen_candidate(vessel) {
                None => return Err(MissingChoiceError::new(vessel).into()),
                Some(index) if index >= list.len() => {
                    return Err(ChoiceOutOfRangeError::new(vessel, index, list.len()).into());
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Berth exclusivity: at most one vessel per berth-hour, at most one
    /// berth per vessel-hour.
    pub fn validate_exclusivity(solution: &CoordinationSolution) -> Result<(), SolutionError> {
        let mut berth_hours = BTreeSet::new();
        let mut vessel_hours = BTreeSet::new();
        for (berth, vessel, hour) in solution.iter_occupancy() {
            if !berth_hours.insert((berth, hour)) {
                return Err(BerthOverbookedError::new(berth, hour).into());
            }
            if !vessel_hours.insert((vessel, hour)) {
                return Err(VesselOverbookedError::new(vessel, hour).into());
            }
        }
        Ok(())
    }

    /// Occupancy only on known, open berths and never before the chosen
    /// candidate's arrival hour.
    pub fn validate_occupancy(
        port: &PortProfile,
        candidates: &CandidateSet,
        solution: &CoordinationSolution,
    ) -> Result<(), SolutionError> {
        for (berth, vessel, hour) in solution.iter_occupancy() {
            let Some(b) = port.berths().get(berth) else {
                return Err(UnknownBerthError::new(berth).into());
            };
            if !b.is_open_at(hour) {
                return Err(BerthClosedError::new(berth, hour).into());
            }
            let arrival: Option<Hour> = solution
                .chosen_candidate(vessel)
                .and_then(|i| candidates.get(vessel).and_then(|list| list.get(i)))
                .map(|c| c.arrival());
            if let Some(arrival) = arrival {
                if hour < arrival {
                    return Err(OccupancyBeforeArrivalError::new(vessel, hour, arrival).into());
                }
            }
        }
        Ok(())
    }

    /// Charging only while docked and within the berth rating.
    pub fn validate_charging(
        port: &PortProfile,
        solution: &CoordinationSolution,
    ) -> Result<(), SolutionError> {
        for ((berth, vessel, hour), power) in solution.iter_charging() {
            let rating = port.berths().get(berth).map(|b| b.max_charging_kw());
            let Some(rating) = rating else {
                return Err(UnknownBerthError::new(berth).into());
            };
            if !(-POWER_TOLERANCE_KW..=rating + POWER_TOLERANCE_KW).contains(&power) {
                return Err(ChargingOutOfRatingError::new(berth, hour, power, rating).into());
            }
            if power > POWER_TOLERANCE_KW && !solution.is_occupied(berth, vessel, hour) {
                return Err(
                    ChargingWithoutOccupancyError::new(berth, vessel, hour, power).into(),
                );
            }
        }
        Ok(())
    }

    /// All checks, in the order a reviewer would want them reported.
    pub fn validate(
        port: &PortProfile,
        candidates: &CandidateSet,
        solution: &CoordinationSolution,
    ) -> Result<(), SolutionError> {
        Self::validate_choices(candidates, solution)?;
        Self::validate_exclusivity(solution)?;
        Self::validate_occupancy(port, candidates, solution)?;
        Self::validate_charging(port, solution)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BerthIdentifier, VesselIdentifier};
    use crate::problem::port::{Berth, PortProfileBuilder};
    use crate::solution::candidate::ArrivalCandidate;
    use port_coord_core::prelude::HourInterval;
    use std::collections::{BTreeMap, BTreeSet};

    fn hour(v: i64) -> Hour {
        Hour::new(v)
    }

    fn iv(a: i64, b: i64) -> HourInterval {
        HourInterval::new(hour(a), hour(b))
    }

    fn bid(n: usize) -> BerthIdentifier {
        BerthIdentifier::new(n)
    }

    fn vid(n: usize) -> VesselIdentifier {
        VesselIdentifier::new(n)
    }

    fn port() -> PortProfile {
        PortProfileBuilder::new()
            .with_berths([
                Berth::always_open(bid(0), 200.0, iv(0, 24)),
                Berth::from_windows(bid(1), 200.0, [iv(0, 12)]),
            ])
            .with_charging(1000.0, 0.95)
            .build()
            .unwrap()
    }

    fn candidates() -> CandidateSet {
        let mut set = CandidateSet::new();
        let c = ArrivalCandidate::new(hour(10), 0.4, 90.0, vec![15.0], vec![200.0], vec![30.0])
            .unwrap();
        set.insert(vid(1), vec![c]);
        set
    }

    fn solution(
        occupancy: BTreeSet<(BerthIdentifier, VesselIdentifier, Hour)>,
        charging: BTreeMap<(BerthIdentifier, VesselIdentifier, Hour), f64>,
        chosen: Vec<(VesselIdentifier, usize)>,
    ) -> CoordinationSolution {
        CoordinationSolution::new(
            iv(0, 24),
            occupancy,
            BTreeSet::new(),
            vec![0; 24],
            Vec::new(),
            charging,
            chosen,
            0.0,
        )
    }

    #[test]
    fn test_valid_assignment_passes() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(0), vid(1), hour(10)));
        occ.insert((bid(0), vid(1), hour(11)));
        let mut ch = BTreeMap::new();
        ch.insert((bid(0), vid(1), hour(10)), 120.0);
        let sol = solution(occ, ch, vec![(vid(1), 0)]);
        assert!(SolutionValidator::validate(&port(), &candidates(), &sol).is_ok());
    }

    #[test]
    fn test_detects_missing_choice() {
        let sol = solution(BTreeSet::new(), BTreeMap::new(), vec![]);
        let err = SolutionValidator::validate(&port(), &candidates(), &sol).unwrap_err();
        assert!(matches!(err, SolutionError::MissingChoice(_)));
    }

    #[test]
    fn test_detects_berth_overbooking() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(0), vid(1), hour(10)));
        occ.insert((bid(0), vid(2), hour(10)));
        let sol = solution(occ, BTreeMap::new(), vec![(vid(1), 0)]);
        let err = SolutionValidator::validate_exclusivity(&sol).unwrap_err();
        assert!(matches!(err, SolutionError::BerthOverbooked(_)));
    }

    #[test]
    fn test_detects_vessel_on_two_berths() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(0), vid(1), hour(10)));
        occ.insert((bid(1), vid(1), hour(10)));
        let sol = solution(occ, BTreeMap::new(), vec![(vid(1), 0)]);
        let err = SolutionValidator::validate_exclusivity(&sol).unwrap_err();
        assert!(matches!(err, SolutionError::VesselOverbooked(_)));
    }

    #[test]
    fn test_detects_closed_berth() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(1), vid(1), hour(15))); // berth 1 closes at 12
        let sol = solution(occ, BTreeMap::new(), vec![(vid(1), 0)]);
        let err = SolutionValidator::validate(&port(), &candidates(), &sol).unwrap_err();
        assert!(matches!(err, SolutionError::BerthClosed(_)));
    }

    #[test]
    fn test_detects_occupancy_before_arrival() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(0), vid(1), hour(9))); // arrival is 10
        let sol = solution(occ, BTreeMap::new(), vec![(vid(1), 0)]);
        let err = SolutionValidator::validate(&port(), &candidates(), &sol).unwrap_err();
        assert!(matches!(err, SolutionError::OccupancyBeforeArrival(_)));
    }

    #[test]
    fn test_detects_charging_without_occupancy() {
        let mut ch = BTreeMap::new();
        ch.insert((bid(0), vid(1), hour(10)), 50.0);
        let sol = solution(BTreeSet::new(), ch, vec![(vid(1), 0)]);
        let err = SolutionValidator::validate_charging(&port(), &sol).unwrap_err();
        assert!(matches!(err, SolutionError::ChargingWithoutOccupancy(_)));
    }

    #[test]
    fn test_detects_charging_above_rating() {
        let mut occ = BTreeSet::new();
        occ.insert((bid(0), vid(1), hour(10)));
        let mut ch = BTreeMap::new();
        ch.insert((bid(0), vid(1), hour(10)), 250.0); // rating 200
        let sol = solution(occ, ch, vec![(vid(1), 0)]);
        let err = SolutionValidator::validate_charging(&port(), &sol).unwrap_err();
        assert!(matches!(err, SolutionError::ChargingOutOfRating(_)));
    }
}
