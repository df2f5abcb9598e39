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

use crate::common::VesselIdentifier;
use port_coord_core::prelude::{Cost, Hour};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLengthMismatchError {
    velocity: usize,
    generator: usize,
    discharge: usize,
}

impl ProfileLengthMismatchError {
    pub fn new(velocity: usize, generator: usize, discharge: usize) -> Self {
        Self {
            velocity,
            generator,
            discharge,
        }
    }
}

impl std::fmt::Display for ProfileLengthMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dispatch profiles disagree in length: velocity {}, generator {}, discharge {}",
            self.velocity, self.generator, self.discharge
        )
    }
}

impl std::error::Error for ProfileLengthMismatchError {}

/// One feasible (arrival hour, state of charge, cost) outcome of voyage
/// scheduling, with its hourly dispatch.
///
/// Immutable after creation; the only later annotation is the satisfaction
/// score, applied exactly once by the ranking stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalCandidate {
    arrival: Hour,
    soc: f64,
    cost: Cost,
    velocity_profile: Vec<f64>,
    generator_profile: Vec<f64>,
    discharge_profile: Vec<f64>,
    satisfaction: Option<f64>,
}

impl ArrivalCandidate {
    pub fn new(
        arrival: Hour,
        soc: f64,
        cost: Cost,
        velocity_profile: Vec<f64>,
        generator_profile: Vec<f64>,
        discharge_profile: Vec<f64>,
    ) -> Result<Self, ProfileLengthMismatchError> {
        if velocity_profile.len() != generator_profile.len()
            || velocity_profile.len() != discharge_profile.len()
            || velocity_profile.is_empty()
        {
            return Err(ProfileLengthMismatchError::new(
                velocity_profile.len(),
                generator_profile.len(),
                discharge_profile.len(),
            ));
        }
        Ok(Self {
            arrival,
            soc,
            cost,
            velocity_profile,
            generator_profile,
            discharge_profile,
            satisfaction: None,
        })
    }

    #[inline]
    pub fn arrival(&self) -> Hour {
        self.arrival
    }

    #[inline]
    pub fn soc(&self) -> f64 {
        self.soc
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn velocity_profile(&self) -> &[f64] {
        &self.velocity_profile
    }

    #[inline]
    pub fn generator_profile(&self) -> &[f64] {
        &self.generator_profile
    }

    #[inline]
    pub fn discharge_profile(&self) -> &[f64] {
        &self.discharge_profile
    }

    #[inline]
    pub fn cruise_hours(&self) -> usize {
        self.velocity_profile.len()
    }

    #[inline]
    pub fn satisfaction(&self) -> Option<f64> {
        self.satisfaction
    }

    /// The one-time satisfaction annotation.
    #[inline]
    pub fn with_satisfaction(mut self, si: f64) -> Self {
        debug_assert!(self.satisfaction.is_none(), "satisfaction set twice");
        self.satisfaction = Some(si);
        self
    }
}

/// Per-vessel candidate lists, keyed by vessel and iterated in insertion
/// order (fleet order upstream, arrival-hour order within a vessel).
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    vessels: Vec<(VesselIdentifier, Vec<ArrivalCandidate>)>,
    index: HashMap<VesselIdentifier, usize>,
}

impl CandidateSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vessel's candidate list, replacing any previous list.
    pub fn insert(&mut self, vessel: VesselIdentifier, candidates: Vec<ArrivalCandidate>) {
        match self.index.get(&vessel) {
            Some(&slot) => self.vessels[slot].1 = candidates,
            None => {
                self.index.insert(vessel, self.vessels.len());
                self.vessels.push((vessel, candidates));
            }
        }
    }

    #[inline]
    pub fn get(&self, vessel: VesselIdentifier) -> Option<&[ArrivalCandidate]> {
        self.index
            .get(&vessel)
            .map(|&slot| self.vessels[slot].1.as_slice())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (VesselIdentifier, &[ArrivalCandidate])> {
        self.vessels.iter().map(|(id, c)| (*id, c.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Total number of candidates across all vessels.
    #[inline]
    pub fn total_candidates(&self) -> usize {
        self.vessels.iter().map(|(_, c)| c.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(arrival: i64, cost: f64) -> ArrivalCandidate {
        ArrivalCandidate::new(
            Hour::new(arrival),
            0.6,
            cost,
            vec![15.0, 15.0],
            vec![200.0, 200.0],
            vec![30.0, 30.0],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_profiles() {
        let err = ArrivalCandidate::new(
            Hour::new(10),
            0.5,
            100.0,
            vec![15.0],
            vec![200.0, 210.0],
            vec![30.0],
        )
        .unwrap_err();
        assert_eq!(err, ProfileLengthMismatchError::new(1, 2, 1));
    }

    #[test]
    fn test_rejects_empty_profiles() {
        assert!(ArrivalCandidate::new(Hour::new(10), 0.5, 1.0, vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn test_satisfaction_annotation() {
        let c = candidate(10, 120.0);
        assert_eq!(c.satisfaction(), None);
        let c = c.with_satisfaction(0.75);
        assert_eq!(c.satisfaction(), Some(0.75));
    }

    #[test]
    fn test_candidate_set_preserves_order() {
        let mut set = CandidateSet::new();
        set.insert(VesselIdentifier::new(2), vec![candidate(10, 1.0)]);
        set.insert(VesselIdentifier::new(1), vec![candidate(10, 2.0), candidate(11, 3.0)]);
        let ids: Vec<usize> = set.iter().map(|(id, _)| id.into_inner()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(set.total_candidates(), 3);
        assert_eq!(set.get(VesselIdentifier::new(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_insert_replaces_list() {
        let mut set = CandidateSet::new();
        set.insert(VesselIdentifier::new(1), vec![candidate(10, 1.0)]);
        set.insert(VesselIdentifier::new(1), vec![]);
        assert_eq!(set.get(VesselIdentifier::new(1)).unwrap().len(), 0);
        assert_eq!(set.len(), 1);
    }
}
