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
use port_coord_core::prelude::{Cost, Hour, HourInterval};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The joint berth / voltage-regulation assignment returned by the
/// coordination stage. Read-only once built.
#[derive(Debug, Clone)]
pub struct CoordinationSolution {
    horizon: HourInterval,
    occupancy: BTreeSet<(BerthIdentifier, VesselIdentifier, Hour)>,
    service_starts: BTreeSet<(BerthIdentifier, VesselIdentifier, Hour)>,
    tap_schedule: Vec<i32>,
    pv_reactive: Vec<Vec<f64>>,
    charging: BTreeMap<(BerthIdentifier, VesselIdentifier, Hour), f64>,
    chosen: Vec<(VesselIdentifier, usize)>,
    chosen_index: HashMap<VesselIdentifier, usize>,
    objective: Cost,
}

impl CoordinationSolution {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        horizon: HourInterval,
        occupancy: BTreeSet<(BerthIdentifier, VesselIdentifier, Hour)>,
        service_starts: BTreeSet<(BerthIdentifier, VesselIdentifier, Hour)>,
        tap_schedule: Vec<i32>,
        pv_reactive: Vec<Vec<f64>>,
        charging: BTreeMap<(BerthIdentifier, VesselIdentifier, Hour), f64>,
        chosen: Vec<(VesselIdentifier, usize)>,
        objective: Cost,
    ) -> Self {
        let chosen_index = chosen.iter().map(|&(v, c)| (v, c)).collect();
        Self {
            horizon,
            occupancy,
            service_starts,
            tap_schedule,
            pv_reactive,
            charging,
            chosen,
            chosen_index,
            objective,
        }
    }

    #[inline]
    pub fn horizon(&self) -> HourInterval {
        self.horizon
    }

    #[inline]
    pub fn is_occupied(&self, berth: BerthIdentifier, vessel: VesselIdentifier, t: Hour) -> bool {
        self.occupancy.contains(&(berth, vessel, t))
    }

    #[inline]
    pub fn iter_occupancy(
        &self,
    ) -> impl Iterator<Item = (BerthIdentifier, VesselIdentifier, Hour)> + '_ {
        self.occupancy.iter().copied()
    }

    #[inline]
    pub fn iter_service_starts(
        &self,
    ) -> impl Iterator<Item = (BerthIdentifier, VesselIdentifier, Hour)> + '_ {
        self.service_starts.iter().copied()
    }

    /// Tap position for an hour inside the horizon.
    #[inline]
    pub fn tap_at(&self, t: Hour) -> Option<i32> {
        let offset = t.value().checked_sub(self.horizon.start().value())?;
        usize::try_from(offset).ok().and_then(|i| self.tap_schedule.get(i)).copied()
    }

    #[inline]
    pub fn tap_schedule(&self) -> &[i32] {
        &self.tap_schedule
    }

    #[inline]
    pub fn pv_reactive(&self) -> &[Vec<f64>] {
        &self.pv_reactive
    }

    #[inline]
    pub fn charging_at(&self, berth: BerthIdentifier, vessel: VesselIdentifier, t: Hour) -> f64 {
        self.charging.get(&(berth, vessel, t)).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn iter_charging(
        &self,
    ) -> impl Iterator<Item = ((BerthIdentifier, VesselIdentifier, Hour), f64)> + '_ {
        self.charging.iter().map(|(&k, &v)| (k, v))
    }

    /// Energy (kWh) drawn from shore for a vessel over the whole horizon.
    pub fn charging_energy_kwh(&self, vessel: VesselIdentifier) -> f64 {
        self.charging
            .iter()
            .filter(|((_, v, _), _)| *v == vessel)
            .map(|(_, &p)| p)
            .sum()
    }

    #[inline]
    pub fn chosen_candidate(&self, vessel: VesselIdentifier) -> Option<usize> {
        self.chosen_index.get(&vessel).copied()
    }

    #[inline]
    pub fn iter_chosen(&self) -> impl Iterator<Item = (VesselIdentifier, usize)> + '_ {
        self.chosen.iter().copied()
    }

    #[inline]
    pub fn objective(&self) -> Cost {
        self.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(v: i64) -> Hour {
        Hour::new(v)
    }

    fn sample() -> CoordinationSolution {
        let b = BerthIdentifier::new(0);
        let v = VesselIdentifier::new(1);
        let mut occupancy = BTreeSet::new();
        occupancy.insert((b, v, hour(10)));
        occupancy.insert((b, v, hour(11)));
        let mut starts = BTreeSet::new();
        starts.insert((b, v, hour(10)));
        let mut charging = BTreeMap::new();
        charging.insert((b, v, hour(10)), 50.0);
        charging.insert((b, v, hour(11)), 51.0);
        CoordinationSolution::new(
            HourInterval::new(hour(0), hour(24)),
            occupancy,
            starts,
            vec![0; 24],
            vec![vec![0.0; 24]; 4],
            charging,
            vec![(v, 0)],
            5101.0,
        )
    }

    #[test]
    fn test_occupancy_lookup() {
        let s = sample();
        let b = BerthIdentifier::new(0);
        let v = VesselIdentifier::new(1);
        assert!(s.is_occupied(b, v, hour(10)));
        assert!(!s.is_occupied(b, v, hour(12)));
    }

    #[test]
    fn test_charging_totals() {
        let s = sample();
        let v = VesselIdentifier::new(1);
        assert!((s.charging_energy_kwh(v) - 101.0).abs() < 1e-9);
        assert_eq!(s.charging_at(BerthIdentifier::new(1), v, hour(10)), 0.0);
    }

    #[test]
    fn test_tap_indexing_follows_horizon() {
        let s = sample();
        assert_eq!(s.tap_at(hour(0)), Some(0));
        assert_eq!(s.tap_at(hour(23)), Some(0));
        assert_eq!(s.tap_at(hour(24)), None);
        assert_eq!(s.tap_at(hour(-1)), None);
    }

    #[test]
    fn test_chosen_candidate() {
        let s = sample();
        assert_eq!(s.chosen_candidate(VesselIdentifier::new(1)), Some(0));
        assert_eq!(s.chosen_candidate(VesselIdentifier::new(2)), None);
    }
}
