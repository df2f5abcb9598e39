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
use crate::solution::candidate::ArrivalCandidate;
use crate::solution::coordination::CoordinationSolution;
use port_coord_core::prelude::Cost;
use std::collections::HashMap;

/// Aggregates over the final per-vessel strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSummary {
    total_cost: Cost,
    mean_satisfaction: f64,
    coordination_objective: Cost,
    vessel_count: usize,
}

impl PlanSummary {
    pub fn new(
        total_cost: Cost,
        mean_satisfaction: f64,
        coordination_objective: Cost,
        vessel_count: usize,
    ) -> Self {
        Self {
            total_cost,
            mean_satisfaction,
            coordination_objective,
            vessel_count,
        }
    }

    #[inline]
    pub fn total_cost(&self) -> Cost {
        self.total_cost
    }

    #[inline]
    pub fn mean_satisfaction(&self) -> f64 {
        self.mean_satisfaction
    }

    #[inline]
    pub fn coordination_objective(&self) -> Cost {
        self.coordination_objective
    }

    #[inline]
    pub fn vessel_count(&self) -> usize {
        self.vessel_count
    }
}

/// The pipeline's end product: one chosen arrival strategy per vessel, the
/// coordination assignment behind it, and a summary.
#[derive(Debug, Clone)]
pub struct HarborPlan {
    strategies: Vec<(VesselIdentifier, ArrivalCandidate)>,
    index: HashMap<VesselIdentifier, usize>,
    coordination: CoordinationSolution,
    summary: PlanSummary,
}

impl HarborPlan {
    pub fn new(
        strategies: Vec<(VesselIdentifier, ArrivalCandidate)>,
        coordination: CoordinationSolution,
        summary: PlanSummary,
    ) -> Self {
        let index = strategies
            .iter()
            .enumerate()
            .map(|(i, (v, _))| (*v, i))
            .collect();
        Self {
            strategies,
            index,
            coordination,
            summary,
        }
    }

    #[inline]
    pub fn strategies(&self) -> impl Iterator<Item = (VesselIdentifier, &ArrivalCandidate)> {
        self.strategies.iter().map(|(v, c)| (*v, c))
    }

    #[inline]
    pub fn strategy(&self, vessel: VesselIdentifier) -> Option<&ArrivalCandidate> {
        self.index.get(&vessel).map(|&i| &self.strategies[i].1)
    }

    #[inline]
    pub fn vessel_count(&self) -> usize {
        self.strategies.len()
    }

    #[inline]
    pub fn coordination(&self) -> &CoordinationSolution {
        &self.coordination
    }

    #[inline]
    pub fn summary(&self) -> &PlanSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use port_coord_core::prelude::{Hour, HourInterval};
    use std::collections::{BTreeMap, BTreeSet};

    fn candidate(arrival: i64, cost: f64, si: f64) -> ArrivalCandidate {
        ArrivalCandidate::new(Hour::new(arrival), 0.5, cost, vec![15.0], vec![200.0], vec![30.0])
            .unwrap()
            .with_satisfaction(si)
    }

    fn empty_coordination() -> CoordinationSolution {
        CoordinationSolution::new(
            HourInterval::new(Hour::new(0), Hour::new(24)),
            BTreeSet::new(),
            BTreeSet::new(),
            vec![0; 24],
            Vec::new(),
            BTreeMap::new(),
            Vec::new(),
            0.0,
        )
    }

    #[test]
    fn test_plan_lookup() {
        let v1 = VesselIdentifier::new(1);
        let v2 = VesselIdentifier::new(2);
        let plan = HarborPlan::new(
            vec![(v1, candidate(10, 100.0, 1.0)), (v2, candidate(11, 150.0, 0.8))],
            empty_coordination(),
            PlanSummary::new(250.0, 0.9, 0.0, 2),
        );
        assert_eq!(plan.vessel_count(), 2);
        assert_eq!(plan.strategy(v2).unwrap().arrival(), Hour::new(11));
        assert!(plan.strategy(VesselIdentifier::new(3)).is_none());
        assert_eq!(plan.summary().vessel_count(), 2);
    }
}
