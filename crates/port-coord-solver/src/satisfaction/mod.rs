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

//! Satisfaction ranking: pure, side-effect-free normalization and
//! thresholding of per-vessel candidate costs.

use port_coord_model::prelude::{ArrivalCandidate, CandidateSet, Fleet};

/// Normalized satisfaction per cost: `(C_max - C_k) / (C_max - C_min)`.
///
/// All-equal costs degenerate to a full score of 1.0 for everyone, which
/// also sidesteps the division by zero. Empty input yields empty output.
pub fn calculate_si(costs: &[f64]) -> Vec<f64> {
    let Some(&first) = costs.first() else {
        return Vec::new();
    };
    let (min, max) = costs.iter().fold((first, first), |(lo, hi), &c| {
        (lo.min(c), hi.max(c))
    });
    if max == min {
        return vec![1.0; costs.len()];
    }
    costs.iter().map(|&c| (max - c) / (max - min)).collect()
}

/// Annotate each candidate with its score and keep those at or above the
/// threshold, preserving input order.
pub fn filter_by_threshold(
    candidates: Vec<ArrivalCandidate>,
    threshold: f64,
) -> Vec<ArrivalCandidate> {
    let costs: Vec<f64> = candidates.iter().map(|c| c.cost()).collect();
    let scores = calculate_si(&costs);
    candidates
        .into_iter()
        .zip(scores)
        .filter(|&(_, si)| si >= threshold)
        .map(|(candidate, si)| candidate.with_satisfaction(si))
        .collect()
}

/// Apply each vessel's own threshold across the fleet's candidate sets.
/// Vessels whose candidates all fall short propagate an empty list.
pub fn rank_fleet(candidates: CandidateSet, fleet: &Fleet) -> CandidateSet {
    let mut filtered = CandidateSet::new();
    for (vessel, list) in candidates.iter() {
        let threshold = fleet
            .get(vessel)
            .map(|v| v.satisfaction_threshold())
            .unwrap_or(0.0);
        let survivors = filter_by_threshold(list.to_vec(), threshold);
        tracing::info!(
            vessel = %vessel,
            threshold,
            survivors = survivors.len(),
            "satisfaction filtering"
        );
        filtered.insert(vessel, survivors);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use port_coord_core::prelude::Hour;

    fn candidate(arrival: i64, cost: f64) -> ArrivalCandidate {
        ArrivalCandidate::new(
            Hour::new(arrival),
            0.5,
            cost,
            vec![15.0],
            vec![200.0],
            vec![30.0],
        )
        .unwrap()
    }

    #[test]
    fn test_two_costs_span_the_unit_interval() {
        assert_eq!(calculate_si(&[100.0, 200.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_equal_costs_degenerate_to_one() {
        assert_eq!(calculate_si(&[50.0, 50.0, 50.0]), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_costs() {
        assert!(calculate_si(&[]).is_empty());
    }

    #[test]
    fn test_intermediate_cost_interpolates() {
        let si = calculate_si(&[100.0, 150.0, 200.0]);
        assert_eq!(si[0], 1.0);
        assert!((si[1] - 0.5).abs() < 1e-12);
        assert_eq!(si[2], 0.0);
    }

    #[test]
    fn test_filter_keeps_scores_at_or_above_threshold() {
        // Costs chosen so the scores come out [0.9, 0.3, 0.6, 1.0, 0.0].
        let costs = [110.0, 170.0, 140.0, 100.0, 200.0];
        let si = calculate_si(&costs);
        assert!((si[0] - 0.9).abs() < 1e-12);
        assert!((si[1] - 0.3).abs() < 1e-12);
        assert!((si[2] - 0.6).abs() < 1e-12);

        let candidates: Vec<ArrivalCandidate> = costs
            .iter()
            .enumerate()
            .map(|(i, &c)| candidate(10 + i as i64, c))
            .collect();
        let kept = filter_by_threshold(candidates, 0.5);
        let arrivals: Vec<i64> = kept.iter().map(|c| c.arrival().value()).collect();
        assert_eq!(arrivals, vec![10, 12, 13]);
        for c in &kept {
            assert!(c.satisfaction().expect("annotated") >= 0.5);
        }
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_by_threshold(Vec::new(), 0.5).is_empty());
    }

    #[test]
    fn test_single_candidate_scores_one() {
        let kept = filter_by_threshold(vec![candidate(10, 480.0)], 0.99);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].satisfaction(), Some(1.0));
    }
}
