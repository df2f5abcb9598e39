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

use crate::nlp::{NlpFailure, NlpOutcome, NlpProblem, NlpSolution, NlpSolver};
use std::time::{Duration, Instant};

const FD_STEP: f64 = 1e-6;
const ARMIJO: f64 = 1e-4;
const MIN_BACKTRACK_STEP: f64 = 1e-14;
const STATIONARITY: f64 = 1e-8;
const PENALTY_GROWTH: f64 = 5.0;
const PENALTY_CAP: f64 = 1e8;

/// Default backend for the [`NlpSolver`] boundary.
///
/// Augmented-Lagrangian outer loop over a projected-gradient inner descent.
/// Variables are rescaled to the unit box internally, gradients come from
/// central finite differences, so callers only supply closures. The method
/// suits the small smooth dispatch programs voyage scheduling produces.
#[derive(Debug, Clone)]
pub struct AugmentedLagrangian {
    max_outer: usize,
    max_inner: usize,
    tolerance: f64,
    time_limit: Option<Duration>,
}

impl Default for AugmentedLagrangian {
    fn default() -> Self {
        Self {
            max_outer: 80,
            max_inner: 400,
            tolerance: 1e-3,
            time_limit: Some(Duration::from_secs(10)),
        }
    }
}

impl AugmentedLagrangian {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_iteration_budget(mut self, max_outer: usize, max_inner: usize) -> Self {
        self.max_outer = max_outer;
        self.max_inner = max_inner;
        self
    }

    /// Infinity-norm target on the equality residuals.
    #[inline]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Wall-clock budget; exceeding it is reported as [`NlpFailure::TimedOut`].
    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
}

#[inline]
fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

impl NlpSolver for AugmentedLagrangian {
    fn solve(&self, problem: &NlpProblem<'_>) -> NlpOutcome {
        let n = problem.dimension();
        if n == 0 || problem.initial().len() != n {
            return NlpOutcome::Failed(NlpFailure::InvalidProblem);
        }
        let bounds = problem.bounds();
        if bounds
            .iter()
            .any(|&(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return NlpOutcome::Failed(NlpFailure::InvalidProblem);
        }

        let widths: Vec<f64> = bounds.iter().map(|&(lo, hi)| hi - lo).collect();
        let to_x = |s: &[f64]| -> Vec<f64> {
            s.iter()
                .enumerate()
                .map(|(i, &si)| bounds[i].0 + si * widths[i])
                .collect()
        };

        let m = problem.equality_count();
        let augmented = |s: &[f64], lambda: &[f64], mu: f64| -> f64 {
            let x = to_x(s);
            let mut value = problem.objective(&x);
            for (j, &l) in lambda.iter().enumerate() {
                let c = problem.equality(j, &x);
                value += l * c + 0.5 * mu * c * c;
            }
            value
        };

        let deadline = self.time_limit.map(|limit| Instant::now() + limit);
        let expired = || deadline.is_some_and(|d| Instant::now() >= d);

        let mut s: Vec<f64> = problem
            .initial()
            .iter()
            .enumerate()
            .map(|(i, &xi)| {
                if widths[i] > 0.0 {
                    clamp_unit((xi - bounds[i].0) / widths[i])
                } else {
                    0.0
                }
            })
            .collect();
        let mut lambda = vec![0.0; m];
        let mut mu = 1.0;
        let mut previous_norm = f64::INFINITY;

        for _outer in 0..self.max_outer {
            if expired() {
                return NlpOutcome::Failed(NlpFailure::TimedOut);
            }

            // Inner: projected gradient descent on the augmented objective.
            let mut step = 0.1;
            for _inner in 0..self.max_inner {
                if expired() {
                    return NlpOutcome::Failed(NlpFailure::TimedOut);
                }
                let value = augmented(&s, &lambda, mu);
                if !value.is_finite() {
                    return NlpOutcome::Failed(NlpFailure::NonFinite);
                }

                // Central finite differences in the unit box.
                let mut gradient = vec![0.0; n];
                let mut scratch = s.clone();
                for i in 0..n {
                    if widths[i] == 0.0 {
                        continue; // fixed variable
                    }
                    scratch[i] = s[i] + FD_STEP;
                    let up = augmented(&scratch, &lambda, mu);
                    scratch[i] = s[i] - FD_STEP;
                    let down = augmented(&scratch, &lambda, mu);
                    scratch[i] = s[i];
                    gradient[i] = (up - down) / (2.0 * FD_STEP);
                }
                if gradient.iter().any(|g| !g.is_finite()) {
                    return NlpOutcome::Failed(NlpFailure::NonFinite);
                }

                // Zero components that point out of an active bound.
                let projected: Vec<f64> = gradient
                    .iter()
                    .enumerate()
                    .map(|(i, &g)| {
                        if (s[i] <= 0.0 && g > 0.0) || (s[i] >= 1.0 && g < 0.0) {
                            0.0
                        } else {
                            g
                        }
                    })
                    .collect();
                let pg_norm2: f64 = projected.iter().map(|g| g * g).sum();
                if projected.iter().fold(0.0_f64, |a, g| a.max(g.abs())) < STATIONARITY {
                    break;
                }

                let mut t = step;
                let mut moved = false;
                while t >= MIN_BACKTRACK_STEP {
                    let trial: Vec<f64> = s
                        .iter()
                        .zip(&projected)
                        .map(|(&si, &g)| clamp_unit(si - t * g))
                        .collect();
                    let trial_value = augmented(&trial, &lambda, mu);
                    if trial_value.is_finite() && trial_value <= value - ARMIJO * t * pg_norm2 {
                        s = trial;
                        step = (t * 2.0).min(1.0);
                        moved = true;
                        break;
                    }
                    t *= 0.5;
                }
                if !moved {
                    break; // no descent direction left at this scale
                }
            }

            let x = to_x(&s);
            let residuals: Vec<f64> = (0..m).map(|j| problem.equality(j, &x)).collect();
            if residuals.iter().any(|c| !c.is_finite()) {
                return NlpOutcome::Failed(NlpFailure::NonFinite);
            }
            let norm = residuals.iter().fold(0.0_f64, |a, c| a.max(c.abs()));
            if norm <= self.tolerance {
                let objective = problem.objective(&x);
                if !objective.is_finite() {
                    return NlpOutcome::Failed(NlpFailure::NonFinite);
                }
                return NlpOutcome::Converged(NlpSolution::new(x, objective));
            }

            for (l, &c) in lambda.iter_mut().zip(&residuals) {
                *l += mu * c;
            }
            if norm > 0.25 * previous_norm {
                mu = (mu * PENALTY_GROWTH).min(PENALTY_CAP);
            }
            previous_norm = norm;
        }

        NlpOutcome::Failed(NlpFailure::IterationLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_quadratic() {
        let problem = NlpProblem::new(|x: &[f64]| (x[0] - 3.0) * (x[0] - 3.0))
            .with_bounds(vec![(0.0, 10.0)])
            .with_initial(vec![9.0]);
        let solution = AugmentedLagrangian::new()
            .solve(&problem)
            .into_converged()
            .expect("converges");
        assert!((solution.x()[0] - 3.0).abs() < 1e-2);
        assert!(solution.objective() < 1e-3);
    }

    #[test]
    fn test_equality_constrained_symmetric() {
        // min x^2 + y^2 s.t. x + y = 2 has its optimum at (1, 1).
        let problem = NlpProblem::new(|x: &[f64]| x[0] * x[0] + x[1] * x[1])
            .with_equality(|x: &[f64]| x[0] + x[1] - 2.0)
            .with_bounds(vec![(-5.0, 5.0), (-5.0, 5.0)])
            .with_initial(vec![0.0, 0.0]);
        let solution = AugmentedLagrangian::new()
            .solve(&problem)
            .into_converged()
            .expect("converges");
        assert!((solution.x()[0] - 1.0).abs() < 5e-3);
        assert!((solution.x()[1] - 1.0).abs() < 5e-3);
        assert!((solution.x()[0] + solution.x()[1] - 2.0).abs() <= 1e-3);
    }

    #[test]
    fn test_active_bound() {
        let problem = NlpProblem::new(|x: &[f64]| x[0])
            .with_bounds(vec![(2.0, 5.0)])
            .with_initial(vec![4.0]);
        let solution = AugmentedLagrangian::new()
            .solve(&problem)
            .into_converged()
            .expect("converges");
        assert!((solution.x()[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_time_budget_times_out() {
        let problem = NlpProblem::new(|x: &[f64]| x[0] * x[0])
            .with_bounds(vec![(-1.0, 1.0)])
            .with_initial(vec![1.0]);
        let outcome = AugmentedLagrangian::new()
            .with_time_limit(Some(Duration::ZERO))
            .solve(&problem);
        assert_eq!(outcome, NlpOutcome::Failed(NlpFailure::TimedOut));
    }

    #[test]
    fn test_non_finite_objective_fails() {
        let problem = NlpProblem::new(|_: &[f64]| f64::NAN)
            .with_bounds(vec![(0.0, 1.0)])
            .with_initial(vec![0.5]);
        let outcome = AugmentedLagrangian::new().solve(&problem);
        assert_eq!(outcome, NlpOutcome::Failed(NlpFailure::NonFinite));
    }

    #[test]
    fn test_dimension_mismatch_is_invalid() {
        let problem = NlpProblem::new(|x: &[f64]| x[0])
            .with_bounds(vec![(0.0, 1.0), (0.0, 1.0)])
            .with_initial(vec![0.5]);
        let outcome = AugmentedLagrangian::new().solve(&problem);
        assert_eq!(outcome, NlpOutcome::Failed(NlpFailure::InvalidProblem));
    }

    #[test]
    fn test_unsatisfiable_equality_reports_iteration_limit() {
        // x is boxed to [0, 1] but the constraint wants x = 5.
        let problem = NlpProblem::new(|x: &[f64]| x[0])
            .with_equality(|x: &[f64]| x[0] - 5.0)
            .with_bounds(vec![(0.0, 1.0)])
            .with_initial(vec![0.5]);
        let outcome = AugmentedLagrangian::new()
            .with_iteration_budget(10, 50)
            .solve(&problem);
        assert_eq!(outcome, NlpOutcome::Failed(NlpFailure::IterationLimit));
    }
}
