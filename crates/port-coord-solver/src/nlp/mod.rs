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

//! The nonlinear-solver boundary.
//!
//! Voyage scheduling hands a [`NlpProblem`] (objective, equality
//! constraints, box bounds, initial point) to an [`NlpSolver`] and gets back
//! an [`NlpOutcome`]. The caller treats the backend as opaque: convergence
//! failures, iteration limits, timeouts and numerical breakdowns all surface
//! as [`NlpOutcome::Failed`] and are handled identically.

pub mod auglag;

pub use auglag::AugmentedLagrangian;

type ScalarFn<'a> = Box<dyn Fn(&[f64]) -> f64 + Send + Sync + 'a>;

/// A box-bounded, equality-constrained minimization problem.
pub struct NlpProblem<'a> {
    objective: ScalarFn<'a>,
    equalities: Vec<ScalarFn<'a>>,
    bounds: Vec<(f64, f64)>,
    initial: Vec<f64>,
}

impl<'a> NlpProblem<'a> {
    pub fn new<F>(objective: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'a,
    {
        Self {
            objective: Box::new(objective),
            equalities: Vec::new(),
            bounds: Vec::new(),
            initial: Vec::new(),
        }
    }

    /// Add an equality constraint `c(x) == 0`.
    pub fn with_equality<F>(mut self, constraint: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'a,
    {
        self.equalities.push(Box::new(constraint));
        self
    }

    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_initial(mut self, initial: Vec<f64>) -> Self {
        self.initial = initial;
        self
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn objective(&self, x: &[f64]) -> f64 {
        (self.objective)(x)
    }

    #[inline]
    pub fn equality_count(&self) -> usize {
        self.equalities.len()
    }

    #[inline]
    pub fn equality(&self, j: usize, x: &[f64]) -> f64 {
        (self.equalities[j])(x)
    }

    #[inline]
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    #[inline]
    pub fn initial(&self) -> &[f64] {
        &self.initial
    }
}

impl std::fmt::Debug for NlpProblem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpProblem")
            .field("dimension", &self.dimension())
            .field("equalities", &self.equalities.len())
            .finish()
    }
}

/// A converged point.
#[derive(Debug, Clone, PartialEq)]
pub struct NlpSolution {
    x: Vec<f64>,
    objective: f64,
}

impl NlpSolution {
    pub fn new(x: Vec<f64>, objective: f64) -> Self {
        Self { x, objective }
    }

    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

/// Why a solve produced no usable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlpFailure {
    /// The iteration budget ran out before the constraints were met.
    IterationLimit,
    /// An objective or constraint evaluation stopped being finite.
    NonFinite,
    /// The wall-clock budget ran out.
    TimedOut,
    /// Dimensions of bounds and initial point disagree.
    InvalidProblem,
}

impl std::fmt::Display for NlpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NlpFailure::IterationLimit => write!(f, "iteration limit reached without convergence"),
            NlpFailure::NonFinite => write!(f, "objective or constraint became non-finite"),
            NlpFailure::TimedOut => write!(f, "solver wall-clock budget exhausted"),
            NlpFailure::InvalidProblem => write!(f, "problem dimensions are inconsistent"),
        }
    }
}

impl std::error::Error for NlpFailure {}

#[derive(Debug, Clone, PartialEq)]
pub enum NlpOutcome {
    Converged(NlpSolution),
    Failed(NlpFailure),
}

impl NlpOutcome {
    #[inline]
    pub fn into_converged(self) -> Result<NlpSolution, NlpFailure> {
        match self {
            NlpOutcome::Converged(s) => Ok(s),
            NlpOutcome::Failed(e) => Err(e),
        }
    }
}

/// Pluggable backend; see the module docs for the contract.
pub trait NlpSolver {
    fn solve(&self, problem: &NlpProblem<'_>) -> NlpOutcome;
}
