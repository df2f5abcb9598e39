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

use port_coord_model::common::VesselIdentifier;
use port_coord_model::validation::err::SolutionError;

/// Mixed-integer solver verdict, as seen across the solver boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinationStatus {
    Optimal,
    Infeasible,
    Error,
    Other,
}

impl std::fmt::Display for CoordinationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinationStatus::Optimal => write!(f, "optimal"),
            CoordinationStatus::Infeasible => write!(f, "infeasible"),
            CoordinationStatus::Error => write!(f, "error"),
            CoordinationStatus::Other => write!(f, "other"),
        }
    }
}

/// A vessel reached coordination with no surviving arrival candidate; its
/// exactly-one-candidate constraint cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCandidateSetError {
    vessel: VesselIdentifier,
}

impl EmptyCandidateSetError {
    pub fn new(vessel: VesselIdentifier) -> Self {
        Self { vessel }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for EmptyCandidateSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} produced zero satisfactory candidates", self.vessel)
    }
}

impl std::error::Error for EmptyCandidateSetError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownVesselError {
    vessel: VesselIdentifier,
}

impl UnknownVesselError {
    pub fn new(vessel: VesselIdentifier) -> Self {
        Self { vessel }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for UnknownVesselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "candidate set references {} missing from the fleet", self.vessel)
    }
}

impl std::error::Error for UnknownVesselError {}

/// The solver returned a non-optimal status; carried up unmodified, the
/// caller decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatusError {
    status: CoordinationStatus,
    detail: String,
}

impl SolverStatusError {
    pub fn new(status: CoordinationStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> CoordinationStatus {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl std::fmt::Display for SolverStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "solver finished with status {}: {}", self.status, self.detail)
    }
}

impl std::error::Error for SolverStatusError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinationError {
    EmptyCandidates(EmptyCandidateSetError),
    UnknownVessel(UnknownVesselError),
    Solver(SolverStatusError),
    Validation(SolutionError),
}

impl CoordinationError {
    /// The solver-boundary status this failure maps to.
    pub fn status(&self) -> CoordinationStatus {
        match self {
            CoordinationError::EmptyCandidates(_) => CoordinationStatus::Infeasible,
            CoordinationError::UnknownVessel(_) => CoordinationStatus::Error,
            CoordinationError::Solver(e) => e.status(),
            CoordinationError::Validation(_) => CoordinationStatus::Error,
        }
    }
}

impl std::fmt::Display for CoordinationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinationError::EmptyCandidates(e) => write!(f, "{}", e),
            CoordinationError::UnknownVessel(e) => write!(f, "{}", e),
            CoordinationError::Solver(e) => write!(f, "{}", e),
            CoordinationError::Validation(e) => write!(f, "assignment validation failed: {}", e),
        }
    }
}

impl std::error::Error for CoordinationError {}

impl From<EmptyCandidateSetError> for CoordinationError {
    fn from(err: EmptyCandidateSetError) -> Self {
        CoordinationError::EmptyCandidates(err)
    }
}

impl From<UnknownVesselError> for CoordinationError {
    fn from(err: UnknownVesselError) -> Self {
        CoordinationError::UnknownVessel(err)
    }
}

impl From<SolverStatusError> for CoordinationError {
    fn from(err: SolverStatusError) -> Self {
        CoordinationError::Solver(err)
    }
}

impl From<SolutionError> for CoordinationError {
    fn from(err: SolutionError) -> Self {
        CoordinationError::Validation(err)
    }
}
