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

use crate::coordination::CoordinationError;
use port_coord_model::problem::err::EnvError;

/// Pipeline stages in their fixed forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    RoutePlanning,
    VoyageScheduling,
    SatisfactionFiltering,
    VoltageCoordination,
    FinalSelection,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Init => write!(f, "initialization"),
            Stage::RoutePlanning => write!(f, "route planning"),
            Stage::VoyageScheduling => write!(f, "voyage scheduling"),
            Stage::SatisfactionFiltering => write!(f, "satisfaction filtering"),
            Stage::VoltageCoordination => write!(f, "voltage coordination"),
            Stage::FinalSelection => write!(f, "final selection"),
        }
    }
}

/// A failed run: the stage that failed and why. No partial plan escapes.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Environment { stage: Stage, source: EnvError },
    Coordination { source: CoordinationError },
}

impl PipelineError {
    #[inline]
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Environment { stage, .. } => *stage,
            PipelineError::Coordination { .. } => Stage::VoltageCoordination,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Environment { stage, source } => {
                write!(f, "pipeline failed during {}: {}", stage, source)
            }
            PipelineError::Coordination { source } => {
                write!(
                    f,
                    "pipeline failed during {}: {}",
                    Stage::VoltageCoordination,
                    source
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<CoordinationError> for PipelineError {
    fn from(source: CoordinationError) -> Self {
        PipelineError::Coordination { source }
    }
}
