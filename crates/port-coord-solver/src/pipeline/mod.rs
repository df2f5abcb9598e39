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

//! The orchestrating state machine.
//!
//! Stages run in strict forward order with no branching back:
//! `Init -> RoutePlanning -> VoyageScheduling -> SatisfactionFiltering ->
//! VoltageCoordination -> FinalSelection`. Route failures degrade to a
//! default resistance profile; coordination failures abort the run.

pub mod err;

pub use err::{PipelineError, Stage};

use crate::coordination::{CoordinationError, Coordinator, CoordinatorConfig};
use crate::route::RoutePlanner;
use crate::satisfaction::rank_fleet;
use crate::voyage::{VoyageConfig, VoyageScheduler};
use port_coord_core::prelude::Cell;
use port_coord_model::prelude::{
    Fleet, HarborPlan, LoadForecast, PlanSummary, PortProfile, PvForecast, ResistanceGrid,
    Scenario, WindField,
};
use port_coord_model::problem::err::{EnvError, ForecastTooShortError};

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub route_start: Cell,
    pub route_goal: Cell,
    pub voyage: VoyageConfig,
    pub coordinator: CoordinatorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            route_start: Cell::new(0, 0),
            route_goal: Cell::new(9, 9),
            voyage: VoyageConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

/// Runs the four optimization stages over one fleet and port, assembling
/// the final per-vessel strategies and a summary.
#[derive(Debug, Clone)]
pub struct CoordinatedOptimizer {
    fleet: Fleet,
    port: PortProfile,
    config: PipelineConfig,
}

impl CoordinatedOptimizer {
    pub fn new(fleet: Fleet, port: PortProfile, config: PipelineConfig) -> Self {
        Self {
            fleet,
            port,
            config,
        }
    }

    /// Convenience entry: configuration straight from a loaded scenario.
    pub fn run_scenario(scenario: &Scenario) -> Result<HarborPlan, PipelineError> {
        let config = PipelineConfig {
            route_start: scenario.route_start(),
            route_goal: scenario.route_goal(),
            voyage: VoyageConfig {
                departure: scenario.departure(),
                route_distance_nm: scenario.route_distance_nm(),
                ..VoyageConfig::default()
            },
            coordinator: CoordinatorConfig::default(),
        };
        Self::new(scenario.fleet().clone(), scenario.port().clone(), config).run(
            scenario.wind(),
            scenario.pv_forecast(),
            scenario.load_forecast(),
        )
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub fn run(
        &self,
        wind: &WindField,
        pv_forecast: &PvForecast,
        load_forecast: &LoadForecast,
    ) -> Result<HarborPlan, PipelineError> {
        // Init: the forecasts must cover the whole planning horizon.
        let need = usize::try_from(self.port.horizon().end().value()).unwrap_or(0);
        for len in [pv_forecast.len(), load_forecast.len()] {
            if len < need {
                return Err(PipelineError::Environment {
                    stage: Stage::Init,
                    source: EnvError::from(ForecastTooShortError::new(need, len)),
                });
            }
        }
        tracing::info!(stage = %Stage::Init, vessels = self.fleet.len(), "pipeline started");

        // Route planning: failure is non-fatal, voyage scheduling then runs
        // on the default resistance profile.
        let grid = ResistanceGrid::from_wind(wind);
        let route =
            RoutePlanner::new().find_route(&grid, self.config.route_start, self.config.route_goal);
        if route.is_unreachable() {
            tracing::warn!(
                stage = %Stage::RoutePlanning,
                "no route found, continuing with default resistance"
            );
        } else {
            tracing::info!(
                stage = %Stage::RoutePlanning,
                total_resistance = route.total_cost(),
                cells = route.path().len(),
                "route planned"
            );
        }

        let departure = self.config.voyage.departure;
        let max_cruise_hours = self
            .fleet
            .iter()
            .map(|v| (v.latest_arrival() - departure).value().max(0) as usize)
            .max()
            .unwrap_or(0);
        let resistance_profile = route.resistance_profile(&grid, max_cruise_hours);

        // Voyage scheduling fans out per vessel and joins before filtering.
        tracing::info!(stage = %Stage::VoyageScheduling, "scheduling voyages");
        let scheduler = VoyageScheduler::new(self.config.voyage);
        let candidates = scheduler.schedule_fleet(&self.fleet, &resistance_profile);

        tracing::info!(
            stage = %Stage::SatisfactionFiltering,
            candidates = candidates.total_candidates(),
            "filtering candidates"
        );
        let filtered = rank_fleet(candidates, &self.fleet);

        // Coordination failure is fatal; no partial plan is emitted.
        tracing::info!(stage = %Stage::VoltageCoordination, "coordinating berths and voltage");
        let coordinator = Coordinator::new(self.config.coordinator);
        let coordination = coordinator.coordinate(
            &self.port,
            &self.fleet,
            &filtered,
            pv_forecast,
            load_forecast,
        )?;

        // Final selection: per vessel the surviving candidate with the best
        // satisfaction score, first occurrence winning ties.
        tracing::info!(stage = %Stage::FinalSelection, "selecting final strategies");
        let mut strategies = Vec::with_capacity(filtered.len());
        for (vessel, list) in filtered.iter() {
            let best = list.iter().reduce(|best, c| {
                if c.satisfaction() > best.satisfaction() {
                    c
                } else {
                    best
                }
            });
            match best {
                Some(candidate) => strategies.push((vessel, candidate.clone())),
                None => {
                    // Coordination would already have rejected this; keep
                    // the failure shape identical rather than panicking.
                    return Err(CoordinationError::from(
                        crate::coordination::err::EmptyCandidateSetError::new(vessel),
                    )
                    .into());
                }
            }
        }

        let total_cost: f64 = strategies.iter().map(|(_, c)| c.cost()).sum();
        let mean_satisfaction = if strategies.is_empty() {
            0.0
        } else {
            strategies
                .iter()
                .filter_map(|(_, c)| c.satisfaction())
                .sum::<f64>()
                / strategies.len() as f64
        };
        let summary = PlanSummary::new(
            total_cost,
            mean_satisfaction,
            coordination.objective(),
            strategies.len(),
        );

        tracing::info!(
            total_cost,
            mean_satisfaction,
            vessels = strategies.len(),
            "pipeline succeeded"
        );
        Ok(HarborPlan::new(strategies, coordination, summary))
    }
}
