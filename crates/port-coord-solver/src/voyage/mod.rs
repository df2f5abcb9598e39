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

use crate::nlp::{AugmentedLagrangian, NlpFailure, NlpProblem, NlpSolver};
use port_coord_core::prelude::Hour;
use port_coord_model::prelude::{ArrivalCandidate, CandidateSet, Fleet, VesselProfile};
use port_coord_model::solution::candidate::ProfileLengthMismatchError;
use rayon::prelude::*;

/// Propulsion-power curve coefficients: `P = rho1 * v^rho2 * (1 + f)`.
pub const RHO1: f64 = 0.0355;
pub const RHO2: f64 = 3.165;

/// Cycle-life curve `L = alpha0 * exp(alpha1 * DOD + alpha2)`.
const ALPHA0: f64 = 1.69e4;
const ALPHA1: f64 = -0.24;
const ALPHA2: f64 = -2.57;

/// Minimum operable state of charge the voyage may end at.
const SOC_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct VoyageConfig {
    pub departure: Hour,
    pub route_distance_nm: f64,
    pub velocity_min_kn: f64,
    pub velocity_max_kn: f64,
    /// Resistance assumed for hours the profile does not cover.
    pub default_resistance: f64,
}

impl Default for VoyageConfig {
    fn default() -> Self {
        Self {
            departure: Hour::new(8),
            route_distance_nm: 30.0,
            velocity_min_kn: 5.0,
            velocity_max_kn: 20.0,
            default_resistance: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonPositiveCruiseError {
    arrival: Hour,
    departure: Hour,
}

impl NonPositiveCruiseError {
    pub fn new(arrival: Hour, departure: Hour) -> Self {
        Self { arrival, departure }
    }

    pub fn arrival(&self) -> Hour {
        self.arrival
    }

    pub fn departure(&self) -> Hour {
        self.departure
    }
}

impl std::fmt::Display for NonPositiveCruiseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "arrival {} is not after departure {}",
            self.arrival, self.departure
        )
    }
}

impl std::error::Error for NonPositiveCruiseError {}

#[derive(Debug, Clone, PartialEq)]
pub enum VoyageError {
    NonPositiveCruise(NonPositiveCruiseError),
    Solver(NlpFailure),
    Profile(ProfileLengthMismatchError),
}

impl std::fmt::Display for VoyageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoyageError::NonPositiveCruise(e) => write!(f, "{}", e),
            VoyageError::Solver(e) => write!(f, "dispatch solve failed: {}", e),
            VoyageError::Profile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VoyageError {}

impl From<NonPositiveCruiseError> for VoyageError {
    fn from(err: NonPositiveCruiseError) -> Self {
        VoyageError::NonPositiveCruise(err)
    }
}

impl From<NlpFailure> for VoyageError {
    fn from(err: NlpFailure) -> Self {
        VoyageError::Solver(err)
    }
}

impl From<ProfileLengthMismatchError> for VoyageError {
    fn from(err: ProfileLengthMismatchError) -> Self {
        VoyageError::Profile(err)
    }
}

/// Per-vessel voyage dispatch: one nonlinear program per candidate arrival
/// hour, minimizing fuel plus battery degradation under power balance and
/// the fixed route distance.
#[derive(Debug, Clone)]
pub struct VoyageScheduler<S = AugmentedLagrangian> {
    config: VoyageConfig,
    solver: S,
}

impl VoyageScheduler<AugmentedLagrangian> {
    #[inline]
    pub fn new(config: VoyageConfig) -> Self {
        Self {
            config,
            solver: AugmentedLagrangian::new(),
        }
    }
}

impl<S: NlpSolver> VoyageScheduler<S> {
    #[inline]
    pub fn with_solver(config: VoyageConfig, solver: S) -> Self {
        Self { config, solver }
    }

    #[inline]
    pub fn config(&self) -> &VoyageConfig {
        &self.config
    }

    /// `P_pl = rho1 * v^rho2 * (1 + f)`, in kW.
    #[inline]
    pub fn propulsion_power_kw(velocity_kn: f64, resistance: f64) -> f64 {
        RHO1 * velocity_kn.powf(RHO2) * (1.0 + resistance)
    }

    /// Degradation cost of discharging at `power_kw` for one hour, from the
    /// depth-of-discharge cycle-life curve.
    #[inline]
    fn degradation_cost(vessel: &VesselProfile, power_kw: f64) -> f64 {
        let dod = power_kw / vessel.ess_capacity_kwh();
        let life = ALPHA0 * (ALPHA1 * dod + ALPHA2).exp();
        vessel.ess_investment_cost() * power_kw / (life * vessel.ess_capacity_kwh())
    }

    /// Solve the dispatch for one candidate arrival hour.
    pub fn schedule(
        &self,
        vessel: &VesselProfile,
        arrival: Hour,
        resistance_profile: &[f64],
    ) -> Result<ArrivalCandidate, VoyageError> {
        let cruise = (arrival - self.config.departure).value();
        if cruise <= 0 {
            return Err(NonPositiveCruiseError::new(arrival, self.config.departure).into());
        }
        let hours = cruise as usize;

        let resistance: Vec<f64> = (0..hours)
            .map(|t| {
                resistance_profile
                    .get(t)
                    .copied()
                    .unwrap_or(self.config.default_resistance)
            })
            .collect();

        // Decision vector: velocities, generator output, discharge power.
        let service = vessel.service_load_cruise_kw();
        let capacity = vessel.ess_capacity_kwh();
        let distance = self.config.route_distance_nm;

        let mut problem = NlpProblem::new(move |x: &[f64]| {
            let mut cost = 0.0;
            for t in 0..hours {
                let generated = x[hours + t];
                let discharged = x[2 * hours + t];
                cost += vessel.fuel_curve().eval(generated);
                cost += Self::degradation_cost(vessel, discharged);
            }
            cost
        });

        for (t, &f_t) in resistance.iter().enumerate() {
            problem = problem.with_equality(move |x: &[f64]| {
                let velocity = x[t];
                let generated = x[hours + t];
                let discharged = x[2 * hours + t];
                generated + discharged - Self::propulsion_power_kw(velocity, f_t) - service
            });
        }
        problem = problem
            .with_equality(move |x: &[f64]| x[..hours].iter().sum::<f64>() - distance);

        let mut bounds = Vec::with_capacity(3 * hours);
        bounds.extend(
            std::iter::repeat((self.config.velocity_min_kn, self.config.velocity_max_kn))
                .take(hours),
        );
        bounds.extend(std::iter::repeat((vessel.dsg_min_kw(), vessel.dsg_max_kw())).take(hours));
        bounds.extend(
            std::iter::repeat((vessel.discharge_min_kw(), vessel.discharge_max_kw())).take(hours),
        );

        let v0 = (distance / hours as f64)
            .clamp(self.config.velocity_min_kn, self.config.velocity_max_kn);
        let mut initial = vec![v0; hours];
        for &f_t in &resistance {
            let demand = Self::propulsion_power_kw(v0, f_t) + service;
            initial.push(
                (demand - vessel.discharge_min_kw()).clamp(vessel.dsg_min_kw(), vessel.dsg_max_kw()),
            );
        }
        initial.extend(std::iter::repeat(vessel.discharge_min_kw()).take(hours));

        let problem = problem.with_bounds(bounds).with_initial(initial);
        let solution = self.solver.solve(&problem).into_converged()?;

        let x = solution.x();
        let velocity_profile = x[..hours].to_vec();
        let generator_profile = x[hours..2 * hours].to_vec();
        let discharge_profile = x[2 * hours..].to_vec();

        let total_discharge: f64 = discharge_profile.iter().sum();
        let soc = (vessel.initial_soc()
            - total_discharge / (capacity * vessel.discharge_efficiency()))
        .clamp(SOC_FLOOR, 1.0);

        Ok(ArrivalCandidate::new(
            arrival,
            soc,
            solution.objective(),
            velocity_profile,
            generator_profile,
            discharge_profile,
        )?)
    }

    /// Try every arrival hour in the vessel's window; infeasible hours are
    /// dropped, never retried.
    pub fn schedule_window(
        &self,
        vessel: &VesselProfile,
        resistance_profile: &[f64],
    ) -> Vec<ArrivalCandidate> {
        let mut candidates = Vec::new();
        for arrival in vessel.arrival_hours() {
            match self.schedule(vessel, arrival, resistance_profile) {
                Ok(candidate) => candidates.push(candidate),
                Err(err) => {
                    tracing::debug!(
                        vessel = %vessel.id(),
                        arrival = %arrival,
                        "dropping arrival candidate: {}",
                        err
                    );
                }
            }
        }
        candidates
    }

    /// Fan the per-vessel windows out over a worker pool and collect before
    /// the filtering stage starts.
    pub fn schedule_fleet(&self, fleet: &Fleet, resistance_profile: &[f64]) -> CandidateSet
    where
        S: Sync,
    {
        let vessels: Vec<&VesselProfile> = fleet.iter().collect();
        let scheduled: Vec<_> = vessels
            .par_iter()
            .map(|vessel| (vessel.id(), self.schedule_window(vessel, resistance_profile)))
            .collect();

        let mut set = CandidateSet::new();
        for (vessel, candidates) in scheduled {
            tracing::info!(vessel = %vessel, count = candidates.len(), "voyage candidates generated");
            set.insert(vessel, candidates);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use port_coord_core::prelude::Quadratic;
    use port_coord_model::common::VesselIdentifier;
    use port_coord_model::prelude::VesselProfileBuilder;

    fn vessel() -> VesselProfile {
        VesselProfileBuilder::new(VesselIdentifier::new(1))
            .with_generator(80.0, 300.0, 200.0)
            .with_battery(120.0, 10.0, 60.0)
            .with_service_loads(10.0, 10.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .with_satisfaction_threshold(0.5)
            .build()
            .unwrap()
    }

    const PROFILE: [f64; 4] = [0.15, 0.20, 0.18, 0.22];

    #[test]
    fn test_propulsion_power_curve() {
        let p = VoyageScheduler::<AugmentedLagrangian>::propulsion_power_kw(15.0, 0.0);
        assert!((p - RHO1 * 15.0_f64.powf(RHO2)).abs() < 1e-9);
        let with_resistance =
            VoyageScheduler::<AugmentedLagrangian>::propulsion_power_kw(15.0, 0.2);
        assert!((with_resistance - 1.2 * p).abs() < 1e-9);
    }

    #[test]
    fn test_feasible_arrival_hour() {
        let scheduler = VoyageScheduler::new(VoyageConfig::default());
        let candidate = scheduler
            .schedule(&vessel(), Hour::new(10), &PROFILE)
            .expect("two cruise hours are feasible");

        assert_eq!(candidate.cruise_hours(), 2);
        assert!((0.1..=1.0).contains(&candidate.soc()));
        let travelled: f64 = candidate.velocity_profile().iter().sum();
        assert!((travelled - 30.0).abs() < 1e-2);
        assert!(candidate.cost() > 0.0);

        for &v in candidate.velocity_profile() {
            assert!((5.0 - 1e-6..=20.0 + 1e-6).contains(&v));
        }
        for (t, &p) in candidate.generator_profile().iter().enumerate() {
            let d = candidate.discharge_profile()[t];
            assert!((80.0 - 1e-6..=300.0 + 1e-6).contains(&p));
            assert!((10.0 - 1e-6..=60.0 + 1e-6).contains(&d));
            // Power balance within the solver tolerance.
            let demand = VoyageScheduler::<AugmentedLagrangian>::propulsion_power_kw(
                candidate.velocity_profile()[t],
                PROFILE[t],
            ) + 10.0;
            assert!((p + d - demand).abs() < 1e-2);
        }
    }

    #[test]
    fn test_non_positive_cruise_is_infeasible() {
        let scheduler = VoyageScheduler::new(VoyageConfig::default());
        let err = scheduler
            .schedule(&vessel(), Hour::new(8), &PROFILE)
            .unwrap_err();
        assert!(matches!(err, VoyageError::NonPositiveCruise(_)));
    }

    #[test]
    fn test_window_drops_infeasible_hours() {
        // Three or four cruise hours cannot hold the per-hour power balance:
        // covering 30 nm that slowly leaves the generator below its minimum.
        let scheduler = VoyageScheduler::new(VoyageConfig::default());
        let candidates = scheduler.schedule_window(&vessel(), &PROFILE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].arrival(), Hour::new(10));
    }

    #[test]
    fn test_fleet_scheduling_preserves_fleet_order() {
        let second = VesselProfileBuilder::new(VesselIdentifier::new(2))
            .with_generator(120.0, 400.0, 200.0)
            .with_battery(180.0, 10.0, 90.0)
            .with_service_loads(20.0, 20.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .with_satisfaction_threshold(0.5);
        let fleet: Fleet = [vessel(), second.build().unwrap()].into_iter().collect();

        let scheduler = VoyageScheduler::new(VoyageConfig::default());
        let set = scheduler.schedule_fleet(&fleet, &PROFILE);
        let ids: Vec<usize> = set.iter().map(|(id, _)| id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2]);
        for (_, candidates) in set.iter() {
            assert!(!candidates.is_empty());
        }
    }
}
