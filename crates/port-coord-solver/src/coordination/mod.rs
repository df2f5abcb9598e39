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

//! Joint berth allocation and voltage regulation.
//!
//! One mixed-integer program couples the discrete decisions (berth
//! occupancy, service starts, candidate selection, transformer tap) with the
//! continuous ones (PV reactive power, charging power). The objective is the
//! aggregate squared charging power, a tractable proxy for network losses,
//! entered through a piecewise-linear epigraph so the model stays linear.

pub mod err;

pub use err::{CoordinationError, CoordinationStatus};

use crate::coordination::err::{EmptyCandidateSetError, SolverStatusError, UnknownVesselError};
use good_lp::solvers::highs::highs;
use good_lp::*;
use port_coord_core::prelude::Hour;
use port_coord_model::common::{BerthIdentifier, VesselIdentifier};
use port_coord_model::prelude::{
    ArrivalCandidate, CandidateSet, CoordinationSolution, Fleet, LoadForecast, PortProfile,
    PvForecast, SolutionValidator,
};
use std::collections::{BTreeMap, BTreeSet};

const BINARY_ROUND: f64 = 0.5;
const CHARGE_EPSILON_KW: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Wall-clock limit handed to HiGHS.
    pub time_limit_secs: f64,
    /// Tangent cuts approximating the squared charging power per variable.
    pub epigraph_segments: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 30.0,
            epigraph_segments: 4,
        }
    }
}

/// Builds and solves the coordination MILP over all vessels' surviving
/// candidates.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Coordinator {
    #[inline]
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub fn coordinate(
        &self,
        port: &PortProfile,
        fleet: &Fleet,
        candidates: &CandidateSet,
        pv_forecast: &PvForecast,
        load_forecast: &LoadForecast,
    ) -> Result<CoordinationSolution, CoordinationError> {
        let vessels: Vec<(VesselIdentifier, &[ArrivalCandidate])> = candidates.iter().collect();

        // An empty set makes the exactly-one-candidate constraint
        // unsatisfiable; surface that as a structured infeasibility naming
        // the vessel instead of a bare solver status.
        for (vessel, list) in &vessels {
            if list.is_empty() {
                return Err(EmptyCandidateSetError::new(*vessel).into());
            }
        }
        let profiles = vessels
            .iter()
            .map(|(vessel, _)| {
                fleet
                    .get(*vessel)
                    .ok_or_else(|| UnknownVesselError::new(*vessel))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let berths: Vec<_> = port.berths().iter().collect();
        let hours: Vec<Hour> = port.horizon().iter_hours().collect();
        let (nb, nk, nh) = (berths.len(), vessels.len(), hours.len());

        let mut vars = variables!();

        let occupy: Vec<Vec<Vec<Variable>>> = (0..nb)
            .map(|b| {
                (0..nk)
                    .map(|k| {
                        (0..nh)
                            .map(|t| vars.add(variable().binary().name(format!("o_{b}_{k}_{t}"))))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let start: Vec<Vec<Vec<Variable>>> = (0..nb)
            .map(|b| {
                (0..nk)
                    .map(|k| {
                        (0..nh)
                            .map(|t| vars.add(variable().binary().name(format!("s_{b}_{k}_{t}"))))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let select: Vec<Vec<Variable>> = vessels
            .iter()
            .enumerate()
            .map(|(k, (_, list))| {
                (0..list.len())
                    .map(|c| vars.add(variable().binary().name(format!("x_{k}_{c}"))))
                    .collect()
            })
            .collect();
        let tap_range = f64::from(port.tap_range());
        let tap: Vec<Variable> = (0..nh)
            .map(|t| {
                vars.add(
                    variable()
                        .integer()
                        .min(-tap_range)
                        .max(tap_range)
                        .name(format!("tap_{t}")),
                )
            })
            .collect();
        let tap_step: Vec<Variable> = (0..nh)
            .map(|t| {
                vars.add(
                    variable()
                        .min(0.0)
                        .max(2.0 * tap_range)
                        .name(format!("dtap_{t}")),
                )
            })
            .collect();
        let q_bound = port.pv_reactive_bound_kvar();
        let q_pv: Vec<Vec<Variable>> = (0..port.pv_count())
            .map(|p| {
                (0..nh)
                    .map(|t| {
                        vars.add(
                            variable()
                                .min(-q_bound)
                                .max(q_bound)
                                .name(format!("q_{p}_{t}")),
                        )
                    })
                    .collect()
            })
            .collect();
        let p_ch: Vec<Vec<Vec<Variable>>> = (0..nb)
            .map(|b| {
                let rating = berths[b].max_charging_kw();
                (0..nk)
                    .map(|k| {
                        (0..nh)
                            .map(|t| {
                                vars.add(
                                    variable()
                                        .min(0.0)
                                        .max(rating)
                                        .name(format!("p_{b}_{k}_{t}")),
                                )
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let loss_proxy: Vec<Vec<Vec<Variable>>> = (0..nb)
            .map(|b| {
                let rating = berths[b].max_charging_kw();
                (0..nk)
                    .map(|k| {
                        (0..nh)
                            .map(|t| {
                                vars.add(
                                    variable()
                                        .min(0.0)
                                        .max(rating * rating)
                                        .name(format!("z_{b}_{k}_{t}")),
                                )
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        // Objective: sum of the squared-charging-power epigraph variables.
        let objective = loss_proxy
            .iter()
            .flatten()
            .flatten()
            .fold(Expression::from(0.0), |acc, &z| acc + z);

        let mut prob = vars
            .minimise(objective)
            .using(highs)
            .with_time_limit(self.config.time_limit_secs);

        // Tangent cuts: z >= 2a * p - a^2 holds with equality at p = a, so
        // minimizing z tracks p^2 from below.
        let segments = self.config.epigraph_segments.max(1);
        for b in 0..nb {
            let rating = berths[b].max_charging_kw();
            for k in 0..nk {
                for t in 0..nh {
                    for i in 1..=segments {
                        let a = rating * (2 * i - 1) as f64 / (2 * segments) as f64;
                        let expr = Expression::from(0.0)
                            + 1.0 * loss_proxy[b][k][t]
                            + (-2.0 * a) * p_ch[b][k][t];
                        prob.add_constraint(expr.geq(-(a * a)));
                    }
                }
            }
        }

        // Each berth hosts at most one vessel per hour.
        for b in 0..nb {
            for t in 0..nh {
                let sum = (0..nk).fold(Expression::from(0.0), |acc, k| acc + occupy[b][k][t]);
                prob.add_constraint(sum.leq(1.0));
            }
        }
        // Each vessel occupies at most one berth per hour.
        for k in 0..nk {
            for t in 0..nh {
                let sum = (0..nb).fold(Expression::from(0.0), |acc, b| acc + occupy[b][k][t]);
                prob.add_constraint(sum.leq(1.0));
            }
        }
        // Exactly one candidate per vessel.
        for selection in &select {
            let sum = selection
                .iter()
                .fold(Expression::from(0.0), |acc, &s| acc + s);
            prob.add_constraint(sum.eq(1.0));
        }

        for b in 0..nb {
            for k in 0..nk {
                let (_, list) = vessels[k];
                for t in 0..nh {
                    let hour = hours[t];

                    // Closed berth hours host nobody.
                    if !berths[b].is_open_at(hour) {
                        let expr = Expression::from(0.0) + 1.0 * occupy[b][k][t];
                        prob.add_constraint(expr.eq(0.0));
                    }

                    // A vessel cannot berth before its selected arrival.
                    let expr = list
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| c.arrival() <= hour)
                        .fold(
                            Expression::from(0.0) + 1.0 * occupy[b][k][t],
                            |acc, (c, _)| acc + (-1.0) * select[k][c],
                        );
                    prob.add_constraint(expr.leq(0.0));

                    // Service-start marks the rising edge of occupancy.
                    let edge = if t == 0 {
                        Expression::from(0.0) + 1.0 * start[b][k][t] + (-1.0) * occupy[b][k][t]
                    } else {
                        Expression::from(0.0)
                            + 1.0 * start[b][k][t]
                            + (-1.0) * occupy[b][k][t]
                            + 1.0 * occupy[b][k][t - 1]
                    };
                    prob.add_constraint(edge.geq(0.0));
                    let within = Expression::from(0.0) + 1.0 * start[b][k][t]
                        + (-1.0) * occupy[b][k][t];
                    prob.add_constraint(within.leq(0.0));

                    // Charging draws power only while docked.
                    let rating = berths[b].max_charging_kw();
                    let link = Expression::from(0.0) + 1.0 * p_ch[b][k][t]
                        + (-rating) * occupy[b][k][t];
                    prob.add_constraint(link.leq(0.0));
                }
            }
        }

        // One service call per vessel, sized by the berth-specific duration.
        for k in 0..nk {
            let (vessel, _) = vessels[k];
            let starts = (0..nb)
                .flat_map(|b| (0..nh).map(move |t| (b, t)))
                .fold(Expression::from(0.0), |acc, (b, t)| acc + start[b][k][t]);
            prob.add_constraint(starts.eq(1.0));

            for b in 0..nb {
                let duration = port.service_hours(berths[b].id(), vessel) as f64;
                let expr = (0..nh).fold(Expression::from(0.0), |acc, t| {
                    acc + occupy[b][k][t] + (-duration) * start[b][k][t]
                });
                prob.add_constraint(expr.eq(0.0));
            }
        }

        // Hourly shore capacity, corrected for forecast load and PV output.
        for t in 0..nh {
            let hour = hours[t];
            let load = load_forecast.at(hour).unwrap_or(1.0);
            let pv = pv_forecast.at(hour).unwrap_or(0.0);
            let available = (port.charging_capacity_kw() - port.base_load_kw() * load
                + port.pv_peak_kw() * pv)
                .max(0.0);
            let total = (0..nb)
                .flat_map(|b| (0..nk).map(move |k| (b, k)))
                .fold(Expression::from(0.0), |acc, (b, k)| acc + p_ch[b][k][t]);
            prob.add_constraint(total.leq(available));
        }

        // Delivered charge must cover the selected candidate's deficit.
        let efficiency = port.charging_efficiency();
        for k in 0..nk {
            let (_, list) = vessels[k];
            let delivered = (0..nb)
                .flat_map(|b| (0..nh).map(move |t| (b, t)))
                .fold(Expression::from(0.0), |acc, (b, t)| {
                    acc + efficiency * p_ch[b][k][t]
                });
            let expr = list
                .iter()
                .enumerate()
                .fold(delivered, |acc, (c, candidate)| {
                    acc + (-profiles[k].charge_deficit_kwh(candidate.soc())) * select[k][c]
                });
            prob.add_constraint(expr.geq(0.0));
        }

        // Daily tap-switching budget on the OLTC.
        for t in 0..nh {
            let (up, down) = if t == 0 {
                // The tap starts the day at neutral.
                (
                    Expression::from(0.0) + 1.0 * tap_step[t] + (-1.0) * tap[t],
                    Expression::from(0.0) + 1.0 * tap_step[t] + 1.0 * tap[t],
                )
            } else {
                (
                    Expression::from(0.0) + 1.0 * tap_step[t] + (-1.0) * tap[t] + 1.0 * tap[t - 1],
                    Expression::from(0.0) + 1.0 * tap_step[t] + 1.0 * tap[t] + (-1.0) * tap[t - 1],
                )
            };
            prob.add_constraint(up.geq(0.0));
            prob.add_constraint(down.geq(0.0));
        }
        let switches = tap_step
            .iter()
            .fold(Expression::from(0.0), |acc, &s| acc + s);
        prob.add_constraint(switches.leq(f64::from(port.max_tap_switches())));

        tracing::info!(
            berths = nb,
            vessels = nk,
            hours = nh,
            "coordination model built, invoking solver"
        );

        let solution = match prob.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                return Err(SolverStatusError::new(
                    CoordinationStatus::Infeasible,
                    "no berth/voltage assignment satisfies the constraints",
                )
                .into());
            }
            Err(ResolutionError::Unbounded) => {
                return Err(SolverStatusError::new(
                    CoordinationStatus::Other,
                    "model is unbounded",
                )
                .into());
            }
            Err(other) => {
                return Err(
                    SolverStatusError::new(CoordinationStatus::Error, other.to_string()).into(),
                );
            }
        };

        // Extract and re-check the assignment before handing it out.
        let mut occupancy = BTreeSet::new();
        let mut service_starts = BTreeSet::new();
        let mut charging: BTreeMap<(BerthIdentifier, VesselIdentifier, Hour), f64> =
            BTreeMap::new();
        let mut objective_value = 0.0;
        for b in 0..nb {
            for k in 0..nk {
                let key = (berths[b].id(), vessels[k].0);
                for t in 0..nh {
                    if solution.value(occupy[b][k][t]) >= BINARY_ROUND {
                        occupancy.insert((key.0, key.1, hours[t]));
                    }
                    if solution.value(start[b][k][t]) >= BINARY_ROUND {
                        service_starts.insert((key.0, key.1, hours[t]));
                    }
                    let power = solution.value(p_ch[b][k][t]);
                    if power > CHARGE_EPSILON_KW {
                        charging.insert((key.0, key.1, hours[t]), power);
                        objective_value += power * power;
                    }
                }
            }
        }

        let mut chosen = Vec::with_capacity(nk);
        for (k, (vessel, _)) in vessels.iter().enumerate() {
            let index = select[k]
                .iter()
                .position(|&s| solution.value(s) >= BINARY_ROUND);
            match index {
                Some(c) => chosen.push((*vessel, c)),
                None => {
                    return Err(SolverStatusError::new(
                        CoordinationStatus::Other,
                        format!("solver selected no candidate for {vessel}"),
                    )
                    .into());
                }
            }
        }

        let tap_schedule: Vec<i32> = tap
            .iter()
            .map(|&v| solution.value(v).round() as i32)
            .collect();
        let pv_reactive: Vec<Vec<f64>> = q_pv
            .iter()
            .map(|row| row.iter().map(|&v| solution.value(v)).collect())
            .collect();

        let assignment = CoordinationSolution::new(
            port.horizon(),
            occupancy,
            service_starts,
            tap_schedule,
            pv_reactive,
            charging,
            chosen,
            objective_value,
        );
        SolutionValidator::validate(port, candidates, &assignment)?;

        tracing::info!(objective = objective_value, "coordination solved");
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use port_coord_core::prelude::{HourInterval, Quadratic};
    use port_coord_model::prelude::{Berth, VesselProfile, VesselProfileBuilder};
    use port_coord_model::problem::port::PortProfileBuilder;

    fn hour(v: i64) -> Hour {
        Hour::new(v)
    }

    fn iv(a: i64, b: i64) -> HourInterval {
        HourInterval::new(hour(a), hour(b))
    }

    fn vessel(id: usize, capacity: f64) -> VesselProfile {
        VesselProfileBuilder::new(VesselIdentifier::new(id))
            .with_generator(80.0, 300.0, 200.0)
            .with_battery(capacity, 10.0, 60.0)
            .with_service_loads(10.0, 10.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(hour(10), hour(12))
            .with_satisfaction_threshold(0.5)
            .build()
            .unwrap()
    }

    fn candidate(arrival: i64, soc: f64, cost: f64) -> ArrivalCandidate {
        ArrivalCandidate::new(
            hour(arrival),
            soc,
            cost,
            vec![15.0, 15.0],
            vec![200.0, 200.0],
            vec![30.0, 30.0],
        )
        .unwrap()
        .with_satisfaction(1.0)
    }

    fn forecasts(nh: usize) -> (PvForecast, LoadForecast) {
        (
            PvForecast::new(vec![0.0; nh]).unwrap(),
            LoadForecast::new(vec![0.5; nh]).unwrap(),
        )
    }

    #[test]
    fn test_two_vessels_get_disjoint_service() {
        let port = PortProfileBuilder::new()
            .with_berths([
                Berth::always_open(BerthIdentifier::new(0), 200.0, iv(0, 16)),
                Berth::always_open(BerthIdentifier::new(1), 200.0, iv(0, 16)),
            ])
            .with_charging(1000.0, 0.95)
            .with_base_load(300.0)
            .with_horizon(iv(0, 16))
            .build()
            .unwrap();
        let fleet: Fleet = [vessel(1, 120.0), vessel(2, 180.0)].into_iter().collect();

        let mut candidates = CandidateSet::new();
        candidates.insert(VesselIdentifier::new(1), vec![candidate(10, 0.5, 480.0)]);
        candidates.insert(VesselIdentifier::new(2), vec![candidate(10, 0.4, 610.0)]);
        let (pv, load) = forecasts(16);

        let solution = Coordinator::default()
            .coordinate(&port, &fleet, &candidates, &pv, &load)
            .expect("coordination is feasible");

        // Exactly one candidate chosen per vessel (the only one).
        assert_eq!(solution.chosen_candidate(VesselIdentifier::new(1)), Some(0));
        assert_eq!(solution.chosen_candidate(VesselIdentifier::new(2)), Some(0));

        // Both vessels are served for the default two hours.
        for vessel_id in [VesselIdentifier::new(1), VesselIdentifier::new(2)] {
            let occupied = solution
                .iter_occupancy()
                .filter(|&(_, v, _)| v == vessel_id)
                .count();
            assert_eq!(occupied, 2);
        }

        // Shore charge covers each battery's deficit.
        let deficit_1 = (0.9 - 0.5) * 120.0;
        let deficit_2 = (0.9 - 0.4) * 180.0;
        assert!(solution.charging_energy_kwh(VesselIdentifier::new(1)) * 0.95 >= deficit_1 - 1e-3);
        assert!(solution.charging_energy_kwh(VesselIdentifier::new(2)) * 0.95 >= deficit_2 - 1e-3);

        // Tap schedule respects its operating range.
        for &tap in solution.tap_schedule() {
            assert!((-10..=10).contains(&tap));
        }
        assert!(solution.objective() >= 0.0);
    }

    #[test]
    fn test_empty_candidate_set_is_reported_per_vessel() {
        let port = PortProfileBuilder::new()
            .with_berths([Berth::always_open(BerthIdentifier::new(0), 200.0, iv(0, 16))])
            .with_charging(1000.0, 0.95)
            .with_horizon(iv(0, 16))
            .build()
            .unwrap();
        let fleet: Fleet = [vessel(7, 120.0)].into_iter().collect();
        let mut candidates = CandidateSet::new();
        candidates.insert(VesselIdentifier::new(7), vec![]);
        let (pv, load) = forecasts(16);

        let err = Coordinator::default()
            .coordinate(&port, &fleet, &candidates, &pv, &load)
            .unwrap_err();
        assert!(matches!(err, CoordinationError::EmptyCandidates(_)));
        assert_eq!(err.status(), CoordinationStatus::Infeasible);
        assert!(err.to_string().contains("VesselId(7)"));
    }

    #[test]
    fn test_unserveable_vessel_is_infeasible() {
        // The only berth closes at hour 11; a two-hour service starting at
        // or after the arrival hour 10 cannot fit.
        let port = PortProfileBuilder::new()
            .with_berths([Berth::from_windows(
                BerthIdentifier::new(0),
                200.0,
                [iv(0, 11)],
            )])
            .with_charging(1000.0, 0.95)
            .with_horizon(iv(0, 16))
            .build()
            .unwrap();
        let fleet: Fleet = [vessel(1, 120.0)].into_iter().collect();
        let mut candidates = CandidateSet::new();
        // Arrived fully charged, so the charge-demand constraint is slack.
        candidates.insert(VesselIdentifier::new(1), vec![candidate(10, 0.9, 480.0)]);
        let (pv, load) = forecasts(16);

        let err = Coordinator::default()
            .coordinate(&port, &fleet, &candidates, &pv, &load)
            .unwrap_err();
        match err {
            CoordinationError::Solver(e) => {
                assert_eq!(e.status(), CoordinationStatus::Infeasible)
            }
            other => panic!("expected solver infeasibility, got {other:?}"),
        }
    }
}
