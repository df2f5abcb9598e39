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

use chrono::{DateTime, Utc};
use port_coord_core::prelude::{Cell, Hour, HourInterval, Quadratic};
use port_coord_model::common::{BerthIdentifier, VesselIdentifier};
use port_coord_model::prelude::{
    Berth, Fleet, HarborPlan, LoadForecast, PvForecast, Scenario, ScenarioLoader,
    VesselProfileBuilder, WindField,
};
use port_coord_model::problem::port::PortProfileBuilder;
use port_coord_solver::pipeline::CoordinatedOptimizer;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Serialize)]
struct StrategyRecord {
    vessel: usize,
    arrival_hour: i64,
    soc: f64,
    cost: f64,
    satisfaction: f64,
}

#[derive(Serialize)]
struct RunRecord {
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    success: bool,
    error: Option<String>,
    total_cost: Option<f64>,
    mean_satisfaction: Option<f64>,
    power_loss_proxy: Option<f64>,
    strategies: Vec<StrategyRecord>,
}

impl RunRecord {
    fn from_plan(
        start_ts: DateTime<Utc>,
        end_ts: DateTime<Utc>,
        runtime_ms: u128,
        plan: &HarborPlan,
    ) -> Self {
        let strategies = plan
            .strategies()
            .map(|(vessel, strategy)| StrategyRecord {
                vessel: vessel.into_inner(),
                arrival_hour: strategy.arrival().value(),
                soc: strategy.soc(),
                cost: strategy.cost(),
                satisfaction: strategy.satisfaction().unwrap_or(0.0),
            })
            .collect();
        Self {
            start_ts,
            end_ts,
            runtime_ms,
            success: true,
            error: None,
            total_cost: Some(plan.summary().total_cost()),
            mean_satisfaction: Some(plan.summary().mean_satisfaction()),
            power_loss_proxy: Some(plan.summary().coordination_objective()),
            strategies,
        }
    }

    fn from_error(
        start_ts: DateTime<Utc>,
        end_ts: DateTime<Utc>,
        runtime_ms: u128,
        error: String,
    ) -> Self {
        Self {
            start_ts,
            end_ts,
            runtime_ms,
            success: false,
            error: Some(error),
            total_cost: None,
            mean_satisfaction: None,
            power_loss_proxy: None,
            strategies: Vec::new(),
        }
    }
}

/// The two-ship reference fleet and 16-bus seaport used when no scenario
/// file is given.
fn sample_scenario() -> Scenario {
    let fleet: Fleet = [
        VesselProfileBuilder::new(VesselIdentifier::new(1))
            .with_generator(80.0, 300.0, 200.0)
            .with_battery(120.0, 10.0, 60.0)
            .with_service_loads(10.0, 10.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .with_satisfaction_threshold(0.5)
            .build()
            .expect("vessel 1 profile is valid"),
        VesselProfileBuilder::new(VesselIdentifier::new(2))
            .with_generator(120.0, 400.0, 200.0)
            .with_battery(180.0, 10.0, 90.0)
            .with_service_loads(20.0, 20.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .with_satisfaction_threshold(0.5)
            .build()
            .expect("vessel 2 profile is valid"),
    ]
    .into_iter()
    .collect();

    let horizon = HourInterval::new(Hour::new(0), Hour::new(24));
    let port = PortProfileBuilder::new()
        .with_bus_count(16)
        .with_berths((0..3).map(|i| Berth::always_open(BerthIdentifier::new(i), 200.0, horizon)))
        .with_voltage_band(0.95, 1.05)
        .with_tap(10, 10)
        .with_pv(4, 50.0, 250.0)
        .with_base_load(300.0)
        .with_charging(1000.0, 0.95)
        .with_horizon(horizon)
        .build()
        .expect("sample port profile is valid");

    // Reproducible weather for the sample chart.
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let levels: Vec<u8> = (0..100).map(|_| rng.gen_range(0..4)).collect();
    let wind = WindField::new(10, 10, levels).expect("sample wind field is valid");

    let pv_forecast = PvForecast::new(vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.2, 0.5, 0.8, 1.0, 0.9, 0.8, 0.6, 0.4, 0.2, 0.1, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ])
    .expect("sample pv forecast is valid");
    let load_forecast = LoadForecast::new(vec![
        0.7, 0.6, 0.7, 0.8, 0.9, 0.85, 0.8, 0.9, 1.0, 0.8, 0.7, 0.7, 0.8, 0.9, 1.0, 0.9, 0.8, 0.7,
        0.7, 0.8, 0.9, 0.8, 0.7, 0.7,
    ])
    .expect("sample load forecast is valid");

    Scenario::new(
        fleet,
        port,
        wind,
        pv_forecast,
        load_forecast,
        Cell::new(0, 0),
        Cell::new(9, 9),
        30.0,
        Hour::new(8),
    )
}

fn main() {
    enable_tracing();

    let scenario = match std::env::args().nth(1) {
        Some(path) => match ScenarioLoader::new().from_path(&path) {
            Ok(scenario) => scenario,
            Err(err) => {
                eprintln!("failed to load scenario {path}: {err}");
                std::process::exit(2);
            }
        },
        None => sample_scenario(),
    };

    tracing::info!(
        vessels = scenario.fleet().len(),
        berths = scenario.port().berths().len(),
        "starting coordinated optimization"
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let result = CoordinatedOptimizer::run_scenario(&scenario);
    let runtime_ms = t0.elapsed().as_millis();
    let end_ts = Utc::now();

    let (record, code) = match &result {
        Ok(plan) => {
            for (vessel, strategy) in plan.strategies() {
                tracing::info!(
                    vessel = %vessel,
                    arrival = %strategy.arrival(),
                    soc = strategy.soc(),
                    satisfaction = strategy.satisfaction().unwrap_or(0.0),
                    "final strategy"
                );
            }
            (
                RunRecord::from_plan(start_ts, end_ts, runtime_ms, plan),
                0,
            )
        }
        Err(err) => {
            tracing::error!(stage = %err.stage(), "run failed: {err}");
            (
                RunRecord::from_error(start_ts, end_ts, runtime_ms, err.to_string()),
                1,
            )
        }
    };

    let json = serde_json::to_string_pretty(&record).expect("run record serializes");
    println!("{json}");
    std::process::exit(code);
}
