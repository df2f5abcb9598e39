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

use crate::common::{BerthIdentifier, VesselIdentifier};
use crate::problem::env::{LoadForecast, PvForecast, WindField};
use crate::problem::err::{EnvError, ForecastTooShortError, PortProfileError, VesselProfileError};
use crate::problem::fleet::Fleet;
use crate::problem::port::{Berth, PortProfile, PortProfileBuilder};
use crate::problem::vessel::VesselProfileBuilder;
use port_coord_core::prelude::{Cell, Hour, HourInterval, Quadratic};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Everything one coordinated run consumes, validated and immutable.
#[derive(Debug, Clone)]
pub struct Scenario {
    fleet: Fleet,
    port: PortProfile,
    wind: WindField,
    pv_forecast: PvForecast,
    load_forecast: LoadForecast,
    route_start: Cell,
    route_goal: Cell,
    route_distance_nm: f64,
    departure: Hour,
}

impl Scenario {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fleet: Fleet,
        port: PortProfile,
        wind: WindField,
        pv_forecast: PvForecast,
        load_forecast: LoadForecast,
        route_start: Cell,
        route_goal: Cell,
        route_distance_nm: f64,
        departure: Hour,
    ) -> Self {
        Self {
            fleet,
            port,
            wind,
            pv_forecast,
            load_forecast,
            route_start,
            route_goal,
            route_distance_nm,
            departure,
        }
    }

    #[inline]
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    #[inline]
    pub fn port(&self) -> &PortProfile {
        &self.port
    }

    #[inline]
    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    #[inline]
    pub fn pv_forecast(&self) -> &PvForecast {
        &self.pv_forecast
    }

    #[inline]
    pub fn load_forecast(&self) -> &LoadForecast {
        &self.load_forecast
    }

    #[inline]
    pub fn route_start(&self) -> Cell {
        self.route_start
    }

    #[inline]
    pub fn route_goal(&self) -> Cell {
        self.route_goal
    }

    #[inline]
    pub fn route_distance_nm(&self) -> f64 {
        self.route_distance_nm
    }

    #[inline]
    pub fn departure(&self) -> Hour {
        self.departure
    }
}

#[derive(Debug, Deserialize)]
struct VesselSpec {
    id: usize,
    dsg_min_kw: f64,
    dsg_max_kw: f64,
    #[serde(default)]
    ramp_kw: f64,
    ess_capacity_kwh: f64,
    discharge_min_kw: f64,
    discharge_max_kw: f64,
    discharge_efficiency: Option<f64>,
    initial_soc: Option<f64>,
    target_soc: Option<f64>,
    #[serde(default)]
    service_load_cruise_kw: f64,
    #[serde(default)]
    service_load_berth_kw: f64,
    fuel_c2: f64,
    fuel_c1: f64,
    fuel_c0: f64,
    #[serde(default)]
    ess_investment_cost: f64,
    earliest_arrival: i64,
    latest_arrival: i64,
    satisfaction_threshold: f64,
}

#[derive(Debug, Deserialize)]
struct BerthSpec {
    id: usize,
    max_charging_kw: f64,
    /// Half-open `[start, end)` opening windows; omitted means the whole
    /// horizon.
    windows: Option<Vec<[i64; 2]>>,
}

#[derive(Debug, Deserialize)]
struct ServiceHoursSpec {
    berth: usize,
    vessel: usize,
    hours: i64,
}

#[derive(Debug, Deserialize)]
struct PortSpec {
    bus_count: usize,
    berths: Vec<BerthSpec>,
    voltage_band: [f64; 2],
    tap_range: i32,
    max_tap_switches: i32,
    pv_count: usize,
    pv_reactive_bound_kvar: f64,
    #[serde(default)]
    pv_peak_kw: f64,
    #[serde(default)]
    base_load_kw: f64,
    charging_capacity_kw: f64,
    charging_efficiency: Option<f64>,
    horizon: [i64; 2],
    #[serde(default)]
    service_hours: Vec<ServiceHoursSpec>,
    default_service_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WindSpec {
    rows: usize,
    cols: usize,
    levels: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct RouteSpec {
    start: [usize; 2],
    goal: [usize; 2],
    distance_nm: f64,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    departure_hour: i64,
    route: RouteSpec,
    wind: WindSpec,
    pv_forecast: Vec<f64>,
    load_forecast: Vec<f64>,
    port: PortSpec,
    vessels: Vec<VesselSpec>,
}

#[derive(Debug)]
pub enum ScenarioLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Vessel(VesselProfileError),
    Port(PortProfileError),
    Env(EnvError),
}

impl From<std::io::Error> for ScenarioLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioLoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<VesselProfileError> for ScenarioLoadError {
    fn from(e: VesselProfileError) -> Self {
        Self::Vessel(e)
    }
}

impl From<PortProfileError> for ScenarioLoadError {
    fn from(e: PortProfileError) -> Self {
        Self::Port(e)
    }
}

impl From<EnvError> for ScenarioLoadError {
    fn from(e: EnvError) -> Self {
        Self::Env(e)
    }
}

impl std::fmt::Display for ScenarioLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ScenarioLoadError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Json(e) => write!(f, "JSON error: {e}"),
            Vessel(e) => write!(f, "vessel profile error: {e}"),
            Port(e) => write!(f, "port profile error: {e}"),
            Env(e) => write!(f, "environment error: {e}"),
        }
    }
}

impl std::error::Error for ScenarioLoadError {}

/// Reads a [`Scenario`] from JSON and runs the model validations.
#[derive(Debug, Clone, Default)]
pub struct ScenarioLoader;

impl ScenarioLoader {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Scenario, ScenarioLoadError> {
        let file = std::fs::File::open(path)?;
        self.from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Scenario, ScenarioLoadError> {
        let raw: ScenarioFile = serde_json::from_reader(reader)?;
        self.assemble(raw)
    }

    pub fn from_str(&self, json: &str) -> Result<Scenario, ScenarioLoadError> {
        let raw: ScenarioFile = serde_json::from_str(json)?;
        self.assemble(raw)
    }

    fn assemble(&self, raw: ScenarioFile) -> Result<Scenario, ScenarioLoadError> {
        let horizon = HourInterval::new(Hour::new(raw.port.horizon[0]), Hour::new(raw.port.horizon[1]));

        let berths = raw.port.berths.into_iter().map(|b| {
            let id = BerthIdentifier::new(b.id);
            match b.windows {
                Some(ws) => Berth::from_windows(
                    id,
                    b.max_charging_kw,
                    ws.into_iter()
                        .map(|[s, e]| HourInterval::new(Hour::new(s), Hour::new(e))),
                ),
                None => Berth::always_open(id, b.max_charging_kw, horizon),
            }
        });

        let mut port = PortProfileBuilder::new()
            .with_bus_count(raw.port.bus_count)
            .with_berths(berths)
            .with_voltage_band(raw.port.voltage_band[0], raw.port.voltage_band[1])
            .with_tap(raw.port.tap_range, raw.port.max_tap_switches)
            .with_pv(
                raw.port.pv_count,
                raw.port.pv_reactive_bound_kvar,
                raw.port.pv_peak_kw,
            )
            .with_base_load(raw.port.base_load_kw)
            .with_charging(
                raw.port.charging_capacity_kw,
                raw.port.charging_efficiency.unwrap_or(0.95),
            )
            .with_horizon(horizon);
        if let Some(hours) = raw.port.default_service_hours {
            port = port.with_default_service_hours(hours);
        }
        for sh in raw.port.service_hours {
            port = port.with_service_hours(
                BerthIdentifier::new(sh.berth),
                VesselIdentifier::new(sh.vessel),
                sh.hours,
            );
        }
        let port = port.build()?;

        let mut fleet = Fleet::with_capacity(raw.vessels.len());
        for v in raw.vessels {
            let mut builder = VesselProfileBuilder::new(VesselIdentifier::new(v.id))
                .with_generator(v.dsg_min_kw, v.dsg_max_kw, v.ramp_kw)
                .with_battery(v.ess_capacity_kwh, v.discharge_min_kw, v.discharge_max_kw)
                .with_service_loads(v.service_load_cruise_kw, v.service_load_berth_kw)
                .with_fuel_curve(Quadratic::new(v.fuel_c2, v.fuel_c1, v.fuel_c0))
                .with_ess_investment_cost(v.ess_investment_cost)
                .with_arrival_window(Hour::new(v.earliest_arrival), Hour::new(v.latest_arrival))
                .with_satisfaction_threshold(v.satisfaction_threshold);
            if let Some(eta) = v.discharge_efficiency {
                builder = builder.with_discharge_efficiency(eta);
            }
            builder = builder
                .with_charge_state(v.initial_soc.unwrap_or(0.9), v.target_soc.unwrap_or(0.9));
            fleet.insert(builder.build()?);
        }

        let wind = WindField::new(raw.wind.rows, raw.wind.cols, raw.wind.levels)?;

        let need = usize::try_from(horizon.end().value()).unwrap_or(0);
        if raw.pv_forecast.len() < need {
            return Err(EnvError::from(ForecastTooShortError::new(need, raw.pv_forecast.len())).into());
        }
        if raw.load_forecast.len() < need {
            return Err(
                EnvError::from(ForecastTooShortError::new(need, raw.load_forecast.len())).into(),
            );
        }
        let pv_forecast = PvForecast::new(raw.pv_forecast)?;
        let load_forecast = LoadForecast::new(raw.load_forecast)?;

        Ok(Scenario::new(
            fleet,
            port,
            wind,
            pv_forecast,
            load_forecast,
            Cell::new(raw.route.start[0], raw.route.start[1]),
            Cell::new(raw.route.goal[0], raw.route.goal[1]),
            raw.route.distance_nm,
            Hour::new(raw.departure_hour),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "departure_hour": 8,
        "route": { "start": [0, 0], "goal": [9, 9], "distance_nm": 30.0 },
        "wind": { "rows": 2, "cols": 2, "levels": [0, 1, 2, 3] },
        "pv_forecast": [0,0,0,0,0,0,0,0.2,0.5,0.8,1.0,0.9,0.8,0.6,0.4,0.2,0,0,0,0,0,0,0,0],
        "load_forecast": [0.7,0.6,0.6,0.6,0.7,0.8,0.9,1.0,1.0,0.9,0.8,0.8,0.8,0.9,1.0,0.9,0.8,0.7,0.7,0.8,0.9,0.8,0.7,0.7],
        "port": {
            "bus_count": 16,
            "berths": [
                { "id": 0, "max_charging_kw": 200.0 },
                { "id": 1, "max_charging_kw": 200.0, "windows": [[0, 12], [14, 24]] }
            ],
            "voltage_band": [0.95, 1.05],
            "tap_range": 10,
            "max_tap_switches": 10,
            "pv_count": 4,
            "pv_reactive_bound_kvar": 50.0,
            "pv_peak_kw": 250.0,
            "base_load_kw": 300.0,
            "charging_capacity_kw": 1000.0,
            "charging_efficiency": 0.95,
            "horizon": [0, 24],
            "service_hours": [ { "berth": 0, "vessel": 1, "hours": 3 } ],
            "default_service_hours": 2
        },
        "vessels": [
            {
                "id": 1,
                "dsg_min_kw": 80.0, "dsg_max_kw": 300.0, "ramp_kw": 200.0,
                "ess_capacity_kwh": 120.0,
                "discharge_min_kw": 10.0, "discharge_max_kw": 60.0,
                "service_load_cruise_kw": 10.0, "service_load_berth_kw": 10.0,
                "fuel_c2": 0.01, "fuel_c1": 0.37, "fuel_c0": 3.02e-5,
                "ess_investment_cost": 600.0,
                "earliest_arrival": 10, "latest_arrival": 12,
                "satisfaction_threshold": 0.5
            }
        ]
    }"#;

    #[test]
    fn test_loads_sample_scenario() {
        let scenario = ScenarioLoader::new().from_str(SAMPLE).expect("loads");
        assert_eq!(scenario.fleet().len(), 1);
        assert_eq!(scenario.port().berths().len(), 2);
        assert_eq!(scenario.departure(), Hour::new(8));
        assert_eq!(scenario.route_goal(), Cell::new(9, 9));
        let v = scenario
            .fleet()
            .get(VesselIdentifier::new(1))
            .expect("vessel 1");
        assert_eq!(v.discharge_efficiency(), 0.95);
        assert_eq!(
            scenario
                .port()
                .service_hours(BerthIdentifier::new(0), VesselIdentifier::new(1)),
            3
        );
    }

    #[test]
    fn test_rejects_short_forecast() {
        let json = SAMPLE.replace(
            r#""pv_forecast": [0,0,0,0,0,0,0,0.2,0.5,0.8,1.0,0.9,0.8,0.6,0.4,0.2,0,0,0,0,0,0,0,0]"#,
            r#""pv_forecast": [0.0, 0.1]"#,
        );
        let err = ScenarioLoader::new().from_str(&json).unwrap_err();
        assert!(matches!(
            err,
            ScenarioLoadError::Env(EnvError::ForecastTooShort(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_vessel() {
        let json = SAMPLE.replace(r#""ess_capacity_kwh": 120.0"#, r#""ess_capacity_kwh": 0.0"#);
        let err = ScenarioLoader::new().from_str(&json).unwrap_err();
        assert!(matches!(err, ScenarioLoadError::Vessel(_)));
    }
}
