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

use crate::common::VesselIdentifier;
use crate::problem::err::{
    InvalidArrivalWindowError, InvalidBoundsError, InvalidFractionError, NonPositiveValueError,
    VesselProfileError,
};
use port_coord_core::prelude::{Cost, Hour, Quadratic};

/// Immutable physical and economic parameters of one all-electric ship.
///
/// Built once at fleet setup through [`VesselProfileBuilder`]; the
/// optimization stages only ever read it.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselProfile {
    id: VesselIdentifier,
    dsg_min_kw: f64,
    dsg_max_kw: f64,
    ramp_kw: f64,
    ess_capacity_kwh: f64,
    discharge_min_kw: f64,
    discharge_max_kw: f64,
    discharge_efficiency: f64,
    initial_soc: f64,
    target_soc: f64,
    service_load_cruise_kw: f64,
    service_load_berth_kw: f64,
    fuel_curve: Quadratic<f64>,
    ess_investment_cost: Cost,
    earliest_arrival: Hour,
    latest_arrival: Hour,
    satisfaction_threshold: f64,
}

impl VesselProfile {
    #[inline]
    pub fn id(&self) -> VesselIdentifier {
        self.id
    }

    #[inline]
    pub fn dsg_min_kw(&self) -> f64 {
        self.dsg_min_kw
    }

    #[inline]
    pub fn dsg_max_kw(&self) -> f64 {
        self.dsg_max_kw
    }

    #[inline]
    pub fn ramp_kw(&self) -> f64 {
        self.ramp_kw
    }

    #[inline]
    pub fn ess_capacity_kwh(&self) -> f64 {
        self.ess_capacity_kwh
    }

    #[inline]
    pub fn discharge_min_kw(&self) -> f64 {
        self.discharge_min_kw
    }

    #[inline]
    pub fn discharge_max_kw(&self) -> f64 {
        self.discharge_max_kw
    }

    #[inline]
    pub fn discharge_efficiency(&self) -> f64 {
        self.discharge_efficiency
    }

    #[inline]
    pub fn initial_soc(&self) -> f64 {
        self.initial_soc
    }

    #[inline]
    pub fn target_soc(&self) -> f64 {
        self.target_soc
    }

    #[inline]
    pub fn service_load_cruise_kw(&self) -> f64 {
        self.service_load_cruise_kw
    }

    #[inline]
    pub fn service_load_berth_kw(&self) -> f64 {
        self.service_load_berth_kw
    }

    #[inline]
    pub fn fuel_curve(&self) -> &Quadratic<f64> {
        &self.fuel_curve
    }

    #[inline]
    pub fn ess_investment_cost(&self) -> Cost {
        self.ess_investment_cost
    }

    #[inline]
    pub fn earliest_arrival(&self) -> Hour {
        self.earliest_arrival
    }

    #[inline]
    pub fn latest_arrival(&self) -> Hour {
        self.latest_arrival
    }

    #[inline]
    pub fn satisfaction_threshold(&self) -> f64 {
        self.satisfaction_threshold
    }

    /// Every acceptable arrival hour, earliest to latest inclusive.
    #[inline]
    pub fn arrival_hours(&self) -> impl Iterator<Item = Hour> {
        (self.earliest_arrival.value()..=self.latest_arrival.value()).map(Hour::new)
    }

    /// Energy (kWh) the shore connection must deliver to lift the battery
    /// from `soc_arrival` back to the target state of charge.
    #[inline]
    pub fn charge_deficit_kwh(&self, soc_arrival: f64) -> f64 {
        (self.target_soc - soc_arrival).max(0.0) * self.ess_capacity_kwh
    }
}

#[derive(Debug, Clone)]
pub struct VesselProfileBuilder {
    id: VesselIdentifier,
    dsg_min_kw: f64,
    dsg_max_kw: f64,
    ramp_kw: f64,
    ess_capacity_kwh: f64,
    discharge_min_kw: f64,
    discharge_max_kw: f64,
    discharge_efficiency: f64,
    initial_soc: f64,
    target_soc: f64,
    service_load_cruise_kw: f64,
    service_load_berth_kw: f64,
    fuel_curve: Quadratic<f64>,
    ess_investment_cost: Cost,
    earliest_arrival: Hour,
    latest_arrival: Hour,
    satisfaction_threshold: f64,
}

impl VesselProfileBuilder {
    pub fn new(id: VesselIdentifier) -> Self {
        Self {
            id,
            dsg_min_kw: 0.0,
            dsg_max_kw: 0.0,
            ramp_kw: 0.0,
            ess_capacity_kwh: 0.0,
            discharge_min_kw: 0.0,
            discharge_max_kw: 0.0,
            discharge_efficiency: 0.95,
            initial_soc: 0.9,
            target_soc: 0.9,
            service_load_cruise_kw: 0.0,
            service_load_berth_kw: 0.0,
            fuel_curve: Quadratic::new(0.0, 0.0, 0.0),
            ess_investment_cost: 0.0,
            earliest_arrival: Hour::new(0),
            latest_arrival: Hour::new(0),
            satisfaction_threshold: 0.5,
        }
    }

    #[inline]
    pub fn with_generator(mut self, min_kw: f64, max_kw: f64, ramp_kw: f64) -> Self {
        self.dsg_min_kw = min_kw;
        self.dsg_max_kw = max_kw;
        self.ramp_kw = ramp_kw;
        self
    }

    #[inline]
    pub fn with_battery(mut self, capacity_kwh: f64, discharge_min_kw: f64, discharge_max_kw: f64) -> Self {
        self.ess_capacity_kwh = capacity_kwh;
        self.discharge_min_kw = discharge_min_kw;
        self.discharge_max_kw = discharge_max_kw;
        self
    }

    #[inline]
    pub fn with_discharge_efficiency(mut self, eta: f64) -> Self {
        self.discharge_efficiency = eta;
        self
    }

    #[inline]
    pub fn with_charge_state(mut self, initial_soc: f64, target_soc: f64) -> Self {
        self.initial_soc = initial_soc;
        self.target_soc = target_soc;
        self
    }

    #[inline]
    pub fn with_service_loads(mut self, cruise_kw: f64, berth_kw: f64) -> Self {
        self.service_load_cruise_kw = cruise_kw;
        self.service_load_berth_kw = berth_kw;
        self
    }

    #[inline]
    pub fn with_fuel_curve(mut self, curve: Quadratic<f64>) -> Self {
        self.fuel_curve = curve;
        self
    }

    #[inline]
    pub fn with_ess_investment_cost(mut self, cost: Cost) -> Self {
        self.ess_investment_cost = cost;
        self
    }

    #[inline]
    pub fn with_arrival_window(mut self, earliest: Hour, latest: Hour) -> Self {
        self.earliest_arrival = earliest;
        self.latest_arrival = latest;
        self
    }

    #[inline]
    pub fn with_satisfaction_threshold(mut self, beta: f64) -> Self {
        self.satisfaction_threshold = beta;
        self
    }

    pub fn build(self) -> Result<VesselProfile, VesselProfileError> {
        if self.ess_capacity_kwh <= 0.0 {
            return Err(NonPositiveValueError::new("ESS capacity", self.ess_capacity_kwh).into());
        }
        if self.dsg_min_kw < 0.0 || self.dsg_min_kw > self.dsg_max_kw {
            return Err(
                InvalidBoundsError::new("generator power", self.dsg_min_kw, self.dsg_max_kw).into(),
            );
        }
        if self.discharge_min_kw < 0.0 || self.discharge_min_kw > self.discharge_max_kw {
            return Err(InvalidBoundsError::new(
                "discharge power",
                self.discharge_min_kw,
                self.discharge_max_kw,
            )
            .into());
        }
        if !(self.discharge_efficiency > 0.0 && self.discharge_efficiency <= 1.0) {
            return Err(
                InvalidFractionError::new("discharge efficiency", self.discharge_efficiency).into(),
            );
        }
        if !(self.initial_soc > 0.0 && self.initial_soc <= 1.0) {
            return Err(InvalidFractionError::new("initial state of charge", self.initial_soc).into());
        }
        if !(self.target_soc > 0.0 && self.target_soc <= 1.0) {
            return Err(InvalidFractionError::new("target state of charge", self.target_soc).into());
        }
        if !(0.0..=1.0).contains(&self.satisfaction_threshold) {
            return Err(InvalidFractionError::new(
                "satisfaction threshold",
                self.satisfaction_threshold,
            )
            .into());
        }
        if self.earliest_arrival > self.latest_arrival {
            return Err(
                InvalidArrivalWindowError::new(self.earliest_arrival, self.latest_arrival).into(),
            );
        }

        Ok(VesselProfile {
            id: self.id,
            dsg_min_kw: self.dsg_min_kw,
            dsg_max_kw: self.dsg_max_kw,
            ramp_kw: self.ramp_kw,
            ess_capacity_kwh: self.ess_capacity_kwh,
            discharge_min_kw: self.discharge_min_kw,
            discharge_max_kw: self.discharge_max_kw,
            discharge_efficiency: self.discharge_efficiency,
            initial_soc: self.initial_soc,
            target_soc: self.target_soc,
            service_load_cruise_kw: self.service_load_cruise_kw,
            service_load_berth_kw: self.service_load_berth_kw,
            fuel_curve: self.fuel_curve,
            ess_investment_cost: self.ess_investment_cost,
            earliest_arrival: self.earliest_arrival,
            latest_arrival: self.latest_arrival,
            satisfaction_threshold: self.satisfaction_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> VesselProfileBuilder {
        VesselProfileBuilder::new(VesselIdentifier::new(1))
            .with_generator(80.0, 300.0, 200.0)
            .with_battery(120.0, 10.0, 60.0)
            .with_service_loads(10.0, 10.0)
            .with_fuel_curve(Quadratic::new(0.01, 0.37, 3.02e-5))
            .with_ess_investment_cost(600.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .with_satisfaction_threshold(0.5)
    }

    #[test]
    fn test_build_valid_profile() {
        let v = builder().build().expect("valid profile");
        assert_eq!(v.id(), VesselIdentifier::new(1));
        assert_eq!(v.dsg_max_kw(), 300.0);
        assert_eq!(v.discharge_efficiency(), 0.95);
        let hours: Vec<i64> = v.arrival_hours().map(|h| h.value()).collect();
        assert_eq!(hours, vec![10, 11, 12]);
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        let err = builder().with_battery(0.0, 10.0, 60.0).build().unwrap_err();
        assert!(matches!(err, VesselProfileError::NonPositiveValue(_)));
    }

    #[test]
    fn test_rejects_inverted_generator_bounds() {
        let err = builder().with_generator(400.0, 300.0, 200.0).build().unwrap_err();
        assert!(matches!(err, VesselProfileError::InvalidBounds(_)));
    }

    #[test]
    fn test_rejects_empty_arrival_window() {
        let err = builder()
            .with_arrival_window(Hour::new(13), Hour::new(10))
            .build()
            .unwrap_err();
        assert!(matches!(err, VesselProfileError::InvalidArrivalWindow(_)));
    }

    #[test]
    fn test_rejects_threshold_above_one() {
        let err = builder().with_satisfaction_threshold(1.5).build().unwrap_err();
        assert!(matches!(err, VesselProfileError::InvalidFraction(_)));
    }

    #[test]
    fn test_charge_deficit() {
        let v = builder().build().unwrap();
        assert!((v.charge_deficit_kwh(0.1) - 0.8 * 120.0).abs() < 1e-9);
        assert_eq!(v.charge_deficit_kwh(0.95), 0.0);
    }
}
