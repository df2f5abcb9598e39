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
use crate::problem::err::{
    EmptyHorizonError, InvalidBoundsError, InvalidFractionError, NoBerthsError,
    NonPositiveValueError, PortProfileError,
};
use port_coord_core::prelude::{Hour, HourInterval};
use rangemap::RangeSet;
use std::collections::HashMap;

/// One quay berth with a shore-connection rating and opening windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Berth {
    id: BerthIdentifier,
    max_charging_kw: f64,
    availability: RangeSet<Hour>,
}

impl Berth {
    /// Build a berth from availability windows; empty windows are dropped,
    /// adjacent windows coalesce.
    pub fn from_windows<I>(id: BerthIdentifier, max_charging_kw: f64, windows: I) -> Self
    where
        I: IntoIterator<Item = HourInterval>,
    {
        let availability = windows
            .into_iter()
            .filter(|iv| !iv.is_empty())
            .map(|iv| iv.into_range())
            .collect::<RangeSet<Hour>>();
        Self {
            id,
            max_charging_kw: max_charging_kw.max(0.0),
            availability,
        }
    }

    /// A berth open over the whole given horizon.
    #[inline]
    pub fn always_open(id: BerthIdentifier, max_charging_kw: f64, horizon: HourInterval) -> Self {
        Self::from_windows(id, max_charging_kw, [horizon])
    }

    #[inline]
    pub fn id(&self) -> BerthIdentifier {
        self.id
    }

    #[inline]
    pub fn max_charging_kw(&self) -> f64 {
        self.max_charging_kw
    }

    #[inline]
    pub fn is_open_at(&self, t: Hour) -> bool {
        self.availability.contains(&t)
    }

    #[inline]
    pub fn covers(&self, iv: HourInterval) -> bool {
        if iv.is_empty() {
            return true;
        }
        let (s, e) = iv.into_inner();
        self.availability.gaps(&(s..e)).next().is_none()
    }

    #[inline]
    pub fn windows(&self) -> Vec<HourInterval> {
        self.availability
            .iter()
            .map(|r| HourInterval::new(r.start, r.end))
            .collect()
    }
}

/// Berths in registration order; lookups by id.
#[derive(Debug, Clone, Default)]
pub struct BerthContainer {
    berths: Vec<Berth>,
    index: HashMap<BerthIdentifier, usize>,
}

impl BerthContainer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, berth: Berth) -> Option<Berth> {
        match self.index.get(&berth.id()) {
            Some(&slot) => Some(std::mem::replace(&mut self.berths[slot], berth)),
            None => {
                self.index.insert(berth.id(), self.berths.len());
                self.berths.push(berth);
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, id: BerthIdentifier) -> Option<&Berth> {
        self.index.get(&id).map(|&slot| &self.berths[slot])
    }

    #[inline]
    pub fn contains_id(&self, id: BerthIdentifier) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.berths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.berths.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Berth> {
        self.berths.iter()
    }
}

impl FromIterator<Berth> for BerthContainer {
    fn from_iter<I: IntoIterator<Item = Berth>>(iter: I) -> Self {
        let mut c = Self::new();
        for b in iter {
            c.insert(b);
        }
        c
    }
}

/// Seaport-wide static configuration, immutable for a run.
#[derive(Debug, Clone)]
pub struct PortProfile {
    bus_count: usize,
    berths: BerthContainer,
    voltage_band: (f64, f64),
    tap_range: i32,
    max_tap_switches: i32,
    pv_count: usize,
    pv_reactive_bound_kvar: f64,
    pv_peak_kw: f64,
    base_load_kw: f64,
    charging_capacity_kw: f64,
    charging_efficiency: f64,
    horizon: HourInterval,
    service_hours: HashMap<(BerthIdentifier, VesselIdentifier), i64>,
    default_service_hours: i64,
}

impl PortProfile {
    #[inline]
    pub fn bus_count(&self) -> usize {
        self.bus_count
    }

    #[inline]
    pub fn berths(&self) -> &BerthContainer {
        &self.berths
    }

    #[inline]
    pub fn voltage_band(&self) -> (f64, f64) {
        self.voltage_band
    }

    #[inline]
    pub fn tap_range(&self) -> i32 {
        self.tap_range
    }

    #[inline]
    pub fn max_tap_switches(&self) -> i32 {
        self.max_tap_switches
    }

    #[inline]
    pub fn pv_count(&self) -> usize {
        self.pv_count
    }

    #[inline]
    pub fn pv_reactive_bound_kvar(&self) -> f64 {
        self.pv_reactive_bound_kvar
    }

    #[inline]
    pub fn pv_peak_kw(&self) -> f64 {
        self.pv_peak_kw
    }

    #[inline]
    pub fn base_load_kw(&self) -> f64 {
        self.base_load_kw
    }

    #[inline]
    pub fn charging_capacity_kw(&self) -> f64 {
        self.charging_capacity_kw
    }

    #[inline]
    pub fn charging_efficiency(&self) -> f64 {
        self.charging_efficiency
    }

    #[inline]
    pub fn horizon(&self) -> HourInterval {
        self.horizon
    }

    /// Hours a vessel needs at a berth for its port call. Falls back to the
    /// port default when no pair-specific time is configured.
    #[inline]
    pub fn service_hours(&self, berth: BerthIdentifier, vessel: VesselIdentifier) -> i64 {
        self.service_hours
            .get(&(berth, vessel))
            .copied()
            .unwrap_or(self.default_service_hours)
    }
}

#[derive(Debug, Clone)]
pub struct PortProfileBuilder {
    bus_count: usize,
    berths: BerthContainer,
    voltage_band: (f64, f64),
    tap_range: i32,
    max_tap_switches: i32,
    pv_count: usize,
    pv_reactive_bound_kvar: f64,
    pv_peak_kw: f64,
    base_load_kw: f64,
    charging_capacity_kw: f64,
    charging_efficiency: f64,
    horizon: HourInterval,
    service_hours: HashMap<(BerthIdentifier, VesselIdentifier), i64>,
    default_service_hours: i64,
}

impl Default for PortProfileBuilder {
    fn default() -> Self {
        Self {
            bus_count: 1,
            berths: BerthContainer::new(),
            voltage_band: (0.95, 1.05),
            tap_range: 10,
            max_tap_switches: 10,
            pv_count: 0,
            pv_reactive_bound_kvar: 0.0,
            pv_peak_kw: 0.0,
            base_load_kw: 0.0,
            charging_capacity_kw: 0.0,
            charging_efficiency: 0.95,
            horizon: HourInterval::new(Hour::new(0), Hour::new(24)),
            service_hours: HashMap::new(),
            default_service_hours: 2,
        }
    }
}

impl PortProfileBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_bus_count(mut self, buses: usize) -> Self {
        self.bus_count = buses;
        self
    }

    #[inline]
    pub fn with_berths<I>(mut self, berths: I) -> Self
    where
        I: IntoIterator<Item = Berth>,
    {
        self.berths = berths.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_voltage_band(mut self, v_min: f64, v_max: f64) -> Self {
        self.voltage_band = (v_min, v_max);
        self
    }

    #[inline]
    pub fn with_tap(mut self, range: i32, max_switches: i32) -> Self {
        self.tap_range = range;
        self.max_tap_switches = max_switches;
        self
    }

    #[inline]
    pub fn with_pv(mut self, count: usize, reactive_bound_kvar: f64, peak_kw: f64) -> Self {
        self.pv_count = count;
        self.pv_reactive_bound_kvar = reactive_bound_kvar;
        self.pv_peak_kw = peak_kw;
        self
    }

    #[inline]
    pub fn with_base_load(mut self, base_load_kw: f64) -> Self {
        self.base_load_kw = base_load_kw;
        self
    }

    #[inline]
    pub fn with_charging(mut self, capacity_kw: f64, efficiency: f64) -> Self {
        self.charging_capacity_kw = capacity_kw;
        self.charging_efficiency = efficiency;
        self
    }

    #[inline]
    pub fn with_horizon(mut self, horizon: HourInterval) -> Self {
        self.horizon = horizon;
        self
    }

    #[inline]
    pub fn with_service_hours(
        mut self,
        berth: BerthIdentifier,
        vessel: VesselIdentifier,
        hours: i64,
    ) -> Self {
        self.service_hours.insert((berth, vessel), hours);
        self
    }

    #[inline]
    pub fn with_default_service_hours(mut self, hours: i64) -> Self {
        self.default_service_hours = hours;
        self
    }

    pub fn build(self) -> Result<PortProfile, PortProfileError> {
        if self.berths.is_empty() {
            return Err(NoBerthsError.into());
        }
        if self.horizon.is_empty() {
            return Err(EmptyHorizonError.into());
        }
        let (v_min, v_max) = self.voltage_band;
        if v_min <= 0.0 || v_min >= v_max {
            return Err(InvalidBoundsError::new("voltage band", v_min, v_max).into());
        }
        if self.tap_range < 0 {
            return Err(InvalidBoundsError::new(
                "tap range",
                -self.tap_range as f64,
                self.tap_range as f64,
            )
            .into());
        }
        if self.charging_capacity_kw <= 0.0 {
            return Err(
                NonPositiveValueError::new("charging capacity", self.charging_capacity_kw).into(),
            );
        }
        if !(self.charging_efficiency > 0.0 && self.charging_efficiency <= 1.0) {
            return Err(
                InvalidFractionError::new("charging efficiency", self.charging_efficiency).into(),
            );
        }
        if self.default_service_hours <= 0 {
            return Err(NonPositiveValueError::new(
                "default service hours",
                self.default_service_hours as f64,
            )
            .into());
        }

        Ok(PortProfile {
            bus_count: self.bus_count,
            berths: self.berths,
            voltage_band: self.voltage_band,
            tap_range: self.tap_range,
            max_tap_switches: self.max_tap_switches,
            pv_count: self.pv_count,
            pv_reactive_bound_kvar: self.pv_reactive_bound_kvar,
            pv_peak_kw: self.pv_peak_kw,
            base_load_kw: self.base_load_kw,
            charging_capacity_kw: self.charging_capacity_kw,
            charging_efficiency: self.charging_efficiency,
            horizon: self.horizon,
            service_hours: self.service_hours,
            default_service_hours: self.default_service_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn hour(v: i64) -> Hour {
        Hour::new(v)
    }

    #[inline]
    fn iv(a: i64, b: i64) -> HourInterval {
        HourInterval::new(hour(a), hour(b))
    }

    #[inline]
    fn bid(n: usize) -> BerthIdentifier {
        BerthIdentifier::new(n)
    }

    #[test]
    fn test_berth_windows_coalesce_and_are_half_open() {
        let b = Berth::from_windows(bid(1), 200.0, vec![iv(0, 10), iv(10, 20), iv(22, 24)]);
        assert_eq!(b.windows(), vec![iv(0, 20), iv(22, 24)]);
        assert!(b.is_open_at(hour(0)));
        assert!(b.is_open_at(hour(19)));
        assert!(!b.is_open_at(hour(20))); // exclusive end
        assert!(!b.is_open_at(hour(21)));
    }

    #[test]
    fn test_berth_covers_spans_no_gaps() {
        let b = Berth::from_windows(bid(2), 200.0, vec![iv(0, 6), iv(8, 12)]);
        assert!(b.covers(iv(1, 5)));
        assert!(!b.covers(iv(5, 9)));
        assert!(b.covers(iv(3, 3))); // empty always covered
    }

    #[test]
    fn test_empty_windows_are_dropped() {
        let b = Berth::from_windows(bid(3), 150.0, vec![iv(5, 5), iv(9, 2)]);
        assert!(b.windows().is_empty());
    }

    #[test]
    fn test_container_keeps_registration_order() {
        let c: BerthContainer = [
            Berth::always_open(bid(2), 100.0, iv(0, 24)),
            Berth::always_open(bid(0), 100.0, iv(0, 24)),
        ]
        .into_iter()
        .collect();
        let ids: Vec<usize> = c.iter().map(|b| b.id().into_inner()).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[test]
    fn test_port_builder_rejects_missing_berths() {
        let err = PortProfileBuilder::new()
            .with_charging(1000.0, 0.95)
            .build()
            .unwrap_err();
        assert!(matches!(err, PortProfileError::NoBerths(_)));
    }

    #[test]
    fn test_port_builder_rejects_bad_voltage_band() {
        let err = PortProfileBuilder::new()
            .with_berths([Berth::always_open(bid(0), 200.0, iv(0, 24))])
            .with_charging(1000.0, 0.95)
            .with_voltage_band(1.05, 0.95)
            .build()
            .unwrap_err();
        assert!(matches!(err, PortProfileError::InvalidBounds(_)));
    }

    #[test]
    fn test_service_hours_fallback() {
        let port = PortProfileBuilder::new()
            .with_berths([Berth::always_open(bid(0), 200.0, iv(0, 24))])
            .with_charging(1000.0, 0.95)
            .with_service_hours(bid(0), VesselIdentifier::new(1), 3)
            .build()
            .unwrap();
        assert_eq!(port.service_hours(bid(0), VesselIdentifier::new(1)), 3);
        assert_eq!(port.service_hours(bid(0), VesselIdentifier::new(9)), 2);
    }
}
