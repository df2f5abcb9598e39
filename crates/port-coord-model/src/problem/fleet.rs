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
use crate::problem::vessel::VesselProfile;
use std::collections::HashMap;

/// The vessel profiles participating in a run, in insertion order.
///
/// Iteration order is the registration order, so every stage that walks the
/// fleet is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    vessels: Vec<VesselProfile>,
    index: HashMap<VesselIdentifier, usize>,
}

impl Fleet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            vessels: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
        }
    }

    /// Insert a profile, replacing any previous profile with the same id.
    /// Returns the replaced profile, if any.
    pub fn insert(&mut self, vessel: VesselProfile) -> Option<VesselProfile> {
        match self.index.get(&vessel.id()) {
            Some(&slot) => Some(std::mem::replace(&mut self.vessels[slot], vessel)),
            None => {
                self.index.insert(vessel.id(), self.vessels.len());
                self.vessels.push(vessel);
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, id: VesselIdentifier) -> Option<&VesselProfile> {
        self.index.get(&id).map(|&slot| &self.vessels[slot])
    }

    #[inline]
    pub fn contains_id(&self, id: VesselIdentifier) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &VesselProfile> {
        self.vessels.iter()
    }
}

impl FromIterator<VesselProfile> for Fleet {
    fn from_iter<I: IntoIterator<Item = VesselProfile>>(iter: I) -> Self {
        let mut fleet = Self::new();
        for v in iter {
            fleet.insert(v);
        }
        fleet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::vessel::VesselProfileBuilder;
    use port_coord_core::prelude::Hour;

    fn vessel(id: usize) -> VesselProfile {
        VesselProfileBuilder::new(VesselIdentifier::new(id))
            .with_generator(80.0, 300.0, 200.0)
            .with_battery(120.0, 10.0, 60.0)
            .with_arrival_window(Hour::new(10), Hour::new(12))
            .build()
            .unwrap()
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let fleet: Fleet = [vessel(3), vessel(1), vessel(2)].into_iter().collect();
        let ids: Vec<usize> = fleet.iter().map(|v| v.id().into_inner()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut fleet: Fleet = [vessel(1), vessel(2)].into_iter().collect();
        let replaced = fleet.insert(vessel(1));
        assert!(replaced.is_some());
        assert_eq!(fleet.len(), 2);
        let ids: Vec<usize> = fleet.iter().map(|v| v.id().into_inner()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_get_and_contains() {
        let fleet: Fleet = [vessel(7)].into_iter().collect();
        assert!(fleet.contains_id(VesselIdentifier::new(7)));
        assert!(fleet.get(VesselIdentifier::new(8)).is_none());
    }
}
