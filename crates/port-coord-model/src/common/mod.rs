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

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

/// A typed identifier. The marker `U` keeps vessel, berth and PV ids from
/// being mixed up at compile time.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub const fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VesselIdentifierMarker;

impl IdentifierMarkerName for VesselIdentifierMarker {
    const NAME: &'static str = "VesselId";
}

pub type VesselIdentifier = Identifier<usize, VesselIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BerthIdentifierMarker;

impl IdentifierMarkerName for BerthIdentifierMarker {
    const NAME: &'static str = "BerthId";
}

pub type BerthIdentifier = Identifier<usize, BerthIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PvIdentifierMarker;

impl IdentifierMarkerName for PvIdentifierMarker {
    const NAME: &'static str = "PvId";
}

pub type PvIdentifier = Identifier<usize, PvIdentifierMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_marker_name() {
        assert_eq!(format!("{}", VesselIdentifier::new(3)), "VesselId(3)");
        assert_eq!(format!("{}", BerthIdentifier::new(0)), "BerthId(0)");
        assert_eq!(format!("{}", PvIdentifier::new(2)), "PvId(2)");
    }

    #[test]
    fn test_value_roundtrip() {
        let id = VesselIdentifier::new(42);
        assert_eq!(*id.value(), 42);
        assert_eq!(id.into_inner(), 42);
    }
}
