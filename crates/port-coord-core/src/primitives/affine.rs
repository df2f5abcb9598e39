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

use num_traits::{CheckedAdd, CheckedSub, Zero};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Display names for a point/delta pair sharing one axis.
pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// An absolute position on the axis tagged by `U`.
///
/// Points and deltas are deliberately distinct types: two points subtract
/// into a delta, a point shifts by a delta, and nothing else type-checks.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Point::new(T::zero())
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: CheckedAdd, U> Add<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("error in Point + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign<Delta<T, U>> for Point<T, U> {
    fn add_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_add(&rhs.0).expect("error in Point += Delta");
    }
}

impl<T: CheckedSub, U> Sub<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("error in Point - Delta"))
    }
}

impl<T: CheckedSub, U> SubAssign<Delta<T, U>> for Point<T, U> {
    fn sub_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_sub(&rhs.0).expect("error in Point -= Delta");
    }
}

impl<T: CheckedSub, U> Sub<Point<T, U>> for Point<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Point - Point"))
    }
}

/// A signed displacement along the axis tagged by `U`.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Delta::new(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 > T::zero()
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T: CheckedAdd, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("error in Delta + Delta"))
    }
}

impl<T: CheckedSub, U> Sub for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("error in Delta - Delta"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    struct TestMarker;

    impl MarkerName for TestMarker {
        const NAME_POINT: &'static str = "P";
        const NAME_DELTA: &'static str = "D";
    }

    type P = Point<i64, TestMarker>;
    type D = Delta<i64, TestMarker>;

    #[test]
    fn test_point_delta_roundtrip() {
        let p = P::new(7);
        let d = D::new(3);
        assert_eq!((p + d) - d, p);
        assert_eq!((p + d) - p, d);
    }

    #[test]
    fn test_checked_overflow_is_none() {
        let p = P::new(i64::MAX);
        assert!(p.checked_add(D::new(1)).is_none());
        assert_eq!(p.checked_sub(D::new(1)), Some(P::new(i64::MAX - 1)));
    }

    #[test]
    fn test_delta_sign() {
        assert!(D::new(1).is_positive());
        assert!(!D::new(0).is_positive());
        assert!(!D::new(-1).is_positive());
    }

    #[test]
    fn test_defaults_are_zero() {
        assert_eq!(P::default(), P::new(0));
        assert_eq!(D::default(), D::zero());
    }
}
