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

use num_traits::Float;

/// A quadratic curve `c2 * x^2 + c1 * x + c0`.
///
/// Used for generator fuel-cost curves, where the coefficients come from
/// engine bench data and `x` is electrical output in kW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic<F> {
    c2: F,
    c1: F,
    c0: F,
}

impl<F: Float> Quadratic<F> {
    #[inline]
    pub fn new(c2: F, c1: F, c0: F) -> Self {
        Self { c2, c1, c0 }
    }

    #[inline]
    pub fn eval(&self, x: F) -> F {
        (self.c2 * x + self.c1) * x + self.c0
    }

    /// First derivative at `x`.
    #[inline]
    pub fn slope(&self, x: F) -> F {
        let two = F::one() + F::one();
        two * self.c2 * x + self.c1
    }

    #[inline]
    pub fn c2(&self) -> F {
        self.c2
    }

    #[inline]
    pub fn c1(&self) -> F {
        self.c1
    }

    #[inline]
    pub fn c0(&self) -> F {
        self.c0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_matches_expanded_form() {
        let q = Quadratic::new(0.01_f64, 0.37, 3.02e-5);
        let x = 150.0;
        let expected = 0.01 * x * x + 0.37 * x + 3.02e-5;
        assert!((q.eval(x) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_slope() {
        let q = Quadratic::new(2.0_f64, -1.0, 5.0);
        assert!((q.slope(3.0) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_curve() {
        let q = Quadratic::new(0.0_f64, 0.0, 4.2);
        assert_eq!(q.eval(100.0), 4.2);
        assert_eq!(q.slope(100.0), 0.0);
    }
}
