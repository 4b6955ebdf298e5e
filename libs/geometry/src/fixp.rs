//! Fixed-point layout coordinates.
//!
//! A [`Fixp`] counts ticks of a database grid step. One grid step is
//! [`FIXP_PER_GRID`] ticks and one display unit ("lambda") is
//! [`GRID_PER_LAMBDA`] grid steps.
//!
//! Integer arithmetic on [`Fixp`] is exact. Conversions from floating point
//! values use a single rounding rule, `floor(scaled + 0.5)`.
//!
//! Overflow of the underlying `i64` is not guarded: debug builds trap on it
//! and release builds wrap.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::snap::{ceil_to_grid, floor_to_grid, snap_to_grid};

/// The number of fractional bits below one grid step.
pub const FRACTION_BITS: u32 = 20;

/// The number of ticks in one grid step.
pub const FIXP_PER_GRID: i64 = 1 << FRACTION_BITS;

/// The number of grid steps in one display unit.
pub const GRID_PER_LAMBDA: i64 = 400;

/// The number of ticks in one display unit.
pub const FIXP_PER_LAMBDA: i64 = FIXP_PER_GRID * GRID_PER_LAMBDA;

/// A fixed-point layout coordinate.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let a = Fixp::from_lambda(1.5);
/// let b = Fixp::from_lambda(0.25);
/// assert_eq!((a + b).to_lambda(), 1.75);
/// assert_eq!((a * 2).to_lambda(), 3.0);
/// ```
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Fixp(i64);

/// Rounds a scaled floating point value to the nearest integer, ties toward positive infinity.
#[inline]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl Fixp {
    /// The zero coordinate.
    pub const ZERO: Fixp = Fixp(0);

    /// One grid step.
    pub const GRID: Fixp = Fixp(FIXP_PER_GRID);

    /// One display unit.
    pub const LAMBDA: Fixp = Fixp(FIXP_PER_LAMBDA);

    /// Creates a coordinate from a raw tick count.
    #[inline]
    pub const fn from_raw(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Converts a value in display units to the nearest tick.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Fixp::from_lambda(1.0).raw(), 419_430_400);
    /// assert_eq!(Fixp::from_lambda(-0.5).to_lambda(), -0.5);
    /// ```
    #[inline]
    pub fn from_lambda(lambda: f64) -> Self {
        Self(round_half_up(lambda * FIXP_PER_LAMBDA as f64))
    }

    /// Converts a value in grid units to the nearest tick.
    #[inline]
    pub fn from_grid(grid: f64) -> Self {
        Self(round_half_up(grid * FIXP_PER_GRID as f64))
    }

    /// Returns this coordinate in display units.
    #[inline]
    pub fn to_lambda(self) -> f64 {
        self.0 as f64 / FIXP_PER_LAMBDA as f64
    }

    /// Returns this coordinate in grid units.
    #[inline]
    pub fn to_grid(self) -> f64 {
        self.0 as f64 / FIXP_PER_GRID as f64
    }

    /// Multiplies by a floating point factor, rounding to the nearest tick.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self(round_half_up(self.0 as f64 * factor))
    }

    /// Returns the point halfway between `a` and `b`, rounded toward negative infinity.
    #[inline]
    pub const fn midpoint(a: Fixp, b: Fixp) -> Fixp {
        Fixp((a.0 + b.0).div_euclid(2))
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to the nearest multiple of `resolution`, ties toward positive infinity.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let res = Fixp::from_raw(10);
    /// assert_eq!(Fixp::from_raw(14).round_to_multiple(res), Fixp::from_raw(10));
    /// assert_eq!(Fixp::from_raw(15).round_to_multiple(res), Fixp::from_raw(20));
    /// assert_eq!(Fixp::from_raw(-15).round_to_multiple(res), Fixp::from_raw(-10));
    /// ```
    #[inline]
    pub fn round_to_multiple(self, resolution: Fixp) -> Self {
        Self(snap_to_grid(self.0, resolution.0))
    }

    /// Rounds down to a multiple of `resolution`.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is not positive.
    #[inline]
    pub fn floor_to_multiple(self, resolution: Fixp) -> Self {
        Self(floor_to_grid(self.0, resolution.0))
    }

    /// Rounds up to a multiple of `resolution`.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is not positive.
    #[inline]
    pub fn ceil_to_multiple(self, resolution: Fixp) -> Self {
        Self(ceil_to_grid(self.0, resolution.0))
    }
}

impl std::ops::Add for Fixp {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Fixp {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Fixp {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::SubAssign for Fixp {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::ops::Neg for Fixp {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl std::ops::Mul<i64> for Fixp {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl From<i64> for Fixp {
    /// Interprets the integer as a raw tick count.
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Fixp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lambda())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambda_round_trip_is_exact() {
        for v in [
            0.0, 1.0, -1.0, 0.5, -0.5, 1.75, -2.25, 0.125, 1234.5, -98765.25, 3.0e6,
        ] {
            assert_eq!(Fixp::from_lambda(v).to_lambda(), v, "round trip of {v}");
        }
        // Every multiple of one tick is representable.
        for ticks in [1_i64, -1, 7, 419_430_399, -419_430_401, 1 << 40] {
            let v = ticks as f64 / FIXP_PER_LAMBDA as f64;
            assert_eq!(Fixp::from_lambda(v).raw(), ticks);
        }
    }

    #[test]
    fn fixp_to_lambda_and_back_is_identity() {
        for ticks in [0_i64, 3, -3, 1 << 20, (1 << 45) + 17, -(1 << 45) - 5] {
            let f = Fixp::from_raw(ticks);
            assert_eq!(Fixp::from_lambda(f.to_lambda()), f);
        }
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(2.4999), 2);
        let half_tick = 0.5 / FIXP_PER_GRID as f64;
        assert_eq!(Fixp::from_grid(half_tick).raw(), 1);
        assert_eq!(Fixp::from_grid(-half_tick).raw(), 0);
    }

    #[test]
    fn grid_conversion() {
        assert_eq!(Fixp::from_grid(1.0), Fixp::GRID);
        assert_eq!(Fixp::from_grid(GRID_PER_LAMBDA as f64), Fixp::LAMBDA);
        assert_eq!(Fixp::from_lambda(2.0).to_grid(), 800.0);
    }

    #[test]
    fn integer_arithmetic_is_exact() {
        let a = Fixp::from_lambda(0.1);
        let b = Fixp::from_lambda(0.2);
        assert_eq!((a + b) - b, a);
        assert_eq!(a * 3 - a - a - a, Fixp::ZERO);
        assert_eq!(-(-a), a);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn scale_rounds_to_nearest_tick() {
        assert_eq!(Fixp::from_raw(3).scale(0.5), Fixp::from_raw(2));
        assert_eq!(Fixp::from_raw(-3).scale(0.5), Fixp::from_raw(-1));
        assert_eq!(Fixp::LAMBDA.scale(2.5), Fixp::from_lambda(2.5));
    }

    #[test]
    fn multiples() {
        let res = Fixp::GRID;
        let v = Fixp::from_grid(2.3);
        assert_eq!(v.floor_to_multiple(res), Fixp::from_grid(2.0));
        assert_eq!(v.ceil_to_multiple(res), Fixp::from_grid(3.0));
        assert_eq!(v.round_to_multiple(res), Fixp::from_grid(2.0));
        let v = Fixp::from_grid(-2.3);
        assert_eq!(v.floor_to_multiple(res), Fixp::from_grid(-3.0));
        assert_eq!(v.ceil_to_multiple(res), Fixp::from_grid(-2.0));
        assert_eq!(v.round_to_multiple(res), Fixp::from_grid(-2.0));
        assert_eq!(Fixp::from_grid(4.0).ceil_to_multiple(res), Fixp::from_grid(4.0));
    }

    #[test]
    fn midpoint_floors() {
        assert_eq!(
            Fixp::midpoint(Fixp::from_raw(1), Fixp::from_raw(4)),
            Fixp::from_raw(2)
        );
        assert_eq!(
            Fixp::midpoint(Fixp::from_raw(-1), Fixp::from_raw(-4)),
            Fixp::from_raw(-3)
        );
    }
}
