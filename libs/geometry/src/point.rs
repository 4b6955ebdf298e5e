//! 2-D points.

use serde::{Deserialize, Serialize};

use crate::fixp::Fixp;
use crate::transform::{TransformMut, Transformation, TranslateMut};

/// A point in two-dimensional space.
#[derive(
    Debug, Copy, Clone, Default, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Point {
    /// The x-coordinate of the point.
    pub x: Fixp,
    /// The y-coordinate of the point.
    pub y: Fixp,
}

impl Point {
    /// Creates a new [`Point`] from (x,y) coordinates.
    pub const fn new(x: Fixp, y: Fixp) -> Self {
        Self { x, y }
    }

    /// Creates a new [`Point`] from raw tick counts.
    pub const fn from_raw(x: i64, y: i64) -> Self {
        Self::new(Fixp::from_raw(x), Fixp::from_raw(y))
    }

    /// Creates a new [`Point`] from coordinates in display units.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let p = Point::from_lambda(1.5, -2.);
    /// assert_eq!(p.x.to_lambda(), 1.5);
    /// assert_eq!(p.y.to_lambda(), -2.);
    /// ```
    pub fn from_lambda(x: f64, y: f64) -> Self {
        Self::new(Fixp::from_lambda(x), Fixp::from_lambda(y))
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let origin = Point::zero();
    /// assert_eq!(origin, Point::from_raw(0, 0));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: Fixp::ZERO,
            y: Fixp::ZERO,
        }
    }

    /// Returns the coordinates in display units.
    #[inline]
    pub fn to_lambda(&self) -> (f64, f64) {
        (self.x.to_lambda(), self.y.to_lambda())
    }

    /// Snaps the x and y coordinates of this point to the nearest multiple of `grid`.
    #[inline]
    pub fn snap_to_grid(&self, grid: Fixp) -> Self {
        Self::new(self.x.round_to_multiple(grid), self.y.round_to_multiple(grid))
    }

    /// The squared euclidean distance to `other`, in squared ticks.
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> i128 {
        let dx = (self.x.raw() - other.x.raw()) as i128;
        let dy = (self.y.raw() - other.y.raw()) as i128;
        dx * dx + dy * dy
    }
}

impl TranslateMut for Point {
    fn translate_mut(&mut self, p: Point) {
        self.x += p.x;
        self.y += p.y;
    }
}

impl TransformMut for Point {
    fn transform_mut(&mut self, trans: Transformation) {
        *self = trans.apply_point(*self);
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl From<(Fixp, Fixp)> for Point {
    fn from(value: (Fixp, Fixp)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_works() {
        let a = Point::from_lambda(1., 2.);
        let b = Point::from_lambda(0.5, -3.);
        assert_eq!(a + b, Point::from_lambda(1.5, -1.));
        assert_eq!(a - b, Point::from_lambda(0.5, 5.));
        assert_eq!(-a, Point::from_lambda(-1., -2.));
        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn snap_to_grid_works() {
        let p = Point::from_raw(14, -14);
        assert_eq!(p.snap_to_grid(Fixp::from_raw(10)), Point::from_raw(10, -10));
    }

    #[test]
    fn distance_sq_works() {
        let a = Point::from_raw(0, 0);
        let b = Point::from_raw(3, 4);
        assert_eq!(a.distance_sq(&b), 25);
    }
}
