//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::fixp::Fixp;
use crate::point::Point;
use crate::transform::{TransformMut, Transformation, TranslateMut};

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
///
/// Zero-width and zero-height rectangles are valid.
/// The only way to obtain an inverted rectangle (one with `left > right` or
/// `bot > top`) is [`Rect::intersect`] on disjoint inputs; such rectangles
/// report [`Rect::is_empty`].
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a zero-area rectangle containing the given point.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_point(Point::from_lambda(2.5, 6.));
    /// assert_eq!(rect.top(), Fixp::from_lambda(6.));
    /// assert_eq!(rect.bot(), Fixp::from_lambda(6.));
    /// assert_eq!(rect.width(), Fixp::ZERO);
    /// ```
    #[inline]
    pub const fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    ///
    /// If you want sides to be sorted for you, consider using [`Rect::new`] instead.
    #[inline]
    pub fn from_sides(left: Fixp, bot: Fixp, right: Fixp, top: Fixp) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self::from_corners_unchecked(Point::new(left, bot), Point::new(right, top))
    }

    /// Creates a rectangle from sides given in raw ticks.
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    #[inline]
    pub fn from_raw_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        Self::from_sides(
            Fixp::from_raw(left),
            Fixp::from_raw(bot),
            Fixp::from_raw(right),
            Fixp::from_raw(top),
        )
    }

    /// Creates a rectangle from two opposite corners given in display units.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_lambda(3., 0., 1., 2.);
    /// assert_eq!(rect.left(), Fixp::from_lambda(1.));
    /// assert_eq!(rect.right(), Fixp::from_lambda(3.));
    /// ```
    pub fn from_lambda(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Point::from_lambda(x0, y0), Point::from_lambda(x1, y1))
    }

    /// Creates a new rectangle from the given opposite corner points.
    #[inline]
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        let p0 = lower_left;
        let p1 = upper_right;
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    #[inline]
    pub(crate) const fn from_corners_unchecked(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    /// Returns the bottom y-coordinate of the rectangle.
    #[inline]
    pub const fn bot(&self) -> Fixp {
        self.p0.y
    }

    /// Returns the top y-coordinate of the rectangle.
    #[inline]
    pub const fn top(&self) -> Fixp {
        self.p1.y
    }

    /// Returns the left x-coordinate of the rectangle.
    #[inline]
    pub const fn left(&self) -> Fixp {
        self.p0.x
    }

    /// Returns the right x-coordinate of the rectangle.
    #[inline]
    pub const fn right(&self) -> Fixp {
        self.p1.x
    }

    /// Returns the lower-left corner.
    #[inline]
    pub const fn lower_left(&self) -> Point {
        self.p0
    }

    /// Returns the upper-right corner.
    #[inline]
    pub const fn upper_right(&self) -> Point {
        self.p1
    }

    /// Returns the four corners, counter-clockwise from the lower-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.p0,
            Point::new(self.p1.x, self.p0.y),
            self.p1,
            Point::new(self.p0.x, self.p1.y),
        ]
    }

    /// Returns the horizontal extent of the rectangle.
    #[inline]
    pub fn width(&self) -> Fixp {
        self.p1.x - self.p0.x
    }

    /// Returns the vertical extent of the rectangle.
    #[inline]
    pub fn height(&self) -> Fixp {
        self.p1.y - self.p0.y
    }

    /// Returns the area of the rectangle, in squared ticks.
    ///
    /// The product of two tick counts does not fit in an `i64`,
    /// so the area is widened to `i128`.
    #[inline]
    pub fn area(&self) -> i128 {
        self.width().raw() as i128 * self.height().raw() as i128
    }

    /// Returns the center point of the rectangle.
    ///
    /// Odd tick sums round toward negative infinity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_raw_sides(0, 0, 200, 100);
    /// assert_eq!(rect.center(), Point::from_raw(100, 50));
    /// let rect = Rect::from_raw_sides(0, 0, 55, 45);
    /// assert_eq!(rect.center(), Point::from_raw(27, 22));
    /// ```
    pub const fn center(&self) -> Point {
        Point::new(
            Fixp::midpoint(self.p0.x, self.p1.x),
            Fixp::midpoint(self.p0.y, self.p1.y),
        )
    }

    /// Returns `true` if the rectangle is inverted along either axis.
    ///
    /// Zero-area rectangles are not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r1 = Rect::from_raw_sides(0, 0, 10, 10);
    /// let r2 = Rect::from_raw_sides(20, -5, 30, 5);
    /// assert_eq!(r1.union(r2), Rect::from_raw_sides(0, -5, 30, 10));
    /// ```
    pub fn union(self, other: Self) -> Self {
        Self::from_corners_unchecked(
            Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        )
    }

    /// Returns the union of all rectangles in the iterator, or `None` if it is empty.
    pub fn union_all_option<T>(rects: impl Iterator<Item = T>) -> Option<Self>
    where
        T: Into<Option<Rect>>,
    {
        rects
            .filter_map(|r| -> Option<Rect> { r.into() })
            .reduce(|acc: Rect, r: Rect| acc.union(r))
    }

    /// Returns the overlapping region of `self` and `other`.
    ///
    /// If the rectangles are disjoint, the result is inverted along at least
    /// one axis and [`Rect::is_empty`] returns `true`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r1 = Rect::from_raw_sides(0, 0, 10, 10);
    /// let r2 = Rect::from_raw_sides(5, 5, 20, 20);
    /// assert_eq!(r1.intersect(r2), Rect::from_raw_sides(5, 5, 10, 10));
    /// let r3 = Rect::from_raw_sides(15, 15, 20, 20);
    /// assert!(r1.intersect(r3).is_empty());
    /// ```
    pub fn intersect(self, other: Self) -> Self {
        Self::from_corners_unchecked(
            Point::new(self.p0.x.max(other.p0.x), self.p0.y.max(other.p0.y)),
            Point::new(self.p1.x.min(other.p1.x), self.p1.y.min(other.p1.y)),
        )
    }

    /// Returns the overlapping region of `self` and `other`, or `None` if they are disjoint.
    pub fn intersection(self, other: Self) -> Option<Self> {
        let r = self.intersect(other);
        (!r.is_empty()).then_some(r)
    }

    /// Returns `true` if `p` lies inside the rectangle grown by `epsilon` on every side.
    ///
    /// Points on the boundary are contained.
    pub fn contains_point(&self, p: Point, epsilon: Fixp) -> bool {
        p.x >= self.p0.x - epsilon
            && p.x <= self.p1.x + epsilon
            && p.y >= self.p0.y - epsilon
            && p.y <= self.p1.y + epsilon
    }

    /// Returns `true` if `other` lies entirely inside `self`, boundaries included.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.p0.x >= self.p0.x
            && other.p1.x <= self.p1.x
            && other.p0.y >= self.p0.y
            && other.p1.y <= self.p1.y
    }

    /// Returns `true` if `p` is within `epsilon` of one of the rectangle's edges.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_raw_sides(0, 0, 100, 100);
    /// let eps = Fixp::from_raw(2);
    /// assert!(rect.is_near_boundary(Point::from_raw(101, 50), eps));
    /// assert!(rect.is_near_boundary(Point::from_raw(50, 1), eps));
    /// assert!(!rect.is_near_boundary(Point::from_raw(50, 50), eps));
    /// assert!(!rect.is_near_boundary(Point::from_raw(50, 103), eps));
    /// ```
    pub fn is_near_boundary(&self, p: Point, epsilon: Fixp) -> bool {
        if !self.contains_point(p, epsilon) {
            return false;
        }
        (p.x - self.p0.x).abs() <= epsilon
            || (p.x - self.p1.x).abs() <= epsilon
            || (p.y - self.p0.y).abs() <= epsilon
            || (p.y - self.p1.y).abs() <= epsilon
    }

    /// Returns `true` if the two rectangles overlap.
    ///
    /// When `include_edges` is `false`, rectangles that only touch along an
    /// edge or at a corner do not overlap.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r1 = Rect::from_raw_sides(0, 0, 10, 10);
    /// let r2 = Rect::from_raw_sides(10, 0, 20, 10);
    /// assert!(r1.overlaps(&r2, true));
    /// assert!(!r1.overlaps(&r2, false));
    /// ```
    pub fn overlaps(&self, other: &Rect, include_edges: bool) -> bool {
        if include_edges {
            self.p0.x <= other.p1.x
                && other.p0.x <= self.p1.x
                && self.p0.y <= other.p1.y
                && other.p0.y <= self.p1.y
        } else {
            self.p0.x < other.p1.x
                && other.p0.x < self.p1.x
                && self.p0.y < other.p1.y
                && other.p0.y < self.p1.y
        }
    }

    /// Expands the rectangle by `amount` on all sides.
    pub fn expand_all(&self, amount: Fixp) -> Self {
        Self::new(
            Point::new(self.p0.x - amount, self.p0.y - amount),
            Point::new(self.p1.x + amount, self.p1.y + amount),
        )
    }

    /// Snaps the corners of this rectangle to the given grid.
    pub fn snap_to_grid(&self, grid: Fixp) -> Self {
        Self::new(self.p0.snap_to_grid(grid), self.p1.snap_to_grid(grid))
    }
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        (!self.is_empty()).then_some(*self)
    }
}

impl TranslateMut for Rect {
    fn translate_mut(&mut self, p: Point) {
        self.p0.translate_mut(p);
        self.p1.translate_mut(p);
    }
}

impl TransformMut for Rect {
    fn transform_mut(&mut self, trans: Transformation) {
        *self = trans.apply_bounds(*self);
    }
}
