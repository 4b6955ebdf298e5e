//! Utilities and types for orienting layout objects.
//!
//! An [`Orientation`] is a rotation by a multiple of a tenth of a degree,
//! optionally preceded by mirroring about either axis. The eight
//! orientations that map axis-aligned rectangles onto axis-aligned
//! rectangles are the [`NamedOrientation`]s; they are transformed with
//! exact integer arithmetic. All other orientations use a floating point
//! matrix that is computed once, when the orientation is created.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::fixp::{round_half_up, Fixp};
use crate::point::Point;
use crate::rect::Rect;

/// The number of angle units in a full turn.
pub const FULL_TURN: i32 = 3600;

/// A named orientation.
///
/// These are exactly the orientations that keep rectangles axis-aligned.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NamedOrientation {
    /// No rotations or reflections.
    #[default]
    R0,
    /// Rotate 90 degrees counter-clockwise.
    R90,
    /// Rotate 180 degrees counter-clockwise.
    R180,
    /// Rotate 270 degrees counter-clockwise.
    R270,
    /// Reflect horizontally (ie. about the y-axis).
    ReflectHoriz,
    /// Reflect vertically (ie. about the x-axis).
    ReflectVert,
    /// Flip across the line y = x.
    FlipYx,
    /// Flip across the line y = -x.
    FlipMinusYx,
}

impl NamedOrientation {
    /// Returns a slice of all 8 possible named rectangular orientations.
    ///
    /// Users should not rely upon the order of the orientations returned.
    pub fn all_rectangular() -> [Self; 8] {
        [
            Self::R0,
            Self::R90,
            Self::R180,
            Self::R270,
            Self::ReflectHoriz,
            Self::ReflectVert,
            Self::FlipYx,
            Self::FlipMinusYx,
        ]
    }

    /// The canonical `(angle, mirror_x)` pair of this orientation.
    const fn canonical(self) -> (u16, bool) {
        match self {
            Self::R0 => (0, false),
            Self::R90 => (900, false),
            Self::R180 => (1800, false),
            Self::R270 => (2700, false),
            Self::ReflectHoriz => (0, true),
            Self::FlipMinusYx => (900, true),
            Self::ReflectVert => (1800, true),
            Self::FlipYx => (2700, true),
        }
    }

    const fn from_canonical(angle: u16, mirror: bool) -> Option<Self> {
        Some(match (angle, mirror) {
            (0, false) => Self::R0,
            (900, false) => Self::R90,
            (1800, false) => Self::R180,
            (2700, false) => Self::R270,
            (0, true) => Self::ReflectHoriz,
            (900, true) => Self::FlipMinusYx,
            (1800, true) => Self::ReflectVert,
            (2700, true) => Self::FlipYx,
            _ => return None,
        })
    }
}

/// The identifying triple of an [`Orientation`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrientationKey {
    /// Counter-clockwise angle in tenths of a degree, in `[0, 3600)`.
    pub angle: u16,
    /// Negate x-coordinates before rotating.
    pub mirror_x: bool,
    /// Negate y-coordinates before rotating.
    pub mirror_y: bool,
}

/// An orientation of a geometric object.
///
/// Captures reflection and rotation, but not position or scaling.
/// Mirroring is applied first, then the counter-clockwise rotation.
///
/// Two orientations are equal if and only if their [`OrientationKey`]s are equal,
/// so `(0, mirror_x, mirror_y)` and `(1800, no mirrors)` are distinct orientations
/// even though they move points identically.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(from = "OrientationKey", into = "OrientationKey")]
pub struct Orientation {
    key: OrientationKey,
    /// Angle after folding `mirror_y` into a half turn.
    angle: u16,
    /// Net reflection about the y-axis, applied before `angle`.
    mirror: bool,
    named: Option<NamedOrientation>,
    /// Row-major linear map.
    mat: [[f64; 2]; 2],
}

impl PartialEq for Orientation {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Orientation {}

impl Hash for Orientation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<OrientationKey> for Orientation {
    fn from(key: OrientationKey) -> Self {
        Self::from_angle_mirror(key.angle as i32, key.mirror_x, key.mirror_y)
    }
}

impl From<Orientation> for OrientationKey {
    fn from(value: Orientation) -> Self {
        value.key
    }
}

impl From<NamedOrientation> for Orientation {
    fn from(value: NamedOrientation) -> Self {
        let (angle, mirror) = value.canonical();
        Self::from_angle_mirror(angle as i32, mirror, false)
    }
}

/// Returns `(cos, sin)` of an angle given in tenths of a degree.
///
/// Trigonometric functions are only evaluated on arguments in `[0, 45]` degrees;
/// other angles are reached through quadrant and octant symmetries.
fn cos_sin(angle: u16) -> (f64, f64) {
    let quadrant = angle / 900;
    let rem = angle % 900;
    let (c, s) = match rem {
        0 => (1., 0.),
        450 => (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        r if r < 450 => {
            let rad = tenths_to_radians(r);
            (rad.cos(), rad.sin())
        }
        r => {
            let rad = tenths_to_radians(900 - r);
            (rad.sin(), rad.cos())
        }
    };
    match quadrant {
        0 => (c, s),
        1 => (-s, c),
        2 => (-c, -s),
        _ => (s, -c),
    }
}

#[inline]
fn tenths_to_radians(angle: u16) -> f64 {
    angle as f64 * PI / 1800.
}

impl Orientation {
    /// Creates an orientation from an angle in tenths of a degree and two mirror flags.
    ///
    /// The angle is wrapped into `[0, 3600)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let o = Orientation::from_angle_mirror(-900, false, false);
    /// assert_eq!(o.angle(), 2700);
    /// assert_eq!(o.named(), Some(NamedOrientation::R270));
    /// ```
    pub fn from_angle_mirror(angle: i32, mirror_x: bool, mirror_y: bool) -> Self {
        let angle = angle.rem_euclid(FULL_TURN) as u16;
        let key = OrientationKey {
            angle,
            mirror_x,
            mirror_y,
        };
        // Mirroring about the x-axis equals mirroring about the y-axis followed by a half turn.
        let canon_angle = if mirror_y { (angle + 1800) % 3600 } else { angle };
        let mirror = mirror_x ^ mirror_y;
        let named = NamedOrientation::from_canonical(canon_angle, mirror);
        let (c, s) = cos_sin(canon_angle);
        let sx = if mirror { -1. } else { 1. };
        Self {
            key,
            angle: canon_angle,
            mirror,
            named,
            mat: [[c * sx, -s], [s * sx, c]],
        }
    }

    /// Creates an unmirrored rotation by `angle` tenths of a degree.
    #[inline]
    pub fn from_angle(angle: i32) -> Self {
        Self::from_angle_mirror(angle, false, false)
    }

    /// Returns the identity orientation.
    pub fn identity() -> Self {
        Self::from(NamedOrientation::R0)
    }

    /// Returns all 8 rectangular orientations.
    ///
    /// Users should not rely upon the order of the orientations returned.
    pub fn all_rectangular() -> [Self; 8] {
        NamedOrientation::all_rectangular().map(Self::from)
    }

    /// Returns the orientation that applies `first` and then `second`.
    ///
    /// The result is in canonical form (`mirror_y` is never set).
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r90 = Orientation::from(NamedOrientation::R90);
    /// let mx = Orientation::from(NamedOrientation::ReflectHoriz);
    /// // Rotate, then negate x.
    /// let o = Orientation::compose(r90, mx);
    /// let p = Point::from_raw(2, 1);
    /// assert_eq!(o.transform_point(p), mx.transform_point(r90.transform_point(p)));
    /// ```
    pub fn compose(first: Orientation, second: Orientation) -> Orientation {
        let alpha = first.angle as i32;
        let beta = second.angle as i32;
        // A reflection conjugates the preceding rotation into its inverse.
        let angle = if second.mirror {
            beta - alpha
        } else {
            beta + alpha
        };
        Self::from_angle_mirror(angle, first.mirror ^ second.mirror, false)
    }

    /// Applies the reflection and rotation specified in
    /// [`Orientation`] `o` to this orientation.
    #[inline]
    pub fn apply(self, o: impl Into<Orientation>) -> Self {
        Self::compose(self, o.into())
    }

    /// Reflects the orientation vertically.
    #[inline]
    pub fn reflected_vert(self) -> Self {
        self.apply(NamedOrientation::ReflectVert)
    }

    /// Reflects the orientation horizontally.
    #[inline]
    pub fn reflected_horiz(self) -> Self {
        self.apply(NamedOrientation::ReflectHoriz)
    }

    /// Rotates the orientation 90 degrees counter-clockwise.
    #[inline]
    pub fn r90(self) -> Self {
        self.apply(NamedOrientation::R90)
    }

    /// Rotates the orientation 180 degrees.
    #[inline]
    pub fn r180(self) -> Self {
        self.apply(NamedOrientation::R180)
    }

    /// Rotates the orientation 270 degrees counter-clockwise.
    #[inline]
    pub fn r270(self) -> Self {
        self.apply(NamedOrientation::R270)
    }

    /// Returns the orientation that undoes this one, in canonical form.
    pub fn inverse(&self) -> Self {
        if self.mirror {
            // Every reflection is its own inverse.
            Self::from_angle_mirror(self.angle as i32, true, false)
        } else {
            Self::from_angle(-(self.angle as i32))
        }
    }

    /// Returns the equivalent orientation with `mirror_y` folded into the angle.
    pub fn canonical(&self) -> Self {
        Self::from_angle_mirror(self.angle as i32, self.mirror, false)
    }

    /// The identifying triple of this orientation.
    #[inline]
    pub fn key(&self) -> OrientationKey {
        self.key
    }

    /// Returns the angle associated with this orientation, in tenths of a degree.
    #[inline]
    pub fn angle(&self) -> u16 {
        self.key.angle
    }

    /// Returns whether x-coordinates are negated before rotating.
    #[inline]
    pub fn mirror_x(&self) -> bool {
        self.key.mirror_x
    }

    /// Returns whether y-coordinates are negated before rotating.
    #[inline]
    pub fn mirror_y(&self) -> bool {
        self.key.mirror_y
    }

    /// Returns the named orientation, if this orientation keeps rectangles axis-aligned.
    #[inline]
    pub fn named(&self) -> Option<NamedOrientation> {
        self.named
    }

    /// Returns `true` if this orientation is one of the 8 Manhattan orientations.
    #[inline]
    pub fn is_manhattan(&self) -> bool {
        self.named.is_some()
    }

    /// Returns `true` if this orientation leaves every point in place.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.named == Some(NamedOrientation::R0)
    }

    /// The determinant of the linear map: `-1` if it flips handedness, `1` otherwise.
    #[inline]
    pub fn determinant(&self) -> i32 {
        if self.mirror {
            -1
        } else {
            1
        }
    }

    /// The row-major 2x2 matrix of this orientation.
    #[inline]
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        self.mat
    }

    /// Transforms a point about the origin.
    pub fn transform_point(&self, p: Point) -> Point {
        use NamedOrientation::*;
        let Point { x, y } = p;
        let Some(named) = self.named else {
            let xf = x.raw() as f64;
            let yf = y.raw() as f64;
            let m = &self.mat;
            return Point::from_raw(
                round_half_up(m[0][0] * xf + m[0][1] * yf),
                round_half_up(m[1][0] * xf + m[1][1] * yf),
            );
        };
        let (x, y) = match named {
            R0 => (x, y),
            R90 => (-y, x),
            R180 => (-x, -y),
            R270 => (y, -x),
            ReflectHoriz => (-x, y),
            ReflectVert => (x, -y),
            FlipYx => (y, x),
            FlipMinusYx => (-y, -x),
        };
        Point::new(x, y)
    }

    /// Transforms an axis-aligned rectangle about the origin, then translates it by `offset`.
    ///
    /// Manhattan orientations relabel the sides exactly. Other orientations
    /// return the smallest tick-aligned rectangle containing the rotated rectangle.
    pub fn transform_bounds(&self, rect: Rect, offset: Point) -> Rect {
        use NamedOrientation::*;
        let (l, b, r, t) = (rect.left(), rect.bot(), rect.right(), rect.top());
        let Some(named) = self.named else {
            return self.transform_bounds_general(rect, offset);
        };
        let (l, b, r, t) = match named {
            R0 => (l, b, r, t),
            R90 => (-t, l, -b, r),
            R180 => (-r, -t, -l, -b),
            R270 => (b, -r, t, -l),
            ReflectHoriz => (-r, b, -l, t),
            ReflectVert => (l, -t, r, -b),
            FlipYx => (b, l, t, r),
            FlipMinusYx => (-t, -r, -b, -l),
        };
        Rect::from_corners_unchecked(
            Point::new(l + offset.x, b + offset.y),
            Point::new(r + offset.x, t + offset.y),
        )
    }

    fn transform_bounds_general(&self, rect: Rect, offset: Point) -> Rect {
        let (l, b) = (rect.left().raw() as f64, rect.bot().raw() as f64);
        let (r, t) = (rect.right().raw() as f64, rect.top().raw() as f64);
        // For each output axis, the extreme corner is selected by the sign of each matrix entry.
        let extent = |row: [f64; 2]| {
            let (xlo, xhi) = if row[0] >= 0. {
                (row[0] * l, row[0] * r)
            } else {
                (row[0] * r, row[0] * l)
            };
            let (ylo, yhi) = if row[1] >= 0. {
                (row[1] * b, row[1] * t)
            } else {
                (row[1] * t, row[1] * b)
            };
            (
                Fixp::from_raw((xlo + ylo).floor() as i64),
                Fixp::from_raw((xhi + yhi).ceil() as i64),
            )
        };
        let (x0, x1) = extent(self.mat[0]);
        let (y0, y1) = extent(self.mat[1]);
        Rect::from_corners_unchecked(
            Point::new(x0 + offset.x, y0 + offset.y),
            Point::new(x1 + offset.x, y1 + offset.y),
        )
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.mirror_x {
            write!(f, "MX ")?;
        }
        if self.key.mirror_y {
            write!(f, "MY ")?;
        }
        let angle = self.key.angle;
        if angle % 10 == 0 {
            write!(f, "R{}", angle / 10)
        } else {
            write!(f, "R{}.{}", angle / 10, angle % 10)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use super::*;

    fn manhattan() -> [Orientation; 8] {
        Orientation::all_rectangular()
    }

    fn samples() -> Vec<Orientation> {
        let mut v = manhattan().to_vec();
        for angle in [1, 300, 450, 451, 1234, 2250, 3599] {
            v.push(Orientation::from_angle(angle));
            v.push(Orientation::from_angle_mirror(angle, true, false));
            v.push(Orientation::from_angle_mirror(angle, false, true));
        }
        v
    }

    fn brute_force_bounds(o: &Orientation, rect: Rect) -> Rect {
        let corners = rect.corners().map(|c| o.transform_point(c));
        Rect::union_all_option(corners.into_iter().map(Rect::from_point)).unwrap()
    }

    #[test]
    fn rectangular_orientations_have_unique_keys() {
        let set: HashSet<OrientationKey> = manhattan().iter().map(|o| o.key()).collect();
        assert_eq!(set.len(), 8);
        assert!(manhattan().iter().all(|o| o.is_manhattan()));
    }

    #[test]
    fn angle_is_wrapped() {
        assert_eq!(Orientation::from_angle(3600).angle(), 0);
        assert_eq!(Orientation::from_angle(-10).angle(), 3590);
        assert_eq!(Orientation::from_angle(7250).angle(), 50);
        assert_eq!(Orientation::from_angle(-3600), Orientation::identity());
    }

    #[test]
    fn equality_is_by_key() {
        let a = Orientation::from_angle_mirror(0, true, true);
        let b = Orientation::from_angle(1800);
        assert_ne!(a, b);
        assert_eq!(a.canonical(), b);
        let p = Point::from_raw(5, -7);
        assert_eq!(a.transform_point(p), b.transform_point(p));
    }

    #[test]
    fn point_transformations_work() {
        use NamedOrientation::*;
        let pt = Point::from_raw(2, 1);
        let cases = [
            (R0, (2, 1)),
            (R90, (-1, 2)),
            (R180, (-2, -1)),
            (R270, (1, -2)),
            (ReflectHoriz, (-2, 1)),
            (ReflectVert, (2, -1)),
            (FlipYx, (1, 2)),
            (FlipMinusYx, (-1, -2)),
        ];
        for (named, (x, y)) in cases {
            let o = Orientation::from(named);
            assert_eq!(o.transform_point(pt), Point::from_raw(x, y), "{named:?}");
            // The exact path agrees with the floating point matrix.
            let m = o.matrix();
            assert_eq!(m[0][0] * 2. + m[0][1], x as f64);
            assert_eq!(m[1][0] * 2. + m[1][1], y as f64);
        }
    }

    #[test]
    fn mirror_y_is_folded() {
        let o = Orientation::from_angle_mirror(900, false, true);
        // (x, y) -> (x, -y) -> rotate 90 -> (y, x)
        assert_eq!(o.named(), Some(NamedOrientation::FlipYx));
        assert_eq!(o.transform_point(Point::from_raw(2, 1)), Point::from_raw(1, 2));
    }

    #[test]
    fn manhattan_composition_is_closed() {
        for a in manhattan() {
            for b in manhattan() {
                let c = Orientation::compose(a, b);
                assert!(c.is_manhattan(), "{a} then {b} gave {c}");
                let p = Point::from_raw(3, 7);
                assert_eq!(c.transform_point(p), b.transform_point(a.transform_point(p)));
            }
            assert_eq!(Orientation::compose(a, a.inverse()), Orientation::identity());
            assert_eq!(Orientation::compose(a.inverse(), a), Orientation::identity());
        }
    }

    #[test]
    fn rotation_and_reflection_helpers_work() {
        use NamedOrientation::*;
        let p = Point::from_raw(2, 1);
        for o in manhattan() {
            let r90 = Orientation::from(R90);
            assert_eq!(o.r90().transform_point(p), r90.transform_point(o.transform_point(p)));
            assert_eq!(o.r90().r90(), o.r180());
            assert_eq!(o.r180().r90(), o.r270());
            assert_eq!(o.r90().r270(), o.canonical());
            assert_eq!(o.reflected_vert().reflected_vert(), o.canonical());
            assert_eq!(o.reflected_horiz().reflected_horiz(), o.canonical());
            assert_ne!(o.reflected_vert().determinant(), o.determinant());
        }
        let id = Orientation::identity();
        assert_eq!(id.reflected_horiz().named(), Some(ReflectHoriz));
        assert_eq!(id.reflected_vert().named(), Some(ReflectVert));
        assert_eq!(id.r90().named(), Some(R90));
        assert_eq!(id.reflected_horiz().r90().named(), Some(FlipMinusYx));
    }

    #[test]
    fn composition_is_associative() {
        let all = samples();
        for a in &all {
            for b in &all {
                for c in all.iter().step_by(5) {
                    let left = Orientation::compose(Orientation::compose(*a, *b), *c);
                    let right = Orientation::compose(*a, Orientation::compose(*b, *c));
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn general_composition_matches_matrix_product() {
        let all = samples();
        for a in &all {
            for b in &all {
                let c = Orientation::compose(*a, *b);
                let (ma, mb, mc) = (a.matrix(), b.matrix(), c.matrix());
                for i in 0..2 {
                    for j in 0..2 {
                        let expected = mb[i][0] * ma[0][j] + mb[i][1] * ma[1][j];
                        assert!(
                            (mc[i][j] - expected).abs() < 1e-12,
                            "{a} then {b}: entry ({i}, {j})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn every_orientation_has_an_inverse() {
        for o in samples() {
            assert_eq!(Orientation::compose(o, o.inverse()), Orientation::identity());
            assert_eq!(o.determinant(), o.inverse().determinant());
        }
    }

    #[test]
    fn determinant_reflects_handedness() {
        assert_eq!(Orientation::from_angle(1234).determinant(), 1);
        assert_eq!(Orientation::from_angle_mirror(1234, true, false).determinant(), -1);
        assert_eq!(Orientation::from_angle_mirror(1234, false, true).determinant(), -1);
        assert_eq!(Orientation::from_angle_mirror(1234, true, true).determinant(), 1);
        for o in samples() {
            let m = o.matrix();
            let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
            assert_relative_eq!(det, o.determinant() as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn manhattan_bounds_match_brute_force() {
        let rects = [
            Rect::from_raw_sides(0, 0, 100, 200),
            Rect::from_raw_sides(-50, 20, 90, 250),
            Rect::from_raw_sides(-7, -7, -7, -7),
            Rect::from_raw_sides(13, -400, 14, -3),
        ];
        let offset = Point::from_raw(17, -29);
        for o in manhattan() {
            for rect in rects {
                let fast = o.transform_bounds(rect, Point::zero());
                assert_eq!(fast, brute_force_bounds(&o, rect), "{o} on {rect:?}");
                let mut shifted = brute_force_bounds(&o, rect);
                crate::transform::TranslateMut::translate_mut(&mut shifted, offset);
                assert_eq!(o.transform_bounds(rect, offset), shifted);
            }
        }
    }

    #[test]
    fn general_bounds_are_tight_and_conservative() {
        let rect = Rect::from_lambda(-3., 1., 5., 4.);
        for angle in [1, 300, 450, 1234, 2250, 3599] {
            for mirror in [false, true] {
                let o = Orientation::from_angle_mirror(angle, mirror, false);
                let bounds = o.transform_bounds(rect, Point::zero());
                let exact = brute_force_bounds(&o, rect);
                assert!(bounds.contains_rect(&exact), "{o}");
                assert!(exact.expand_all(Fixp::from_raw(2)).contains_rect(&bounds), "{o}");
            }
        }
    }

    #[test]
    fn diagonal_matches_closed_form() {
        let o = Orientation::from_angle(450);
        assert!(!o.is_manhattan());
        let (c, s) = ((PI / 4.).cos(), (PI / 4.).sin());
        let m = o.matrix();
        assert_relative_eq!(m[0][0], c, epsilon = 1e-15);
        assert_relative_eq!(m[1][0], s, epsilon = 1e-15);
        for (x, y) in [(1.0, 0.0), (3.5, -2.0), (-10.25, 7.75), (1000.0, 1000.0)] {
            let p = o.transform_point(Point::from_lambda(x, y));
            let (px, py) = p.to_lambda();
            let tick = 1. / crate::fixp::FIXP_PER_LAMBDA as f64;
            assert_relative_eq!(px, x * c - y * s, epsilon = tick);
            assert_relative_eq!(py, x * s + y * c, epsilon = tick);
        }
    }

    #[test]
    fn folded_trig_matches_direct_trig() {
        for angle in (0..3600).step_by(7) {
            let o = Orientation::from_angle(angle);
            let rad = (angle as f64).to_radians() / 10.;
            let m = o.matrix();
            assert_relative_eq!(m[0][0], rad.cos(), epsilon = 1e-12);
            assert_relative_eq!(m[1][0], rad.sin(), epsilon = 1e-12);
            assert_relative_eq!(m[0][1], -rad.sin(), epsilon = 1e-12);
            assert_relative_eq!(m[1][1], rad.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn diagonal_neighbors_are_continuous() {
        let m = Orientation::from_angle(450).matrix();
        for angle in [449, 451] {
            let n = Orientation::from_angle(angle).matrix();
            for i in 0..2 {
                for j in 0..2 {
                    assert!((m[i][j] - n[i][j]).abs() < 2e-3);
                }
            }
        }
    }

    #[test]
    fn display_works() {
        assert_eq!(Orientation::from_angle(900).to_string(), "R90");
        assert_eq!(
            Orientation::from_angle_mirror(455, true, false).to_string(),
            "MX R45.5"
        );
        assert_eq!(
            Orientation::from_angle_mirror(0, true, true).to_string(),
            "MX MY R0"
        );
    }
}
