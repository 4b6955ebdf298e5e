//! Transformation types and traits.

use impl_trait_for_tuples::impl_for_tuples;
use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;
use crate::point::Point;
use crate::rect::Rect;

/// A rigid transformation: an [`Orientation`] about the origin followed by a translation.
///
/// This object does not support scaling of geometry.
/// Whether the transformation is the identity is cached when it is built,
/// so untransformed geometry skips all matrix work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTransformation", into = "RawTransformation")]
pub struct Transformation {
    /// The rotation and reflection.
    orient: Orientation,
    /// The x-y translation applied after the orientation.
    b: Point,
    identity: bool,
}

#[derive(Serialize, Deserialize)]
struct RawTransformation {
    orientation: Orientation,
    offset: Point,
}

impl From<RawTransformation> for Transformation {
    fn from(value: RawTransformation) -> Self {
        Self::new(value.orientation, value.offset)
    }
}

impl From<Transformation> for RawTransformation {
    fn from(value: Transformation) -> Self {
        Self {
            orientation: value.orient,
            offset: value.b,
        }
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    fn new(orient: Orientation, b: Point) -> Self {
        Self {
            orient,
            b,
            identity: orient.is_identity() && b == Point::zero(),
        }
    }

    /// Returns the identity transform, leaving any transformed object unmodified.
    pub fn identity() -> Self {
        Self::new(Orientation::identity(), Point::zero())
    }

    /// Returns a translation by `(x,y)`.
    pub fn translate(x: crate::fixp::Fixp, y: crate::fixp::Fixp) -> Self {
        Self::new(Orientation::identity(), Point::new(x, y))
    }

    /// Returns a rotation and/or reflection about the origin.
    pub fn rotate(orientation: impl Into<Orientation>) -> Self {
        Self::new(orientation.into(), Point::zero())
    }

    /// Returns a new [`TransformationBuilder`].
    #[inline]
    pub fn builder() -> TransformationBuilder {
        TransformationBuilder::default()
    }

    /// Creates a transform from only an offset.
    pub fn from_offset(offset: Point) -> Self {
        Self::new(Orientation::identity(), offset)
    }

    /// Creates a transform from an offset and [`Orientation`].
    pub fn from_offset_and_orientation(offset: Point, orientation: impl Into<Orientation>) -> Self {
        Self::new(orientation.into(), offset)
    }

    /// Create a new [`Transformation`] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each layer of instance has a nested set of transformations relative to its top-level parent.
    /// The result applies `child` first and `parent` second.
    ///
    /// Note this operation *is not* commutative.
    /// For example the set of transformations:
    /// * (a) Reflect vertically, then
    /// * (b) Translate by (1,1)
    /// * (c) Place a point at (local coordinate) (1,1)
    ///
    /// Lands said point at (2,-2) in top-level space,
    /// whereas reversing the order of (a) and (b) lands it at (2,0).
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        if parent.identity {
            return child;
        }
        if child.identity {
            return parent;
        }
        // The result-transform's origin is the parent's origin,
        // plus the parent-oriented child's origin
        let b = parent.orient.transform_point(child.b) + parent.b;
        let orient = Orientation::compose(child.orient, parent.orient);
        Self::new(orient, b)
    }

    /// Returns the transformation that applies `inner` first and then `self`.
    ///
    /// Used when moving geometry up the hierarchy, from an instance's cell into its parent.
    #[inline]
    pub fn compose(&self, inner: Transformation) -> Transformation {
        Self::cascade(*self, inner)
    }

    /// Returns the transformation that applies `self` first and then `outer`.
    #[inline]
    pub fn pre_compose(&self, outer: Transformation) -> Transformation {
        Self::cascade(outer, *self)
    }

    /// The point representing the translation of this transformation.
    #[inline]
    pub fn offset_point(&self) -> Point {
        self.b
    }

    /// Returns the [`Orientation`] of this transformation.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orient
    }

    /// Returns `true` if this transformation leaves every point in place.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Returns the inverse [`Transformation`] of `self`.
    ///
    /// The inverse is exact for Manhattan orientations.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let trans = Transformation::from_offset_and_orientation(
    ///     Point::from_lambda(5., 10.),
    ///     NamedOrientation::R90,
    /// );
    /// let inv = trans.inv();
    ///
    /// assert!(Transformation::cascade(inv, trans).is_identity());
    /// ```
    pub fn inv(&self) -> Transformation {
        if self.identity {
            return *self;
        }
        let inv = self.orient.inverse();
        let invb = inv.transform_point(self.b);
        Self::new(inv, -invb)
    }

    /// Applies this transformation to a point.
    #[inline]
    pub fn apply_point(&self, p: Point) -> Point {
        if self.identity {
            return p;
        }
        self.orient.transform_point(p) + self.b
    }

    /// Applies this transformation to an axis-aligned rectangle,
    /// returning the bounding box of the result.
    #[inline]
    pub fn apply_bounds(&self, rect: Rect) -> Rect {
        if self.identity {
            return rect;
        }
        self.orient.transform_bounds(rect, self.b)
    }

    /// Applies this transformation to every point in `points`.
    pub fn apply_points(&self, points: &[Point]) -> Vec<Point> {
        if self.identity {
            return points.to_vec();
        }
        points.iter().map(|&p| self.apply_point(p)).collect()
    }

    /// Applies this transformation to every rectangle in `rects`.
    pub fn apply_rects(&self, rects: &[Rect]) -> Vec<Rect> {
        if self.identity {
            return rects.to_vec();
        }
        rects.iter().map(|&r| self.apply_bounds(r)).collect()
    }
}

impl<T> From<T> for Transformation
where
    T: Into<Orientation>,
{
    fn from(value: T) -> Self {
        Self::rotate(value)
    }
}

/// A builder for creating transformations from translations and [`Orientation`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationBuilder {
    offset: Point,
    angle: i32,
    mirror_x: bool,
    mirror_y: bool,
}

impl TransformationBuilder {
    /// Specifies the x-y translation encoded by the transformation.
    pub fn point(&mut self, point: impl Into<Point>) -> &mut Self {
        self.offset = point.into();
        self
    }

    /// Specifies the [`Orientation`] applied by this transformation.
    ///
    /// This overrides any angle and mirror settings previously applied.
    pub fn orientation(&mut self, o: impl Into<Orientation>) -> &mut Self {
        let o = o.into();
        self.angle = o.angle() as i32;
        self.mirror_x = o.mirror_x();
        self.mirror_y = o.mirror_y();
        self
    }

    /// Specifies the counter-clockwise angle of rotation, in tenths of a degree.
    pub fn angle(&mut self, angle: i32) -> &mut Self {
        self.angle = angle;
        self
    }

    /// Specifies whether x-coordinates are negated before rotating.
    pub fn mirror_x(&mut self, mirror_x: bool) -> &mut Self {
        self.mirror_x = mirror_x;
        self
    }

    /// Specifies whether y-coordinates are negated before rotating.
    pub fn mirror_y(&mut self, mirror_y: bool) -> &mut Self {
        self.mirror_y = mirror_y;
        self
    }

    /// Builds a [`Transformation`] from the specified parameters.
    pub fn build(&mut self) -> Transformation {
        let orient = Orientation::from_angle_mirror(self.angle, self.mirror_x, self.mirror_y);
        Transformation::new(orient, self.offset)
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
#[impl_for_tuples(32)]
pub trait TransformMut {
    /// Applies matrix-vector [`Transformation`] `trans`.
    fn transform_mut(&mut self, trans: Transformation);
}

impl<T: TransformMut> TransformMut for Vec<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        if trans.is_identity() {
            return;
        }
        for i in self.iter_mut() {
            i.transform_mut(trans);
        }
    }
}

impl<T: TransformMut> TransformMut for Option<T> {
    fn transform_mut(&mut self, trans: Transformation) {
        if let Some(inner) = self.as_mut() {
            inner.transform_mut(trans);
        }
    }
}

/// A trait for specifying how an object is changed by a [`Transformation`].
///
/// Takes in an owned copy of the shape and returns the transformed version.
pub trait Transform: TransformMut + Sized {
    /// Applies matrix-vector [`Transformation`] `trans`.
    ///
    /// Creates a new shape at a location equal to the transformation of the original.
    #[inline]
    fn transform(mut self, trans: Transformation) -> Self {
        self.transform_mut(trans);
        self
    }
}

impl<T: TransformMut + Sized> Transform for T {}

/// A trait for specifying how a shape is translated by a [`Point`].
#[impl_for_tuples(32)]
pub trait TranslateMut {
    /// Translates the shape by a [`Point`] through mutation.
    fn translate_mut(&mut self, p: Point);
}

impl<T: TranslateMut> TranslateMut for Vec<T> {
    fn translate_mut(&mut self, p: Point) {
        for i in self.iter_mut() {
            i.translate_mut(p);
        }
    }
}

impl<T: TranslateMut> TranslateMut for Option<T> {
    fn translate_mut(&mut self, p: Point) {
        if let Some(inner) = self.as_mut() {
            inner.translate_mut(p);
        }
    }
}

/// A trait for specifying how a shape is translated by a [`Point`].
///
/// Takes in an owned copy of the shape and returns the translated version.
pub trait Translate: TranslateMut + Sized {
    /// Translates the shape by a [`Point`] through mutation.
    ///
    /// Creates a new shape at a location equal to the translation of the original.
    fn translate(mut self, p: Point) -> Self {
        self.translate_mut(p);
        self
    }
}

impl<T: TranslateMut + Sized> Translate for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixp::Fixp;
    use crate::orientation::NamedOrientation;

    fn r(l: i64, b: i64, rt: i64, t: i64) -> Rect {
        Rect::from_raw_sides(l, b, rt, t)
    }

    fn general() -> Vec<Orientation> {
        vec![
            Orientation::from_angle(300),
            Orientation::from_angle_mirror(1234, true, false),
        ]
    }

    #[test]
    fn cascade_identity_preserves_transformation() {
        for orientation in NamedOrientation::all_rectangular() {
            let tf = Transformation::from_offset_and_orientation(Point::from_raw(520, 130), orientation);
            let casc = Transformation::cascade(tf, Transformation::identity());
            assert_eq!(
                tf, casc,
                "Cascading with identity produced incorrect transformation for orientation {:?}",
                orientation
            );
            let casc = Transformation::cascade(Transformation::identity(), tf);
            assert_eq!(tf, casc);
        }
    }

    #[test]
    fn identity_is_detected() {
        assert!(Transformation::identity().is_identity());
        assert!(Transformation::builder().build().is_identity());
        assert!(!Transformation::from_offset(Point::from_raw(1, 0)).is_identity());
        assert!(!Transformation::rotate(NamedOrientation::R90).is_identity());
        let tf = Transformation::from_offset_and_orientation(Point::from_raw(3, 4), NamedOrientation::R90);
        assert!(tf.compose(tf.inv()).is_identity());
    }

    #[test]
    fn transformation_offset_and_orientation_preserves_components() {
        let pt = Point::from_raw(8930, 730);
        for orientation in NamedOrientation::all_rectangular() {
            let tf = Transformation::from_offset_and_orientation(pt, orientation);
            assert_eq!(tf.orientation(), orientation.into());
            assert_eq!(tf.offset_point(), pt);
            let built = Transformation::builder()
                .point(pt)
                .orientation(orientation)
                .build();
            assert_eq!(tf, built);
        }
    }

    #[test]
    fn point_transformations_work() {
        let pt = Point::from_raw(2, 1);

        let pt_reflect_vert = pt.transform(Transformation::from_offset_and_orientation(
            Point::zero(),
            NamedOrientation::ReflectVert,
        ));
        assert_eq!(pt_reflect_vert, Point::from_raw(2, -1));

        let pt_r90 = pt.transform(Transformation::from_offset_and_orientation(
            Point::from_raw(23, 11),
            NamedOrientation::R90,
        ));
        assert_eq!(pt_r90, Point::from_raw(22, 13));

        let pt_r180 = pt.transform(Transformation::from_offset_and_orientation(
            Point::from_raw(-50, 10),
            NamedOrientation::R180,
        ));
        assert_eq!(pt_r180, Point::from_raw(-52, 9));

        let pt_r270 = pt.transform(Transformation::from_offset_and_orientation(
            Point::from_raw(80, 90),
            NamedOrientation::R270,
        ));
        assert_eq!(pt_r270, Point::from_raw(81, 88));

        let pt_flip_yx = pt.transform(Transformation::from_offset_and_orientation(
            Point::from_raw(-65, -101),
            NamedOrientation::FlipYx,
        ));
        assert_eq!(pt_flip_yx, Point::from_raw(-64, -99));
    }

    #[test]
    fn cascade_order_matters() {
        // Reflect vertically, then translate by (1, 1).
        let reflect = Transformation::rotate(NamedOrientation::ReflectVert);
        let shift = Transformation::from_offset(Point::from_raw(1, 1));
        let p = Point::from_raw(1, 1);
        assert_eq!(
            Transformation::cascade(shift, reflect).apply_point(p),
            Point::from_raw(2, 0)
        );
        assert_eq!(
            Transformation::cascade(reflect, shift).apply_point(p),
            Point::from_raw(2, -2)
        );
        assert_eq!(reflect.pre_compose(shift), shift.compose(reflect));
    }

    #[test]
    fn composition_matches_sequential_application() {
        let mut orientations: Vec<Orientation> = Orientation::all_rectangular().to_vec();
        orientations.extend(general());
        let pts = [Point::from_lambda(1.5, -2.), Point::from_lambda(-7., 3.25)];
        for a in &orientations {
            for b in &orientations {
                let t1 = Transformation::from_offset_and_orientation(Point::from_lambda(3., 4.), *a);
                let t2 = Transformation::from_offset_and_orientation(Point::from_lambda(-1., 0.5), *b);
                let t3 = t1.compose(t2);
                let t4 = t1.pre_compose(t2);
                for p in pts {
                    let seq = t1.apply_point(t2.apply_point(p));
                    let rev = t2.apply_point(t1.apply_point(p));
                    if a.is_manhattan() && b.is_manhattan() {
                        assert_eq!(t3.apply_point(p), seq);
                        assert_eq!(t4.apply_point(p), rev);
                    } else {
                        assert!(t3.apply_point(p).distance_sq(&seq) <= 8);
                        assert!(t4.apply_point(p).distance_sq(&rev) <= 8);
                    }
                }
            }
        }
    }

    #[test]
    fn inverse_round_trips() {
        for orientation in Orientation::all_rectangular() {
            let tf = Transformation::from_offset_and_orientation(Point::from_lambda(12.5, -3.), orientation);
            let p = Point::from_lambda(0.75, 8.);
            assert_eq!(tf.inv().apply_point(tf.apply_point(p)), p);
            assert_eq!(tf.apply_point(tf.inv().apply_point(p)), p);
            let rect = r(0, 0, 100, 200);
            assert_eq!(tf.inv().apply_bounds(tf.apply_bounds(rect)), rect);
        }
        for orientation in general() {
            let tf = Transformation::from_offset_and_orientation(Point::from_lambda(12.5, -3.), orientation);
            let p = Point::from_lambda(0.75, 8.);
            assert!(tf.inv().apply_point(tf.apply_point(p)).distance_sq(&p) <= 8);
        }
    }

    #[test]
    fn batch_application_matches_single_application() {
        let tf = Transformation::from_offset_and_orientation(Point::from_raw(5, 6), NamedOrientation::R270);
        let pts = [Point::from_raw(1, 2), Point::from_raw(-3, 4)];
        let out = tf.apply_points(&pts);
        assert_eq!(out, pts.iter().map(|&p| tf.apply_point(p)).collect::<Vec<_>>());
        let rects = [r(0, 0, 1, 2), r(-5, -5, 5, 5)];
        assert_eq!(
            tf.apply_rects(&rects),
            rects.iter().map(|&x| tf.apply_bounds(x)).collect::<Vec<_>>()
        );
        let id = Transformation::identity();
        assert_eq!(id.apply_points(&pts), pts.to_vec());
    }

    #[test]
    fn translate_works_for_tuples() {
        let mut tuple = (r(0, 0, 100, 200), r(50, -50, 150, 0));
        tuple.translate_mut(Point::from_raw(5, 10));
        assert_eq!(tuple, (r(5, 10, 105, 210), r(55, -40, 155, 10)));
    }

    #[test]
    fn translate_works_for_vecs() {
        let mut v = vec![r(0, 0, 100, 200), r(50, -50, 150, 0)];
        v.translate_mut(Point::from_raw(5, 10));
        assert_eq!(v, vec![r(5, 10, 105, 210), r(55, -40, 155, 10)]);
    }

    #[test]
    fn transform_works_for_tuples() {
        let mut tuple = (r(0, 0, 100, 200), r(50, -50, 150, 0));
        tuple.transform_mut(Transformation::from_offset_and_orientation(
            Point::zero(),
            NamedOrientation::R90,
        ));
        assert_eq!(tuple, (r(-200, 0, 0, 100), r(0, 50, 50, 150)));
    }

    #[test]
    fn transform_works_for_vecs() {
        let mut v = vec![r(0, 0, 100, 200), r(50, -50, 150, 0)];
        v.transform_mut(Transformation::from_offset_and_orientation(
            Point::zero(),
            NamedOrientation::R90,
        ));
        assert_eq!(v, vec![r(-200, 0, 0, 100), r(0, 50, 50, 150)]);
    }

    #[test]
    fn translate_constructor() {
        let tf = Transformation::translate(Fixp::from_raw(3), Fixp::from_raw(-4));
        assert_eq!(tf.apply_point(Point::zero()), Point::from_raw(3, -4));
    }
}
