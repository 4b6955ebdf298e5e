//! Axis-aligned rectangular bounding boxes.
//!
//! [`Bbox`] is the only capability a primitive needs in order to be placed
//! in a spatial index.

use impl_trait_for_tuples::impl_for_tuples;

use crate::{point::Point, rect::Rect};

/// A geometric shape that has a bounding box.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let rect = Rect::from_raw_sides(0, 0, 100, 200);
/// assert_eq!(rect.bbox(), Some(Rect::from_raw_sides(0, 0, 100, 200)));
/// let rect = Rect::from_point(Point::from_raw(50, 70));
/// assert_eq!(rect.bbox(), Some(Rect::from_raw_sides(50, 70, 50, 70)));
/// ```
pub trait Bbox {
    /// Computes the axis-aligned rectangular bounding box.
    ///
    /// If empty, this method should return `None`.
    /// Note that points and zero-area rectangles are not empty:
    /// these shapes contain a single point, and their bounding box
    /// implementations will return `Some(_)`.
    fn bbox(&self) -> Option<Rect>;
}

/// Unions two optional bounding boxes, treating `None` as empty.
pub fn union_option(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl<T> Bbox for &T
where
    T: Bbox,
{
    fn bbox(&self) -> Option<Rect> {
        T::bbox(*self)
    }
}

#[impl_for_tuples(64)]
impl Bbox for TupleIdentifier {
    #[allow(clippy::let_and_return)]
    fn bbox(&self) -> Option<Rect> {
        let mut bbox = None;
        for_tuples!( #( bbox = union_option(bbox, TupleIdentifier.bbox()); )* );
        bbox
    }
}

impl<T: Bbox> Bbox for Vec<T> {
    fn bbox(&self) -> Option<Rect> {
        self.iter()
            .fold(None, |bbox, item| union_option(bbox, item.bbox()))
    }
}

impl Bbox for Option<Rect> {
    fn bbox(&self) -> Option<Rect> {
        self.and_then(|r| r.bbox())
    }
}

impl Bbox for Point {
    fn bbox(&self) -> Option<Rect> {
        Some(Rect::from_point(*self))
    }
}

#[cfg(test)]
mod tests {
    use crate::{bbox::Bbox, point::Point, rect::Rect};

    #[test]
    fn bbox_works_for_tuples() {
        let tuple = (
            Rect::from_raw_sides(0, 0, 100, 200),
            Rect::from_raw_sides(-50, 20, 90, 250),
        );
        assert_eq!(tuple.bbox(), Some(Rect::from_raw_sides(-50, 0, 100, 250)));
    }

    #[test]
    fn bbox_works_for_vecs() {
        let v = vec![
            Rect::from_raw_sides(0, 0, 100, 200),
            Rect::from_raw_sides(-50, 20, 90, 250),
        ];
        assert_eq!(v.bbox(), Some(Rect::from_raw_sides(-50, 0, 100, 250)));
        assert_eq!(Vec::<Rect>::new().bbox(), None);
    }

    #[test]
    fn bbox_works_for_diff_types() {
        let tuple: (Rect, Point, Option<Rect>) = (
            Rect::from_raw_sides(0, 0, 100, 200),
            Point::from_raw(-10, 250),
            None,
        );
        assert_eq!(tuple.bbox(), Some(Rect::from_raw_sides(-10, 0, 100, 250)));
    }
}
