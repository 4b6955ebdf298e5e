//! Fixed-point 2-D geometry for integrated circuit layout.
//!
//! All coordinates are [`Fixp`](crate::fixp::Fixp) tick counts, so geometry
//! is exact under translation and the eight Manhattan orientations.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) and rotate it:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_lambda(0., 0., 2., 1.);
//! let rotated = rect.transform(Transformation::rotate(NamedOrientation::R90));
//! assert_eq!(rotated, Rect::from_lambda(-1., 0., 0., 2.));
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod bbox;
pub mod fixp;
pub mod orientation;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod snap;
pub mod transform;
