//! An import prelude that re-exports commonly used items.

pub use crate::bbox::Bbox;
pub use crate::fixp::Fixp;
pub use crate::orientation::{NamedOrientation, Orientation, OrientationKey};
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::transform::{
    Transform, TransformMut, Transformation, TransformationBuilder, Translate, TranslateMut,
};
