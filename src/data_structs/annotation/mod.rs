mod group;
mod record;

pub use group::AnnotationGroup;
pub use record::Annotation;

use crate::data_structs::typedef::{
    AnnotId,
    LaneType,
    PosType,
};

/// Anything that occupies a horizontal span and can be assigned a lane.
///
/// This is the only capability the overlap graph and the layout engines
/// require. `x` and `w` must not change while a layout is running; `y` is
/// the sole output of a layout and is written through [`Laned::set_y`], so
/// that wrappers like [`AnnotationGroup`] can cascade the assignment.
pub trait Laned {
    /// Stable identifier used as the join key with rendered glyphs.
    fn id(&self) -> &AnnotId;

    /// Start offset in semantic coordinates.
    fn x(&self) -> PosType;

    /// Width in semantic coordinates.
    fn w(&self) -> PosType;

    /// End offset in semantic coordinates.
    fn x2(&self) -> PosType { self.x() + self.w() }

    /// Assigned lane, if any.
    fn y(&self) -> Option<LaneType>;

    fn set_y(
        &mut self,
        y: LaneType,
    );
}

/// Default overlap predicate: the spans intersect once `tolerance` slack is
/// added on both sides.
pub fn spans_overlap<A, B>(
    a: &A,
    b: &B,
    tolerance: PosType,
) -> bool
where
    A: Laned + ?Sized,
    B: Laned + ?Sized, {
    a.x() - tolerance <= b.x2() && a.x2() + tolerance >= b.x()
}
