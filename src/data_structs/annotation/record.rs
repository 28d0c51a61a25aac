use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use super::Laned;
use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::{
    AnnotId,
    LaneType,
    PosType,
};
use crate::with_field_fn;

/// A positioned, sized and identified interval with a mutable lane
/// assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id:     AnnotId,
    x:      PosType,
    w:      PosType,
    y:      Option<LaneType>,
    h:      Option<PosType>,
    strand: Strand,
}

impl Annotation {
    /// Creates a new unassigned `Annotation`.
    pub fn new<I: Into<AnnotId>>(
        id: I,
        x: PosType,
        w: PosType,
    ) -> Self {
        assert!(w >= 0.0, "Annotation width must be non-negative");
        Self {
            id: id.into(),
            x,
            w,
            y: None,
            h: None,
            strand: Strand::None,
        }
    }

    /// Creates an `Annotation` from a half-open `[start, end)` span.
    pub fn from_span<I: Into<AnnotId>>(
        id: I,
        start: PosType,
        end: PosType,
    ) -> Self {
        assert!(
            start <= end,
            "Start position must be less than or equal to end position"
        );
        Self::new(id, start, end - start)
    }

    with_field_fn!(y, Option<LaneType>);
    with_field_fn!(h, Option<PosType>);
    with_field_fn!(strand, Strand);

    pub fn h(&self) -> Option<PosType> { self.h }

    pub fn strand(&self) -> Strand { self.strand }

    /// Clears the lane assignment.
    pub fn reset_y(&mut self) { self.y = None; }
}

impl Laned for Annotation {
    fn id(&self) -> &AnnotId { &self.id }

    fn x(&self) -> PosType { self.x }

    fn w(&self) -> PosType { self.w }

    fn y(&self) -> Option<LaneType> { self.y }

    fn set_y(
        &mut self,
        y: LaneType,
    ) {
        self.y = Some(y);
    }
}

impl Display for Annotation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}[{}, {}){}", self.id, self.x, self.x2(), self.strand)?;
        if let Some(y) = self.y {
            write!(f, "@{}", y)?;
        }
        Ok(())
    }
}
