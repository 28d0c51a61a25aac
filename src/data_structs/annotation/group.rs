use super::Laned;
use crate::data_structs::typedef::{
    AnnotId,
    LaneType,
    PosType,
};

/// A set of annotations that always share one lane.
///
/// The group's own span is the union of its members' spans and grows as
/// members are added. Setting the group's lane sets every member's lane.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationGroup<A: Laned> {
    id:    AnnotId,
    x:     PosType,
    x2:    PosType,
    y:     Option<LaneType>,
    group: Vec<A>,
}

impl<A: Laned> AnnotationGroup<A> {
    /// Creates an empty group covering `[x, x + w)`.
    pub fn new<I: Into<AnnotId>>(
        id: I,
        x: PosType,
        w: PosType,
    ) -> Self {
        assert!(w >= 0.0, "Annotation width must be non-negative");
        Self {
            id: id.into(),
            x,
            x2: x + w,
            y: None,
            group: Vec::new(),
        }
    }

    /// Creates a group whose span is exactly the union of `members`.
    pub fn try_from_members<I, T>(
        id: I,
        members: T,
    ) -> anyhow::Result<Self>
    where
        I: Into<AnnotId>,
        T: IntoIterator<Item = A>, {
        let mut members = members.into_iter();
        let Some(first) = members.next()
        else {
            anyhow::bail!("Annotation group needs at least one member")
        };
        let mut group = Self::new(id, first.x(), first.w());
        group.add(first);
        group.extend(members);
        Ok(group)
    }

    /// Adds members to the group, growing its span as needed.
    pub fn with_members<T: IntoIterator<Item = A>>(
        mut self,
        members: T,
    ) -> Self {
        self.extend(members);
        self
    }

    pub fn add(
        &mut self,
        ann: A,
    ) {
        if self.x > ann.x() {
            self.x = ann.x();
        }
        if self.x2 < ann.x2() {
            self.x2 = ann.x2();
        }
        self.group.push(ann);
    }

    pub fn members(&self) -> &[A] { &self.group }

    pub fn into_members(self) -> Vec<A> { self.group }

    pub fn len(&self) -> usize { self.group.len() }

    pub fn is_empty(&self) -> bool { self.group.is_empty() }
}

impl<A: Laned> Extend<A> for AnnotationGroup<A> {
    fn extend<T: IntoIterator<Item = A>>(
        &mut self,
        iter: T,
    ) {
        for ann in iter {
            self.add(ann);
        }
    }
}

impl<A: Laned> Laned for AnnotationGroup<A> {
    fn id(&self) -> &AnnotId { &self.id }

    fn x(&self) -> PosType { self.x }

    fn w(&self) -> PosType { self.x2 - self.x }

    fn x2(&self) -> PosType { self.x2 }

    fn y(&self) -> Option<LaneType> { self.y }

    fn set_y(
        &mut self,
        y: LaneType,
    ) {
        self.y = Some(y);
        for ann in self.group.iter_mut() {
            ann.set_y(y);
        }
    }
}
