use arcstr::ArcStr;

/// Semantic coordinate (e.g. a position in base pairs).
pub type PosType = f64;
/// Lane (bin) index assigned by a layout engine.
pub type LaneType = usize;
/// Annotation identifier, cheap to clone and used as a join key.
pub type AnnotId = ArcStr;
/// Position of an annotation in the slice an overlap graph was built from.
pub type VertexId = usize;
