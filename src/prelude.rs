pub use crate::data_structs::annotation::{
    spans_overlap,
    Annotation,
    AnnotationGroup,
    Laned,
};
pub use crate::data_structs::registry::{
    IdRegistry,
    Selection,
};
pub use crate::data_structs::typedef::{
    AnnotId,
    LaneType,
    PosType,
    VertexId,
};
pub use crate::data_structs::Strand;
pub use crate::io::{
    read_annotations,
    read_bed,
    read_gff,
    read_gff_groups,
    AnnotationFormat,
};
pub use crate::layout::{
    greedy_layout,
    greedy_layout_by,
    greedy_layout_on,
    heuristic_layout,
    heuristic_layout_on,
    heuristic_layout_with_rng,
    interval_layout,
    interval_layout_on,
    lanes_overlap_free,
    Adjacency,
    LayoutAlgorithm,
    LayoutConfig,
    OverlapGraph,
    VertexOrder,
};
pub use crate::sync::{
    Clock,
    Glyph,
    HasScale,
    HeadlessTrack,
    ManualClock,
    Measured,
    Query,
    QueryConfig,
    QueryConsumer,
    QueryController,
    QuerySignature,
    RescaleGlyphs,
    Resizable,
    ResizeController,
    SystemClock,
    ViewObserver,
    ZoomBehavior,
    ZoomConfig,
    ZoomController,
    ZoomState,
    Zoomable,
};
pub use crate::view::{
    LinearScale,
    TranslateExtent,
    ViewRange,
    Viewport,
    ZoomTransform,
};
