//! Semantic-to-pixel mapping.
//!
//! A [`Viewport`] owns a base [`LinearScale`] over the queried semantic
//! range and composes a d3-style [`ZoomTransform`] on top of it. Extents are
//! enforced when a transform is applied, never when it is read.

mod scale;
mod transform;
mod viewport;

pub use scale::LinearScale;
pub use transform::ZoomTransform;
pub use viewport::{
    TranslateExtent,
    ViewRange,
    Viewport,
};
