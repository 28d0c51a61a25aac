//! Core data structures shared by the layout engines and the viewport
//! controllers.
//!
//! - [`annotation`]: the [`Laned`](annotation::Laned) capability consumed by
//!   every layout engine, the plain [`Annotation`](annotation::Annotation)
//!   record and the [`AnnotationGroup`](annotation::AnnotationGroup) wrapper
//!   that keeps its members in one lane.
//! - [`registry`]: an explicit id -> value registry used by rendering
//!   collaborators to bridge annotation ids and drawn glyphs.
//! - [`Strand`] for oriented features.
//! - [`typedef`]: type aliases for coordinates, lanes and ids.

pub mod annotation;
mod enums;
pub mod registry;
pub mod typedef;

pub use enums::Strand;
