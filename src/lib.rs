//! # tracklane
//!
//! `tracklane` is the layout and viewport core of a linear genome track
//! viewer. It takes annotations (intervals placed along a semantic coordinate
//! axis, e.g. base pairs on a chromosome), stacks them into non-overlapping
//! vertical lanes, and keeps any number of independently rendered track
//! components looking at the same semantic range while the user pans, zooms
//! and resizes.
//!
//! Rendering itself (SVG, canvas, terminal, ...) is left to the host. The
//! crate only describes the contracts a visual component must satisfy and
//! drives them.
//!
//! ## Key Features
//!
//! * **Lane layout**: three interchangeable algorithms over a shared overlap
//!   graph ([`OverlapGraph`]):
//!   - [`interval_layout`]: deterministic, optimal for interval graphs;
//!   - [`greedy_layout`]: deterministic greedy colouring ordered by width (or
//!     another [`VertexOrder`]);
//!   - [`heuristic_layout`]: repeated randomized greedy colouring keeping the
//!     best trial.
//! * **Viewport model**: a base semantic-to-pixel [`LinearScale`] composed
//!   with a d3-style [`ZoomTransform`], with scale and translate extents
//!   ([`Viewport`]).
//! * **Synchronization**: [`ZoomController`] shares one transform across all
//!   registered components, [`ResizeController`] fans out container size
//!   changes, and [`QueryController`] decides when a settled pan/zoom has left
//!   the previously fetched range.
//! * **Parsing helpers**: BED and GFF3 readers producing [`Annotation`]s, and
//!   GFF3 features grouped by parent.
//!
//! ## Usage
//!
//! ```
//! use tracklane::prelude::*;
//!
//! let mut annotations = vec![
//!     Annotation::new("A", 0.0, 10.0),
//!     Annotation::new("B", 5.0, 10.0),
//!     Annotation::new("C", 20.0, 5.0),
//! ];
//!
//! let lanes = interval_layout(&mut annotations, 0.0);
//! assert_eq!(lanes, 2);
//! assert_eq!(annotations[0].y(), Some(0));
//! assert_eq!(annotations[1].y(), Some(1));
//! assert_eq!(annotations[2].y(), Some(0));
//! ```
//!
//! ## Structure
//!
//! * [`data_structs`]: annotations, annotation groups, the id registry and
//!   shared type aliases.
//! * [`layout`]: the overlap graph and the three layout engines.
//! * [`view`]: linear scales, zoom transforms and the viewport model.
//! * [`sync`]: component capability traits and the zoom, resize and query
//!   controllers.
//! * [`io`]: BED / GFF3 readers.
//! * [`utils`]: the `with_*` builder macro and JSON config loading.

pub mod data_structs;
pub mod io;
pub mod layout;
pub mod prelude;
pub mod sync;
pub mod utils;
pub mod view;

#[allow(unused_imports)]
use prelude::*;
