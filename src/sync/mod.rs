//! Keeping several track components on one view.
//!
//! Components advertise what they can do through small capability traits
//! ([`Measured`], [`HasScale`], [`Zoomable`], [`Resizable`]) and are shared
//! with the controllers as `Rc<RefCell<_>>`:
//!
//! - [`ZoomController`] owns the canonical [`Viewport`](crate::view::Viewport)
//!   and pushes every material transform change to all components;
//! - [`ResizeController`] notices container size changes and resizes all
//!   components together;
//! - [`QueryController`] watches the visible range and asks its consumers to
//!   re-render once panning and zooming have settled outside the last query.
//!
//! Everything runs on the host's single event loop. No controller keeps a
//! component borrowed between calls.

mod component;
mod headless;
mod query;
mod resize;
mod zoom;

pub use component::{
    HasScale,
    Measured,
    Resizable,
    ViewObserver,
    ZoomBehavior,
    Zoomable,
};
pub use headless::{
    Glyph,
    HeadlessTrack,
    RescaleGlyphs,
    GLYPH_SELECTOR,
};
pub use query::{
    Clock,
    ManualClock,
    Query,
    QueryConfig,
    QueryConsumer,
    QueryController,
    QuerySignature,
    SystemClock,
};
pub use resize::ResizeController;
pub use zoom::{
    ZoomConfig,
    ZoomController,
    ZoomState,
};

#[cfg(test)]
mod tests;
