use std::cell::RefCell;
use std::io::Read;
use std::rc::{
    Rc,
    Weak,
};

use anyhow::{
    anyhow,
    bail,
};
use log::{
    debug,
    trace,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::component::{
    borrow_mut,
    ViewObserver,
    Zoomable,
};
use crate::data_structs::typedef::PosType;
use crate::utils::config_from_json;
use crate::view::{
    LinearScale,
    TranslateExtent,
    ViewRange,
    Viewport,
    ZoomTransform,
};
use crate::with_field_fn;

/// Construction options of a [`ZoomController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Allowed `[min, max]` zoom factor.
    pub scale_extent:     (PosType, PosType),
    pub translate_extent: TranslateExtent,
    /// Pixel width shared by all components. Taken from the first
    /// registered component when not set.
    pub width:            Option<PosType>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            scale_extent:     (0.0, PosType::INFINITY),
            translate_extent: TranslateExtent::Unbounded,
            width:            None,
        }
    }
}

impl ZoomConfig {
    with_field_fn!(scale_extent, (PosType, PosType));
    with_field_fn!(translate_extent, TranslateExtent);
    with_field_fn!(width, Option<PosType>);

    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        config_from_json(reader)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    /// No base mapping yet.
    Uninitialized,
    /// Base mapping set, no zoom applied.
    Ready,
    /// A non-identity transform has been applied at least once.
    Zoomed,
}

/// Shares one zoom transform between any number of components.
///
/// Components are held as `Rc<RefCell<dyn Zoomable>>` and borrowed one at a
/// time while the controller propagates a change. A component must not be
/// borrowed by the caller while [`ZoomController::trigger`] runs.
pub struct ZoomController {
    handle:        Weak<RefCell<ZoomController>>,
    viewport:      Viewport,
    width:         Option<PosType>,
    query_range:   Option<(PosType, PosType)>,
    components:    Vec<Rc<RefCell<dyn Zoomable>>>,
    observer:      Option<Rc<RefCell<dyn ViewObserver>>>,
    zoomed:        bool,
    render_passes: usize,
}

impl Default for ZoomController {
    fn default() -> Self { Self::new(ZoomConfig::default()) }
}

impl ZoomController {
    /// Creates a standalone controller. Its components can not forward
    /// native events back to it, see [`ZoomController::shared`].
    pub fn new(config: ZoomConfig) -> Self {
        Self::with_handle(config, Weak::new())
    }

    /// Creates a controller that hands a handle to itself to every
    /// registered component.
    pub fn shared(config: ZoomConfig) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|handle| RefCell::new(Self::with_handle(config, handle.clone())))
    }

    fn with_handle(
        config: ZoomConfig,
        handle: Weak<RefCell<ZoomController>>,
    ) -> Self {
        Self {
            handle,
            viewport: Viewport::new(config.scale_extent, config.translate_extent),
            width: config.width,
            query_range: None,
            components: Vec::new(),
            observer: None,
            zoomed: false,
            render_passes: 0,
        }
    }

    pub fn state(&self) -> ZoomState {
        if !self.viewport.has_base_mapping() {
            ZoomState::Uninitialized
        }
        else if self.zoomed {
            ZoomState::Zoomed
        }
        else {
            ZoomState::Ready
        }
    }

    pub fn width(&self) -> anyhow::Result<PosType> {
        self.width
            .ok_or_else(|| anyhow!("Width is undefined on ZoomController"))
    }

    pub fn query_start(&self) -> anyhow::Result<PosType> {
        self.query_range
            .map(|(start, _)| start)
            .ok_or_else(|| anyhow!("Query start is undefined on ZoomController"))
    }

    pub fn query_end(&self) -> anyhow::Result<PosType> {
        self.query_range
            .map(|(_, end)| end)
            .ok_or_else(|| anyhow!("Query end is undefined on ZoomController"))
    }

    pub fn current_transform(&self) -> Option<ZoomTransform> {
        self.viewport.current_transform()
    }

    pub fn viewport(&self) -> &Viewport { &self.viewport }

    pub fn component_count(&self) -> usize { self.components.len() }

    /// Number of times the zoom behaviors of all components were run.
    pub fn render_passes(&self) -> usize { self.render_passes }

    /// The base mapping over the query range.
    pub fn x_scale(&self) -> anyhow::Result<LinearScale> {
        self.viewport
            .base_scale()
            .map_err(|_| anyhow!("X scale is not defined on ZoomController"))
    }

    /// The base mapping composed with the current transform.
    pub fn zoomed_x_scale(&self) -> anyhow::Result<LinearScale> {
        self.viewport
            .zoomed_scale()
            .map_err(|_| anyhow!("Zoomed x scale is not defined on ZoomController"))
    }

    pub fn semantic_view_range(&self) -> anyhow::Result<ViewRange> {
        let zoomed = self.zoomed_x_scale()?;
        let start = zoomed.invert(0.0);
        let end = zoomed.invert(self.width()?);
        Ok(ViewRange::new(start, end))
    }

    pub fn attach_observer(
        &mut self,
        observer: Rc<RefCell<dyn ViewObserver>>,
    ) {
        self.observer = Some(observer);
    }

    /// Registers a component. The first component sets the shared width
    /// unless one was configured; later mismatches are only logged.
    pub fn add_component(
        &mut self,
        component: Rc<RefCell<dyn Zoomable>>,
    ) -> anyhow::Result<()> {
        {
            let mut comp = borrow_mut(&component, "Zoom component")?;
            match self.width {
                None => self.width = Some(comp.width()),
                Some(width) if width != comp.width() => {
                    warn!(
                        "Width of component ({}) does not match width of zoom controller ({})",
                        comp.width(),
                        width
                    );
                },
                Some(_) => {},
            }
            comp.attach_zoom(self.handle.clone());
            if let Ok(scale) = self.viewport.zoomed_scale() {
                comp.sync_zoom(self.current_transform().unwrap_or_default(), scale);
            }
        }
        self.components.push(component);
        Ok(())
    }

    pub fn add_components<I>(
        &mut self,
        components: I,
    ) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = Rc<RefCell<dyn Zoomable>>>, {
        for component in components {
            self.add_component(component)?;
        }
        Ok(())
    }

    /// Sets the semantic range the components render and rebuilds the base
    /// mapping for it.
    pub fn set_query_range(
        &mut self,
        start: PosType,
        end: PosType,
    ) -> anyhow::Result<()> {
        self.query_range = Some((start, end));
        self.set_x_scale()?;
        self.update_comp_transforms()
    }

    /// Rebuilds the base mapping from the query range and the shared width.
    pub fn set_x_scale(&mut self) -> anyhow::Result<()> {
        let (start, end) = (self.query_start()?, self.query_end()?);
        let width = self.width()?;
        self.viewport.set_base_mapping(start, end, width);
        Ok(())
    }

    /// Adopts the width and height of the first registered component.
    pub fn set_to_component_width(&mut self) -> anyhow::Result<()> {
        if let Some(first) = self.components.first() {
            let first = first
                .try_borrow()
                .map_err(|e| anyhow!("Zoom component is already borrowed: {}", e))?;
            self.width = Some(first.width());
            self.viewport.set_height(first.height());
        }
        Ok(())
    }

    /// Whether any component was rendered at a width other than the shared
    /// one.
    pub fn check_for_width_change(&self) -> anyhow::Result<bool> {
        let width = self.width()?;
        for comp in self.components.iter() {
            let comp = comp
                .try_borrow()
                .map_err(|e| anyhow!("Zoom component is already borrowed: {}", e))?;
            if comp.width() != width {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_component_width_equality(&self) -> anyhow::Result<bool> {
        let mut widths = Vec::with_capacity(self.components.len());
        for comp in self.components.iter() {
            let comp = comp
                .try_borrow()
                .map_err(|e| anyhow!("Zoom component is already borrowed: {}", e))?;
            widths.push(comp.width());
        }
        let mut equal = true;
        if let Some((first, rest)) = widths.split_first() {
            for (idx, width) in rest.iter().enumerate() {
                if width != first {
                    warn!(
                        "Width mismatch on component {} in ZoomController ({} != {})",
                        idx + 1,
                        width,
                        first
                    );
                    equal = false;
                }
            }
        }
        Ok(equal)
    }

    /// Adopts the first component's dimensions. If its width differs from
    /// the shared one, the base mapping is rebuilt and the transform
    /// re-derived so the visible semantic range is unchanged. Returns whether
    /// the width changed.
    pub fn handle_resize(&mut self) -> anyhow::Result<bool> {
        let previous = self.width()?;
        let view = self.semantic_view_range()?;
        self.set_to_component_width()?;
        let width = self.width()?;
        if width == previous {
            return Ok(false);
        }
        self.set_x_scale()?;
        debug!(
            "Resized zoom controller from {} to {} px, keeping view [{}, {}]",
            previous, width, view.start, view.end
        );
        self.zoom_to_range(view.start, view.end)?;
        Ok(true)
    }

    /// Zooms and pans every component to show exactly `[start, end]`.
    pub fn zoom_to_range(
        &mut self,
        start: PosType,
        end: PosType,
    ) -> anyhow::Result<()> {
        let transform = self.viewport.zoom_to_range(start, end)?;
        self.note_transform(transform);
        self.update_comp_transforms()?;
        self.zoomed_render()
    }

    /// Handles a raw transform produced by a native zoom or pan event on
    /// any component. Returns whether the components were re-projected.
    ///
    /// Components whose width differs from the shared one are first
    /// reconciled through [`ZoomController::handle_resize`]; mismatches
    /// between components are only logged. The raw transform is then
    /// applied unless it equals the current one, and the observer is
    /// alerted after any change.
    pub fn trigger(
        &mut self,
        raw: ZoomTransform,
    ) -> anyhow::Result<bool> {
        let resized = self.sync_dimensions()?;

        let candidate = self.viewport.constrain(raw);
        let current = self.current_transform().unwrap_or_default();
        let changed = if candidate == current {
            trace!("Ignoring unchanged zoom transform {}", candidate);
            false
        }
        else {
            let transform = self.viewport.apply_zoom_delta(raw);
            self.note_transform(transform);
            self.update_comp_transforms()?;
            self.zoomed_render()?;
            true
        };

        if resized || changed {
            self.alert_observer()?;
        }
        Ok(resized || changed)
    }

    /// Reconciles the shared width with the components, e.g. after they
    /// were resized, keeping the current view. Returns whether it changed.
    pub fn refresh(&mut self) -> anyhow::Result<bool> {
        let resized = self.sync_dimensions()?;
        if resized {
            self.alert_observer()?;
        }
        Ok(resized)
    }

    /// Pushes the shared transform and effective mapping onto every
    /// component.
    pub fn update_comp_transforms(&mut self) -> anyhow::Result<()> {
        let transform = self.current_transform().unwrap_or_default();
        let scale = self.zoomed_x_scale()?;
        for comp in self.components.iter() {
            borrow_mut(comp, "Zoom component")?.sync_zoom(transform, scale);
        }
        Ok(())
    }

    /// Runs every zoom behavior of every component on the selection it
    /// targets.
    pub fn zoomed_render(&mut self) -> anyhow::Result<()> {
        for comp in self.components.iter() {
            let mut comp = borrow_mut(comp, "Zoom component")?;
            for behavior in comp.zoom_behaviors() {
                let selection = comp.select(behavior.selector());
                behavior.apply(&mut *comp, &selection)?;
            }
        }
        self.render_passes += 1;
        Ok(())
    }

    fn sync_dimensions(&mut self) -> anyhow::Result<bool> {
        if !self.viewport.has_base_mapping() {
            bail!("Zoomed x scale is not defined on ZoomController, set a query range first")
        }
        let mut resized = false;
        if self.check_for_width_change()? {
            resized = self.handle_resize()?;
            self.check_component_width_equality()?;
        }
        else {
            self.set_to_component_width()?;
        }
        Ok(resized)
    }

    fn alert_observer(&self) -> anyhow::Result<()> {
        if let Some(observer) = self.observer.as_ref() {
            let view = self.semantic_view_range()?;
            borrow_mut(observer, "View observer")?.alert(view);
        }
        Ok(())
    }

    fn note_transform(
        &mut self,
        transform: ZoomTransform,
    ) {
        if !transform.is_identity() {
            self.zoomed = true;
        }
        debug!("Zoom transform is now {}", transform);
    }
}
