use std::any::Any;
use std::cell::RefCell;
use std::rc::{
    Rc,
    Weak,
};

use anyhow::{
    anyhow,
    bail,
};
use log::debug;

use super::component::{
    borrow_mut,
    HasScale,
    Measured,
    Resizable,
    ZoomBehavior,
    Zoomable,
};
use super::zoom::ZoomController;
use crate::data_structs::annotation::{
    Annotation,
    Laned,
};
use crate::data_structs::registry::{
    IdRegistry,
    Selection,
};
use crate::data_structs::typedef::{
    AnnotId,
    PosType,
};
use crate::layout::LayoutConfig;
use crate::view::{
    LinearScale,
    ZoomTransform,
};

/// Selector every glyph of a [`HeadlessTrack`] is tagged with.
pub const GLYPH_SELECTOR: &str = "glyph";

/// An annotation together with its pixel geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub annotation: Annotation,
    pub px:         PosType,
    pub pw:         PosType,
    pub py:         PosType,
}

/// Re-projects the selected glyphs of a [`HeadlessTrack`] through its
/// current scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct RescaleGlyphs;

impl ZoomBehavior for RescaleGlyphs {
    fn selector(&self) -> &str { GLYPH_SELECTOR }

    fn apply(
        &self,
        component: &mut dyn Zoomable,
        selection: &Selection,
    ) -> anyhow::Result<()> {
        let track = component
            .as_any_mut()
            .downcast_mut::<HeadlessTrack>()
            .ok_or_else(|| anyhow!("RescaleGlyphs can only be applied to a HeadlessTrack"))?;
        track.project_glyphs(selection)?;
        track.reprojections += 1;
        Ok(())
    }
}

/// A track component without a drawing backend. It lays out annotations,
/// keeps their pixel geometry up to date and follows zoom and resize
/// events like a rendered track would.
pub struct HeadlessTrack {
    name:            String,
    width:           PosType,
    container_width: PosType,
    height:          PosType,
    layout:          LayoutConfig,
    query:           Option<(PosType, PosType)>,
    x_scale:         Option<LinearScale>,
    transform:       Option<ZoomTransform>,
    zoom:            Weak<RefCell<ZoomController>>,
    glyphs:          IdRegistry<Glyph>,
    lanes:           usize,
    behaviors:       Vec<Rc<dyn ZoomBehavior>>,
    reprojections:   usize,
    resizes:         usize,
}

impl HeadlessTrack {
    pub fn new<S: Into<String>>(
        name: S,
        width: PosType,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            container_width: width,
            height: 0.0,
            layout: LayoutConfig::default(),
            query: None,
            x_scale: None,
            transform: None,
            zoom: Weak::new(),
            glyphs: IdRegistry::new(),
            lanes: 0,
            behaviors: vec![Rc::new(RescaleGlyphs)],
            reprojections: 0,
            resizes: 0,
        }
    }

    pub fn with_layout(
        mut self,
        layout: LayoutConfig,
    ) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_behavior(
        mut self,
        behavior: Rc<dyn ZoomBehavior>,
    ) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn lanes(&self) -> usize { self.lanes }

    pub fn glyphs(&self) -> &IdRegistry<Glyph> { &self.glyphs }

    pub fn glyph(
        &self,
        id: &AnnotId,
    ) -> anyhow::Result<&Glyph> {
        self.glyphs.get(id)
    }

    /// Internal zoom state, i.e. the baseline of the next native event.
    pub fn transform(&self) -> Option<ZoomTransform> { self.transform }

    /// Number of zoom re-projection passes applied to this track.
    pub fn reprojections(&self) -> usize { self.reprojections }

    pub fn resizes(&self) -> usize { self.resizes }

    pub fn is_zoom_managed(&self) -> bool { self.zoom.strong_count() > 0 }

    /// Simulates the container being resized by the host.
    pub fn set_container_width(
        &mut self,
        width: PosType,
    ) {
        self.container_width = width;
    }

    /// Lays out `annotations` and places them for the query `[start, end]`.
    ///
    /// A zoom-managed track draws with the scale its controller pushed, so
    /// the controller's query range must be set first (see
    /// [`HeadlessTrack::render_shared`]).
    pub fn render(
        &mut self,
        start: PosType,
        end: PosType,
        mut annotations: Vec<Annotation>,
    ) -> anyhow::Result<usize> {
        self.query = Some((start, end));
        if !self.is_zoom_managed() {
            self.x_scale = Some(LinearScale::new((start, end), (0.0, self.width)));
        }

        self.lanes = self.layout.run(&mut annotations)?;
        self.height = self.layout.track_height(self.lanes.max(1));

        self.glyphs.clear();
        for ann in annotations {
            let id = ann.id().clone();
            let lane_selector = format!("lane-{}", ann.y().unwrap_or_default());
            self.glyphs.insert(
                id.clone(),
                Glyph {
                    annotation: ann,
                    px:         0.0,
                    pw:         0.0,
                    py:         0.0,
                },
            );
            self.glyphs.tag(GLYPH_SELECTOR, &id)?;
            self.glyphs.tag(lane_selector, &id)?;
        }
        let all = self.glyphs.select(GLYPH_SELECTOR);
        self.project_glyphs(&all)?;

        debug!(
            "Rendered {} glyphs in {} lanes on track {}",
            self.glyphs.len(),
            self.lanes,
            self.name
        );
        Ok(self.lanes)
    }

    /// Sets the query range on the track's zoom controller (if any), then
    /// renders.
    pub fn render_shared(
        this: &Rc<RefCell<Self>>,
        start: PosType,
        end: PosType,
        annotations: Vec<Annotation>,
    ) -> anyhow::Result<usize> {
        if let Some(controller) = Self::controller(this)? {
            borrow_mut(&controller, "ZoomController")?.set_query_range(start, end)?;
        }
        borrow_mut(this, "HeadlessTrack")?.render(start, end, annotations)
    }

    /// Forwards a native zoom event carrying an absolute transform to the
    /// track's zoom controller.
    pub fn emit_zoom(
        this: &Rc<RefCell<Self>>,
        raw: ZoomTransform,
    ) -> anyhow::Result<bool> {
        let Some(controller) = Self::controller(this)?
        else {
            let name = this.try_borrow().map(|t| t.name.clone()).unwrap_or_default();
            bail!("No zoom controller registered on track {}", name)
        };
        let mut controller = borrow_mut(&controller, "ZoomController")?;
        controller.trigger(raw)
    }

    /// Native wheel event: scales by `factor` around the pixel `anchor`,
    /// relative to the track's internal zoom state.
    pub fn wheel(
        this: &Rc<RefCell<Self>>,
        factor: PosType,
        anchor: PosType,
    ) -> anyhow::Result<bool> {
        let base = Self::baseline(this)?;
        let k = base.k * factor;
        let x = anchor - base.invert_x(anchor) * k;
        Self::emit_zoom(this, ZoomTransform::new(k, x, base.y))
    }

    /// Native drag event: pans by `dx` pixels relative to the track's
    /// internal zoom state.
    pub fn drag(
        this: &Rc<RefCell<Self>>,
        dx: PosType,
    ) -> anyhow::Result<bool> {
        let base = Self::baseline(this)?;
        Self::emit_zoom(this, ZoomTransform::new(base.k, base.x + dx, base.y))
    }

    fn baseline(this: &Rc<RefCell<Self>>) -> anyhow::Result<ZoomTransform> {
        Ok(this
            .try_borrow()
            .map_err(|e| anyhow!("HeadlessTrack is already borrowed: {}", e))?
            .transform
            .unwrap_or_default())
    }

    fn controller(
        this: &Rc<RefCell<Self>>
    ) -> anyhow::Result<Option<Rc<RefCell<ZoomController>>>> {
        Ok(this
            .try_borrow()
            .map_err(|e| anyhow!("HeadlessTrack is already borrowed: {}", e))?
            .zoom
            .upgrade())
    }

    fn project_glyphs(
        &mut self,
        selection: &Selection,
    ) -> anyhow::Result<()> {
        let scale = self.x_scale()?;
        let bin_height = self.layout.bin_height;
        for id in selection.iter() {
            let glyph = self.glyphs.get_mut(id)?;
            let ann = &glyph.annotation;
            glyph.px = scale.project(ann.x());
            glyph.pw = scale.project(ann.x2()) - glyph.px;
            glyph.py = ann.y().unwrap_or_default() as PosType * bin_height;
        }
        Ok(())
    }
}

impl Measured for HeadlessTrack {
    fn width(&self) -> PosType { self.width }

    fn height(&self) -> PosType { self.height }
}

impl HasScale for HeadlessTrack {
    fn x_scale(&self) -> anyhow::Result<LinearScale> {
        self.x_scale
            .ok_or_else(|| anyhow!("X scale is not defined on track {}", self.name))
    }
}

impl Zoomable for HeadlessTrack {
    fn attach_zoom(
        &mut self,
        controller: Weak<RefCell<ZoomController>>,
    ) {
        self.zoom = controller;
    }

    fn sync_zoom(
        &mut self,
        transform: ZoomTransform,
        scale: LinearScale,
    ) {
        self.transform = Some(transform);
        self.x_scale = Some(scale);
    }

    fn zoom_behaviors(&self) -> Vec<Rc<dyn ZoomBehavior>> { self.behaviors.clone() }

    fn select(
        &self,
        selector: &str,
    ) -> Selection {
        self.glyphs.select(selector)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

impl Resizable for HeadlessTrack {
    fn container_width(&self) -> PosType { self.container_width }

    /// Adopts the container width. A standalone track rebuilds its own
    /// scale and re-projects; a zoom-managed one waits for its controller
    /// to push the re-derived scale.
    fn resize(&mut self) -> anyhow::Result<()> {
        self.width = self.container_width;
        self.resizes += 1;
        if self.is_zoom_managed() {
            return Ok(());
        }
        if let Some((start, end)) = self.query {
            self.x_scale = Some(LinearScale::new((start, end), (0.0, self.width)));
            let all = self.glyphs.select(GLYPH_SELECTOR);
            self.project_glyphs(&all)?;
        }
        Ok(())
    }
}
