use anyhow::{
    anyhow,
    bail,
};
use log::trace;
use serde::{
    Deserialize,
    Serialize,
};

use super::scale::LinearScale;
use super::transform::ZoomTransform;
use crate::data_structs::typedef::PosType;

/// Pixel-space bounds the zoomed view may not be panned out of.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslateExtent {
    /// No constraint.
    #[default]
    Unbounded,
    /// Fixed `[[x0, y0], [x1, y1]]` bounds in untransformed pixels.
    Fixed {
        x0: PosType,
        y0: PosType,
        x1: PosType,
        y1: PosType,
    },
    /// The component's own `[[0, 0], [width, height]]`, i.e. the view can
    /// not be panned beyond the rendered range.
    Viewport,
}

impl TranslateExtent {
    pub fn resolve(
        &self,
        width: PosType,
        height: PosType,
    ) -> Option<[[PosType; 2]; 2]> {
        match *self {
            TranslateExtent::Unbounded => None,
            TranslateExtent::Fixed { x0, y0, x1, y1 } => Some([[x0, y0], [x1, y1]]),
            TranslateExtent::Viewport => Some([[0.0, 0.0], [width, height]]),
        }
    }
}

/// A semantic interval as seen through a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRange {
    pub start: PosType,
    pub end:   PosType,
    pub width: PosType,
}

impl ViewRange {
    pub fn new(
        start: PosType,
        end: PosType,
    ) -> Self {
        Self {
            start,
            end,
            width: end - start,
        }
    }
}

/// Base semantic-to-pixel mapping plus the zoom transform composed on top
/// of it.
///
/// "No transform yet" (`current_transform() == None`) and the identity
/// transform are distinct: projection falls back to the base mapping in
/// both cases, but only the latter was produced by a zoom.
#[derive(Debug, Clone)]
pub struct Viewport {
    base:             Option<LinearScale>,
    zoomed:           Option<LinearScale>,
    transform:        Option<ZoomTransform>,
    width:            PosType,
    height:           PosType,
    scale_extent:     (PosType, PosType),
    translate_extent: TranslateExtent,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new((0.0, PosType::INFINITY), TranslateExtent::Unbounded)
    }
}

impl Viewport {
    pub fn new(
        scale_extent: (PosType, PosType),
        translate_extent: TranslateExtent,
    ) -> Self {
        assert!(
            scale_extent.0 <= scale_extent.1,
            "Scale extent minimum must not exceed its maximum"
        );
        Self {
            base: None,
            zoomed: None,
            transform: None,
            width: 0.0,
            height: 0.0,
            scale_extent,
            translate_extent,
        }
    }

    pub fn width(&self) -> PosType { self.width }

    pub fn height(&self) -> PosType { self.height }

    pub fn scale_extent(&self) -> (PosType, PosType) { self.scale_extent }

    pub fn translate_extent(&self) -> TranslateExtent { self.translate_extent }

    pub fn has_base_mapping(&self) -> bool { self.base.is_some() }

    pub fn current_transform(&self) -> Option<ZoomTransform> { self.transform }

    /// Height of the components, bounding vertical pans under
    /// [`TranslateExtent::Viewport`].
    pub fn set_height(
        &mut self,
        height: PosType,
    ) {
        self.height = height;
    }

    pub fn base_scale(&self) -> anyhow::Result<LinearScale> {
        self.base
            .ok_or_else(|| anyhow!("Base x scale is not defined, set a base mapping first"))
    }

    /// The effective mapping. Fails until a base mapping exists.
    pub fn zoomed_scale(&self) -> anyhow::Result<LinearScale> {
        self.zoomed
            .ok_or_else(|| anyhow!("Zoomed x scale is not defined, set a base mapping first"))
    }

    /// Defines or replaces the base mapping `[start, end] -> [0, width]`.
    /// The current transform is kept and re-applied.
    pub fn set_base_mapping(
        &mut self,
        start: PosType,
        end: PosType,
        width: PosType,
    ) {
        self.base = Some(LinearScale::new((start, end), (0.0, width)));
        self.width = width;
        self.update_zoomed();
    }

    /// Clamps `transform` to the scale and translate extents, stores it and
    /// rebuilds the effective mapping. Returns the stored transform.
    pub fn apply_zoom_delta(
        &mut self,
        transform: ZoomTransform,
    ) -> ZoomTransform {
        let constrained = self.constrain(transform);
        trace!("Applying zoom transform {}", constrained);
        self.transform = Some(constrained);
        self.update_zoomed();
        constrained
    }

    /// Forgets the current transform, going back to the bare base mapping.
    pub fn reset_transform(&mut self) {
        self.transform = None;
        self.update_zoomed();
    }

    /// Clamps `k` to the scale extent, then pushes the view back inside the
    /// translate extent (or centres it when the view is wider than the
    /// extent).
    pub fn constrain(
        &self,
        transform: ZoomTransform,
    ) -> ZoomTransform {
        let (k_min, k_max) = self.scale_extent;
        let k = transform.k.clamp(k_min, k_max);
        let transform = ZoomTransform::new(k, transform.x, transform.y);

        let Some([[x0, y0], [x1, y1]]) = self.translate_extent.resolve(self.width, self.height)
        else {
            return transform;
        };

        let dx0 = transform.invert_x(0.0) - x0;
        let dx1 = transform.invert_x(self.width) - x1;
        let dy0 = transform.invert_y(0.0) - y0;
        let dy1 = transform.invert_y(self.height) - y1;
        transform.translate_by(push_inside(dx0, dx1), push_inside(dy0, dy1))
    }

    pub fn project(
        &self,
        value: PosType,
    ) -> anyhow::Result<PosType> {
        Ok(self.zoomed_scale()?.project(value))
    }

    pub fn invert(
        &self,
        pixel: PosType,
    ) -> anyhow::Result<PosType> {
        Ok(self.zoomed_scale()?.invert(pixel))
    }

    /// The semantic interval shown in `[0, width]`.
    pub fn visible_range(&self) -> anyhow::Result<ViewRange> {
        let zoomed = self.zoomed_scale()?;
        Ok(ViewRange::new(zoomed.invert(0.0), zoomed.invert(self.width)))
    }

    /// Computes, constrains and stores the transform that shows exactly
    /// `[start, end]` across the current width.
    pub fn zoom_to_range(
        &mut self,
        start: PosType,
        end: PosType,
    ) -> anyhow::Result<ZoomTransform> {
        let base = self.base_scale()?;
        let (p0, p1) = (base.project(start), base.project(end));
        if p1 == p0 {
            bail!("Can not zoom to the empty range [{}, {}]", start, end)
        }
        let k = self.width / (p1 - p0);
        let y = self.transform.map_or(0.0, |t| t.y);
        Ok(self.apply_zoom_delta(ZoomTransform::new(k, -k * p0, y)))
    }

    /// Rebuilds the base mapping for a new width and re-derives the
    /// transform so the visible semantic range is unchanged.
    pub fn resize(
        &mut self,
        width: PosType,
    ) -> anyhow::Result<()> {
        let Some(base) = self.base
        else {
            self.width = width;
            return Ok(());
        };
        let view = self.visible_range()?;
        let (start, end) = base.domain();
        self.set_base_mapping(start, end, width);
        if view.width != 0.0 {
            self.zoom_to_range(view.start, view.end)?;
        }
        Ok(())
    }

    fn update_zoomed(&mut self) {
        self.zoomed = self.base.map(|base| {
            match self.transform {
                Some(transform) => transform.rescale_x(&base),
                None => base,
            }
        });
    }
}

fn push_inside(
    d0: PosType,
    d1: PosType,
) -> PosType {
    if d1 > d0 {
        (d0 + d1) / 2.0
    }
    else {
        let low = d0.min(0.0);
        if low != 0.0 {
            low
        }
        else {
            d1.max(0.0)
        }
    }
}
