use std::any::Any;
use std::cell::RefCell;
use std::rc::{
    Rc,
    Weak,
};

use super::zoom::ZoomController;
use crate::data_structs::registry::Selection;
use crate::data_structs::typedef::PosType;
use crate::view::{
    LinearScale,
    ViewRange,
    ZoomTransform,
};

/// A component with pixel dimensions.
pub trait Measured {
    /// Width the component was last rendered at.
    fn width(&self) -> PosType;

    fn height(&self) -> PosType { 0.0 }
}

/// A component that maps semantic coordinates to pixels.
pub trait HasScale: Measured {
    /// The mapping currently used for drawing.
    fn x_scale(&self) -> anyhow::Result<LinearScale>;

    fn project(
        &self,
        value: PosType,
    ) -> anyhow::Result<PosType> {
        Ok(self.x_scale()?.project(value))
    }

    fn invert(
        &self,
        pixel: PosType,
    ) -> anyhow::Result<PosType> {
        Ok(self.x_scale()?.invert(pixel))
    }
}

/// Re-projection step run on a component after the shared transform
/// changed.
pub trait ZoomBehavior {
    /// Selector of the elements this behavior updates.
    fn selector(&self) -> &str;

    fn apply(
        &self,
        component: &mut dyn Zoomable,
        selection: &Selection,
    ) -> anyhow::Result<()>;
}

/// A component whose view is driven by a [`ZoomController`].
pub trait Zoomable: HasScale {
    /// Registration hook, called once when the component is added to a
    /// controller. The handle is what native zoom events are forwarded to.
    fn attach_zoom(
        &mut self,
        controller: Weak<RefCell<ZoomController>>,
    );

    /// Overwrites the component's own zoom state and drawing scale with the
    /// shared ones, so its next native event starts from the same baseline
    /// as every other component.
    fn sync_zoom(
        &mut self,
        transform: ZoomTransform,
        scale: LinearScale,
    );

    fn zoom_behaviors(&self) -> Vec<Rc<dyn ZoomBehavior>>;

    /// Resolves a behavior selector to the elements it targets.
    fn select(
        &self,
        selector: &str,
    ) -> Selection;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A component that can follow its container's size.
pub trait Resizable: Measured {
    /// Live width of the container the component is drawn into.
    fn container_width(&self) -> PosType;

    /// Re-measures the component and redraws it at the new size.
    fn resize(&mut self) -> anyhow::Result<()>;
}

/// Receives the visible semantic range after every material view change.
pub trait ViewObserver {
    fn alert(
        &mut self,
        view: ViewRange,
    );
}

pub(crate) fn borrow_mut<'a, T: ?Sized>(
    cell: &'a Rc<RefCell<T>>,
    what: &str,
) -> anyhow::Result<std::cell::RefMut<'a, T>> {
    cell.try_borrow_mut()
        .map_err(|e| anyhow::anyhow!("{} is already borrowed: {}", what, e))
}
