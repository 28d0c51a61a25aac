use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use log::debug;

use super::component::{
    borrow_mut,
    Resizable,
};
use super::zoom::ZoomController;

/// Detects container size changes and fans `resize()` out to every
/// registered component.
#[derive(Default)]
pub struct ResizeController {
    components: Vec<Rc<RefCell<dyn Resizable>>>,
    zoom:       Option<Rc<RefCell<ZoomController>>>,
}

impl ResizeController {
    pub fn new() -> Self { Self::default() }

    /// Refreshes `zoom` after every fan-out, so that components sharing it
    /// re-apply the shared transform at their new size.
    pub fn with_zoom(
        mut self,
        zoom: Rc<RefCell<ZoomController>>,
    ) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn add_component(
        &mut self,
        component: Rc<RefCell<dyn Resizable>>,
    ) {
        self.components.push(component);
    }

    pub fn add_components<I>(
        &mut self,
        components: I,
    ) where
        I: IntoIterator<Item = Rc<RefCell<dyn Resizable>>>, {
        self.components.extend(components);
    }

    pub fn len(&self) -> usize { self.components.len() }

    pub fn is_empty(&self) -> bool { self.components.is_empty() }

    /// Resizes every component if any container width differs from the
    /// width its component was rendered at. Returns whether it did.
    pub fn trigger(&mut self) -> anyhow::Result<bool> {
        for comp in self.components.iter() {
            let changed = {
                let comp = comp
                    .try_borrow()
                    .map_err(|e| anyhow!("Resizable component is already borrowed: {}", e))?;
                comp.container_width() != comp.width()
            };
            if changed {
                self.resize()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Calls `resize()` on every component unconditionally.
    pub fn resize(&mut self) -> anyhow::Result<()> {
        debug!("Resizing {} components", self.components.len());
        for comp in self.components.iter() {
            borrow_mut(comp, "Resizable component")?.resize()?;
        }
        if let Some(zoom) = self.zoom.as_ref() {
            borrow_mut(zoom, "ZoomController")?.refresh()?;
        }
        Ok(())
    }
}
