use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use clap::Args;
use log::info;
use tracklane::prelude::*;

use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct ViewArgs {
    #[arg(long, required = true, help = "Start of the query range")]
    start: f64,

    #[arg(long, required = true, help = "End of the query range")]
    end: f64,

    #[arg(short, long, required = true, help = "Pixel width of the track")]
    width: f64,

    #[arg(short, long, default_value_t = 1.0, help = "Zoom factor applied around the left edge")]
    zoom: f64,

    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true, help = "Horizontal pan in pixels")]
    pan: f64,

    #[arg(short, long, help = "Resize the track to this width after zooming")]
    resize: Option<f64>,

    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], help = "Allowed zoom factor range")]
    scale_extent: Option<Vec<f64>>,
}

impl ViewArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        if self.start >= self.end {
            bail!("Query start {} must be before end {}", self.start, self.end)
        }
        if self.width <= 0.0 {
            bail!("Width must be positive, got {}", self.width)
        }

        let mut config = ZoomConfig::default();
        if let Some(extent) = self.scale_extent.as_deref() {
            if extent[0] > extent[1] {
                bail!("Invalid scale extent [{}, {}]", extent[0], extent[1])
            }
            config = config.with_scale_extent((extent[0], extent[1]));
        }
        let controller = ZoomController::shared(config);
        let track = Rc::new(RefCell::new(HeadlessTrack::new("view", self.width)));
        controller.borrow_mut().add_component(track.clone())?;
        HeadlessTrack::render_shared(&track, self.start, self.end, Vec::new())?;
        HeadlessTrack::emit_zoom(&track, ZoomTransform::new(self.zoom, self.pan, 0.0))?;
        print_view("zoomed", &controller.borrow())?;

        if let Some(width) = self.resize {
            let mut resizer = ResizeController::new().with_zoom(controller.clone());
            resizer.add_component(track.clone());
            track.borrow_mut().set_container_width(width);
            if resizer.trigger()? {
                info!("Resized track from {} to {} px", self.width, width);
            }
            print_view("resized", &controller.borrow())?;
        }
        Ok(())
    }
}

fn print_view(
    label: &str,
    controller: &ZoomController,
) -> anyhow::Result<()> {
    let view = controller.semantic_view_range()?;
    let transform = controller
        .current_transform()
        .unwrap_or_default();
    info!("Transform {}", transform);
    println!("{}\t{}\t{}\t{}", label, view.start, view.end, controller.width()?);
    Ok(())
}
