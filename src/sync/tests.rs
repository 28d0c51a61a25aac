use std::cell::{
    Cell,
    RefCell,
};
use std::rc::Rc;

use assert_approx_eq::assert_approx_eq;
use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::data_structs::annotation::Annotation;
use crate::data_structs::registry::Selection;
use crate::view::{
    TranslateExtent,
    ViewRange,
    ZoomTransform,
};

fn genes() -> Vec<Annotation> {
    vec![
        Annotation::new("g1", 120.0, 10.0),
        Annotation::new("g2", 125.0, 30.0),
        Annotation::new("g3", 170.0, 20.0),
    ]
}

type Tracks = Vec<Rc<RefCell<HeadlessTrack>>>;

/// A shared controller over `[100, 200]` with one track per width.
fn shared_with(
    config: ZoomConfig,
    widths: &[f64],
) -> (Rc<RefCell<ZoomController>>, Tracks) {
    let controller = ZoomController::shared(config);
    let tracks: Tracks = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| Rc::new(RefCell::new(HeadlessTrack::new(format!("track{}", i), width))))
        .collect();
    for track in tracks.iter() {
        controller.borrow_mut().add_component(track.clone()).unwrap();
    }
    for track in tracks.iter() {
        HeadlessTrack::render_shared(track, 100.0, 200.0, genes()).unwrap();
    }
    (controller, tracks)
}

#[fixture]
fn shared() -> (Rc<RefCell<ZoomController>>, Tracks) {
    shared_with(ZoomConfig::default(), &[500.0, 500.0])
}

#[derive(Default)]
struct Recorder {
    views: Vec<ViewRange>,
}

impl ViewObserver for Recorder {
    fn alert(
        &mut self,
        view: ViewRange,
    ) {
        self.views.push(view);
    }
}

struct CountingBehavior {
    calls: Rc<Cell<usize>>,
}

impl ZoomBehavior for CountingBehavior {
    fn selector(&self) -> &str { GLYPH_SELECTOR }

    fn apply(
        &self,
        _component: &mut dyn Zoomable,
        selection: &Selection,
    ) -> anyhow::Result<()> {
        assert_eq!(selection.len(), 3);
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

mod zoom {
    use super::*;

    #[test]
    fn test_uninitialized_controller_fails_loudly() {
        let mut controller = ZoomController::default();
        assert_eq!(controller.state(), ZoomState::Uninitialized);
        assert!(controller.zoomed_x_scale().is_err());
        assert!(controller.semantic_view_range().is_err());
        assert!(controller.trigger(ZoomTransform::new(2.0, 0.0, 0.0)).is_err());
        // No width could be adopted yet
        assert!(controller.set_query_range(0.0, 10.0).is_err());
    }

    #[test]
    fn test_state_transitions() {
        let mut controller = ZoomController::new(ZoomConfig::default().with_width(Some(100.0)));
        assert_eq!(controller.state(), ZoomState::Uninitialized);
        controller.set_query_range(0.0, 10.0).unwrap();
        assert_eq!(controller.state(), ZoomState::Ready);
        assert_eq!(controller.current_transform(), None);

        // Identity is the implicit baseline, so nothing happens
        assert!(!controller.trigger(ZoomTransform::IDENTITY).unwrap());
        assert_eq!(controller.state(), ZoomState::Ready);

        assert!(controller.trigger(ZoomTransform::new(2.0, 0.0, 0.0)).unwrap());
        assert_eq!(controller.state(), ZoomState::Zoomed);
        assert!(controller.trigger(ZoomTransform::IDENTITY).unwrap());
        assert_eq!(controller.state(), ZoomState::Zoomed);
    }

    #[rstest]
    fn test_first_component_sets_width(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, _) = shared;
        assert_eq!(controller.borrow().width().unwrap(), 500.0);
        assert_eq!(controller.borrow().component_count(), 2);

        let narrow = Rc::new(RefCell::new(HeadlessTrack::new("narrow", 400.0)));
        controller.borrow_mut().add_component(narrow.clone()).unwrap();
        assert_eq!(controller.borrow().width().unwrap(), 500.0);
        assert!(narrow.borrow().is_zoom_managed());
    }

    #[rstest]
    fn test_idempotent_trigger(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        controller.borrow_mut().attach_observer(recorder.clone());

        let transform = ZoomTransform::new(2.0, -250.0, 0.0);
        assert!(HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap());
        assert!(!HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap());
        assert!(!controller.borrow_mut().trigger(transform).unwrap());

        assert_eq!(controller.borrow().render_passes(), 1);
        for track in tracks.iter() {
            assert_eq!(track.borrow().reprojections(), 1);
        }
        assert_eq!(recorder.borrow().views.len(), 1);
        let view = recorder.borrow().views[0];
        assert_approx_eq!(view.start, 125.0);
        assert_approx_eq!(view.end, 175.0);
    }

    #[rstest]
    fn test_trigger_syncs_every_component(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        let transform = ZoomTransform::new(2.0, -250.0, 0.0);
        HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap();
        for track in tracks.iter() {
            assert_eq!(track.borrow().transform(), Some(transform));
        }

        // The second track's wheel event starts from the shared baseline
        HeadlessTrack::wheel(&tracks[1], 2.0, 0.0).unwrap();
        let current = controller.borrow().current_transform().unwrap();
        assert_approx_eq!(current.k, 4.0);
        assert_approx_eq!(current.x, -500.0);
        assert_eq!(tracks[0].borrow().transform(), Some(current));

        let view = controller.borrow().semantic_view_range().unwrap();
        assert_approx_eq!(view.start, 125.0);
        assert_approx_eq!(view.end, 150.0);
    }

    #[rstest]
    fn test_glyphs_follow_zoom(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (_, tracks) = shared;
        {
            let track = tracks[1].borrow();
            let glyph = track.glyph(&"g1".into()).unwrap();
            assert_approx_eq!(glyph.px, 100.0);
            assert_approx_eq!(glyph.pw, 50.0);
        }

        HeadlessTrack::drag(&tracks[0], -250.0).unwrap();
        HeadlessTrack::wheel(&tracks[0], 2.0, 0.0).unwrap();

        let track = tracks[1].borrow();
        let glyph = track.glyph(&"g1".into()).unwrap();
        // k = 2, x = -500
        assert_approx_eq!(glyph.px, -300.0);
        assert_approx_eq!(glyph.pw, 100.0);
        assert_eq!(track.reprojections(), 2);
    }

    #[rstest]
    fn test_zoom_to_range(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        controller.borrow_mut().zoom_to_range(120.0, 140.0).unwrap();

        let view = controller.borrow().semantic_view_range().unwrap();
        assert_approx_eq!(view.start, 120.0);
        assert_approx_eq!(view.end, 140.0);
        assert_eq!(controller.borrow().state(), ZoomState::Zoomed);

        let track = tracks[0].borrow();
        let glyph = track.glyph(&"g1".into()).unwrap();
        assert_approx_eq!(glyph.px, 0.0);
        assert_approx_eq!(glyph.pw, 250.0);
    }

    #[rstest]
    fn test_custom_behaviors_run_once_per_change(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, _) = shared;
        let calls = Rc::new(Cell::new(0));
        let track = Rc::new(RefCell::new(
            HeadlessTrack::new("extra", 500.0).with_behavior(Rc::new(CountingBehavior {
                calls: calls.clone(),
            })),
        ));
        controller.borrow_mut().add_component(track.clone()).unwrap();
        track.borrow_mut().render(100.0, 200.0, genes()).unwrap();

        HeadlessTrack::drag(&track, 10.0).unwrap();
        HeadlessTrack::drag(&track, 0.0).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_zoom_applies_despite_width_mismatch() {
        let (controller, tracks) = shared_with(ZoomConfig::default(), &[500.0, 400.0]);

        let transform = ZoomTransform::new(2.0, -250.0, 0.0);
        assert!(HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap());
        assert_eq!(controller.borrow().current_transform().unwrap().k, 2.0);
        assert!(!HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap());
        assert!(!HeadlessTrack::emit_zoom(&tracks[1], transform).unwrap());

        assert_eq!(controller.borrow().render_passes(), 1);
        assert_eq!(controller.borrow().width().unwrap(), 500.0);
        for track in tracks.iter() {
            assert_eq!(track.borrow().transform(), Some(transform));
        }
    }

    #[test]
    fn test_trigger_adopts_component_height() {
        let config = ZoomConfig::default().with_translate_extent(TranslateExtent::Viewport);
        let (controller, tracks) = shared_with(config, &[500.0, 500.0]);

        let transform = ZoomTransform::new(2.0, -250.0, -10.0);
        assert!(HeadlessTrack::emit_zoom(&tracks[0], transform).unwrap());
        assert_eq!(controller.borrow().viewport().height(), 20.0);
        // A zero height would have pinned y to 0
        let current = controller.borrow().current_transform().unwrap();
        assert_approx_eq!(current.x, -250.0);
        assert_approx_eq!(current.y, -10.0);
    }

    #[test]
    fn test_translate_extent_applies_to_trigger() {
        let config = ZoomConfig::default()
            .with_width(Some(500.0))
            .with_scale_extent((1.0, 8.0))
            .with_translate_extent(TranslateExtent::Viewport);
        let mut controller = ZoomController::new(config);
        controller.set_query_range(100.0, 200.0).unwrap();

        controller.trigger(ZoomTransform::new(16.0, 400.0, 0.0)).unwrap();
        let current = controller.current_transform().unwrap();
        assert_eq!(current.k, 8.0);
        assert_approx_eq!(current.x, 0.0);

        // Clamped to the same transform: no change
        assert!(!controller.trigger(ZoomTransform::new(16.0, 400.0, 0.0)).unwrap());
    }

    #[test]
    fn test_zoom_config_from_json() {
        let json = r#"{"width": 800.0, "translate_extent": "viewport"}"#;
        let config = ZoomConfig::from_json(json.as_bytes()).unwrap();
        assert_eq!(config.width, Some(800.0));
        assert_eq!(config.translate_extent, TranslateExtent::Viewport);
        assert_eq!(config.scale_extent, (0.0, f64::INFINITY));
    }
}

mod resize {
    use super::*;

    #[rstest]
    fn test_resize_preserves_view(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        let mut resizer = ResizeController::new().with_zoom(controller.clone());
        for track in tracks.iter() {
            resizer.add_component(track.clone());
        }
        assert!(!resizer.trigger().unwrap());

        for track in tracks.iter() {
            track.borrow_mut().set_container_width(250.0);
        }
        assert!(resizer.trigger().unwrap());

        let view = controller.borrow().semantic_view_range().unwrap();
        assert_approx_eq!(view.start, 100.0);
        assert_approx_eq!(view.end, 200.0);
        assert_eq!(controller.borrow().width().unwrap(), 250.0);
        for track in tracks.iter() {
            let track = track.borrow();
            assert_eq!(track.resizes(), 1);
            assert_eq!(track.width(), 250.0);
            assert_approx_eq!(track.glyph(&"g1".into()).unwrap().px, 50.0);
        }
    }

    #[rstest]
    fn test_resize_alerts_observer(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        controller.borrow_mut().attach_observer(recorder.clone());
        HeadlessTrack::emit_zoom(&tracks[0], ZoomTransform::new(2.0, -250.0, 0.0)).unwrap();
        assert_eq!(recorder.borrow().views.len(), 1);

        let mut resizer = ResizeController::new().with_zoom(controller.clone());
        for track in tracks.iter() {
            resizer.add_component(track.clone());
            track.borrow_mut().set_container_width(1000.0);
        }
        assert!(resizer.trigger().unwrap());
        assert!(!controller.borrow_mut().refresh().unwrap());

        let views = recorder.borrow().views.clone();
        assert_eq!(views.len(), 2);
        assert_approx_eq!(views[1].start, 125.0);
        assert_approx_eq!(views[1].end, 175.0);
    }

    #[rstest]
    fn test_resize_preserves_zoomed_view(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (controller, tracks) = shared;
        HeadlessTrack::emit_zoom(&tracks[0], ZoomTransform::new(2.0, -250.0, 0.0)).unwrap();

        let mut resizer = ResizeController::new().with_zoom(controller.clone());
        resizer.add_components(tracks.iter().map(|t| t.clone() as Rc<RefCell<dyn Resizable>>));
        for track in tracks.iter() {
            track.borrow_mut().set_container_width(1000.0);
        }
        assert!(resizer.trigger().unwrap());

        let view = controller.borrow().semantic_view_range().unwrap();
        assert_approx_eq!(view.start, 125.0);
        assert_approx_eq!(view.end, 175.0);
    }

    #[test]
    fn test_standalone_track_resize() {
        let mut track = HeadlessTrack::new("solo", 500.0);
        track.render(100.0, 200.0, genes()).unwrap();
        track.set_container_width(1000.0);
        let track = Rc::new(RefCell::new(track));

        let mut resizer = ResizeController::new();
        resizer.add_component(track.clone());
        assert!(resizer.trigger().unwrap());
        let px = track.borrow().glyph(&"g1".into()).unwrap().px;
        assert_approx_eq!(px, 200.0);

        assert!(HeadlessTrack::emit_zoom(&track, ZoomTransform::IDENTITY).is_err());
    }

    #[test]
    fn test_resize_fans_out_unconditionally() {
        let tracks: Tracks = (0..3)
            .map(|i| Rc::new(RefCell::new(HeadlessTrack::new(format!("t{}", i), 100.0))))
            .collect();
        let mut resizer = ResizeController::new();
        for track in tracks.iter() {
            resizer.add_component(track.clone());
        }
        // Only one container changed, all components are resized
        tracks[2].borrow_mut().set_container_width(120.0);
        assert!(resizer.trigger().unwrap());
        assert!(tracks.iter().all(|t| t.borrow().resizes() == 1));
    }
}

mod query {
    use super::*;

    fn widen(
        _previous: &Query,
        view: &ViewRange,
    ) -> Query {
        Query::new(view.start - view.width, view.end + view.width)
    }

    fn controller(
        clock: Rc<ManualClock>,
        rendered: Rc<RefCell<Vec<(&'static str, Query)>>>,
    ) -> QueryController<Query> {
        let fine = rendered.clone();
        let coarse = rendered;
        let consumer = QueryConsumer::new("genes")
            .with_level(f64::INFINITY, move |q: &Query| {
                coarse.borrow_mut().push(("coarse", *q));
                Ok(())
            })
            .with_level(150.0, move |q: &Query| {
                fine.borrow_mut().push(("fine", *q));
                Ok(())
            });
        let mut controller = QueryController::new(QueryConfig::default(), widen).with_clock(clock);
        controller.add_consumer(consumer);
        controller.set_query(Query::new(100.0, 200.0));
        controller
    }

    #[test]
    fn test_view_inside_query_does_nothing() {
        let clock = Rc::new(ManualClock::new());
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let mut controller = controller(clock.clone(), rendered.clone());

        controller.alert(ViewRange::new(120.0, 180.0));
        assert!(controller.is_polling());
        assert!(!controller.poll().unwrap());

        clock.advance_ms(750);
        assert!(!controller.poll().unwrap());
        assert!(!controller.is_polling());
        assert!(rendered.borrow().is_empty());
    }

    #[test]
    fn test_settles_before_requery() {
        let clock = Rc::new(ManualClock::new());
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let mut controller = controller(clock.clone(), rendered.clone());

        controller.alert(ViewRange::new(150.0, 250.0));
        assert_eq!(controller.next_deadline(), Some(std::time::Duration::from_millis(750)));
        clock.advance_ms(740);
        controller.alert(ViewRange::new(160.0, 260.0));
        // Still the first deadline
        assert_eq!(controller.next_deadline(), Some(std::time::Duration::from_millis(750)));

        clock.advance_ms(10);
        assert!(!controller.poll().unwrap());
        assert!(controller.is_polling());

        clock.advance_ms(50);
        assert!(controller.poll().unwrap());
        assert_eq!(*rendered.borrow(), vec![("fine", Query::new(60.0, 360.0))]);
        assert_eq!(controller.query(), Some(&Query::new(60.0, 360.0)));
    }

    #[test]
    fn test_coarse_level_for_wide_views() {
        let clock = Rc::new(ManualClock::new());
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let mut controller = controller(clock.clone(), rendered.clone());

        controller.alert(ViewRange::new(0.0, 400.0));
        clock.advance_ms(800);
        assert!(controller.poll().unwrap());
        assert_eq!(rendered.borrow()[0].0, "coarse");
    }

    #[test]
    fn test_level_for() {
        let consumer = QueryConsumer::<Query>::new("lod")
            .with_level(1000.0, |_| Ok(()))
            .with_level(100.0, |_| Ok(()));
        assert_eq!(consumer.level_for(50.0), Some(0));
        assert_eq!(consumer.level_for(100.0), Some(0));
        assert_eq!(consumer.level_for(500.0), Some(1));
        assert_eq!(consumer.level_for(5000.0), Some(1));
        assert_eq!(QueryConsumer::<Query>::new("empty").level_for(1.0), None);
    }

    #[test]
    fn test_no_previous_query() {
        let clock = Rc::new(ManualClock::new());
        let mut controller =
            QueryController::new(QueryConfig::default(), widen).with_clock(clock.clone());
        controller.alert(ViewRange::new(0.0, 10.0));
        clock.advance_ms(1000);
        assert!(!controller.poll().unwrap());
        assert!(controller.query().is_none());
    }

    #[rstest]
    fn test_zoom_alerts_query_controller(shared: (Rc<RefCell<ZoomController>>, Tracks)) {
        let (zoom, tracks) = shared;
        let clock = Rc::new(ManualClock::new());
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let query = Rc::new(RefCell::new(controller(clock.clone(), rendered.clone())));
        zoom.borrow_mut().attach_observer(query.clone());

        // Pan 50 units to the right
        HeadlessTrack::drag(&tracks[0], -250.0).unwrap();
        assert!(query.borrow().is_polling());

        clock.advance_ms(800);
        assert!(query.borrow_mut().poll().unwrap());
        assert_eq!(*rendered.borrow(), vec![("fine", Query::new(50.0, 350.0))]);
    }

    #[test]
    fn test_query_config_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.settle_delay_ms, 750);
        assert_eq!(config.poll_threshold_ms, 50);
        let parsed = QueryConfig::from_json(r#"{"settle_delay_ms": 300}"#.as_bytes()).unwrap();
        assert_eq!(parsed, QueryConfig::default().with_settle_delay_ms(300));
    }
}
