use std::cell::Cell;
use std::io::Read;
use std::rc::Rc;
use std::time::{
    Duration,
    Instant,
};

use anyhow::bail;
use log::{
    debug,
    info,
    trace,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::component::ViewObserver;
use crate::data_structs::typedef::PosType;
use crate::utils::config_from_json;
use crate::view::ViewRange;
use crate::with_field_fn;

/// A fetched or rendered semantic range.
pub trait QuerySignature {
    fn start(&self) -> PosType;

    fn end(&self) -> PosType;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub start: PosType,
    pub end:   PosType,
}

impl Query {
    pub fn new(
        start: PosType,
        end: PosType,
    ) -> Self {
        Self { start, end }
    }
}

impl QuerySignature for Query {
    fn start(&self) -> PosType { self.start }

    fn end(&self) -> PosType { self.end }
}

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration { self.origin.elapsed() }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    pub fn advance(
        &self,
        by: Duration,
    ) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(
        &self,
        ms: u64,
    ) {
        self.advance(Duration::from_millis(ms))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration { self.now.get() }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Delay between the first alert of a burst and the first settle check.
    pub settle_delay_ms:   u64,
    /// Quiet time after the last alert for the burst to count as finished.
    /// Also the re-check interval while events keep arriving.
    pub poll_threshold_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms:   750,
            poll_threshold_ms: 50,
        }
    }
}

impl QueryConfig {
    with_field_fn!(settle_delay_ms, u64);
    with_field_fn!(poll_threshold_ms, u64);

    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        config_from_json(reader)
    }

    pub fn settle_delay(&self) -> Duration { Duration::from_millis(self.settle_delay_ms) }

    pub fn poll_threshold(&self) -> Duration { Duration::from_millis(self.poll_threshold_ms) }
}

type RenderFn<Q> = Box<dyn FnMut(&Q) -> anyhow::Result<()>>;

/// A render target of a [`QueryController`] with level-of-detail callbacks.
///
/// Each level handles views up to its `max_width` semantic units; the
/// coarsest (widest) level also handles anything wider.
pub struct QueryConsumer<Q> {
    name:   String,
    levels: Vec<(PosType, RenderFn<Q>)>,
}

impl<Q> QueryConsumer<Q> {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name:   name.into(),
            levels: Vec::new(),
        }
    }

    /// Adds a level used for views at most `max_width` wide.
    pub fn with_level<F>(
        mut self,
        max_width: PosType,
        render: F,
    ) -> Self
    where
        F: FnMut(&Q) -> anyhow::Result<()> + 'static, {
        self.levels.push((max_width, Box::new(render)));
        self.levels.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    pub fn name(&self) -> &str { &self.name }

    /// Index of the level used for a view `view_width` wide.
    pub fn level_for(
        &self,
        view_width: PosType,
    ) -> Option<usize> {
        if self.levels.is_empty() {
            return None;
        }
        Some(
            self.levels
                .iter()
                .position(|(max_width, _)| view_width <= *max_width)
                .unwrap_or(self.levels.len() - 1),
        )
    }

    pub fn render(
        &mut self,
        query: &Q,
        view_width: PosType,
    ) -> anyhow::Result<()> {
        let Some(level) = self.level_for(view_width)
        else {
            bail!("Query consumer {} has no render callback", self.name)
        };
        trace!("Rendering {} at level {}", self.name, level);
        (self.levels[level].1)(query)
    }
}

type BuildQueryFn<Q> = Box<dyn Fn(&Q, &ViewRange) -> Q>;

/// Waits for a burst of view changes to settle, then re-renders its
/// consumers if the view left the last query.
///
/// The host calls [`QueryController::poll`] whenever its timer fires,
/// ideally at [`QueryController::next_deadline`].
pub struct QueryController<Q> {
    config:      QueryConfig,
    clock:       Rc<dyn Clock>,
    query:       Option<Q>,
    view:        Option<ViewRange>,
    last_alert:  Option<Duration>,
    deadline:    Option<Duration>,
    build_query: BuildQueryFn<Q>,
    consumers:   Vec<QueryConsumer<Q>>,
}

impl<Q: QuerySignature> QueryController<Q> {
    /// `build_query` derives the next query from the previous one and the
    /// view that escaped it.
    pub fn new<F>(
        config: QueryConfig,
        build_query: F,
    ) -> Self
    where
        F: Fn(&Q, &ViewRange) -> Q + 'static, {
        Self {
            config,
            clock: Rc::new(SystemClock::default()),
            query: None,
            view: None,
            last_alert: None,
            deadline: None,
            build_query: Box::new(build_query),
            consumers: Vec::new(),
        }
    }

    pub fn with_clock(
        mut self,
        clock: Rc<dyn Clock>,
    ) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &QueryConfig { &self.config }

    /// Records the query the consumers currently show.
    pub fn set_query(
        &mut self,
        query: Q,
    ) {
        self.query = Some(query);
    }

    pub fn query(&self) -> Option<&Q> { self.query.as_ref() }

    pub fn add_consumer(
        &mut self,
        consumer: QueryConsumer<Q>,
    ) {
        self.consumers.push(consumer);
    }

    pub fn is_polling(&self) -> bool { self.deadline.is_some() }

    pub fn next_deadline(&self) -> Option<Duration> { self.deadline }

    /// Records the latest visible range and schedules a settle check
    /// unless one is pending.
    pub fn alert(
        &mut self,
        view: ViewRange,
    ) {
        let now = self.clock.now();
        self.view = Some(view);
        self.last_alert = Some(now);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.config.settle_delay());
            trace!("Settle check scheduled at {:?}", self.deadline);
        }
    }

    /// Runs the settle check if it is due. Returns whether the consumers
    /// were re-rendered.
    ///
    /// Events still arriving push the check back by the poll threshold.
    pub fn poll(&mut self) -> anyhow::Result<bool> {
        let Some(deadline) = self.deadline
        else {
            return Ok(false);
        };
        let now = self.clock.now();
        if now < deadline {
            return Ok(false);
        }

        let quiet = now.saturating_sub(self.last_alert.unwrap_or_default());
        if quiet <= self.config.poll_threshold() {
            self.deadline = Some(now + self.config.poll_threshold());
            return Ok(false);
        }
        self.deadline = None;
        self.settle()
    }

    fn settle(&mut self) -> anyhow::Result<bool> {
        let (Some(previous), Some(view)) = (self.query.as_ref(), self.view)
        else {
            debug!("View settled without a previous query, nothing to compare");
            return Ok(false);
        };
        if !(previous.start() > view.start || previous.end() < view.end) {
            trace!("View [{}, {}] is inside the last query", view.start, view.end);
            return Ok(false);
        }

        let query = (self.build_query)(previous, &view);
        info!(
            "View [{}, {}] left the last query, re-rendering [{}, {}]",
            view.start,
            view.end,
            query.start(),
            query.end()
        );
        for consumer in self.consumers.iter_mut() {
            consumer.render(&query, view.width)?;
        }
        self.query = Some(query);
        Ok(true)
    }
}

impl<Q: QuerySignature> ViewObserver for QueryController<Q> {
    fn alert(
        &mut self,
        view: ViewRange,
    ) {
        QueryController::alert(self, view)
    }
}
