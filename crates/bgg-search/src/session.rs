//! Search session: debounced input in, staleness-guarded renders out.

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::merge::merge;
use crate::planner::QueryPlanner;
use crate::render::{DisplaySurface, Renderer};
use crate::staleness::{JobClock, MonotonicClock, StalenessGuard};
use bgg_catalog::CatalogService;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// What a finished search job did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Empty query: the display was cleared
    Cleared,
    /// Results were shown; `total` counts merged results before the cap
    Rendered { shown: usize, total: usize },
    /// A newer job started first; nothing was touched
    Superseded,
}

/// Everything a job needs, shared by all jobs of a session.
struct SearchJob<S, C> {
    planner: QueryPlanner,
    renderer: Renderer,
    guard: StalenessGuard<C>,
    surface: Rc<RefCell<S>>,
}

impl<S: DisplaySurface, C: JobClock> SearchJob<S, C> {
    async fn run(&self, query: &str) -> JobOutcome {
        // Stamped before the empty check so an older in-flight job cannot
        // render over the cleared display
        let token = self.guard.begin_job();
        log::debug!("Job {} started for {query:?}", token.value());

        if query.is_empty() {
            let mut surface = self.surface.borrow_mut();
            surface.clear();
            surface.set_busy(false);
            return JobOutcome::Cleared;
        }

        self.surface.borrow_mut().set_busy(true);

        let merged = merge(self.planner.plan(query).await);

        if self.guard.is_superseded(token) {
            // The busy indicator now belongs to the newer job
            log::debug!(
                "Job {} superseded by {}, dropping {} results",
                token.value(),
                self.guard.latest().value(),
                merged.len()
            );
            return JobOutcome::Superseded;
        }

        let mut surface = self.surface.borrow_mut();
        let shown = self.renderer.render(&mut *surface, &merged);
        surface.set_busy(false);
        log::debug!(
            "Job {} rendered {shown} of {} results",
            token.value(),
            merged.len()
        );

        JobOutcome::Rendered {
            shown,
            total: merged.len(),
        }
    }
}

/// Ties the debouncer, planner, merger, staleness guard and renderer together
/// for one search field.
///
/// Runs on a single thread: create and drive it inside a
/// `tokio::task::LocalSet`.
pub struct SearchSession<S, C = MonotonicClock> {
    job: Rc<SearchJob<S, C>>,
    debouncer: Debouncer,
    debounce: Duration,
}

impl<S: DisplaySurface + 'static> SearchSession<S> {
    pub fn new(
        catalog: Rc<dyn CatalogService>,
        config: &SearchConfig,
        surface: Rc<RefCell<S>>,
    ) -> Self {
        Self::with_clock(catalog, config, surface, MonotonicClock::new())
    }
}

impl<S: DisplaySurface + 'static, C: JobClock + 'static> SearchSession<S, C> {
    pub fn with_clock(
        catalog: Rc<dyn CatalogService>,
        config: &SearchConfig,
        surface: Rc<RefCell<S>>,
        clock: C,
    ) -> Self {
        let job = SearchJob {
            planner: QueryPlanner::new(catalog, config.exact_match_threshold),
            renderer: Renderer::from_config(config),
            guard: StalenessGuard::with_clock(clock),
            surface,
        };

        Self {
            job: Rc::new(job),
            debouncer: Debouncer::new(),
            debounce: config.debounce(),
        }
    }

    /// The search field changed to `text`. The search starts once input has
    /// been quiet for the configured debounce period.
    pub fn input(&mut self, text: &str) {
        let job = self.job.clone();
        let query = text.to_string();

        self.debouncer.schedule(
            async move {
                let outcome = job.run(&query).await;
                log::debug!("Search for {query:?}: {outcome:?}");
            },
            self.debounce,
        );
    }

    /// Run a search job right away, without debouncing.
    pub async fn search(&self, query: &str) -> JobOutcome {
        self.job.run(query).await
    }

    /// Whether a debounced search is still waiting for input to go quiet.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Wait until the pending search and every started job have finished.
    pub async fn settle(&mut self) {
        self.debouncer.settle().await;
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.job.surface
    }
}
