//! Dashboard view state and the mounted fetch lifecycle.
//!
//! A [`DashboardView`] is a small state machine: it starts in
//! [`ViewState::Loading`] and is resolved exactly once per fetch generation to
//! either [`ViewState::Ready`] or [`ViewState::Failed`]. [`MountedDashboard`]
//! owns the in-flight fetch and a liveness flag; a fetch that completes after
//! the mount is disposed is dropped without touching the view.

use crate::core::builder::{DashboardViewModel, ViewModelBuilder};
use crate::core::error::LoadError;
use crate::core::source::SnapshotSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum ViewState {
    Loading,
    Ready(Box<DashboardViewModel>),
    Failed(LoadError),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "Loading",
            ViewState::Ready(_) => "Ready",
            ViewState::Failed(_) => "Failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

#[derive(Debug)]
pub struct DashboardView {
    state: ViewState,
    generation: u64,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resets to `Loading` and returns the generation the next fetch must carry.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.state = ViewState::Loading;
        debug!(generation = self.generation, "Dashboard refresh started");
        self.generation
    }

    /// Like [`begin_refresh`](Self::begin_refresh), but only out of `Failed`.
    pub fn retry(&mut self) -> Option<u64> {
        match self.state {
            ViewState::Failed(_) => Some(self.begin_refresh()),
            _ => None,
        }
    }

    /// Invalidates any fetch still in flight without changing the state.
    pub fn discard_pending(&mut self) {
        self.generation += 1;
        debug!(generation = self.generation, "Pending dashboard fetch discarded");
    }

    /// Applies a fetch outcome. Returns `false`, leaving the view untouched,
    /// when the outcome belongs to an older generation or the view is not loading.
    pub fn resolve(
        &mut self,
        generation: u64,
        outcome: Result<DashboardViewModel, LoadError>,
    ) -> bool {
        if generation != self.generation || !self.state.is_loading() {
            debug!(
                generation,
                current = self.generation,
                state = self.state.name(),
                "Ignoring superseded dashboard result"
            );
            return false;
        }
        self.state = match outcome {
            Ok(view_model) => ViewState::Ready(Box::new(view_model)),
            Err(e) => {
                warn!(error = %e, "Dashboard failed to load");
                ViewState::Failed(e)
            }
        };
        debug!(generation, state = self.state.name(), "Dashboard resolved");
        true
    }
}

/// Fetches a snapshot and builds it into a view-model.
pub async fn load(
    source: &dyn SnapshotSource,
    builder: &ViewModelBuilder,
) -> Result<DashboardViewModel, LoadError> {
    let raw = source.fetch_snapshot().await.map_err(LoadError::Fetch)?;
    Ok(builder.build_from_raw(raw)?)
}

/// A dashboard view attached to a data source, with at most one fetch in flight.
pub struct MountedDashboard {
    view: Arc<Mutex<DashboardView>>,
    alive: Arc<AtomicBool>,
    source: Arc<dyn SnapshotSource>,
    builder: Arc<ViewModelBuilder>,
    task: Option<JoinHandle<()>>,
}

impl MountedDashboard {
    /// Mounts a fresh view and starts the initial fetch.
    pub async fn mount(source: Arc<dyn SnapshotSource>, builder: ViewModelBuilder) -> Self {
        let mut mounted = Self {
            view: Arc::new(Mutex::new(DashboardView::new())),
            alive: Arc::new(AtomicBool::new(true)),
            source,
            builder: Arc::new(builder),
            task: None,
        };
        mounted.refresh().await;
        mounted
    }

    pub fn view(&self) -> Arc<Mutex<DashboardView>> {
        Arc::clone(&self.view)
    }

    /// Resets to `Loading` and starts a new fetch. An older fetch still in
    /// flight is left to finish and will be ignored.
    pub async fn refresh(&mut self) {
        let generation = self.view.lock().await.begin_refresh();
        self.spawn_fetch(generation);
    }

    /// Starts a new fetch if the view is in `Failed`. Returns whether it did.
    pub async fn retry(&mut self) -> bool {
        let generation = self.view.lock().await.retry();
        match generation {
            Some(generation) => {
                self.spawn_fetch(generation);
                true
            }
            None => false,
        }
    }

    /// Waits for the most recent fetch to settle. A fetch task that dies
    /// (for example by panicking) resolves the view to `Failed`.
    pub async fn settled(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            warn!(error = %e, "Dashboard fetch task did not complete");
            let mut view = self.view.lock().await;
            let generation = view.generation();
            view.resolve(
                generation,
                Err(LoadError::Fetch(
                    anyhow::Error::new(e).context("Dashboard fetch task did not complete"),
                )),
            );
        }
    }

    /// Disposes the view. Once this returns, no fetch can change the view.
    /// The returned handle lets callers wait for a fetch that was still in
    /// flight; its result is discarded.
    pub async fn unmount(mut self) -> Option<JoinHandle<()>> {
        self.alive.store(false, Ordering::SeqCst);
        // A fetch holding the lock has either resolved already or sees the
        // cleared flag; the bumped generation rejects anything later.
        self.view.lock().await.discard_pending();
        self.task.take()
    }

    fn spawn_fetch(&mut self, generation: u64) {
        let view = Arc::clone(&self.view);
        let alive = Arc::clone(&self.alive);
        let source = Arc::clone(&self.source);
        let builder = Arc::clone(&self.builder);

        self.task = Some(tokio::spawn(async move {
            let outcome = load(source.as_ref(), &builder).await;
            if !alive.load(Ordering::SeqCst) {
                debug!(generation, "Discarding dashboard result for an unmounted view");
                return;
            }
            let mut view = view.lock().await;
            if alive.load(Ordering::SeqCst) {
                view.resolve(generation, outcome);
            }
        }));
    }
}

impl Drop for MountedDashboard {
    fn drop(&mut self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            if let Ok(mut view) = self.view.try_lock() {
                view.discard_pending();
            }
        }
    }
}
