//! The single-slot request scheduler.
//!
//! Any number of callers may enqueue requests; at most one search runs at a
//! time. The caller that finds the scheduler idle becomes its worker and
//! drains the queue in FIFO order, running each search and its callback
//! outside the queue lock. Everybody else just enqueues and returns.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use waygrid_core::{NavGrid, Vec3};
use waygrid_paths::PathFinder;

use crate::request::PathRequest;

/// The search a [`RequestScheduler`] runs for each request.
pub trait PathSearch: Send {
    /// Waypoints from `start` to `end`, or `None` if there is no path.
    fn search(&mut self, start: Vec3, end: Vec3) -> Option<Vec<Vec3>>;
}

/// A* over a shared [`NavGrid`] with a reusable [`PathFinder`].
pub struct GridSearch {
    grid: Arc<NavGrid>,
    finder: PathFinder,
}

impl GridSearch {
    pub fn new(grid: Arc<NavGrid>) -> Self {
        let finder = PathFinder::for_grid(&grid);
        Self { grid, finder }
    }
}

impl PathSearch for GridSearch {
    fn search(&mut self, start: Vec3, end: Vec3) -> Option<Vec<Vec3>> {
        self.finder
            .find_path(&self.grid, start, end)
            .map(|route| route.waypoints)
    }
}

#[derive(Debug, Default)]
struct Queue {
    pending: VecDeque<PathRequest>,
    processing: bool,
}

/// Serializes path requests against one [`PathSearch`], by default a
/// [`GridSearch`] over a shared [`NavGrid`].
///
/// Every enqueued request receives exactly one callback, in the order the
/// requests were enqueued, even if its search or an earlier callback
/// panicked. There is no cancellation.
pub struct RequestScheduler {
    search: Mutex<Box<dyn PathSearch>>,
    queue: Mutex<Queue>,
}

impl RequestScheduler {
    pub fn new(grid: Arc<NavGrid>) -> Self {
        Self::with_search(GridSearch::new(grid))
    }

    pub fn with_search<S: PathSearch + 'static>(search: S) -> Self {
        Self {
            search: Mutex::new(Box::new(search)),
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Queue a search from `start` to `end`; `on_complete` receives the
    /// waypoints and a success flag.
    ///
    /// If no search is running, this call runs the queue to completion on
    /// the calling thread before returning.
    pub fn request_path<F>(&self, start: Vec3, end: Vec3, on_complete: F)
    where
        F: FnOnce(Vec<Vec3>, bool) + Send + 'static,
    {
        self.enqueue(PathRequest::new(start, end, on_complete));
    }

    /// Append `request` to the back of the queue and try to start it.
    pub fn enqueue(&self, request: PathRequest) {
        {
            let mut queue = self.lock_queue();
            log::trace!("enqueue {request:?} behind {}", queue.pending.len());
            queue.pending.push_back(request);
        }
        self.try_start_next();
    }

    /// Requests waiting behind the current one.
    pub fn pending(&self) -> usize {
        self.lock_queue().pending.len()
    }

    /// Whether a search (or its callback) is running right now.
    pub fn is_processing(&self) -> bool {
        self.lock_queue().processing
    }

    fn try_start_next(&self) {
        loop {
            let request = {
                let mut queue = self.lock_queue();
                if queue.processing {
                    return;
                }
                let Some(request) = queue.pending.pop_front() else {
                    return;
                };
                queue.processing = true;
                request
            };
            log::trace!("start {request:?}");

            let (waypoints, success) = self.search(request.start, request.end);
            self.on_search_complete(request, waypoints, success);
        }
    }

    fn search(&self, start: Vec3, end: Vec3) -> (Vec<Vec3>, bool) {
        let mut search = self.search.lock().unwrap_or_else(PoisonError::into_inner);
        match panic::catch_unwind(AssertUnwindSafe(|| search.search(start, end))) {
            Ok(Some(waypoints)) => (waypoints, true),
            Ok(None) => (Vec::new(), false),
            Err(_) => {
                log::warn!("path search {start} -> {end} panicked; reporting no path");
                (Vec::new(), false)
            }
        }
    }

    fn on_search_complete(&self, request: PathRequest, waypoints: Vec<Vec3>, success: bool) {
        let completed = panic::catch_unwind(AssertUnwindSafe(|| {
            request.complete(waypoints, success);
        }));
        if completed.is_err() {
            log::warn!("path callback panicked; continuing with the next request");
        }
        self.lock_queue().processing = false;
    }

    fn lock_queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
