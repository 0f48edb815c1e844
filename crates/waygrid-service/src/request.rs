use std::fmt;
use std::thread;

use waygrid_core::Vec3;

/// Completion callback: the waypoints (empty on failure) and whether a path
/// was found.
pub type PathCallback = Box<dyn FnOnce(Vec<Vec3>, bool) + Send + 'static>;

/// One path query, consumed exactly once by a
/// [`RequestScheduler`](crate::RequestScheduler).
///
/// A request dropped before it was resolved, for example because the worker
/// it was sent to has stopped, resolves as unreachable.
pub struct PathRequest {
    pub start: Vec3,
    pub end: Vec3,
    callback: Option<PathCallback>,
}

impl PathRequest {
    pub fn new<F>(start: Vec3, end: Vec3, on_complete: F) -> Self
    where
        F: FnOnce(Vec<Vec3>, bool) + Send + 'static,
    {
        Self {
            start,
            end,
            callback: Some(Box::new(on_complete)),
        }
    }

    /// Resolve the request, consuming it.
    pub(crate) fn complete(mut self, waypoints: Vec<Vec3>, success: bool) {
        if let Some(callback) = self.callback.take() {
            callback(waypoints, success);
        }
    }

    /// Resolve the request as unreachable.
    pub(crate) fn fail(self) {
        self.complete(Vec::new(), false)
    }
}

impl Drop for PathRequest {
    fn drop(&mut self) {
        // Running user code while already unwinding would abort.
        if thread::panicking() {
            return;
        }
        if let Some(callback) = self.callback.take() {
            log::debug!("unresolved path request dropped; failing it");
            callback(Vec::new(), false);
        }
    }
}

impl fmt::Debug for PathRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequest")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(Vec<Vec3>, bool)>>>;

    fn recording(calls: &Calls) -> PathRequest {
        let calls = Arc::clone(calls);
        PathRequest::new(Vec3::ZERO, Vec3::UP, move |w, ok| calls.lock().unwrap().push((w, ok)))
    }

    #[test]
    fn complete_runs_callback_once() {
        let calls: Calls = Arc::default();
        recording(&calls).complete(vec![Vec3::UP], true);
        assert_eq!(*calls.lock().unwrap(), vec![(vec![Vec3::UP], true)]);
    }

    #[test]
    fn dropped_request_fails() {
        let calls: Calls = Arc::default();
        drop(recording(&calls));
        assert_eq!(*calls.lock().unwrap(), vec![(Vec::new(), false)]);
    }
}
