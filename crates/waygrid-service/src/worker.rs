//! A dedicated search thread in front of a [`RequestScheduler`].

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use waygrid_core::{NavGrid, Vec3};

use crate::request::PathRequest;
use crate::scheduler::RequestScheduler;

enum Msg {
    Request(PathRequest),
    Shutdown,
}

/// Cloneable producer side of a [`PathWorker`].
#[derive(Clone)]
pub struct PathHandle {
    sender: Sender<Msg>,
}

impl PathHandle {
    /// Queue a search on the worker thread. Never blocks on the search.
    ///
    /// If the worker has already shut down, `on_complete` runs immediately
    /// on this thread with `(vec![], false)`.
    pub fn request_path<F>(&self, start: Vec3, end: Vec3, on_complete: F)
    where
        F: FnOnce(Vec<Vec3>, bool) + Send + 'static,
    {
        self.send(PathRequest::new(start, end, on_complete));
    }

    pub fn send(&self, request: PathRequest) {
        if let Err(mpsc::SendError(Msg::Request(request))) = self.sender.send(Msg::Request(request)) {
            log::warn!("path worker is gone; failing {request:?}");
            request.fail();
        }
    }
}

/// Runs every search on one background thread, so producers only pay for a
/// channel send.
pub struct PathWorker {
    handle: PathHandle,
    thread: Option<JoinHandle<()>>,
}

impl PathWorker {
    pub fn spawn(grid: Arc<NavGrid>) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("waygrid-path-worker".into())
            .spawn(move || {
                let scheduler = RequestScheduler::new(grid);
                for msg in receiver.iter() {
                    match msg {
                        Msg::Request(request) => scheduler.enqueue(request),
                        Msg::Shutdown => break,
                    }
                }
                // Requests that raced the shutdown message still get an answer.
                let mut late = 0;
                for msg in receiver.try_iter() {
                    if let Msg::Request(request) = msg {
                        request.fail();
                        late += 1;
                    }
                }
                log::debug!("path worker stopped; failed {late} late requests");
            })?;
        Ok(Self {
            handle: PathHandle { sender },
            thread: Some(thread),
        })
    }

    /// A producer handle that can be moved to other threads.
    pub fn handle(&self) -> PathHandle {
        self.handle.clone()
    }

    pub fn request_path<F>(&self, start: Vec3, end: Vec3, on_complete: F)
    where
        F: FnOnce(Vec<Vec3>, bool) + Send + 'static,
    {
        self.handle.request_path(start, end, on_complete);
    }

    /// Finish every request sent so far, then stop the thread.
    ///
    /// Requests sent through outstanding handles afterwards fail with
    /// `(vec![], false)`: immediately once the thread is gone, or on the
    /// worker thread if they raced the shutdown.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // A send error means the thread is already gone.
        let _ = self.handle.sender.send(Msg::Shutdown);
        if thread.join().is_err() {
            log::warn!("path worker thread panicked");
        }
    }
}

impl Drop for PathWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
