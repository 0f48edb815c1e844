//! Serialized path requests against a shared [`waygrid_core::NavGrid`].
//!
//! - [`RequestScheduler`] runs at most one search at a time and answers
//!   every request exactly once, in FIFO order, on whichever thread
//!   happened to drain the queue. The search itself sits behind
//!   [`PathSearch`]; [`GridSearch`] is the A* one.
//! - [`PathWorker`] puts a scheduler on its own thread; producers talk to it
//!   through cloneable [`PathHandle`]s.

mod request;
mod scheduler;
mod worker;

pub use request::{PathCallback, PathRequest};
pub use scheduler::{GridSearch, PathSearch, RequestScheduler};
pub use worker::{PathHandle, PathWorker};
